use thiserror::Error;

use crate::models::{NotificationType, SettingValue};

pub type Result<T> = std::result::Result<T, ResolverError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    #[error("Unknown notification type: {value}, must be one of {expected}")]
    UnknownNotificationType { value: String, expected: String },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown scope type: {0}")]
    UnknownScopeType(String),

    #[error("Unknown setting value: {0}")]
    UnknownSettingValue(String),

    #[error("Unknown subscription reason: {0}")]
    UnknownReason(String),

    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Invalid setting row: {0}")]
    InvalidRow(String),

    #[error("Invalid value {value} for notification type {notification_type}")]
    InvalidValue {
        notification_type: NotificationType,
        value: SettingValue,
    },

    #[error("Integrity fault: {0}")]
    Integrity(String),
}

// 便利函数，用于创建常见错误
impl ResolverError {
    pub fn unknown_type(value: impl ToString) -> Self {
        Self::UnknownNotificationType {
            value: value.to_string(),
            expected: NotificationType::ALL
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn invalid_scope(msg: &str) -> Self {
        Self::InvalidScope(msg.to_string())
    }

    pub fn invalid_recipient(msg: &str) -> Self {
        Self::InvalidRecipient(msg.to_string())
    }

    pub fn invalid_row(msg: &str) -> Self {
        Self::InvalidRow(msg.to_string())
    }

    pub fn integrity(msg: &str) -> Self {
        Self::Integrity(msg.to_string())
    }

    /// Whether the error comes from malformed input rather than a caller bug.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRow(_) | Self::InvalidValue { .. } | Self::Integrity(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_names_legal_set() {
        let err = ResolverError::unknown_type(99);
        let message = err.to_string();
        assert!(message.contains("99"));
        assert!(message.contains("alerts"));
        assert!(message.contains("workflow"));
        assert!(message.contains("quotaSpendAllocations"));
        assert!(message.contains("reports"));
    }

    #[test]
    fn test_is_data_error() {
        assert!(ResolverError::invalid_row("no recipient").is_data_error());
        assert!(ResolverError::integrity("default leaked").is_data_error());
        assert!(!ResolverError::invalid_scope("ambiguous").is_data_error());
    }
}
