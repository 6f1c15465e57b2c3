use serde::{Deserialize, Serialize};

use crate::error::{ResolverError, Result};
use crate::models::{NotificationType, Provider, Recipient, ScopeType, SettingValue};

/// A persisted notification setting, as handed over by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettingRow {
    pub user_id: Option<u64>,
    pub team_id: Option<u64>,
    pub scope_type: ScopeType,
    /// May be omitted for USER/TEAM scopes, where it equals the recipient id.
    pub scope_identifier: Option<u64>,
    pub provider: Provider,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub value: SettingValue,
}

impl NotificationSettingRow {
    pub fn for_user(
        user_id: u64,
        scope_type: ScopeType,
        scope_identifier: u64,
        provider: Provider,
        notification_type: NotificationType,
        value: SettingValue,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            team_id: None,
            scope_type,
            scope_identifier: Some(scope_identifier),
            provider,
            notification_type,
            value,
        }
    }

    pub fn for_team(
        team_id: u64,
        scope_type: ScopeType,
        scope_identifier: u64,
        provider: Provider,
        notification_type: NotificationType,
        value: SettingValue,
    ) -> Self {
        Self {
            user_id: None,
            team_id: Some(team_id),
            scope_type,
            scope_identifier: Some(scope_identifier),
            provider,
            notification_type,
            value,
        }
    }

    /// Scope-wide setting for a project or organization, shared by every
    /// recipient without an override of its own.
    pub fn for_scope(
        scope_type: ScopeType,
        scope_identifier: u64,
        provider: Provider,
        notification_type: NotificationType,
        value: SettingValue,
    ) -> Self {
        Self {
            user_id: None,
            team_id: None,
            scope_type,
            scope_identifier: Some(scope_identifier),
            provider,
            notification_type,
            value,
        }
    }

    /// The user or team the row belongs to.
    ///
    /// Only PROJECT and ORGANIZATION rows may omit both; they apply scope-wide.
    pub fn recipient(&self) -> Result<Option<Recipient>> {
        if self.user_id.is_none() && self.team_id.is_none() && self.scope_type.is_parent_scope() {
            return Ok(None);
        }
        Recipient::from_ids(self.user_id, self.team_id)
            .map(Some)
            .map_err(|e| {
                ResolverError::InvalidRow(format!("{} ({} {})", e, self.scope_type, self.provider))
            })
    }

    /// The id the row is keyed under within its scope.
    pub fn scope_id(&self) -> Result<u64> {
        match (self.scope_identifier, self.scope_type.is_recipient_scope()) {
            (Some(id), _) => Ok(id),
            (None, true) => match self.recipient()? {
                Some(recipient) => Ok(recipient.id()),
                None => Err(ResolverError::invalid_row(
                    "recipient scoped row without a recipient",
                )),
            },
            (None, false) => Err(ResolverError::InvalidRow(format!(
                "{} scoped row without a scope identifier",
                self.scope_type
            ))),
        }
    }
}
