use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ResolverError, Result};
use crate::models::scope::{scope_for_type, ScopeType};

/// Category of notification a setting applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NotificationType {
    #[serde(rename = "deploy")]
    Deploy,
    #[serde(rename = "alerts")]
    IssueAlerts,
    #[serde(rename = "workflow")]
    Workflow,
    #[serde(rename = "approval")]
    Approval,
    #[serde(rename = "quota")]
    Quota,
    #[serde(rename = "quotaErrors")]
    QuotaErrors,
    #[serde(rename = "quotaTransactions")]
    QuotaTransactions,
    #[serde(rename = "quotaAttachments")]
    QuotaAttachments,
    #[serde(rename = "quotaReplays")]
    QuotaReplays,
    #[serde(rename = "quotaWarnings")]
    QuotaWarnings,
    #[serde(rename = "quotaSpendAllocations")]
    QuotaSpendAllocations,
    #[serde(rename = "spikeProtection")]
    SpikeProtection,
    #[serde(rename = "reports")]
    Reports,
}

impl NotificationType {
    pub const ALL: [NotificationType; 13] = [
        NotificationType::Deploy,
        NotificationType::IssueAlerts,
        NotificationType::Workflow,
        NotificationType::Approval,
        NotificationType::Quota,
        NotificationType::QuotaErrors,
        NotificationType::QuotaTransactions,
        NotificationType::QuotaAttachments,
        NotificationType::QuotaReplays,
        NotificationType::QuotaWarnings,
        NotificationType::QuotaSpendAllocations,
        NotificationType::SpikeProtection,
        NotificationType::Reports,
    ];

    /// Persisted integer code.
    pub fn code(self) -> i32 {
        match self {
            Self::Deploy => 10,
            Self::IssueAlerts => 20,
            Self::Workflow => 30,
            Self::Approval => 40,
            Self::Quota => 50,
            Self::QuotaErrors => 51,
            Self::QuotaTransactions => 52,
            Self::QuotaAttachments => 53,
            Self::QuotaWarnings => 54,
            Self::QuotaSpendAllocations => 55,
            Self::QuotaReplays => 56,
            Self::SpikeProtection => 60,
            Self::Reports => 70,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::IssueAlerts => "alerts",
            Self::Workflow => "workflow",
            Self::Approval => "approval",
            Self::Quota => "quota",
            Self::QuotaErrors => "quotaErrors",
            Self::QuotaTransactions => "quotaTransactions",
            Self::QuotaAttachments => "quotaAttachments",
            Self::QuotaReplays => "quotaReplays",
            Self::QuotaWarnings => "quotaWarnings",
            Self::QuotaSpendAllocations => "quotaSpendAllocations",
            Self::SpikeProtection => "spikeProtection",
            Self::Reports => "reports",
        }
    }

    /// The parent scope in which more specific settings can be stored.
    pub fn scope_type(self) -> ScopeType {
        scope_for_type(self)
    }

    /// Reports are only ever delivered by email.
    pub fn is_email_only(self) -> bool {
        matches!(self, Self::Reports)
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i32> for NotificationType {
    type Error = ResolverError;

    fn try_from(code: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| ResolverError::unknown_type(code))
    }
}

impl FromStr for NotificationType {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| ResolverError::unknown_type(s))
    }
}
