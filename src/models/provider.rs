use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ResolverError, Result};

/// Delivery channel for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Email,
    Slack,
    MsTeams,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Email, Provider::Slack, Provider::MsTeams];

    /// Persisted integer code.
    pub fn code(self) -> i32 {
        match self {
            Self::Email => 100,
            Self::Slack => 110,
            Self::MsTeams => 120,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Slack => "slack",
            Self::MsTeams => "msteams",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i32> for Provider {
    type Error = ResolverError;

    fn try_from(code: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| ResolverError::UnknownProvider(code.to_string()))
    }
}

impl FromStr for Provider {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| ResolverError::UnknownProvider(s.to_string()))
    }
}
