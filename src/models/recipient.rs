use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ResolverError, Result};
use crate::models::ScopeType;

/// Who a notification is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Recipient {
    User(u64),
    Team(u64),
}

impl Recipient {
    /// Build a recipient from the nullable user/team columns of a persisted row.
    pub fn from_ids(user_id: Option<u64>, team_id: Option<u64>) -> Result<Self> {
        match (user_id, team_id) {
            (Some(user_id), None) => Ok(Self::User(user_id)),
            (None, Some(team_id)) => Ok(Self::Team(team_id)),
            (Some(user_id), Some(team_id)) => Err(ResolverError::InvalidRecipient(format!(
                "both user {} and team {} given",
                user_id, team_id
            ))),
            (None, None) => Err(ResolverError::invalid_recipient(
                "unable to find user or team",
            )),
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::User(id) | Self::Team(id) => *id,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }

    pub fn is_team(&self) -> bool {
        matches!(self, Self::Team(_))
    }

    /// The recipient-intrinsic scope its own settings are stored under.
    pub fn scope_type(&self) -> ScopeType {
        match self {
            Self::User(_) => ScopeType::User,
            Self::Team(_) => ScopeType::Team,
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope_type(), self.id())
    }
}
