use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ResolverError, Result};
use crate::models::NotificationType;

/// Level at which a setting override is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    User,
    Organization,
    Project,
    Team,
}

impl ScopeType {
    pub const ALL: [ScopeType; 4] = [
        ScopeType::User,
        ScopeType::Organization,
        ScopeType::Project,
        ScopeType::Team,
    ];

    pub fn code(self) -> i32 {
        match self {
            Self::User => 0,
            Self::Organization => 10,
            Self::Project => 20,
            Self::Team => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organization => "organization",
            Self::Project => "project",
            Self::Team => "team",
        }
    }

    /// USER and TEAM scopes belong to the recipient itself.
    pub fn is_recipient_scope(self) -> bool {
        matches!(self, Self::User | Self::Team)
    }

    /// PROJECT and ORGANIZATION scopes are tied to a parent id.
    pub fn is_parent_scope(self) -> bool {
        !self.is_recipient_scope()
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i32> for ScopeType {
    type Error = ResolverError;

    fn try_from(code: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or_else(|| ResolverError::UnknownScopeType(code.to_string()))
    }
}

impl FromStr for ScopeType {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s.trim())
            .ok_or_else(|| ResolverError::UnknownScopeType(s.to_string()))
    }
}

/// In which parent scope (project or organization) can a recipient set more
/// specific settings for this type?
pub fn scope_for_type(notification_type: NotificationType) -> ScopeType {
    match notification_type {
        NotificationType::Deploy
        | NotificationType::Approval
        | NotificationType::Quota
        | NotificationType::QuotaErrors
        | NotificationType::QuotaTransactions
        | NotificationType::QuotaAttachments
        | NotificationType::QuotaReplays
        | NotificationType::QuotaWarnings
        | NotificationType::QuotaSpendAllocations
        | NotificationType::Reports => ScopeType::Organization,
        NotificationType::Workflow
        | NotificationType::IssueAlerts
        | NotificationType::SpikeProtection => ScopeType::Project,
    }
}

/// Resolve the scope a setting is stored under from exactly one entity id.
pub fn scope_of(
    user: Option<u64>,
    team: Option<u64>,
    project: Option<u64>,
    organization: Option<u64>,
) -> Result<(ScopeType, u64)> {
    let candidates: Vec<(ScopeType, u64)> = [
        (ScopeType::Project, project),
        (ScopeType::Organization, organization),
        (ScopeType::User, user),
        (ScopeType::Team, team),
    ]
    .into_iter()
    .filter_map(|(scope, id)| id.map(|id| (scope, id)))
    .collect();

    match candidates.as_slice() {
        [single] => Ok(*single),
        [] => Err(ResolverError::invalid_scope(
            "scope must be either user, team, organization, or project",
        )),
        _ => Err(ResolverError::InvalidScope(format!(
            "ambiguous scope, got {}",
            candidates
                .iter()
                .map(|(scope, id)| format!("{}:{}", scope, id))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}
