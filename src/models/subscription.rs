use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{ResolverError, Result};

/// Why a user is subscribed to an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSubscriptionReason {
    Implicit,
    Committed,
    ProcessingIssue,
    Unknown,
    Comment,
    Assigned,
    Bookmark,
    StatusChange,
    DeploySetting,
    Mentioned,
    TeamMentioned,
}

impl GroupSubscriptionReason {
    pub const ALL: [GroupSubscriptionReason; 11] = [
        GroupSubscriptionReason::Implicit,
        GroupSubscriptionReason::Committed,
        GroupSubscriptionReason::ProcessingIssue,
        GroupSubscriptionReason::Unknown,
        GroupSubscriptionReason::Comment,
        GroupSubscriptionReason::Assigned,
        GroupSubscriptionReason::Bookmark,
        GroupSubscriptionReason::StatusChange,
        GroupSubscriptionReason::DeploySetting,
        GroupSubscriptionReason::Mentioned,
        GroupSubscriptionReason::TeamMentioned,
    ];

    pub fn code(self) -> i32 {
        match self {
            Self::Implicit => -1,
            Self::Committed => -2,
            Self::ProcessingIssue => -3,
            Self::Unknown => 0,
            Self::Comment => 1,
            Self::Assigned => 2,
            Self::Bookmark => 3,
            Self::StatusChange => 4,
            Self::DeploySetting => 5,
            Self::Mentioned => 6,
            Self::TeamMentioned => 7,
        }
    }

    /// Name reported to API consumers; reasons without one report "unknown".
    pub fn api_name(self) -> &'static str {
        match self {
            Self::Comment => "commented",
            Self::Assigned => "assigned",
            Self::Bookmark => "bookmarked",
            Self::StatusChange => "changed_status",
            Self::Mentioned => "mentioned",
            Self::TeamMentioned => "team_mentioned",
            _ => "unknown",
        }
    }

    /// Completes the sentence "You are receiving this because you ..."
    pub fn description(self) -> &'static str {
        match self {
            Self::Implicit => {
                "have opted to receive updates for all issues within projects that you are a member of"
            }
            Self::Committed => "were involved in a commit that is part of this release",
            Self::ProcessingIssue => "are subscribed to alerts for this project",
            Self::Comment => "have commented on this issue",
            Self::Assigned => "have been assigned to this issue",
            Self::Bookmark => "have bookmarked this issue",
            Self::StatusChange => "have changed the resolution status of this issue",
            Self::DeploySetting => {
                "opted to receive all deploy notifications for this organization"
            }
            Self::Mentioned => "have been mentioned in this issue",
            Self::TeamMentioned => "are a member of a team mentioned in this issue",
            Self::Unknown => DEFAULT_REASON_DESCRIPTION,
        }
    }
}

const DEFAULT_REASON_DESCRIPTION: &str = "are subscribed to this issue";

impl fmt::Display for GroupSubscriptionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

impl TryFrom<i32> for GroupSubscriptionReason {
    type Error = ResolverError;

    fn try_from(code: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| ResolverError::UnknownReason(code.to_string()))
    }
}

/// Template context describing why the recipient gets a notification.
pub fn reason_context(reason_code: Option<i32>) -> HashMap<String, String> {
    let description = reason_code
        .and_then(|code| GroupSubscriptionReason::try_from(code).ok())
        .map_or(DEFAULT_REASON_DESCRIPTION, |reason| reason.description());

    let mut context = HashMap::new();
    context.insert("reason".to_string(), description.to_string());
    context
}

/// An issue, reduced to what routing needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub project_id: u64,
}

/// A user's explicit (un)subscription to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSubscription {
    pub user_id: u64,
    pub group_id: u64,
    pub project_id: u64,
    pub is_active: bool,
    pub reason: GroupSubscriptionReason,
    pub date_added: DateTime<Utc>,
}

impl GroupSubscription {
    pub fn new(
        user_id: u64,
        group: &Group,
        is_active: bool,
        reason: GroupSubscriptionReason,
    ) -> Self {
        Self {
            user_id,
            group_id: group.id,
            project_id: group.project_id,
            is_active,
            reason,
            date_added: Utc::now(),
        }
    }
}

/// Outcome of combining a subscription record with the layered settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionState {
    /// No subscription and notifications are turned off everywhere.
    pub is_disabled: bool,
    pub is_active: bool,
    pub subscription: Option<GroupSubscription>,
}

/// Subscription summary exposed next to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubscriptionDetails {
    Disabled { disabled: bool },
    Reason { reason: String },
}

/// Split a resolved state into the "is subscribed" flag and its details.
pub fn subscription_details(state: &SubscriptionState) -> (bool, Option<SubscriptionDetails>) {
    let details = if state.is_disabled {
        Some(SubscriptionDetails::Disabled { disabled: true })
    } else {
        state
            .subscription
            .as_ref()
            .filter(|subscription| subscription.is_active)
            .map(|subscription| SubscriptionDetails::Reason {
                reason: subscription.reason.api_name().to_string(),
            })
    };

    (state.is_active, details)
}
