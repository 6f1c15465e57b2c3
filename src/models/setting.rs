use maplit::{hashmap, hashset};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{ResolverError, Result};
use crate::models::{NotificationType, Provider};

/// Resolved setting value per provider.
pub type ProviderValues = BTreeMap<Provider, SettingValue>;

/// 通知设置值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingValue {
    /// Stored "use the default": replaced by the provider default for the
    /// row's recipient when the settings index is built, so it never reaches
    /// layering. A DEFAULT row still shadows less specific layers.
    Default,
    Never,
    /// Deploys only: notify when the release contains the recipient's commits.
    CommittedOnly,
    /// Only notify for entities the recipient is subscribed to.
    #[serde(rename = "subscribe_only")]
    Sometimes,
    Always,
}

impl SettingValue {
    pub const ALL: [SettingValue; 5] = [
        SettingValue::Default,
        SettingValue::Never,
        SettingValue::CommittedOnly,
        SettingValue::Sometimes,
        SettingValue::Always,
    ];

    pub fn code(self) -> i32 {
        match self {
            Self::Default => 0,
            Self::Never => 10,
            Self::Always => 20,
            Self::Sometimes => 30,
            Self::CommittedOnly => 40,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Never => "never",
            Self::CommittedOnly => "committed_only",
            Self::Sometimes => "subscribe_only",
            Self::Always => "always",
        }
    }

    /// Rank used to pick the strongest of several values. `Default` has no
    /// rank because it must be resolved against the default table first.
    pub fn specificity(self) -> Option<u8> {
        match self {
            Self::Default => None,
            Self::Never => Some(0),
            Self::CommittedOnly => Some(1),
            Self::Sometimes => Some(2),
            Self::Always => Some(3),
        }
    }

    pub fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i32> for SettingValue {
    type Error = ResolverError;

    fn try_from(code: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.code() == code)
            .ok_or_else(|| ResolverError::UnknownSettingValue(code.to_string()))
    }
}

impl FromStr for SettingValue {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| ResolverError::UnknownSettingValue(s.to_string()))
    }
}

/// Strongest value of the set, or `None` when the set is empty.
///
/// Non-`Never` values are locked together across providers today, so picking
/// the strongest is the same as picking the most specific one.
pub fn highest<I>(values: I) -> Result<Option<SettingValue>>
where
    I: IntoIterator<Item = SettingValue>,
{
    let mut best: Option<(u8, SettingValue)> = None;
    for value in values {
        let rank = value.specificity().ok_or_else(|| {
            ResolverError::integrity("DEFAULT value reached specificity comparison")
        })?;
        if best.map_or(true, |(current, _)| rank > current) {
            best = Some((rank, value));
        }
    }
    Ok(best.map(|(_, value)| value))
}

/// Which generation of the validity table governs a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsVersion {
    #[default]
    V1,
    V2,
}

impl SettingsVersion {
    /// Map the organization-level v2 feature toggle to a table version.
    pub fn from_flag(use_v2: bool) -> Self {
        if use_v2 {
            Self::V2
        } else {
            Self::V1
        }
    }
}

type ValidityTable = HashMap<NotificationType, HashSet<SettingValue>>;

static VALID_VALUES_V1: Lazy<ValidityTable> = Lazy::new(|| {
    use NotificationType::*;
    use SettingValue::*;

    let on_off = hashset![Always, Never];
    hashmap! {
        Approval => on_off.clone(),
        Deploy => hashset![Always, CommittedOnly, Never],
        IssueAlerts => on_off.clone(),
        Quota => on_off.clone(),
        QuotaErrors => on_off.clone(),
        QuotaTransactions => on_off.clone(),
        QuotaAttachments => on_off.clone(),
        QuotaReplays => on_off.clone(),
        QuotaWarnings => on_off.clone(),
        QuotaSpendAllocations => on_off.clone(),
        Workflow => hashset![Always, Sometimes, Never],
        SpikeProtection => on_off,
    }
});

static VALID_VALUES_V2: Lazy<ValidityTable> = Lazy::new(|| {
    let mut table = VALID_VALUES_V1.clone();
    table.insert(
        NotificationType::Reports,
        hashset![SettingValue::Always, SettingValue::Never],
    );
    table
});

/// True if `value` may be stored for `notification_type` under `version`.
pub fn is_valid(
    notification_type: NotificationType,
    value: SettingValue,
    version: SettingsVersion,
) -> bool {
    let table = match version {
        SettingsVersion::V1 => &*VALID_VALUES_V1,
        SettingsVersion::V2 => &*VALID_VALUES_V2,
    };
    table
        .get(&notification_type)
        .map_or(false, |allowed| allowed.contains(&value))
}

pub fn validate(
    notification_type: NotificationType,
    value: SettingValue,
    version: SettingsVersion,
) -> Result<()> {
    if is_valid(notification_type, value, version) {
        Ok(())
    } else {
        Err(ResolverError::InvalidValue {
            notification_type,
            value,
        })
    }
}
