use maplit::hashmap;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::models::{NotificationType, Provider, ProviderValues, Recipient, SettingValue};

type TypeDefaults = HashMap<NotificationType, SettingValue>;

/// Baseline of an on-by-default provider.
static ALL_SOMETIMES: Lazy<TypeDefaults> = Lazy::new(|| {
    use NotificationType::*;
    use SettingValue::*;

    hashmap! {
        Deploy => CommittedOnly,
        IssueAlerts => Always,
        Workflow => Sometimes,
        Approval => Always,
        Quota => Always,
        QuotaErrors => Always,
        QuotaTransactions => Always,
        QuotaAttachments => Always,
        QuotaReplays => Always,
        QuotaWarnings => Always,
        QuotaSpendAllocations => Always,
        SpikeProtection => Always,
        Reports => Always,
    }
});

static ALL_NEVER: Lazy<TypeDefaults> = Lazy::new(|| {
    NotificationType::ALL
        .into_iter()
        .map(|t| (t, SettingValue::Never))
        .collect()
});

static SHARED: Lazy<DefaultTable> = Lazy::new(DefaultTable::standard);

/// Application-wide default value per provider and type.
///
/// Built once and read-only afterwards; share it by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultTable {
    table: HashMap<Provider, TypeDefaults>,
}

impl DefaultTable {
    pub fn new(table: HashMap<Provider, HashMap<NotificationType, SettingValue>>) -> Self {
        Self { table }
    }

    /// Email and Slack are on by default, so users who link a Slack identity
    /// start receiving Slack notifications. MS Teams is opt-in.
    pub fn standard() -> Self {
        info!("Building notification default table");
        Self::new(hashmap! {
            Provider::Email => ALL_SOMETIMES.clone(),
            Provider::Slack => ALL_SOMETIMES.clone(),
            Provider::MsTeams => ALL_NEVER.clone(),
        })
    }

    /// Process-wide standard table, built on first use.
    pub fn shared() -> &'static DefaultTable {
        &SHARED
    }

    /// Providers the table knows about, in a stable order.
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.table.keys().copied().collect();
        providers.sort();
        providers
    }

    pub fn default_for(
        &self,
        provider: Provider,
        notification_type: NotificationType,
        recipient: Option<&Recipient>,
    ) -> SettingValue {
        // every team default is off
        if let Some(Recipient::Team(_)) = recipient {
            return SettingValue::Never;
        }
        if notification_type.is_email_only() && provider != Provider::Email {
            return SettingValue::Never;
        }
        self.table
            .get(&provider)
            .and_then(|by_type| by_type.get(&notification_type))
            .copied()
            .unwrap_or(SettingValue::Never)
    }

    /// Default value of every known provider for one type.
    pub fn defaults_by_provider(
        &self,
        notification_type: NotificationType,
        recipient: Option<&Recipient>,
    ) -> ProviderValues {
        self.table
            .keys()
            .map(|provider| {
                (*provider, self.default_for(*provider, notification_type, recipient))
            })
            .collect()
    }

    /// Providers that are on by default, used to seed settings screens.
    pub fn provider_defaults(&self) -> Vec<Provider> {
        self.providers()
            .into_iter()
            .filter(|provider| self.table.get(provider) == Some(&*ALL_SOMETIMES))
            .collect()
    }

    /// Default for a provider when only on/off-by-default providers matter.
    pub fn default_for_provider_v2(
        &self,
        notification_type: NotificationType,
        provider: Provider,
    ) -> SettingValue {
        if !self.provider_defaults().contains(&provider) {
            return SettingValue::Never;
        }
        if notification_type.is_email_only() && provider != Provider::Email {
            // Reports are only sent to email
            return SettingValue::Never;
        }
        ALL_SOMETIMES
            .get(&notification_type)
            .copied()
            .unwrap_or(SettingValue::Never)
    }

    /// What an on-by-default provider resolves to for each type.
    pub fn type_defaults() -> BTreeMap<NotificationType, SettingValue> {
        ALL_SOMETIMES.iter().map(|(t, v)| (*t, *v)).collect()
    }
}

impl Default for DefaultTable {
    fn default() -> Self {
        Self::standard()
    }
}
