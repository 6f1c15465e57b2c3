use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use crate::{
    config::ResolverConfig,
    error::{ResolverError, Result},
    models::{
        highest, is_valid, scope_for_type, NotificationSettingRow, NotificationType, Provider,
        ProviderValues, Recipient, ScopeType, SettingValue, SettingsVersion,
    },
    services::defaults::DefaultTable,
    utils::{ensure_resolved, merge_up},
};

/// (scope type, scope identifier) a setting is stored under.
pub type ScopeKey = (ScopeType, u64);

#[derive(Debug, Clone, Default)]
struct TypeLayers {
    by_recipient: HashMap<Recipient, HashMap<ScopeKey, ProviderValues>>,
    by_scope: HashMap<ScopeType, HashMap<u64, ProviderValues>>,
}

/// How raw rows are checked while building a [`SettingsIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    pub version: SettingsVersion,
    /// Fail the build on an invalid row instead of skipping it.
    pub strict: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            version: SettingsVersion::V1,
            strict: true,
        }
    }
}

impl From<&ResolverConfig> for IndexOptions {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            version: config.settings_version(),
            strict: config.strict_row_validation,
        }
    }
}

/// Explicit settings of one request, grouped by recipient and by scope.
#[derive(Debug, Clone, Default)]
pub struct SettingsIndex {
    layers: HashMap<NotificationType, TypeLayers>,
}

impl SettingsIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group unsorted rows into per-type lookup structures.
    ///
    /// Rows with a user or team are kept per recipient. Recipient-less
    /// PROJECT/ORGANIZATION rows are kept per scope and shared by everyone.
    /// DEFAULT values are replaced by the provider default before they are
    /// stored, so the index only ever holds concrete values.
    pub fn build<'r, I>(rows: I, defaults: &DefaultTable, options: IndexOptions) -> Result<Self>
    where
        I: IntoIterator<Item = &'r NotificationSettingRow>,
    {
        let mut index = Self::default();
        let mut stored = 0usize;

        for row in rows {
            let recipient = row.recipient()?;
            let scope_id = row.scope_id()?;
            let value = match row.value {
                SettingValue::Default => {
                    defaults.default_for(row.provider, row.notification_type, recipient.as_ref())
                }
                value => value,
            };

            if !is_valid(row.notification_type, value, options.version) {
                if options.strict {
                    return Err(ResolverError::InvalidValue {
                        notification_type: row.notification_type,
                        value,
                    });
                }
                warn!(
                    "Skipping invalid {} setting for {} {}: {} on {}",
                    row.notification_type, row.scope_type, scope_id, value, row.provider
                );
                continue;
            }

            let layers = index.layers.entry(row.notification_type).or_default();
            let values = match recipient {
                Some(recipient) => layers
                    .by_recipient
                    .entry(recipient)
                    .or_default()
                    .entry((row.scope_type, scope_id))
                    .or_default(),
                // no owner, applies to everyone under the scope
                None => layers
                    .by_scope
                    .entry(row.scope_type)
                    .or_default()
                    .entry(scope_id)
                    .or_default(),
            };
            values.insert(row.provider, value);
            stored += 1;
        }

        debug!("Indexed {} notification settings", stored);
        Ok(index)
    }

    /// Settings the recipient stored under `key`.
    pub fn recipient_values(
        &self,
        notification_type: NotificationType,
        recipient: &Recipient,
        key: ScopeKey,
    ) -> Option<&ProviderValues> {
        self.layers
            .get(&notification_type)?
            .by_recipient
            .get(recipient)?
            .get(&key)
    }

    /// Scope-wide settings, stored without a recipient.
    pub fn scope_values(
        &self,
        notification_type: NotificationType,
        scope_type: ScopeType,
        scope_id: u64,
    ) -> Option<&ProviderValues> {
        self.layers
            .get(&notification_type)?
            .by_scope
            .get(&scope_type)?
            .get(&scope_id)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Layers defaults, recipient settings and parent settings into effective values.
#[derive(Debug, Clone, Copy)]
pub struct SettingsResolver<'a> {
    defaults: &'a DefaultTable,
    index: &'a SettingsIndex,
}

impl<'a> SettingsResolver<'a> {
    pub fn new(defaults: &'a DefaultTable, index: &'a SettingsIndex) -> Self {
        Self { defaults, index }
    }

    pub fn defaults(&self) -> &'a DefaultTable {
        self.defaults
    }

    /// The recipient's own USER/TEAM settings.
    fn own_layer(
        &self,
        recipient: &Recipient,
        notification_type: NotificationType,
    ) -> Option<&'a ProviderValues> {
        let key = (recipient.scope_type(), recipient.id());
        self.index.recipient_values(notification_type, recipient, key)
    }

    /// Settings for the project or organization the notification belongs to:
    /// the recipient's own override, else the scope-wide row.
    fn parent_layer(
        &self,
        recipient: &Recipient,
        parent_id: u64,
        notification_type: NotificationType,
    ) -> Option<&'a ProviderValues> {
        let parent_scope = scope_for_type(notification_type);
        self.index
            .recipient_values(notification_type, recipient, (parent_scope, parent_id))
            .or_else(|| self.index.scope_values(notification_type, parent_scope, parent_id))
    }

    /// Effective value per provider after layering, least specific first.
    pub fn effective_values(
        &self,
        recipient: &Recipient,
        parent_id: u64,
        notification_type: NotificationType,
    ) -> Result<ProviderValues> {
        let defaults = self
            .defaults
            .defaults_by_provider(notification_type, Some(recipient));
        let empty = ProviderValues::new();

        let mut values = merge_up([
            &defaults,
            self.own_layer(recipient, notification_type).unwrap_or(&empty),
            self.parent_layer(recipient, parent_id, notification_type)
                .unwrap_or(&empty),
        ]);

        if notification_type.is_email_only() {
            for (provider, value) in values.iter_mut() {
                if *provider != Provider::Email {
                    *value = SettingValue::Never;
                }
            }
        }

        ensure_resolved(&values)?;
        debug!(
            "Resolved {} settings for {} in {}: {:?}",
            notification_type, recipient, parent_id, values
        );
        Ok(values)
    }

    /// Providers that must be notified regardless of any subscription.
    pub fn providers_enabled(
        &self,
        recipient: &Recipient,
        parent_id: u64,
        notification_type: NotificationType,
    ) -> Result<BTreeSet<Provider>> {
        let values = self.effective_values(recipient, parent_id, notification_type)?;
        Ok(broadcast_providers(&values))
    }

    /// Collapse the layered settings to one value.
    ///
    /// Parent-scoped values win over the recipient's own; with neither, the
    /// EMAIL default applies. `None` is an anonymous viewer.
    pub fn most_specific_value(
        &self,
        recipient: Option<&Recipient>,
        parent_id: u64,
        notification_type: NotificationType,
    ) -> Result<SettingValue> {
        let recipient = match recipient {
            Some(recipient) => recipient,
            None => {
                return Ok(self
                    .defaults
                    .default_for(Provider::Email, notification_type, None))
            }
        };

        if let Some(value) = self
            .parent_layer(recipient, parent_id, notification_type)
            .map(|values| highest(values.values().copied()))
            .transpose()?
            .flatten()
        {
            return Ok(value);
        }

        if let Some(value) = self
            .own_layer(recipient, notification_type)
            .map(|values| highest(values.values().copied()))
            .transpose()?
            .flatten()
        {
            return Ok(value);
        }

        Ok(self
            .defaults
            .default_for(Provider::Email, notification_type, Some(recipient)))
    }

    /// Value per provider for an explicit provider list, looked up provider
    /// by provider: parent scope, then own scope, then default.
    pub fn values_by_provider_for_type(
        &self,
        providers: &[Provider],
        recipient: &Recipient,
        parent_id: u64,
        notification_type: NotificationType,
    ) -> Result<ProviderValues> {
        let parent = self.parent_layer(recipient, parent_id, notification_type);
        let own = self.own_layer(recipient, notification_type);

        let values: ProviderValues = providers
            .iter()
            .map(|provider| {
                let value = parent
                    .and_then(|values| values.get(provider))
                    .or_else(|| own.and_then(|values| values.get(provider)))
                    .copied()
                    .unwrap_or_else(|| {
                        self.defaults
                            .default_for(*provider, notification_type, Some(recipient))
                    });
                (*provider, value)
            })
            .collect();

        ensure_resolved(&values)?;
        Ok(values)
    }
}

/// Providers whose effective value is exactly ALWAYS.
pub fn broadcast_providers(values: &ProviderValues) -> BTreeSet<Provider> {
    values
        .iter()
        .filter(|(_, value)| **value == SettingValue::Always)
        .map(|(provider, _)| *provider)
        .collect()
}
