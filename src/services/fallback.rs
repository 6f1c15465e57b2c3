use std::collections::{BTreeMap, HashMap};

use crate::{
    models::{
        scope_for_type, NotificationType, Provider, ProviderValues, Recipient, ScopeType,
        SettingValue,
    },
    services::defaults::DefaultTable,
};

/// type → scope → scope id → provider → value name
pub type FallbackSettings =
    BTreeMap<String, BTreeMap<String, BTreeMap<u64, BTreeMap<String, String>>>>;

/// Pivot scope-keyed settings to provider-keyed settings.
pub fn settings_by_provider(
    settings: &HashMap<ScopeType, ProviderValues>,
) -> BTreeMap<Provider, BTreeMap<ScopeType, SettingValue>> {
    let mut output: BTreeMap<Provider, BTreeMap<ScopeType, SettingValue>> = BTreeMap::new();
    for (scope_type, values) in settings {
        for (provider, value) in values {
            output.entry(*provider).or_default().insert(*scope_type, *value);
        }
    }
    output
}

/// Implied settings for a recipient without explicit rows.
///
/// Parent scopes are filled with `default` so explicit rows can be laid over
/// them; the recipient's own scope carries the concrete provider defaults.
pub fn fallback_settings(
    defaults: &DefaultTable,
    types: &[NotificationType],
    project_ids: &[u64],
    organization_ids: &[u64],
    recipient: Option<&Recipient>,
) -> FallbackSettings {
    let mut data = FallbackSettings::new();
    let inherit = SettingValue::Default.as_str().to_string();

    for notification_type in types {
        let scope_type = scope_for_type(*notification_type);
        let parent_ids = match scope_type {
            ScopeType::Project => project_ids,
            _ => organization_ids,
        };
        let by_scope = data.entry(notification_type.as_str().to_string()).or_default();

        for provider in defaults.providers() {
            for parent_id in parent_ids {
                by_scope
                    .entry(scope_type.as_str().to_string())
                    .or_default()
                    .entry(*parent_id)
                    .or_default()
                    .insert(provider.as_str().to_string(), inherit.clone());
            }

            if let Some(recipient) = recipient {
                // each provider has its own defaults by type
                let value = defaults.default_for(provider, *notification_type, Some(recipient));
                by_scope
                    .entry(recipient.scope_type().as_str().to_string())
                    .or_default()
                    .entry(recipient.id())
                    .or_default()
                    .insert(provider.as_str().to_string(), value.as_str().to_string());
            }
        }
    }
    data
}
