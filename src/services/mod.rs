pub mod aggregator;
pub mod defaults;
pub mod fallback;
pub mod identity;
pub mod participation;

// 重新导出常用类型
pub use aggregator::{broadcast_providers, IndexOptions, ScopeKey, SettingsIndex, SettingsResolver};
pub use defaults::DefaultTable;
pub use fallback::{fallback_settings, settings_by_provider, FallbackSettings};
pub use identity::{IdentityPolicy, LinkedIdentities};
pub use participation::{
    collect_groups_by_project, groups_for_query, resolve_group_subscriptions, should_participate,
    where_should_be_participating, GroupsByProject, ProviderValueSource,
};
