//! Notification settings resolution.
//!
//! Stored setting rows are layered over application defaults to answer, per
//! recipient and notification type, which providers deliver and whether the
//! recipient takes part in the conversation about an issue.
//!
//! ```ignore
//! let defaults = DefaultTable::shared();
//! let index = SettingsIndex::build(&rows, defaults, IndexOptions::default())?;
//! let resolver = SettingsResolver::new(defaults, &index);
//! let values =
//!     resolver.effective_values(&Recipient::User(1), project_id, NotificationType::Workflow)?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

pub use config::ResolverConfig;
pub use error::{ResolverError, Result};
pub use models::{
    Group, GroupSubscription, NotificationSettingRow, NotificationType, Provider, ProviderValues,
    Recipient, ScopeType, SettingValue, SettingsVersion, SubscriptionState,
};
pub use services::{
    resolve_group_subscriptions, should_participate, DefaultTable, IndexOptions, SettingsIndex,
    SettingsResolver,
};
