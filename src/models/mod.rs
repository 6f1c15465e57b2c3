pub mod notification_type;
pub mod provider;
pub mod recipient;
pub mod row;
pub mod scope;
pub mod setting;
pub mod subscription;

// 重新导出常用类型
pub use notification_type::NotificationType;
pub use provider::Provider;
pub use recipient::Recipient;
pub use row::NotificationSettingRow;
pub use scope::{scope_for_type, scope_of, ScopeType};
pub use setting::{highest, is_valid, validate, ProviderValues, SettingValue, SettingsVersion};
pub use subscription::{
    reason_context, subscription_details, Group, GroupSubscription, GroupSubscriptionReason,
    SubscriptionDetails, SubscriptionState,
};
