use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use crate::{
    error::Result,
    models::{
        highest, Group, GroupSubscription, NotificationType, Provider, ProviderValues, Recipient,
        SettingValue, SubscriptionState,
    },
    services::aggregator::SettingsResolver,
};

/// Source of per-provider effective values.
///
/// Batch resolution goes through this seam so the aggregate cost can be
/// observed independently of the layering itself.
#[cfg_attr(test, mockall::automock)]
pub trait ProviderValueSource {
    fn effective_values(
        &self,
        recipient: &Recipient,
        parent_id: u64,
        notification_type: NotificationType,
    ) -> Result<ProviderValues>;

    fn most_specific_value(
        &self,
        recipient: Option<Recipient>,
        parent_id: u64,
        notification_type: NotificationType,
    ) -> Result<SettingValue>;
}

impl ProviderValueSource for SettingsResolver<'_> {
    fn effective_values(
        &self,
        recipient: &Recipient,
        parent_id: u64,
        notification_type: NotificationType,
    ) -> Result<ProviderValues> {
        SettingsResolver::effective_values(self, recipient, parent_id, notification_type)
    }

    fn most_specific_value(
        &self,
        recipient: Option<Recipient>,
        parent_id: u64,
        notification_type: NotificationType,
    ) -> Result<SettingValue> {
        SettingsResolver::most_specific_value(
            self,
            recipient.as_ref(),
            parent_id,
            notification_type,
        )
    }
}

/// Decide whether a recipient takes part in a conversation about an issue.
///
/// An explicit unsubscribe always wins. Without a subscription record only
/// ALWAYS opts in; SOMETIMES needs an active subscription.
pub fn should_participate(subscription: Option<&GroupSubscription>, value: SettingValue) -> bool {
    match subscription {
        Some(subscription) => subscription.is_active && value != SettingValue::Never,
        None => value == SettingValue::Always,
    }
}

/// WORKFLOW providers on which the recipient participates in this issue.
pub fn where_should_be_participating<S>(
    source: &S,
    recipient: &Recipient,
    subscription: Option<&GroupSubscription>,
    parent_id: u64,
) -> Result<BTreeSet<Provider>>
where
    S: ProviderValueSource + ?Sized,
{
    let values = source.effective_values(recipient, parent_id, NotificationType::Workflow)?;
    Ok(values
        .into_iter()
        .filter(|(_, value)| should_participate(subscription, *value))
        .map(|(provider, _)| provider)
        .collect())
}

/// Issues keyed by the project that owns them.
pub type GroupsByProject = BTreeMap<u64, BTreeSet<Group>>;

/// Group issues by the project that owns them, dropping repeats.
pub fn collect_groups_by_project<I>(groups: I) -> GroupsByProject
where
    I: IntoIterator<Item = Group>,
{
    let mut projects = GroupsByProject::new();
    for group in groups {
        projects.entry(group.project_id).or_default().insert(group);
    }
    projects
}

/// Subscription state of a user for every group, in one pass per project.
///
/// WORKFLOW values are resolved once per project and shared by all of its
/// groups. A subscription record, when present, overrides the settings.
pub fn resolve_group_subscriptions<S>(
    source: &S,
    groups_by_project: &GroupsByProject,
    subscriptions_by_group: &HashMap<u64, GroupSubscription>,
    user_id: u64,
) -> Result<HashMap<u64, SubscriptionState>>
where
    S: ProviderValueSource + ?Sized,
{
    let recipient = Recipient::User(user_id);
    let mut results = HashMap::new();

    for (project_id, groups) in groups_by_project {
        let values = source.effective_values(&recipient, *project_id, NotificationType::Workflow)?;
        for group in groups {
            let state = subscription_state(subscriptions_by_group.get(&group.id), &values)?;
            results.insert(group.id, state);
        }
    }

    debug!(
        "Resolved subscriptions of user {} for {} groups in {} projects",
        user_id,
        results.len(),
        groups_by_project.len()
    );
    Ok(results)
}

fn subscription_state(
    subscription: Option<&GroupSubscription>,
    values: &ProviderValues,
) -> Result<SubscriptionState> {
    if let Some(subscription) = subscription {
        return Ok(SubscriptionState {
            is_disabled: false,
            is_active: subscription.is_active,
            subscription: Some(subscription.clone()),
        });
    }

    let state = match highest(values.values().copied())? {
        // notifications are off in all cases
        Some(SettingValue::Never) => SubscriptionState {
            is_disabled: true,
            is_active: false,
            subscription: None,
        },
        value => SubscriptionState {
            is_disabled: false,
            is_active: value == Some(SettingValue::Always),
            subscription: None,
        },
    };
    Ok(state)
}

/// Groups whose project still allows WORKFLOW notifications for the user.
pub fn groups_for_query<S>(
    source: &S,
    groups_by_project: &GroupsByProject,
    user_id: u64,
) -> Result<Vec<Group>>
where
    S: ProviderValueSource + ?Sized,
{
    let recipient = Recipient::User(user_id);
    let mut output = Vec::new();
    for (project_id, groups) in groups_by_project {
        let value =
            source.most_specific_value(Some(recipient), *project_id, NotificationType::Workflow)?;
        if value != SettingValue::Never {
            output.extend(groups.iter().copied());
        }
    }
    Ok(output)
}
