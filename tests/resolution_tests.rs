use maplit::btreemap;
use notification_resolver::{
    models::{
        scope_for_type,
        SettingValue::{Always, CommittedOnly, Never, Sometimes},
    },
    services::DefaultTable,
    utils::merge_up,
    IndexOptions, NotificationSettingRow, NotificationType, Provider, Recipient, ScopeType,
    SettingValue, SettingsIndex, SettingsResolver, SettingsVersion,
};
use proptest::prelude::*;

const PROJECT: u64 = 42;
const ORGANIZATION: u64 = 7;

fn any_type() -> impl Strategy<Value = NotificationType> {
    prop::sample::select(NotificationType::ALL.to_vec())
}

fn any_provider() -> impl Strategy<Value = Provider> {
    prop::sample::select(Provider::ALL.to_vec())
}

fn any_recipient() -> impl Strategy<Value = Recipient> {
    prop_oneof![
        (1u64..1000).prop_map(Recipient::User),
        (1u64..1000).prop_map(Recipient::Team),
    ]
}

fn on_or_off() -> impl Strategy<Value = SettingValue> {
    prop::sample::select(vec![Never, Always])
}

fn parent_id(notification_type: NotificationType) -> u64 {
    match scope_for_type(notification_type) {
        ScopeType::Project => PROJECT,
        _ => ORGANIZATION,
    }
}

fn lenient_v2() -> IndexOptions {
    IndexOptions {
        version: SettingsVersion::V2,
        strict: false,
    }
}

fn parent_row(
    recipient: Recipient,
    notification_type: NotificationType,
    provider: Provider,
    value: SettingValue,
) -> NotificationSettingRow {
    let scope_type = scope_for_type(notification_type);
    let scope_id = parent_id(notification_type);
    match recipient {
        Recipient::User(id) => NotificationSettingRow::for_user(
            id,
            scope_type,
            scope_id,
            provider,
            notification_type,
            value,
        ),
        Recipient::Team(id) => NotificationSettingRow::for_team(
            id,
            scope_type,
            scope_id,
            provider,
            notification_type,
            value,
        ),
    }
}

proptest! {
    #[test]
    fn team_defaults_are_never(t in any_type(), provider in any_provider(), team in 1u64..1000) {
        let value = DefaultTable::shared().default_for(provider, t, Some(&Recipient::Team(team)));
        prop_assert_eq!(value, Never);
    }

    #[test]
    fn anonymous_viewer_gets_email_default(t in any_type(), value in on_or_off()) {
        let defaults = DefaultTable::shared();
        let rows = vec![parent_row(Recipient::User(1), t, Provider::Email, value)];
        let index = SettingsIndex::build(&rows, defaults, lenient_v2()).unwrap();
        let resolver = SettingsResolver::new(defaults, &index);

        prop_assert_eq!(
            resolver.most_specific_value(None, parent_id(t), t).unwrap(),
            defaults.default_for(Provider::Email, t, None)
        );
    }

    #[test]
    fn no_rows_resolves_to_defaults(t in any_type(), recipient in any_recipient()) {
        let defaults = DefaultTable::shared();
        let index = SettingsIndex::empty();
        let resolver = SettingsResolver::new(defaults, &index);

        prop_assert_eq!(
            resolver.effective_values(&recipient, parent_id(t), t).unwrap(),
            defaults.defaults_by_provider(t, Some(&recipient))
        );
    }

    #[test]
    fn other_recipients_rows_do_not_leak(
        t in any_type(),
        provider in any_provider(),
        value in on_or_off(),
        recipient in any_recipient(),
        other in any_recipient(),
    ) {
        prop_assume!(recipient != other);
        let defaults = DefaultTable::shared();
        let rows = vec![parent_row(other, t, provider, value)];
        let index = SettingsIndex::build(&rows, defaults, lenient_v2()).unwrap();
        let resolver = SettingsResolver::new(defaults, &index);

        prop_assert_eq!(
            resolver.effective_values(&recipient, parent_id(t), t).unwrap(),
            defaults.defaults_by_provider(t, Some(&recipient))
        );
        prop_assert_eq!(
            resolver.most_specific_value(Some(&recipient), parent_id(t), t).unwrap(),
            defaults.default_for(Provider::Email, t, Some(&recipient))
        );
    }

    #[test]
    fn merging_defaults_alone_is_idempotent(t in any_type(), recipient in any_recipient()) {
        let row = DefaultTable::shared().defaults_by_provider(t, Some(&recipient));
        let once = merge_up([&row]);
        prop_assert_eq!(&once, &row);
        prop_assert_eq!(merge_up([&once, &once]), once);
    }
}

#[test]
fn project_row_beats_user_row_beats_default() {
    let defaults = DefaultTable::new(maplit::hashmap! {
        Provider::Email => maplit::hashmap! { NotificationType::Workflow => Never },
    });
    let rows = vec![
        NotificationSettingRow::for_user(
            1,
            ScopeType::User,
            1,
            Provider::Email,
            NotificationType::Workflow,
            Sometimes,
        ),
        NotificationSettingRow::for_user(
            1,
            ScopeType::Project,
            PROJECT,
            Provider::Email,
            NotificationType::Workflow,
            Always,
        ),
    ];
    let index = SettingsIndex::build(&rows, &defaults, IndexOptions::default()).unwrap();
    let resolver = SettingsResolver::new(&defaults, &index);
    let user = Recipient::User(1);

    let values = resolver
        .effective_values(&user, PROJECT, NotificationType::Workflow)
        .unwrap();
    assert_eq!(values[&Provider::Email], Always);

    // another project only sees the user-level row
    let values = resolver
        .effective_values(&user, PROJECT + 1, NotificationType::Workflow)
        .unwrap();
    assert_eq!(values[&Provider::Email], Sometimes);
}

#[test]
fn defined_parent_value_wins_even_when_less_permissive() {
    let defaults = DefaultTable::shared();
    let rows = vec![
        NotificationSettingRow::for_user(
            1,
            ScopeType::User,
            1,
            Provider::Slack,
            NotificationType::IssueAlerts,
            Always,
        ),
        NotificationSettingRow::for_user(
            1,
            ScopeType::Project,
            PROJECT,
            Provider::Slack,
            NotificationType::IssueAlerts,
            Never,
        ),
    ];
    let index = SettingsIndex::build(&rows, defaults, IndexOptions::default()).unwrap();
    let resolver = SettingsResolver::new(defaults, &index);

    let enabled = resolver
        .providers_enabled(&Recipient::User(1), PROJECT, NotificationType::IssueAlerts)
        .unwrap();
    assert!(!enabled.contains(&Provider::Slack));
    assert!(enabled.contains(&Provider::Email));
}

#[test]
fn one_index_serves_many_recipients() {
    let defaults = DefaultTable::shared();
    let deploy = NotificationType::Deploy;
    let rows = vec![
        NotificationSettingRow::for_scope(
            ScopeType::Organization,
            ORGANIZATION,
            Provider::Email,
            deploy,
            Never,
        ),
        NotificationSettingRow::for_scope(
            ScopeType::Organization,
            ORGANIZATION,
            Provider::Slack,
            deploy,
            Always,
        ),
        parent_row(Recipient::User(1), deploy, Provider::Email, Always),
        parent_row(Recipient::User(2), deploy, Provider::Slack, Never),
        parent_row(Recipient::Team(5), deploy, Provider::Slack, Always),
    ];
    let index = SettingsIndex::build(&rows, defaults, IndexOptions::default()).unwrap();
    let resolver = SettingsResolver::new(defaults, &index);
    let resolve = |recipient: Recipient, organization: u64| {
        resolver
            .effective_values(&recipient, organization, deploy)
            .unwrap()
    };

    assert_eq!(
        resolve(Recipient::User(1), ORGANIZATION),
        btreemap! {
            Provider::Email => Always,
            Provider::Slack => CommittedOnly,
            Provider::MsTeams => Never,
        }
    );
    assert_eq!(
        resolve(Recipient::User(2), ORGANIZATION),
        btreemap! {
            Provider::Email => CommittedOnly,
            Provider::Slack => Never,
            Provider::MsTeams => Never,
        }
    );
    assert_eq!(
        resolve(Recipient::Team(5), ORGANIZATION),
        btreemap! {
            Provider::Email => Never,
            Provider::Slack => Always,
            Provider::MsTeams => Never,
        }
    );

    // no overrides of their own: the organization-wide rows apply
    let shared = btreemap! {
        Provider::Email => Never,
        Provider::Slack => Always,
        Provider::MsTeams => Never,
    };
    assert_eq!(resolve(Recipient::User(3), ORGANIZATION), shared);
    assert_eq!(resolve(Recipient::Team(6), ORGANIZATION), shared);

    // and nothing reaches another organization
    assert_eq!(
        resolve(Recipient::User(1), ORGANIZATION + 1),
        defaults.defaults_by_provider(deploy, Some(&Recipient::User(1)))
    );
}

#[test]
fn reports_are_email_only_despite_overrides() {
    assert_eq!(
        scope_for_type(NotificationType::Reports),
        ScopeType::Organization
    );

    let defaults = DefaultTable::shared();
    let rows = vec![
        NotificationSettingRow::for_user(
            1,
            ScopeType::User,
            1,
            Provider::Slack,
            NotificationType::Reports,
            Always,
        ),
        NotificationSettingRow::for_user(
            1,
            ScopeType::Organization,
            ORGANIZATION,
            Provider::MsTeams,
            NotificationType::Reports,
            Always,
        ),
    ];
    let options = IndexOptions {
        version: SettingsVersion::V2,
        strict: true,
    };
    let index = SettingsIndex::build(&rows, defaults, options).unwrap();
    let resolver = SettingsResolver::new(defaults, &index);

    let values = resolver
        .effective_values(&Recipient::User(1), ORGANIZATION, NotificationType::Reports)
        .unwrap();
    assert_eq!(values[&Provider::Email], Always);
    assert_eq!(values[&Provider::Slack], Never);
    assert_eq!(values[&Provider::MsTeams], Never);
}

#[test]
fn reports_rows_are_rejected_by_v1_validity() {
    let rows = vec![NotificationSettingRow::for_user(
        1,
        ScopeType::User,
        1,
        Provider::Email,
        NotificationType::Reports,
        Always,
    )];
    let result = SettingsIndex::build(&rows, DefaultTable::shared(), IndexOptions::default());
    assert!(result.is_err());

    let lenient = IndexOptions {
        version: SettingsVersion::V1,
        strict: false,
    };
    let index = SettingsIndex::build(&rows, DefaultTable::shared(), lenient).unwrap();
    assert!(index.is_empty());
}

#[test]
fn default_rows_fall_back_to_provider_default() {
    let defaults = DefaultTable::shared();
    let rows = vec![NotificationSettingRow::for_team(
        5,
        ScopeType::Team,
        5,
        Provider::Slack,
        NotificationType::Deploy,
        SettingValue::Default,
    )];
    let index = SettingsIndex::build(&rows, defaults, IndexOptions::default()).unwrap();
    let resolver = SettingsResolver::new(defaults, &index);

    let values = resolver
        .effective_values(&Recipient::Team(5), ORGANIZATION, NotificationType::Deploy)
        .unwrap();
    assert!(values.values().all(|value| *value == Never));
}

#[test]
fn recipient_less_rows_need_a_parent_scope() {
    let mut row = NotificationSettingRow::for_user(
        1,
        ScopeType::User,
        1,
        Provider::Email,
        NotificationType::Workflow,
        Always,
    );
    row.user_id = None;
    assert!(SettingsIndex::build([&row], DefaultTable::shared(), IndexOptions::default()).is_err());
}
