use std::collections::{BTreeSet, HashSet};

use crate::{
    config::ResolverConfig,
    models::{Provider, Recipient},
    services::defaults::DefaultTable,
};

/// Linked chat identities, as reported by the identity service.
pub trait LinkedIdentities {
    fn linked_providers(&self, recipient: &Recipient) -> HashSet<Provider>;
}

/// Which recipients a provider can reach at all.
#[derive(Debug, Clone)]
pub struct IdentityPolicy {
    team_providers: Vec<Provider>,
}

impl IdentityPolicy {
    pub fn new(team_providers: Vec<Provider>) -> Self {
        Self { team_providers }
    }

    /// Providers a user can be notified on: every linked provider the
    /// default table knows, plus email which needs no link.
    pub fn providers_for_recipient<L>(
        &self,
        identities: &L,
        defaults: &DefaultTable,
        user_id: u64,
    ) -> BTreeSet<Provider>
    where
        L: LinkedIdentities + ?Sized,
    {
        let known = defaults.providers();
        let mut providers: BTreeSet<Provider> = identities
            .linked_providers(&Recipient::User(user_id))
            .into_iter()
            .filter(|provider| known.contains(provider))
            .collect();
        providers.insert(Provider::Email);
        providers
    }

    /// Teams can only be notified on a team provider they have linked.
    pub fn team_is_valid_recipient<L>(
        &self,
        identities: &L,
        team_id: u64,
        provider: Provider,
    ) -> bool
    where
        L: LinkedIdentities + ?Sized,
    {
        if !self.team_providers.contains(&provider) {
            return false;
        }
        identities
            .linked_providers(&Recipient::Team(team_id))
            .contains(&provider)
    }
}

impl Default for IdentityPolicy {
    fn default() -> Self {
        Self::new(vec![Provider::Slack])
    }
}

impl From<&ResolverConfig> for IdentityPolicy {
    fn from(config: &ResolverConfig) -> Self {
        Self::new(config.team_providers.clone())
    }
}
