use serde::{Deserialize, Serialize};
use std::env;

use crate::models::{Provider, SettingsVersion};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    // Logging
    pub log_level: String,

    // Feature flags
    pub notifications_v2: bool,

    // Row ingestion
    pub strict_row_validation: bool,

    // Providers a team can be routed to, given a linked identity
    pub team_providers: Vec<Provider>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            log_level: "notification_resolver=info".to_string(),
            notifications_v2: false,
            strict_row_validation: true,
            team_providers: vec![Provider::Slack],
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any variable source; unset keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(ResolverConfig {
            log_level: lookup("LOG_LEVEL")
                .unwrap_or_else(|| "notification_resolver=info".to_string()),

            notifications_v2: lookup("NOTIFICATIONS_V2")
                .unwrap_or_else(|| "false".to_string())
                .parse()?,

            strict_row_validation: lookup("STRICT_ROW_VALIDATION")
                .unwrap_or_else(|| "true".to_string())
                .parse()?,

            team_providers: lookup("TEAM_PROVIDERS")
                .unwrap_or_else(|| "slack".to_string())
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(|name| name.parse::<Provider>())
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    /// Default validity table version when no per-organization flag is known.
    pub fn settings_version(&self) -> SettingsVersion {
        SettingsVersion::from_flag(self.notifications_v2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.settings_version(), SettingsVersion::V1);
        assert!(config.strict_row_validation);
        assert_eq!(config.team_providers, vec![Provider::Slack]);
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = ResolverConfig::from_lookup(lookup(&[
            ("NOTIFICATIONS_V2", "true"),
            ("TEAM_PROVIDERS", "slack, msteams"),
        ]))
        .unwrap();

        assert_eq!(config.settings_version(), SettingsVersion::V2);
        assert_eq!(config.team_providers, vec![Provider::Slack, Provider::MsTeams]);
        assert!(config.strict_row_validation);
        assert_eq!(config.log_level, "notification_resolver=info");
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(ResolverConfig::from_lookup(lookup(&[("TEAM_PROVIDERS", "pager")])).is_err());
        assert!(ResolverConfig::from_lookup(lookup(&[("NOTIFICATIONS_V2", "maybe")])).is_err());
    }
}
