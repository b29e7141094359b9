//! Match configuration files.
//!
//! A config is JSON; every field is optional and falls back to the same
//! defaults as a fresh setup screen:
//!
//! ```json
//! {
//!   "format": "Overs",
//!   "overs_per_innings": 2,
//!   "wickets_per_innings": 3,
//!   "innings_per_side": 1,
//!   "players": ["Ann", "Bob"],
//!   "disabled_rules": ["6out"],
//!   "custom_rules": [{ "name": "Over the Fence", "runs": 10, "wickets": 1 }]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::rules::{default_special_rules, SpecialRule};
use crate::settings::{default_players, MatchFormat, MatchSettings};

/// A one-tap scoring action defined by the players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRuleConfig {
    pub name: String,
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub wickets: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub format: MatchFormat,
    pub overs_per_innings: u32,
    pub wickets_per_innings: u32,
    pub innings_per_side: usize,
    pub players: Vec<String>,
    /// Replaces the built-in rule catalogue when present.
    pub special_rules: Option<Vec<SpecialRule>>,
    pub enabled_rules: Vec<String>,
    pub disabled_rules: Vec<String>,
    pub custom_rules: Vec<CustomRuleConfig>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            format: MatchFormat::Overs,
            overs_per_innings: 5,
            wickets_per_innings: 10,
            innings_per_side: 1,
            players: default_players(),
            special_rules: None,
            enabled_rules: Vec::new(),
            disabled_rules: Vec::new(),
            custom_rules: Vec::new(),
        }
    }
}

impl MatchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading match config");
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Resolve the rule list: catalogue, toggles, then custom awards.
    pub fn rules(&self) -> Vec<SpecialRule> {
        let mut rules = self
            .special_rules
            .clone()
            .unwrap_or_else(default_special_rules);

        for rule in &mut rules {
            if self.enabled_rules.contains(&rule.id) {
                rule.enabled = true;
            }
            if self.disabled_rules.contains(&rule.id) {
                rule.enabled = false;
            }
        }
        for id in self.enabled_rules.iter().chain(&self.disabled_rules) {
            if !rules.iter().any(|r| &r.id == id) {
                warn!(rule = %id, "unknown rule id in config");
            }
        }

        for custom in &self.custom_rules {
            if custom.name.trim().is_empty() {
                warn!("skipping custom rule without a name");
                continue;
            }
            let rule = SpecialRule::custom(&custom.name, custom.runs, custom.wickets, &rules);
            rules.push(rule);
        }
        rules
    }

    /// Build validated settings and the trimmed player list.
    pub fn into_setup(self) -> Result<(MatchSettings, Vec<String>), ConfigError> {
        let players: Vec<String> = self.players.iter().map(|p| p.trim().to_string()).collect();
        let settings = MatchSettings::for_players(
            self.format,
            self.overs_per_innings,
            self.wickets_per_innings,
            self.innings_per_side,
            players.len(),
            self.rules(),
        );
        settings.validate_players(&players)?;
        Ok((settings, players))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SetupError;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn empty_config_uses_setup_defaults() {
        let config = MatchConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MatchConfig::default());

        let (settings, players) = config.into_setup().unwrap();
        assert_eq!(settings, MatchSettings::default());
        assert_eq!(players, vec!["Player 1", "Player 2"]);
    }

    #[test]
    fn full_config_builds_settings() {
        let config = MatchConfig::from_json_str(
            r#"{
                "format": "1v1",
                "overs_per_innings": 2,
                "wickets_per_innings": 3,
                "innings_per_side": 2,
                "players": [" Ann ", "Bob"],
                "enabled_rules": ["fence"],
                "disabled_rules": ["6out"],
                "custom_rules": [{ "name": "Over the Fence", "runs": 10, "wickets": 1 }]
            }"#,
        )
        .unwrap();

        let (settings, players) = config.into_setup().unwrap();
        assert_eq!(settings.format, MatchFormat::OneVsOne);
        assert_eq!(settings.number_of_innings, 4);
        assert_eq!(players, vec!["Ann", "Bob"]);
        assert!(!settings.rule("6out").unwrap().enabled);
        assert!(settings.rule("fence").unwrap().enabled);

        let custom: Vec<_> = settings.custom_awards().collect();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].id, "custom-1");
        assert_eq!(custom[0].award(), Some((10, 1)));
    }

    #[test]
    fn unnamed_custom_rules_are_skipped() {
        let config = MatchConfig {
            custom_rules: vec![CustomRuleConfig {
                name: "  ".to_string(),
                runs: 4,
                wickets: 0,
            }],
            ..MatchConfig::default()
        };
        assert_eq!(config.rules().len(), default_special_rules().len());
    }

    #[test]
    fn invalid_setup_surfaces_as_config_error() {
        let config = MatchConfig::from_json_str(r#"{ "players": ["Ann"] }"#).unwrap();
        match config.into_setup() {
            Err(ConfigError::Setup(SetupError::NotEnoughPlayers { found: 1 })) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn bad_json_is_reported() {
        assert!(matches!(
            MatchConfig::from_json_str(r#"{ "format": "Test" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("match.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{ "format": "Unlimited", "players": ["A", "B", "C"] }}"#).unwrap();
        drop(file);

        let config = MatchConfig::load(&path).unwrap();
        assert_eq!(config.format, MatchFormat::Unlimited);
        assert_eq!(config.players.len(), 3);

        let missing = dir.path().join("missing.json");
        assert!(matches!(MatchConfig::load(&missing), Err(ConfigError::Io(_))));
    }
}
