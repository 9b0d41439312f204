use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use dispatch_core::{PolicyKind, ResponderRegistry, SelectionPolicy};

pub const DEFAULT_ALERT_MESSAGE: &str = "Emergency reported";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub roster: RosterConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub alert: AlertConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RosterConfig {
    pub responders: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SelectionConfig {
    #[serde(default)]
    pub policy: PolicyKind,
    /// Only read by the `random` policy.
    #[serde(default)]
    pub seed: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AlertConfig {
    pub message: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self { message: DEFAULT_ALERT_MESSAGE.to_string() }
    }
}

impl Config {
    pub fn default_for_roster<I, S>(responders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roster: RosterConfig { responders: responders.into_iter().map(Into::into).collect() },
            selection: SelectionConfig::default(),
            alert: AlertConfig::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Duplicate roster names are kept once and logged.
    pub fn registry(&self) -> ResponderRegistry {
        let registry = ResponderRegistry::with_responders(self.roster.responders.iter().map(String::as_str));
        if registry.len() < self.roster.responders.len() {
            warn!(
                listed = self.roster.responders.len(),
                unique = registry.len(),
                "duplicate responders in roster ignored"
            );
        }
        registry
    }

    pub fn policy(&self) -> Box<dyn SelectionPolicy> {
        self.selection.policy.build(self.selection.seed)
    }

    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join("dispatch.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_fills_defaults() {
        let cfg: Config = toml::from_str("[roster]\nresponders = [\"Joe\", \"Lamar\"]\n").unwrap();
        assert_eq!(cfg.selection.policy, PolicyKind::Random);
        assert_eq!(cfg.selection.seed, 0);
        assert_eq!(cfg.alert.message, DEFAULT_ALERT_MESSAGE);
        assert_eq!(cfg.registry().len(), 2);
    }

    #[test]
    fn duplicate_roster_names_collapse() {
        let cfg = Config::default_for_roster(["Joe", "Lamar", "Joe"]);
        let reg = cfg.registry();
        assert_eq!(reg.len(), 2);
        assert!(reg.all_available());
    }

    #[test]
    fn policy_names_are_snake_case() {
        let cfg: Config =
            toml::from_str("[roster]\nresponders = []\n[selection]\npolicy = \"severity_index\"\n").unwrap();
        assert_eq!(cfg.selection.policy, PolicyKind::SeverityIndex);
        assert_eq!(cfg.policy().name(), "severity_index");
        assert!(toml::from_str::<Config>("[roster]\nresponders = []\n[selection]\npolicy = \"nearest\"\n").is_err());
    }
}
