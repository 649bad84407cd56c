use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eval::{ApprovalPolicy, Classifier};
use crate::rules::{RuleDef, RuleError, RuleExtensions, RuleSet};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Overrides the user config path.
pub const CONFIG_PATH_ENV: &str = "AGENT_RISKGATE_CONFIG";
/// Overrides `settings.approval_policy`.
pub const POLICY_ENV: &str = "AGENT_RISKGATE_POLICY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid rule: {0}")]
    Rules(#[from] RuleError),
}

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub shell: RuleSection,
    #[serde(default)]
    pub file: RuleSection,
    #[serde(default)]
    pub git: RuleSection,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Settings {
    /// Kept as text: unknown names resolve to `always_ask` at use time.
    #[serde(default)]
    pub approval_policy: String,
    #[serde(default)]
    pub log_level: String,
}

/// Extra rules for one category, appended after the built-ins.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct RuleSection {
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct NetworkConfig {
    /// Hosts (and their subdomains) that may receive payloads without a warning.
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    shell: RuleSectionOverlay,
    #[serde(default)]
    file: RuleSectionOverlay,
    #[serde(default)]
    git: RuleSectionOverlay,
    #[serde(default)]
    network: NetworkOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    approval_policy: Option<String>,
    log_level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RuleSectionOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    rules: Vec<RuleDef>,
}

#[derive(Debug, Deserialize, Default)]
struct NetworkOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    allowed_hosts: Vec<String>,
    #[serde(default)]
    remove_allowed_hosts: Vec<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list<T: PartialEq>(base: &mut Vec<T>, add: Vec<T>, remove: &[T], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

/// Resolve a policy name; anything unknown falls back to `always_ask`.
pub fn resolve_policy(name: &str) -> ApprovalPolicy {
    ApprovalPolicy::from_name(name.trim()).unwrap_or_else(|| {
        log::warn!("unknown approval policy {name:?}, using always_ask");
        ApprovalPolicy::AlwaysAsk
    })
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge the user overlay (if the file exists)
    /// 3. Apply `AGENT_RISKGATE_POLICY`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::overlay_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default_config(),
        };
        config.apply_policy_override(std::env::var(POLICY_ENV).ok());
        Ok(config)
    }

    /// Like [`Config::load`], but a broken overlay falls back to the defaults.
    ///
    /// `AGENT_RISKGATE_POLICY` applies either way; the load error is handed
    /// back for logging.
    pub fn load_or_default() -> (Self, Option<ConfigError>) {
        Self::or_default(Self::load(), std::env::var(POLICY_ENV).ok())
    }

    fn or_default(
        loaded: Result<Self, ConfigError>,
        policy_env: Option<String>,
    ) -> (Self, Option<ConfigError>) {
        match loaded {
            Ok(config) => (config, None),
            Err(e) => {
                let mut config = Self::default_config();
                config.apply_policy_override(policy_env);
                (config, Some(e))
            }
        }
    }

    /// Replace the configured policy name with a non-empty override.
    fn apply_policy_override(&mut self, policy: Option<String>) {
        if let Some(policy) = policy.filter(|p| !p.is_empty()) {
            self.settings.approval_policy = policy;
        }
    }

    /// Defaults merged with the overlay at `path`. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default_config();
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(config),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        config.apply_overlay_str(&content)?;
        Ok(config)
    }

    /// `$AGENT_RISKGATE_CONFIG` (tilde and env expanded), else
    /// `~/.config/agent-riskgate/config.toml`.
    fn overlay_path() -> Option<PathBuf> {
        if let Ok(raw) = std::env::var(CONFIG_PATH_ENV)
            && !raw.is_empty()
        {
            let expanded = shellexpand::full(&raw)
                .map(|s| s.into_owned())
                .unwrap_or(raw);
            return Some(PathBuf::from(expanded));
        }
        let home = std::env::var_os("HOME")?;
        Some(Path::new(&home).join(".config/agent-riskgate/config.toml"))
    }

    /// Apply an overlay from a TOML string.
    pub fn apply_overlay_str(&mut self, toml_str: &str) -> Result<(), ConfigError> {
        let overlay: ConfigOverlay = toml::from_str(toml_str)?;
        self.apply_overlay(overlay);
        Ok(())
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Settings: scalar overrides
        if let Some(v) = overlay.settings.approval_policy {
            self.settings.approval_policy = v;
        }
        if let Some(v) = overlay.settings.log_level {
            self.settings.log_level = v;
        }

        // Extra rules
        for (section, o) in [
            (&mut self.shell, overlay.shell),
            (&mut self.file, overlay.file),
            (&mut self.git, overlay.git),
        ] {
            merge_list(&mut section.rules, o.rules, &[], o.replace);
        }

        // Network
        let n = overlay.network;
        merge_list(
            &mut self.network.allowed_hosts,
            n.allowed_hosts,
            &n.remove_allowed_hosts,
            n.replace,
        );
    }

    /// The configured policy, falling back to `always_ask` for unknown names.
    pub fn approval_policy(&self) -> ApprovalPolicy {
        resolve_policy(&self.settings.approval_policy)
    }

    /// The configured log level; unknown names mean `warn`.
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(self.settings.log_level.trim()).unwrap_or(LevelFilter::Warn)
    }

    /// Compile the built-in tables plus this config's extra rules.
    ///
    /// Bad patterns are rejected here, before any classification happens.
    pub fn rule_set(&self) -> Result<RuleSet, RuleError> {
        RuleSet::with_extra(&RuleExtensions {
            shell: &self.shell.rules,
            file: &self.file.rules,
            git: &self.git.rules,
            allowed_hosts: Some(&self.network.allowed_hosts),
        })
    }

    pub fn build_classifier(&self) -> Result<Classifier, ConfigError> {
        Ok(Classifier::new(self.rule_set()?))
    }
}
