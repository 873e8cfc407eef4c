/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bpaf::Bpaf;
use log::warn;
use serde::{Deserialize, Serialize};
use thoughtmarks_core::{EnvironmentMode, StyleMap, ThemeGroup};

use crate::registries::atomic::diagnostics::ChannelConfig;
use crate::registries::atomic::theme::THEME_ID_LIGHT;
use crate::registries::domain::presentation::StyleLayers;
use crate::shell::desktop::runtime::environment::{
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_STORAGE_KEY, EnvironmentStoreConfig,
};

pub const CONFIG_DIR_NAME: &str = "thoughtmarks";
pub const CONFIG_FILE_NAME: &str = "shell.toml";

pub const ENV_DATA_DIR: &str = "THOUGHTMARKS_DATA_DIR";
pub const ENV_USE_NEXTGEN: &str = "THOUGHTMARKS_USE_NEXTGEN";
pub const ENV_DEV_MODE: &str = "THOUGHTMARKS_DEV_MODE";
pub const ENV_LOG: &str = "THOUGHTMARKS_LOG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Keyed by theme group name (`nav`, `functional`, ...).
    pub groups: BTreeMap<String, StyleMap>,
    /// page name -> role name -> overrides
    pub pages: BTreeMap<String, BTreeMap<String, StyleMap>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub channels: BTreeMap<String, ChannelConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub data_dir: Option<PathBuf>,
    pub storage_key: String,
    /// Pre-hydration seed only; stored state always wins once hydrated.
    pub seed: EnvironmentMode,
    /// Defaults to on for debug builds.
    pub dev_mode: Option<bool>,
    pub theme: String,
    pub retry_attempts: usize,
    pub retry_delay_ms: u64,
    pub style: StyleConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed: EnvironmentMode::Legacy,
            dev_mode: None,
            theme: THEME_ID_LIGHT.to_string(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: 1000,
            style: StyleConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "failed to read {}: {message}", path.display())
            }
            ConfigError::Parse { path, message } => {
                write!(f, "failed to parse {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl ShellConfig {
    /// Reads `path`, or the per-user default location. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            return Ok(Self::default());
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_toml_str(&text).map_err(|message| ConfigError::Parse {
                path: path.clone(),
                message,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io {
                path,
                message: e.to_string(),
            }),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("{e}"))
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = get(ENV_DATA_DIR).filter(|value| !value.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(value) = get(ENV_USE_NEXTGEN) {
            match EnvironmentMode::from_nextgen_flag(&value) {
                Some(seed) => self.seed = seed,
                None => warn!("{ENV_USE_NEXTGEN} invalid ('{value}'); keeping seed {}", self.seed),
            }
        }
        if let Some(value) = get(ENV_DEV_MODE) {
            match parse_flag(&value) {
                Some(enabled) => self.dev_mode = Some(enabled),
                None => warn!("{ENV_DEV_MODE} invalid ('{value}'); ignoring"),
            }
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(CONFIG_DIR_NAME)
        })
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode.unwrap_or(cfg!(debug_assertions))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn store_config(&self) -> EnvironmentStoreConfig {
        EnvironmentStoreConfig {
            storage_key: self.storage_key.clone(),
            seed: self.seed,
            retry_attempts: self.retry_attempts,
            retry_delay: self.retry_delay(),
        }
    }

    /// Unknown group names are skipped with a warning.
    pub fn style_layers(&self) -> StyleLayers {
        let mut groups = BTreeMap::new();
        for (name, style) in &self.style.groups {
            match ThemeGroup::from_name(name) {
                Some(group) => {
                    groups.insert(group, style.clone());
                }
                None => warn!("Ignoring style overrides for unknown theme group '{name}'"),
            }
        }
        StyleLayers {
            groups,
            pages: self.style.pages.clone(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Command-line surface of the `thoughtmarks-shell` binary.
#[derive(Debug, Clone, PartialEq, Bpaf)]
#[bpaf(options, version)]
pub struct ShellArgs {
    /// Configuration file (defaults to the per-user shell.toml)
    #[bpaf(long, argument("PATH"))]
    pub config: Option<PathBuf>,
    /// Log filter directives, e.g. `debug` or `thoughtmarks_shell=trace`
    #[bpaf(long("log-filter"), argument("FILTER"))]
    pub log_filter: Option<String>,
    #[bpaf(external(shell_command))]
    pub command: ShellCommand,
}

#[derive(Debug, Clone, PartialEq, Bpaf)]
pub enum ShellCommand {
    /// Inspect or change the active environment
    #[bpaf(command("env"))]
    Env {
        #[bpaf(external(env_action))]
        action: EnvAction,
    },
    /// Inspect and validate roles
    #[bpaf(command("role"))]
    Role {
        #[bpaf(external(role_action))]
        action: RoleAction,
    },
    /// Print the mounted tree as JSON
    #[bpaf(command("render"))]
    Render {
        /// Mount this mode instead of the stored one
        #[bpaf(long, argument("MODE"))]
        mode: Option<EnvironmentMode>,
        /// Page whose style overrides apply
        #[bpaf(long, argument("PAGE"))]
        page: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Bpaf)]
pub enum EnvAction {
    /// Show the stored environment
    #[bpaf(command("show"))]
    Show {
        /// Print JSON
        json: bool,
    },
    /// Switch to the other environment
    #[bpaf(command("toggle"))]
    Toggle {
        /// Print JSON
        json: bool,
    },
    /// Switch to a given environment
    #[bpaf(command("set"))]
    Set {
        /// Print JSON
        json: bool,
        #[bpaf(positional("MODE"))]
        mode: EnvironmentMode,
    },
    /// Delete the stored environment
    #[bpaf(command("reset"))]
    Reset {
        /// Print JSON
        json: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Bpaf)]
pub enum RoleAction {
    /// List registered roles
    #[bpaf(command("list"))]
    List {
        /// Only roles in this theme group
        #[bpaf(long, argument("GROUP"))]
        group: Option<String>,
    },
    /// Validate accessibility props for a role
    #[bpaf(command("validate"))]
    Validate {
        #[bpaf(long, argument("LABEL"))]
        label: Option<String>,
        #[bpaf(long("a11y-role"), argument("ROLE"))]
        a11y_role: Option<String>,
        accessible: bool,
        #[bpaf(positional("ROLE"))]
        role: String,
    },
}

pub enum ArgumentParsingResult {
    Run(ShellArgs),
    Exit,
    ErrorParsing,
}

pub fn parse_command_line_arguments(args: &[String]) -> ArgumentParsingResult {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match shell_args().run_inner(args.as_slice()) {
        Ok(parsed) => ArgumentParsingResult::Run(parsed),
        Err(failure) => {
            failure.print_mesage(100);
            let exit_code = failure.exit_code();
            if exit_code == 0 {
                ArgumentParsingResult::Exit
            } else {
                ArgumentParsingResult::ErrorParsing
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use thoughtmarks_core::StyleValue;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShellConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shell.toml");
        std::fs::write(&path, "retry_attempts = \"many\"").unwrap();

        let err = ShellConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn toml_sections_map_onto_layers_and_channels() {
        let config = ShellConfig::from_toml_str(
            r#"
seed = "nextgen"
retry_attempts = 0

[style.groups.functional]
color = "red"

[style.groups.sparkles]
color = "gold"

[style.pages.Settings.button-action]
color = "blue"
fontSize = 10

[diagnostics.channels."role.validation.passed"]
enabled = false
"#,
        )
        .unwrap();

        assert_eq!(config.seed, EnvironmentMode::Nextgen);
        assert_eq!(config.store_config().retry_attempts, 0);

        let layers = config.style_layers();
        assert_eq!(layers.groups.len(), 1);
        assert_eq!(
            layers.group(ThemeGroup::Functional).unwrap()["color"],
            StyleValue::from("red")
        );
        assert_eq!(
            layers.page("Settings", "button-action").unwrap()["fontSize"],
            StyleValue::Number(10.0)
        );
        assert!(!config.diagnostics.channels["role.validation.passed"].enabled);
    }

    #[test]
    fn env_overrides_apply_seed_data_dir_and_dev_mode() {
        let mut config = ShellConfig::default();
        config.apply_overrides_from(overrides(&[
            (ENV_DATA_DIR, "/tmp/thoughtmarks-test"),
            (ENV_USE_NEXTGEN, "true"),
            (ENV_DEV_MODE, "0"),
        ]));

        assert_eq!(config.data_dir(), PathBuf::from("/tmp/thoughtmarks-test"));
        assert_eq!(config.seed, EnvironmentMode::Nextgen);
        assert!(!config.dev_mode());
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut config = ShellConfig::default();
        config.apply_overrides_from(overrides(&[
            (ENV_USE_NEXTGEN, "maybe"),
            (ENV_DEV_MODE, "??"),
        ]));

        assert_eq!(config.seed, EnvironmentMode::Legacy);
        assert_eq!(config.dev_mode, None);
    }

    #[test]
    fn parses_env_set_with_json() {
        let parsed = shell_args()
            .run_inner(&["--log-filter", "debug", "env", "set", "--json", "nextgen"])
            .unwrap();

        assert_eq!(parsed.log_filter.as_deref(), Some("debug"));
        assert_eq!(
            parsed.command,
            ShellCommand::Env {
                action: EnvAction::Set {
                    json: true,
                    mode: EnvironmentMode::Nextgen,
                },
            }
        );
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(shell_args().run_inner(&["env", "set", "beta"]).is_err());
    }

    #[test]
    fn parses_role_validate() {
        let parsed = shell_args()
            .run_inner(&[
                "role",
                "validate",
                "--label",
                "Save",
                "--accessible",
                "button-action",
            ])
            .unwrap();

        assert_eq!(
            parsed.command,
            ShellCommand::Role {
                action: RoleAction::Validate {
                    label: Some("Save".to_string()),
                    a11y_role: None,
                    accessible: true,
                    role: "button-action".to_string(),
                },
            }
        );
    }

    #[test]
    fn parses_render_with_mode_and_page() {
        let parsed = shell_args()
            .run_inner(&["render", "--mode", "legacy", "--page", "Settings"])
            .unwrap();

        assert_eq!(
            parsed.command,
            ShellCommand::Render {
                mode: Some(EnvironmentMode::Legacy),
                page: Some("Settings".to_string()),
            }
        );
    }
}
