//! Wrapper configuration: schema and layered loading

use crate::errors::{PassCloakError, Result};
use crate::passes::{PassEntry, PassKind};
use config as config_rs;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of environment variables that override configuration keys,
/// e.g. `OBFUSCATOR_SET__GLOBAL__STRIP_SYMBOLS=false`.
pub const ENV_OVERRIDE_PREFIX: &str = "OBFUSCATOR_SET__";

/// `global:` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalConfig {
    pub enabled: bool,
    pub plugin_dir: PathBuf,
    pub strip_symbols: bool,
}

/// Resolved configuration with passes in declared injection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObfuscatorConfig {
    pub global: GlobalConfig,
    passes: Vec<PassEntry>,
}

impl Default for ObfuscatorConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            passes: PassKind::ALL
                .into_iter()
                .map(|pass| PassEntry { pass, enabled: false })
                .collect(),
        }
    }
}

impl ObfuscatorConfig {
    /// Enabled configuration loading plugins from `plugin_dir`, no passes on
    pub fn enabled(plugin_dir: impl Into<PathBuf>) -> Self {
        let mut cfg = Self::default();
        cfg.global.enabled = true;
        cfg.global.plugin_dir = plugin_dir.into();
        cfg
    }

    pub fn with_strip_symbols(mut self, strip: bool) -> Self {
        self.global.strip_symbols = strip;
        self
    }

    pub fn with_pass(mut self, pass: PassKind) -> Self {
        self.set_pass(pass, true);
        self
    }

    pub fn set_pass(&mut self, pass: PassKind, enabled: bool) {
        if let Some(entry) = self.passes.iter_mut().find(|e| e.pass == pass) {
            entry.enabled = enabled;
        }
    }

    pub fn is_pass_enabled(&self, pass: PassKind) -> bool {
        self.passes.iter().any(|e| e.pass == pass && e.enabled)
    }

    /// All pass entries in declared order
    pub fn passes(&self) -> &[PassEntry] {
        &self.passes
    }

    /// Enabled passes in declared order
    pub fn enabled_passes(&self) -> impl Iterator<Item = PassKind> + '_ {
        self.passes.iter().filter(|e| e.enabled).map(|e| e.pass)
    }
}

impl Serialize for ObfuscatorConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ObfuscatorConfig", 2)?;
        state.serialize_field("global", &self.global)?;
        state.serialize_field("passes", &PassTable(&self.passes))?;
        state.end()
    }
}

/// `passes:` rendered as a mapping keyed by pass name, in declared order
struct PassTable<'a>(&'a [PassEntry]);

#[derive(Serialize)]
struct PassToggle {
    enabled: bool,
}

impl Serialize for PassTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(entry.pass.config_key(), &PassToggle { enabled: entry.enabled })?;
        }
        map.end()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGlobal {
    enabled: bool,
    plugin_dir: String,
    strip_symbols: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPass {
    enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    global: Option<RawGlobal>,
    passes: Option<HashMap<String, RawPass>>,
}

impl RawConfig {
    fn resolve(self) -> LoadedConfig {
        let global = self.global.unwrap_or_default();
        let mut config = ObfuscatorConfig {
            global: GlobalConfig {
                enabled: global.enabled,
                plugin_dir: PathBuf::from(global.plugin_dir),
                strip_symbols: global.strip_symbols,
            },
            ..ObfuscatorConfig::default()
        };

        let mut unknown_passes = Vec::new();
        for (name, raw) in self.passes.unwrap_or_default() {
            match PassKind::from_config_key(&name) {
                Some(pass) => config.set_pass(pass, raw.enabled),
                None => unknown_passes.push(name),
            }
        }
        unknown_passes.sort();

        LoadedConfig {
            config,
            unknown_passes,
        }
    }
}

/// Result of a successful load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: ObfuscatorConfig,
    /// Keys under `passes:` that name no known pass, sorted
    pub unknown_passes: Vec<String>,
}

/// A single `OBFUSCATOR_SET__*` override
#[derive(Debug, Clone, PartialEq, Eq)]
struct Override {
    key: String,
    value: OverrideValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum OverrideValue {
    Bool(bool),
    Text(String),
}

impl OverrideValue {
    fn to_value(&self) -> config_rs::Value {
        match self {
            OverrideValue::Bool(b) => config_rs::Value::from(*b),
            OverrideValue::Text(s) => config_rs::Value::from(s.as_str()),
        }
    }
}

/// Loads the YAML configuration file and layers environment overrides on
/// top of it.
///
/// The loader never reads the process environment itself; callers hand it
/// a snapshot with [`ConfigLoader::with_environment`].
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    overrides: Vec<Override>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks up every `OBFUSCATOR_SET__SECTION__KEY=value` variable.
    pub fn with_environment<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in vars {
            let Some(path) = name.as_ref().strip_prefix(ENV_OVERRIDE_PREFIX) else {
                continue;
            };
            if path.is_empty() {
                continue;
            }
            let value = value.as_ref();
            let value = match value.to_ascii_lowercase().as_str() {
                "true" => OverrideValue::Bool(true),
                "false" => OverrideValue::Bool(false),
                _ => OverrideValue::Text(value.to_string()),
            };
            self.overrides.push(Override {
                key: path.to_ascii_lowercase().replace("__", "."),
                value,
            });
        }
        // Deterministic layering regardless of environment iteration order
        self.overrides.sort_by(|a, b| a.key.cmp(&b.key));
        self
    }

    /// Reads and parses the configuration at `path`.
    ///
    /// An unreadable file is a [`PassCloakError::ConfigLoad`]; a readable
    /// file that is not valid YAML or does not fit the schema is a
    /// [`PassCloakError::ConfigParse`].
    pub fn load(&self, path: &Path) -> Result<LoadedConfig> {
        let bytes = fs::read(path).map_err(|source| PassCloakError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8(bytes).map_err(|e| PassCloakError::ConfigParse {
            path: path.to_path_buf(),
            source: config_rs::ConfigError::Message(e.to_string()),
        })?;

        self.parse(&content).map_err(|source| PassCloakError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses YAML text with the loader's overrides applied.
    ///
    /// Toggles in the file must be YAML booleans; `1`, `"true"` or `on`
    /// are rejected rather than coerced. Overrides are typed when they are
    /// collected and are not subject to this check.
    pub fn parse(&self, content: &str) -> std::result::Result<LoadedConfig, config_rs::ConfigError> {
        let document: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| config_rs::ConfigError::Foreign(Box::new(e)))?;
        check_toggles(&document).map_err(config_rs::ConfigError::Message)?;

        let mut builder = config_rs::Config::builder()
            .add_source(config_rs::File::from_str(content, config_rs::FileFormat::Yaml));

        for Override { key, value } in &self.overrides {
            builder = builder.set_override(key.as_str(), value.to_value())?;
        }

        let raw: RawConfig = builder.build()?.try_deserialize()?;
        Ok(raw.resolve())
    }
}

const GLOBAL_TOGGLES: [&str; 2] = ["enabled", "strip_symbols"];

/// Fails on the first boolean key whose value is not a YAML boolean.
fn check_toggles(document: &serde_yaml::Value) -> std::result::Result<(), String> {
    if let Some(global) = document.get("global") {
        for key in GLOBAL_TOGGLES {
            check_toggle(global.get(key), &format!("global.{key}"))?;
        }
    }

    if let Some(serde_yaml::Value::Mapping(passes)) = document.get("passes") {
        for (name, entry) in passes {
            let name = name.as_str().unwrap_or("<non-string key>");
            check_toggle(entry.get("enabled"), &format!("passes.{name}.enabled"))?;
        }
    }
    Ok(())
}

fn check_toggle(value: Option<&serde_yaml::Value>, key: &str) -> std::result::Result<(), String> {
    use serde_yaml::Value;

    let found = match value {
        None | Some(Value::Null) | Some(Value::Bool(_)) => return Ok(()),
        Some(Value::Number(_)) => "a number",
        Some(Value::String(_)) => "a string",
        Some(Value::Sequence(_)) => "a sequence",
        Some(Value::Mapping(_)) => "a mapping",
        Some(Value::Tagged(_)) => "a tagged value",
    };
    Err(format!("{key} must be true or false, found {found}"))
}
