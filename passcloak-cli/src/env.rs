//! Environment resolution for the wrapper and the operator CLI

use passcloak_core::ConfigLoader;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Overrides the configuration file location
pub const CONFIG_ENV: &str = "OBFUSCATOR_CONFIG";
/// Any non-empty value turns on verbose logging to stdout
pub const DEBUG_ENV: &str = "OBFUSCATOR_DEBUG";
/// `tracing` filter directive for the log file
pub const LOG_FILTER_ENV: &str = "OBFUSCATOR_LOG";
/// Configuration location relative to the wrapper's own directory
pub const DEFAULT_CONFIG_RELATIVE: &str = "../config/default_config.yaml";

/// Everything the wrapper reads from its environment, captured once.
#[derive(Debug, Clone, Default)]
pub struct WrapperEnv {
    pub config_path: PathBuf,
    pub debug: bool,
    pub log_filter: Option<String>,
    /// Compiler search path (`PATH`)
    pub search_path: Option<OsString>,
    /// Variables handed to the configuration loader for overrides
    pub vars: Vec<(String, String)>,
}

impl WrapperEnv {
    /// Snapshot of the process environment.
    pub fn capture() -> Self {
        // Non-UTF-8 variables cannot carry overrides; skip them
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect::<Vec<_>>();
        let exe_dir = wrapper_dir();
        let mut env = Self::from_vars(vars, exe_dir.as_deref());
        env.search_path = std::env::var_os("PATH");
        env
    }

    /// Builds the environment from explicit variables. `exe_dir` is the
    /// directory the configuration default is resolved against.
    pub fn from_vars<I>(vars: I, exe_dir: Option<&Path>) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        let lookup = |name: &str| {
            vars.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .filter(|v| !v.is_empty())
        };

        let config_path = lookup(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_config_path(exe_dir));
        let debug = lookup(DEBUG_ENV).is_some();
        let log_filter = lookup(LOG_FILTER_ENV);
        let search_path = lookup("PATH").map(OsString::from);

        Self {
            config_path,
            debug,
            log_filter,
            search_path,
            vars,
        }
    }

    /// Configuration loader carrying this environment's overrides
    pub fn config_loader(&self) -> ConfigLoader {
        ConfigLoader::new().with_environment(self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

/// `<exe_dir>/../config/default_config.yaml`, or relative to the working
/// directory when the executable location is unknown.
pub fn default_config_path(exe_dir: Option<&Path>) -> PathBuf {
    match exe_dir {
        Some(dir) => dir.join(DEFAULT_CONFIG_RELATIVE),
        None => PathBuf::from(DEFAULT_CONFIG_RELATIVE),
    }
}

/// Directory holding the running executable, falling back to the directory
/// of argv[0].
fn wrapper_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        return Some(dir);
    }

    let argv0 = PathBuf::from(std::env::args_os().next()?);
    let dir = argv0.parent()?;
    std::env::current_dir().ok().map(|cwd| cwd.join(dir))
}
