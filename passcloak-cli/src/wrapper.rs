//! The `compiler_wrapper` flow up to (not including) the handoff

use crate::env::WrapperEnv;
use crate::sink::TracingSink;
use passcloak_core::{
    ensure_not_self, resolve_program, Invocation, PassCloakError, Platform, Result, Rewriter,
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Final command line, ready for [`passcloak_core::hand_off`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    pub program: PathBuf,
    /// Full argv, element 0 included
    pub args: Vec<OsString>,
}

/// Rewrites `argv` and resolves the compiler to delegate to.
///
/// `wrapper_exe` is the wrapper's own executable, used to refuse a
/// delegation that would land back in the wrapper.
pub fn prepare(
    argv: Vec<OsString>,
    env: &WrapperEnv,
    platform: Platform,
    wrapper_exe: Option<&Path>,
) -> Result<PreparedCommand> {
    if argv.is_empty() {
        return Err(PassCloakError::EmptyInvocation);
    }

    let args = match utf8_args(&argv) {
        Some(strings) => {
            let original = Invocation::new(strings);
            debug!("Original command intercepted: {:?}", original.as_slice());

            let rewriter = Rewriter::new(platform).with_loader(env.config_loader());
            let rewritten = rewriter.rewrite(&original, &env.config_path, &mut TracingSink);
            debug!("Modified command to execute: {:?}", rewritten.as_slice());

            rewritten.into_vec().into_iter().map(OsString::from).collect()
        }
        None => {
            warn!("Arguments are not valid UTF-8, delegating unchanged");
            argv
        }
    };

    let name = args[0]
        .to_str()
        .ok_or_else(|| PassCloakError::FrontendResolution {
            name: args[0].to_string_lossy().into_owned(),
            reason: "program name is not valid UTF-8".to_string(),
        })?;
    let program = resolve_program(name, env.search_path.as_deref())?;
    if let Some(wrapper) = wrapper_exe {
        ensure_not_self(&program, wrapper)?;
    }

    Ok(PreparedCommand { program, args })
}

fn utf8_args(argv: &[OsString]) -> Option<Vec<String>> {
    argv.iter().map(|a| a.to_str().map(str::to_string)).collect()
}
