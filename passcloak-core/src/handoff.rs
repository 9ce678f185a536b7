//! Terminal handoff to the delegated compiler

use crate::errors::{PassCloakError, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Finds `name` the way a shell would.
///
/// A name with a directory component is checked directly; a bare name is
/// looked up in each entry of `search_path` in order.
pub fn resolve_program(name: &str, search_path: Option<&OsStr>) -> Result<PathBuf> {
    let not_found = |reason: &str| PassCloakError::FrontendResolution {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(not_found("empty program name"));
    }

    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(not_found("not an executable file"))
        };
    }

    let search_path = search_path.ok_or_else(|| not_found("PATH is not set"))?;
    for dir in std::env::split_paths(search_path) {
        // An empty PATH entry means the current directory
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir
        };
        for file_name in executable_names(name) {
            let path = dir.join(&file_name);
            if is_executable(&path) {
                return Ok(path);
            }
        }
    }

    Err(not_found("executable file not found in $PATH"))
}

/// Refuses to delegate to the wrapper itself, which would exec in a loop.
pub fn ensure_not_self(program: &Path, wrapper: &Path) -> Result<()> {
    let same = match (program.canonicalize(), wrapper.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        return Err(PassCloakError::FrontendResolution {
            name: program.display().to_string(),
            reason: "resolves to the compiler wrapper itself".to_string(),
        });
    }
    Ok(())
}

/// Hands the process over to `program`.
///
/// `args[0]` is passed through as the child's argv[0]. On unix the current
/// process image is replaced and this only returns on failure. Elsewhere the
/// child runs with inherited stdio and its exit code is returned for the
/// caller to exit with.
pub fn hand_off(program: &Path, args: &[OsString]) -> Result<i32> {
    let mut command = Command::new(program);
    command.args(args.iter().skip(1));
    replace_process(command, program, args.first())
}

#[cfg(unix)]
fn replace_process(mut command: Command, program: &Path, arg0: Option<&OsString>) -> Result<i32> {
    use std::os::unix::process::CommandExt;

    if let Some(arg0) = arg0 {
        command.arg0(arg0);
    }
    let source = command.exec();
    Err(PassCloakError::Delegation {
        program: program.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn replace_process(mut command: Command, program: &Path, _arg0: Option<&OsString>) -> Result<i32> {
    let status = command.status().map_err(|source| PassCloakError::Delegation {
        program: program.to_path_buf(),
        source,
    })?;
    Ok(status.code().unwrap_or(1))
}

fn executable_names(name: &str) -> Vec<OsString> {
    let mut names = vec![OsString::from(name)];
    if cfg!(windows) && Path::new(name).extension().is_none() {
        names.push(OsString::from(format!("{name}.exe")));
    }
    names
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
