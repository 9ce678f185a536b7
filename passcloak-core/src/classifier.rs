//! Invocation classification: source language mix and compilation phase

const CXX_SOURCE_SUFFIXES: [&str; 2] = [".cpp", ".cc"];
const C_SOURCE_SUFFIX: &str = ".c";
const COMPILE_ONLY: &str = "-c";
const NO_LINK_FLAGS: [&str; 3] = ["-c", "-S", "-E"];

/// Facts derived once per invocation from its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilationPhase {
    /// A C++ translation unit is present anywhere on the command line
    pub is_cxx: bool,
    /// Sources are compiled (plugins apply)
    pub is_compiling: bool,
    /// The driver will run the linker. Only cleared by `-c`, `-S` or `-E`.
    pub is_linking: bool,
}

impl Default for CompilationPhase {
    fn default() -> Self {
        Self {
            is_cxx: false,
            is_compiling: false,
            is_linking: true,
        }
    }
}

/// Classifies compiler arguments (program name excluded). Never fails.
pub fn classify<S: AsRef<str>>(args: &[S]) -> CompilationPhase {
    let mut phase = CompilationPhase::default();

    for arg in args {
        let arg = arg.as_ref();
        if CXX_SOURCE_SUFFIXES.iter().any(|suffix| arg.ends_with(suffix)) {
            phase.is_cxx = true;
            phase.is_compiling = true;
        } else if arg.ends_with(C_SOURCE_SUFFIX) || arg == COMPILE_ONLY {
            phase.is_compiling = true;
        }

        if NO_LINK_FLAGS.contains(&arg) {
            phase.is_linking = false;
        }
    }

    phase
}
