//! Frontend selection from the invoked program name

use std::path::Path;

/// Name the wrapper binary is installed under
pub const WRAPPER_NAME: &str = "compiler_wrapper";

/// Program-name markers and the canonical frontends they map to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendTable {
    pub cxx_marker: String,
    pub c_marker: String,
    pub wrapper_name: String,
    pub cxx_frontend: String,
    pub c_frontend: String,
}

impl Default for FrontendTable {
    fn default() -> Self {
        Self {
            cxx_marker: "g++".to_string(),
            c_marker: "gcc".to_string(),
            wrapper_name: WRAPPER_NAME.to_string(),
            cxx_frontend: "clang++".to_string(),
            c_frontend: "clang".to_string(),
        }
    }
}

impl FrontendTable {
    /// Picks the program to delegate to.
    ///
    /// Markers are matched against the basename of `program`; anything that
    /// matches neither a marker nor the wrapper's own name passes through
    /// unchanged, including its directory.
    pub fn select(&self, program: &str, is_cxx: bool) -> String {
        let name = base_name(program);
        let is_wrapper = self.is_wrapper_name(name);

        if name.contains(self.cxx_marker.as_str()) || (is_wrapper && is_cxx) {
            self.cxx_frontend.clone()
        } else if name.contains(self.c_marker.as_str()) || is_wrapper {
            self.c_frontend.clone()
        } else {
            program.to_string()
        }
    }

    fn is_wrapper_name(&self, name: &str) -> bool {
        let name = if cfg!(windows) {
            name.strip_suffix(".exe").unwrap_or(name)
        } else {
            name
        };
        name == self.wrapper_name
    }
}

fn base_name(program: &str) -> &str {
    Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program)
}
