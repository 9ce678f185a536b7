//! Shared-library naming conventions

use std::fmt;

/// Target platform family, used to name plugin libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Posix,
    MacOs,
    Windows,
}

impl Platform {
    /// Platform the wrapper was built for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    pub fn library_prefix(self) -> &'static str {
        match self {
            Platform::Posix | Platform::MacOs => "lib",
            Platform::Windows => "",
        }
    }

    pub fn library_extension(self) -> &'static str {
        match self {
            Platform::Posix => ".so",
            Platform::MacOs => ".dylib",
            Platform::Windows => ".dll",
        }
    }

    /// File name of a shared library with the given stem,
    /// e.g. `libFlatteningPass.so` or `FlatteningPass.dll`.
    pub fn library_file_name(self, stem: &str) -> String {
        format!("{}{}{}", self.library_prefix(), stem, self.library_extension())
    }

    /// Whether runtime symbol lookup needs `-ldl` at link time
    pub fn links_libdl(self) -> bool {
        self != Platform::Windows
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Posix => write!(f, "posix"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}
