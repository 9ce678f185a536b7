//! Error types for PassCloak

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PassCloakError>;

#[derive(Error, Debug)]
pub enum PassCloakError {
    #[error("failed to load config at {}: {source}", path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("failed to find compiler '{name}' in PATH: {reason}")]
    FrontendResolution { name: String, reason: String },

    #[error("failed to execute compiler process {}: {source}", program.display())]
    Delegation {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no arguments provided to compiler wrapper")]
    EmptyInvocation,
}

impl PassCloakError {
    /// Configuration failures degrade to pass-through; everything else ends
    /// the wrapper process.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PassCloakError::ConfigLoad { .. } | PassCloakError::ConfigParse { .. }
        )
    }
}
