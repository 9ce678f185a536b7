//! Rewrite orchestration and bypass policy

use crate::classifier::classify;
use crate::config::{ConfigLoader, ObfuscatorConfig};
use crate::errors::PassCloakError;
use crate::events::{EventSink, RewriteEvent};
use crate::frontend::FrontendTable;
use crate::invocation::{ArgBuilder, Invocation};
use crate::platform::Platform;
use crate::plugins::inject_plugins;
use crate::postprocess::inject_link_flags;
use std::path::Path;

/// Turns a compiler invocation into the one that is actually delegated.
///
/// A `Rewriter` holds only the fixed inputs of a rewrite (platform naming,
/// frontend table, configuration overrides); every call is independent.
#[derive(Debug, Clone)]
pub struct Rewriter {
    platform: Platform,
    frontends: FrontendTable,
    loader: ConfigLoader,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl Rewriter {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            frontends: FrontendTable::default(),
            loader: ConfigLoader::default(),
        }
    }

    pub fn with_loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Loads the configuration at `config_path` and rewrites `invocation`.
    ///
    /// Never fails: an unreadable configuration returns the invocation
    /// untouched, and a malformed one behaves like the all-defaults
    /// (disabled) configuration.
    pub fn rewrite(
        &self,
        invocation: &Invocation,
        config_path: &Path,
        sink: &mut dyn EventSink,
    ) -> Invocation {
        if invocation.len() < 2 {
            return invocation.clone();
        }

        let config = match self.loader.load(config_path) {
            Ok(loaded) => {
                for name in loaded.unknown_passes {
                    sink.record(RewriteEvent::UnknownPass { name });
                }
                loaded.config
            }
            Err(PassCloakError::ConfigParse { path, source }) => {
                sink.record(RewriteEvent::ConfigParseFailed {
                    path,
                    reason: source.to_string(),
                });
                ObfuscatorConfig::default()
            }
            Err(PassCloakError::ConfigLoad { path, source }) => {
                sink.record(RewriteEvent::ConfigLoadFailed {
                    path,
                    reason: source.to_string(),
                });
                return invocation.clone();
            }
            Err(err) => {
                sink.record(RewriteEvent::ConfigLoadFailed {
                    path: config_path.to_path_buf(),
                    reason: err.to_string(),
                });
                return invocation.clone();
            }
        };

        self.apply(invocation, &config, sink)
    }

    /// Rewrites `invocation` against an already-loaded configuration.
    pub fn apply(
        &self,
        invocation: &Invocation,
        config: &ObfuscatorConfig,
        sink: &mut dyn EventSink,
    ) -> Invocation {
        let Some(program) = invocation.program() else {
            return invocation.clone();
        };
        if !config.global.enabled {
            sink.record(RewriteEvent::RewriteDisabled);
            return invocation.clone();
        }

        let phase = classify(invocation.arguments());
        sink.record(RewriteEvent::Classified(phase));

        let frontend = self.frontends.select(program, phase.is_cxx);
        if frontend != program {
            sink.record(RewriteEvent::FrontendSelected {
                from: program.to_string(),
                to: frontend.clone(),
            });
        }

        let mut args = ArgBuilder::new(frontend, invocation.arguments());
        inject_plugins(&mut args, &phase, config, self.platform, sink);
        inject_link_flags(&mut args, &phase, config, self.platform, sink);
        args.finish()
    }
}
