//! Diagnostic events emitted while rewriting an invocation

use crate::classifier::CompilationPhase;
use crate::passes::PassKind;
use std::fmt;
use std::path::PathBuf;

/// What the rewrite engine decided, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteEvent {
    /// Config unreadable; the invocation passes through untouched
    ConfigLoadFailed { path: PathBuf, reason: String },
    /// Config readable but malformed; all-defaults configuration used
    ConfigParseFailed { path: PathBuf, reason: String },
    /// A `passes:` key that names no known pass
    UnknownPass { name: String },
    /// `global.enabled` is false
    RewriteDisabled,
    Classified(CompilationPhase),
    FrontendSelected { from: String, to: String },
    PluginInjected { pass: PassKind, path: PathBuf },
    /// An injected flag was already on the command line
    FlagAlreadyPresent { flag: String },
    FlagInjected { flag: String },
}

impl fmt::Display for RewriteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteEvent::ConfigLoadFailed { path, reason } => write!(
                f,
                "failed to load config at {}, bypassing obfuscation: {}",
                path.display(),
                reason
            ),
            RewriteEvent::ConfigParseFailed { path, reason } => write!(
                f,
                "malformed config at {}, treating as disabled: {}",
                path.display(),
                reason
            ),
            RewriteEvent::UnknownPass { name } => write!(f, "ignoring unknown pass '{}'", name),
            RewriteEvent::RewriteDisabled => write!(f, "obfuscation disabled, invocation unchanged"),
            RewriteEvent::Classified(phase) => write!(
                f,
                "classified invocation: cxx={} compiling={} linking={}",
                phase.is_cxx, phase.is_compiling, phase.is_linking
            ),
            RewriteEvent::FrontendSelected { from, to } => write!(f, "frontend {} -> {}", from, to),
            RewriteEvent::PluginInjected { pass, path } => {
                write!(f, "injected plugin for {}: {}", pass, path.display())
            }
            RewriteEvent::FlagAlreadyPresent { flag } => write!(f, "flag already present: {}", flag),
            RewriteEvent::FlagInjected { flag } => write!(f, "injected flag: {}", flag),
        }
    }
}

/// Receiver for [`RewriteEvent`]s.
pub trait EventSink {
    fn record(&mut self, event: RewriteEvent);
}

impl EventSink for Vec<RewriteEvent> {
    fn record(&mut self, event: RewriteEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: RewriteEvent) {
        (**self).record(event);
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: RewriteEvent) {}
}
