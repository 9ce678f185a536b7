//! PassCloak: compiler invocation rewriting for obfuscation pass plugins
//!
//! The engine takes a compiler command line and a configuration and
//! produces the command line that is actually delegated: the canonical
//! frontend, the original arguments untouched and in order, then one
//! `-fpass-plugin=` flag per enabled pass and any link-phase flags.
//!
//! ```
//! use passcloak_core::{Invocation, ObfuscatorConfig, PassKind, Platform, Rewriter, NullSink};
//!
//! let config = ObfuscatorConfig::enabled("/opt/p")
//!     .with_strip_symbols(true)
//!     .with_pass(PassKind::Flattening);
//! let rewriter = Rewriter::new(Platform::Posix);
//!
//! let out = rewriter.apply(&Invocation::from(["gcc", "main.c", "-o", "main"]), &config, &mut NullSink);
//! assert_eq!(
//!     out.as_slice(),
//!     ["clang", "main.c", "-o", "main", "-fpass-plugin=/opt/p/libFlatteningPass.so", "-s"]
//! );
//! ```

pub mod classifier;
pub mod config;
pub mod errors;
pub mod events;
pub mod frontend;
pub mod handoff;
pub mod invocation;
pub mod passes;
pub mod platform;
pub mod plugins;
pub mod postprocess;
pub mod rewrite;

// Re-exports
pub use classifier::{classify, CompilationPhase};
pub use config::{ConfigLoader, GlobalConfig, LoadedConfig, ObfuscatorConfig};
pub use errors::{PassCloakError, Result};
pub use events::{EventSink, NullSink, RewriteEvent};
pub use frontend::{FrontendTable, WRAPPER_NAME};
pub use handoff::{ensure_not_self, hand_off, resolve_program};
pub use invocation::Invocation;
pub use passes::{PassEntry, PassKind};
pub use platform::Platform;
pub use plugins::{resolve_plugins, PluginReference};
pub use rewrite::Rewriter;
