//! Link-phase flag injection

use crate::classifier::CompilationPhase;
use crate::config::ObfuscatorConfig;
use crate::events::{EventSink, RewriteEvent};
use crate::invocation::ArgBuilder;
use crate::passes::PassKind;
use crate::platform::Platform;

pub const STRIP_SYMBOLS_FLAG: &str = "-s";
pub const LIBDL_FLAG: &str = "-ldl";

/// Appends `-s` when stripping is configured and `-ldl` when API hiding
/// needs runtime symbol resolution. Both only apply to linking invocations
/// and neither is added twice.
pub(crate) fn inject_link_flags(
    args: &mut ArgBuilder,
    phase: &CompilationPhase,
    config: &ObfuscatorConfig,
    platform: Platform,
    sink: &mut dyn EventSink,
) {
    if !phase.is_linking {
        return;
    }

    if config.global.strip_symbols {
        push_flag(args, STRIP_SYMBOLS_FLAG, sink);
    }

    if config.is_pass_enabled(PassKind::ApiHiding) && platform.links_libdl() {
        push_flag(args, LIBDL_FLAG, sink);
    }
}

fn push_flag(args: &mut ArgBuilder, flag: &str, sink: &mut dyn EventSink) {
    let event = if args.push_unique(flag.to_string()) {
        RewriteEvent::FlagInjected {
            flag: flag.to_string(),
        }
    } else {
        RewriteEvent::FlagAlreadyPresent {
            flag: flag.to_string(),
        }
    };
    sink.record(event);
}
