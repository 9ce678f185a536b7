//! Pass plugin injection

use crate::classifier::CompilationPhase;
use crate::config::ObfuscatorConfig;
use crate::events::{EventSink, RewriteEvent};
use crate::invocation::ArgBuilder;
use crate::passes::PassKind;
use crate::platform::Platform;
use std::path::{Path, PathBuf};

/// Flag prefix understood by the delegated compiler's plugin loader
pub const PASS_PLUGIN_FLAG: &str = "-fpass-plugin=";

/// A pass and the shared library that implements it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginReference {
    pub pass: PassKind,
    pub path: PathBuf,
}

impl PluginReference {
    /// `plugin_dir / <prefix><Stem><extension>`, with repeated and
    /// trailing separators in `plugin_dir` collapsed.
    pub fn resolve(pass: PassKind, plugin_dir: &Path, platform: Platform) -> Self {
        let dir: PathBuf = plugin_dir.components().collect();
        Self {
            pass,
            path: dir.join(platform.library_file_name(pass.plugin_stem())),
        }
    }

    pub fn flag(&self) -> String {
        format!("{}{}", PASS_PLUGIN_FLAG, self.path.display())
    }
}

/// Plugin references for every enabled pass, in declared order.
pub fn resolve_plugins(config: &ObfuscatorConfig, platform: Platform) -> Vec<PluginReference> {
    config
        .enabled_passes()
        .map(|pass| PluginReference::resolve(pass, &config.global.plugin_dir, platform))
        .collect()
}

/// Appends one `-fpass-plugin=` flag per enabled pass when sources are
/// being compiled. Flags already present are left alone.
pub(crate) fn inject_plugins(
    args: &mut ArgBuilder,
    phase: &CompilationPhase,
    config: &ObfuscatorConfig,
    platform: Platform,
    sink: &mut dyn EventSink,
) {
    if !phase.is_compiling {
        return;
    }

    for plugin in resolve_plugins(config, platform) {
        let flag = plugin.flag();
        if args.push_unique(flag.clone()) {
            sink.record(RewriteEvent::PluginInjected {
                pass: plugin.pass,
                path: plugin.path,
            });
        } else {
            sink.record(RewriteEvent::FlagAlreadyPresent { flag });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    fn builder(args: &[&str]) -> ArgBuilder {
        let rest: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        ArgBuilder::new("clang".into(), &rest)
    }

    #[test]
    fn flag_uses_platform_naming() {
        let dir = Path::new("/opt/p");
        let posix = PluginReference::resolve(PassKind::Flattening, dir, Platform::Posix);
        assert_eq!(posix.flag(), "-fpass-plugin=/opt/p/libFlatteningPass.so");

        let macos = PluginReference::resolve(PassKind::ApiHiding, dir, Platform::MacOs);
        assert_eq!(macos.path, PathBuf::from("/opt/p/libAPIHidingPass.dylib"));

        let windows = PluginReference::resolve(PassKind::AntiDebugging, dir, Platform::Windows);
        assert_eq!(windows.path, dir.join("AntiDebuggingPass.dll"));
    }

    #[test]
    fn empty_plugin_dir_yields_bare_file_name() {
        let plugin = PluginReference::resolve(PassKind::Flattening, Path::new(""), Platform::Posix);
        assert_eq!(plugin.flag(), "-fpass-plugin=libFlatteningPass.so");
    }

    #[test]
    fn redundant_separators_do_not_change_the_flag() {
        let expected = "-fpass-plugin=/opt/p/libFlatteningPass.so";
        for dir in ["/opt/p", "/opt/p/", "/opt/p//", "/opt//p", "/opt/./p"] {
            let plugin =
                PluginReference::resolve(PassKind::Flattening, Path::new(dir), Platform::Posix);
            assert_eq!(plugin.flag(), expected, "plugin_dir {dir:?}");
        }
    }

    #[test]
    fn equivalent_plugin_dirs_are_deduplicated() {
        let cfg = ObfuscatorConfig::enabled("/p//").with_pass(PassKind::Flattening);
        let mut args = builder(&["main.c", "-fpass-plugin=/p/libFlatteningPass.so"]);
        let mut events: Vec<RewriteEvent> = Vec::new();

        inject_plugins(&mut args, &classify(&["main.c"]), &cfg, Platform::Posix, &mut events);

        assert_eq!(
            args.finish().as_slice(),
            ["clang", "main.c", "-fpass-plugin=/p/libFlatteningPass.so"]
        );
    }

    #[test]
    fn injects_in_declared_order() {
        let cfg = ObfuscatorConfig::enabled("/p")
            .with_pass(PassKind::AntiTampering)
            .with_pass(PassKind::SplitBasicBlock)
            .with_pass(PassKind::StringEncryption);
        let mut args = builder(&["-c", "x.c"]);
        let mut events: Vec<RewriteEvent> = Vec::new();

        inject_plugins(&mut args, &classify(&["-c", "x.c"]), &cfg, Platform::Posix, &mut events);

        assert_eq!(
            args.finish().as_slice(),
            [
                "clang",
                "-c",
                "x.c",
                "-fpass-plugin=/p/libSplitBasicBlockPass.so",
                "-fpass-plugin=/p/libStringEncryptionPass.so",
                "-fpass-plugin=/p/libAntiTamperingPass.so",
            ]
        );
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn pure_link_gets_no_plugins() {
        let cfg = ObfuscatorConfig::enabled("/p").with_pass(PassKind::Flattening);
        let mut args = builder(&["a.o", "-o", "app"]);
        let mut events: Vec<RewriteEvent> = Vec::new();

        inject_plugins(&mut args, &classify(&["a.o", "-o", "app"]), &cfg, Platform::Posix, &mut events);

        assert_eq!(args.finish().as_slice(), ["clang", "a.o", "-o", "app"]);
        assert!(events.is_empty());
    }

    #[test]
    fn existing_flag_is_not_repeated() {
        let cfg = ObfuscatorConfig::enabled("/p").with_pass(PassKind::Flattening);
        let existing = "-fpass-plugin=/p/libFlatteningPass.so";
        let mut args = builder(&["main.c", existing]);
        let mut events: Vec<RewriteEvent> = Vec::new();

        inject_plugins(&mut args, &classify(&["main.c"]), &cfg, Platform::Posix, &mut events);

        assert_eq!(args.finish().as_slice(), ["clang", "main.c", existing]);
        assert_eq!(
            events,
            vec![RewriteEvent::FlagAlreadyPresent {
                flag: existing.to_string()
            }]
        );
    }
}
