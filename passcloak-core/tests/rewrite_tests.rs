//! End-to-end rewrite behavior against on-disk configuration files

use passcloak_core::{Invocation, NullSink, Platform, RewriteEvent, Rewriter};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn config_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn rewrite(args: &[&str], config: &Path) -> Vec<String> {
    Rewriter::new(Platform::Posix)
        .rewrite(&Invocation::from(args), config, &mut NullSink)
        .into_vec()
}

fn count(args: &[String], flag: &str) -> usize {
    args.iter().filter(|a| *a == flag).count()
}

const STRIP_ON: &str = r#"
global:
  enabled: true
  plugin_dir: "/tmp/plugins"
  strip_symbols: true
"#;

const STRIP_OFF: &str = r#"
global:
  enabled: true
  plugin_dir: "/tmp/plugins"
  strip_symbols: false
"#;

#[test]
fn test_gcc_link_example() {
    let cfg = config_file(
        r#"
global:
  enabled: true
  plugin_dir: "/opt/p"
  strip_symbols: true
passes:
  flattening:
    enabled: true
"#,
    );

    assert_eq!(
        rewrite(&["gcc", "main.c", "-o", "main"], cfg.path()),
        [
            "clang",
            "main.c",
            "-o",
            "main",
            "-fpass-plugin=/opt/p/libFlatteningPass.so",
            "-s",
        ]
    );
}

#[test]
fn test_gxx_compile_only_example() {
    let cfg = config_file(
        r#"
global:
  enabled: true
  plugin_dir: "/opt/p"
  strip_symbols: true
passes:
  opaque_predicate:
    enabled: true
"#,
    );

    assert_eq!(
        rewrite(&["g++", "-c", "a.cpp", "-o", "a.o"], cfg.path()),
        [
            "clang++",
            "-c",
            "a.cpp",
            "-o",
            "a.o",
            "-fpass-plugin=/opt/p/libOpaquePredicatePass.so",
        ]
    );
}

#[test]
fn test_strip_symbols_matrix() {
    let on = config_file(STRIP_ON);
    let off = config_file(STRIP_OFF);

    let cases: [(&str, &[&str], &Path, usize); 5] = [
        ("link with strip", &["gcc", "main.c", "-o", "main"], on.path(), 1),
        ("compile only", &["gcc", "-c", "main.c", "-o", "main.o"], on.path(), 0),
        ("preprocess only", &["gcc", "-E", "main.c"], on.path(), 0),
        ("strip disabled", &["gcc", "main.c", "-o", "main"], off.path(), 0),
        ("user supplied -s", &["gcc", "main.c", "-s", "-o", "main"], on.path(), 1),
    ];

    for (name, args, config, expected) in cases {
        let out = rewrite(args, config);
        assert_eq!(count(&out, "-s"), expected, "{name}: {out:?}");
    }
}

#[test]
fn test_disabled_config_is_identity() {
    let cfg = config_file(
        r#"
global:
  enabled: false
  plugin_dir: "/opt/p"
  strip_symbols: true
passes:
  flattening:
    enabled: true
"#,
    );
    let args = ["gcc", "main.c", "-o", "main"];
    assert_eq!(rewrite(&args, cfg.path()), args);
}

#[test]
fn test_unreadable_config_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let args = ["g++", "-c", "a.cpp"];

    assert_eq!(rewrite(&args, &dir.path().join("missing.yaml")), args);
    // A directory is not a readable config file either
    assert_eq!(rewrite(&args, dir.path()), args);
}

#[test]
fn test_malformed_config_is_noop() {
    let cfg = config_file("global: [enabled: true\n  plugin_dir: ");
    let args = ["gcc", "main.c", "-o", "main"];
    let mut events: Vec<RewriteEvent> = Vec::new();

    let out =
        Rewriter::new(Platform::Posix).rewrite(&Invocation::from(args), cfg.path(), &mut events);

    assert_eq!(out.as_slice(), args);
    assert!(matches!(
        events.as_slice(),
        [RewriteEvent::ConfigParseFailed { .. }, RewriteEvent::RewriteDisabled]
    ));
}

#[test]
fn test_schema_mismatch_is_noop() {
    let cfg = config_file("global:\n  enabled: [1, 2]\n");
    let args = ["gcc", "main.c"];
    assert_eq!(rewrite(&args, cfg.path()), args);
}

#[test]
fn test_non_boolean_toggles_are_noop() {
    let cases = [
        "global:\n  enabled: 1\n  strip_symbols: \"on\"\n",
        "global:\n  enabled: \"true\"\n  strip_symbols: 1\n",
        "global:\n  enabled: true\n  strip_symbols: \"yes\"\n",
        "global:\n  enabled: true\n  plugin_dir: /opt/p\npasses:\n  flattening:\n    enabled: 1\n",
    ];

    for yaml in cases {
        let cfg = config_file(yaml);
        let mut events: Vec<RewriteEvent> = Vec::new();

        let out = Rewriter::new(Platform::Posix).rewrite(
            &Invocation::from(["gcc", "main.c"]),
            cfg.path(),
            &mut events,
        );

        assert_eq!(out.as_slice(), ["gcc", "main.c"], "{yaml:?}");
        assert!(
            matches!(events.first(), Some(RewriteEvent::ConfigParseFailed { .. })),
            "{yaml:?}: {events:?}"
        );
    }
}

#[test]
fn test_redundant_separators_in_plugin_dir() {
    let cfg = config_file(
        r#"
global:
  enabled: true
  plugin_dir: "/opt/p//"
passes:
  flattening:
    enabled: true
"#,
    );

    let out = rewrite(&["gcc", "-c", "main.c"], cfg.path());
    assert_eq!(out, ["clang", "-c", "main.c", "-fpass-plugin=/opt/p/libFlatteningPass.so"]);
}

#[test]
fn test_empty_config_is_noop() {
    let cfg = config_file("");
    let args = ["gcc", "main.c"];
    assert_eq!(rewrite(&args, cfg.path()), args);
}

#[test]
fn test_rewrite_is_idempotent() {
    let cfg = config_file(
        r#"
global:
  enabled: true
  plugin_dir: "/opt/p"
  strip_symbols: true
passes:
  split_basic_block:
    enabled: true
  api_hiding:
    enabled: true
"#,
    );

    let once = rewrite(&["compiler_wrapper", "main.c", "-o", "main"], cfg.path());
    let once_refs: Vec<&str> = once.iter().map(String::as_str).collect();
    let twice = rewrite(&once_refs, cfg.path());

    assert_eq!(once, twice);
    assert_eq!(count(&twice, "-s"), 1);
    assert_eq!(count(&twice, "-ldl"), 1);
    assert_eq!(count(&twice, "-fpass-plugin=/opt/p/libSplitBasicBlockPass.so"), 1);
    assert_eq!(count(&twice, "-fpass-plugin=/opt/p/libAPIHidingPass.so"), 1);
}

#[test]
fn test_injection_follows_declared_order_not_file_order() {
    let cfg = config_file(
        r#"
passes:
  anti_tampering:
    enabled: true
  flattening:
    enabled: true
  split_basic_block:
    enabled: true
global:
  enabled: true
  plugin_dir: "/opt/p"
"#,
    );

    let out = rewrite(&["gcc", "-c", "x.c"], cfg.path());
    assert_eq!(
        &out[3..],
        [
            "-fpass-plugin=/opt/p/libSplitBasicBlockPass.so",
            "-fpass-plugin=/opt/p/libFlatteningPass.so",
            "-fpass-plugin=/opt/p/libAntiTamperingPass.so",
        ]
    );
}

#[test]
fn test_all_passes_with_wrapper_name() {
    let cfg = config_file(
        r#"
global:
  enabled: true
  plugin_dir: "/opt/p"
passes:
  split_basic_block: { enabled: true }
  flattening: { enabled: true }
  opaque_predicate: { enabled: true }
  string_encryption: { enabled: true }
  function_outlining: { enabled: true }
  anti_debugging: { enabled: true }
  api_hiding: { enabled: true }
  anti_tampering: { enabled: true }
"#,
    );

    let out = rewrite(&["/usr/local/bin/compiler_wrapper", "a.cc", "b.c"], cfg.path());
    assert_eq!(out[0], "clang++");
    assert_eq!(&out[1..3], ["a.cc", "b.c"]);
    assert_eq!(out.iter().filter(|a| a.starts_with("-fpass-plugin=")).count(), 8);
    assert_eq!(out.last().map(String::as_str), Some("-ldl"));
}

#[test]
fn test_unknown_pass_is_reported_and_ignored() {
    let cfg = config_file(
        r#"
global:
  enabled: true
  plugin_dir: "/opt/p"
passes:
  inlining:
    enabled: true
"#,
    );
    let mut events: Vec<RewriteEvent> = Vec::new();

    let out = Rewriter::new(Platform::Posix).rewrite(
        &Invocation::from(["gcc", "-c", "main.c"]),
        cfg.path(),
        &mut events,
    );

    assert_eq!(out.as_slice(), ["clang", "-c", "main.c"]);
    assert_eq!(
        events.first(),
        Some(&RewriteEvent::UnknownPass {
            name: "inlining".to_string()
        })
    );
}

#[test]
fn test_version_query_links_and_gets_strip() {
    let cfg = config_file(STRIP_ON);
    assert_eq!(rewrite(&["gcc", "--version"], cfg.path()), ["clang", "--version", "-s"]);
}
