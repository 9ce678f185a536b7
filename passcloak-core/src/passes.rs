//! Obfuscation pass catalogue

use std::fmt;

/// The transformation passes a build can enable.
///
/// The declaration order of [`PassKind::ALL`] is the order in which plugin
/// flags are injected, independent of the order keys appear in the
/// configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PassKind {
    SplitBasicBlock,
    Flattening,
    OpaquePredicate,
    StringEncryption,
    FunctionOutlining,
    AntiDebugging,
    ApiHiding,
    AntiTampering,
}

impl PassKind {
    /// Every pass, in injection order.
    pub const ALL: [PassKind; 8] = [
        PassKind::SplitBasicBlock,
        PassKind::Flattening,
        PassKind::OpaquePredicate,
        PassKind::StringEncryption,
        PassKind::FunctionOutlining,
        PassKind::AntiDebugging,
        PassKind::ApiHiding,
        PassKind::AntiTampering,
    ];

    /// Key under `passes:` in the configuration file
    pub fn config_key(self) -> &'static str {
        match self {
            PassKind::SplitBasicBlock => "split_basic_block",
            PassKind::Flattening => "flattening",
            PassKind::OpaquePredicate => "opaque_predicate",
            PassKind::StringEncryption => "string_encryption",
            PassKind::FunctionOutlining => "function_outlining",
            PassKind::AntiDebugging => "anti_debugging",
            PassKind::ApiHiding => "api_hiding",
            PassKind::AntiTampering => "anti_tampering",
        }
    }

    /// Library stem of the plugin implementing this pass, before the
    /// platform prefix and extension are applied.
    pub fn plugin_stem(self) -> &'static str {
        match self {
            PassKind::SplitBasicBlock => "SplitBasicBlockPass",
            PassKind::Flattening => "FlatteningPass",
            PassKind::OpaquePredicate => "OpaquePredicatePass",
            PassKind::StringEncryption => "StringEncryptionPass",
            PassKind::FunctionOutlining => "FunctionOutliningPass",
            PassKind::AntiDebugging => "AntiDebuggingPass",
            PassKind::ApiHiding => "APIHidingPass",
            PassKind::AntiTampering => "AntiTamperingPass",
        }
    }

    pub fn from_config_key(key: &str) -> Option<PassKind> {
        PassKind::ALL.into_iter().find(|kind| kind.config_key() == key)
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// One entry of the ordered pass list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassEntry {
    pub pass: PassKind,
    pub enabled: bool,
}
