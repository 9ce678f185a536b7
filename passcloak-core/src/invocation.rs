//! Compiler command lines

use serde::Serialize;
use std::fmt;

/// An ordered compiler command line. Element 0 is the invoked program name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Invocation {
    args: Vec<String>,
}

impl Invocation {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Originally invoked program name, if any
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Compiler arguments, excluding the program name
    pub fn arguments(&self) -> &[String] {
        self.args.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Number of elements exactly equal to `arg`
    pub fn count(&self, arg: &str) -> usize {
        self.args.iter().filter(|a| *a == arg).count()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.args
    }
}

impl From<Vec<String>> for Invocation {
    fn from(args: Vec<String>) -> Self {
        Self::new(args)
    }
}

impl<'a> From<&'a [&'a str]> for Invocation {
    fn from(args: &'a [&'a str]) -> Self {
        Self::new(args.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Invocation {
    fn from(args: [&str; N]) -> Self {
        Self::new(args.iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Command line under construction. Appends are deduplicated by exact match.
#[derive(Debug, Clone)]
pub(crate) struct ArgBuilder {
    args: Vec<String>,
}

impl ArgBuilder {
    pub(crate) fn new(program: String, rest: &[String]) -> Self {
        let mut args = Vec::with_capacity(rest.len() + 8);
        args.push(program);
        args.extend_from_slice(rest);
        Self { args }
    }

    pub(crate) fn contains(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// Appends `arg` unless an identical element is already present.
    /// Returns whether it was appended.
    pub(crate) fn push_unique(&mut self, arg: String) -> bool {
        if self.contains(&arg) {
            return false;
        }
        self.args.push(arg);
        true
    }

    pub(crate) fn finish(self) -> Invocation {
        Invocation::new(self.args)
    }
}
