//! PassCloak command-line front ends
//!
//! `compiler_wrapper` stands in for `gcc`/`g++` in a build and hands every
//! invocation, rewritten, to the real compiler. `passcloak-cli` shows what
//! that rewrite would do without running anything.

pub mod cli;
pub mod env;
pub mod logging;
pub mod sink;
pub mod wrapper;
