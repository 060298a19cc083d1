//! Injects runtime claims into SLEIGH-style constructors whose disassembly actions derive values
//! from `inst_next`, so the hand-written next-instruction arithmetic can be checked against the
//! program counter observed at runtime.

pub mod cli;
pub mod error;
pub mod rewrite;
pub mod sleigh;

pub use error::RewriteError;
pub use rewrite::{NameMatching, RewriteConfig, RewriteOutcome, rewrite_source};
