//! Claim injection pipeline: configuration, per-constructor dependency tracking, statement
//! splicing, and the whole-file driver.

pub mod config;
pub mod driver;
pub mod environment;
pub mod rewriter;

pub use config::{INST_NEXT, NameMatching, RewriteConfig};
pub use driver::{ConstructorReport, RewriteOutcome, rewrite_source};
pub use environment::DependencyEnvironment;
pub use rewriter::{RewrittenConstructor, rewrite_constructor};
