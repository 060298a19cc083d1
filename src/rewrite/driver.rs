//! Whole-file pass: preamble splice followed by per-constructor claim injection.

use tracing::{debug, trace};

use super::config::RewriteConfig;
use super::environment::DependencyEnvironment;
use super::rewriter::rewrite_constructor;
use crate::error::RewriteError;
use crate::sleigh::{Constructors, PositionCursor, SourcePosition, find_endian_declaration};

/// One constructor that received claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorReport {
    pub table_name: String,
    pub position: SourcePosition,
    pub claims_inserted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub text: String,
    /// Number of constructors the recognizer found after the endian declaration.
    pub constructors_seen: usize,
    pub rewritten: Vec<ConstructorReport>,
}

impl RewriteOutcome {
    pub fn claims_inserted(&self) -> usize {
        self.rewritten.iter().map(|report| report.claims_inserted).sum()
    }
}

/// Rewrites `source`, splicing `pc_definition` and the claim declaration after the endian
/// declaration and injecting claims into every constructor whose `inst_next`-derived action
/// names are used by its semantics.
pub fn rewrite_source(
    source: &str,
    pc_definition: &str,
    config: &RewriteConfig,
) -> Result<RewriteOutcome, RewriteError> {
    config.validate()?;
    let endian = find_endian_declaration(source).ok_or(RewriteError::MissingEndianDeclaration)?;
    trace!(offset = endian.end, "endian declaration located");

    let mut text = String::with_capacity(source.len() + pc_definition.len() + 64);
    text.push_str(&source[..endian.end]);
    text.push('\n');
    text.push_str(pc_definition);
    text.push('\n');
    text.push_str(&config.pcodeop_declaration());
    text.push('\n');

    let mut last_offset = endian.end;
    let mut constructors_seen = 0usize;
    let mut rewritten = Vec::new();
    let mut positions = PositionCursor::new(source);
    for constructor in Constructors::starting_at(source, endian.end) {
        constructors_seen += 1;
        text.push_str(&source[last_offset..constructor.start()]);
        last_offset = constructor.end();

        let mut env = DependencyEnvironment::new(config);
        for statement in constructor.action_statements() {
            env.register(statement);
        }

        let replacement = if env.has_derived() {
            rewrite_constructor(&env, &constructor)
        } else {
            None
        };
        match replacement {
            Some(replacement) => {
                let position = positions.advance_to(constructor.start());
                debug!(
                    table = constructor.table_name(),
                    %position,
                    claims = replacement.claims_inserted,
                    "constructor rewritten"
                );
                text.push_str(&replacement.text);
                rewritten.push(ConstructorReport {
                    table_name: constructor.table_name().to_string(),
                    position,
                    claims_inserted: replacement.claims_inserted,
                });
            }
            None => text.push_str(constructor.as_str()),
        }
    }
    text.push_str(&source[last_offset..]);

    Ok(RewriteOutcome {
        text,
        constructors_seen,
        rewritten,
    })
}
