//! Immutable settings shared by every constructor rewrite in a run.

use crate::error::RewriteError;
use crate::sleigh::lexer::is_identifier;

/// Disassembly-time marker for the address of the following instruction.
pub const INST_NEXT: &str = "inst_next";

/// Placeholder program counter used when the caller does not name one.
pub const DEFAULT_PROGRAM_COUNTER: &str = "$(INST_NEXT_PTR)";
pub const DEFAULT_TEMP_NAME: &str = "remill_tmp";
pub const DEFAULT_CLAIM_OP: &str = "claim_eq";

/// How a registered action name is looked up inside a semantics statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatching {
    /// Raw substring containment. `x` also hits `xor` and `max`.
    #[default]
    Substring,
    /// The name must be one of the statement's identifier tokens.
    Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Runtime expression substituted for every `inst_next` in a claim.
    pub program_counter: String,
    /// Size annotation placed verbatim on the temporary, e.g. `4` or `4:4`.
    pub size_hint: String,
    pub temp_name: String,
    pub claim_op: String,
    pub name_matching: NameMatching,
}

impl RewriteConfig {
    pub fn new(size_hint: impl Into<String>) -> Self {
        Self {
            program_counter: DEFAULT_PROGRAM_COUNTER.to_string(),
            size_hint: size_hint.into(),
            temp_name: DEFAULT_TEMP_NAME.to_string(),
            claim_op: DEFAULT_CLAIM_OP.to_string(),
            name_matching: NameMatching::default(),
        }
    }

    pub fn with_program_counter(mut self, program_counter: impl Into<String>) -> Self {
        self.program_counter = program_counter.into();
        self
    }

    pub fn with_temp_name(mut self, temp_name: impl Into<String>) -> Self {
        self.temp_name = temp_name.into();
        self
    }

    pub fn with_claim_op(mut self, claim_op: impl Into<String>) -> Self {
        self.claim_op = claim_op.into();
        self
    }

    pub fn with_name_matching(mut self, name_matching: NameMatching) -> Self {
        self.name_matching = name_matching;
        self
    }

    /// Rejects settings that would splice unusable text into every rewritten constructor.
    pub fn validate(&self) -> Result<(), RewriteError> {
        if self.program_counter.trim().is_empty() {
            return Err(RewriteError::Config("program counter expression is empty".into()));
        }
        if self.program_counter.contains(INST_NEXT) {
            return Err(RewriteError::Config(format!(
                "program counter '{}' mentions {INST_NEXT}, which would survive substitution",
                self.program_counter
            )));
        }
        if self.size_hint.trim().is_empty() {
            return Err(RewriteError::Config("size hint is empty".into()));
        }
        if !is_identifier(&self.temp_name) || self.temp_name.trim() != self.temp_name {
            return Err(RewriteError::Config(format!(
                "temporary name '{}' is not an identifier",
                self.temp_name
            )));
        }
        if !is_identifier(&self.claim_op) || self.claim_op.trim() != self.claim_op {
            return Err(RewriteError::Config(format!(
                "claim operation '{}' is not an identifier",
                self.claim_op
            )));
        }
        Ok(())
    }

    /// Declaration that introduces the claim pseudo-operation to the target file.
    pub fn pcodeop_declaration(&self) -> String {
        format!("define pcodeop {};", self.claim_op)
    }
}
