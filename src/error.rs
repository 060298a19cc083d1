use std::fmt;

/// Represents any failure that can stop a rewrite before output is produced.
#[derive(Debug)]
pub enum RewriteError {
    /// The source never declares `define endian=...;`, so there is no place to splice the preamble.
    MissingEndianDeclaration,
    Config(String),
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::MissingEndianDeclaration => {
                write!(f, "no `define endian=<token>;` declaration found in source")
            }
            RewriteError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for RewriteError {}
