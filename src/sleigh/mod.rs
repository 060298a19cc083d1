//! Source-level helpers for SLEIGH-style specification text: a constructor recognizer, a small
//! statement lexer, and offset-to-position mapping.

pub mod lexer;
pub mod position;
pub mod recognizer;

pub use lexer::{Lexer, Token, TokenKind};
pub use position::{PositionCursor, SourcePosition};
pub use recognizer::{
    CONSTRUCTOR_GRAMMAR, ConstructorMatch, Constructors, find_constructor, find_endian_declaration,
};
