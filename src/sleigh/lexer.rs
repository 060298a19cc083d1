//! Streaming tokenizer for statement text inside constructor sections.
//!
//! The recognizer works on raw characters; this lexer is only used where whole identifiers matter,
//! e.g. deciding whether a semantics statement actually names an action-defined symbol.

use ahash::AHashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    /// Any single character that is neither whitespace nor part of an identifier/number.
    Symbol,
    EOF,
}

pub struct Lexer<'src> {
    src: &'src str,
    offset: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self { src, offset: 0 }
    }

    /// Produces the next token; returns `EOF` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace();
        let Some(ch) = self.peek_char() else {
            return self.make_token(TokenKind::EOF, self.offset, self.offset);
        };

        match ch {
            ch if ch.is_ascii_digit() => self.consume_number(),
            ch if is_ident_start(ch) => self.consume_identifier(),
            _ => {
                let start = self.offset;
                self.advance_char();
                self.make_token(TokenKind::Symbol, start, self.offset)
            }
        }
    }

    fn consume_identifier(&mut self) -> Token<'src> {
        let start = self.offset;
        self.advance_char();
        while let Some(ch) = self.peek_char() {
            if is_ident_part(ch) {
                self.advance_char();
            } else {
                break;
            }
        }
        self.make_token(TokenKind::Identifier, start, self.offset)
    }

    /// Numbers swallow any trailing alphanumerics so `0x1f` and `4b` stay single tokens.
    fn consume_number(&mut self) -> Token<'src> {
        let start = self.offset;
        self.advance_char();
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance_char();
            } else {
                break;
            }
        }
        self.make_token(TokenKind::Number, start, self.offset)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.offset..].chars().next()
    }

    fn advance_char(&mut self) {
        match self.peek_char() {
            Some(ch) => self.offset += ch.len_utf8(),
            None => self.offset = self.src.len(),
        }
    }

    fn make_token(&self, kind: TokenKind, start: usize, end: usize) -> Token<'src> {
        Token {
            kind,
            lexeme: &self.src[start..end],
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::EOF).then_some(token)
    }
}

/// Collects every identifier lexeme in `src`.
pub fn identifiers(src: &str) -> AHashSet<&str> {
    Lexer::new(src)
        .filter(|token| token.kind == TokenKind::Identifier)
        .map(|token| token.lexeme)
        .collect()
}

/// True when `text` lexes to exactly one identifier token.
pub fn is_identifier(text: &str) -> bool {
    let mut lexer = Lexer::new(text);
    let first = lexer.next_token();
    first.kind == TokenKind::Identifier && lexer.next_token().kind == TokenKind::EOF
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_part(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit() || ch == '.'
}

#[cfg(test)]
mod tests {
    use super::{Lexer, TokenKind, identifiers, is_identifier};

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token();
            kinds.push(token.kind);
            if token.kind == TokenKind::EOF {
                break;
            }
        }
        kinds
    }

    #[test]
    fn lexes_assignment_statement() {
        let stream = kinds("reloc = inst_next + 0x10");
        assert_eq!(
            stream,
            vec![
                TokenKind::Identifier,
                TokenKind::Symbol,
                TokenKind::Identifier,
                TokenKind::Symbol,
                TokenKind::Number,
                TokenKind::EOF
            ]
        );
    }

    #[test]
    fn iterates_lexemes_across_lines() {
        let lexemes: Vec<_> = Lexer::new("a\n  bb\t0x1f;").map(|token| token.lexeme).collect();
        assert_eq!(lexemes, vec!["a", "bb", "0x1f", ";"]);
    }

    #[test]
    fn collects_whole_identifiers_only() {
        let set = identifiers("dest=xyz+x2:4;");
        assert!(set.contains("dest"));
        assert!(set.contains("xyz"));
        assert!(set.contains("x2"));
        assert!(!set.contains("x"));
    }

    #[test]
    fn dotted_names_are_single_identifiers() {
        assert!(is_identifier("ctx.bit"));
        assert!(is_identifier(" reloc "));
        assert!(!is_identifier("a+b"));
        assert!(!is_identifier("4"));
        assert!(!is_identifier(""));
    }
}
