//! Flat recognizer for constructor definitions.
//!
//! A constructor is recognized as
//!
//! ```text
//! table_name ":" display "is" bits ["[" (lhs "=" rhs ";")* "]"] "{" (statement ";")* "}"
//! ```
//!
//! Every section is a run over a restricted character set and none of them may contain its own
//! delimiters, so braces and brackets never nest. Anything that does not fit is simply not a
//! constructor and is left for the caller to pass through.

use std::ops::Range;

/// Human-readable layout of the recognized grammar, logged by the command line front-end.
pub const CONSTRUCTOR_GRAMMAR: &str = concat!(
    r#"<\w*> ":" <[\w\s\[\]+*"^,.#]*> \s "is" \s <[\w\s&|;*+<>()$=]*> "#,
    r#"( "[" (<[\w\s&|;*+<>()$=]+> "=" <[\w\s&|;*+<>()$=]+> ";" \s*)* "]" )? "#,
    r#"\s* "{" \s* <\s ([\w\s\[\]:=*+<>()$&|]* ";")* \s*> \s* "}" \s*"#,
);

const DISPLAY_PUNCTUATION: &str = "[]+*\"^,.#";
const BITS_PUNCTUATION: &str = "&|;*+<>()$=";
const SEMANTICS_PUNCTUATION: &str = "[]:=*+<>()$&|;";
const ENDIAN_TOKEN_PUNCTUATION: &str = "()$";

fn is_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_display_char(ch: char) -> bool {
    is_word(ch) || ch.is_whitespace() || DISPLAY_PUNCTUATION.contains(ch)
}

/// Characters allowed between `is` and the action/semantics sections, and inside the action section.
fn is_bits_char(ch: char) -> bool {
    is_word(ch) || ch.is_whitespace() || BITS_PUNCTUATION.contains(ch)
}

fn is_semantics_char(ch: char) -> bool {
    is_word(ch) || ch.is_whitespace() || SEMANTICS_PUNCTUATION.contains(ch)
}

/// Returns the first offset at or after `from` whose character fails `pred`.
fn scan_while(src: &str, from: usize, pred: impl Fn(char) -> bool) -> usize {
    src[from..]
        .char_indices()
        .find(|&(_, ch)| !pred(ch))
        .map_or(src.len(), |(idx, _)| from + idx)
}

fn char_at(src: &str, offset: usize) -> Option<char> {
    src.get(offset..).and_then(|rest| rest.chars().next())
}

/// One recognized constructor, borrowed from the scanned source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorMatch<'src> {
    src: &'src str,
    span: Range<usize>,
    table_name: Range<usize>,
    display_section: Range<usize>,
    action_section: Option<Range<usize>>,
    semantics: Range<usize>,
}

impl<'src> ConstructorMatch<'src> {
    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    /// The full constructor text, including whitespace that trails the closing brace.
    pub fn as_str(&self) -> &'src str {
        &self.src[self.span.clone()]
    }

    pub fn table_name(&self) -> &'src str {
        &self.src[self.table_name.clone()]
    }

    pub fn display_section(&self) -> &'src str {
        &self.src[self.display_section.clone()]
    }

    /// The bracketed action section, brackets included.
    pub fn action_section(&self) -> Option<&'src str> {
        self.action_section.clone().map(|range| &self.src[range])
    }

    /// Assignment texts between the action brackets, split on `;`.
    ///
    /// The piece after the final `;` (usually whitespace) is yielded as well.
    pub fn action_statements(&self) -> impl Iterator<Item = &'src str> + 'src {
        let inner = self
            .action_section()
            .map(|section| &section[1..section.len() - 1]);
        inner.into_iter().flat_map(|inner| inner.split(';'))
    }

    /// Text between the semantics braces as captured: it starts at the last leading whitespace
    /// character and runs up to the closing brace.
    pub fn semantics(&self) -> &'src str {
        &self.src[self.semantics.clone()]
    }

    /// Constructor text preceding the semantics capture.
    pub fn before_semantics(&self) -> &'src str {
        &self.src[self.span.start..self.semantics.start]
    }

    /// Constructor text following the semantics capture, closing brace included.
    pub fn after_semantics(&self) -> &'src str {
        &self.src[self.semantics.end..self.span.end]
    }
}

/// Lazy left-to-right scan for non-overlapping constructors.
pub struct Constructors<'src> {
    src: &'src str,
    cursor: usize,
}

impl<'src> Constructors<'src> {
    pub fn new(src: &'src str) -> Self {
        Self::starting_at(src, 0)
    }

    pub fn starting_at(src: &'src str, offset: usize) -> Self {
        Self {
            src,
            cursor: offset.min(src.len()),
        }
    }

    /// Restarts the scan at `offset`.
    pub fn resume_at(&mut self, offset: usize) {
        self.cursor = offset.min(self.src.len());
    }
}

impl<'src> Iterator for Constructors<'src> {
    type Item = ConstructorMatch<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let found = find_constructor(self.src, self.cursor);
        self.cursor = match &found {
            Some(found) => found.end(),
            None => self.src.len(),
        };
        found
    }
}

/// Finds the leftmost constructor that starts at or after `from`.
pub fn find_constructor(src: &str, from: usize) -> Option<ConstructorMatch<'_>> {
    let mut search = from;
    while let Some(rel) = src.get(search..)?.find(':') {
        let colon = search + rel;
        if let Some(found) = match_at_colon(src, from, colon) {
            return Some(found);
        }
        search = colon + 1;
    }
    None
}

fn match_at_colon(src: &str, floor: usize, colon: usize) -> Option<ConstructorMatch<'_>> {
    let name_start = src[floor..colon]
        .char_indices()
        .rev()
        .take_while(|&(_, ch)| is_word(ch))
        .last()
        .map_or(colon, |(idx, _)| floor + idx);

    let display_start = colon + 1;
    let display_limit = scan_while(src, display_start, is_display_char);

    // The display run is greedy: try the last `is` separator first and fall back to earlier ones.
    for (separator, rest_start) in is_separators(src, display_start, display_limit).into_iter().rev() {
        if let Some((action_section, semantics, end)) = match_body(src, rest_start) {
            return Some(ConstructorMatch {
                src,
                span: name_start..end,
                table_name: name_start..colon,
                display_section: display_start..separator,
                action_section,
                semantics,
            });
        }
    }
    None
}

/// Positions of every `<ws>is<ws>` inside `src[start..limit]`, as (separator start, offset after it).
fn is_separators(src: &str, start: usize, limit: usize) -> Vec<(usize, usize)> {
    let region = &src[start..limit];
    let mut found = Vec::new();
    for (idx, ch) in region.char_indices() {
        if !ch.is_whitespace() {
            continue;
        }
        let after_ws = idx + ch.len_utf8();
        if !region[after_ws..].starts_with("is") {
            continue;
        }
        let trailing = after_ws + 2;
        if let Some(tail) = region[trailing..].chars().next() {
            if tail.is_whitespace() {
                found.push((start + idx, start + trailing + tail.len_utf8()));
            }
        }
    }
    found
}

type Body = (Option<Range<usize>>, Range<usize>, usize);

/// Matches the bit pattern, the optional action section and the semantics block from `start`.
fn match_body(src: &str, start: usize) -> Option<Body> {
    let bits_end = scan_while(src, start, is_bits_char);
    match char_at(src, bits_end)? {
        '{' => {
            let (semantics, end) = match_semantics(src, bits_end)?;
            Some((None, semantics, end))
        }
        '[' => {
            let content_start = bits_end + 1;
            let content_end = scan_while(src, content_start, is_bits_char);
            if char_at(src, content_end)? != ']' {
                return None;
            }
            if !is_action_content(&src[content_start..content_end]) {
                return None;
            }
            let section_end = content_end + 1;
            let brace = scan_while(src, section_end, char::is_whitespace);
            if char_at(src, brace)? != '{' {
                return None;
            }
            let (semantics, end) = match_semantics(src, brace)?;
            Some((Some(bits_end..section_end), semantics, end))
        }
        _ => None,
    }
}

/// Action content is empty or a run of `lhs=rhs;` items followed by whitespace.
///
/// Both sides may themselves contain `=` and `;`, so a single item covering the whole content
/// exists whenever any item sequence does.
fn is_action_content(content: &str) -> bool {
    if content.is_empty() {
        return true;
    }
    let Some(body) = content.trim_end().strip_suffix(';') else {
        return false;
    };
    body.char_indices()
        .any(|(idx, ch)| ch == '=' && idx > 0 && idx + 1 < body.len())
}

/// Matches `{ ... }` starting at the opening brace; returns the semantics capture and match end.
fn match_semantics(src: &str, brace: usize) -> Option<(Range<usize>, usize)> {
    let content_start = brace + 1;
    let content_end = scan_while(src, content_start, is_semantics_char);
    if char_at(src, content_end)? != '}' {
        return None;
    }
    let content = &src[content_start..content_end];

    let leading = content.len() - content.trim_start().len();
    let (last_ws, _) = content[..leading].char_indices().last()?;

    let tail = content.rfind(';').map_or(content, |idx| &content[idx + 1..]);
    if !tail.chars().all(char::is_whitespace) {
        return None;
    }

    let end = scan_while(src, content_end + 1, char::is_whitespace);
    Some((content_start + last_ws..content_end, end))
}

/// Locates the first `define endian=<token>;` declaration.
pub fn find_endian_declaration(src: &str) -> Option<Range<usize>> {
    const KEYWORD: &str = "define";
    let mut search = 0;
    while let Some(rel) = src[search..].find(KEYWORD) {
        let start = search + rel;
        if let Some(end) = endian_declaration_end(src, start + KEYWORD.len()) {
            return Some(start..end);
        }
        search = start + KEYWORD.len();
    }
    None
}

fn endian_declaration_end(src: &str, from: usize) -> Option<usize> {
    let mut pos = scan_while(src, from, char::is_whitespace);
    pos += src[pos..].starts_with("endian").then_some("endian".len())?;
    pos = scan_while(src, pos, char::is_whitespace);
    if char_at(src, pos)? != '=' {
        return None;
    }
    pos = scan_while(src, pos + 1, char::is_whitespace);
    let token_end = scan_while(src, pos, |ch| {
        is_word(ch) || ENDIAN_TOKEN_PUNCTUATION.contains(ch)
    });
    if token_end == pos {
        return None;
    }
    pos = scan_while(src, token_end, char::is_whitespace);
    (char_at(src, pos)? == ';').then_some(pos + 1)
}
