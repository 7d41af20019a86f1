//! Import/export declaration scanner.
//!
//! Scans JavaScript/TypeScript source for static import declarations and
//! re-exporting export declarations, reporting the byte span of each module
//! specifier so it can be replaced in place. Dynamic `import()` calls,
//! `import.meta` and `import x = require(...)` are not declarations and are
//! skipped.

/// Which statement a specifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Import,
    Export,
}

impl DeclarationKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Export => "export",
        }
    }
}

/// A string literal in source, quotes included in the span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    /// Byte offset of the opening quote.
    pub start: usize,
    /// Byte offset just past the closing quote.
    pub end: usize,
    /// `'` or `"`.
    pub quote: char,
    /// Text between the quotes, escapes left as written.
    pub value: String,
}

/// One import or export declaration carrying a module specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDeclaration {
    pub kind: DeclarationKind,
    pub specifier: StringLiteral,
    /// Whether a `with { ... }` or `assert { ... }` clause follows the specifier.
    pub has_attributes: bool,
    /// Line of the `import`/`export` keyword (1-indexed).
    pub line: u32,
}

/// Keywords after which a `/` starts a regex literal.
const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "throw", "yield", "await", "in", "of", "delete", "void",
    "new", "default", "instanceof", "else", "do",
];

/// Last significant token seen by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last<'a> {
    Start,
    Punct(u8),
    Word(&'a str),
}

/// Scan source code for module declarations, in source order.
#[must_use]
pub fn scan_declarations(source: &str) -> Vec<ModuleDeclaration> {
    let mut cursor = Cursor::new(source);
    let mut results = Vec::new();
    // Tells regex literals from division and rejects member accesses
    // like `obj.import`.
    let mut last = Last::Start;

    if source.starts_with('\u{FEFF}') {
        cursor.pos = '\u{FEFF}'.len_utf8();
    }

    while let Some(b) = cursor.peek() {
        match b {
            b'/' if cursor.peek_at(1) == Some(b'/') || cursor.peek_at(1) == Some(b'*') => {
                cursor.skip_comment();
            }
            b'/' if regex_allowed(last) => {
                cursor.skip_regex();
                last = Last::Punct(b'/');
            }
            b'\'' | b'"' => {
                cursor.skip_string();
                last = Last::Punct(b);
            }
            b'`' => {
                cursor.skip_template();
                last = Last::Punct(b);
            }
            b if is_ident_byte(b) => {
                let start = cursor.pos;
                let word = cursor.read_word();
                let member = last == Last::Punct(b'.');
                last = Last::Word(word);
                if member {
                    continue;
                }
                let found = match word {
                    "import" => cursor.scan_import(),
                    "export" => cursor.scan_export(),
                    _ => None,
                };
                if let Some((kind, specifier)) = found {
                    let has_attributes = cursor.skip_attributes();
                    results.push(ModuleDeclaration {
                        kind,
                        specifier,
                        has_attributes,
                        line: line_of(source, start),
                    });
                    last = Last::Punct(b';');
                }
            }
            b if b.is_ascii_whitespace() => cursor.pos += 1,
            _ => {
                last = Last::Punct(b);
                cursor.pos += 1;
            }
        }
    }

    results
}

/// Whether a `/` after `last` starts a regex literal rather than a division.
fn regex_allowed(last: Last<'_>) -> bool {
    match last {
        Last::Start => true,
        Last::Punct(b) => b"(,=:[!&|?{};+-*%<>~^".contains(&b),
        Last::Word(word) => REGEX_KEYWORDS.contains(&word),
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn line_of(source: &str, offset: usize) -> u32 {
    let newlines = source.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    u32::try_from(newlines + 1).unwrap_or(u32::MAX)
}

struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn read_word(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_byte) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'/' && matches!(self.peek_at(1), Some(b'/' | b'*')) {
                self.skip_comment();
            } else {
                break;
            }
        }
    }

    /// Skip a `//` or `/* */` comment starting at the cursor.
    fn skip_comment(&mut self) {
        if self.peek_at(1) == Some(b'/') {
            while self.peek().is_some_and(|b| b != b'\n') {
                self.pos += 1;
            }
        } else {
            self.pos += 2;
            while self.pos < self.bytes.len()
                && !(self.bytes[self.pos] == b'*' && self.peek_at(1) == Some(b'/'))
            {
                self.pos += 1;
            }
            self.pos = (self.pos + 2).min(self.bytes.len());
        }
    }

    /// Skip a quoted string. Stops at an unescaped newline if unterminated.
    ///
    /// Returns `true` if the closing quote was found.
    fn skip_string(&mut self) -> bool {
        let quote = self.bytes[self.pos];
        self.pos += 1;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => self.pos += 2,
                b'\n' => return false,
                _ if b == quote => {
                    self.pos += 1;
                    return true;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
        false
    }

    /// Skip a template literal, including nested `${ ... }` expressions.
    fn skip_template(&mut self) {
        self.pos += 1;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return;
                }
                b'$' if self.peek_at(1) == Some(b'{') => {
                    self.pos += 1;
                    self.skip_braces();
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    /// Skip a regex literal, character classes included.
    fn skip_regex(&mut self) {
        self.pos += 1;
        let mut in_class = false;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => self.pos += 2,
                b'\n' => return,
                b'[' => {
                    in_class = true;
                    self.pos += 1;
                }
                b']' => {
                    in_class = false;
                    self.pos += 1;
                }
                b'/' if !in_class => {
                    self.pos += 1;
                    while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
                        self.pos += 1;
                    }
                    return;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    /// Skip a balanced `{ ... }` block starting at the cursor.
    fn skip_braces(&mut self) {
        let mut depth = 0usize;
        while let Some(b) = self.peek() {
            match b {
                b'/' if matches!(self.peek_at(1), Some(b'/' | b'*')) => self.skip_comment(),
                b'\'' | b'"' => {
                    self.skip_string();
                }
                b'`' => self.skip_template(),
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    self.pos += 1;
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Read a complete string literal at the cursor.
    fn read_literal(&mut self) -> Option<StringLiteral> {
        let start = self.pos;
        let quote = self.peek()?;
        if quote != b'\'' && quote != b'"' {
            return None;
        }
        if !self.skip_string() {
            return None;
        }
        Some(StringLiteral {
            start,
            end: self.pos,
            quote: char::from(quote),
            value: self.src[start + 1..self.pos - 1].to_string(),
        })
    }

    /// Parse the rest of an import declaration after the `import` keyword.
    fn scan_import(&mut self) -> Option<(DeclarationKind, StringLiteral)> {
        let resume = self.pos;
        self.skip_trivia();

        let found = match self.peek() {
            // import('./x') and import.meta
            Some(b'(' | b'.') | None => None,
            Some(b'\'' | b'"') => self.read_literal(),
            Some(_) => self.scan_from_clause(),
        };

        if found.is_none() {
            self.pos = resume;
        }
        found.map(|literal| (DeclarationKind::Import, literal))
    }

    /// Walk an import clause up to `from '<specifier>'`.
    fn scan_from_clause(&mut self) -> Option<StringLiteral> {
        loop {
            self.skip_trivia();
            match self.peek()? {
                b'{' => self.skip_braces(),
                b'*' | b',' => self.pos += 1,
                b if is_ident_byte(b) => {
                    if self.read_word() == "from" {
                        self.skip_trivia();
                        if matches!(self.peek(), Some(b'\'' | b'"')) {
                            return self.read_literal();
                        }
                    }
                }
                // `=` (import-equals), `;` and anything else ends the clause
                _ => return None,
            }
        }
    }

    /// Parse the rest of an export declaration after the `export` keyword.
    ///
    /// Only re-exports (`export * from`, `export { } from`) carry a specifier.
    fn scan_export(&mut self) -> Option<(DeclarationKind, StringLiteral)> {
        let resume = self.pos;
        let found = self.scan_reexport();
        if found.is_none() {
            self.pos = resume;
        }
        found.map(|literal| (DeclarationKind::Export, literal))
    }

    fn scan_reexport(&mut self) -> Option<StringLiteral> {
        self.skip_trivia();
        if self.peek().is_some_and(is_ident_byte) {
            if self.read_word() != "type" {
                return None;
            }
            self.skip_trivia();
        }

        match self.peek()? {
            b'*' => {
                self.pos += 1;
                self.skip_trivia();
                if self.peek().is_some_and(is_ident_byte) {
                    let word = self.read_word();
                    if word == "from" {
                        return self.expect_literal();
                    }
                    if word != "as" {
                        return None;
                    }
                    self.skip_trivia();
                    match self.peek()? {
                        b'\'' | b'"' => {
                            self.read_literal()?;
                        }
                        b if is_ident_byte(b) => {
                            self.read_word();
                        }
                        _ => return None,
                    }
                }
            }
            b'{' => self.skip_braces(),
            _ => return None,
        }

        self.skip_trivia();
        if !self.peek().is_some_and(is_ident_byte) || self.read_word() != "from" {
            return None;
        }
        self.expect_literal()
    }

    fn expect_literal(&mut self) -> Option<StringLiteral> {
        self.skip_trivia();
        self.read_literal()
    }

    /// Consume a `with { ... }` / `assert { ... }` clause if one follows.
    fn skip_attributes(&mut self) -> bool {
        let resume = self.pos;
        self.skip_trivia();
        if self.peek().is_some_and(is_ident_byte) {
            let word = self.read_word();
            if word == "with" || word == "assert" {
                self.skip_trivia();
                if self.peek() == Some(b'{') {
                    self.skip_braces();
                    return true;
                }
            }
        }
        self.pos = resume;
        false
    }
}
