//! Statement boundary detection.
//!
//! [`BoundaryScanner`] is an incremental byte-level state machine: feed it
//! one byte at a time and it reports when a complete statement has just
//! ended. It never reports a boundary inside a quoted literal, a quoted
//! identifier, a comment, or an open procedural block, so the batcher can
//! cut a stream anywhere it reports `true`.
//!
//! ```text
//! CREATE TRIGGER t BEFORE UPDATE ON users FOR EACH ROW
//! BEGIN                      <- block opens (depth 1)
//!   SET NEW.x = 'a;b';       <- ';' inside a block and a literal: ignored
//! END;                       <- depth 0, ';' is a boundary
//! ```
//!
//! Oracle PL/SQL units ignore `;` entirely and end at a standalone `/` line;
//! SQL Server also ends a statement at a standalone `GO` line.

use crate::dialect::DialectKind;
use crate::error::{PorterError, PorterResult};

/// Lexical rules that differ between dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundaryRules {
    /// `` `ident` `` quoting.
    pub backtick_quotes: bool,
    /// `[ident]` quoting.
    pub bracket_quotes: bool,
    /// `$tag$ ... $tag$` literals.
    pub dollar_quotes: bool,
    /// `# comment` lines.
    pub hash_comments: bool,
    /// `\'` escapes inside string literals.
    pub backslash_escapes: bool,
    /// Standalone `/` lines end statements; PL/SQL units end only there.
    pub slash_terminator: bool,
    /// Standalone `GO` lines end statements.
    pub go_separator: bool,
}

impl BoundaryRules {
    pub fn for_dialect(kind: DialectKind) -> Self {
        let base = Self::default();
        match kind {
            DialectKind::Oracle => Self {
                slash_terminator: true,
                ..base
            },
            DialectKind::MySql => Self {
                backtick_quotes: true,
                hash_comments: true,
                backslash_escapes: true,
                ..base
            },
            DialectKind::Postgres => Self {
                dollar_quotes: true,
                ..base
            },
            DialectKind::SqlServer => Self {
                bracket_quotes: true,
                go_separator: true,
                ..base
            },
            DialectKind::Sqlite => Self {
                backtick_quotes: true,
                bracket_quotes: true,
                ..base
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lex {
    Normal,
    /// Saw `-`, may open a line comment.
    Dash,
    /// Saw `/`, may open a block comment.
    Slash,
    LineComment,
    BlockComment,
    BlockCommentStar,
    /// Inside a quoted region closed by the given byte.
    Quote(u8),
    /// Saw the closing byte; a second one is an escaped quote.
    QuoteEnd(u8),
    /// Saw a backslash inside a string literal.
    Escape(u8),
    /// Reading the tag of a `$tag$` opener.
    DollarTag,
    /// Inside a dollar-quoted body.
    Dollar,
}

const WORD_CAP: usize = 16;
const HEAD_WORDS: usize = 5;
const LINE_CAP: usize = 3;

type Word = ([u8; WORD_CAP], usize);

/// Words after which a bare `BEGIN` names a column or object.
const NAME_POSITION: &[&[u8]] = &[
    b"OF", b"ON", b"TABLE", b"TRIGGER", b"PROCEDURE", b"PROC", b"FUNCTION", b"EVENT", b"WHEN",
    b"WHERE", b"SET", b"SELECT", b"INTO", b"BY", b"AND", b"OR", b"NOT", b"COLUMN",
];

/// Object keywords that end the search for a routine in a `CREATE` head.
const PLAIN_OBJECTS: &[&[u8]] = &[
    b"TABLE", b"VIEW", b"INDEX", b"SEQUENCE", b"SCHEMA", b"DATABASE", b"TYPE", b"DOMAIN",
    b"EXTENSION", b"ROLE", b"USER",
];

/// The token before the current word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Word(Word),
    Punct(u8),
    /// A quoted identifier or literal.
    Quoted,
}

/// Incremental statement boundary detector.
#[derive(Debug, Clone)]
pub struct BoundaryScanner {
    rules: BoundaryRules,
    state: Lex,
    word: Word,
    /// Leading words of the current statement.
    head: [Word; HEAD_WORDS],
    head_len: usize,
    words: usize,
    prev: Prev,
    parens: u32,
    depth: u32,
    pending_end: bool,
    plsql: bool,
    content: bool,
    last_content: bool,
    line: [u8; LINE_CAP],
    line_len: usize,
    line_dirty: bool,
    dollar_tag: Vec<u8>,
    dollar_close: Option<usize>,
}

impl BoundaryScanner {
    pub fn new(rules: BoundaryRules) -> Self {
        Self {
            rules,
            state: Lex::Normal,
            word: ([0; WORD_CAP], 0),
            head: [([0; WORD_CAP], 0); HEAD_WORDS],
            head_len: 0,
            words: 0,
            prev: Prev::Start,
            parens: 0,
            depth: 0,
            pending_end: false,
            plsql: false,
            content: false,
            last_content: false,
            line: [0; LINE_CAP],
            line_len: 0,
            line_dirty: false,
            dollar_tag: Vec::new(),
            dollar_close: None,
        }
    }

    pub fn rules(&self) -> BoundaryRules {
        self.rules
    }

    /// Feed one byte. Returns `true` if a statement ends right after it.
    pub fn feed(&mut self, b: u8) -> bool {
        match self.state {
            Lex::Normal => self.normal(b),
            Lex::Dash => {
                if b == b'-' {
                    self.line_pop();
                    self.state = Lex::LineComment;
                    false
                } else {
                    self.content = true;
                    self.prev = Prev::Punct(b'-');
                    self.state = Lex::Normal;
                    self.normal(b)
                }
            }
            Lex::Slash => {
                if b == b'*' {
                    self.line_pop();
                    self.state = Lex::BlockComment;
                    false
                } else {
                    self.content = true;
                    self.prev = Prev::Punct(b'/');
                    self.state = Lex::Normal;
                    self.normal(b)
                }
            }
            Lex::LineComment => {
                if b == b'\n' {
                    self.state = Lex::Normal;
                    return self.end_line();
                }
                false
            }
            Lex::BlockComment => {
                match b {
                    b'*' => self.state = Lex::BlockCommentStar,
                    b'\n' => self.reset_line(false),
                    _ => {}
                }
                false
            }
            Lex::BlockCommentStar => {
                self.state = match b {
                    b'/' => Lex::Normal,
                    b'*' => Lex::BlockCommentStar,
                    _ => Lex::BlockComment,
                };
                if b == b'\n' {
                    self.reset_line(false);
                }
                false
            }
            Lex::Quote(close) => {
                if b == close {
                    self.state = Lex::QuoteEnd(close);
                } else if b == b'\\' && self.rules.backslash_escapes && matches!(close, b'\'' | b'"') {
                    self.state = Lex::Escape(close);
                } else if b == b'\n' {
                    self.reset_line(true);
                }
                false
            }
            Lex::QuoteEnd(close) => {
                if b == close {
                    self.state = Lex::Quote(close);
                    false
                } else {
                    self.state = Lex::Normal;
                    self.normal(b)
                }
            }
            Lex::Escape(close) => {
                self.state = Lex::Quote(close);
                false
            }
            Lex::DollarTag => {
                if b == b'$' {
                    self.state = Lex::Dollar;
                    self.dollar_close = None;
                    self.line_dirty = true;
                    false
                } else if b.is_ascii_alphabetic()
                    || b == b'_'
                    || (b.is_ascii_digit() && !self.dollar_tag.is_empty())
                {
                    self.dollar_tag.push(b);
                    self.line_push(b);
                    false
                } else {
                    // Positional parameter or stray `$`, not a literal.
                    self.state = Lex::Normal;
                    self.normal(b)
                }
            }
            Lex::Dollar => {
                self.dollar_body(b);
                if b == b'\n' {
                    self.reset_line(true);
                }
                false
            }
        }
    }

    /// Check the state at end of input.
    ///
    /// Ending inside a quoted region or a block comment means the input was
    /// truncated; nothing after that point can be trusted.
    pub fn finish(&mut self) -> PorterResult<()> {
        self.end_word();
        match self.state {
            Lex::Quote(_) | Lex::Escape(_) => Err(PorterError::invalid(
                "unterminated quoted literal or identifier at end of input",
            )),
            Lex::BlockComment | Lex::BlockCommentStar => Err(PorterError::invalid(
                "unterminated block comment at end of input",
            )),
            Lex::Dollar => Err(PorterError::invalid(
                "unterminated dollar-quoted string at end of input",
            )),
            _ => Ok(()),
        }
    }

    /// `true` if the statement in progress has seen anything besides
    /// whitespace and comments.
    pub fn has_content(&self) -> bool {
        self.content
    }

    /// Whether the statement closed by the last boundary had any content.
    pub fn last_had_content(&self) -> bool {
        self.last_content
    }

    fn normal(&mut self, b: u8) -> bool {
        if self.is_word_byte(b) {
            let (buf, len) = &mut self.word;
            if *len < WORD_CAP {
                buf[*len] = b.to_ascii_uppercase();
            }
            *len += 1;
            self.content = true;
            self.line_push(b);
            return false;
        }
        self.end_word();

        match b {
            b'\n' => return self.end_line(),
            b' ' | b'\t' | b'\r' | 0x0c => {}
            b';' => {
                self.content = true;
                self.prev = Prev::Punct(b';');
                self.line_push(b);
                return self.terminator();
            }
            b'-' => {
                self.line_push(b);
                self.state = Lex::Dash;
            }
            b'/' => {
                self.line_push(b);
                self.state = Lex::Slash;
            }
            b'\'' | b'"' => self.enter_quote(b),
            b'`' if self.rules.backtick_quotes => self.enter_quote(b'`'),
            b'[' if self.rules.bracket_quotes => self.enter_quote(b']'),
            b'#' if self.rules.hash_comments => self.state = Lex::LineComment,
            b'$' if self.rules.dollar_quotes => {
                self.content = true;
                self.prev = Prev::Quoted;
                self.line_push(b);
                self.dollar_tag.clear();
                self.state = Lex::DollarTag;
            }
            _ => {
                match b {
                    b'(' => self.parens += 1,
                    b')' => self.parens = self.parens.saturating_sub(1),
                    _ => {}
                }
                self.content = true;
                self.prev = Prev::Punct(b);
                self.line_push(b);
            }
        }
        false
    }

    fn is_word_byte(&self, b: u8) -> bool {
        b.is_ascii_alphanumeric()
            || b == b'_'
            || b >= 0x80
            || (self.word.1 > 0 && (b == b'$' || b == b'#'))
    }

    fn enter_quote(&mut self, close: u8) {
        self.content = true;
        self.prev = Prev::Quoted;
        self.line_dirty = true;
        self.state = Lex::Quote(close);
    }

    fn dollar_body(&mut self, b: u8) {
        self.dollar_close = match self.dollar_close {
            None if b == b'$' => Some(0),
            None => None,
            Some(n) if n < self.dollar_tag.len() => {
                if b == self.dollar_tag[n] {
                    Some(n + 1)
                } else if b == b'$' {
                    Some(0)
                } else {
                    None
                }
            }
            Some(_) => {
                if b == b'$' {
                    self.state = Lex::Normal;
                    self.dollar_tag.clear();
                }
                None
            }
        };
    }

    fn end_word(&mut self) {
        let (buf, len) = self.word;
        if len == 0 {
            return;
        }
        self.word.1 = 0;
        let len = if len > WORD_CAP {
            // Too long to be a keyword.
            0
        } else {
            len
        };
        self.on_word(&buf[..len]);
        self.prev = Prev::Word((buf, len));
    }

    fn on_word(&mut self, w: &[u8]) {
        if self.pending_end {
            self.pending_end = false;
            match w {
                b"IF" | b"LOOP" | b"WHILE" | b"REPEAT" => return,
                b"CASE" => {
                    self.close_block();
                    return;
                }
                _ => self.close_block(),
            }
        }

        self.words += 1;
        if self.head_len < HEAD_WORDS {
            let slot = &mut self.head[self.head_len];
            slot.0[..w.len()].copy_from_slice(w);
            slot.1 = w.len();
            self.head_len += 1;
            if self.rules.slash_terminator && !self.plsql {
                self.plsql = self.head_is_plsql_unit();
            }
        }

        if self.rules.slash_terminator {
            return;
        }
        match w {
            b"BEGIN" if self.opens_block() => self.depth += 1,
            b"CASE" => self.depth += 1,
            b"END" if self.depth > 0 => self.pending_end = true,
            _ => {}
        }
    }

    /// Whether a `BEGIN` just read starts a procedural body rather than
    /// naming a column (`begin TIMESTAMP`, `a.begin`) or a transaction.
    fn opens_block(&self) -> bool {
        if self.words < 2 || self.parens > 0 {
            return false;
        }
        if self.depth == 0 && !self.head_is_block_context() {
            return false;
        }
        match self.prev {
            Prev::Start => false,
            Prev::Punct(p) => matches!(p, b')' | b';' | b':'),
            Prev::Quoted => true,
            Prev::Word((buf, len)) => !NAME_POSITION.contains(&&buf[..len]),
        }
    }

    /// `CREATE ... TRIGGER|PROCEDURE|FUNCTION|EVENT`, or a top-level
    /// `IF`/`WHILE` batch.
    fn head_is_block_context(&self) -> bool {
        let mut words = self.head[..self.head_len]
            .iter()
            .map(|(buf, len)| &buf[..*len]);
        match words.next() {
            Some(b"IF") | Some(b"WHILE") | Some(b"ELSE") => return true,
            Some(b"CREATE") | Some(b"ALTER") => {}
            _ => return false,
        }
        for w in words {
            match w {
                b"TRIGGER" | b"PROCEDURE" | b"PROC" | b"FUNCTION" | b"EVENT" => return true,
                w if PLAIN_OBJECTS.contains(&w) => return false,
                _ => {}
            }
        }
        false
    }

    /// `CREATE [OR REPLACE] [EDITIONABLE] TRIGGER|PROCEDURE|...`, or an
    /// anonymous `BEGIN`/`DECLARE` block.
    fn head_is_plsql_unit(&self) -> bool {
        let mut words = self.head[..self.head_len]
            .iter()
            .map(|(buf, len)| &buf[..*len]);
        match words.next() {
            Some(b"BEGIN") | Some(b"DECLARE") => return true,
            Some(b"CREATE") => {}
            _ => return false,
        }
        let mut next = words.next();
        if matches!(next, Some(b"OR")) {
            words.next();
            next = words.next();
        }
        if matches!(next, Some(b"EDITIONABLE") | Some(b"NONEDITIONABLE")) {
            next = words.next();
        }
        matches!(
            next,
            Some(b"TRIGGER") | Some(b"PROCEDURE") | Some(b"FUNCTION") | Some(b"PACKAGE") | Some(b"TYPE")
        )
    }

    fn close_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn terminator(&mut self) -> bool {
        if self.pending_end {
            self.pending_end = false;
            self.close_block();
        }
        if self.plsql || self.depth > 0 {
            return false;
        }
        self.reset_statement();
        true
    }

    fn end_line(&mut self) -> bool {
        let boundary = !self.line_dirty
            && ((self.rules.slash_terminator && self.line_is(b"/"))
                || (self.rules.go_separator && self.line_is(b"GO")));
        self.reset_line(false);
        if boundary {
            self.reset_statement();
        }
        boundary
    }

    fn reset_statement(&mut self) {
        self.depth = 0;
        self.pending_end = false;
        self.words = 0;
        self.prev = Prev::Start;
        self.parens = 0;
        self.head_len = 0;
        self.plsql = false;
        self.last_content = self.content;
        self.content = false;
    }

    fn line_push(&mut self, b: u8) {
        if self.line_len < LINE_CAP {
            self.line[self.line_len] = b;
        }
        self.line_len += 1;
    }

    fn line_pop(&mut self) {
        self.line_len = self.line_len.saturating_sub(1);
    }

    fn line_is(&self, expected: &[u8]) -> bool {
        self.line_len == expected.len() && self.line[..self.line_len].eq_ignore_ascii_case(expected)
    }

    fn reset_line(&mut self, dirty: bool) {
        self.line_len = 0;
        self.line_dirty = dirty;
    }
}

/// One statement cut out of a script, terminator removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement<'a> {
    /// Byte offset of `text` in the script.
    pub offset: usize,
    pub text: &'a str,
}

/// Split a script into statements using the same rules as the batcher.
pub fn split_statements(script: &str, rules: BoundaryRules) -> PorterResult<Vec<Statement<'_>>> {
    let mut scanner = BoundaryScanner::new(rules);
    let mut statements = Vec::new();
    let mut start = 0;

    for (i, &b) in script.as_bytes().iter().enumerate() {
        if scanner.feed(b) {
            if scanner.last_had_content() {
                push_statement(&mut statements, script, start, i + 1, rules);
            }
            start = i + 1;
        }
    }
    scanner.finish()?;
    if scanner.has_content() {
        push_statement(&mut statements, script, start, script.len(), rules);
    }
    Ok(statements)
}

fn push_statement<'a>(
    out: &mut Vec<Statement<'a>>,
    script: &'a str,
    start: usize,
    end: usize,
    rules: BoundaryRules,
) {
    let raw = &script[start..end];
    let body = strip_terminator(raw, rules);
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        return;
    }
    out.push(Statement {
        offset: start + (body.len() - trimmed.len()),
        text: trimmed,
    });
}

/// Drop a trailing `/` or `GO` line and then one trailing `;`.
fn strip_terminator(raw: &str, rules: BoundaryRules) -> &str {
    let mut s = raw.trim_end();
    if rules.slash_terminator || rules.go_separator {
        let (head, last) = match s.rfind('\n') {
            Some(pos) => (&s[..pos], s[pos + 1..].trim()),
            None => ("", s.trim()),
        };
        if (rules.slash_terminator && last == "/")
            || (rules.go_separator && last.eq_ignore_ascii_case("GO"))
        {
            s = head.trim_end();
        }
    }
    s.strip_suffix(';').unwrap_or(s).trim_end()
}
