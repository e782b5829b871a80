//! DDL tokenizer using nom.
//!
//! Produces a flat token list for one statement. Every token keeps its byte
//! span so the grammar can slice verbatim text (defaults, check predicates,
//! view queries, trigger bodies) straight out of the source.
//!
//! ```text
//! CREATE TABLE "Users" (id NUMBER(10) DEFAULT 'x''y')
//! ─┬──── ─┬─── ───┬─── ┬─┬─ ─┬──── ┬ ─┬─ ───┬────── ┬
//!  Word   Word  Quoted P W  Word  P N  Word String   P
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{anychar, char, digit0, digit1, not_line_ending},
    combinator::{map, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::dialect::DialectKind;
use crate::error::{PorterError, PorterResult};
use crate::stream::boundary::BoundaryRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word: keyword or unquoted identifier.
    Word,
    /// `"x"`, `` `x` `` or `[x]`.
    QuotedIdent,
    /// `'...'` literal.
    String,
    /// `$tag$...$tag$` literal.
    DollarString,
    Number,
    /// Any other single character.
    Punct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset in the tokenized text.
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Case-insensitive keyword match on a bare word.
    pub fn is_word(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.starts_with(c)
    }

    /// Upper-cased text of a bare word; empty for anything else.
    pub fn keyword(&self) -> String {
        match self.kind {
            TokenKind::Word => self.text.to_ascii_uppercase(),
            _ => String::new(),
        }
    }

    /// Identifier value: bare words as written, quoted identifiers unquoted.
    pub fn ident(&self) -> Option<String> {
        match self.kind {
            TokenKind::Word => Some(self.text.to_string()),
            TokenKind::QuotedIdent => Some(unquote(self.text)),
            _ => None,
        }
    }
}

/// Strip the delimiters of a quoted token and collapse doubled closers.
pub fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    let Some(open) = chars.next() else {
        return String::new();
    };
    let close = match open {
        '[' => ']',
        other => other,
    };
    let inner = &text[open.len_utf8()..];
    let inner = inner.strip_suffix(close).unwrap_or(inner);
    let doubled: String = [close, close].iter().collect();
    inner.replace(&doubled, &close.to_string())
}

/// Tokenize one statement.
pub fn tokenize(sql: &str, kind: DialectKind) -> PorterResult<Vec<Token<'_>>> {
    let rules = BoundaryRules::for_dialect(kind);
    let mut tokens = Vec::new();
    let mut input = sql;

    loop {
        input = skip_trivia(input, rules.hash_comments);
        if input.is_empty() {
            return Ok(tokens);
        }
        let offset = sql.len() - input.len();
        let (rest, (kind, text)) = token(input, rules)
            .map_err(|_| PorterError::syntax(offset, "unreadable token"))?;
        tokens.push(Token { kind, text, offset });
        input = rest;
    }
}

fn token(input: &str, rules: BoundaryRules) -> IResult<&str, (TokenKind, &str)> {
    if rules.dollar_quotes {
        if let Ok((rest, text)) = dollar_string(input) {
            return Ok((rest, (TokenKind::DollarString, text)));
        }
    }
    if rules.backtick_quotes {
        if let Ok((rest, text)) = quoted(input, '`', '`', false) {
            return Ok((rest, (TokenKind::QuotedIdent, text)));
        }
    }
    if rules.bracket_quotes {
        if let Ok((rest, text)) = quoted(input, '[', ']', false) {
            return Ok((rest, (TokenKind::QuotedIdent, text)));
        }
    }

    alt((
        map(
            |i| quoted(i, '\'', '\'', rules.backslash_escapes),
            |s| (TokenKind::String, s),
        ),
        map(|i| quoted(i, '"', '"', false), |s| (TokenKind::QuotedIdent, s)),
        map(number, |s| (TokenKind::Number, s)),
        map(word, |s| (TokenKind::Word, s)),
        map(recognize(anychar), |s| (TokenKind::Punct, s)),
    ))(input)
}

fn skip_trivia(input: &str, hash_comments: bool) -> &str {
    let mut input = input;
    loop {
        input = input.trim_start();
        if let Ok((rest, _)) = comment(input) {
            input = rest;
            continue;
        }
        if hash_comments {
            if let Ok((rest, _)) = hash_comment(input) {
                input = rest;
                continue;
            }
        }
        return input;
    }
}

/// `-- ...` or `/* ... */`.
fn comment(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(tag("--"), not_line_ending)),
        recognize(tuple((tag("/*"), take_until("*/"), tag("*/")))),
    ))(input)
}

fn hash_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('#'), not_line_ending))(input)
}

/// Identifier or keyword. `$` and `#` are allowed after the first character
/// (Oracle `V$SESSION`, `SYS#x`).
fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '$' || c == '#'),
    ))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, opt(pair(char('.'), digit0))))(input)
}

/// `$tag$ ... $tag$` with an optional tag.
fn dollar_string(input: &str) -> IResult<&str, &str> {
    let (rest, delimiter) = recognize(tuple((
        char('$'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
        char('$'),
    )))(input)?;
    let (rest, _) = take_until(delimiter)(rest)?;
    let (rest, _) = tag(delimiter)(rest)?;
    Ok((rest, &input[..input.len() - rest.len()]))
}

/// A region between `open` and `close`, where a doubled `close` is an
/// escaped one. Fails on an unterminated region.
fn quoted(input: &str, open: char, close: char, backslash: bool) -> IResult<&str, &str> {
    let (body, _) = char(open)(input)?;
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if backslash && c == '\\' {
            chars.next();
            continue;
        }
        if c == close {
            if matches!(chars.peek(), Some((_, next)) if *next == close) {
                chars.next();
                continue;
            }
            let end = input.len() - body.len() + i + c.len_utf8();
            return Ok((&input[end..], &input[..end]));
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(sql: &str, dialect: DialectKind) -> Vec<(TokenKind, &str)> {
        tokenize(sql, dialect)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("CREATE TABLE t (id NUMBER(10,2) DEFAULT 'a''b');", DialectKind::Oracle),
            vec![
                (Word, "CREATE"),
                (Word, "TABLE"),
                (Word, "t"),
                (Punct, "("),
                (Word, "id"),
                (Word, "NUMBER"),
                (Punct, "("),
                (Number, "10"),
                (Punct, ","),
                (Number, "2"),
                (Punct, ")"),
                (Word, "DEFAULT"),
                (String, "'a''b'"),
                (Punct, ")"),
                (Punct, ";"),
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("-- lead\nSELECT /* mid */ 1 # tail", DialectKind::MySql).unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, ["SELECT", "1"]);
        assert_eq!(tokens[0].offset, 8);
    }

    #[test]
    fn test_dialect_quoting() {
        let mysql = tokenize("`my col`", DialectKind::MySql).unwrap();
        assert_eq!(mysql[0].ident().as_deref(), Some("my col"));

        let mssql = tokenize("[order]]s]", DialectKind::SqlServer).unwrap();
        assert_eq!(mssql[0].ident().as_deref(), Some("order]s"));

        let pg = tokenize("\"Mixed\"\"Case\"", DialectKind::Postgres).unwrap();
        assert_eq!(pg[0].ident().as_deref(), Some("Mixed\"Case"));
    }

    #[test]
    fn test_dollar_quoted_body() {
        let tokens = tokenize("AS $fn$ BEGIN RETURN 1; END $fn$ LANGUAGE", DialectKind::Postgres).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::DollarString);
        assert_eq!(tokens[1].text, "$fn$ BEGIN RETURN 1; END $fn$");
    }

    #[test]
    fn test_oracle_dollar_in_word() {
        let tokens = tokenize("V$SESSION", DialectKind::Oracle).unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_word("v$session"));
    }
}
