use crate::parser::Parser;
use crate::parser_diagnostics::ParseError;
use crate::token::{Token, TokenKind};
use bstr::{BStr, ByteSlice};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use unicode_general_category::{get_general_category, GeneralCategory};

static KEYWORDS: Lazy<HashMap<&'static BStr, TokenKind>> = Lazy::new(|| {
    [
        ("async", TokenKind::Async),
        ("await", TokenKind::Await),
        ("break", TokenKind::Break),
        ("case", TokenKind::Case),
        ("catch", TokenKind::Catch),
        ("class", TokenKind::Class),
        ("const", TokenKind::Const),
        ("continue", TokenKind::Continue),
        ("debugger", TokenKind::Debugger),
        ("default", TokenKind::Default),
        ("delete", TokenKind::Delete),
        ("do", TokenKind::Do),
        ("else", TokenKind::Else),
        ("enum", TokenKind::Enum),
        ("export", TokenKind::Export),
        ("extends", TokenKind::Extends),
        ("false", TokenKind::False),
        ("finally", TokenKind::Finally),
        ("for", TokenKind::For),
        ("function", TokenKind::Function),
        ("if", TokenKind::If),
        ("import", TokenKind::Import),
        ("in", TokenKind::In),
        ("instanceof", TokenKind::Instanceof),
        ("let", TokenKind::Let),
        ("new", TokenKind::New),
        ("null", TokenKind::Null),
        ("return", TokenKind::Return),
        ("static", TokenKind::Static),
        ("super", TokenKind::Super),
        ("switch", TokenKind::Switch),
        ("this", TokenKind::This),
        ("throw", TokenKind::Throw),
        ("true", TokenKind::True),
        ("try", TokenKind::Try),
        ("typeof", TokenKind::Typeof),
        ("var", TokenKind::Var),
        ("void", TokenKind::Void),
        ("while", TokenKind::While),
        ("with", TokenKind::With),
        ("yield", TokenKind::Yield),
    ]
    .into_iter()
    .map(|(k, v)| (k.as_bytes().as_bstr(), v))
    .collect::<HashMap<_, _>>()
});

fn is_ident_start(ch: char) -> bool {
    ch == '$'
        || ch == '_'
        || matches!(
            get_general_category(ch),
            GeneralCategory::UppercaseLetter
                | GeneralCategory::LowercaseLetter
                | GeneralCategory::TitlecaseLetter
                | GeneralCategory::ModifierLetter
                | GeneralCategory::OtherLetter
                | GeneralCategory::LetterNumber
        )
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch)
        || ch == '\u{200c}'
        || ch == '\u{200d}'
        || matches!(
            get_general_category(ch),
            GeneralCategory::NonspacingMark
                | GeneralCategory::SpacingMark
                | GeneralCategory::DecimalNumber
                | GeneralCategory::ConnectorPunctuation
        )
}

fn is_space(ch: char) -> bool {
    ch == '\u{00a0}'
        || ch == '\u{feff}'
        || get_general_category(ch) == GeneralCategory::SpaceSeparator
}

fn decode_char(source: &[u8], pos: usize) -> (Option<char>, usize) {
    bstr::decode_utf8(&source[pos..])
}

pub(crate) fn has_line_terminator(text: &BStr) -> bool {
    text.find_byteset(b"\r\n").is_some()
        || text.contains_str("\u{2028}")
        || text.contains_str("\u{2029}")
}

impl<'s> Parser<'s> {
    /// Advances past whitespace, line terminators and comments to the
    /// next significant token, recording in `prev_line_terminator`
    /// whether a line break was crossed, and returns the token that
    /// was the look-ahead before the call. Inert once an error has
    /// latched.
    pub(crate) fn bump(&mut self) -> Token<'s> {
        if self.err.is_some() {
            return self.next_token;
        }
        self.prev_line_terminator = false;
        let mut next = self.lex_token();
        loop {
            match next.kind {
                TokenKind::Whitespace => {}
                TokenKind::LineTerminator => self.prev_line_terminator = true,
                TokenKind::Comment => {
                    // a comment spanning a line break counts for ASI
                    if has_line_terminator(next.text) {
                        self.prev_line_terminator = true;
                    }
                }
                _ => break,
            }
            next = self.lex_token();
        }
        std::mem::replace(&mut self.next_token, next)
    }

    /// Rescans the current `/` or `/=` look-ahead as a regular
    /// expression literal. Invoked by the expression parser when a
    /// division token shows up where an expression must begin; the
    /// division token is retracted and replaced by a `RegExp` token
    /// spanning the whole `/body/flags` form.
    pub(crate) fn rescan_regexp(&mut self) {
        debug_assert!(matches!(
            self.next_token.kind,
            TokenKind::Div | TokenKind::DivEq
        ));
        self.pos -= self.next_token.text.len();
        self.next_token = self.lex_regexp();
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, off: usize) -> Option<u8> {
        self.source.get(self.pos + off).copied()
    }

    fn token(&self, start: usize, kind: TokenKind) -> Token<'s> {
        let source = self.source;
        Token {
            kind,
            text: source[start..self.pos].as_bstr(),
        }
    }

    fn error_token(&mut self, err: ParseError) -> Token<'s> {
        if self.err.is_none() {
            self.err = Some(err);
        }
        Token {
            kind: TokenKind::Error,
            text: BStr::new(b""),
        }
    }

    fn lex_token(&mut self) -> Token<'s> {
        let start = self.pos;
        let first = match self.peek() {
            Some(ch) => ch,
            None => return self.token(start, TokenKind::Eof),
        };
        match first {
            b'\t' | b'\x0b' | b'\x0c' | b' ' => {
                self.pos += 1;
                self.lex_whitespace(start)
            }
            b'\n' => {
                self.pos += 1;
                self.token(start, TokenKind::LineTerminator)
            }
            b'\r' => {
                self.pos += 1;
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
                self.token(start, TokenKind::LineTerminator)
            }
            b'A'..=b'Z' | b'a'..=b'z' | b'_' | b'$' => self.lex_identifier(start),
            b'0'..=b'9' => self.lex_numeric(start),
            b'\'' | b'"' => self.lex_string(start, first),
            b'`' => self.lex_template(start),
            b'.' => {
                if self.peek_at(1).is_some_and(|ch| ch.is_ascii_digit()) {
                    return self.lex_numeric(start);
                }
                self.pos += 1;
                if self.peek() == Some(b'.') && self.peek_at(1) == Some(b'.') {
                    self.pos += 2;
                    self.token(start, TokenKind::Ellipsis)
                } else {
                    self.token(start, TokenKind::Dot)
                }
            }
            b'=' => {
                self.pos += 1;
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.token(start, TokenKind::EqEqEq)
                    } else {
                        self.token(start, TokenKind::EqEq)
                    }
                } else if self.peek() == Some(b'>') {
                    self.pos += 1;
                    self.token(start, TokenKind::Arrow)
                } else {
                    self.token(start, TokenKind::Eq)
                }
            }
            b'!' => {
                self.pos += 1;
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.token(start, TokenKind::NotEqEq)
                    } else {
                        self.token(start, TokenKind::NotEq)
                    }
                } else {
                    self.token(start, TokenKind::Not)
                }
            }
            b'<' => {
                self.pos += 1;
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    self.token(start, TokenKind::LtEq)
                } else if self.peek() == Some(b'<') {
                    self.pos += 1;
                    if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.token(start, TokenKind::LtLtEq)
                    } else {
                        self.token(start, TokenKind::LtLt)
                    }
                } else {
                    self.token(start, TokenKind::Lt)
                }
            }
            b'>' => {
                self.pos += 1;
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    self.token(start, TokenKind::GtEq)
                } else if self.peek() == Some(b'>') {
                    self.pos += 1;
                    if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.token(start, TokenKind::GtGtEq)
                    } else if self.peek() == Some(b'>') {
                        self.pos += 1;
                        if self.peek() == Some(b'=') {
                            self.pos += 1;
                            self.token(start, TokenKind::GtGtGtEq)
                        } else {
                            self.token(start, TokenKind::GtGtGt)
                        }
                    } else {
                        self.token(start, TokenKind::GtGt)
                    }
                } else {
                    self.token(start, TokenKind::Gt)
                }
            }
            b'+' => {
                self.pos += 1;
                if self.peek() == Some(b'+') {
                    self.pos += 1;
                    self.token(start, TokenKind::Incr)
                } else if self.peek() == Some(b'=') {
                    self.pos += 1;
                    self.token(start, TokenKind::AddEq)
                } else {
                    self.token(start, TokenKind::Add)
                }
            }
            b'-' => {
                self.pos += 1;
                if self.peek() == Some(b'-') {
                    self.pos += 1;
                    self.token(start, TokenKind::Decr)
                } else if self.peek() == Some(b'=') {
                    self.pos += 1;
                    self.token(start, TokenKind::SubEq)
                } else {
                    self.token(start, TokenKind::Sub)
                }
            }
            b'*' => {
                self.pos += 1;
                if self.peek() == Some(b'*') {
                    self.pos += 1;
                    if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.token(start, TokenKind::ExpEq)
                    } else {
                        self.token(start, TokenKind::Exp)
                    }
                } else if self.peek() == Some(b'=') {
                    self.pos += 1;
                    self.token(start, TokenKind::MulEq)
                } else {
                    self.token(start, TokenKind::Mul)
                }
            }
            b'/' => {
                self.pos += 1;
                match self.peek() {
                    Some(b'/') => {
                        self.pos += 1;
                        self.lex_line_comment(start)
                    }
                    Some(b'*') => {
                        self.pos += 1;
                        self.lex_block_comment(start)
                    }
                    Some(b'=') => {
                        self.pos += 1;
                        self.token(start, TokenKind::DivEq)
                    }
                    _ => self.token(start, TokenKind::Div),
                }
            }
            b'%' => {
                self.pos += 1;
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    self.token(start, TokenKind::ModEq)
                } else {
                    self.token(start, TokenKind::Mod)
                }
            }
            b'&' => {
                self.pos += 1;
                if self.peek() == Some(b'&') {
                    self.pos += 1;
                    self.token(start, TokenKind::And)
                } else if self.peek() == Some(b'=') {
                    self.pos += 1;
                    self.token(start, TokenKind::BitAndEq)
                } else {
                    self.token(start, TokenKind::BitAnd)
                }
            }
            b'|' => {
                self.pos += 1;
                if self.peek() == Some(b'|') {
                    self.pos += 1;
                    self.token(start, TokenKind::Or)
                } else if self.peek() == Some(b'=') {
                    self.pos += 1;
                    self.token(start, TokenKind::BitOrEq)
                } else {
                    self.token(start, TokenKind::BitOr)
                }
            }
            b'^' => {
                self.pos += 1;
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    self.token(start, TokenKind::BitXorEq)
                } else {
                    self.token(start, TokenKind::BitXor)
                }
            }
            b'~' => {
                self.pos += 1;
                self.token(start, TokenKind::BitNot)
            }
            b'{' => {
                self.pos += 1;
                self.token(start, TokenKind::OpenBrace)
            }
            b'}' => {
                self.pos += 1;
                self.token(start, TokenKind::CloseBrace)
            }
            b'(' => {
                self.pos += 1;
                self.token(start, TokenKind::OpenParen)
            }
            b')' => {
                self.pos += 1;
                self.token(start, TokenKind::CloseParen)
            }
            b'[' => {
                self.pos += 1;
                self.token(start, TokenKind::OpenBracket)
            }
            b']' => {
                self.pos += 1;
                self.token(start, TokenKind::CloseBracket)
            }
            b';' => {
                self.pos += 1;
                self.token(start, TokenKind::Semicolon)
            }
            b',' => {
                self.pos += 1;
                self.token(start, TokenKind::Comma)
            }
            b':' => {
                self.pos += 1;
                self.token(start, TokenKind::Colon)
            }
            b'?' => {
                self.pos += 1;
                self.token(start, TokenKind::Question)
            }
            _ => self.lex_unusual(start),
        }
    }

    /// Non-ASCII first byte, or an ASCII byte with no token of its
    /// own: line separators, Unicode spaces, identifier starts, or an
    /// error.
    fn lex_unusual(&mut self, start: usize) -> Token<'s> {
        let (ch, len) = decode_char(self.source, self.pos);
        let ch = match ch {
            Some(ch) => ch,
            None => {
                let source = self.source;
                let end = (self.pos + len.max(1)).min(source.len());
                let found = source[self.pos..end].as_bstr().to_owned();
                return self.error_token(ParseError::UnexpectedCharacter {
                    found,
                    offset: start,
                });
            }
        };
        if ch == '\u{2028}' || ch == '\u{2029}' {
            self.pos += len;
            self.token(start, TokenKind::LineTerminator)
        } else if is_space(ch) {
            self.pos += len;
            self.lex_whitespace(start)
        } else if is_ident_start(ch) {
            self.pos += len;
            self.lex_identifier(start)
        } else {
            let source = self.source;
            let found = source[self.pos..self.pos + len].as_bstr().to_owned();
            self.error_token(ParseError::UnexpectedCharacter {
                found,
                offset: start,
            })
        }
    }

    fn lex_whitespace(&mut self, start: usize) -> Token<'s> {
        loop {
            match self.peek() {
                Some(b'\t') | Some(b'\x0b') | Some(b'\x0c') | Some(b' ') => self.pos += 1,
                Some(ch) if 0x80 <= ch => {
                    let (ch, len) = decode_char(self.source, self.pos);
                    match ch {
                        Some(ch) if is_space(ch) => self.pos += len,
                        _ => break,
                    }
                }
                _ => break,
            }
        }
        self.token(start, TokenKind::Whitespace)
    }

    fn lex_identifier(&mut self, start: usize) -> Token<'s> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$' => {
                    self.pos += 1
                }
                Some(ch) if 0x80 <= ch => {
                    let (ch, len) = decode_char(self.source, self.pos);
                    match ch {
                        Some(ch) if is_ident_continue(ch) => self.pos += len,
                        _ => break,
                    }
                }
                _ => break,
            }
        }
        let source = self.source;
        let text = source[start..self.pos].as_bstr();
        let kind = KEYWORDS.get(text).copied().unwrap_or(TokenKind::Ident);
        Token { kind, text }
    }

    fn lex_numeric(&mut self, start: usize) -> Token<'s> {
        if self.peek() == Some(b'0') {
            match self.peek_at(1) {
                Some(b'x') | Some(b'X') => {
                    self.pos += 2;
                    return self.lex_radix_digits(start, |ch| ch.is_ascii_hexdigit());
                }
                Some(b'b') | Some(b'B') => {
                    self.pos += 2;
                    return self.lex_radix_digits(start, |ch| matches!(ch, b'0' | b'1'));
                }
                Some(b'o') | Some(b'O') => {
                    self.pos += 2;
                    return self.lex_radix_digits(start, |ch| matches!(ch, b'0'..=b'7'));
                }
                _ => {}
            }
        }
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if !self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                return self.error_token(ParseError::InvalidNumber { offset: start });
            }
            while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        self.token(start, TokenKind::Numeric)
    }

    fn lex_radix_digits(&mut self, start: usize, digit: impl Fn(u8) -> bool) -> Token<'s> {
        if !self.peek().is_some_and(&digit) {
            return self.error_token(ParseError::InvalidNumber { offset: start });
        }
        while self.peek().is_some_and(&digit) {
            self.pos += 1;
        }
        self.token(start, TokenKind::Numeric)
    }

    fn lex_string(&mut self, start: usize, quote: u8) -> Token<'s> {
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') | Some(b'\r') => {
                    return self.error_token(ParseError::UnterminatedString { offset: start });
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        None => {
                            return self
                                .error_token(ParseError::UnterminatedString { offset: start });
                        }
                        // line continuation
                        Some(b'\r') => {
                            self.pos += 1;
                            if self.peek() == Some(b'\n') {
                                self.pos += 1;
                            }
                        }
                        Some(_) => self.pos += 1,
                    }
                }
                Some(ch) if ch == quote => {
                    self.pos += 1;
                    return self.token(start, TokenKind::String);
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn lex_template(&mut self, start: usize) -> Token<'s> {
        self.pos += 1;
        if !self.scan_template_body() {
            return self.error_token(ParseError::UnterminatedTemplate { offset: start });
        }
        self.token(start, TokenKind::Template)
    }

    /// Consumes template text up to and including the closing
    /// backtick. Substitutions are skipped over textually; the parser
    /// receives the whole literal as one token.
    fn scan_template_body(&mut self) -> bool {
        loop {
            match self.peek() {
                None => return false,
                Some(b'`') => {
                    self.pos += 1;
                    return true;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek().is_none() {
                        return false;
                    }
                    self.pos += 1;
                }
                Some(b'$') if self.peek_at(1) == Some(b'{') => {
                    self.pos += 2;
                    if !self.scan_template_substitution() {
                        return false;
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Consumes a `${…}` body up to and including the matching close
    /// brace, recursing into nested template literals.
    fn scan_template_substitution(&mut self) -> bool {
        let mut depth = 1usize;
        while 0 < depth {
            match self.peek() {
                None => return false,
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek().is_none() {
                        return false;
                    }
                    self.pos += 1;
                }
                Some(b'{') => {
                    depth += 1;
                    self.pos += 1;
                }
                Some(b'}') => {
                    depth -= 1;
                    self.pos += 1;
                }
                Some(b'`') => {
                    self.pos += 1;
                    if !self.scan_template_body() {
                        return false;
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
        true
    }

    fn lex_line_comment(&mut self, start: usize) -> Token<'s> {
        loop {
            match self.peek() {
                None | Some(b'\n') | Some(b'\r') => break,
                Some(0xe2)
                    if self.peek_at(1) == Some(0x80)
                        && matches!(self.peek_at(2), Some(0xa8) | Some(0xa9)) =>
                {
                    break
                }
                Some(_) => self.pos += 1,
            }
        }
        self.token(start, TokenKind::Comment)
    }

    fn lex_block_comment(&mut self, start: usize) -> Token<'s> {
        loop {
            match self.peek() {
                None => {
                    return self.error_token(ParseError::UnterminatedComment { offset: start });
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.pos += 2;
                    return self.token(start, TokenKind::Comment);
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn lex_regexp(&mut self) -> Token<'s> {
        let start = self.pos;
        self.pos += 1; // the leading '/'
        let mut in_class = false;
        loop {
            match self.peek() {
                None | Some(b'\n') | Some(b'\r') => {
                    return self.error_token(ParseError::UnterminatedRegExp { offset: start });
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        None | Some(b'\n') | Some(b'\r') => {
                            return self
                                .error_token(ParseError::UnterminatedRegExp { offset: start });
                        }
                        Some(_) => self.pos += 1,
                    }
                }
                Some(b'[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(b']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some(b'/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        // flags
        loop {
            match self.peek() {
                Some(ch) if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$' => {
                    self.pos += 1
                }
                Some(ch) if 0x80 <= ch => {
                    let (ch, len) = decode_char(self.source, self.pos);
                    match ch {
                        Some(ch) if is_ident_continue(ch) => self.pos += len,
                        _ => break,
                    }
                }
                _ => break,
            }
        }
        self.token(start, TokenKind::RegExp)
    }
}
