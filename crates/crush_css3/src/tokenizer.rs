use crate::cursor::Cursor;
use crate::parser_config::ParserConfig;
use crate::unicode::UnicodeChar;
use crush_shared::byte_stream::Character::{Ch, StreamEnd};
use crush_shared::byte_stream::{ByteStream, Character, Location};
use crush_shared::errors::{CssResult, Error};
use std::fmt;

/// A numeric value together with the text it was read from
#[derive(Debug, PartialEq, Clone)]
pub struct Number {
    /// Parsed value
    pub value: f64,
    /// True when the source had neither a fraction nor an exponent
    pub integer: bool,
    /// Text of the number as found in the source, including its sign
    pub repr: String,
}

impl Number {
    pub fn new(value: f64, integer: bool, repr: &str) -> Self {
        Self {
            value,
            integer,
            repr: repr.to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    /// A [`<EOF-token>`](https://drafts.csswg.org/css-syntax/#typedef-eof-token). Once the input
    /// is exhausted, every request for a token returns this.
    Eof,
    Ident(String),
    /// A [`<function-token>`](https://drafts.csswg.org/css-syntax/#function-token-diagram)
    ///
    /// The value does not include the opening parenthesis.
    Function(String),
    /// A [`<at-keyword-token>`](https://drafts.csswg.org/css-syntax/#at-keyword-token-diagram)
    ///
    /// The value does not include the `@` marker.
    AtKeyword(String),
    /// A [`<hash-token>`](https://drafts.csswg.org/css-syntax/#hash-token-diagram)
    ///
    /// The value does not include the `#` marker. `id` is set when the value would be a valid
    /// identifier, so the hash can be used as an ID selector.
    Hash { value: String, id: bool },
    /// A [`<string-token>`](https://drafts.csswg.org/css-syntax/#string-token-diagram)
    ///
    /// The value does not include the quotes.
    QuotedString(String),
    /// A `<bad-string-token>`
    ///
    /// This token always indicates a parse error.
    BadString(String),
    Url(String),
    BadUrl(String),
    /// A `<delim-token>`
    Delim(char),
    Number(Number),
    Percentage(Number),
    Dimension {
        value: Number,
        unit: String,
    },
    /// A `<unicode-range-token>` with inclusive bounds
    UnicodeRange {
        low: u32,
        high: u32,
    },
    /// `~=`
    IncludeMatch,
    /// `|=`
    DashMatch,
    /// `^=`
    PrefixMatch,
    /// `$=`
    SuffixMatch,
    /// `*=`
    SubstringMatch,
    /// `||`
    Column,
    /// A [`<whitespace-token>`](https://drafts.csswg.org/css-syntax/#whitespace-token-diagram)
    Whitespace,
    /// A `<!--` `<CDO-token>`
    Cdo,
    /// A `-->` `<CDC-token>`
    Cdc,
    /// A `:` `<colon-token>`
    Colon,
    /// A `;` `<semicolon-token>`
    Semicolon,
    /// A `<comma-token>`
    Comma,
    /// A `<[-token>`
    LBracket,
    /// A `<]-token>`
    RBracket,
    /// A `<(-token>`
    LParen,
    /// A `<)-token>`
    RParen,
    /// A `<{-token>`
    LCurly,
    /// A `<}-token>`
    RCurly,
}

/// The kind of a token without its payload
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Eof,
    Ident,
    Function,
    AtKeyword,
    Hash,
    QuotedString,
    BadString,
    Url,
    BadUrl,
    Delim,
    Number,
    Percentage,
    Dimension,
    UnicodeRange,
    IncludeMatch,
    DashMatch,
    PrefixMatch,
    SuffixMatch,
    SubstringMatch,
    Column,
    Whitespace,
    Cdo,
    Cdc,
    Colon,
    Semicolon,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LCurly,
    RCurly,
}

impl TokenKind {
    /// Printable name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Function => "FUNCTION",
            TokenKind::AtKeyword => "AT_KEYWORD",
            TokenKind::Hash => "HASH",
            TokenKind::QuotedString => "STRING",
            TokenKind::BadString => "BAD_STRING",
            TokenKind::Url => "URL",
            TokenKind::BadUrl => "BAD_URL",
            TokenKind::Delim => "DELIM",
            TokenKind::Number => "NUMBER",
            TokenKind::Percentage => "PERCENTAGE",
            TokenKind::Dimension => "DIMENSION",
            TokenKind::UnicodeRange => "UNICODE_RANGE",
            TokenKind::IncludeMatch => "INCLUDE_MATCH",
            TokenKind::DashMatch => "DASH_MATCH",
            TokenKind::PrefixMatch => "PREFIX_MATCH",
            TokenKind::SuffixMatch => "SUFFIX_MATCH",
            TokenKind::SubstringMatch => "SUBSTRING_MATCH",
            TokenKind::Column => "COLUMN",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Cdo => "CDO",
            TokenKind::Cdc => "CDC",
            TokenKind::Colon => "COLON",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::LBracket => "LEFT_SQUARE",
            TokenKind::RBracket => "RIGHT_SQUARE",
            TokenKind::LParen => "LEFT_PAREN",
            TokenKind::RParen => "RIGHT_PAREN",
            TokenKind::LCurly => "LEFT_CURLY",
            TokenKind::RCurly => "RIGHT_CURLY",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TokenType {
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenType::Eof => TokenKind::Eof,
            TokenType::Ident(_) => TokenKind::Ident,
            TokenType::Function(_) => TokenKind::Function,
            TokenType::AtKeyword(_) => TokenKind::AtKeyword,
            TokenType::Hash { .. } => TokenKind::Hash,
            TokenType::QuotedString(_) => TokenKind::QuotedString,
            TokenType::BadString(_) => TokenKind::BadString,
            TokenType::Url(_) => TokenKind::Url,
            TokenType::BadUrl(_) => TokenKind::BadUrl,
            TokenType::Delim(_) => TokenKind::Delim,
            TokenType::Number(_) => TokenKind::Number,
            TokenType::Percentage(_) => TokenKind::Percentage,
            TokenType::Dimension { .. } => TokenKind::Dimension,
            TokenType::UnicodeRange { .. } => TokenKind::UnicodeRange,
            TokenType::IncludeMatch => TokenKind::IncludeMatch,
            TokenType::DashMatch => TokenKind::DashMatch,
            TokenType::PrefixMatch => TokenKind::PrefixMatch,
            TokenType::SuffixMatch => TokenKind::SuffixMatch,
            TokenType::SubstringMatch => TokenKind::SubstringMatch,
            TokenType::Column => TokenKind::Column,
            TokenType::Whitespace => TokenKind::Whitespace,
            TokenType::Cdo => TokenKind::Cdo,
            TokenType::Cdc => TokenKind::Cdc,
            TokenType::Colon => TokenKind::Colon,
            TokenType::Semicolon => TokenKind::Semicolon,
            TokenType::Comma => TokenKind::Comma,
            TokenType::LBracket => TokenKind::LBracket,
            TokenType::RBracket => TokenKind::RBracket,
            TokenType::LParen => TokenKind::LParen,
            TokenType::RParen => TokenKind::RParen,
            TokenType::LCurly => TokenKind::LCurly,
            TokenType::RCurly => TokenKind::RCurly,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    /// Type of the token
    pub token_type: TokenType,
    /// Location of the first character of the token in the stream
    pub location: Location,
}

impl Token {
    /// Returns a new token for the given type on the given location
    pub fn new(token_type: TokenType, location: Location) -> Token {
        Token {
            token_type,
            location,
        }
    }

    fn new_delim(c: char, location: Location) -> Token {
        Token::new(TokenType::Delim(c), location)
    }

    fn new_hash(value: &str, id: bool, location: Location) -> Token {
        Token::new(
            TokenType::Hash {
                value: value.to_string(),
                id,
            },
            location,
        )
    }

    fn new_atkeyword(keyword: &str, location: Location) -> Token {
        Token::new(TokenType::AtKeyword(keyword.to_string()), location)
    }

    fn new_number(value: Number, location: Location) -> Token {
        Token::new(TokenType::Number(value), location)
    }

    fn new_percentage(value: Number, location: Location) -> Token {
        Token::new(TokenType::Percentage(value), location)
    }

    fn new_dimension(value: Number, unit: &str, location: Location) -> Token {
        Token::new(
            TokenType::Dimension {
                value,
                unit: unit.to_string(),
            },
            location,
        )
    }

    fn new_unicode_range(low: u32, high: u32, location: Location) -> Token {
        Token::new(TokenType::UnicodeRange { low, high }, location)
    }

    fn new_ident(value: &str, location: Location) -> Token {
        Token::new(TokenType::Ident(value.to_string()), location)
    }

    fn new_function(value: &str, location: Location) -> Token {
        Token::new(TokenType::Function(value.to_string()), location)
    }

    fn new_quoted_string(value: &str, location: Location) -> Token {
        Token::new(TokenType::QuotedString(value.to_string()), location)
    }

    fn new_bad_string(value: &str, location: Location) -> Token {
        Token::new(TokenType::BadString(value.to_string()), location)
    }

    fn new_url(value: &str, location: Location) -> Token {
        Token::new(TokenType::Url(value.to_string()), location)
    }

    fn new_bad_url(value: &str, location: Location) -> Token {
        Token::new(TokenType::BadUrl(value.to_string()), location)
    }
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        self.token_type.kind()
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.token_type, TokenType::Eof)
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.token_type, TokenType::Whitespace)
    }

    pub fn is_delim(&self, delim: char) -> bool {
        matches!(self.token_type, TokenType::Delim(c) if c == delim)
    }

    /// Returns the textual payload of the token, if it carries one. For numeric tokens this is
    /// the number as written in the source.
    pub fn text(&self) -> Option<&str> {
        match &self.token_type {
            TokenType::Ident(val)
            | TokenType::Function(val)
            | TokenType::AtKeyword(val)
            | TokenType::Hash { value: val, .. }
            | TokenType::QuotedString(val)
            | TokenType::BadString(val)
            | TokenType::Url(val)
            | TokenType::BadUrl(val) => Some(val),
            TokenType::Number(n)
            | TokenType::Percentage(n)
            | TokenType::Dimension { value: n, .. } => Some(&n.repr),
            _ => None,
        }
    }

    /// Numeric value of a number, percentage or dimension token
    pub fn number_value(&self) -> CssResult<f64> {
        match &self.token_type {
            TokenType::Number(n)
            | TokenType::Percentage(n)
            | TokenType::Dimension { value: n, .. } => Ok(n.value),
            _ => Err(self.mismatch(TokenKind::Number)),
        }
    }

    /// Lower bound of a unicode range token
    pub fn range_low(&self) -> CssResult<u32> {
        match self.token_type {
            TokenType::UnicodeRange { low, .. } => Ok(low),
            _ => Err(self.mismatch(TokenKind::UnicodeRange)),
        }
    }

    /// Upper bound of a unicode range token
    pub fn range_high(&self) -> CssResult<u32> {
        match self.token_type {
            TokenType::UnicodeRange { high, .. } => Ok(high),
            _ => Err(self.mismatch(TokenKind::UnicodeRange)),
        }
    }

    fn mismatch(&self, expected: TokenKind) -> Error {
        Error::TypeMismatch {
            expected: expected.name(),
            found: self.kind().name(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match &self.token_type {
            TokenType::Ident(val) | TokenType::BadString(val) => val.clone(),
            TokenType::Function(val) => format!("{val}("),
            TokenType::AtKeyword(val) => format!("@{val}"),
            TokenType::Hash { value, .. } => format!("#{value}"),
            TokenType::QuotedString(val) => format!("\"{val}\""),
            TokenType::Url(val) | TokenType::BadUrl(val) => format!("url({val})"),
            TokenType::Delim(val) => val.to_string(),
            TokenType::Number(val) => val.repr.clone(),
            TokenType::Percentage(val) => format!("{}%", val.repr),
            TokenType::Dimension { value, unit } => format!("{}{}", value.repr, unit),
            TokenType::UnicodeRange { low, high } => format!("U+{low:X}-{high:X}"),
            TokenType::IncludeMatch => "~=".into(),
            TokenType::DashMatch => "|=".into(),
            TokenType::PrefixMatch => "^=".into(),
            TokenType::SuffixMatch => "$=".into(),
            TokenType::SubstringMatch => "*=".into(),
            TokenType::Column => "||".into(),
            TokenType::Cdc => "-->".into(),
            TokenType::Cdo => "<!--".into(),
            TokenType::Colon => ":".into(),
            TokenType::Semicolon => ";".into(),
            TokenType::Comma => ",".into(),
            TokenType::LBracket => "[".into(),
            TokenType::RBracket => "]".into(),
            TokenType::LCurly => "{".into(),
            TokenType::RCurly => "}".into(),
            TokenType::LParen => "(".into(),
            TokenType::RParen => ")".into(),
            TokenType::Whitespace => " ".into(),
            TokenType::Eof => "eof".into(),
        };

        write!(f, "{string}")
    }
}

/// Outcome of consuming a quoted string
enum ConsumedString {
    Good(String),
    Bad(String),
}

/// CSS Tokenizer according to the [w3 specification](https://www.w3.org/TR/css-syntax-3/#tokenization)
///
/// Tokens are produced one at a time from the cursor. Comments are skipped and never produce a
/// token. After the input is exhausted, every call returns an EOF token.
pub struct Tokenizer {
    cursor: Cursor,
    /// Log every state the tokenizer enters
    trace: bool,
}

/// Creates a tokenizer on a stream holding the given string, with the default config
impl From<&str> for Tokenizer {
    fn from(s: &str) -> Self {
        Self::new(ByteStream::from(s), &ParserConfig::default())
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    /// Yields tokens until the end of the input. The EOF token itself is not yielded.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

impl Tokenizer {
    /// Creates a new tokenizer on the given stream. The location of the first character is
    /// taken from the config, so tokenizing can start at any line and column.
    pub fn new(stream: ByteStream, config: &ParserConfig) -> Self {
        Self {
            cursor: Cursor::new(stream, config),
            trace: config.trace.states,
        }
    }

    /// Location of the last consumed character
    pub fn current_location(&self) -> Location {
        self.cursor.location()
    }

    /// Consumes the next token and returns it
    pub fn next_token(&mut self) -> Token {
        let token = self.consume_token();
        log::trace!("{:?} {} {}", token.location, token.kind(), token);
        token
    }

    /// Consumes all tokens up to and including the first EOF token
    pub fn consume_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let eof = token.is_eof();
            tokens.push(token);
            if eof {
                return tokens;
            }
        }
    }

    fn trace(&self, state: &str) {
        if self.trace {
            log::trace!("{:?} {}", self.cursor.location(), state);
        }
    }

    /// 4.3.1. [Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> Token {
        loop {
            self.cursor.consume();
            let loc = self.cursor.location();

            let c = match self.cursor.current() {
                StreamEnd => return Token::new(TokenType::Eof, loc),
                Ch(c) => c,
            };

            let token = match c {
                c if is_whitespace(c) => {
                    self.trace("whitespace");
                    self.consume_whitespace();
                    Token::new(TokenType::Whitespace, loc)
                }
                '"' | '\'' => self.consume_string_token(c, loc),
                '#' => {
                    let [n1, n2, n3] = self.cursor.next_three();
                    if is_name_char_at(n1) || is_valid_escape(n1, n2) {
                        self.trace("hash");
                        let id = would_start_ident(n1, n2, n3);
                        let value = self.consume_ident();
                        Token::new_hash(&value, id, loc)
                    } else {
                        Token::new_delim(c, loc)
                    }
                }
                '$' => self.consume_match(c, TokenType::SuffixMatch, loc),
                '*' => self.consume_match(c, TokenType::SubstringMatch, loc),
                '^' => self.consume_match(c, TokenType::PrefixMatch, loc),
                '~' => self.consume_match(c, TokenType::IncludeMatch, loc),
                '|' => match self.cursor.next_char() {
                    Ch('=') => {
                        self.cursor.consume();
                        Token::new(TokenType::DashMatch, loc)
                    }
                    Ch('|') => {
                        self.cursor.consume();
                        Token::new(TokenType::Column, loc)
                    }
                    _ => Token::new_delim(c, loc),
                },
                '(' => Token::new(TokenType::LParen, loc),
                ')' => Token::new(TokenType::RParen, loc),
                '[' => Token::new(TokenType::LBracket, loc),
                ']' => Token::new(TokenType::RBracket, loc),
                '{' => Token::new(TokenType::LCurly, loc),
                '}' => Token::new(TokenType::RCurly, loc),
                ',' => Token::new(TokenType::Comma, loc),
                ':' => Token::new(TokenType::Colon, loc),
                ';' => Token::new(TokenType::Semicolon, loc),
                '+' | '.' => {
                    let [n1, n2, _] = self.cursor.next_three();
                    if would_start_number(Ch(c), n1, n2) {
                        self.cursor.reconsume();
                        self.consume_numeric_token(loc)
                    } else {
                        Token::new_delim(c, loc)
                    }
                }
                '-' => {
                    let [n1, n2, _] = self.cursor.next_three();
                    if would_start_number(Ch(c), n1, n2) {
                        self.cursor.reconsume();
                        self.consume_numeric_token(loc)
                    } else if n1 == Ch('-') && n2 == Ch('>') {
                        self.cursor.consume();
                        self.cursor.consume();
                        Token::new(TokenType::Cdc, loc)
                    } else if would_start_ident(Ch(c), n1, n2) {
                        self.cursor.reconsume();
                        self.consume_ident_like_seq(loc)
                    } else {
                        Token::new_delim(c, loc)
                    }
                }
                '/' => {
                    if self.cursor.next_char() == Ch('*') {
                        self.consume_comment();
                        continue;
                    }
                    Token::new_delim(c, loc)
                }
                '<' => {
                    if self.cursor.next_three() == [Ch('!'), Ch('-'), Ch('-')] {
                        self.cursor.consume();
                        self.cursor.consume();
                        self.cursor.consume();
                        Token::new(TokenType::Cdo, loc)
                    } else {
                        Token::new_delim(c, loc)
                    }
                }
                '@' => {
                    let [n1, n2, n3] = self.cursor.next_three();
                    if would_start_ident(n1, n2, n3) {
                        self.trace("at-keyword");
                        let keyword = self.consume_ident();
                        Token::new_atkeyword(&keyword, loc)
                    } else {
                        Token::new_delim(c, loc)
                    }
                }
                '\\' => {
                    if is_valid_escape(Ch(c), self.cursor.next_char()) {
                        self.cursor.reconsume();
                        self.consume_ident_like_seq(loc)
                    } else {
                        log::warn!("{loc:?}: invalid escape");
                        Token::new_delim(c, loc)
                    }
                }
                'u' | 'U' => {
                    let [n1, n2, _] = self.cursor.next_three();
                    if n1 == Ch('+') && (n2.is_hex_digit() || n2 == Ch('?')) {
                        self.cursor.consume();
                        self.consume_unicode_range(loc)
                    } else {
                        self.cursor.reconsume();
                        self.consume_ident_like_seq(loc)
                    }
                }
                c if c.is_ascii_digit() => {
                    self.cursor.reconsume();
                    self.consume_numeric_token(loc)
                }
                c if is_name_start(c) => {
                    self.cursor.reconsume();
                    self.consume_ident_like_seq(loc)
                }
                c => Token::new_delim(c, loc),
            };

            return token;
        }
    }

    /// Emits `token` when the next character is `=`, otherwise a delim for `c`
    fn consume_match(&mut self, c: char, token: TokenType, loc: Location) -> Token {
        if self.cursor.next_char() == Ch('=') {
            self.cursor.consume();
            return Token::new(token, loc);
        }

        Token::new_delim(c, loc)
    }

    fn consume_whitespace(&mut self) {
        while matches!(self.cursor.next_char(), Ch(c) if is_whitespace(c)) {
            self.cursor.consume();
        }
    }

    /// 4.3.2. [Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// Called with `/` as the current character and `*` as the next one. An unterminated comment
    /// runs until the end of the stream.
    fn consume_comment(&mut self) {
        self.trace("comment");

        // the opening `*` can never be part of the closing `*/`
        self.cursor.consume();

        loop {
            self.cursor.consume();
            match self.cursor.current() {
                StreamEnd => {
                    log::warn!("{:?}: unterminated comment", self.cursor.location());
                    return;
                }
                Ch('*') if self.cursor.next_char() == Ch('/') => {
                    self.cursor.consume();
                    return;
                }
                _ => {}
            }
        }
    }

    /// 4.3.3. [Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self, loc: Location) -> Token {
        self.trace("numeric");
        let number = self.consume_number();

        let [n1, n2, n3] = self.cursor.next_three();
        if would_start_ident(n1, n2, n3) {
            let unit = self.consume_ident();
            return Token::new_dimension(number, &unit, loc);
        }

        if n1 == Ch('%') {
            self.cursor.consume();
            return Token::new_percentage(number, loc);
        }

        Token::new_number(number, loc)
    }

    /// 4.3.4. [Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_seq(&mut self, loc: Location) -> Token {
        self.trace("ident");
        let value = self.consume_ident();

        if self.cursor.next_char() != Ch('(') {
            return Token::new_ident(&value, loc);
        }

        self.cursor.consume();

        if value.eq_ignore_ascii_case("url") {
            return self.consume_url(loc);
        }

        Token::new_function(&value, loc)
    }

    /// 4.3.5. [Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending: char, loc: Location) -> Token {
        match self.consume_string(ending) {
            ConsumedString::Good(value) => Token::new_quoted_string(&value, loc),
            ConsumedString::Bad(value) => Token::new_bad_string(&value, loc),
        }
    }

    /// Consumes the string body after the opening quote, which is the current character. The end
    /// of the stream closes the string. A raw newline is not part of the string and turns it
    /// into a bad string, as does an escape that is followed by the end of the stream.
    fn consume_string(&mut self, ending: char) -> ConsumedString {
        self.trace("string");
        let mut value = String::new();

        loop {
            self.cursor.consume();
            match self.cursor.current() {
                StreamEnd => {
                    log::warn!("{:?}: unterminated string", self.cursor.location());
                    return ConsumedString::Good(value);
                }
                Ch(c) if c == ending => return ConsumedString::Good(value),
                Ch(UnicodeChar::LINE_FEED) => {
                    log::warn!("{:?}: newline in string", self.cursor.location());
                    self.cursor.reconsume();
                    return ConsumedString::Bad(value);
                }
                Ch('\\') => match self.cursor.next_char() {
                    StreamEnd => {
                        log::warn!("{:?}: escape at end of stream", self.cursor.location());
                        return ConsumedString::Bad(value);
                    }
                    // escaped newline is a line continuation
                    Ch(UnicodeChar::LINE_FEED) => self.cursor.consume(),
                    Ch(_) => value.push(self.consume_escaped_token()),
                },
                Ch(c) => value.push(c),
            }
        }
    }

    /// 4.3.6. [Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    ///
    /// Called after `url(` has been consumed. A quoted url is read as a string and is only a
    /// valid url when the string is closed properly and followed by `)`, optionally after
    /// whitespace.
    fn consume_url(&mut self, loc: Location) -> Token {
        self.trace("url");
        self.consume_whitespace();

        match self.cursor.next_char() {
            StreamEnd => {
                log::warn!("{loc:?}: unterminated url");
                self.cursor.consume();
                return Token::new_bad_url("", loc);
            }
            Ch(quote @ ('"' | '\'')) => {
                self.cursor.consume();
                return match self.consume_string(quote) {
                    ConsumedString::Good(value) => {
                        self.consume_whitespace();
                        if matches!(self.cursor.next_char(), Ch(')') | StreamEnd) {
                            self.cursor.consume();
                            Token::new_url(&value, loc)
                        } else {
                            self.consume_remnants_of_bad_url();
                            Token::new_bad_url(&value, loc)
                        }
                    }
                    ConsumedString::Bad(value) => {
                        self.consume_remnants_of_bad_url();
                        Token::new_bad_url(&value, loc)
                    }
                };
            }
            _ => {}
        }

        let mut url = String::new();

        loop {
            self.cursor.consume();
            match self.cursor.current() {
                StreamEnd | Ch(')') => return Token::new_url(&url, loc),
                Ch(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    if matches!(self.cursor.next_char(), Ch(')') | StreamEnd) {
                        self.cursor.consume();
                        return Token::new_url(&url, loc);
                    }

                    self.consume_remnants_of_bad_url();
                    return Token::new_bad_url(&url, loc);
                }
                Ch('"' | '\'' | '(') => {
                    log::warn!("{:?}: unexpected character in url", self.cursor.location());
                    self.consume_remnants_of_bad_url();
                    return Token::new_bad_url(&url, loc);
                }
                Ch(c) if is_non_printable(c) => {
                    log::warn!("{:?}: non-printable character in url", self.cursor.location());
                    self.consume_remnants_of_bad_url();
                    return Token::new_bad_url(&url, loc);
                }
                Ch('\\') => {
                    if is_valid_escape(Ch('\\'), self.cursor.next_char()) {
                        url.push(self.consume_escaped_token());
                    } else {
                        log::warn!("{:?}: invalid escape in url", self.cursor.location());
                        self.consume_remnants_of_bad_url();
                        return Token::new_bad_url(&url, loc);
                    }
                }
                Ch(c) => url.push(c),
            }
        }
    }

    /// 4.3.14. [Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_remnants_of_bad_url(&mut self) {
        loop {
            self.cursor.consume();
            match self.cursor.current() {
                StreamEnd | Ch(')') => return,
                c if is_valid_escape(c, self.cursor.next_char()) => {
                    self.consume_escaped_token();
                }
                _ => {}
            }
        }
    }

    /// 4.3.7. [Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Called with the backslash as the current character. Up to six hex digits are read, and a
    /// single whitespace directly after them is swallowed.
    fn consume_escaped_token(&mut self) -> char {
        self.cursor.consume();

        match self.cursor.current() {
            Ch(c) if c.is_ascii_hexdigit() => {
                let mut value = c.to_digit(16).unwrap_or_default();
                let mut digits = 1;

                while digits < 6 {
                    match self.cursor.next_char() {
                        Ch(c) if c.is_ascii_hexdigit() => {
                            self.cursor.consume();
                            value = value * 16 + c.to_digit(16).unwrap_or_default();
                            digits += 1;
                        }
                        _ => break,
                    }
                }

                if matches!(self.cursor.next_char(), Ch(c) if is_whitespace(c)) {
                    self.cursor.consume();
                }

                if value == 0 || value > UnicodeChar::MAX_ALLOWED {
                    return UnicodeChar::REPLACEMENT_CHARACTER;
                }

                // surrogates are not valid chars
                char::from_u32(value).unwrap_or(UnicodeChar::REPLACEMENT_CHARACTER)
            }
            StreamEnd => UnicodeChar::REPLACEMENT_CHARACTER,
            Ch(c) => c,
        }
    }

    /// 4.3.11. [Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// Collects name characters and escapes until something else shows up, which is left for
    /// the next read.
    fn consume_ident(&mut self) -> String {
        let mut value = String::new();

        loop {
            self.cursor.consume();
            match self.cursor.current() {
                Ch(c) if is_name_char(c) => value.push(c),
                c if is_valid_escape(c, self.cursor.next_char()) => {
                    value.push(self.consume_escaped_token());
                }
                _ => {
                    self.cursor.reconsume();
                    return value;
                }
            }
        }
    }

    /// 4.3.12. [Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// The value is `sign * (integer + fraction * 10^-d) * 10^(exponent sign * exponent)`,
    /// evaluated with correct rounding by parsing the collected representation.
    fn consume_number(&mut self) -> Number {
        let mut repr = String::new();
        let mut integer = true;

        if let Ch(c @ ('+' | '-')) = self.cursor.next_char() {
            self.cursor.consume();
            repr.push(c);
        }

        self.consume_digits(&mut repr);

        let [n1, n2, n3] = self.cursor.next_three();
        if n1 == Ch('.') && n2.is_digit() {
            self.cursor.consume();
            repr.push('.');
            self.consume_digits(&mut repr);
            integer = false;
        }

        let [n1, n2, n3] = if integer {
            [n1, n2, n3]
        } else {
            self.cursor.next_three()
        };
        if matches!(n1, Ch('e' | 'E'))
            && (n2.is_digit() || (matches!(n2, Ch('+' | '-')) && n3.is_digit()))
        {
            self.cursor.consume();
            repr.push(char::from(n1));
            if !n2.is_digit() {
                self.cursor.consume();
                repr.push(char::from(n2));
            }
            self.consume_digits(&mut repr);
            integer = false;
        }

        // the representation always holds at least one digit, so parsing cannot fail
        let value = repr.parse::<f64>().unwrap_or_default();

        Number::new(value, integer, &repr)
    }

    fn consume_digits(&mut self, repr: &mut String) {
        while let Ch(c) = self.cursor.next_char() {
            if !c.is_ascii_digit() {
                break;
            }
            self.cursor.consume();
            repr.push(c);
        }
    }

    /// Called with the `+` of `U+` as the current character. The first group holds up to six hex
    /// digits, optionally followed by `?` wildcards up to the same total. Wildcards give the
    /// lowest and highest value of the range. Without wildcards, a `-` and a second group of
    /// hex digits give the upper bound.
    fn consume_unicode_range(&mut self, loc: Location) -> Token {
        self.trace("unicode-range");

        let (start, wildcard) = self.consume_range_digits(true);
        if wildcard {
            return Token::new_unicode_range(
                range_value(&start, '0'),
                range_value(&start, 'F'),
                loc,
            );
        }

        let low = range_value(&start, '0');
        let [n1, n2, _] = self.cursor.next_three();
        if n1 == Ch('-') && n2.is_hex_digit() {
            self.cursor.consume();
            let (end, _) = self.consume_range_digits(false);
            return Token::new_unicode_range(low, range_value(&end, '0'), loc);
        }

        Token::new_unicode_range(low, low, loc)
    }

    fn consume_range_digits(&mut self, wildcards: bool) -> (String, bool) {
        let mut digits = String::new();
        while digits.len() < 6 && self.cursor.next_char().is_hex_digit() {
            self.cursor.consume();
            digits.push(char::from(self.cursor.current()));
        }

        let mut wildcard = false;
        while wildcards && digits.len() < 6 && self.cursor.next_char() == Ch('?') {
            self.cursor.consume();
            digits.push('?');
            wildcard = true;
        }

        (digits, wildcard)
    }
}

/// Computes the value of a group of hex digits, with `?` replaced by `wildcard`
fn range_value(digits: &str, wildcard: char) -> u32 {
    digits
        .chars()
        .map(|c| if c == '?' { wildcard } else { c })
        .filter_map(|c| c.to_digit(16))
        .fold(0, |acc, d| acc * 16 + d)
}

fn is_whitespace(c: char) -> bool {
    matches!(c, UnicodeChar::LINE_FEED | UnicodeChar::TAB | UnicodeChar::SPACE)
}

/// [ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c >= UnicodeChar::CONTROL
}

/// [ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

fn is_name_char_at(c: Character) -> bool {
    matches!(c, Ch(c) if is_name_char(c))
}

/// [non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
fn is_non_printable(c: char) -> bool {
    matches!(
        c,
        UnicodeChar::NULL..=UnicodeChar::BACKSPACE
            | UnicodeChar::LINE_TABULATION
            | UnicodeChar::SHIFT_OUT..=UnicodeChar::INFORMATION_SEPARATOR_ONE
            | UnicodeChar::DELETE
    )
}

/// 4.3.8. [Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Character, second: Character) -> bool {
    first == Ch('\\') && !matches!(second, Ch(UnicodeChar::LINE_FEED) | StreamEnd)
}

/// 4.3.9. [Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
fn would_start_ident(first: Character, second: Character, third: Character) -> bool {
    match first {
        Ch('-') => {
            second == Ch('-') || is_name_start_at(second) || is_valid_escape(second, third)
        }
        Ch('\\') => is_valid_escape(first, second),
        Ch(c) => is_name_start(c),
        StreamEnd => false,
    }
}

fn is_name_start_at(c: Character) -> bool {
    matches!(c, Ch(c) if is_name_start(c))
}

/// 4.3.10. [Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
fn would_start_number(first: Character, second: Character, third: Character) -> bool {
    match first {
        Ch('+' | '-') => second.is_digit() || (second == Ch('.') && third.is_digit()),
        Ch('.') => second.is_digit(),
        c => c.is_digit(),
    }
}
