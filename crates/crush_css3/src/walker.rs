use crate::node::{BlockKind, ComponentValue, Function, Rule, SimpleBlock, Stylesheet};
use crate::tokenizer::{Token, TokenType, Tokenizer};
use crate::unicode::UnicodeChar;
use std::collections::VecDeque;
use std::fmt::Write;

/// Callbacks for a read-only walk over a stylesheet. Every hook has an empty default, so a
/// visitor only implements what it needs. `depth` is the nesting level of the visited item,
/// rules are at depth 1.
#[allow(unused_variables)]
pub trait Visitor {
    fn visit_stylesheet(&mut self, stylesheet: &Stylesheet) {}
    fn visit_rule(&mut self, rule: &Rule, depth: usize) {}
    fn leave_rule(&mut self, rule: &Rule, depth: usize) {}
    /// Called for every component value before the token, function or block hook
    fn visit_component_value(&mut self, value: &ComponentValue, depth: usize) {}
    fn visit_token(&mut self, token: &Token, depth: usize) {}
    fn visit_function(&mut self, function: &Function, depth: usize) {}
    fn leave_function(&mut self, function: &Function, depth: usize) {}
    fn visit_simple_block(&mut self, block: &SimpleBlock, depth: usize) {}
    fn leave_simple_block(&mut self, block: &SimpleBlock, depth: usize) {}
}

/// The walker visits a stylesheet in source order: for each rule the prelude component values
/// first, then the block.
pub struct Walker<'a> {
    root: &'a Stylesheet,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Stylesheet) -> Self {
        Self { root }
    }

    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_stylesheet(self.root);

        for rule in self.root {
            visitor.visit_rule(rule, 1);
            for value in rule.prelude() {
                walk_value(value, 2, visitor);
            }
            if let Some(block) = rule.block() {
                walk_block(block, 2, visitor);
            }
            visitor.leave_rule(rule, 1);
        }
    }

    /// Renders the stylesheet as an indented tree, one node per line
    pub fn walk_to_string(&self) -> String {
        let mut printer = TreePrinter::default();
        self.walk(&mut printer);
        printer.output
    }

    /// Serializes the stylesheet back to CSS
    pub fn to_css(&self) -> String {
        let mut writer = CssWriter::new();
        self.walk(&mut writer);
        writer.finish()
    }
}

fn walk_value<V: Visitor + ?Sized>(value: &ComponentValue, depth: usize, visitor: &mut V) {
    visitor.visit_component_value(value, depth);

    match value {
        ComponentValue::Token(token) => visitor.visit_token(token, depth),
        ComponentValue::Function(function) => {
            visitor.visit_function(function, depth);
            for argument in &function.arguments {
                walk_value(argument, depth + 1, visitor);
            }
            visitor.leave_function(function, depth);
        }
        ComponentValue::SimpleBlock(block) => walk_block(block, depth, visitor),
    }
}

fn walk_block<V: Visitor + ?Sized>(block: &SimpleBlock, depth: usize, visitor: &mut V) {
    visitor.visit_simple_block(block, depth);
    for value in &block.contents {
        walk_value(value, depth + 1, visitor);
    }
    visitor.leave_simple_block(block, depth);
}

impl Stylesheet {
    /// Serializes the stylesheet back to CSS
    pub fn to_css(&self) -> String {
        Walker::new(self).to_css()
    }
}

#[derive(Default)]
struct TreePrinter {
    output: String,
}

impl TreePrinter {
    fn line(&mut self, depth: usize, text: &str) {
        let prefix = " ".repeat(depth * 2);
        let _ = writeln!(self.output, "{prefix}{text}");
    }
}

impl Visitor for TreePrinter {
    fn visit_stylesheet(&mut self, stylesheet: &Stylesheet) {
        self.line(0, &format!("[Stylesheet ({})]", stylesheet.len()));
    }

    fn visit_rule(&mut self, rule: &Rule, depth: usize) {
        match rule {
            Rule::Qualified(_) => self.line(depth, "[QualifiedRule]"),
            Rule::At(at) => self.line(depth, &format!("[AtRule] name: {}", at.name())),
        }
    }

    fn visit_token(&mut self, token: &Token, depth: usize) {
        match token.token_type {
            TokenType::Whitespace => self.line(depth, "[WHITESPACE]"),
            _ => self.line(depth, &format!("[{}] {}", token.kind(), token)),
        }
    }

    fn visit_function(&mut self, function: &Function, depth: usize) {
        self.line(depth, &format!("[Function] {}", function.name()));
    }

    fn visit_simple_block(&mut self, block: &SimpleBlock, depth: usize) {
        self.line(
            depth,
            &format!("[Block {}{}]", block.kind.opener(), block.kind.closer()),
        );
    }
}

/// A token as it has been written to the output
struct Emitted {
    token_type: TokenType,
    text: String,
}

/// Number of written tokens the next token is checked against. The tokenizer looks at most three
/// code points ahead, so a token can only merge with text that close to it.
const WINDOW: usize = 3;

/// Serializes tokens back to CSS text. The output tokenizes to the same token sequence: names,
/// strings and urls are escaped where needed, and an empty comment is written between tokens
/// that would otherwise run together.
pub struct CssWriter {
    output: String,
    /// Tokens written back to back since the last comment or forced newline
    recent: VecDeque<Emitted>,
    /// The last token must be followed by a newline to end the same way it did in the source
    needs_break: bool,
}

impl Default for CssWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CssWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            recent: VecDeque::with_capacity(WINDOW),
            needs_break: false,
        }
    }

    pub fn write_token(&mut self, token: &Token) {
        self.emit(&token.token_type);
    }

    /// Returns the serialized text
    pub fn finish(mut self) -> String {
        // a bad string at the very end came from an escape at the end of the input
        if self.needs_break {
            if let Some(Emitted {
                token_type: TokenType::BadString(_),
                ..
            }) = self.recent.back()
            {
                self.output.push('\\');
            }
        }

        self.output
    }

    fn emit(&mut self, token_type: &TokenType) {
        if matches!(token_type, TokenType::Eof) {
            return;
        }

        let mut text = serialize_token(token_type);

        if self.needs_break {
            self.needs_break = false;
            if matches!(token_type, TokenType::Whitespace) {
                text = "\n".into();
            } else {
                self.output.push('\n');
            }
            self.recent.clear();
        } else if !self.stays_apart(token_type, &text) {
            self.output.push_str("/**/");
            self.recent.clear();
        }

        self.output.push_str(&text);
        self.needs_break = needs_break(token_type);

        if self.recent.len() == WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(Emitted {
            token_type: token_type.clone(),
            text,
        });
    }

    /// Returns true when writing `next` directly after the recent tokens tokenizes to the same
    /// tokens again
    fn stays_apart(&self, next: &TokenType, next_text: &str) -> bool {
        if self.recent.is_empty() {
            return true;
        }

        let mut joined = String::new();
        let mut expected = Vec::with_capacity(WINDOW + 3);
        for emitted in &self.recent {
            joined.push_str(&emitted.text);
            expected.push(emitted.token_type.clone());
        }

        joined.push_str(next_text);
        expected.push(next.clone());
        if needs_break(next) {
            joined.push('\n');
            expected.push(TokenType::Whitespace);
        }
        expected.push(TokenType::Eof);

        let actual: Vec<TokenType> = Tokenizer::from(joined.as_str())
            .consume_all()
            .into_iter()
            .map(|t| t.token_type)
            .collect();

        actual == expected
    }
}

impl Visitor for CssWriter {
    fn visit_rule(&mut self, rule: &Rule, _depth: usize) {
        if let Rule::At(at) = rule {
            self.write_token(&at.name);
        }
    }

    fn leave_rule(&mut self, rule: &Rule, _depth: usize) {
        if let Rule::At(at) = rule {
            if at.block.is_none() {
                self.emit(&TokenType::Semicolon);
            }
        }
    }

    fn visit_token(&mut self, token: &Token, _depth: usize) {
        self.write_token(token);
    }

    fn visit_function(&mut self, function: &Function, _depth: usize) {
        self.write_token(&function.name);
    }

    fn leave_function(&mut self, _function: &Function, _depth: usize) {
        self.emit(&TokenType::RParen);
    }

    fn visit_simple_block(&mut self, block: &SimpleBlock, _depth: usize) {
        self.emit(&opener_token(block));
    }

    fn leave_simple_block(&mut self, block: &SimpleBlock, _depth: usize) {
        self.emit(&closer_token(block));
    }
}

fn opener_token(block: &SimpleBlock) -> TokenType {
    match block.kind {
        BlockKind::Curly => TokenType::LCurly,
        BlockKind::Square => TokenType::LBracket,
        BlockKind::Paren => TokenType::LParen,
    }
}

fn closer_token(block: &SimpleBlock) -> TokenType {
    match block.kind {
        BlockKind::Curly => TokenType::RCurly,
        BlockKind::Square => TokenType::RBracket,
        BlockKind::Paren => TokenType::RParen,
    }
}

/// Serializes a list of tokens back to CSS text
pub fn tokens_to_css(tokens: &[Token]) -> String {
    let mut writer = CssWriter::new();
    for token in tokens {
        writer.write_token(token);
    }
    writer.finish()
}

/// A bad string and a lone backslash only end at a newline
fn needs_break(token_type: &TokenType) -> bool {
    matches!(token_type, TokenType::BadString(_) | TokenType::Delim('\\'))
}

fn serialize_token(token_type: &TokenType) -> String {
    match token_type {
        TokenType::Eof => String::new(),
        TokenType::Ident(val) => escape_ident(val),
        TokenType::Function(val) => format!("{}(", escape_ident(val)),
        TokenType::AtKeyword(val) => format!("@{}", escape_ident(val)),
        TokenType::Hash { value, id: true } => format!("#{}", escape_ident(value)),
        TokenType::Hash { value, id: false } => format!("#{}", escape_name(value)),
        TokenType::QuotedString(val) => format!("\"{}\"", escape_string(val)),
        TokenType::BadString(val) => format!("\"{}", escape_string(val)),
        TokenType::Url(val) => format!("url({})", escape_url(val)),
        // the paren turns the url bad, and the rest up to `)` is skipped
        TokenType::BadUrl(val) => format!("url({}()", escape_url(val)),
        TokenType::Delim(c) => c.to_string(),
        TokenType::Number(n) => n.repr.clone(),
        TokenType::Percentage(n) => format!("{}%", n.repr),
        TokenType::Dimension { value, unit } => format!("{}{}", value.repr, escape_unit(unit)),
        TokenType::UnicodeRange { low, high } if low == high => format!("U+{low:X}"),
        TokenType::UnicodeRange { low, high } => format!("U+{low:X}-{high:X}"),
        TokenType::IncludeMatch => "~=".into(),
        TokenType::DashMatch => "|=".into(),
        TokenType::PrefixMatch => "^=".into(),
        TokenType::SuffixMatch => "$=".into(),
        TokenType::SubstringMatch => "*=".into(),
        TokenType::Column => "||".into(),
        TokenType::Whitespace => " ".into(),
        TokenType::Cdo => "<!--".into(),
        TokenType::Cdc => "-->".into(),
        TokenType::Colon => ":".into(),
        TokenType::Semicolon => ";".into(),
        TokenType::Comma => ",".into(),
        TokenType::LBracket => "[".into(),
        TokenType::RBracket => "]".into(),
        TokenType::LParen => "(".into(),
        TokenType::RParen => ")".into(),
        TokenType::LCurly => "{".into(),
        TokenType::RCurly => "}".into(),
    }
}

fn hex_escape(out: &mut String, c: char) {
    let _ = write!(out, "\\{:x} ", u32::from(c));
}

fn is_control(c: char) -> bool {
    matches!(c, '\u{1}'..='\u{1f}' | UnicodeChar::DELETE)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c >= UnicodeChar::CONTROL
}

/// [Serialize an identifier](https://drafts.csswg.org/cssom/#serialize-an-identifier)
fn escape_ident(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let first = value.chars().next();

    if value == "-" {
        return "\\-".into();
    }

    for (i, c) in value.chars().enumerate() {
        match c {
            UnicodeChar::NULL => out.push(UnicodeChar::REPLACEMENT_CHARACTER),
            c if is_control(c) => hex_escape(&mut out, c),
            c if c.is_ascii_digit() && (i == 0 || (i == 1 && first == Some('-'))) => {
                hex_escape(&mut out, c)
            }
            c if is_name_char(c) => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}

/// Like an identifier, but without the restrictions on the first characters
fn escape_name(value: &str) -> String {
    let mut out = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            UnicodeChar::NULL => out.push(UnicodeChar::REPLACEMENT_CHARACTER),
            c if is_control(c) => hex_escape(&mut out, c),
            c if is_name_char(c) => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}

/// A unit starting with `e` and a digit or `-` would be read back as an exponent
fn escape_unit(unit: &str) -> String {
    let mut chars = unit.chars();
    match (chars.next(), chars.next()) {
        (Some(e @ ('e' | 'E')), Some(c)) if c.is_ascii_digit() || c == '-' => {
            let mut out = String::new();
            hex_escape(&mut out, e);
            out.push_str(&escape_name(&unit[1..]));
            out
        }
        _ => escape_ident(unit),
    }
}

/// [Serialize a string](https://drafts.csswg.org/cssom/#serialize-a-string), without the quotes
fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            UnicodeChar::NULL => out.push(UnicodeChar::REPLACEMENT_CHARACTER),
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if is_control(c) => hex_escape(&mut out, c),
            c => out.push(c),
        }
    }

    out
}

fn escape_url(value: &str) -> String {
    let mut out = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            UnicodeChar::NULL => out.push(UnicodeChar::REPLACEMENT_CHARACTER),
            '"' | '\'' | '(' | ')' | '\\' | ' ' => hex_escape(&mut out, c),
            c if is_control(c) => hex_escape(&mut out, c),
            c => out.push(c),
        }
    }

    out
}
