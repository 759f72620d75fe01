use crate::node::Stylesheet;
use crate::parser_config::ParserConfig;
use crate::tokenizer::{Token, Tokenizer};
use crush_shared::byte_stream::{ByteStream, Location};
use crush_shared::errors::CssError;

mod at_rule;
mod block;
mod function;
mod rule;
mod stylesheet;
mod value;

/// Rule-level parser built on top of the tokenizer.
///
/// The parser reads one token at a time and can push back exactly one token. Parse errors never
/// stop the parser, they are collected and returned together with the stylesheet.
pub struct Parser {
    tokenizer: Tokenizer,
    /// Token that has been reconsumed and will be returned by the next consume
    pushback: Option<Token>,
    /// The parser configuration as given
    config: ParserConfig,
    /// Parse errors found so far
    errors: Vec<CssError>,
}

/// Outcome of parsing a complete stylesheet
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub stylesheet: Stylesheet,
    pub errors: Vec<CssError>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl Parser {
    pub fn new(tokenizer: Tokenizer, config: ParserConfig) -> Self {
        Self {
            tokenizer,
            pushback: None,
            config,
            errors: Vec::new(),
        }
    }

    /// Parses a direct string into a stylesheet
    pub fn parse_str(data: &str, config: ParserConfig) -> ParseResult {
        Parser::parse_stream(ByteStream::from(data), config)
    }

    /// Parses a stream into a stylesheet
    pub fn parse_stream(stream: ByteStream, config: ParserConfig) -> ParseResult {
        let tokenizer = Tokenizer::new(stream, &config);
        Parser::new(tokenizer, config).parse_stylesheet()
    }

    /// Parse errors found so far
    pub fn errors(&self) -> &[CssError] {
        &self.errors
    }

    /// Consumes the next token, which is the reconsumed one if there is any
    fn consume(&mut self) -> Token {
        match self.pushback.take() {
            Some(token) => token,
            None => self.tokenizer.next_token(),
        }
    }

    /// Hands the token back so the next consume returns it again. Only a single token can be
    /// pending; reconsuming twice without a consume in between is a bug in the parser.
    fn reconsume(&mut self, token: Token) {
        assert!(
            self.pushback.is_none(),
            "reconsume called twice without an intervening consume"
        );
        self.pushback = Some(token);
    }

    /// Location of the token that the next consume returns
    fn next_location(&self) -> Location {
        match &self.pushback {
            Some(token) => token.location.clone(),
            None => self.tokenizer.current_location(),
        }
    }

    /// Whitespace is skipped by every consumer unless the config asks to keep it
    fn skips(&self, token: &Token) -> bool {
        token.is_whitespace() && !self.config.preserve_whitespace
    }

    fn parse_error(&mut self, message: &str, location: Location) {
        let err = CssError::with_location(message, location);
        log::warn!(
            "{}: {}",
            self.config.source.as_deref().unwrap_or("<input>"),
            err
        );
        self.errors.push(err);
    }
}

/// Parses the complete token stream of the tokenizer into a stylesheet with the default
/// configuration. Parse errors are logged and otherwise dropped.
pub fn parse_stylesheet(tokenizer: Tokenizer) -> Stylesheet {
    Parser::new(tokenizer, ParserConfig::default())
        .parse_stylesheet()
        .stylesheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenType;

    #[test]
    fn reconsumed_token_comes_back() {
        let mut parser = Parser::new(Tokenizer::from("a b"), ParserConfig::default());
        let t = parser.consume();
        assert_eq!(t.token_type, TokenType::Ident("a".into()));
        assert_eq!(parser.next_location(), Location::new(1, 1, 0));

        parser.reconsume(t);
        assert_eq!(parser.next_location(), Location::new(1, 1, 0));
        assert_eq!(parser.consume().token_type, TokenType::Ident("a".into()));
        assert_eq!(parser.consume().token_type, TokenType::Whitespace);
        assert_eq!(parser.consume().token_type, TokenType::Ident("b".into()));
        assert_eq!(parser.consume().token_type, TokenType::Eof);
        assert_eq!(parser.consume().token_type, TokenType::Eof);
    }

    #[test]
    #[should_panic(expected = "reconsume called twice")]
    fn double_reconsume_is_a_contract_violation() {
        let mut parser = Parser::new(Tokenizer::from("a b"), ParserConfig::default());
        let a = parser.consume();
        let b = a.clone();
        parser.reconsume(a);
        parser.reconsume(b);
    }

    #[test]
    fn free_function_parses_with_defaults() {
        let sheet = parse_stylesheet(Tokenizer::from("a {} b {}"));
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn parse_errors_carry_their_location() {
        let result = Parser::parse_str("a {}\nb c", ParserConfig::default());
        assert_eq!(result.stylesheet.len(), 1);
        assert!(result.has_errors());
        assert_eq!(result.errors[0].location, Some(Location::new(2, 4, 8)));
    }
}
