use crate::node::{BlockKind, Function};
use crate::parser::Parser;
use crate::tokenizer::Token;

impl Parser {
    /// 5.4.9. [Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
    ///
    /// `name` is the function token that has just been consumed. Arguments run up to the matching
    /// `)` or the end of the input.
    pub(crate) fn parse_function(&mut self, name: Token) -> Function {
        log::trace!("parse_function");

        Function {
            name,
            arguments: self.consume_contents(BlockKind::Paren),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::ComponentValue;
    use crate::parser::Parser;
    use crate::parser_config::ParserConfig;
    use crate::tokenizer::{TokenKind, Tokenizer};

    fn function_of(input: &str) -> crate::node::Function {
        let mut parser = Parser::new(Tokenizer::from(input), ParserConfig::default());
        match parser.parse_component_value() {
            ComponentValue::Function(function) => function,
            other => panic!("expected a function, got {other:?}"),
        }
    }

    fn argument_kinds(input: &str) -> Vec<TokenKind> {
        function_of(input)
            .arguments
            .iter()
            .filter_map(|v| v.as_token())
            .map(|t| t.kind())
            .collect()
    }

    #[test]
    fn arguments() {
        let function = function_of("rgba(255, 0, 0, 50%)");
        assert_eq!(function.name(), "rgba");
        assert_eq!(
            argument_kinds("rgba(255, 0, 0, 50%)"),
            vec![
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Percentage,
            ]
        );
    }

    #[test]
    fn empty_and_unterminated() {
        assert!(function_of("f()").arguments.is_empty());
        assert_eq!(argument_kinds("f(a"), vec![TokenKind::Ident]);
    }

    #[test]
    fn nested_functions() {
        let function = function_of("calc(1px + min(2px, 3px))");
        assert_eq!(function.arguments.len(), 3);

        let inner = function.arguments[2].as_function().expect("a nested function");
        assert_eq!(inner.name(), "min");
        assert_eq!(inner.arguments.len(), 3);
    }

    #[test]
    fn url_with_quotes_is_a_single_token() {
        let mut parser = Parser::new(
            Tokenizer::from("url(\"a.png\")"),
            ParserConfig::default(),
        );
        let value = parser.parse_component_value();
        assert_eq!(value.as_token().map(|t| t.kind()), Some(TokenKind::Url));
    }
}
