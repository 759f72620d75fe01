use crate::node::{BlockKind, QualifiedRule};
use crate::parser::Parser;
use crate::tokenizer::TokenType;

impl Parser {
    /// 5.4.3. [Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    ///
    /// Returns `None` when the input ends before the block starts. The rule is dropped in that
    /// case and a parse error is recorded.
    pub(crate) fn parse_qualified_rule(&mut self) -> Option<QualifiedRule> {
        log::trace!("parse_qualified_rule");

        let location = self.next_location();
        let mut prelude = Vec::new();

        loop {
            let t = self.consume();
            if self.skips(&t) {
                continue;
            }

            match t.token_type {
                TokenType::Eof => {
                    self.parse_error("unexpected end of input in qualified rule", t.location);
                    return None;
                }
                TokenType::LCurly => {
                    let block = self.parse_simple_block(BlockKind::Curly, t.location);
                    return Some(QualifiedRule {
                        prelude,
                        block: Some(block),
                        location,
                    });
                }
                _ => {
                    self.reconsume(t);
                    prelude.push(self.parse_component_value());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{ComponentValue, Rule};
    use crate::parser::Parser;
    use crate::parser_config::ParserConfig;
    use crate::tokenizer::TokenType;
    use crush_shared::byte_stream::Location;

    fn first_rule(input: &str, config: ParserConfig) -> Rule {
        let result = Parser::parse_str(input, config);
        assert!(!result.has_errors(), "errors in {input:?}: {:?}", result.errors);
        result.stylesheet.rules[0].clone()
    }

    fn token_types(values: &[ComponentValue]) -> Vec<TokenType> {
        values
            .iter()
            .filter_map(|v| v.as_token())
            .map(|t| t.token_type.clone())
            .collect()
    }

    #[test]
    fn prelude_and_block() {
        let rule = first_rule("h1 > p { color: red; }", ParserConfig::default());
        let Rule::Qualified(rule) = rule else {
            panic!("expected a qualified rule");
        };

        assert_eq!(
            token_types(&rule.prelude),
            vec![
                TokenType::Ident("h1".into()),
                TokenType::Delim('>'),
                TokenType::Ident("p".into()),
            ]
        );

        let block = rule.block.expect("rule has a block");
        assert_eq!(block.closer(), '}');
        assert_eq!(
            token_types(&block.contents),
            vec![
                TokenType::Ident("color".into()),
                TokenType::Colon,
                TokenType::Ident("red".into()),
                TokenType::Semicolon,
            ]
        );
        assert_eq!(rule.location, Location::new(1, 1, 0));
    }

    #[test]
    fn whitespace_is_kept_when_configured() {
        let config = ParserConfig {
            preserve_whitespace: true,
            ..Default::default()
        };
        let rule = first_rule("a b { c }", config);

        assert_eq!(
            token_types(rule.prelude()),
            vec![
                TokenType::Ident("a".into()),
                TokenType::Whitespace,
                TokenType::Ident("b".into()),
                TokenType::Whitespace,
            ]
        );
        assert_eq!(
            token_types(&rule.block().expect("rule has a block").contents),
            vec![
                TokenType::Whitespace,
                TokenType::Ident("c".into()),
                TokenType::Whitespace,
            ]
        );
    }

    #[test]
    fn eof_in_prelude_drops_the_rule() {
        let result = Parser::parse_str("a, b", ParserConfig::default());
        assert!(result.stylesheet.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].location, Some(Location::new(1, 5, 4)));
    }

    #[test]
    fn eof_in_block_keeps_the_rule() {
        let result = Parser::parse_str("a { color: red", ParserConfig::default());
        assert_eq!(result.stylesheet.len(), 1);
        assert!(!result.has_errors());
    }

    #[test]
    fn rule_location_is_its_first_token() {
        let result = Parser::parse_str("\n\n  .x {}", ParserConfig::default());
        assert_eq!(
            result.stylesheet.rules[0].location(),
            Location::new(3, 3, 4)
        );
    }
}
