use crate::node::{Rule, Stylesheet};
use crate::parser::{ParseResult, Parser};
use crate::tokenizer::TokenType;

impl Parser {
    /// 5.3.3. [Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    pub fn parse_stylesheet(mut self) -> ParseResult {
        log::trace!("parse_stylesheet");

        let rules = self.parse_rule_list(true);

        ParseResult {
            stylesheet: Stylesheet::new(rules),
            errors: self.errors,
        }
    }

    /// 5.4.1. [Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// At the top level CDO and CDC tokens are dropped; elsewhere they start a qualified rule.
    /// A qualified rule that runs into the end of the input is dropped, after which the list
    /// ends as well.
    pub fn parse_rule_list(&mut self, top_level: bool) -> Vec<Rule> {
        log::trace!("parse_rule_list");

        let mut rules = Vec::new();

        loop {
            let t = self.consume();

            match t.token_type {
                TokenType::Eof => return rules,
                TokenType::Whitespace => {}
                TokenType::Cdo | TokenType::Cdc if top_level => {}
                TokenType::AtKeyword(_) => {
                    self.reconsume(t);
                    rules.push(Rule::At(self.parse_at_rule()));
                }
                _ => {
                    self.reconsume(t);
                    if let Some(rule) = self.parse_qualified_rule() {
                        rules.push(Rule::Qualified(rule));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::Rule;
    use crate::parser::Parser;
    use crate::parser_config::ParserConfig;
    use crate::tokenizer::{Tokenizer, TokenType};
    use test_case::test_case;

    #[test_case("", 0)]
    #[test_case("   \n\t", 0)]
    #[test_case("body { }", 1)]
    #[test_case("a {} b {} c {}", 3)]
    #[test_case("@charset \"utf-8\"; a {}", 2)]
    #[test_case("<!-- a {} -->", 1)]
    #[test_case("a {} <!-- --> b {}", 2)]
    #[test_case("a {} b", 1)]
    #[test_case("@media screen { a { } } b { }", 2)]
    fn rule_counts(input: &str, count: usize) {
        let result = Parser::parse_str(input, ParserConfig::default());
        assert_eq!(result.stylesheet.len(), count, "rules of {input:?}");
    }

    #[test]
    fn rules_keep_source_order() {
        let result = Parser::parse_str(
            "@import 'x'; a { } @media print { } b { }",
            ParserConfig::default(),
        );
        let kinds: Vec<&str> = result
            .stylesheet
            .rules()
            .iter()
            .map(|rule| match rule {
                Rule::At(at) => at.name(),
                Rule::Qualified(_) => "qualified",
            })
            .collect();

        assert_eq!(kinds, vec!["import", "qualified", "media", "qualified"]);
        assert!(!result.has_errors());
    }

    #[test]
    fn discarded_rule_at_eof_ends_the_list() {
        let result = Parser::parse_str("a { } b c", ParserConfig::default());
        assert_eq!(result.stylesheet.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("end of input"));
    }

    #[test]
    fn nested_rule_list_keeps_cdo_and_cdc() {
        let mut parser = Parser::new(Tokenizer::from("<!-- a { }"), ParserConfig::default());
        let rules = parser.parse_rule_list(false);
        assert_eq!(rules.len(), 1);

        let prelude: Vec<TokenType> = rules[0]
            .prelude()
            .iter()
            .filter_map(|v| v.as_token())
            .map(|t| t.token_type.clone())
            .collect();
        assert_eq!(prelude, vec![TokenType::Cdo, TokenType::Ident("a".into())]);
    }
}
