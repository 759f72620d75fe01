use crate::node::{AtRule, BlockKind};
use crate::parser::Parser;
use crate::tokenizer::TokenType;

impl Parser {
    /// 5.4.2. [Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// Expects the at-keyword as the next token. The rule ends at a semicolon, at the end of
    /// its block or at the end of the input.
    pub(crate) fn parse_at_rule(&mut self) -> AtRule {
        log::trace!("parse_at_rule");

        let name = self.consume();
        let mut prelude = Vec::new();

        loop {
            let t = self.consume();
            if self.skips(&t) {
                continue;
            }

            match t.token_type {
                TokenType::Semicolon | TokenType::Eof => {
                    return AtRule {
                        name,
                        prelude,
                        block: None,
                    };
                }
                TokenType::LCurly => {
                    let block = self.parse_simple_block(BlockKind::Curly, t.location);
                    return AtRule {
                        name,
                        prelude,
                        block: Some(block),
                    };
                }
                _ => {
                    self.reconsume(t);
                    prelude.push(self.parse_component_value());
                }
            }
        }
    }
}
