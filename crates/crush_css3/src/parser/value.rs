use crate::node::{BlockKind, ComponentValue};
use crate::parser::Parser;
use crate::tokenizer::TokenType;

impl Parser {
    /// 5.4.7. [Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    pub fn parse_component_value(&mut self) -> ComponentValue {
        log::trace!("parse_component_value");

        loop {
            let t = self.consume();
            if self.skips(&t) {
                continue;
            }

            if let Some(kind) = BlockKind::from_opener(&t.token_type) {
                return ComponentValue::SimpleBlock(self.parse_simple_block(kind, t.location));
            }

            if matches!(t.token_type, TokenType::Function(_)) {
                return ComponentValue::Function(self.parse_function(t));
            }

            return ComponentValue::Token(t);
        }
    }
}
