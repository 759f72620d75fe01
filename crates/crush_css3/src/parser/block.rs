use crate::node::{BlockKind, ComponentValue, Function, SimpleBlock};
use crate::parser::Parser;
use crate::tokenizer::TokenType;
use crush_shared::byte_stream::Location;

/// A block or function that has been opened but not yet closed
enum Pending {
    Block(SimpleBlock),
    Function(Function),
}

impl Pending {
    /// Kind of block whose closing token ends this node. Functions end at `)`.
    fn kind(&self) -> BlockKind {
        match self {
            Pending::Block(block) => block.kind,
            Pending::Function(_) => BlockKind::Paren,
        }
    }

    fn contents_mut(&mut self) -> &mut Vec<ComponentValue> {
        match self {
            Pending::Block(block) => &mut block.contents,
            Pending::Function(function) => &mut function.arguments,
        }
    }

    fn into_component_value(self) -> ComponentValue {
        match self {
            Pending::Block(block) => ComponentValue::SimpleBlock(block),
            Pending::Function(function) => ComponentValue::Function(function),
        }
    }
}

/// Appends a finished value to the innermost open node, or to the root list when nothing is open
fn append(stack: &mut [Pending], root: &mut Vec<ComponentValue>, value: ComponentValue) {
    match stack.last_mut() {
        Some(node) => node.contents_mut().push(value),
        None => root.push(value),
    }
}

impl Parser {
    /// 5.4.8. [Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// Expects the opening token to be consumed already.
    pub(crate) fn parse_simple_block(&mut self, kind: BlockKind, location: Location) -> SimpleBlock {
        log::trace!("parse_simple_block");

        SimpleBlock {
            kind,
            contents: self.consume_contents(kind),
            location,
        }
    }

    /// Consumes component values until the token that closes `terminator`, which is consumed as
    /// well. Blocks and functions found on the way are tracked on an explicit stack instead of
    /// recursing, so deeply nested input cannot exhaust the call stack. The end of the input
    /// closes every node that is still open.
    pub(crate) fn consume_contents(&mut self, terminator: BlockKind) -> Vec<ComponentValue> {
        let mut root = Vec::new();
        let mut stack: Vec<Pending> = Vec::new();

        loop {
            let t = self.consume();

            if t.is_eof() {
                while let Some(node) = stack.pop() {
                    append(&mut stack, &mut root, node.into_component_value());
                }
                return root;
            }

            let closing = match stack.last() {
                Some(node) => node.kind(),
                None => terminator,
            };
            if closing.is_closed_by(&t.token_type) {
                match stack.pop() {
                    Some(node) => append(&mut stack, &mut root, node.into_component_value()),
                    None => return root,
                }
                continue;
            }

            if self.skips(&t) {
                continue;
            }

            if let Some(kind) = BlockKind::from_opener(&t.token_type) {
                stack.push(Pending::Block(SimpleBlock::new(kind, t.location)));
            } else if matches!(t.token_type, TokenType::Function(_)) {
                stack.push(Pending::Function(Function::new(t)));
            } else {
                append(&mut stack, &mut root, ComponentValue::Token(t));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{BlockKind, ComponentValue, SimpleBlock};
    use crate::parser::Parser;
    use crate::parser_config::ParserConfig;
    use crate::tokenizer::{TokenType, Tokenizer};
    use test_case::test_case;

    fn block_of(input: &str) -> SimpleBlock {
        let result = Parser::parse_str(input, ParserConfig::default());
        result.stylesheet.rules[0]
            .block()
            .expect("rule has a block")
            .clone()
    }

    /// Checks that every block in the tree holds a kind that mirrors the token that opened it
    fn assert_well_formed(values: &[ComponentValue]) {
        for value in values {
            match value {
                ComponentValue::SimpleBlock(block) => {
                    assert_eq!(block.closer(), block.kind.closer());
                    assert_well_formed(&block.contents);
                }
                ComponentValue::Function(function) => assert_well_formed(&function.arguments),
                ComponentValue::Token(token) => {
                    assert!(BlockKind::from_opener(&token.token_type).is_none());
                    assert!(!matches!(token.token_type, TokenType::Function(_)));
                }
            }
        }
    }

    #[test]
    fn nested_blocks_and_functions() {
        let block = block_of("a { b: f(1, [x (y)]) }");
        assert_eq!(block.contents.len(), 3);

        let function = block.contents[2].as_function().expect("a function");
        assert_eq!(function.name(), "f");
        assert_eq!(function.arguments.len(), 3);

        let square = function.arguments[2].as_simple_block().expect("a block");
        assert_eq!(square.kind, BlockKind::Square);
        assert_eq!(square.contents.len(), 2);

        let paren = square.contents[1].as_simple_block().expect("a block");
        assert_eq!(paren.kind, BlockKind::Paren);
        assert_eq!(
            paren.contents[0].as_token().map(|t| t.token_type.clone()),
            Some(TokenType::Ident("y".into()))
        );
    }

    #[test]
    fn mismatched_closers_are_plain_tokens() {
        let block = block_of("a { ( ] ) }");
        assert_eq!(block.contents.len(), 1);

        let paren = block.contents[0].as_simple_block().expect("a block");
        assert_eq!(paren.kind, BlockKind::Paren);
        assert_eq!(
            paren.contents[0].as_token().map(|t| t.token_type.clone()),
            Some(TokenType::RBracket)
        );
    }

    #[test_case("a { ( [ f(")]
    #[test_case("a { { { {")]
    #[test_case("a { x: calc(1 + (2 * [3")]
    fn eof_closes_every_open_node(input: &str) {
        let result = Parser::parse_str(input, ParserConfig::default());
        assert_eq!(result.stylesheet.len(), 1);
        assert!(!result.has_errors());

        let block = result.stylesheet.rules[0].block().expect("rule has a block");
        assert_well_formed(&block.contents);
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let depth = 1000;
        let input = format!("a {{ {}", "[".repeat(depth));
        let block = block_of(&input);

        let mut level = 0;
        let mut contents = &block.contents;
        while let Some(inner) = contents.first().and_then(|v| v.as_simple_block()) {
            level += 1;
            contents = &inner.contents;
        }
        assert_eq!(level, depth);
    }

    #[test]
    fn consume_contents_stops_at_the_terminator() {
        let mut parser = Parser::new(Tokenizer::from("a [b] ) c"), ParserConfig::default());
        let contents = parser.consume_contents(BlockKind::Paren);
        assert_eq!(contents.len(), 2);
        assert_eq!(parser.consume().token_type, TokenType::Whitespace);
        assert_eq!(parser.consume().token_type, TokenType::Ident("c".into()));
    }
}
