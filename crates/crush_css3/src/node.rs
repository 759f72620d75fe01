use crate::tokenizer::{Token, TokenType};
use crush_shared::byte_stream::Location;

/// The three kinds of simple block, named after their delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `{ ... }`
    Curly,
    /// `[ ... ]`
    Square,
    /// `( ... )`
    Paren,
}

impl BlockKind {
    /// Returns the block kind that the given token opens, if any
    pub fn from_opener(token_type: &TokenType) -> Option<BlockKind> {
        match token_type {
            TokenType::LCurly => Some(BlockKind::Curly),
            TokenType::LBracket => Some(BlockKind::Square),
            TokenType::LParen => Some(BlockKind::Paren),
            _ => None,
        }
    }

    pub fn opener(&self) -> char {
        match self {
            BlockKind::Curly => '{',
            BlockKind::Square => '[',
            BlockKind::Paren => '(',
        }
    }

    pub fn closer(&self) -> char {
        match self {
            BlockKind::Curly => '}',
            BlockKind::Square => ']',
            BlockKind::Paren => ')',
        }
    }

    /// Returns true when the token is the mirrored closing token of this block kind
    pub fn is_closed_by(&self, token_type: &TokenType) -> bool {
        matches!(
            (self, token_type),
            (BlockKind::Curly, TokenType::RCurly)
                | (BlockKind::Square, TokenType::RBracket)
                | (BlockKind::Paren, TokenType::RParen)
        )
    }
}

/// A `{}`, `[]` or `()` grouping of component values
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleBlock {
    pub kind: BlockKind,
    pub contents: Vec<ComponentValue>,
    /// Location of the opening token
    pub location: Location,
}

impl SimpleBlock {
    pub fn new(kind: BlockKind, location: Location) -> Self {
        Self {
            kind,
            contents: Vec::new(),
            location,
        }
    }

    /// The character that closes this block
    pub fn closer(&self) -> char {
        self.kind.closer()
    }
}

/// A function call: the function token and its arguments up to the closing parenthesis
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// The function token that opened the call
    pub name: Token,
    pub arguments: Vec<ComponentValue>,
}

impl Function {
    pub fn new(name: Token) -> Self {
        Self {
            name,
            arguments: Vec::new(),
        }
    }

    /// Name of the function, without the opening parenthesis
    pub fn name(&self) -> &str {
        self.name.text().unwrap_or_default()
    }

    pub fn location(&self) -> Location {
        self.name.location.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    Token(Token),
    Function(Function),
    SimpleBlock(SimpleBlock),
}

impl ComponentValue {
    pub fn location(&self) -> Location {
        match self {
            ComponentValue::Token(token) => token.location.clone(),
            ComponentValue::Function(function) => function.location(),
            ComponentValue::SimpleBlock(block) => block.location.clone(),
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, ComponentValue::Token(_))
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            ComponentValue::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            ComponentValue::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_simple_block(&self) -> Option<&SimpleBlock> {
        match self {
            ComponentValue::SimpleBlock(block) => Some(block),
            _ => None,
        }
    }
}

/// A rule without an at-keyword: a prelude (usually a selector list) and a block
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedRule {
    pub prelude: Vec<ComponentValue>,
    pub block: Option<SimpleBlock>,
    pub location: Location,
}

/// A rule introduced by an at-keyword, with a prelude and an optional block
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// The at-keyword token that introduced the rule
    pub name: Token,
    pub prelude: Vec<ComponentValue>,
    pub block: Option<SimpleBlock>,
}

impl AtRule {
    /// Name of the rule, without the `@`
    pub fn name(&self) -> &str {
        self.name.text().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Qualified(QualifiedRule),
    At(AtRule),
}

impl Rule {
    pub fn prelude(&self) -> &[ComponentValue] {
        match self {
            Rule::Qualified(rule) => &rule.prelude,
            Rule::At(rule) => &rule.prelude,
        }
    }

    pub fn block(&self) -> Option<&SimpleBlock> {
        match self {
            Rule::Qualified(rule) => rule.block.as_ref(),
            Rule::At(rule) => rule.block.as_ref(),
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Rule::Qualified(rule) => rule.location.clone(),
            Rule::At(rule) => rule.name.location.clone(),
        }
    }
}

/// An ordered list of rules, in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a Stylesheet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_kinds_mirror_their_openers() {
        for (opener, closer, kind) in [
            (TokenType::LCurly, TokenType::RCurly, BlockKind::Curly),
            (TokenType::LBracket, TokenType::RBracket, BlockKind::Square),
            (TokenType::LParen, TokenType::RParen, BlockKind::Paren),
        ] {
            assert_eq!(BlockKind::from_opener(&opener), Some(kind));
            assert!(kind.is_closed_by(&closer));
            assert!(!kind.is_closed_by(&opener));
        }

        assert_eq!(BlockKind::from_opener(&TokenType::RCurly), None);
        assert!(!BlockKind::Curly.is_closed_by(&TokenType::RParen));
        assert_eq!(BlockKind::Square.opener(), '[');
        assert_eq!(
            SimpleBlock::new(BlockKind::Paren, Location::default()).closer(),
            ')'
        );
    }

    #[test]
    fn names_of_functions_and_at_rules() {
        let function = Function::new(Token::new(
            TokenType::Function("rgba".into()),
            Location::new(2, 4, 10),
        ));
        assert_eq!(function.name(), "rgba");
        assert_eq!(function.location(), Location::new(2, 4, 10));

        let rule = AtRule {
            name: Token::new(TokenType::AtKeyword("media".into()), Location::default()),
            prelude: vec![],
            block: None,
        };
        assert_eq!(rule.name(), "media");
    }

    #[test]
    fn stylesheet_iterates_in_order() {
        let rule = |name: &str| {
            Rule::At(AtRule {
                name: Token::new(TokenType::AtKeyword(name.into()), Location::default()),
                prelude: vec![],
                block: None,
            })
        };

        let sheet = Stylesheet::new(vec![rule("a"), rule("b")]);
        assert_eq!(sheet.len(), 2);
        assert!(!sheet.is_empty());

        let names: Vec<&str> = sheet
            .into_iter()
            .map(|r| match r {
                Rule::At(at) => at.name(),
                Rule::Qualified(_) => "",
            })
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(Stylesheet::default().is_empty());
    }
}
