//! CSS syntax level 3
//!
//! Turns a character stream into tokens, and tokens into a stylesheet of qualified rules and
//! at-rules made of nested component values. The crate stops at syntax: selectors, properties
//! and at-rule specific grammars are left to the consumers of the [`node::Stylesheet`].
//!
//! ```
//! use crush_css3::parser::Parser;
//! use crush_css3::parser_config::ParserConfig;
//!
//! let result = Parser::parse_str("body { color: red }", ParserConfig::default());
//! assert_eq!(result.stylesheet.len(), 1);
//! ```

pub mod cursor;
pub mod node;
pub mod parser;
pub mod parser_config;
pub mod tokenizer;
mod unicode;
pub mod walker;

pub use parser::parse_stylesheet;
