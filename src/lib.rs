//! Crush, a CSS syntax tokenizer and parser
//!
//! The parsing itself lives in the member crates, this crate bundles them together with the
//! `crush` command line tool.

pub use crush_css3 as css3;
pub use crush_shared as shared;

pub use crush_css3::parse_stylesheet;
