use crush_bin::css3::node::{BlockKind, ComponentValue, Rule, Stylesheet};
use crush_bin::css3::parser::Parser;
use crush_bin::css3::parser_config::ParserConfig;
use crush_bin::css3::tokenizer::{TokenKind, Tokenizer};
use crush_bin::css3::walker::Walker;
use crush_bin::parse_stylesheet;
use crush_bin::shared::byte_stream::{ByteStream, Encoding};
use std::fs::File;
use test_case::test_case;

fn load_fixture() -> ByteStream {
    let file = File::open("tests/data/css/stylesheet.css").unwrap();
    let mut stream = ByteStream::new(Encoding::UTF8);
    stream.read_from_file(file).unwrap();
    stream
}

/// Every block must be closed by the mirror of the token that opened it
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
                assert!(token.kind() != TokenKind::Function);
            }
        }
    }
}

fn assert_stylesheet_well_formed(stylesheet: &Stylesheet) {
    for rule in stylesheet {
        assert_well_formed(rule.prelude());
        if let Some(block) = rule.block() {
            assert_eq!(block.kind, BlockKind::Curly);
            assert_well_formed(&block.contents);
        }
    }
}

#[test]
fn single_entry_point() {
    let stylesheet = parse_stylesheet(Tokenizer::from("body { } @media print { a { } }"));
    assert_eq!(stylesheet.len(), 2);
    assert!(matches!(stylesheet.rules()[0], Rule::Qualified(_)));
    assert!(matches!(stylesheet.rules()[1], Rule::At(_)));
}

#[test]
fn fixture_stylesheet() {
    let result = Parser::parse_stream(load_fixture(), ParserConfig::default());

    // the trailing `legacy -->` runs into the end of the input
    assert_eq!(result.stylesheet.len(), 9);
    assert_eq!(result.errors.len(), 1);
    assert_stylesheet_well_formed(&result.stylesheet);

    let names: Vec<&str> = result
        .stylesheet
        .rules()
        .iter()
        .filter_map(|rule| match rule {
            Rule::At(at) => Some(at.name()),
            Rule::Qualified(_) => None,
        })
        .collect();
    assert_eq!(names, vec!["charset", "import", "font-face", "media"]);
}

#[test_case("a { b: c")]
#[test_case("a { b: f(1, (2, [3")]
#[test_case("@a { [ ( { ")]
#[test_case("a { } ] ) } b { }")]
#[test_case("f( { ) } g[ ) ] { }")]
#[test_case("<!-- a { } --> b { }")]
fn blocks_mirror_their_openers(input: &str) {
    let result = Parser::parse_str(input, ParserConfig::default());
    assert_stylesheet_well_formed(&result.stylesheet);
}

#[test]
fn discarded_rule_ends_the_list() {
    let result = Parser::parse_str("a { } b c", ParserConfig::default());
    assert_eq!(result.stylesheet.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].location.is_some());
}

#[test]
fn source_name_is_kept_in_the_config() {
    let config = ParserConfig {
        source: Some("inline.css".into()),
        ..Default::default()
    };
    let result = Parser::parse_str("a", config);
    assert!(result.has_errors());
    assert!(result.stylesheet.is_empty());
}

#[test]
fn ascii_stream_reads_high_bytes_as_question_marks() {
    let mut stream = ByteStream::new(Encoding::ASCII);
    stream.read_from_file("é { }".as_bytes()).unwrap();
    let result = Parser::parse_stream(stream, ParserConfig::default());

    assert_eq!(result.stylesheet.len(), 1);
    let prelude: Vec<String> = result.stylesheet.rules()[0]
        .prelude()
        .iter()
        .filter_map(|value| match value {
            ComponentValue::Token(token) if token.kind() != TokenKind::Whitespace => {
                Some(token.to_string())
            }
            _ => None,
        })
        .collect();
    assert_eq!(prelude, vec!["?", "?"]);
}

#[test]
fn fixture_round_trips_through_css() {
    let config = ParserConfig {
        preserve_whitespace: true,
        ..Default::default()
    };
    let first = Parser::parse_stream(load_fixture(), config.clone()).stylesheet;
    let css = first.to_css();
    let second = Parser::parse_str(&css, config).stylesheet;

    assert_eq!(
        Walker::new(&first).walk_to_string(),
        Walker::new(&second).walk_to_string()
    );
}

#[test]
fn walker_tree_of_a_rule() {
    let stylesheet = parse_stylesheet(Tokenizer::from("a:hover { color: rgb(0, 0, 0) }"));
    assert_eq!(
        Walker::new(&stylesheet).walk_to_string(),
        "[Stylesheet (1)]\n\
         \x20 [QualifiedRule]\n\
         \x20   [IDENT] a\n\
         \x20   [COLON] :\n\
         \x20   [IDENT] hover\n\
         \x20   [Block {}]\n\
         \x20     [IDENT] color\n\
         \x20     [COLON] :\n\
         \x20     [Function] rgb\n\
         \x20       [NUMBER] 0\n\
         \x20       [COMMA] ,\n\
         \x20       [NUMBER] 0\n\
         \x20       [COMMA] ,\n\
         \x20       [NUMBER] 0\n"
    );
}
