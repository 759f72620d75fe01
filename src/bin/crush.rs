use anyhow::Result;
use crush_css3::parser::Parser;
use crush_css3::parser_config::{ParserConfig, Trace};
use crush_css3::tokenizer::Tokenizer;
use crush_css3::walker::Walker;
use crush_shared::byte_stream::{ByteStream, Encoding};
use crush_shared::errors::Error;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::fs::File;
use std::io;

fn main() -> Result<()> {
    let matches = clap::Command::new("crush")
        .version("0.1.0")
        .about("Tokenizes and parses CSS")
        .arg(
            clap::Arg::new("file")
                .help("The file to parse, standard input when omitted")
                .index(1),
        )
        .arg(
            clap::Arg::new("encoding")
                .help("How the input bytes are read")
                .long("encoding")
                .value_parser(["utf8", "ascii"])
                .default_value("utf8"),
        )
        .arg(
            clap::Arg::new("tokens")
                .help("Just print the tokens")
                .long("tokens")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("css")
                .help("Print the stylesheet serialized back to css")
                .long("css")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("debug")
                .help("Enable debug logging")
                .short('d')
                .long("debug")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("trace")
                .help("Trace every consumed character and tokenizer state")
                .long("trace")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("preserve-whitespace")
                .help("Keep whitespace tokens in the stylesheet")
                .long("preserve-whitespace")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let trace = matches.get_flag("trace");
    let level = if trace {
        LevelFilter::Trace
    } else if matches.get_flag("debug") {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    };
    SimpleLogger::new().with_level(level).init()?;

    let encoding = match matches.get_one::<String>("encoding").map(String::as_str) {
        Some("ascii") => Encoding::ASCII,
        _ => Encoding::UTF8,
    };
    let file = matches.get_one::<String>("file");
    let stream = read_stream(file.map(String::as_str), encoding)?;

    let config = ParserConfig {
        source: Some(file.cloned().unwrap_or_else(|| "<stdin>".into())),
        preserve_whitespace: matches.get_flag("preserve-whitespace"),
        trace: Trace {
            consumption: trace,
            states: trace,
        },
        ..Default::default()
    };

    if matches.get_flag("tokens") {
        print_tokens(Tokenizer::new(stream, &config));
        return Ok(());
    }

    let source = config.source.clone().unwrap_or_default();
    let result = Parser::parse_stream(stream, config);
    for err in &result.errors {
        eprintln!("{source}: {err}");
    }

    if matches.get_flag("css") {
        println!("{}", result.stylesheet.to_css());
    } else {
        print!("{}", Walker::new(&result.stylesheet).walk_to_string());
    }

    Ok(())
}

/// Loads the given file, or standard input when there is none
fn read_stream(file: Option<&str>, encoding: Encoding) -> Result<ByteStream, Error> {
    let mut stream = ByteStream::new(encoding);
    match file {
        Some(path) => stream.read_from_file(File::open(path)?)?,
        None => stream.read_from_file(io::stdin().lock())?,
    }

    Ok(stream)
}

fn print_tokens(tokenizer: Tokenizer) {
    for token in tokenizer {
        println!("{:?} {:<16} {}", token.location, token.kind().name(), token);
    }
    println!("EOF");
}
