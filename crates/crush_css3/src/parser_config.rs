use crush_shared::byte_stream::Location;

/// Switches for the trace logging of the cursor and tokenizer. Both default to off.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Trace {
    /// Log every consumed and reconsumed character
    pub consumption: bool,
    /// Log every tokenizer sub-algorithm that is entered
    pub states: bool,
}

/// ParserConfig holds the configuration for the cursor, tokenizer and parser
#[derive(Clone, Debug, PartialEq)]
pub struct ParserConfig {
    /// Optional source filename or url, only used in diagnostics
    pub source: Option<String>,
    /// Location holds the start position of the given element in the data source
    pub location: Location,
    /// Keep whitespace tokens as component values instead of skipping them
    pub preserve_whitespace: bool,
    /// Trace logging switches
    pub trace: Trace,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            source: None,
            location: Location::default(),
            preserve_whitespace: false,
            trace: Trace::default(),
        }
    }
}
