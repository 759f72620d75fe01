use crate::parser_config::ParserConfig;
use crate::unicode::UnicodeChar;
use crush_shared::byte_stream::Character::{Ch, StreamEnd};
use crush_shared::byte_stream::{ByteStream, Character, Location, Stream};
use std::collections::VecDeque;

/// Maximum number of preprocessed characters that can wait behind `next`: one reconsumed
/// character plus two peeked ones.
const MAX_LOOKAHEAD: usize = 3;

/// The cursor delivers the preprocessed character stream to the tokenizer.
///
/// It holds the last consumed character (`current`) and the first character that has not been
/// consumed yet (`next`). Characters beyond `next` are only read for lookahead and are kept in a
/// small queue, so nothing is ever pushed back into the underlying stream.
pub struct Cursor {
    stream: ByteStream,
    /// The last character that has been consumed
    current: Character,
    /// The first character in the stream that has not been consumed yet
    next: Character,
    /// Preprocessed characters that follow `next`
    lookahead: VecDeque<Character>,
    /// True when the last operation was a reconsume
    reconsumed: bool,
    /// Location of `current`
    location: Location,
    /// Location of `next`
    next_location: Location,
    /// Location of the character consumed before `current`, restored on reconsume
    previous_location: Location,
    /// Log every consume and reconsume
    trace: bool,
}

impl Cursor {
    /// Creates a new cursor on the given stream. The first character is read immediately.
    pub fn new(stream: ByteStream, config: &ParserConfig) -> Self {
        let mut cursor = Self {
            stream,
            current: Ch(UnicodeChar::NULL),
            next: StreamEnd,
            lookahead: VecDeque::with_capacity(MAX_LOOKAHEAD),
            reconsumed: false,
            location: config.location.clone(),
            next_location: config.location.clone(),
            previous_location: config.location.clone(),
            trace: config.trace.consumption,
        };

        cursor.next = cursor.preprocess();
        cursor
    }

    /// The last consumed character
    pub fn current(&self) -> Character {
        self.current
    }

    /// The next character that will be consumed
    pub fn next_char(&self) -> Character {
        self.next
    }

    /// Location of the current character
    pub fn location(&self) -> Location {
        self.location.clone()
    }

    /// Moves one character forward: current becomes next and a new next character is read
    pub fn consume(&mut self) {
        self.previous_location = std::mem::replace(&mut self.location, self.next_location.clone());
        self.current = self.next;
        self.next_location = advance(&self.location, self.current);
        self.next = self.pull();
        self.reconsumed = false;

        if self.trace {
            log::trace!(
                "{:?}: consuming {:?}; next is {:?}",
                self.location,
                self.current,
                self.next
            );
        }
    }

    /// Undoes the last consume. Only a single level of reconsume is allowed, calling this twice
    /// without a consume in between is a bug in the caller.
    pub fn reconsume(&mut self) {
        assert!(
            !self.reconsumed,
            "reconsume called twice without an intervening consume"
        );

        if self.trace {
            log::trace!("{:?}: reconsuming {:?}", self.location, self.current);
        }

        self.lookahead.push_front(self.next);
        debug_assert!(self.lookahead.len() <= MAX_LOOKAHEAD);

        self.next = self.current;
        self.current = Ch(UnicodeChar::NULL);
        self.next_location = std::mem::replace(&mut self.location, self.previous_location.clone());
        self.reconsumed = true;
    }

    /// Returns the character `offset` positions after the current one without consuming
    /// anything. Offset 0 is the next character; at most two characters beyond next can be
    /// inspected.
    pub fn peek(&mut self, offset: usize) -> Character {
        assert!(offset < MAX_LOOKAHEAD, "lookahead of {offset} is out of range");

        if offset == 0 {
            return self.next;
        }

        while self.lookahead.len() < offset {
            let c = self.preprocess();
            self.lookahead.push_back(c);
        }

        self.lookahead[offset - 1]
    }

    /// Returns the next three characters without consuming them
    pub fn next_three(&mut self) -> [Character; 3] {
        [self.peek(0), self.peek(1), self.peek(2)]
    }

    fn pull(&mut self) -> Character {
        match self.lookahead.pop_front() {
            Some(c) => c,
            None => self.preprocess(),
        }
    }

    /// Reads a raw character from the stream and applies the input preprocessing: NUL becomes
    /// the replacement character, and CR, CRLF and FF become a single LF.
    fn preprocess(&mut self) -> Character {
        match self.stream.read_and_next() {
            Ch(UnicodeChar::NULL) => Ch(UnicodeChar::REPLACEMENT_CHARACTER),
            Ch(UnicodeChar::CARRIAGE_RETURN) => {
                if self.stream.read() == Ch(UnicodeChar::LINE_FEED) {
                    self.stream.next();
                }
                Ch(UnicodeChar::LINE_FEED)
            }
            Ch(UnicodeChar::FORM_FEED) => Ch(UnicodeChar::LINE_FEED),
            c => c,
        }
    }
}

/// Returns the location of the character that follows `c`, which sits at `loc`
fn advance(loc: &Location, c: Character) -> Location {
    match c {
        Ch(UnicodeChar::LINE_FEED) => Location::new(loc.line + 1, 1, loc.offset + 1),
        Ch(_) => Location::new(loc.line, loc.column + 1, loc.offset + 1),
        StreamEnd => loc.clone(),
    }
}
