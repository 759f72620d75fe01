use std::cell::RefCell;
use std::char::REPLACEMENT_CHARACTER;
use std::fmt::{Debug, Formatter};
use std::io::Read;
use std::{fmt, io};

/// Encoding defines the way the buffer stream is read, as what defines a "character".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Encoding {
    /// Stream is of single byte ASCII chars (0-127). Anything higher is read as `?`
    ASCII,
    /// Stream is of UTF8 characters
    UTF8,
}

/// Defines a single character/element in the stream. Note that characters are not the same as
/// bytes, since a single character can be multiple bytes in UTF8.
///
/// The end of the stream is denoted as a separate element, so it can never be confused with an
/// actual character from the input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Character {
    /// Standard UTF character
    Ch(char),
    /// End of the buffer
    StreamEnd,
}

use Character::*;

/// Converts the given character to a char. The end of stream is converted to 0x0000
impl From<Character> for char {
    fn from(c: Character) -> Self {
        match c {
            Ch(c) => c,
            StreamEnd => '\0',
        }
    }
}

impl Character {
    /// Returns true when the character is an ascii digit
    pub fn is_digit(&self) -> bool {
        matches!(self, Ch(c) if c.is_ascii_digit())
    }

    /// Returns true when the character is an ascii hex digit
    pub fn is_hex_digit(&self) -> bool {
        matches!(self, Ch(c) if c.is_ascii_hexdigit())
    }
}

/// Generic stream trait
pub trait Stream {
    /// Read current character
    fn read(&self) -> Character;
    /// Read current character and advance to next
    fn read_and_next(&self) -> Character;
    /// Advance with 1 character
    fn next(&self);
    /// Resets the stream back to the start position
    fn reset_stream(&self);
}

pub struct ByteStream {
    /// Actual buffer stream in u8 bytes
    buffer: Vec<u8>,
    /// Current position in the stream
    buffer_pos: RefCell<usize>,
    /// Current encoding
    encoding: Encoding,
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new(Encoding::UTF8)
    }
}

/// Creates a UTF8 stream that holds the given string
impl From<&str> for ByteStream {
    fn from(s: &str) -> Self {
        let mut stream = Self::new(Encoding::UTF8);
        stream.read_from_str(s);
        stream
    }
}

impl Stream for ByteStream {
    /// Read the current character
    fn read(&self) -> Character {
        let (ch, _) = self.read_with_length();
        ch
    }

    /// Read a character and advance to the next
    fn read_and_next(&self) -> Character {
        let (ch, len) = self.read_with_length();

        let mut pos = self.buffer_pos.borrow_mut();
        *pos += len;

        ch
    }

    fn next(&self) {
        let (_, len) = self.read_with_length();
        *self.buffer_pos.borrow_mut() += len;
    }

    /// Resets the stream to the first character of the stream
    fn reset_stream(&self) {
        *self.buffer_pos.borrow_mut() = 0;
    }
}

impl ByteStream {
    /// Create a new empty input stream
    #[must_use]
    pub fn new(encoding: Encoding) -> Self {
        Self {
            buffer: Vec::new(),
            buffer_pos: RefCell::new(0),
            encoding,
        }
    }

    // Read the character and return it together with the number of bytes the character took
    fn read_with_length(&self) -> (Character, usize) {
        let pos = *self.buffer_pos.borrow();
        if pos >= self.buffer.len() {
            return (StreamEnd, 0);
        }

        match self.encoding {
            Encoding::ASCII => {
                let byte = self.buffer[pos];
                if byte > 0x7F {
                    (Ch('?'), 1)
                } else {
                    (Ch(char::from(byte)), 1)
                }
            }
            Encoding::UTF8 => {
                let width = utf8_char_width(self.buffer[pos]);
                let end = pos + width;
                if end > self.buffer.len() {
                    // Truncated sequence at the end of the buffer
                    return (Ch(REPLACEMENT_CHARACTER), 1);
                }

                match std::str::from_utf8(&self.buffer[pos..end]) {
                    Ok(s) => match s.chars().next() {
                        Some(c) => (Ch(c), width),
                        None => (Ch(REPLACEMENT_CHARACTER), 1),
                    },
                    Err(_) => (Ch(REPLACEMENT_CHARACTER), 1),
                }
            }
        }
    }

    /// Populates the current buffer with the contents of given reader
    pub fn read_from_file(&mut self, mut f: impl Read) -> io::Result<()> {
        self.buffer.clear();
        f.read_to_end(&mut self.buffer)?;
        self.reset_stream();
        Ok(())
    }

    /// Populates the current buffer with the contents of the given string s
    pub fn read_from_str(&mut self, s: &str) {
        self.buffer = Vec::from(s.as_bytes());
        self.reset_stream();
    }

    #[cfg(test)]
    fn chars_left(&self) -> usize {
        self.buffer.len() - *self.buffer_pos.borrow()
    }
}

/// Location holds the start position of the given element in the data source
#[derive(Clone, PartialEq)]
pub struct Location {
    /// Line number, starting with 1
    pub line: usize,
    /// Column number, starting with 1
    pub column: usize,
    /// Character offset, starting with 0
    pub offset: usize,
}

impl Default for Location {
    /// Default to line 1, column 1
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl Location {
    /// Create a new Location
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Debug for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.line, self.column)
    }
}

/// Returns the width of the given UTF8 character, which is based on the first byte
#[inline]
fn utf8_char_width(first_byte: u8) -> usize {
    if first_byte < 0x80 {
        1
    } else {
        2 + usize::from(first_byte >= 0xE0) + usize::from(first_byte >= 0xF0)
    }
}
