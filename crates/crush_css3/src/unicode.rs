// Code points the tokenizer checks for by value

#[allow(clippy::module_name_repetitions)]
pub struct UnicodeChar;

impl UnicodeChar {
    pub const NULL: char = '\u{0000}';
    pub const BACKSPACE: char = '\u{0008}';
    pub const TAB: char = '\u{0009}';
    pub const LINE_FEED: char = '\u{000A}';
    pub const LINE_TABULATION: char = '\u{000B}';
    pub const FORM_FEED: char = '\u{000C}';
    pub const CARRIAGE_RETURN: char = '\u{000D}';
    pub const SHIFT_OUT: char = '\u{000E}';
    pub const INFORMATION_SEPARATOR_ONE: char = '\u{001F}';
    pub const SPACE: char = '\u{0020}';
    pub const DELETE: char = '\u{007F}';
    pub const CONTROL: char = '\u{0080}';
    pub const MAX_ALLOWED: u32 = 0x10FFFF;
    pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';
}
