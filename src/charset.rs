//! Byte classification for the tokenizer
//!
//! Every byte value is classified once, at compile time, into a set of
//! flags. The tokenizer dispatches on the first byte of a lexeme through
//! this table instead of chained comparisons.

/// Bitfield flags for byte classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterFlags(u8);

impl CharacterFlags {
    /// `(`, `[` and `{`
    pub const OPEN_BRACKET: Self = Self(1 << 0);
    /// `)`, `]` and `}`
    pub const CLOSE_BRACKET: Self = Self(1 << 1);
    /// `,`, `;` and `:`
    pub const SEPARATOR: Self = Self(1 << 2);
    /// Bytes that can start a keyword (ASCII letters and underscore)
    pub const KEYWORD_START: Self = Self(1 << 3);
    /// Bytes that can continue a keyword (ASCII letters, digits, underscore)
    pub const KEYWORD: Self = Self(1 << 4);
    /// ASCII decimal digits
    pub const DIGIT: Self = Self(1 << 5);
    /// C-locale whitespace: space, tab, newline, vertical tab, form feed, carriage return
    pub const WHITESPACE: Self = Self(1 << 6);
    /// String delimiters `'` and `"`
    pub const QUOTE: Self = Self(1 << 7);

    /// Creates empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Checks if any of the given flags are set
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns the union of two flag sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns true if no flags are set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for CharacterFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Byte lookup table for O(1) classification
#[derive(Debug, Clone)]
pub struct CharacterTable([CharacterFlags; 256]);

impl CharacterTable {
    /// Creates a new table with compile-time initialization
    pub const fn new() -> Self {
        let mut table = [CharacterFlags::empty(); 256];
        let mut i = 0;

        while i < 256 {
            let ch = i as u8;
            let mut flags = CharacterFlags::empty();

            match ch {
                b'(' | b'[' | b'{' => flags = flags.union(CharacterFlags::OPEN_BRACKET),
                b')' | b']' | b'}' => flags = flags.union(CharacterFlags::CLOSE_BRACKET),
                b',' | b';' | b':' => flags = flags.union(CharacterFlags::SEPARATOR),
                b'\'' | b'"' => flags = flags.union(CharacterFlags::QUOTE),
                b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r' => {
                    flags = flags.union(CharacterFlags::WHITESPACE)
                }
                _ => {}
            }

            match ch {
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                    flags = flags.union(CharacterFlags::KEYWORD_START);
                    flags = flags.union(CharacterFlags::KEYWORD);
                }
                b'0'..=b'9' => {
                    flags = flags.union(CharacterFlags::DIGIT);
                    flags = flags.union(CharacterFlags::KEYWORD);
                }
                _ => {}
            }

            table[i] = flags;
            i += 1;
        }

        Self(table)
    }

    /// Tests if a byte has any of the given flags
    #[inline(always)]
    pub const fn test_character(&self, ch: u8, flags: CharacterFlags) -> bool {
        self.0[ch as usize].intersects(flags)
    }

    /// Returns the flags for a byte
    #[inline(always)]
    pub const fn get_flags(&self, ch: u8) -> CharacterFlags {
        self.0[ch as usize]
    }

    #[inline(always)]
    pub const fn is_open_bracket(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::OPEN_BRACKET)
    }

    #[inline(always)]
    pub const fn is_close_bracket(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::CLOSE_BRACKET)
    }

    #[inline(always)]
    pub const fn is_separator(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::SEPARATOR)
    }

    #[inline(always)]
    pub const fn is_keyword_start(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::KEYWORD_START)
    }

    #[inline(always)]
    pub const fn is_keyword_char(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::KEYWORD)
    }

    #[inline(always)]
    pub const fn is_digit(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::DIGIT)
    }

    #[inline(always)]
    pub const fn is_whitespace(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::WHITESPACE)
    }

    #[inline(always)]
    pub const fn is_quote(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::QUOTE)
    }
}

impl Default for CharacterTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Global table instance
pub static CHARACTER_TABLE: CharacterTable = CharacterTable::new();
