//! Seven-segment character encoding
//!
//! Bit layout of a segment mask:
//!
//! ```text
//!  bit:  7   6   5   4   3   2   1   0
//!  seg:  DP  G   F   E   D   C   B   A
//! ```
//!
//! Symbols are case-folded before lookup. Anything outside the table
//! renders blank.

/// Segment A (top)
pub const SEG_A: u8 = 1 << 0;
/// Segment B (upper right)
pub const SEG_B: u8 = 1 << 1;
/// Segment C (lower right)
pub const SEG_C: u8 = 1 << 2;
/// Segment D (bottom)
pub const SEG_D: u8 = 1 << 3;
/// Segment E (lower left)
pub const SEG_E: u8 = 1 << 4;
/// Segment F (upper left)
pub const SEG_F: u8 = 1 << 5;
/// Segment G (middle)
pub const SEG_G: u8 = 1 << 6;
/// Decimal point
pub const SEG_DP: u8 = 1 << 7;

/// All segments off
pub const BLANK: u8 = 0;

/// Blank symbol used for padding
pub const BLANK_SYMBOL: char = ' ';

const GLYPHS: &[(u8, u8)] = &[
    (b'0', 0b0011_1111),
    (b'1', 0b0000_0110),
    (b'2', 0b0101_1011),
    (b'3', 0b0100_1111),
    (b'4', 0b0110_0110),
    (b'5', 0b0110_1101),
    (b'6', 0b0111_1101),
    (b'7', 0b0000_0111),
    (b'8', 0b0111_1111),
    (b'9', 0b0110_1111),
    (b'A', 0b0111_0111),
    (b'B', 0b0111_1100),
    (b'C', 0b0011_1001),
    (b'D', 0b0101_1110),
    (b'E', 0b0111_1001),
    (b'F', 0b0111_0001),
    (b'G', 0b0011_1101),
    (b'H', 0b0111_0110),
    (b'I', 0b0011_0000),
    (b'J', 0b0001_1110),
    (b'K', 0b0111_0110), // same as H
    (b'L', 0b0011_1000),
    (b'M', 0b0001_0101), // approximation
    (b'N', 0b0011_0111),
    (b'O', 0b0011_1111),
    (b'P', 0b0111_0011),
    (b'Q', 0b0110_0111),
    (b'R', 0b0011_0011),
    (b'S', 0b0110_1101),
    (b'T', 0b0111_1000),
    (b'U', 0b0011_1110),
    (b'V', 0b0001_1110), // approximation
    (b'W', 0b0010_1010), // approximation
    (b'X', 0b0111_0110), // same as H
    (b'Y', 0b0110_1110),
    (b'Z', 0b0101_1011), // same as 2
    (b' ', BLANK),
    (b'-', SEG_G),
    (b'_', SEG_D),
    (b'.', SEG_DP),
    (b':', SEG_D | SEG_G),
    (b'=', SEG_D | SEG_G),
    (b'!', SEG_B | SEG_C | SEG_DP),
    (b'?', 0b1101_0011),
    (b'\'', SEG_B),
    (b'"', SEG_B | SEG_F),
    (b'<', SEG_E | SEG_F | SEG_G),
    (b'>', SEG_A | SEG_B | SEG_G),
    (b'[', 0b0011_1001),
    (b']', 0b0000_1111),
    (b'/', SEG_B | SEG_E | SEG_G),
    (b'\\', SEG_C | SEG_F | SEG_G),
];

const fn build_table() -> [u8; 128] {
    let mut table = [BLANK; 128];
    let mut i = 0;
    while i < GLYPHS.len() {
        let (symbol, mask) = GLYPHS[i];
        table[symbol as usize] = mask;
        i += 1;
    }
    table
}

/// ASCII lookup table, indexed by code point
static TABLE: [u8; 128] = build_table();

/// Segment mask for a symbol
///
/// Lowercase letters map to their uppercase glyph. Non-ASCII and
/// unlisted symbols return [`BLANK`].
pub fn encode(symbol: char) -> u8 {
    let folded = symbol.to_ascii_uppercase();
    if folded.is_ascii() {
        TABLE[folded as usize]
    } else {
        BLANK
    }
}

/// True if the symbol has a glyph in the table
pub fn is_supported(symbol: char) -> bool {
    let folded = symbol.to_ascii_uppercase();
    folded == BLANK_SYMBOL || encode(folded) != BLANK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits() {
        assert_eq!(encode('0'), SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F);
        assert_eq!(encode('1'), SEG_B | SEG_C);
        assert_eq!(encode('8'), 0x7F);
    }

    #[test]
    fn test_case_folding() {
        for (lower, upper) in ('a'..='z').zip('A'..='Z') {
            assert_eq!(encode(lower), encode(upper));
        }
    }

    #[test]
    fn test_every_letter_lights_something() {
        for c in 'A'..='Z' {
            assert_ne!(encode(c), BLANK, "{c} is blank");
            assert_eq!(encode(c) & SEG_DP, 0, "{c} uses the dot");
        }
    }

    #[test]
    fn test_unsupported_is_blank() {
        for c in ['+', '*', '#', '@', '$', '%', '&', '~', '\u{7f}', 'é', '€', '\0'] {
            assert_eq!(encode(c), BLANK, "{c:?} should be blank");
            assert!(!is_supported(c));
        }
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(encode('-'), SEG_G);
        assert_eq!(encode('.'), SEG_DP);
        assert_eq!(encode(':'), encode('='));
        assert_eq!(encode('['), encode('C'));
        assert!(is_supported(' '));
    }
}
