//! Glitch text and flash messages

use crate::buffer::DisplayText;
use crate::traits::RandomSource;

/// Symbols a glitch frame draws from
///
/// Several of these have no glyph and render blank, which is part of the
/// effect.
pub const GLITCH_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-=+*#@$%&!?";

/// Chance (percent) that a glitch position shows a symbol rather than a gap
pub const GLITCH_FILL_PERCENT: u32 = 70;

/// Messages shown during a flash, each exactly eight characters
pub const MESSAGES: [&str; 14] = [
    "COMRADE ", "SOVIET  ", "MARX    ", "LENIN   ", "STALIN  ", "WORKERS ", "UNITE   ",
    "POWER   ", "PARTY   ", "STATE   ", "RED DAWN", "FOR USSR", "GO RED  ", "OUR LAND",
];

/// One frame of glitch noise, `width` characters long
pub fn glitch_text<R: RandomSource>(rng: &mut R, width: usize) -> DisplayText {
    let mut text = DisplayText::new();
    for _ in 0..width {
        let symbol = if rng.chance_percent(GLITCH_FILL_PERCENT) {
            let index = rng.range(0, GLITCH_CHARSET.len() as u32) as usize;
            GLITCH_CHARSET[index] as char
        } else {
            ' '
        };
        if text.push(symbol).is_err() {
            break;
        }
    }
    text
}

/// Pick a flash message at random
pub fn pick_message<R: RandomSource>(rng: &mut R) -> &'static str {
    MESSAGES[rng.range(0, MESSAGES.len() as u32) as usize]
}
