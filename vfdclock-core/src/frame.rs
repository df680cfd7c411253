//! Pin map and 24-bit frame packing for the MAX6921 driver
//!
//! The driver has 24 outputs, OUT0 to OUT23. Any output can be wired to a
//! digit grid or a segment anode, so the board wiring is described by a
//! [`PinMap`]: one output index per digit and one per segment.
//!
//! A frame is shifted out as three bytes, OUT23 first. Output `p` lands in
//! byte `(23 - p) / 8` at bit `7 - (23 - p) % 8`. The pin map turns every
//! configured output into its frame mask once at construction, so packing a
//! frame is a handful of ORs.

use heapless::Vec;

/// Number of driver outputs
pub const OUTPUT_COUNT: u8 = 24;

/// Maximum supported digit positions
pub const MAX_DIGITS: usize = 12;

/// Maximum supported segment lines (A-G plus DP)
pub const MAX_SEGMENTS: usize = 8;

/// Errors in a pin map description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMapError {
    /// Output index above 23
    OutputOutOfRange(u8),
    /// Same output assigned twice
    DuplicateOutput(u8),
    /// No digit positions configured
    NoDigits,
}

/// One multiplexing instant: the 24 driver outputs
///
/// Bit `p` of the inner value is driver output `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame(u32);

impl Frame {
    /// Every output off
    pub const EMPTY: Frame = Frame(0);

    /// Wire byte and bit for an output index
    ///
    /// Returns `(byte, bit)` where byte 0 is shifted out first, or `None`
    /// past the last output.
    pub const fn physical_position(output: u8) -> Option<(usize, u8)> {
        if output >= OUTPUT_COUNT {
            return None;
        }
        let true_order = (OUTPUT_COUNT - 1 - output) as usize;
        Some((true_order / 8, 7 - (true_order % 8) as u8))
    }

    /// Mask for a single output, built through the wire layout
    const fn output_mask(output: u8) -> u32 {
        match Self::physical_position(output) {
            Some((byte, bit)) => (1u32 << bit) << (8 * (2 - byte)),
            None => 0,
        }
    }

    /// Raw 24-bit value
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build a frame from raw bits (upper byte ignored)
    pub const fn from_bits(bits: u32) -> Self {
        Frame(bits & 0x00FF_FFFF)
    }

    /// Wire bytes in transmit order
    pub const fn to_bytes(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// True if the given output is driven
    pub const fn is_output_set(self, output: u8) -> bool {
        self.0 & Self::output_mask(output) != 0
    }

    /// Digit positions whose grid output is set
    pub fn active_digits(self, pins: &PinMap) -> Vec<usize, MAX_DIGITS> {
        pins.digit_masks
            .iter()
            .enumerate()
            .filter(|(_, &mask)| self.0 & mask != 0)
            .map(|(index, _)| index)
            .collect()
    }

    /// Segment mask recovered from the segment outputs
    pub fn segments(self, pins: &PinMap) -> u8 {
        pins.segment_masks
            .iter()
            .enumerate()
            .filter(|(_, &mask)| self.0 & mask != 0)
            .fold(0u8, |acc, (index, _)| acc | (1 << index))
    }
}

/// Driver output assignment for digits and segments
///
/// Digit order is physical grid order as wired; segment order is A-G then DP,
/// matching the bit order of [`crate::segment`] masks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    digit_pins: Vec<u8, MAX_DIGITS>,
    segment_pins: Vec<u8, MAX_SEGMENTS>,
    digit_masks: Vec<u32, MAX_DIGITS>,
    segment_masks: Vec<u32, MAX_SEGMENTS>,
}

impl PinMap {
    /// Build a pin map from output indices
    ///
    /// Lists longer than [`MAX_DIGITS`] / [`MAX_SEGMENTS`] are truncated.
    /// Indices above 23 and outputs used twice are rejected.
    pub fn new(digit_pins: &[u8], segment_pins: &[u8]) -> Result<Self, PinMapError> {
        let digits = &digit_pins[..digit_pins.len().min(MAX_DIGITS)];
        let segments = &segment_pins[..segment_pins.len().min(MAX_SEGMENTS)];

        if digits.is_empty() {
            return Err(PinMapError::NoDigits);
        }

        let mut seen = 0u32;
        for &output in digits.iter().chain(segments) {
            if output >= OUTPUT_COUNT {
                return Err(PinMapError::OutputOutOfRange(output));
            }
            let bit = 1u32 << output;
            if seen & bit != 0 {
                return Err(PinMapError::DuplicateOutput(output));
            }
            seen |= bit;
        }

        Ok(Self::build(digits, segments))
    }

    /// Construct from lists that are already validated and within capacity
    fn build(digits: &[u8], segments: &[u8]) -> Self {
        let mut map = Self {
            digit_pins: Vec::new(),
            segment_pins: Vec::new(),
            digit_masks: Vec::new(),
            segment_masks: Vec::new(),
        };
        for &output in digits.iter().take(MAX_DIGITS) {
            let _ = map.digit_pins.push(output);
            let _ = map.digit_masks.push(Frame::output_mask(output));
        }
        for &output in segments.iter().take(MAX_SEGMENTS) {
            let _ = map.segment_pins.push(output);
            let _ = map.segment_masks.push(Frame::output_mask(output));
        }
        map
    }

    /// IV-21 tube on the MAX6921 adapter board
    ///
    /// Eight character grids; the symbol grid (OUT10) is not driven.
    pub fn iv21() -> Self {
        Self::build(&IV21_DIGIT_PINS, &IV21_SEGMENT_PINS)
    }

    /// Number of digit positions
    pub fn digit_count(&self) -> usize {
        self.digit_pins.len()
    }

    /// Number of segment lines
    pub fn segment_count(&self) -> usize {
        self.segment_pins.len()
    }

    /// Configured digit outputs
    pub fn digit_pins(&self) -> &[u8] {
        &self.digit_pins
    }

    /// Configured segment outputs
    pub fn segment_pins(&self) -> &[u8] {
        &self.segment_pins
    }

    /// Pack one digit and its segments into a frame
    ///
    /// A digit index outside the map leaves every grid output off, so
    /// nothing lights. Segment bits beyond the configured lines are ignored.
    pub fn pack(&self, digit: usize, segments: u8) -> Frame {
        let grid = self.digit_masks.get(digit).copied().unwrap_or(0);

        let anodes = self
            .segment_masks
            .iter()
            .enumerate()
            .filter(|(index, _)| segments & (1 << index) != 0)
            .fold(0u32, |acc, (_, &mask)| acc | mask);

        Frame(grid | anodes)
    }
}

/// MAX6921 outputs wired to IV-21 grids, in physical digit order
pub const IV21_DIGIT_PINS: [u8; 8] = [
    15, // grid of digit 8
    1,  // digit 7
    13, // digit 6
    2,  // digit 5
    14, // digit 4
    0,  // digit 3
    12, // digit 2
    11, // digit 1
];

/// MAX6921 outputs wired to IV-21 anodes, A-G then DP
pub const IV21_SEGMENT_PINS: [u8; 8] = [16, 8, 5, 3, 6, 9, 7, 4];
