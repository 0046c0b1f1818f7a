//! Character ramps used to quantize intensity into text.

use std::fmt;

use asciify_core::config::DEFAULT_PALETTE;

use crate::error::{ImagingError, Result};

/// An ordered, non-empty ramp of characters, darkest-mapped first.
///
/// Construction is the only place emptiness is checked; every `Palette`
/// value in circulation has at least one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<char>);

impl Palette {
    /// Build a palette from `chars` exactly as given (no trimming).
    pub fn new(chars: &str) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(ImagingError::EmptyPalette);
        }
        Ok(Self(chars))
    }

    /// Build a palette from free-form chat input.
    ///
    /// Surrounding whitespace is trimmed and control characters (newlines,
    /// tabs) are dropped, since they would break the row structure of the
    /// rendered block. Blank input is `EmptyPalette`.
    pub fn from_user_input(text: &str) -> Result<Self> {
        let cleaned: String = text.trim().chars().filter(|c| !c.is_control()).collect();
        Self::new(&cleaned)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }

    /// Index selected for an 8-bit intensity: `floor(p * L / 256)`, clamped to `L - 1`.
    pub fn index_for(&self, intensity: u8) -> usize {
        let len = self.0.len();
        (usize::from(intensity) * len / 256).min(len - 1)
    }

    pub fn char_for(&self, intensity: u8) -> char {
        self.0[self.index_for(intensity)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_PALETTE.chars().collect())
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
