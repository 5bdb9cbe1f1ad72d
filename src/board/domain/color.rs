//! Hex colour values used by projects and tags.

use super::BoardDomainError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Colours offered when composing a project.
pub const PROJECT_PALETTE: [&str; 10] = [
    "#3b82f6", "#10b981", "#8b5cf6", "#f59e0b", "#ef4444", "#ec4899", "#6366f1", "#14b8a6",
    "#f97316", "#8b5cf6",
];

const DEFAULT_ACCENT: &str = "#3b82f6";
const MAX_RGB: u32 = 0x00FF_FFFF;

/// Lower-case `#rgb` or `#rrggbb` colour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parses a hex colour.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidColor`] unless the value is `#`
    /// followed by three or six hex digits.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or_default();
        let is_valid = matches!(digits.len(), 3 | 6)
            && trimmed.starts_with('#')
            && digits.chars().all(|ch| ch.is_ascii_hexdigit());
        if !is_valid {
            return Err(BoardDomainError::InvalidColor(raw));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Builds a colour from a packed `0xRRGGBB` value.
    ///
    /// Bits above the low 24 are ignored.
    #[must_use]
    pub fn from_rgb(rgb: u32) -> Self {
        Self(format!("#{:06x}", rgb & MAX_RGB))
    }

    /// Samples a colour uniformly from the 24-bit RGB space.
    #[must_use]
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::from_rgb(rng.random_range(0..=MAX_RGB))
    }

    /// Returns the colour as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self(DEFAULT_ACCENT.to_owned())
    }
}

impl TryFrom<String> for HexColor {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
