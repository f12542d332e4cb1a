use crate::error::{JournalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A highlight color, normalized to lowercase `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or(0)
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl FromStr for Color {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| JournalError::InvalidColor(trimmed.to_string()))?;

        let expanded = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return Err(JournalError::InvalidColor(trimmed.to_string())),
        };
        Ok(Color(format!("#{}", expanded.to_ascii_lowercase())))
    }
}

impl TryFrom<String> for Color {
    type Error = JournalError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named palette entry offered in the highlight toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    pub name: String,
    pub color: Color,
}

impl Swatch {
    pub fn new(name: &str, color: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            color: color.parse()?,
        })
    }
}

/// The fixed set of colors a user may highlight with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    swatches: Vec<Swatch>,
}

impl Palette {
    pub fn new(swatches: Vec<Swatch>) -> Self {
        Self { swatches }
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// Looks up a palette color by swatch name or by hex value.
    pub fn resolve(&self, name_or_hex: &str) -> Result<Color> {
        let wanted = name_or_hex.trim();
        if let Some(swatch) = self
            .swatches
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(wanted))
        {
            return Ok(swatch.color.clone());
        }

        let as_color = wanted.parse::<Color>().ok();
        self.swatches
            .iter()
            .find(|s| Some(&s.color) == as_color.as_ref())
            .map(|s| s.color.clone())
            .ok_or_else(|| JournalError::InvalidColor(wanted.to_string()))
    }
}

impl Default for Palette {
    fn default() -> Self {
        let swatch = |name: &str, hex: &str| Swatch {
            name: name.to_string(),
            color: Color(hex.to_string()),
        };
        Self {
            swatches: vec![
                swatch("yellow", "#fff3a3"),
                swatch("green", "#c8f7c5"),
                swatch("blue", "#cde8ff"),
                swatch("pink", "#ffd6e7"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_short_form() {
        assert_eq!("#FFF3A3".parse::<Color>().unwrap().as_str(), "#fff3a3");
        assert_eq!("#abc".parse::<Color>().unwrap().as_str(), "#aabbcc");
    }

    #[test]
    fn rejects_non_hex_values() {
        assert!("yellow".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#ggghhh".parse::<Color>().is_err());
    }

    #[test]
    fn rgb_components() {
        assert_eq!("#fff3a3".parse::<Color>().unwrap().rgb(), (255, 243, 163));
    }

    #[test]
    fn palette_resolves_names_and_hex() {
        let palette = Palette::default();
        assert_eq!(palette.resolve("Yellow").unwrap().as_str(), "#fff3a3");
        assert_eq!(palette.resolve("#C8F7C5").unwrap().as_str(), "#c8f7c5");
    }

    #[test]
    fn palette_rejects_colors_outside_it() {
        let palette = Palette::default();
        assert!(matches!(
            palette.resolve("#000000"),
            Err(JournalError::InvalidColor(_))
        ));
        assert!(palette.resolve("orange").is_err());
    }

    #[test]
    fn palette_serializes_as_a_list() {
        let json = serde_json::to_string(&Palette::default()).unwrap();
        assert!(json.starts_with("[{\"name\":\"yellow\",\"color\":\"#fff3a3\"}"));
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Palette::default());
    }
}
