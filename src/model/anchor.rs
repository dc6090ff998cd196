// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use super::AnchorId;

/// Global vertical translation (in percent) applied to every anchor.
pub const TOP_SHIFT: f64 = 0.0;
/// Global horizontal translation (in percent) applied to every anchor.
pub const LEFT_SHIFT: f64 = 0.0;

/// A 24-bit colour as declared in diagram data (`#rrggbb`, `#rgb`, `black` or `white`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse(value: &str) -> Result<Self, ColorError> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "black" => return Ok(Self::BLACK),
            "white" => return Ok(Self::WHITE),
            _ => {}
        }

        let invalid = || ColorError {
            value: value.to_owned(),
        };
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // `#abc` expands to `#aabbcc`.
                let expand = |idx: usize| channel(&hex[idx..idx + 1]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorError {
    value: String,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid colour {:?} (expected #rrggbb, #rgb, black or white)", self.value)
    }
}

impl std::error::Error for ColorError {}

/// A named, positioned, styled vertex of the pipeline diagram.
///
/// Offsets are percentages of the board measured from its top-left corner. Anchor nodes are
/// immutable once declared.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorNode {
    id: AnchorId,
    label: String,
    text_color: Rgb,
    background_color: Rgb,
    top_percent: f64,
    left_percent: f64,
}

impl AnchorNode {
    pub fn new(
        id: AnchorId,
        label: impl Into<String>,
        text_color: Rgb,
        background_color: Rgb,
        top_percent: f64,
        left_percent: f64,
    ) -> Result<Self, AnchorError> {
        check_percent(&id, OffsetAxis::Top, top_percent)?;
        check_percent(&id, OffsetAxis::Left, left_percent)?;
        Ok(Self {
            id,
            label: label.into(),
            text_color,
            background_color,
            top_percent,
            left_percent,
        })
    }

    pub fn id(&self) -> &AnchorId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text_color(&self) -> Rgb {
        self.text_color
    }

    pub fn background_color(&self) -> Rgb {
        self.background_color
    }

    pub fn top_percent(&self) -> f64 {
        self.top_percent
    }

    pub fn left_percent(&self) -> f64 {
        self.left_percent
    }

    /// Top offset including the global shift, clamped to the board.
    pub fn effective_top_percent(&self) -> f64 {
        (self.top_percent + TOP_SHIFT).clamp(0.0, 100.0)
    }

    /// Left offset including the global shift, clamped to the board.
    pub fn effective_left_percent(&self) -> f64 {
        (self.left_percent + LEFT_SHIFT).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetAxis {
    Top,
    Left,
}

impl fmt::Display for OffsetAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Left => f.write_str("left"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnchorError {
    OffsetOutOfRange {
        anchor_id: AnchorId,
        axis: OffsetAxis,
        value: f64,
    },
}

impl fmt::Display for AnchorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffsetOutOfRange {
                anchor_id,
                axis,
                value,
            } => write!(
                f,
                "anchor {anchor_id}: {axis} offset {value} is outside 0..=100 percent"
            ),
        }
    }
}

impl std::error::Error for AnchorError {}

fn check_percent(anchor_id: &AnchorId, axis: OffsetAxis, value: f64) -> Result<(), AnchorError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        return Ok(());
    }
    Err(AnchorError::OffsetOutOfRange {
        anchor_id: anchor_id.clone(),
        axis,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::{AnchorError, AnchorNode, OffsetAxis, Rgb};
    use crate::model::AnchorId;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgb::parse("#2255aa").unwrap(), Rgb::new(0x22, 0x55, 0xaa));
        assert_eq!(Rgb::parse("#25a").unwrap(), Rgb::new(0x22, 0x55, 0xaa));
        assert_eq!(Rgb::parse("White").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn rejects_malformed_colours() {
        for bad in ["", "#", "#12", "#12345g", "2255aa", "#2255aa00"] {
            assert!(Rgb::parse(bad).is_err(), "expected {bad:?} to be rejected");
        }
    }

    #[test]
    fn displays_as_lowercase_hex() {
        assert_eq!(Rgb::new(255, 8, 171).to_string(), "#ff08ab");
    }

    #[test]
    fn rejects_offsets_outside_the_board() {
        let err = AnchorNode::new(
            AnchorId::new("a").unwrap(),
            "A",
            Rgb::BLACK,
            Rgb::WHITE,
            120.0,
            10.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnchorError::OffsetOutOfRange {
                axis: OffsetAxis::Top,
                ..
            }
        ));

        let err =
            AnchorNode::new(AnchorId::new("a").unwrap(), "A", Rgb::BLACK, Rgb::WHITE, 0.0, f64::NAN)
                .unwrap_err();
        assert!(matches!(
            err,
            AnchorError::OffsetOutOfRange {
                axis: OffsetAxis::Left,
                ..
            }
        ));
    }
}
