//! Per-request processing parameters.
//!
//! All settings deserialize from the camelCase JSON the editor sends and
//! fall back to their defaults field by field. Out-of-range values are
//! clamped by [`clamped`](EffectSettings::clamped) rather than rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::rendering::Stylization;

/// Color separation controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SeparationSettings {
    /// Hue rotation in degrees (0-360)
    pub hue: f32,
    /// Saturation in percent (0-200)
    pub saturation: f32,
    /// Contrast in percent (0-200)
    pub contrast: f32,
    /// Brightness in percent (0-200)
    pub brightness: f32,
}

impl Default for SeparationSettings {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 100.0,
            contrast: 100.0,
            brightness: 100.0,
        }
    }
}

impl SeparationSettings {
    pub fn adjustment(&self) -> raster_fx::ColorAdjustment {
        raster_fx::ColorAdjustment::new(self.hue, self.saturation, self.contrast, self.brightness)
    }
}

/// Stylization controls shared by all effect tools
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectSettings {
    /// Effect strength in percent (1-100)
    pub intensity: f32,
    /// Cell, dot or line spacing in pixels (3-50)
    pub scale: f32,
    /// Screen angle in degrees (0-90); carried but not applied
    pub angle: f32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            intensity: 50.0,
            scale: 6.0,
            angle: 45.0,
        }
    }
}

impl EffectSettings {
    /// Copy with every field clamped into its documented range.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        Self {
            intensity: clamp_or(self.intensity, 1.0, 100.0, defaults.intensity),
            scale: clamp_or(self.scale, 3.0, 50.0, defaults.scale),
            angle: clamp_or(self.angle, 0.0, 90.0, defaults.angle),
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// Integer enlargement applied before stylization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum UpscaleFactor {
    #[default]
    X1,
    X2,
    X4,
}

impl UpscaleFactor {
    pub fn get(self) -> u32 {
        match self {
            UpscaleFactor::X1 => 1,
            UpscaleFactor::X2 => 2,
            UpscaleFactor::X4 => 4,
        }
    }

    pub fn as_f32(self) -> f32 {
        self.get() as f32
    }
}

impl TryFrom<u32> for UpscaleFactor {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(UpscaleFactor::X1),
            2 => Ok(UpscaleFactor::X2),
            4 => Ok(UpscaleFactor::X4),
            other => Err(format!("upscale must be 1, 2 or 4, got {other}")),
        }
    }
}

impl From<UpscaleFactor> for u32 {
    fn from(f: UpscaleFactor) -> Self {
        f.get()
    }
}

/// Enlargement and matting controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EnhanceSettings {
    /// Upscale factor: 1, 2 or 4
    #[schema(value_type = u32, example = 1)]
    pub upscale: UpscaleFactor,
    /// Clear pixels matching the top-left corner color
    pub remove_bg: bool,
}

impl Default for EnhanceSettings {
    fn default() -> Self {
        Self {
            upscale: UpscaleFactor::X1,
            remove_bg: true,
        }
    }
}

/// Editor tool that requested processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Move,
    Pen,
    Print,
    Enhance,
    #[default]
    Separation,
    Halftone,
    Stippling,
    Dithering,
    Grain,
    Engraving,
}

impl Tool {
    pub const ALL: [Tool; 10] = [
        Tool::Move,
        Tool::Pen,
        Tool::Print,
        Tool::Enhance,
        Tool::Separation,
        Tool::Halftone,
        Tool::Stippling,
        Tool::Dithering,
        Tool::Grain,
        Tool::Engraving,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Move => "move",
            Tool::Pen => "pen",
            Tool::Print => "print",
            Tool::Enhance => "enhance",
            Tool::Separation => "separation",
            Tool::Halftone => "halftone",
            Tool::Stippling => "stippling",
            Tool::Dithering => "dithering",
            Tool::Grain => "grain",
            Tool::Engraving => "engraving",
        }
    }

    /// The stylization this tool applies, if any.
    pub fn stylization(self) -> Option<Stylization> {
        match self {
            Tool::Halftone => Some(Stylization::Halftone),
            Tool::Stippling => Some(Stylization::Stippling),
            Tool::Dithering => Some(Stylization::Dithering),
            Tool::Grain => Some(Stylization::Grain),
            Tool::Engraving => Some(Stylization::Engraving),
            Tool::Move | Tool::Pen | Tool::Print | Tool::Enhance | Tool::Separation => None,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tool '{s}'"))
    }
}
