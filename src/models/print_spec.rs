use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Centimetres per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Source aspect (height / width) assumed when no image is known yet
pub const DEFAULT_ASPECT: f32 = 1.2;

/// Garment size, which sets the default print width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShirtSize {
    S,
    #[default]
    M,
    L,
    Xl,
    Xxl,
    Xxxl,
}

impl ShirtSize {
    pub const ALL: [ShirtSize; 6] = [
        ShirtSize::S,
        ShirtSize::M,
        ShirtSize::L,
        ShirtSize::Xl,
        ShirtSize::Xxl,
        ShirtSize::Xxxl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShirtSize::S => "S",
            ShirtSize::M => "M",
            ShirtSize::L => "L",
            ShirtSize::Xl => "XL",
            ShirtSize::Xxl => "XXL",
            ShirtSize::Xxxl => "XXXL",
        }
    }

    /// Preset print width for a full-size placement
    pub fn default_width_cm(self) -> f32 {
        match self {
            ShirtSize::S => 24.0,
            ShirtSize::M => 28.0,
            ShirtSize::L => 30.0,
            ShirtSize::Xl => 32.0,
            ShirtSize::Xxl => 34.0,
            ShirtSize::Xxxl => 36.0,
        }
    }
}

impl fmt::Display for ShirtSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShirtSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShirtSize::ALL
            .iter()
            .copied()
            .find(|size| size.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown shirt size '{s}'"))
    }
}

/// Placement of the print on the garment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrintLocation {
    #[default]
    FrontCenter,
    FrontPocket,
    BackCenter,
    BackNeck,
}

impl PrintLocation {
    pub const ALL: [PrintLocation; 4] = [
        PrintLocation::FrontCenter,
        PrintLocation::FrontPocket,
        PrintLocation::BackCenter,
        PrintLocation::BackNeck,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrintLocation::FrontCenter => "front_center",
            PrintLocation::FrontPocket => "front_pocket",
            PrintLocation::BackCenter => "back_center",
            PrintLocation::BackNeck => "back_neck",
        }
    }

    /// Small placements print at a fixed width regardless of garment size
    pub fn width_override_cm(self) -> Option<f32> {
        match self {
            PrintLocation::FrontPocket | PrintLocation::BackNeck => Some(10.0),
            PrintLocation::FrontCenter | PrintLocation::BackCenter => None,
        }
    }
}

impl fmt::Display for PrintLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrintLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrintLocation::ALL
            .iter()
            .copied()
            .find(|loc| loc.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown print location '{s}'"))
    }
}

/// Preset width for a size and placement
pub fn preset_width_cm(size: ShirtSize, location: PrintLocation) -> f32 {
    location
        .width_override_cm()
        .unwrap_or_else(|| size.default_width_cm())
}

/// Physical print parameters
///
/// `width_cm` follows the garment preset whenever the size or location is
/// changed through the setters; [`set_width_cm`](Self::set_width_cm)
/// overrides it until the next such change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintSpec {
    pub shirt_size: ShirtSize,
    pub location: PrintLocation,
    pub width_cm: f32,
    /// Advisory only; the pixel height always follows the source aspect
    #[serde(default)]
    pub height_cm: f32,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_dpi() -> u32 {
    300
}

impl Default for PrintSpec {
    fn default() -> Self {
        Self::new(ShirtSize::default(), PrintLocation::default())
    }
}

impl PrintSpec {
    /// Spec at the preset width for the given size and placement
    pub fn new(shirt_size: ShirtSize, location: PrintLocation) -> Self {
        let width_cm = preset_width_cm(shirt_size, location);
        Self {
            shirt_size,
            location,
            width_cm,
            height_cm: advisory_height_cm(width_cm, DEFAULT_ASPECT),
            dpi: default_dpi(),
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Change garment size and re-apply the preset width
    pub fn set_shirt_size(&mut self, size: ShirtSize) {
        self.shirt_size = size;
        self.apply_preset();
    }

    /// Change placement and re-apply the preset width
    pub fn set_location(&mut self, location: PrintLocation) {
        self.location = location;
        self.apply_preset();
    }

    /// Manual width override
    pub fn set_width_cm(&mut self, width_cm: f32) {
        self.width_cm = width_cm;
    }

    fn apply_preset(&mut self) {
        self.width_cm = preset_width_cm(self.shirt_size, self.location);
    }

    /// `round(width_cm / 2.54 * dpi)`
    pub fn width_px(&self) -> u32 {
        (self.width_cm as f64 / CM_PER_INCH * self.dpi as f64).round() as u32
    }

    /// Pixel height preserving the source aspect ratio
    pub fn height_px(&self, src_width: u32, src_height: u32) -> u32 {
        if src_width == 0 {
            return 0;
        }
        (self.width_px() as f64 * src_height as f64 / src_width as f64).round() as u32
    }

    /// `DTF_Print_{size}_{location}_{widthCm}cm_{dpi}DPI.png`
    pub fn filename(&self) -> String {
        format!(
            "DTF_Print_{}_{}_{}cm_{}DPI.png",
            self.shirt_size, self.location, self.width_cm, self.dpi
        )
    }

    /// Layout for a source of known or assumed aspect (height / width)
    pub fn layout(&self, aspect: Option<f32>, quality_warning_px: u32) -> PrintLayout {
        let aspect = aspect
            .filter(|a| a.is_finite() && *a > 0.0)
            .unwrap_or(DEFAULT_ASPECT);
        let width_px = self.width_px();
        PrintLayout {
            width_cm: self.width_cm,
            height_cm: advisory_height_cm(self.width_cm, aspect),
            width_px,
            height_px: (width_px as f32 * aspect).round() as u32,
            dpi: self.dpi,
            quality_warning: width_px > quality_warning_px,
            filename: self.filename(),
        }
    }
}

/// `width_cm * aspect` rounded to one decimal
pub fn advisory_height_cm(width_cm: f32, aspect: f32) -> f32 {
    (width_cm * aspect * 10.0).round() / 10.0
}

/// Computed physical and pixel layout of a print
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintLayout {
    pub width_cm: f32,
    pub height_cm: f32,
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
    /// Set when the export is large enough that upsampling artifacts may show
    pub quality_warning: bool,
    pub filename: String,
}
