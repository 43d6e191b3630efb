//! Stylization dispatch.
//!
//! Exactly one stylization runs per invocation. Halftone, stippling and
//! engraving paint onto a fresh transparent canvas by sampling the
//! adjusted source; dithering and grain rewrite the source in place.

use rand::RngCore;
use raster_fx::PixelBuffer;
use serde::{Deserialize, Serialize};

use super::{dither::Dithering, engraving::Engraving, grain::Grain, halftone::Halftone, stippling::Stippling};
use crate::error::ProcessingError;
use crate::models::EffectSettings;

/// Inputs shared by every stylizer.
#[derive(Debug, Clone, Copy)]
pub struct StyleParams {
    /// Effect controls, already clamped
    pub effect: EffectSettings,
    /// Upscale factor the buffer was enlarged by (1, 2 or 4)
    pub upscale: f32,
}

impl StyleParams {
    pub fn new(effect: EffectSettings, upscale: f32) -> Self {
        Self {
            effect: effect.clamped(),
            upscale: upscale.max(1.0),
        }
    }
}

/// A raster effect that turns an adjusted buffer into a stylized one.
pub trait Stylize {
    fn stylize(
        &self,
        buffer: PixelBuffer,
        params: &StyleParams,
        rng: &mut dyn RngCore,
    ) -> Result<PixelBuffer, ProcessingError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stylization {
    Halftone,
    Stippling,
    Engraving,
    Dithering,
    Grain,
}

impl Stylization {
    pub fn as_str(self) -> &'static str {
        match self {
            Stylization::Halftone => "halftone",
            Stylization::Stippling => "stippling",
            Stylization::Engraving => "engraving",
            Stylization::Dithering => "dithering",
            Stylization::Grain => "grain",
        }
    }

    /// Whether output depends on the random source.
    pub fn is_stochastic(self) -> bool {
        matches!(self, Stylization::Stippling | Stylization::Grain)
    }

    pub fn apply(
        self,
        buffer: PixelBuffer,
        params: &StyleParams,
        rng: &mut dyn RngCore,
    ) -> Result<PixelBuffer, ProcessingError> {
        match self {
            Stylization::Halftone => Halftone.stylize(buffer, params, rng),
            Stylization::Stippling => Stippling.stylize(buffer, params, rng),
            Stylization::Engraving => Engraving.stylize(buffer, params, rng),
            Stylization::Dithering => Dithering.stylize(buffer, params, rng),
            Stylization::Grain => Grain.stylize(buffer, params, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_params_clamp_effect() {
        let params = StyleParams::new(
            EffectSettings {
                intensity: 0.0,
                scale: 1.0,
                angle: 200.0,
            },
            0.0,
        );
        assert_eq!(params.effect.intensity, 1.0);
        assert_eq!(params.effect.scale, 3.0);
        assert_eq!(params.effect.angle, 90.0);
        assert_eq!(params.upscale, 1.0);
    }

    #[test]
    fn test_every_stylization_preserves_dimensions() {
        let params = StyleParams::new(EffectSettings::default(), 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        for style in [
            Stylization::Halftone,
            Stylization::Stippling,
            Stylization::Engraving,
            Stylization::Dithering,
            Stylization::Grain,
        ] {
            let out = style
                .apply(PixelBuffer::filled(13, 9, [90, 140, 200, 255]), &params, &mut rng)
                .unwrap();
            assert_eq!((out.width(), out.height()), (13, 9), "{}", style.as_str());
        }
    }

    #[test]
    fn test_stochastic_flags() {
        assert!(Stylization::Grain.is_stochastic());
        assert!(Stylization::Stippling.is_stochastic());
        assert!(!Stylization::Dithering.is_stochastic());
        assert!(!Stylization::Halftone.is_stochastic());
    }
}
