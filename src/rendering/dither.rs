//! Posterizing error diffusion stylization.

use rand::RngCore;
use raster_fx::{ErrorDiffusion, PixelBuffer};

use super::stylize::{StyleParams, Stylize};
use crate::error::ProcessingError;

/// Floyd-Steinberg quantization to `max(2, floor(intensity/100 * 8))`
/// levels per channel. Deterministic; the random source is unused.
pub struct Dithering;

impl Stylize for Dithering {
    fn stylize(
        &self,
        mut buffer: PixelBuffer,
        params: &StyleParams,
        _rng: &mut dyn RngCore,
    ) -> Result<PixelBuffer, ProcessingError> {
        let quantizer = ErrorDiffusion::for_intensity(params.effect.intensity);
        quantizer.apply(&mut buffer);
        tracing::debug!(levels = quantizer.levels(), "Dithered");
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EffectSettings;
    use rand::rngs::mock::StepRng;

    fn params(intensity: f32) -> StyleParams {
        StyleParams::new(
            EffectSettings {
                intensity,
                scale: 6.0,
                angle: 0.0,
            },
            1.0,
        )
    }

    #[test]
    fn test_low_intensity_is_binary() {
        let mut buffer = PixelBuffer::new(16, 16).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                let v = (x * 16 + y) as u8;
                buffer.set_pixel(x, y, [v, 255 - v, v, 255]);
            }
        }
        let out = Dithering
            .stylize(buffer, &params(20.0), &mut StepRng::new(0, 0))
            .unwrap();
        assert!(out
            .pixels()
            .all(|p| p[..3].iter().all(|&c| c == 0 || c == 255)));
    }

    #[test]
    fn test_repeatable() {
        let buffer = PixelBuffer::filled(20, 20, [77, 133, 201, 255]);
        let a = Dithering
            .stylize(buffer.clone(), &params(60.0), &mut StepRng::new(0, 1))
            .unwrap();
        let b = Dithering
            .stylize(buffer, &params(60.0), &mut StepRng::new(99, 7))
            .unwrap();
        assert_eq!(a, b);
    }
}
