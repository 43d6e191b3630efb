//! Film grain: uniform noise added to every visible pixel.

use rand::{Rng, RngCore};
use raster_fx::PixelBuffer;

use super::stylize::{StyleParams, Stylize};
use crate::error::ProcessingError;

/// Peak-to-peak noise amplitude for an intensity in percent.
pub fn amplitude(intensity: f32) -> f32 {
    intensity * 1.5
}

pub struct Grain;

impl Stylize for Grain {
    fn stylize(
        &self,
        mut buffer: PixelBuffer,
        params: &StyleParams,
        rng: &mut dyn RngCore,
    ) -> Result<PixelBuffer, ProcessingError> {
        let amount = amplitude(params.effect.intensity);
        for px in buffer.pixels_mut() {
            if px[3] == 0 {
                continue;
            }
            for c in px.iter_mut().take(3) {
                let noise = (rng.gen::<f32>() - 0.5) * amount;
                *c = (*c as f32 + noise).clamp(0.0, 255.0).round() as u8;
            }
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EffectSettings;
    use rand::{rngs::StdRng, SeedableRng};

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
    fn test_noise_is_bounded_and_centered() {
        let buffer = PixelBuffer::filled(64, 64, [128, 128, 128, 255]);
        let mut rng = StdRng::seed_from_u64(3);
        let out = Grain.stylize(buffer, &params(40.0), &mut rng).unwrap();

        // +-30 around 128
        let mut sum = 0i64;
        let mut n = 0i64;
        for p in out.pixels() {
            for &c in &p[..3] {
                assert!((98..=158).contains(&c), "{c}");
                sum += c as i64 - 128;
                n += 1;
            }
            assert_eq!(p[3], 255);
        }
        let mean = sum as f64 / n as f64;
        assert!(mean.abs() < 1.0, "mean offset {mean}");
    }

    #[test]
    fn test_channels_get_independent_noise() {
        let buffer = PixelBuffer::filled(32, 32, [128, 128, 128, 255]);
        let mut rng = StdRng::seed_from_u64(11);
        let out = Grain.stylize(buffer, &params(100.0), &mut rng).unwrap();
        let differing = out.pixels().filter(|p| p[0] != p[1] || p[1] != p[2]).count();
        assert!(differing > out.pixel_count() / 2);
    }

    #[test]
    fn test_transparent_pixels_untouched() {
        let buffer = PixelBuffer::filled(8, 8, [50, 60, 70, 0]);
        let mut rng = StdRng::seed_from_u64(5);
        let out = Grain.stylize(buffer.clone(), &params(100.0), &mut rng).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_clamps_at_extremes() {
        let buffer = PixelBuffer::filled(16, 16, [255, 0, 255, 255]);
        let mut rng = StdRng::seed_from_u64(8);
        let out = Grain.stylize(buffer, &params(100.0), &mut rng).unwrap();
        assert!(out.pixels().any(|p| p[0] == 255));
        assert!(out.pixels().any(|p| p[1] == 0));
    }
}
