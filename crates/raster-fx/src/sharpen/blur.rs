//! Separable Gaussian blur.

use crate::buffer::{PixelBuffer, CHANNELS};

/// Normalized 1-D Gaussian kernel spanning about six sigma, odd length.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let size = ((sigma * 6.0).ceil() as usize) | 1;
    let half = (size / 2) as f32;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }
    kernel
}

/// Blur all four channels, clamping samples at the image edge.
///
/// Returns a new buffer; the input is left untouched.
pub fn gaussian_blur(src: &PixelBuffer, sigma: f32) -> PixelBuffer {
    if sigma <= 0.0 {
        return src.clone();
    }

    let kernel = gaussian_kernel(sigma);
    let half = (kernel.len() / 2) as isize;
    let width = src.width() as usize;
    let height = src.height() as usize;
    let input = src.as_bytes();

    let mut temp = vec![0.0f32; input.len()];

    for y in 0..height {
        let row = y * width;
        for x in 0..width {
            let mut sum = [0.0f32; CHANNELS];
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - half).clamp(0, width as isize - 1) as usize;
                let i = (row + sx) * CHANNELS;
                for c in 0..CHANNELS {
                    sum[c] += input[i + c] as f32 * weight;
                }
            }
            temp[(row + x) * CHANNELS..(row + x + 1) * CHANNELS].copy_from_slice(&sum);
        }
    }

    let mut out = src.clone();
    let output = out.as_bytes_mut();

    for y in 0..height {
        for x in 0..width {
            let mut sum = [0.0f32; CHANNELS];
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - half).clamp(0, height as isize - 1) as usize;
                let i = (sy * width + x) * CHANNELS;
                for c in 0..CHANNELS {
                    sum[c] += temp[i + c] * weight;
                }
            }
            let i = (y * width + x) * CHANNELS;
            for c in 0..CHANNELS {
                output[i + c] = sum[c].clamp(0.0, 255.0).round() as u8;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized_and_odd() {
        for sigma in [0.5, 1.0, 2.0, 3.3] {
            let k = gaussian_kernel(sigma);
            assert_eq!(k.len() % 2, 1);
            let sum: f32 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
        assert_eq!(gaussian_kernel(2.0).len(), 13);
    }

    #[test]
    fn test_kernel_is_symmetric_with_peak_in_middle() {
        let k = gaussian_kernel(2.0);
        let mid = k.len() / 2;
        for i in 0..mid {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-7);
            assert!(k[i] < k[mid]);
        }
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let src = PixelBuffer::filled(10, 7, [90, 120, 200, 255]);
        assert_eq!(gaussian_blur(&src, 2.0), src);
    }

    #[test]
    fn test_edge_is_softened() {
        let mut src = PixelBuffer::filled(20, 1, [0, 0, 0, 255]);
        for x in 10..20 {
            src.set_pixel(x, 0, [255, 255, 255, 255]);
        }
        let blurred = gaussian_blur(&src, 2.0);
        let left = blurred.pixel(9, 0)[0];
        let right = blurred.pixel(10, 0)[0];
        assert!(left > 0 && left < 128, "left of edge: {left}");
        assert!(right > 128 && right < 255, "right of edge: {right}");
        assert_eq!(blurred.pixel(0, 0)[0], 0);
        assert_eq!(blurred.pixel(19, 0)[0], 255);
    }
}
