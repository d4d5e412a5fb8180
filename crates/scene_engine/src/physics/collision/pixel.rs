//! Pixel-mask collision shape
//!
//! Texture decoding lives in the graphics backend; the mask only keeps the
//! alpha channel handed over by the caller.

use crate::foundation::math::Rect;
use thiserror::Error;

/// Pixel mask construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PixelMaskError {
    /// The alpha buffer does not match the declared dimensions
    #[error("alpha buffer has {actual} entries, expected {expected} ({width}x{height})")]
    SizeMismatch {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// `width * height`
        expected: usize,
        /// Length of the supplied buffer
        actual: usize,
    },
}

/// Alpha mask where pixels at or above the threshold are solid
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMask {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
    threshold: u8,
}

impl PixelMask {
    /// Default solidity threshold (half opacity)
    pub const DEFAULT_THRESHOLD: u8 = 128;

    /// Build a mask from row-major alpha values
    pub fn from_alpha(width: usize, height: usize, alpha: Vec<u8>) -> Result<Self, PixelMaskError> {
        let expected = width * height;
        if alpha.len() != expected {
            return Err(PixelMaskError::SizeMismatch {
                width,
                height,
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self {
            width,
            height,
            alpha,
            threshold: Self::DEFAULT_THRESHOLD,
        })
    }

    /// A fully opaque mask
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![u8::MAX; width * height],
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    /// A fully transparent mask
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width * height],
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    /// Set the solidity threshold as a fraction of full opacity
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = (threshold.clamp(0.0, 1.0) * f32::from(u8::MAX)).round() as u8;
        self
    }

    /// Width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Overwrite one pixel's alpha; writes outside the mask are ignored
    pub fn set_alpha(&mut self, x: usize, y: usize, alpha: u8) {
        if x < self.width && y < self.height {
            self.alpha[y * self.width + x] = alpha;
        }
    }

    /// Check if a pixel is solid; pixels outside the mask are empty
    pub fn pixel(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.alpha[y as usize * self.width + x as usize] >= self.threshold
    }

    /// Solid pixels touched by a local-space rectangle
    pub fn solid_pixels_in(&self, local: &Rect) -> impl Iterator<Item = (usize, usize)> + '_ {
        let x0 = local.left().floor().max(0.0) as usize;
        let y0 = local.top().floor().max(0.0) as usize;
        let x1 = (local.right().ceil().max(0.0) as usize).min(self.width);
        let y1 = (local.bottom().ceil().max(0.0) as usize).min(self.height);

        (y0..y1)
            .flat_map(move |y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x as i64, y as i64))
    }

    /// Check if any solid pixel is touched by a local-space rectangle
    pub fn any_solid_in(&self, local: &Rect) -> bool {
        self.solid_pixels_in(local).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch() {
        let result = PixelMask::from_alpha(2, 2, vec![0; 3]);
        assert!(matches!(result, Err(PixelMaskError::SizeMismatch { expected: 4, actual: 3, .. })));
    }

    #[test]
    fn test_threshold() {
        let mask = PixelMask::from_alpha(2, 1, vec![100, 200]).unwrap();
        assert!(!mask.pixel(0, 0));
        assert!(mask.pixel(1, 0));

        let strict = mask.clone().with_threshold(0.9);
        assert!(!strict.pixel(1, 0));
        let loose = mask.with_threshold(0.2);
        assert!(loose.pixel(0, 0));
    }

    #[test]
    fn test_any_solid_in() {
        let mut mask = PixelMask::empty(4, 4);
        mask.set_alpha(3, 3, 255);
        assert!(mask.any_solid_in(&Rect::new(2.5, 2.5, 1.0, 1.0)));
        assert!(!mask.any_solid_in(&Rect::new(0.0, 0.0, 3.0, 3.0)));
        assert!(!mask.any_solid_in(&Rect::new(-5.0, -5.0, 2.0, 2.0)));
    }
}
