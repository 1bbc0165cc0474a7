//! Bounding-box types and the normalized→pixel coordinate conversion.
//!
//! Source annotations carry normalized fractional coordinates in [0, 1]
//! relative to the image width/height; the destination format wants
//! absolute integer pixel bounds. The conversion scales by `dimension - 1`
//! (the usable pixel index range is `[0, dimension - 1]`) and rounds half
//! away from zero.
//!
//! Construction is permissive: a box with `xmin > xmax` from bad source
//! data is representable and passes through conversion unmodified rather
//! than being rejected or clamped. [`BBox::is_ordered`] exists for callers
//! that want to check.

use serde::{Deserialize, Serialize};

/// A normalized bounding box: four scalars in [0, 1] relative to the
/// image width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BBox {
    /// Creates a box from the source dataset's column order
    /// (XMin, XMax, YMin, YMax).
    #[inline]
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Returns true if the box is properly ordered (min <= max on both axes).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }

    /// Returns true if all coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.xmin.is_finite()
            && self.xmax.is_finite()
            && self.ymin.is_finite()
            && self.ymax.is_finite()
    }

    /// Reflects each coordinate about the 1.0 axis, on both axes:
    /// `xmin' = 1 - xmax`, `xmax' = 1 - xmin`, and symmetrically for y.
    ///
    /// Mirroring is an involution: `b.mirrored().mirrored() == b` up to
    /// floating-point rounding.
    #[inline]
    pub fn mirrored(&self) -> BBox {
        BBox {
            xmin: 1.0 - self.xmax,
            xmax: 1.0 - self.xmin,
            ymin: 1.0 - self.ymax,
            ymax: 1.0 - self.ymin,
        }
    }

    /// Converts to absolute pixel coordinates for an image of the given
    /// dimensions.
    ///
    /// Each coordinate is scaled by `dimension - 1` and rounded to the
    /// nearest integer, ties away from zero. For coordinates in [0, 1]
    /// and positive dimensions the result is non-negative and preserves
    /// `min <= max` ordering.
    pub fn to_pixel(&self, width: u32, height: u32) -> PixelBox {
        let x_span = f64::from(width.saturating_sub(1));
        let y_span = f64::from(height.saturating_sub(1));

        PixelBox {
            xmin: (self.xmin * x_span).round() as i64,
            xmax: (self.xmax * x_span).round() as i64,
            ymin: (self.ymin * y_span).round() as i64,
            ymax: (self.ymax * y_span).round() as i64,
        }
    }
}

/// An absolute pixel-coordinate bounding box.
///
/// Signed so that out-of-range source data stays observable in the output
/// instead of being clamped away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBox {
    pub xmin: i64,
    pub xmax: i64,
    pub ymin: i64,
    pub ymax: i64,
}

impl PixelBox {
    /// Returns true if the box is properly ordered (min <= max on both axes).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_frame_box_maps_to_pixel_corners() {
        let bbox = BBox::new(0.0, 1.0, 0.0, 1.0);
        let pixel = bbox.to_pixel(101, 101);

        assert_eq!(
            pixel,
            PixelBox {
                xmin: 0,
                xmax: 100,
                ymin: 0,
                ymax: 100,
            }
        );
    }

    #[test]
    fn full_frame_box_is_flip_invariant() {
        let bbox = BBox::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!(bbox.to_pixel(101, 101), bbox.mirrored().to_pixel(101, 101));
    }

    #[test]
    fn mirroring_reflects_both_axes() {
        let bbox = BBox::new(0.1, 0.4, 0.2, 0.7);
        let mirrored = bbox.mirrored();

        assert!((mirrored.xmin - 0.6).abs() < 1e-12);
        assert!((mirrored.xmax - 0.9).abs() < 1e-12);
        assert!((mirrored.ymin - 0.3).abs() < 1e-12);
        assert!((mirrored.ymax - 0.8).abs() < 1e-12);
    }

    #[test]
    fn mirroring_is_an_involution() {
        let bbox = BBox::new(0.125, 0.5, 0.25, 0.875);
        let twice = bbox.mirrored().mirrored();

        assert!((twice.xmin - bbox.xmin).abs() < 1e-12);
        assert!((twice.xmax - bbox.xmax).abs() < 1e-12);
        assert!((twice.ymin - bbox.ymin).abs() < 1e-12);
        assert!((twice.ymax - bbox.ymax).abs() < 1e-12);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 0.5 * (101 - 1) = 50.0 exactly; 0.005 * 100 = 0.5 rounds up.
        let bbox = BBox::new(0.005, 0.5, 0.0, 0.0);
        let pixel = bbox.to_pixel(101, 101);
        assert_eq!(pixel.xmin, 1);
        assert_eq!(pixel.xmax, 50);

        // Out-of-range negative data: -0.005 * 100 = -0.5 rounds to -1,
        // away from zero, and passes through unclamped.
        let below = BBox::new(-0.005, 0.0, 0.0, 0.0);
        assert_eq!(below.to_pixel(101, 101).xmin, -1);
    }

    #[test]
    fn ordering_is_preserved_for_valid_boxes() {
        let bbox = BBox::new(0.1, 0.9, 0.3, 0.6);
        let pixel = bbox.to_pixel(640, 480);

        assert!(pixel.is_ordered());
        assert!(pixel.xmin >= 0 && pixel.ymin >= 0);
    }

    #[test]
    fn inverted_boxes_pass_through() {
        let inverted = BBox::new(0.9, 0.1, 0.8, 0.2);
        assert!(!inverted.is_ordered());

        let pixel = inverted.to_pixel(101, 101);
        assert_eq!(pixel.xmin, 90);
        assert_eq!(pixel.xmax, 10);
        assert!(!pixel.is_ordered());
    }

    #[test]
    fn degenerate_dimensions_collapse_to_zero() {
        let bbox = BBox::new(0.0, 1.0, 0.0, 1.0);
        let pixel = bbox.to_pixel(1, 1);
        assert_eq!(pixel, PixelBox::default());
    }
}
