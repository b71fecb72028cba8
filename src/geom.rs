//! Geometry Primitives
//!
//! Shared coordinate types for the motion tracker, hover engine, and paint
//! function. All values are viewport pixels: +x right, +y down.

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `other` to `self`.
    pub fn delta_from(&self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

/// A displacement between two pointer samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vector {
    /// The zero displacement.
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    /// Create a vector.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Size {
    /// Create a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Square size with the given side length.
    pub fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    /// True when either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Clamp `value` into `[low, high]`.
///
/// Values already inside the range pass through unchanged. A NaN input
/// collapses to `low`, keeping the output finite for finite bounds.
pub fn clamp(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_inside_range_unchanged() {
        assert_eq!(clamp(3.0, 0.0, 10.0), 3.0);
        assert_eq!(clamp(0.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(10.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp_outside_range() {
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(-60.0, -50.0, 50.0), -50.0);
    }

    #[test]
    fn test_clamp_nan_collapses_to_low() {
        assert_eq!(clamp(f64::NAN, -1.0, 1.0), -1.0);
    }

    #[test]
    fn test_delta_from() {
        let a = Point::new(120.0, 100.0);
        let b = Point::new(100.0, 100.0);
        let v = a.delta_from(b);
        assert_eq!(v, Vector::new(20.0, 0.0));
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::new(50.0, 90.0, 40.0, 20.0);
        assert_eq!(r.center(), Point::new(70.0, 100.0));
    }

    #[test]
    fn test_empty_checks() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(Size::new(10.0, 0.0).is_empty());
        assert!(!Size::square(10.0).is_empty());
    }

    proptest! {
        #[test]
        fn clamp_always_in_range(
            value in -1e9f64..1e9,
            low in -1e4f64..1e4,
            span in 0.0f64..1e4,
        ) {
            let high = low + span;
            let out = clamp(value, low, high);
            prop_assert!(out >= low);
            prop_assert!(out <= high);
        }

        #[test]
        fn clamp_identity_inside(
            low in -1e4f64..0.0,
            span in 1.0f64..1e4,
            t in 0.0f64..1.0,
        ) {
            let high = low + span;
            let value = low + span * t;
            prop_assert_eq!(clamp(value, low, high), value);
        }
    }
}
