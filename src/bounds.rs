use crate::transform::transform_point;
use glam::{Mat4, Vec2};

/// Axis-aligned rectangle in map space (y up).
///
/// For a rotated view this over-approximates the visible quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl BoundingBox {
    /// Maps the four window corners through `window_to_map` and takes the
    /// per-axis extremes.
    pub fn from_window(window_to_map: Mat4, window_size: Vec2) -> Self {
        let corners = [
            Vec2::ZERO,
            Vec2::new(window_size.x, 0.0),
            Vec2::new(0.0, window_size.y),
            window_size,
        ];

        let mut bbox = BoundingBox {
            left: f32::INFINITY,
            right: f32::NEG_INFINITY,
            bottom: f32::INFINITY,
            top: f32::NEG_INFINITY,
        };
        for corner in corners {
            let p = transform_point(window_to_map, corner);
            bbox.left = bbox.left.min(p.x);
            bbox.right = bbox.right.max(p.x);
            bbox.bottom = bbox.bottom.min(p.y);
            bbox.top = bbox.top.max(p.y);
        }
        bbox
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// False when a window corner did not map to finite coordinates or the
    /// extent overflowed.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
            && self.top.is_finite()
            && self.width().is_finite()
            && self.height().is_finite()
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::window_to_map;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn unrotated_view_box_matches_view_extent() {
        let m = window_to_map(
            Vec2::new(0.25, -0.5),
            0.0,
            Vec2::new(1.0, 0.5),
            Vec2::new(400.0, 200.0),
        );
        let bbox = BoundingBox::from_window(m, Vec2::new(400.0, 200.0));
        assert!((bbox.left - -0.25).abs() < 1e-5);
        assert!((bbox.right - 0.75).abs() < 1e-5);
        assert!((bbox.bottom - -0.75).abs() < 1e-5);
        assert!((bbox.top - -0.25).abs() < 1e-5);
    }

    #[test]
    fn rotated_square_view_grows_by_sqrt2() {
        let window = Vec2::new(100.0, 100.0);
        let m = window_to_map(Vec2::ZERO, FRAC_PI_4, Vec2::new(1.0, 1.0), window);
        let bbox = BoundingBox::from_window(m, window);
        let expected = std::f32::consts::SQRT_2;
        assert!((bbox.width() - expected).abs() < 1e-5);
        assert!((bbox.height() - expected).abs() < 1e-5);
        assert!(bbox.contains(Vec2::ZERO));
        assert!(bbox.is_finite());
    }

    #[test]
    fn non_finite_view_gives_non_finite_box() {
        let window = Vec2::new(100.0, 100.0);
        let m = window_to_map(Vec2::ZERO, 0.0, Vec2::new(f32::INFINITY, 1.0), window);
        assert!(!BoundingBox::from_window(m, window).is_finite());
    }
}
