// Pure matrix derivations for the camera.
//
// Map space: the whole map is [-1, 1] x [-1, 1] with y up.
// Window space: pixels, origin top-left, y down.
// Clip space: [-1, 1] on both axes, window top at y = -1.

use glam::{Mat4, Vec2};

/// Window pixels -> clip space.
pub fn window_to_clip(window_size: Vec2) -> Mat4 {
    Mat4::from_translation(glam::vec3(-1.0, -1.0, 0.0))
        * Mat4::from_scale(glam::vec3(2.0 / window_size.x, 2.0 / window_size.y, 1.0))
}

/// Clip space -> window pixels.
pub fn clip_to_window(window_size: Vec2) -> Mat4 {
    Mat4::from_scale(glam::vec3(window_size.x / 2.0, window_size.y / 2.0, 1.0))
        * Mat4::from_translation(glam::vec3(1.0, 1.0, 0.0))
}

/// Returns the matrix that maps map coordinates into clip space.
/// Window size does not enter this step; the aspect ratio is carried by `size`.
pub fn map_to_clip(center: Vec2, angle: f32, size: Vec2) -> Mat4 {
    let scale = Mat4::from_scale(glam::vec3(2.0 / size.x, -2.0 / size.y, 1.0));
    let rotation = Mat4::from_rotation_z(angle);
    let translation = Mat4::from_translation(glam::vec3(-center.x, -center.y, 0.0));

    scale * rotation * translation
}

/// Inverse of [`map_to_clip`], built directly rather than through `Mat4::inverse`.
pub fn clip_to_map(center: Vec2, angle: f32, size: Vec2) -> Mat4 {
    let translation = Mat4::from_translation(glam::vec3(center.x, center.y, 0.0));
    let rotation = Mat4::from_rotation_z(-angle);
    let scale = Mat4::from_scale(glam::vec3(size.x / 2.0, -size.y / 2.0, 1.0));

    translation * rotation * scale
}

pub fn window_to_map(center: Vec2, angle: f32, size: Vec2, window_size: Vec2) -> Mat4 {
    clip_to_map(center, angle, size) * window_to_clip(window_size)
}

pub fn map_to_window(center: Vec2, angle: f32, size: Vec2, window_size: Vec2) -> Mat4 {
    clip_to_window(window_size) * map_to_clip(center, angle, size)
}

pub(crate) fn transform_point(mat: Mat4, p: Vec2) -> Vec2 {
    let v = mat * glam::vec4(p.x, p.y, 0.0, 1.0);
    Vec2::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn window_corners_map_to_clip_corners() {
        let window = Vec2::new(800.0, 600.0);
        let m = window_to_clip(window);
        assert!(close(transform_point(m, Vec2::ZERO), Vec2::new(-1.0, -1.0)));
        assert!(close(transform_point(m, window), Vec2::new(1.0, 1.0)));
        assert!(close(transform_point(m, window / 2.0), Vec2::ZERO));
    }

    #[test]
    fn clip_to_window_inverts_window_to_clip() {
        let window = Vec2::new(640.0, 480.0);
        let roundtrip = clip_to_window(window) * window_to_clip(window);
        let p = Vec2::new(123.0, 456.0);
        assert!(close(transform_point(roundtrip, p), p));
    }

    #[test]
    fn window_top_left_is_view_top_left_on_map() {
        // Unrotated view of the whole map: top-left pixel is map (-1, 1).
        let m = window_to_map(Vec2::ZERO, 0.0, Vec2::new(2.0, 2.0), Vec2::new(256.0, 256.0));
        assert!(close(transform_point(m, Vec2::ZERO), Vec2::new(-1.0, 1.0)));
        assert!(close(
            transform_point(m, Vec2::new(256.0, 256.0)),
            Vec2::new(1.0, -1.0)
        ));
    }

    #[test]
    fn map_to_clip_inverts_clip_to_map() {
        let center = Vec2::new(0.3, -0.2);
        let size = Vec2::new(0.5, 0.25);
        let angle = 0.7;
        let m = map_to_clip(center, angle, size) * clip_to_map(center, angle, size);
        let p = Vec2::new(0.4, 0.9);
        assert!(close(transform_point(m, p), p));
    }

    #[test]
    fn view_center_maps_to_clip_origin() {
        let center = Vec2::new(-0.4, 0.6);
        let m = map_to_clip(center, 1.2, Vec2::new(0.3, 0.2));
        assert!(close(transform_point(m, center), Vec2::ZERO));
    }
}
