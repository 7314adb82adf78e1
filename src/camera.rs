use crate::bounds::BoundingBox;
use crate::error::{MapViewError, is_positive};
use crate::transform::{self, transform_point};
use glam::{Mat4, Vec2};
use log::debug;

/// Width and height of the whole map in map units.
pub const MAP_EXTENT: f32 = 2.0;

/// Raw camera state. Every matrix is derived from these four fields on demand.
///
/// `size.y / size.x` always equals `window_size.y / window_size.x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// View center in map units.
    pub center: Vec2,
    /// View angle in radians.
    pub angle: f32,
    /// Visible extent in map units.
    pub size: Vec2,
    /// Window size in pixels.
    pub window_size: Vec2,
}

impl CameraState {
    pub fn window_to_map(&self) -> Mat4 {
        transform::window_to_map(self.center, self.angle, self.size, self.window_size)
    }

    pub fn map_to_clip(&self) -> Mat4 {
        transform::map_to_clip(self.center, self.angle, self.size)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_window(self.window_to_map(), self.window_size)
    }

    fn window_to_map_point(&self, p: Vec2) -> Vec2 {
        transform_point(self.window_to_map(), p)
    }

    // Scales the view width and re-derives the height from the window aspect.
    fn scale(&mut self, scale_factor: f32) {
        self.size.x *= scale_factor;
        self.size.y = self.size.x * (self.window_size.y / self.window_size.x);
    }
}

/// Map camera.
///
/// x = -1 is the map's left border, x = 1 the right one,
/// y = 1 the top border and y = -1 the bottom one.
///
/// Every mutator keeps the view inside the map: the view's bounding box is never
/// wider or taller than the map and never crosses a map border.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    state: CameraState,
}

impl Camera {
    /// Creates a camera centered at `(cx, cy)` in map units, rotated by `angle`
    /// radians and showing `view_width` map units across a window of the given
    /// pixel size.
    ///
    /// The initial view is limited the same way every later operation is, so a
    /// view wider than the map or off the map is pulled back in.
    pub fn new(
        cx: f32,
        cy: f32,
        angle: f32,
        view_width: f32,
        window_width: f32,
        window_height: f32,
    ) -> Result<Self, MapViewError> {
        validate_window(window_width, window_height)?;
        if !is_positive(view_width) {
            return Err(MapViewError::InvalidViewWidth(view_width));
        }

        let center = Vec2::new(cx, cy);
        let mut camera = Camera {
            state: CameraState {
                center,
                angle,
                size: Vec2::new(view_width, view_width * window_height / window_width),
                window_size: Vec2::new(window_width, window_height),
            },
        };
        let size = camera.state.size;
        camera.limit_zoom(center, size, 1.0, center);
        camera.limit_translation();
        Ok(camera)
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn center(&self) -> Vec2 {
        self.state.center
    }

    pub fn angle(&self) -> f32 {
        self.state.angle
    }

    pub fn size(&self) -> Vec2 {
        self.state.size
    }

    pub fn window_size(&self) -> Vec2 {
        self.state.window_size
    }

    /// Window pixels -> map units.
    pub fn window_to_map(&self) -> Mat4 {
        self.state.window_to_map()
    }

    /// Map units -> clip space. This is the matrix handed to the renderer.
    pub fn map_to_clip_matrix(&self) -> Mat4 {
        self.state.map_to_clip()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.state.bounding_box()
    }

    pub fn window_to_map_point(&self, p: Vec2) -> Vec2 {
        self.state.window_to_map_point(p)
    }

    pub fn map_to_window_point(&self, p: Vec2) -> Vec2 {
        let s = &self.state;
        transform_point(
            transform::map_to_window(s.center, s.angle, s.size, s.window_size),
            p,
        )
    }

    /// Drags the map by a pixel displacement: the map point under the cursor
    /// follows the cursor.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let m = self.state.window_to_map();
        let origin = transform_point(m, Vec2::ZERO);
        let moved = transform_point(m, Vec2::new(dx, dy));
        self.state.center += origin - moved;
        self.limit_translation();
    }

    /// Scales the view around the anchor pixel. `scale_factor < 1` zooms in,
    /// `> 1` zooms out. The map point under the anchor stays put unless a limit
    /// kicks in.
    pub fn zoom(&mut self, scale_factor: f32, anchor_x: f32, anchor_y: f32) {
        let anchor_px = Vec2::new(anchor_x, anchor_y);
        let anchor = self.state.window_to_map_point(anchor_px);
        let previous = self.state;

        self.state.center = scale_factor * (previous.center - anchor) + anchor;
        self.state.scale(scale_factor);

        // The anchor is a fixed point of the scale, so its pre-zoom map position
        // is reused. Re-deriving it from a hugely zoomed-out view loses it to
        // cancellation or overflow.
        self.limit_zoom(previous.center, previous.size, scale_factor, anchor);
        self.limit_translation();
    }

    /// Same as [`Camera::zoom`] but rejects a scale factor that is not finite and positive.
    pub fn try_zoom(
        &mut self,
        scale_factor: f32,
        anchor_x: f32,
        anchor_y: f32,
    ) -> Result<(), MapViewError> {
        if !is_positive(scale_factor) {
            return Err(MapViewError::InvalidScaleFactor(scale_factor));
        }
        self.zoom(scale_factor, anchor_x, anchor_y);
        Ok(())
    }

    /// Rotates the view by `delta_angle` radians around the anchor pixel.
    pub fn rotate(&mut self, delta_angle: f32, anchor_x: f32, anchor_y: f32) {
        let anchor_px = Vec2::new(anchor_x, anchor_y);
        let anchor = self.state.window_to_map_point(anchor_px);

        let offset = self.state.center - anchor;
        self.state.center = Vec2::from_angle(-delta_angle).rotate(offset) + anchor;
        self.state.angle += delta_angle;

        // A rotated footprint can be wider than the map even at the same size.
        // The limit restarts from the rotated view rather than the pre-rotation
        // center, so the anchor stays under the cursor.
        let anchor = self.state.window_to_map_point(anchor_px);
        let rotated = self.state;
        self.limit_zoom(rotated.center, rotated.size, 1.0, anchor);
        self.limit_translation();
    }

    /// Adopts a new window size. The view width is kept and the height follows
    /// the new aspect ratio.
    pub fn resize(&mut self, window_width: f32, window_height: f32) -> Result<(), MapViewError> {
        validate_window(window_width, window_height)?;

        self.state.window_size = Vec2::new(window_width, window_height);
        self.state.scale(1.0);

        let center = self.state.center;
        let size = self.state.size;
        self.limit_zoom(center, size, 1.0, center);
        self.limit_translation();
        Ok(())
    }

    // If the view footprint outgrew the map, restart from `previous_*` with the
    // largest scale that fits both axes. One pass suffices since the factor
    // covers both axes at once. A footprint that overflowed f32 counts as too
    // large; the factor is then measured on the previous view, since the
    // footprint scales linearly with the zoom.
    fn limit_zoom(
        &mut self,
        previous_center: Vec2,
        previous_size: Vec2,
        scale_factor: f32,
        anchor: Vec2,
    ) {
        let bbox = self.state.bounding_box();
        let (width, height) = (bbox.width(), bbox.height());
        if bbox.is_finite() && width <= MAP_EXTENT && height <= MAP_EXTENT {
            return;
        }

        let corrected = if bbox.is_finite() {
            scale_factor * fit_factor(width, height)
        } else {
            let previous = CameraState {
                center: previous_center,
                size: previous_size,
                ..self.state
            }
            .bounding_box();
            fit_factor(previous.width(), previous.height())
        };
        debug!(
            "zoom limited: footprint {}x{} exceeds map, scale {} -> {}",
            width, height, scale_factor, corrected
        );

        self.state.center = corrected * (previous_center - anchor) + anchor;
        self.state.size = previous_size;
        self.state.scale(corrected);
    }

    fn limit_translation(&mut self) {
        let bbox = self.state.bounding_box();
        let mut center = self.state.center;

        if bbox.left < -1.0 {
            center.x += -1.0 - bbox.left;
        }
        if bbox.right > 1.0 {
            center.x += 1.0 - bbox.right;
        }
        if bbox.bottom < -1.0 {
            center.y += -1.0 - bbox.bottom;
        }
        if bbox.top > 1.0 {
            center.y += 1.0 - bbox.top;
        }

        if center != self.state.center {
            debug!(
                "translation limited: center {:?} -> {:?}",
                self.state.center, center
            );
            self.state.center = center;
        }
    }
}

fn validate_window(width: f32, height: f32) -> Result<(), MapViewError> {
    if is_positive(width) && is_positive(height) {
        Ok(())
    } else {
        Err(MapViewError::InvalidWindowSize { width, height })
    }
}

// Scale that brings a `width` x `height` footprint just inside the map.
fn fit_factor(width: f32, height: f32) -> f32 {
    next_below(MAP_EXTENT / width).min(next_below(MAP_EXTENT / height))
}

// Largest f32 strictly below a positive finite `x`.
fn next_below(x: f32) -> f32 {
    f32::from_bits(x.to_bits() - 1)
}
