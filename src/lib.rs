//! Camera and tile selection for a 2D tiled map.
//!
//! The map occupies the square `[-1, 1] x [-1, 1]`. A [`Camera`] looks at it
//! through a window of some pixel size and can be panned, zoomed and rotated
//! but never leaves the map. A [`TileEnumerator`] picks the level of detail for
//! the current view and lists the tiles covering it.

pub mod bounds;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod sink;
pub mod tiles;
pub mod transform;

pub use bounds::BoundingBox;
pub use camera::{Camera, CameraState};
pub use config::{InputConfig, TileConfig, ViewConfig};
pub use error::MapViewError;
pub use input::{CameraController, InputState, Key, MouseButton};
pub use sink::{ClipUniform, InstanceBatch, TileInstance, TileSink};
pub use tiles::{TileDescriptor, TileEnumerator, TileGrid};

use glam::Mat4;
use winit::event::WindowEvent;

/// Position in map units.
pub type MapVec = glam::Vec2;
/// Position or size in window pixels.
pub type WindowVec = glam::Vec2;

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub tiles: Vec<TileDescriptor>,
    pub map_to_clip: Mat4,
}

/// Public context: a camera driven by window events plus tile selection.
pub struct MapView {
    controller: CameraController,
    tiles: TileEnumerator,
}

impl MapView {
    /// Builds the camera and the tile enumerator from `config` for a window of
    /// the given pixel size.
    pub fn new(
        config: &ViewConfig,
        window_width: u32,
        window_height: u32,
    ) -> Result<Self, MapViewError> {
        let camera = config.build_camera(window_width as f32, window_height as f32)?;
        let tiles = config.tiles.build_enumerator()?;
        Ok(MapView {
            controller: CameraController::new(camera, config.input.clone()),
            tiles,
        })
    }

    /// Feed every window event here.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        self.controller.handle_window_event(event);
    }

    pub fn controller_mut(&mut self) -> &mut CameraController {
        &mut self.controller
    }

    pub fn camera(&self) -> &Camera {
        self.controller.camera()
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        self.controller.camera_mut()
    }

    pub fn close_requested(&self) -> bool {
        self.controller.close_requested()
    }

    pub fn grid(&self) -> TileGrid {
        self.tiles.grid(self.camera())
    }

    /// Snapshot of the tiles and matrix for the current camera.
    pub fn frame(&self) -> Frame {
        let camera = self.camera();
        Frame {
            tiles: self.tiles.tiles(camera),
            map_to_clip: camera.map_to_clip_matrix(),
        }
    }

    pub fn render_to<S: TileSink>(&self, sink: &mut S) {
        let frame = self.frame();
        sink.draw(&frame.tiles, frame.map_to_clip);
    }
}
