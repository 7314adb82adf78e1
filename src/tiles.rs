use crate::bounds::BoundingBox;
use crate::camera::{Camera, MAP_EXTENT};
use crate::error::{MapViewError, is_positive};
use crate::transform::clip_to_window;
use glam::Vec2;
use log::{debug, trace};

/// Design resolution of one tile in screen pixels.
pub const REFERENCE_TILE_PX: f32 = 256.0;

/// Deepest layer whose grid size still fits in a `u32`.
pub const MAX_LAYER: u32 = 31;

/// One tile to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileDescriptor {
    /// Tile center in map units, snapped to the grid cell center.
    pub center: Vec2,
    /// Side length in map units.
    pub side: f32,
    /// Row index, 0 at the top of the map.
    pub row: u32,
    /// Column index, 0 at the left of the map.
    pub column: u32,
}

/// Tile grid selected for a view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGrid {
    pub layer: u32,
    pub tiles_per_dimension: u32,
    pub tile_side: f32,
}

impl TileGrid {
    pub fn for_layer(layer: u32) -> Self {
        let tiles_per_dimension = 1u32 << layer;
        TileGrid {
            layer,
            tiles_per_dimension,
            tile_side: (MAP_EXTENT as f64 / tiles_per_dimension as f64) as f32,
        }
    }
}

/// Picks the level of detail for a camera and lists the tiles covering its view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileEnumerator {
    reference_tile_px: f32,
    max_layer: u32,
}

impl Default for TileEnumerator {
    fn default() -> Self {
        TileEnumerator {
            reference_tile_px: REFERENCE_TILE_PX,
            max_layer: MAX_LAYER,
        }
    }
}

impl TileEnumerator {
    /// `max_layer` is capped at [`MAX_LAYER`].
    pub fn new(reference_tile_px: f32, max_layer: u32) -> Result<Self, MapViewError> {
        if !is_positive(reference_tile_px) {
            return Err(MapViewError::InvalidTileSize(reference_tile_px));
        }
        Ok(TileEnumerator {
            reference_tile_px,
            max_layer: max_layer.min(MAX_LAYER),
        })
    }

    pub fn reference_tile_px(&self) -> f32 {
        self.reference_tile_px
    }

    pub fn max_layer(&self) -> u32 {
        self.max_layer
    }

    /// Selects the coarsest grid whose tiles are still about
    /// `reference_tile_px` pixels or larger on screen.
    pub fn grid(&self, camera: &Camera) -> TileGrid {
        self.grid_for_box(camera, &camera.bounding_box())
    }

    fn grid_for_box(&self, camera: &Camera, bbox: &BoundingBox) -> TileGrid {
        // Measure only along the dominant axis so aspect ratio and rotation do
        // not skew the density.
        let (span, span_vec) = if bbox.width() > bbox.height() {
            (bbox.width(), Vec2::new(bbox.width(), 0.0))
        } else {
            (bbox.height(), Vec2::new(0.0, bbox.height()))
        };

        let map_to_window = clip_to_window(camera.window_size()) * camera.map_to_clip_matrix();
        // A displacement, so only the linear part of the matrix applies.
        let pixels = map_to_window
            .transform_vector3(glam::vec3(span_vec.x, span_vec.y, 0.0))
            .truncate()
            .length();

        let raw = (MAP_EXTENT as f64 / span as f64 * pixels as f64
            / self.reference_tile_px as f64)
            .log2()
            .floor();

        let layer = if raw.is_nan() || raw < 0.0 {
            debug!("layer {} clamped to 0", raw);
            0
        } else if raw > self.max_layer as f64 {
            debug!("layer {} clamped to {}", raw, self.max_layer);
            self.max_layer
        } else {
            raw as u32
        };

        TileGrid::for_layer(layer)
    }

    /// Lists the tiles covering the camera's bounding box.
    ///
    /// Candidates are walked row-major from the box's top-left corner, one
    /// extra row and column past the box so misalignment with the grid never
    /// leaves a gap. Candidates off the map are dropped. Because the box
    /// over-approximates a rotated view, a few returned tiles may be outside the
    /// window.
    pub fn tiles(&self, camera: &Camera) -> Vec<TileDescriptor> {
        let bbox = camera.bounding_box();
        let grid = self.grid_for_box(camera, &bbox);

        let n = grid.tiles_per_dimension as f64;
        let side = grid.tile_side as f64;
        let columns = (bbox.width() as f64 / side).ceil() as u64 + 1;
        let rows = (bbox.height() as f64 / side).ceil() as u64 + 1;

        let mut output = Vec::with_capacity((columns * rows) as usize);
        for j in 0..rows {
            let y = bbox.top as f64 - j as f64 * side;
            let row = ((1.0 - y) / 2.0 * n).floor();
            if row < 0.0 || row >= n {
                continue;
            }

            for i in 0..columns {
                let x = bbox.left as f64 + i as f64 * side;
                let column = ((x + 1.0) / 2.0 * n).floor();
                if column < 0.0 || column >= n {
                    continue;
                }

                output.push(TileDescriptor {
                    center: Vec2::new(
                        (column / n * 2.0 - 1.0 + side / 2.0) as f32,
                        (row / n * -2.0 + 1.0 - side / 2.0) as f32,
                    ),
                    side: grid.tile_side,
                    row: row as u32,
                    column: column as u32,
                });
            }
        }

        trace!(
            "layer {}: {} tiles from {}x{} candidates",
            grid.layer,
            output.len(),
            columns,
            rows
        );
        output
    }
}
