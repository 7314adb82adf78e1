//! Startup configuration.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is valid.

use crate::camera::Camera;
use crate::error::{MapViewError, is_positive};
use crate::tiles::{MAX_LAYER, REFERENCE_TILE_PX, TileEnumerator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Initial view center in map units.
    pub center: [f32; 2],
    /// Initial view angle in radians.
    pub angle: f32,
    /// Initial view width in map units. 2.0 shows the whole map.
    pub view_width: f32,
    pub tiles: TileConfig,
    pub input: InputConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            center: [0.0, 0.0],
            angle: 0.0,
            view_width: 2.0,
            tiles: TileConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl ViewConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MapViewError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn build_camera(
        &self,
        window_width: f32,
        window_height: f32,
    ) -> Result<Camera, MapViewError> {
        Camera::new(
            self.center[0],
            self.center[1],
            self.angle,
            self.view_width,
            window_width,
            window_height,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// On-screen size a tile is designed for, in pixels.
    pub reference_tile_px: f32,
    /// Deepest layer the enumerator may select.
    pub max_layer: u32,
}

impl Default for TileConfig {
    fn default() -> Self {
        TileConfig {
            reference_tile_px: REFERENCE_TILE_PX,
            max_layer: MAX_LAYER,
        }
    }
}

impl TileConfig {
    pub fn build_enumerator(&self) -> Result<TileEnumerator, MapViewError> {
        TileEnumerator::new(self.reference_tile_px, self.max_layer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Scale change per wheel line: one line up zooms by `1 - zoom_step`.
    pub zoom_step: f32,
    /// Radians per rotate key press.
    pub rotate_step: f32,
    /// Pixel wheel deltas are divided by this to get lines.
    pub pixels_per_line: f32,
    /// Pixels panned per arrow key press.
    pub key_pan_px: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            zoom_step: 0.1,
            rotate_step: 0.05,
            pixels_per_line: 100.0,
            key_pan_px: 32.0,
        }
    }
}

impl InputConfig {
    pub(crate) fn wheel_lines(&self, pixels: f32) -> f32 {
        if is_positive(self.pixels_per_line) {
            pixels / self.pixels_per_line
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ViewConfig::from_json_str("{}").unwrap(), ViewConfig::default());
    }

    #[test]
    fn default_tiles_allow_deepest_layer() {
        let tiles = TileConfig::default();
        assert_eq!(tiles.reference_tile_px, 256.0);
        assert_eq!(tiles.max_layer, 31);
        assert_eq!(tiles.build_enumerator().unwrap().max_layer(), 31);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = ViewConfig::from_json_str(
            r#"{ "center": [0.5, -0.25], "tiles": { "reference_tile_px": 512 } }"#,
        )
        .unwrap();
        assert_eq!(config.center, [0.5, -0.25]);
        assert_eq!(config.view_width, 2.0);
        assert_eq!(config.tiles.reference_tile_px, 512.0);
        assert_eq!(config.tiles.max_layer, MAX_LAYER);
        assert_eq!(config.input, InputConfig::default());
    }

    #[test]
    fn malformed_document_is_config_error() {
        assert!(matches!(
            ViewConfig::from_json_str("{ \"angle\": \"north\" }"),
            Err(MapViewError::Config(_))
        ));
    }

    #[test]
    fn builds_validated_camera() {
        let config = ViewConfig {
            view_width: 1.0,
            ..ViewConfig::default()
        };
        let camera = config.build_camera(400.0, 200.0).unwrap();
        assert_eq!(camera.size().x, 1.0);
        assert!(config.build_camera(400.0, 0.0).is_err());
    }
}
