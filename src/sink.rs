use crate::tiles::TileDescriptor;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Receives what the renderer needs each frame: the tiles to draw and the
/// map -> clip matrix to draw them with.
pub trait TileSink {
    fn draw(&mut self, tiles: &[TileDescriptor], map_to_clip: Mat4);
}

/// Per-tile instance data, laid out for a GPU instance buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TileInstance {
    pub center: [f32; 2],
    pub side: f32,
    pub row: u32,
    pub column: u32,
}

impl From<&TileDescriptor> for TileInstance {
    fn from(tile: &TileDescriptor) -> Self {
        TileInstance {
            center: tile.center.to_array(),
            side: tile.side,
            row: tile.row,
            column: tile.column,
        }
    }
}

/// Column-major map -> clip matrix, laid out for a uniform buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ClipUniform {
    pub map_to_clip: [[f32; 4]; 4],
}

impl From<Mat4> for ClipUniform {
    fn from(mat: Mat4) -> Self {
        ClipUniform {
            map_to_clip: mat.to_cols_array_2d(),
        }
    }
}

/// A sink that keeps the last frame packed and ready for upload.
#[derive(Clone, Debug)]
pub struct InstanceBatch {
    pub instances: Vec<TileInstance>,
    pub uniform: ClipUniform,
}

impl Default for InstanceBatch {
    fn default() -> Self {
        InstanceBatch {
            instances: Vec::new(),
            uniform: Mat4::IDENTITY.into(),
        }
    }
}

impl InstanceBatch {
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn uniform_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.uniform)
    }
}

impl TileSink for InstanceBatch {
    fn draw(&mut self, tiles: &[TileDescriptor], map_to_clip: Mat4) {
        self.instances.clear();
        self.instances.extend(tiles.iter().map(TileInstance::from));
        self.uniform = map_to_clip.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::mem::size_of;

    #[test]
    fn instance_pod_layout() {
        // [f32;2] + f32 + u32 + u32 => 8 + 4 + 4 + 4 = 20 bytes, no padding
        assert_eq!(size_of::<TileInstance>(), 20);
        assert_eq!(size_of::<ClipUniform>(), 64);
    }

    #[test]
    fn batch_replaces_previous_frame() {
        let tile = TileDescriptor {
            center: Vec2::new(0.5, -0.5),
            side: 1.0,
            row: 1,
            column: 1,
        };
        let mut batch = InstanceBatch::default();
        batch.draw(&[tile, tile], Mat4::IDENTITY);
        batch.draw(&[tile], Mat4::from_scale(glam::vec3(2.0, 2.0, 1.0)));

        assert_eq!(batch.instances.len(), 1);
        assert_eq!(batch.instances[0].center, [0.5, -0.5]);
        assert_eq!(batch.instance_bytes().len(), 20);
        assert_eq!(batch.uniform.map_to_clip[0][0], 2.0);
        assert_eq!(batch.uniform_bytes().len(), 64);
    }
}
