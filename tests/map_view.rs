use glam::{Mat4, Vec2};
use mapview::{InstanceBatch, MapView, TileDescriptor, TileSink, ViewConfig};
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

#[derive(Default)]
struct Recorder {
    frames: Vec<(Vec<TileDescriptor>, Mat4)>,
}

impl TileSink for Recorder {
    fn draw(&mut self, tiles: &[TileDescriptor], map_to_clip: Mat4) {
        self.frames.push((tiles.to_vec(), map_to_clip));
    }
}

#[test]
fn default_view_of_reference_window_is_one_tile() {
    let view = MapView::new(&ViewConfig::default(), 256, 256).unwrap();
    let frame = view.frame();

    assert_eq!(
        frame.tiles,
        vec![TileDescriptor {
            center: Vec2::ZERO,
            side: 2.0,
            row: 0,
            column: 0,
        }]
    );
    // Whole map, unrotated: only the y axis is flipped.
    assert_eq!(frame.map_to_clip, Mat4::from_scale(glam::vec3(1.0, -1.0, 1.0)));
}

#[test]
fn sink_receives_current_frame() {
    let config = ViewConfig::from_json_str(r#"{ "view_width": 1.0 }"#).unwrap();
    let view = MapView::new(&config, 512, 512).unwrap();

    let mut recorder = Recorder::default();
    view.render_to(&mut recorder);
    let frame = view.frame();
    assert_eq!(recorder.frames.len(), 1);
    assert_eq!(recorder.frames[0].0, frame.tiles);
    assert_eq!(recorder.frames[0].1, frame.map_to_clip);

    let mut batch = InstanceBatch::default();
    view.render_to(&mut batch);
    assert_eq!(batch.instances.len(), frame.tiles.len());
    assert_eq!(batch.uniform.map_to_clip, frame.map_to_clip.to_cols_array_2d());
}

#[test]
fn custom_reference_tile_size_changes_layer() {
    let small = ViewConfig::from_json_str(r#"{ "tiles": { "reference_tile_px": 128 } }"#).unwrap();
    let view = MapView::new(&small, 512, 512).unwrap();
    assert_eq!(view.grid().layer, 2);

    let default = MapView::new(&ViewConfig::default(), 512, 512).unwrap();
    assert_eq!(default.grid().layer, 1);
}

#[test]
fn invalid_config_is_rejected() {
    let bad_tiles = ViewConfig::from_json_str(r#"{ "tiles": { "reference_tile_px": 0 } }"#).unwrap();
    assert!(MapView::new(&bad_tiles, 512, 512).is_err());
    assert!(MapView::new(&ViewConfig::default(), 0, 512).is_err());
}

#[test]
fn window_events_reach_the_camera() {
    let mut view = MapView::new(&ViewConfig::default(), 400, 400).unwrap();
    view.handle_window_event(&WindowEvent::Resized(PhysicalSize::new(800, 400)));
    assert_eq!(view.camera().window_size(), Vec2::new(800.0, 400.0));

    view.camera_mut().zoom(0.25, 400.0, 200.0);
    let before = view.frame().tiles.len();
    assert!(before > 1);

    view.handle_window_event(&WindowEvent::CloseRequested);
    assert!(view.close_requested());
}
