//! Drives the camera without a window and prints the tiles each step selects.
//!
//! Run with `RUST_LOG=debug cargo run --example headless` to see limit
//! corrections as they happen.

use mapview::{InstanceBatch, MapView, ViewConfig};
use std::f32::consts::FRAC_PI_4;

fn main() -> Result<(), Box<dyn std::error::Error + 'static>> {
    env_logger::init();

    let config = ViewConfig::from_json_str(r#"{ "view_width": 2.0 }"#)?;
    let mut view = MapView::new(&config, 1280, 720)?;
    let mut batch = InstanceBatch::default();

    let steps: [(&str, fn(&mut MapView)); 5] = [
        ("initial", |_| {}),
        ("zoom in 4x at cursor", |v| v.camera_mut().zoom(0.25, 900.0, 200.0)),
        ("drag 300px left", |v| v.camera_mut().pan(-300.0, 0.0)),
        ("rotate 45 degrees", |v| v.camera_mut().rotate(FRAC_PI_4, 640.0, 360.0)),
        ("zoom out past the map", |v| v.camera_mut().zoom(10.0, 640.0, 360.0)),
    ];

    for (label, step) in steps {
        step(&mut view);
        view.render_to(&mut batch);

        let camera = view.camera();
        let grid = view.grid();
        println!(
            "{label}: center {:?} size {:?} angle {:.3} -> layer {} ({} tiles, {} bytes)",
            camera.center(),
            camera.size(),
            camera.angle(),
            grid.layer,
            batch.instances.len(),
            batch.instance_bytes().len(),
        );
        for tile in &batch.instances {
            println!("    row {:>3} column {:>3} at {:?}", tile.row, tile.column, tile.center);
        }
    }

    Ok(())
}
