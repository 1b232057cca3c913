use std::env;
use std::error::Error;
use std::fs;

use composer::{FONT_KEY, MapComposer, MapOptions, ResourceData, SurfaceRect};
use formats::{Font, RegionSet};
use render::TextureHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SURFACE_WIDTH: f64 = 800.0;
const SURFACE_HEIGHT: f64 = 600.0;

/// Headless driver for the map composer: loads a dataset and font from disk,
/// fulfils resource loads the way a windowed host would, sweeps the pointer
/// across the surface for a few seconds of simulated frames, and logs what
/// the renderer would draw.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let dataset_path = args
        .next()
        .unwrap_or_else(|| asset_path("nantong.json"));
    let font_path = args.next().unwrap_or_else(|| asset_path("font.json"));

    let dataset = RegionSet::from_geojson_str(&fs::read_to_string(&dataset_path)?)?;
    info!(
        regions = dataset.regions.len(),
        name = dataset.name.as_deref().unwrap_or("?"),
        "dataset loaded"
    );

    let options = MapOptions {
        width: SURFACE_WIDTH,
        height: SURFACE_HEIGHT,
        adcode: dataset.adcode,
        camera: [0.0, -3.0, 3.5],
        map_texture: Some("assets/map.png".to_string()),
        ground_texture: Some("assets/ground.png".to_string()),
        marker_texture: Some("assets/glow.png".to_string()),
        font_source: Some(font_path),
        actives: dataset.regions.first().map(|r| r.adcode).into_iter().collect(),
        locations: dataset.center.into_iter().collect(),
        ..MapOptions::default()
    };

    let mut map = MapComposer::new(
        dataset,
        options,
        SurfaceRect::new(0.0, 0.0, SURFACE_WIDTH, SURFACE_HEIGHT),
    )?;
    map.set_on_click(Box::new(|region| {
        info!(adcode = region.adcode, name = %region.name, "region selected");
    }));

    fulfil_loads(&mut map);

    // Simulated 60 Hz loop; the pointer sweeps left to right across the map.
    let mut last_hovered = 0u64;
    let mut frame = map.advance_frame(0.0)?;
    for i in 1..=240u32 {
        let now_s = f64::from(i) / 60.0;
        let client_x = SURFACE_WIDTH * f64::from(i) / 240.0;
        map.pointer_moved(client_x, SURFACE_HEIGHT * 0.5);
        frame = map.advance_frame(now_s)?;

        let hovered = map.hovered();
        if hovered != last_hovered {
            match map.hovered_region() {
                Some(region) => info!(adcode = region.adcode, name = %region.name, "hover"),
                None => info!("hover left the map"),
            }
            last_hovered = hovered;
        }
    }

    // Click whatever ended up under the pointer.
    map.clicked();

    info!(
        frames = map.frame().index,
        commands = frame.commands.len(),
        ambient = f64::from(frame.ambient.intensity),
        "render summary"
    );
    Ok(())
}

/// Answer the composer's resource requests: the font is parsed from disk,
/// textures are stood in for with fresh handles (a windowed host would
/// upload pixels and mint these).
fn fulfil_loads(map: &mut MapComposer) {
    let mut next_handle = 1u64;
    for request in map.pending_loads() {
        if request.key == FONT_KEY {
            let font = fs::read_to_string(&request.source)
                .map_err(|e| e.to_string())
                .and_then(|payload| Font::from_json_str(&payload).map_err(|e| e.to_string()));
            match font {
                Ok(font) => {
                    info!(glyphs = font.glyph_count(), "font ready");
                    map.fulfil(request, ResourceData::Font(font));
                }
                Err(err) => warn!(%err, source = %request.source, "font load failed"),
            }
        } else {
            map.fulfil(request, ResourceData::Texture(TextureHandle(next_handle)));
            next_handle += 1;
        }
    }
}

fn asset_path(file: &str) -> String {
    format!("{}/assets/{file}", env!("CARGO_MANIFEST_DIR"))
}
