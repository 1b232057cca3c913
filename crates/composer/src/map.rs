use foundation::color::Color;
use foundation::math::{GeoPoint, Projector, Vec3};
use formats::{Font, Region, RegionSet};
use layers::{
    BoundaryStyle, RegionStyle, build_axes, build_beacon, build_boundary_band, build_ground,
    build_label, build_location_marker, build_region, face_camera,
};
use render::{AmbientLight, Camera, RenderFrame, Renderer, TextureHandle, TextureLibrary};
use runtime::{Clock, Frame, LoadQueue, LoadRequest};
use scene::World;
use scene::components::{Material, TextureRef};
use scene::entity::EntityId;

use crate::config::MapOptions;
use crate::error::MapError;
use crate::picker::{NO_REGION, OutlineRegistry, PickController, SurfaceRect};

/// Load-queue keys for the resources one map composition needs.
pub const FONT_KEY: &str = "font";
pub const MAP_TEXTURE_KEY: &str = "texture:map";
pub const GROUND_TEXTURE_KEY: &str = "texture:ground";
pub const MARKER_TEXTURE_KEY: &str = "texture:marker";

const REGION_EXTRUDE_DEPTH: f64 = 0.005;
const REGION_BORDER_COLOR: u32 = 0x85BFEF;
const BAND_LOWER_COLOR: u32 = 0x96F0EF;
const BAND_UPPER_COLOR: u32 = 0x70D7FC;
const LABEL_SIZE: f64 = 0.1;
const LABEL_LIFT: f64 = 0.1;
const BEACON_LIFT: f64 = 0.12;
const AXES_SIZE: f64 = 5.0;

/// Payload delivered by the host for a completed load.
#[derive(Debug, Clone)]
pub enum ResourceData {
    Font(Font),
    Texture(TextureHandle),
}

pub type OnClick = Box<dyn FnMut(&Region)>;

/// Composes and animates one interactive extruded map.
///
/// Owns the scene world, the picking controller and the resource plumbing.
/// The host drives it with `pointer_moved`/`clicked` events, fulfils
/// `pending_loads`, and calls `advance_frame` once per display refresh.
pub struct MapComposer {
    dataset: RegionSet,
    options: MapOptions,
    projector: Projector,
    world: World,
    camera: Camera,
    clock: Clock,
    frame: Frame,
    loads: LoadQueue<ResourceData>,
    textures: TextureLibrary,
    font: Option<Font>,
    picker: PickController,
    outlines: OutlineRegistry,
    surface: SurfaceRect,
    on_click: Option<OnClick>,
    detached: bool,
    labels_built: bool,
    ground_built: bool,
    locations_built: bool,
}

impl MapComposer {
    /// Build a composer and compose the initial scene.
    ///
    /// Fails with `RegionNotFound` when the projection anchor cannot be
    /// resolved; nothing of the scene survives a failed construction.
    pub fn new(
        dataset: RegionSet,
        options: MapOptions,
        surface: SurfaceRect,
    ) -> Result<Self, MapError> {
        let center = resolve_center(&dataset, &options)?;
        let camera = camera_for(&options);

        let mut composer = Self {
            projector: Projector::new(center),
            camera,
            dataset,
            options,
            world: World::new(),
            clock: Clock::new(),
            frame: Frame::first(),
            loads: LoadQueue::new(),
            textures: TextureLibrary::new(),
            font: None,
            picker: PickController::new(),
            outlines: OutlineRegistry::new(),
            surface,
            on_click: None,
            detached: false,
            labels_built: false,
            ground_built: false,
            locations_built: false,
        };
        composer.compose()?;
        Ok(composer)
    }

    /// Swap in a new configuration and rebuild the scene from scratch.
    pub fn change_options(&mut self, options: MapOptions) -> Result<(), MapError> {
        let center = resolve_center(&self.dataset, &options)?;
        self.projector = Projector::new(center);
        self.camera = camera_for(&options);
        self.options = options;
        self.compose()
    }

    /// Discard the previous scene subtree and compose a fresh one.
    ///
    /// Advances the liveness epoch first, so any load continuation still in
    /// flight against the old scene is dropped at the queue boundary.
    fn compose(&mut self) -> Result<(), MapError> {
        self.loads.advance_epoch();
        self.world.clear();
        self.outlines.clear();
        self.picker.reset();
        self.labels_built = false;
        self.ground_built = false;
        self.locations_built = false;

        self.request_resources();
        self.build_regions();
        if self.font.is_some() {
            self.build_labels()?;
        }
        self.build_boundary_bands();
        if self.textures.get(GROUND_TEXTURE_KEY).is_some() {
            self.build_ground_plane();
        }
        if self.textures.get(MARKER_TEXTURE_KEY).is_some() {
            self.build_location_markers()?;
        }
        if self.options.debug {
            build_axes(&mut self.world, AXES_SIZE);
        }
        Ok(())
    }

    fn request_resources(&mut self) {
        if self.font.is_none() {
            if let Some(source) = self.options.font_source.clone() {
                self.loads.request(FONT_KEY, source);
            }
        }
        for (key, source) in [
            (MAP_TEXTURE_KEY, self.options.map_texture.clone()),
            (GROUND_TEXTURE_KEY, self.options.ground_texture.clone()),
            (MARKER_TEXTURE_KEY, self.options.marker_texture.clone()),
        ] {
            if self.textures.get(key).is_none() {
                if let Some(source) = source {
                    self.loads.request(key, source);
                }
            }
        }
    }

    fn region_style(&self) -> RegionStyle {
        RegionStyle {
            extrude_depth: REGION_EXTRUDE_DEPTH,
            cap_material: Material::Standard {
                texture: self.options.map_texture.as_ref().map(|_| {
                    TextureRef::new(MAP_TEXTURE_KEY)
                        .with_repeat(0.2, 0.3)
                        .with_center(0.5, 0.5)
                }),
                color: None,
                opacity: 0.65,
            },
            border_color: Color::from_hex(REGION_BORDER_COLOR),
            border_width: 2.0,
            z_offset: self.options.depth,
            base_depth: self.options.depth,
        }
    }

    fn build_regions(&mut self) {
        let style = self.region_style();
        for region in &self.dataset.regions {
            let built = build_region(&mut self.world, &self.projector, region, &style);
            for (code, outline) in built.outlines {
                self.outlines.register(code, outline);
            }

            if self.options.actives.contains(&region.adcode) {
                let planar = self.projector.project(region.center);
                build_beacon(
                    &mut self.world,
                    Vec3::new(planar.x, planar.y, self.options.depth + BEACON_LIFT),
                );
            }
        }
    }

    /// Place one label over each feature's representative point. Requires
    /// the font continuation to have delivered.
    fn build_labels(&mut self) -> Result<(), MapError> {
        let font = self.font.as_ref().ok_or(MapError::FontNotReady)?;
        for region in &self.dataset.regions {
            let planar = self.projector.project(region.center);
            build_label(
                &mut self.world,
                font,
                &region.name,
                LABEL_SIZE,
                Color::WHITE,
                Vec3::new(planar.x, planar.y, self.options.depth + LABEL_LIFT),
            );
        }
        self.labels_built = true;
        Ok(())
    }

    fn build_boundary_bands(&mut self) {
        let depth = self.options.depth;
        let bands = [
            (-depth / 2.0, BAND_LOWER_COLOR),
            (-depth / 4.0, BAND_UPPER_COLOR),
        ];
        let rings = self.dataset.boundary_rings();
        for (z, color) in bands {
            build_boundary_band(
                &mut self.world,
                &self.projector,
                &rings,
                &BoundaryStyle {
                    z,
                    color: Color::from_hex(color),
                    width: 1.2,
                    base_depth: depth,
                },
            );
        }
    }

    fn build_ground_plane(&mut self) {
        build_ground(&mut self.world, GROUND_TEXTURE_KEY);
        self.ground_built = true;
    }

    fn build_location_markers(&mut self) -> Result<(), MapError> {
        for location in self.options.locations.clone() {
            build_location_marker(
                &mut self.world,
                &self.projector,
                location,
                MARKER_TEXTURE_KEY,
                self.options.depth,
            )?;
        }
        self.locations_built = true;
        Ok(())
    }

    /// Public label placement, for host-driven annotations.
    pub fn place_label(&mut self, text: &str, anchor: Vec3) -> Result<EntityId, MapError> {
        let font = self.font.as_ref().ok_or(MapError::FontNotReady)?;
        Ok(build_label(
            &mut self.world,
            font,
            text,
            LABEL_SIZE,
            Color::WHITE,
            anchor,
        ))
    }

    /// Requests the host should fetch. Draining transfers ownership; the
    /// host answers with `fulfil`.
    pub fn pending_loads(&mut self) -> Vec<LoadRequest> {
        self.loads.take_pending()
    }

    /// Host delivery of a fetched resource. Stale deliveries (older epoch)
    /// are dropped when the next frame drains the queue.
    pub fn fulfil(&mut self, request: LoadRequest, data: ResourceData) {
        self.loads.complete(request, data);
    }

    /// Run one animation frame and flatten the scene for rendering.
    ///
    /// Frame ordering is fixed: drain loads, advance the clock, spin update,
    /// billboard re-orientation, picking (lower before raise), then collect.
    pub fn advance_frame(&mut self, now_s: f64) -> Result<RenderFrame, MapError> {
        self.drain_loads()?;

        let dt = self.clock.tick(now_s);
        self.frame = self.frame.advance(dt);

        for (entity, spin) in self.world.spinners_by_entity() {
            self.world.rotate_z(entity, spin.rate_rad_per_s * dt);
        }

        face_camera(&mut self.world, self.camera.rotation());

        self.picker.step(&mut self.world, &self.camera, &self.outlines);

        Ok(Renderer::collect(
            &self.world,
            &self.camera,
            AmbientLight::new(self.options.light_intensity),
            &self.textures,
        ))
    }

    fn drain_loads(&mut self) -> Result<(), MapError> {
        // Torn-down maps keep their frame loop alive but must not let late
        // continuations touch the scene.
        if self.detached {
            self.loads.drain_live();
            return Ok(());
        }

        for (request, data) in self.loads.drain_live() {
            match data {
                ResourceData::Font(font) => {
                    self.font = Some(font);
                    if !self.labels_built {
                        self.build_labels()?;
                    }
                }
                ResourceData::Texture(handle) => {
                    self.textures.insert(request.key.clone(), handle);
                    match request.key.as_str() {
                        GROUND_TEXTURE_KEY if !self.ground_built => self.build_ground_plane(),
                        MARKER_TEXTURE_KEY if !self.locations_built => {
                            self.build_location_markers()?;
                        }
                        // Region caps resolve their texture at collect time.
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    /// Pointer-move event in client coordinates. Ignored after `detach`.
    pub fn pointer_moved(&mut self, client_x: f64, client_y: f64) {
        if self.detached {
            return;
        }
        self.picker.pointer_moved(self.surface.to_ndc(client_x, client_y));
    }

    /// Click event. Fires the selection callback at most once, and only when
    /// a region is under the pointer.
    pub fn clicked(&mut self) {
        if self.detached {
            return;
        }
        let code = self.picker.hovered();
        if code == NO_REGION {
            return;
        }
        if let Some(region) = self.dataset.find(code) {
            if let Some(on_click) = self.on_click.as_mut() {
                on_click(region);
            }
        }
    }

    pub fn set_on_click(&mut self, on_click: OnClick) {
        self.on_click = Some(on_click);
    }

    /// Unbind pointer input and kill pending-load liveness. Does not stop
    /// the frame loop; late load completions are dropped, not cancelled.
    pub fn detach(&mut self) {
        self.detached = true;
        self.loads.advance_epoch();
    }

    pub fn hovered(&self) -> u64 {
        self.picker.hovered()
    }

    pub fn hovered_region(&self) -> Option<&Region> {
        match self.picker.hovered() {
            NO_REGION => None,
            code => self.dataset.find(code),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }
}

fn camera_for(options: &MapOptions) -> Camera {
    Camera::look_at(
        Vec3::new(options.camera[0], options.camera[1], options.camera[2]),
        Vec3::ZERO,
        75f64.to_radians(),
        options.width / options.height,
        0.1,
        1000.0,
    )
}

fn resolve_center(dataset: &RegionSet, options: &MapOptions) -> Result<GeoPoint, MapError> {
    if let Some(center) = options.center {
        return Ok(center);
    }
    let adcode = options.adcode.unwrap_or(NO_REGION);
    if dataset.adcode == Some(adcode) {
        if let Some(center) = dataset.center {
            return Ok(center);
        }
    }
    dataset
        .find(adcode)
        .map(|region| region.center)
        .ok_or(MapError::RegionNotFound { adcode })
}
