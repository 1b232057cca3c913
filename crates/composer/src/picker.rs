use foundation::math::Vec2;
use render::Camera;
use scene::World;
use scene::entity::EntityId;
use scene::highlight::HighlightState;
use scene::picking::{PickOptions, intersect_ray};

/// Sentinel hovered code meaning "no active region".
pub const NO_REGION: u64 = 0;

/// Substring identifying region solids among intersection results.
const AREA_MARKER: &str = "area";

/// Render-surface rectangle in client coordinates, captured once at map
/// construction. It is not re-queried on resize (known limitation): pointer
/// math goes stale if the host moves the surface without rebuilding the map.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Client pixels to normalized device coordinates ([-1, 1] both axes,
    /// y up).
    pub fn to_ndc(&self, client_x: f64, client_y: f64) -> Vec2 {
        Vec2::new(
            ((client_x - self.left) / self.width) * 2.0 - 1.0,
            -((client_y - self.top) / self.height) * 2.0 + 1.0,
        )
    }
}

/// Flat collection of border outlines, searchable by region code.
///
/// The `area_`/`line_` code pairing is the picking controller's only way to
/// find the companion outline for a hit solid. A feature with several rings
/// registers several outlines under the same code; lookup returns the first,
/// matching how the companion is raised.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OutlineRegistry {
    entries: Vec<(u64, EntityId)>,
}

impl OutlineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, code: u64, entity: EntityId) {
        self.entries.push((code, entity));
    }

    pub fn find(&self, code: u64) -> Option<EntityId> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, e)| *e)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-frame hover picking: ray cast, lower-previous, raise-new.
///
/// State per frame: idle until the first pointer event arrives, then a
/// hit/miss decision every frame. The lower step runs unconditionally before
/// the new hit is applied, so moving off every region still restores resting
/// depths and repeated toggling cannot drift them.
#[derive(Debug, Default)]
pub struct PickController {
    pointer_ndc: Option<Vec2>,
    highlight: HighlightState,
    hovered: u64,
}

impl PickController {
    pub fn new() -> Self {
        Self {
            pointer_ndc: None,
            highlight: HighlightState::default(),
            hovered: NO_REGION,
        }
    }

    /// Latest pointer position in NDC. Until the first call, picking is
    /// skipped entirely.
    pub fn pointer_moved(&mut self, ndc: Vec2) {
        self.pointer_ndc = Some(ndc);
    }

    pub fn pointer_ndc(&self) -> Option<Vec2> {
        self.pointer_ndc
    }

    /// Currently hovered region code, `NO_REGION` when none.
    pub fn hovered(&self) -> u64 {
        self.hovered
    }

    /// Forget pointer and highlight state (configuration rebuild). The world
    /// is rebuilt from scratch alongside, so nothing needs lowering.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// One picking pass. No-op while no pointer data exists.
    pub fn step(&mut self, world: &mut World, camera: &Camera, outlines: &OutlineRegistry) {
        let Some(ndc) = self.pointer_ndc else {
            return;
        };

        // Intersections are gathered against the scene as rendered last
        // frame, before anything is lowered.
        let ray = camera.ray_from_ndc(ndc);
        let hits = intersect_ray(world, ray, PickOptions::default());

        self.highlight.lower_active(world);

        let hit = hits.iter().find(|hit| {
            world
                .tag(hit.entity)
                .is_some_and(|tag| tag.as_str().contains(AREA_MARKER))
        });

        match hit {
            Some(hit) => {
                let code = world
                    .tag(hit.entity)
                    .and_then(|tag| tag.code())
                    .unwrap_or(NO_REGION);
                self.highlight.raise_solid(world, hit.entity);
                if let Some(outline) = outlines.find(code) {
                    self.highlight.raise_outline(world, outline);
                }
                self.hovered = code;
            }
            None => {
                self.hovered = NO_REGION;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NO_REGION, OutlineRegistry, PickController, SurfaceRect};
    use foundation::math::{Vec2, Vec3};
    use render::Camera;
    use scene::World;
    use scene::components::{ComponentBounds, Tag, Transform};
    use scene::entity::EntityId;
    use scene::highlight::RAISE_OFFSET;

    fn overhead_camera() -> Camera {
        Camera::look_at(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            75f64.to_radians(),
            1.0,
            0.1,
            1000.0,
        )
    }

    fn spawn_region(world: &mut World, code: u64, x: f64) -> (EntityId, EntityId) {
        let solid = world.spawn();
        world.set_transform(solid, Transform::translate(Vec3::new(0.0, 0.0, 0.1)));
        world.set_bounds(
            solid,
            ComponentBounds::new(Vec3::new(x - 0.5, -0.5, 0.0), Vec3::new(x + 0.5, 0.5, 0.005)),
        );
        world.set_tag(solid, Tag::area(code));

        let outline = world.spawn();
        world.set_transform(outline, Transform::translate(Vec3::new(0.0, 0.0, 0.01)));
        world.set_tag(outline, Tag::line(code));
        (solid, outline)
    }

    #[test]
    fn surface_rect_maps_corners_to_ndc() {
        let rect = SurfaceRect::new(10.0, 20.0, 200.0, 100.0);
        assert_eq!(rect.to_ndc(10.0, 20.0), Vec2::new(-1.0, 1.0));
        assert_eq!(rect.to_ndc(210.0, 120.0), Vec2::new(1.0, -1.0));
        assert_eq!(rect.to_ndc(110.0, 70.0), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn no_picking_before_the_first_pointer_event() {
        let mut world = World::new();
        let (solid, _) = spawn_region(&mut world, 320600, 0.0);
        let mut controller = PickController::new();

        controller.step(&mut world, &overhead_camera(), &OutlineRegistry::new());
        assert_eq!(controller.hovered(), NO_REGION);
        assert_eq!(world.transform(solid).unwrap().position.z, 0.1);
    }

    #[test]
    fn hit_then_miss_raises_and_restores() {
        let mut world = World::new();
        let (solid, outline) = spawn_region(&mut world, 320600, 0.0);
        let mut registry = OutlineRegistry::new();
        registry.register(320600, outline);

        let camera = overhead_camera();
        let mut controller = PickController::new();

        // Frame 1: pointer over the region.
        controller.pointer_moved(Vec2::new(0.0, 0.0));
        controller.step(&mut world, &camera, &registry);
        assert_eq!(controller.hovered(), 320600);
        assert_eq!(world.transform(solid).unwrap().position.z, 0.1 + RAISE_OFFSET);
        assert_eq!(
            world.transform(outline).unwrap().position.z,
            0.01 + RAISE_OFFSET
        );

        // Frame 2: pointer off every region.
        controller.pointer_moved(Vec2::new(0.95, 0.95));
        controller.step(&mut world, &camera, &registry);
        assert_eq!(controller.hovered(), NO_REGION);
        assert_eq!(world.transform(solid).unwrap().position.z, 0.1);
        assert_eq!(world.transform(outline).unwrap().position.z, 0.01);
    }

    #[test]
    fn moving_between_regions_swaps_the_active_pair() {
        let mut world = World::new();
        let (a_solid, a_outline) = spawn_region(&mut world, 1001, -2.0);
        let (b_solid, b_outline) = spawn_region(&mut world, 1002, 2.0);
        let mut registry = OutlineRegistry::new();
        registry.register(1001, a_outline);
        registry.register(1002, b_outline);

        let camera = overhead_camera();
        let mut controller = PickController::new();

        // NDC that lands near x = -2 / +2 on the ground plane from 5 up.
        let ndc_for_x = |x: f64| {
            let tan = (0.5 * 75f64.to_radians()).tan();
            Vec2::new(x / (5.0 * tan), 0.0)
        };

        controller.pointer_moved(ndc_for_x(-2.0));
        controller.step(&mut world, &camera, &registry);
        assert_eq!(controller.hovered(), 1001);

        controller.pointer_moved(ndc_for_x(2.0));
        controller.step(&mut world, &camera, &registry);
        assert_eq!(controller.hovered(), 1002);
        assert_eq!(world.transform(a_solid).unwrap().position.z, 0.1);
        assert_eq!(world.transform(a_outline).unwrap().position.z, 0.01);
        assert_eq!(world.transform(b_solid).unwrap().position.z, 0.1 + RAISE_OFFSET);
    }

    #[test]
    fn hundreds_of_hover_cycles_leave_no_drift() {
        let mut world = World::new();
        let (solid, outline) = spawn_region(&mut world, 320600, 0.0);
        let mut registry = OutlineRegistry::new();
        registry.register(320600, outline);

        let camera = overhead_camera();
        let mut controller = PickController::new();
        for i in 0..500 {
            let ndc = if i % 2 == 0 {
                Vec2::new(0.0, 0.0)
            } else {
                Vec2::new(0.95, 0.95)
            };
            controller.pointer_moved(ndc);
            controller.step(&mut world, &camera, &registry);
        }
        // Last pass was a miss.
        assert_eq!(world.transform(solid).unwrap().position.z, 0.1);
        assert_eq!(world.transform(outline).unwrap().position.z, 0.01);
    }
}
