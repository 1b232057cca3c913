use crate::components::{
    Attached, Billboard, ComponentBounds, ComponentDrawable, Geometry, GeometryId, Spin, Tag,
    Transform, Visibility,
};
use crate::entity::EntityId;
use foundation::handles::Handle;
use foundation::math::Vec3;

/// Flat entity/component store for one composed map scene.
///
/// The scene is rebuilt wholesale on every configuration change (`clear` then
/// re-compose); there is no incremental diffing, and entity ids from a
/// previous composition are invalid after `clear`.
#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    transforms: Vec<Option<Transform>>,
    bounds: Vec<Option<ComponentBounds>>,
    visibility: Vec<Option<Visibility>>,
    tags: Vec<Option<Tag>>,
    drawables: Vec<Option<ComponentDrawable>>,
    spins: Vec<Option<Spin>>,
    billboards: Vec<Option<Billboard>>,
    attachments: Vec<Option<Attached>>,
    geometries: Vec<Geometry>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(Handle::new(self.next_index, 0));
        self.next_index += 1;
        self.ensure_capacity(id.index() as usize);
        id
    }

    /// Discard the whole scene subtree. The next composition starts from an
    /// empty store.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn entity_count(&self) -> u32 {
        self.next_index
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        let id = GeometryId(self.geometries.len() as u32);
        self.geometries.push(geometry);
        id
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.0 as usize)
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        self.ensure_capacity(entity.index() as usize);
        self.transforms[entity.index() as usize] = Some(transform);
    }

    pub fn set_bounds(&mut self, entity: EntityId, bounds: ComponentBounds) {
        self.ensure_capacity(entity.index() as usize);
        self.bounds[entity.index() as usize] = Some(bounds);
    }

    pub fn set_visibility(&mut self, entity: EntityId, visibility: Visibility) {
        self.ensure_capacity(entity.index() as usize);
        self.visibility[entity.index() as usize] = Some(visibility);
    }

    pub fn set_tag(&mut self, entity: EntityId, tag: Tag) {
        self.ensure_capacity(entity.index() as usize);
        self.tags[entity.index() as usize] = Some(tag);
    }

    pub fn set_drawable(&mut self, entity: EntityId, drawable: ComponentDrawable) {
        self.ensure_capacity(entity.index() as usize);
        self.drawables[entity.index() as usize] = Some(drawable);
    }

    pub fn set_spin(&mut self, entity: EntityId, spin: Spin) {
        self.ensure_capacity(entity.index() as usize);
        self.spins[entity.index() as usize] = Some(spin);
    }

    pub fn set_billboard(&mut self, entity: EntityId) {
        self.ensure_capacity(entity.index() as usize);
        self.billboards[entity.index() as usize] = Some(Billboard);
    }

    pub fn set_attached(&mut self, entity: EntityId, attached: Attached) {
        self.ensure_capacity(entity.index() as usize);
        self.attachments[entity.index() as usize] = Some(attached);
    }

    pub fn transform(&self, entity: EntityId) -> Option<Transform> {
        self.transforms.get(entity.index() as usize).and_then(|t| *t)
    }

    pub fn bounds(&self, entity: EntityId) -> Option<ComponentBounds> {
        self.bounds.get(entity.index() as usize).and_then(|b| *b)
    }

    pub fn tag(&self, entity: EntityId) -> Option<&Tag> {
        self.tags.get(entity.index() as usize).and_then(|t| t.as_ref())
    }

    pub fn attached(&self, entity: EntityId) -> Option<Attached> {
        self.attachments
            .get(entity.index() as usize)
            .and_then(|a| *a)
    }

    fn is_visible(&self, idx: usize) -> bool {
        self.visibility
            .get(idx)
            .and_then(|v| *v)
            .map(|v| v.visible)
            .unwrap_or(true)
    }

    /// Shift an entity along z (highlight raise/lower).
    pub fn translate_z(&mut self, entity: EntityId, dz: f64) {
        if let Some(Some(t)) = self.transforms.get_mut(entity.index() as usize) {
            t.position.z += dz;
        }
    }

    /// Advance an entity's z-axis rotation (beacon spin).
    pub fn rotate_z(&mut self, entity: EntityId, delta_rad: f64) {
        if let Some(Some(t)) = self.transforms.get_mut(entity.index() as usize) {
            t.rotation.z += delta_rad;
        }
    }

    /// Overwrite an entity's rotation (billboarding).
    pub fn set_rotation(&mut self, entity: EntityId, rotation: Vec3) {
        if let Some(Some(t)) = self.transforms.get_mut(entity.index() as usize) {
            t.rotation = rotation;
        }
    }

    /// World-space position: the entity's own position, plus its anchor's
    /// when attached (one level).
    pub fn world_position(&self, entity: EntityId) -> Option<Vec3> {
        let own = self.transform(entity)?.position;
        match self.attached(entity) {
            Some(attached) => {
                let anchor = self.transform(attached.anchor)?.position;
                Some(anchor + own)
            }
            None => Some(own),
        }
    }

    /// Visible drawable entities with their transforms, in spawn order.
    pub fn drawables_by_entity(&self) -> Vec<(EntityId, Transform, ComponentDrawable)> {
        let mut out = Vec::new();
        for (idx, drawable) in self.drawables.iter().enumerate() {
            let Some(drawable) = drawable else { continue };
            let Some(transform) = self.transforms.get(idx).and_then(|t| *t) else {
                continue;
            };
            if !self.is_visible(idx) {
                continue;
            }
            out.push((
                EntityId(Handle::new(idx as u32, 0)),
                transform,
                drawable.clone(),
            ));
        }
        out
    }

    /// Visible entities that can be hit-tested: transform + bounds.
    pub fn pickables_by_entity(&self) -> Vec<(EntityId, Transform, ComponentBounds)> {
        let mut out = Vec::new();
        for (idx, bounds) in self.bounds.iter().enumerate() {
            let Some(bounds) = bounds else { continue };
            let Some(transform) = self.transforms.get(idx).and_then(|t| *t) else {
                continue;
            };
            if !self.is_visible(idx) {
                continue;
            }
            out.push((EntityId(Handle::new(idx as u32, 0)), transform, *bounds));
        }
        out
    }

    /// Entities carrying a `Spin` component.
    pub fn spinners_by_entity(&self) -> Vec<(EntityId, Spin)> {
        let mut out = Vec::new();
        for (idx, spin) in self.spins.iter().enumerate() {
            let Some(spin) = spin else { continue };
            out.push((EntityId(Handle::new(idx as u32, 0)), *spin));
        }
        out
    }

    /// Entities carrying a `Billboard` component.
    pub fn billboards_by_entity(&self) -> Vec<EntityId> {
        let mut out = Vec::new();
        for (idx, billboard) in self.billboards.iter().enumerate() {
            if billboard.is_some() {
                out.push(EntityId(Handle::new(idx as u32, 0)));
            }
        }
        out
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.transforms.len() <= idx {
            let new_len = idx + 1;
            self.transforms.resize(new_len, None);
            self.bounds.resize(new_len, None);
            self.visibility.resize(new_len, None);
            self.tags.resize(new_len, None);
            self.drawables.resize(new_len, None);
            self.spins.resize(new_len, None);
            self.billboards.resize(new_len, None);
            self.attachments.resize(new_len, None);
        }
    }
}
