use crate::World;
use crate::entity::EntityId;

/// Depth delta applied to a picked solid and its paired outline.
pub const RAISE_OFFSET: f64 = 0.02;

/// Two-slot highlight state: at most one raised solid and one raised outline
/// at any time.
///
/// Invariant: raising a new entity always lowers the previous one first, by
/// the additive inverse of the same offset — never an absolute reset — so any
/// sequence of hover-enter/hover-exit cycles leaves every entity at exactly
/// its resting depth once it is no longer picked.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightState {
    offset: f64,
    solid: Option<EntityId>,
    outline: Option<EntityId>,
}

impl Default for HighlightState {
    fn default() -> Self {
        Self::new(RAISE_OFFSET)
    }
}

impl HighlightState {
    pub fn new(offset: f64) -> Self {
        Self {
            offset,
            solid: None,
            outline: None,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn active_solid(&self) -> Option<EntityId> {
        self.solid
    }

    pub fn active_outline(&self) -> Option<EntityId> {
        self.outline
    }

    /// Lower whatever is currently raised and empty both slots. Runs
    /// unconditionally at the top of every picking pass, before the new hit
    /// test.
    pub fn lower_active(&mut self, world: &mut World) {
        if let Some(entity) = self.solid.take() {
            world.translate_z(entity, -self.offset);
        }
        if let Some(entity) = self.outline.take() {
            world.translate_z(entity, -self.offset);
        }
    }

    /// Raise `entity` into the solid slot. The slot must be empty (call
    /// `lower_active` first).
    pub fn raise_solid(&mut self, world: &mut World, entity: EntityId) {
        debug_assert!(self.solid.is_none());
        world.translate_z(entity, self.offset);
        self.solid = Some(entity);
    }

    /// Raise `entity` into the outline slot. The slot must be empty.
    pub fn raise_outline(&mut self, world: &mut World, entity: EntityId) {
        debug_assert!(self.outline.is_none());
        world.translate_z(entity, self.offset);
        self.outline = Some(entity);
    }
}
