use foundation::color::Color;
use scene::World;
use scene::components::{ComponentDrawable, GeometryId, Material, Transform};
use scene::entity::EntityId;

use crate::camera::Camera;
use crate::texture::{TextureHandle, TextureLibrary};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(intensity: f32) -> Self {
        Self {
            color: Color::WHITE,
            intensity,
        }
    }
}

/// One drawable flattened out of the scene, ready for the host renderer.
///
/// Positions are world-resolved (attachments applied); textures are resolved
/// against the library, `None` while still loading.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCommand {
    pub entity: EntityId,
    pub transform: Transform,
    pub geometry: GeometryId,
    pub material: Material,
    pub texture: Option<TextureHandle>,
    pub side_material: Option<Material>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub ambient: AmbientLight,
    pub commands: Vec<RenderCommand>,
}

pub struct Renderer;

impl Renderer {
    /// Flatten the world into an ordered command list.
    ///
    /// Pure with respect to the world: collection never mutates scene state,
    /// so it always runs last in the frame (after animation and picking have
    /// settled).
    pub fn collect(
        world: &World,
        _camera: &Camera,
        ambient: AmbientLight,
        textures: &TextureLibrary,
    ) -> RenderFrame {
        let mut commands = Vec::new();
        for (entity, transform, drawable) in world.drawables_by_entity() {
            let ComponentDrawable {
                geometry,
                material,
                side_material,
            } = drawable;

            let mut transform = transform;
            if let Some(position) = world.world_position(entity) {
                transform.position = position;
            }

            let texture = material
                .texture()
                .and_then(|t| textures.get(&t.key));

            commands.push(RenderCommand {
                entity,
                transform,
                geometry,
                material,
                texture,
                side_material,
            });
        }

        RenderFrame { ambient, commands }
    }
}
