use foundation::color::Color;
use foundation::math::Vec2;

/// Reference to a host-loaded texture by stable key, plus wrap settings.
///
/// The scene never owns pixel data; resolution to a concrete handle happens
/// at render-collect time against the texture library.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRef {
    pub key: String,
    pub repeat: Vec2,
    pub center: Vec2,
}

impl TextureRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            repeat: Vec2::new(1.0, 1.0),
            center: Vec2::new(0.0, 0.0),
        }
    }

    pub fn with_repeat(mut self, x: f64, y: f64) -> Self {
        self.repeat = Vec2::new(x, y);
        self
    }

    pub fn with_center(mut self, x: f64, y: f64) -> Self {
        self.center = Vec2::new(x, y);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Lit, optionally textured surface (region caps, ground).
    Standard {
        texture: Option<TextureRef>,
        color: Option<Color>,
        opacity: f32,
    },
    /// Unlit fill.
    Basic { color: Color, opacity: f32 },
    /// Line color and screen-space width.
    Line {
        color: Color,
        width: f32,
        opacity: f32,
    },
    /// Camera-facing textured quad; `additive` selects additive blending and
    /// `depth_test: false` lets the glow draw over its anchor.
    Sprite {
        texture: TextureRef,
        color: Color,
        additive: bool,
        depth_test: bool,
    },
}

impl Material {
    pub fn basic(color: Color) -> Self {
        Material::Basic {
            color,
            opacity: 1.0,
        }
    }

    pub fn line(color: Color, width: f32) -> Self {
        Material::Line {
            color,
            width,
            opacity: 1.0,
        }
    }

    /// The texture reference this material samples, if any.
    pub fn texture(&self) -> Option<&TextureRef> {
        match self {
            Material::Standard { texture, .. } => texture.as_ref(),
            Material::Sprite { texture, .. } => Some(texture),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Material, TextureRef};
    use foundation::color::Color;

    #[test]
    fn texture_ref_defaults_to_whole_image() {
        let t = TextureRef::new("texture:map");
        assert_eq!(t.repeat.x, 1.0);
        assert_eq!(t.center.y, 0.0);
    }

    #[test]
    fn only_textured_materials_expose_a_texture() {
        assert!(Material::basic(Color::WHITE).texture().is_none());
        let m = Material::Standard {
            texture: Some(TextureRef::new("texture:map")),
            color: None,
            opacity: 0.65,
        };
        assert_eq!(m.texture().unwrap().key, "texture:map");
    }
}
