pub mod camera;
pub mod renderer;
pub mod texture;

pub use camera::*;
pub use renderer::*;
pub use texture::*;
