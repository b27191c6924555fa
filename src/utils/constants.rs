use crate::glm;

pub(crate) const WIN_TITLE: &str = "Leaf Sprites";

/// number of sprite slots in a batch created with the default constructor
pub const MAX_SPRITES: usize = 1000;
/// every sprite is a quad
pub const VERTICES_PER_SPRITE: usize = 4;
/// two triangles per quad
pub const INDICES_PER_SPRITE: usize = 6;

/// width of the fixed orthographic viewport the batch projects into
pub const VIEWPORT_WIDTH: u32 = 640;
/// height of the fixed orthographic viewport the batch projects into
pub const VIEWPORT_HEIGHT: u32 = 480;

pub const DEFAULT_CLEAR_COLOR: glm::Vec4 = glm::Vec4::new(0.5, 0.5, 0.5, 1.0);

macro_rules! shader_path {
    ($file:literal) => {
        concat!(
            concat!(env!("CARGO_MANIFEST_DIR"), "/assets/shaders/"),
            $file
        )
    };
}

// shader files
pub(crate) const SPRITE_VERT: &str = include_str!(shader_path!("sprite.vert"));
pub(crate) const SPRITE_FRAG: &str = include_str!(shader_path!("sprite.frag"));
