pub mod engine;
pub mod engine_builder;
pub mod rendering;
pub mod systems;
pub mod utils;

pub use env_logger;
pub use log;
pub use nalgebra_glm as glm;
pub use stb_image;
pub use winit;

/// All features that are very common to use.
pub mod prelude {
    pub use crate::engine::{Engine, SpriteApp};
    pub use crate::engine_builder::EngineAttributes;
    pub use crate::glm;
    pub use crate::glm::vec2;
    pub use crate::glm::vec4;
    pub use crate::glm::Vec2;
    pub use crate::glm::Vec4;
    pub use crate::log;
    pub use crate::rendering::data::{SpriteVertex, Texture};
    pub use crate::rendering::shader::ShaderProgram;
    pub use crate::rendering::sprite::{map_atlas_rect, quad_vertices, Sprite, TexCoords};
    pub use crate::rendering::sprite_batch::{
        build_index_table, capacity_fits, ortho_projection, MAX_BATCH_CAPACITY, SpriteBatch, SpriteStore,
    };
    pub use crate::utils::constants::*;
    pub use crate::utils::error::BatchError;
    pub use crate::utils::file::*;
}
