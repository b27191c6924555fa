pub mod data;
pub mod shader;
pub mod sprite;
pub mod sprite_batch;
