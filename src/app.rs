use leaf_sprites::prelude::*;
use std::error::Error;

const ATLAS_WIDTH: f32 = 160.0;
const ATLAS_HEIGHT: f32 = 112.0;
const TILE_SIZE: f32 = 16.0;

/// demo app: two tiles from the tileset atlas, the first one slides to the right
pub struct TilesetApp {
    batch: Option<SpriteBatch>,
    grass: Sprite,
    grass_slot: usize,
    offset: u32,
}

impl TilesetApp {
    pub fn new() -> Self {
        let grass = Sprite::new(vec2(320.0, 240.0), vec2(TILE_SIZE, TILE_SIZE)).with_atlas_rect(
            ATLAS_WIDTH,
            ATLAS_HEIGHT,
            0.0,
            0.0,
            TILE_SIZE,
            TILE_SIZE,
        );
        Self {
            batch: None,
            grass,
            grass_slot: 0,
            offset: 0,
        }
    }
}

impl Default for TilesetApp {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteApp for TilesetApp {
    fn init(&mut self) -> Result<(), Box<dyn Error>> {
        let program =
            ShaderProgram::from_files(get_shader_path("sprite.vert"), get_shader_path("sprite.frag"))
                .or_else(|err| {
                    log::warn!("{err}, using the built-in sprite shader");
                    ShaderProgram::sprite_default()
                })?;
        let mut batch = SpriteBatch::new(get_texture_path("tileset.png"), program)?;

        self.grass_slot = batch.add(&self.grass)?;
        let better_grass = Sprite::new(vec2(336.0, 240.0), vec2(TILE_SIZE, TILE_SIZE))
            .with_rotation(45.0)
            .with_atlas_rect(ATLAS_WIDTH, ATLAS_HEIGHT, 0.0, 96.0, TILE_SIZE, TILE_SIZE);
        batch.add(&better_grass)?;

        self.batch = Some(batch);
        Ok(())
    }

    fn on_frame_update(&mut self) {
        let Some(batch) = self.batch.as_mut() else {
            return;
        };
        self.grass.position.x = 320.0 + self.offset as f32;
        if let Err(err) = batch.update(self.grass_slot, &self.grass) {
            log::error!("{err}");
        }
        batch.draw();

        self.offset = (self.offset + 1) % ATLAS_WIDTH as u32;
    }
}
