use crate::app::TilesetApp;
use env_logger::Env;
use leaf_sprites::engine_builder::EngineAttributes;
use std::error::Error;

mod app;

fn main() -> Result<(), Box<dyn Error>> {
    let env = Env::default()
        .filter_or("LOG_LVL", "debug")
        .write_style_or("LOG_STYLE", "always");
    env_logger::init_from_env(env);

    let mut engine = EngineAttributes::new()
        .with_title("Sprite Batch")
        .with_resizable(false)
        .with_vsync(true)
        .build_engine()?;

    engine.run(TilesetApp::new())
}
