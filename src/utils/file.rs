use std::env::current_dir;
use std::path::PathBuf;

/// yields the full path of any asset file located in ./assets/file_path
pub fn get_asset_path(file_path: &str) -> PathBuf {
    current_dir().unwrap_or_default().join("assets").join(file_path)
}

/// yields texture file path
pub fn get_texture_path(file_name: &str) -> PathBuf {
    get_asset_path("textures").join(file_name)
}

/// yields shader file path
pub fn get_shader_path(file_name: &str) -> PathBuf {
    get_asset_path("shaders").join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_paths() {
        let texture = get_texture_path("tileset.png");
        assert!(texture.ends_with("assets/textures/tileset.png"));
        let shader = get_shader_path("sprite.vert");
        assert!(shader.ends_with("assets/shaders/sprite.vert"));
    }
}
