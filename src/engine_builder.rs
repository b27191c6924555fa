use crate::engine::Engine;
use crate::glm;
use crate::utils::constants::{DEFAULT_CLEAR_COLOR, VIEWPORT_HEIGHT, VIEWPORT_WIDTH, WIN_TITLE};
use std::error::Error;
use winit::dpi::LogicalSize;
use winit::window::{Window, WindowAttributes};

/// window and loop attributes for the engine, defaults match the fixed sprite viewport
#[derive(Debug, Clone)]
pub struct EngineAttributes {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) resizable: bool,
    pub(crate) use_vsync: bool,
    pub(crate) clear_color: glm::Vec4,
}

impl EngineAttributes {
    /// creates the default attributes
    pub fn new() -> Self {
        Self {
            title: WIN_TITLE.to_string(),
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
            resizable: true,
            use_vsync: true,
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// initial window size in logical pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_resizable(mut self, flag: bool) -> Self {
        self.resizable = flag;
        self
    }

    pub fn with_vsync(mut self, flag: bool) -> Self {
        self.use_vsync = flag;
        self
    }

    /// the color the screen is cleared with every frame
    pub fn with_clear_color(mut self, color: glm::Vec4) -> Self {
        self.clear_color = color;
        self
    }

    /// validates the attributes and creates the engine
    pub fn build_engine(self) -> Result<Engine, Box<dyn Error>> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("invalid window size {}x{}", self.width, self.height).into());
        }
        Ok(Engine::new(self))
    }

    /// generates the winit window attributes
    pub(crate) fn generate_win_attrs(&self) -> WindowAttributes {
        Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_resizable(self.resizable)
    }
}

impl Default for EngineAttributes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_viewport() {
        let attrs = EngineAttributes::new();
        assert_eq!((attrs.width, attrs.height), (640, 480));
        assert!(attrs.use_vsync);
        assert_eq!(attrs.clear_color, glm::vec4(0.5, 0.5, 0.5, 1.0));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(EngineAttributes::new()
            .with_size(0, 480)
            .build_engine()
            .is_err());
    }
}
