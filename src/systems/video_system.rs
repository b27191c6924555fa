use crate::engine_builder::EngineAttributes;
use gl::types::GLsizei;
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use std::error::Error;
use std::ffi::{CStr, CString};
use std::num::NonZeroU32;
use std::ptr;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// holds the window and the gl context
pub struct VideoSystem {
    config_template: ConfigTemplateBuilder,
    display_builder: DisplayBuilder,
    not_current_gl_context: Option<NotCurrentContext>,
    gl_context: Option<PossiblyCurrentContext>,
    gl_surface: Option<Surface<WindowSurface>>,
    window: Option<Window>,
    stored_config: EngineAttributes,
}

impl VideoSystem {
    /// creates a new video system, the window is created on resume
    pub(crate) fn new(config: EngineAttributes) -> Self {
        let config_template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder =
            DisplayBuilder::new().with_window_attributes(Some(config.generate_win_attrs()));

        Self {
            config_template,
            display_builder,
            not_current_gl_context: None,
            gl_context: None,
            gl_surface: None,
            window: None,
            stored_config: config,
        }
    }

    /// wether or not a current gl context exists
    #[inline]
    pub fn has_context(&self) -> bool {
        self.gl_context.is_some()
    }

    /// called when the engine application is resumed, creates the window and makes the gl context current
    pub(crate) fn on_resumed(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        if self.has_context() {
            return Ok(());
        }
        let (mut window, gl_config) = self.display_builder.clone().build(
            event_loop,
            self.config_template.clone(),
            gl_config_picker,
        )?;

        log::info!("Picked a config with {} samples", gl_config.num_samples());

        let raw_window_handle = window
            .as_ref()
            .and_then(|window| window.window_handle().ok())
            .map(|handle| handle.as_raw());

        let gl_display = gl_config.display();

        let not_current_gl_context = match self.not_current_gl_context.take() {
            Some(context) => context,
            None => {
                let context_attributes = ContextAttributesBuilder::new()
                    .with_profile(GlProfile::Core)
                    .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
                    .build(raw_window_handle);
                let fallback_context_attributes = ContextAttributesBuilder::new()
                    .with_context_api(ContextApi::Gles(None))
                    .build(raw_window_handle);
                unsafe {
                    gl_display
                        .create_context(&gl_config, &context_attributes)
                        .or_else(|_| {
                            gl_display.create_context(&gl_config, &fallback_context_attributes)
                        })?
                }
            }
        };

        let window = match window.take() {
            Some(window) => window,
            None => glutin_winit::finalize_window(
                event_loop,
                self.stored_config.generate_win_attrs(),
                &gl_config,
            )?,
        };

        let attrs = window
            .build_surface_attributes(Default::default())
            .map_err(|err| format!("Failed to build surface attributes: {err}"))?;
        let gl_surface = unsafe {
            gl_config
                .display()
                .create_window_surface(&gl_config, &attrs)?
        };
        let gl_context = not_current_gl_context.make_current(&gl_surface)?;

        // function loading needs a current context on WGL
        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()).cast(),
            Err(_) => ptr::null(),
        });
        log_gl_config();

        self.gl_context = Some(gl_context);
        self.gl_surface = Some(gl_surface);
        self.window = Some(window);

        let vsync = if self.stored_config.use_vsync {
            self.enable_vsync()
        } else {
            self.disable_vsync()
        };
        if let Err(err) = vsync {
            log::warn!("Error setting vsync: {err}");
        }

        Ok(())
    }

    /// called when the engine application is suspended
    pub(crate) fn on_suspended(&mut self) {
        // only raised on Android, where the native window can disappear at any moment
        log::info!("Android window removed");

        self.gl_surface = None;
        self.window = None;
        if let Some(gl_context) = self.gl_context.take() {
            match gl_context.make_not_current() {
                Ok(context) => self.not_current_gl_context = Some(context),
                Err(err) => log::error!("could not release the gl context: {err}"),
            }
        }
    }

    /// enables vsync for opengl
    pub fn enable_vsync(&mut self) -> Result<(), String> {
        log::debug!("enabled vsync");
        self.set_swap_interval(SwapInterval::Wait(NonZeroU32::MIN))
    }

    /// disables vsync for opengl
    pub fn disable_vsync(&mut self) -> Result<(), String> {
        log::debug!("disabled vsync");
        self.set_swap_interval(SwapInterval::DontWait)
    }

    fn set_swap_interval(&self, interval: SwapInterval) -> Result<(), String> {
        if let (Some(gl_surface), Some(gl_context)) =
            (self.gl_surface.as_ref(), self.gl_context.as_ref())
        {
            return gl_surface
                .set_swap_interval(gl_context, interval)
                .map_err(|err| err.to_string());
        }
        Err(String::from("no gl surface to set the swap interval on"))
    }

    /// call the opengl window swap
    pub(crate) fn swap_window(&self) {
        if let (Some(gl_surface), Some(gl_context)) =
            (self.gl_surface.as_ref(), self.gl_context.as_ref())
        {
            if let Err(err) = gl_surface.swap_buffers(gl_context) {
                log::error!("buffer swap failed: {err}");
            }
        }
    }

    /// requests a redraw of the winit window
    pub(crate) fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    /// resizes the gl surface and the viewport
    pub(crate) fn on_resize(&self, width: u32, height: u32) {
        // EGL platforms (Wayland, macOS) need the surface resized explicitly
        let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };
        if let (Some(gl_surface), Some(gl_context)) =
            (self.gl_surface.as_ref(), self.gl_context.as_ref())
        {
            gl_surface.resize(gl_context, width, height);
            unsafe {
                gl::Viewport(0, 0, width.get() as GLsizei, height.get() as GLsizei);
            }
        }
    }
}

/// prints info about the used gl renderer
fn log_gl_config() {
    if let Some(renderer) = get_gl_string(gl::RENDERER) {
        log::info!("Running on {}", renderer.to_string_lossy());
    }
    if let Some(version) = get_gl_string(gl::VERSION) {
        log::info!("OpenGL Version {}", version.to_string_lossy());
    }
    if let Some(shaders_version) = get_gl_string(gl::SHADING_LANGUAGE_VERSION) {
        log::info!("Shaders version on {}", shaders_version.to_string_lossy());
    }
}

/// find the config with the maximum number of samples
fn gl_config_picker(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            if config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("display offers no gl config")
}

/// retrieves a string value from gl
fn get_gl_string(variant: gl::types::GLenum) -> Option<&'static CStr> {
    unsafe {
        let s = gl::GetString(variant);
        (!s.is_null()).then(|| CStr::from_ptr(s.cast()))
    }
}
