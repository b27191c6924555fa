use crate::engine_builder::EngineAttributes;
use crate::glm;
use crate::systems::video_system::VideoSystem;
use std::error::Error;
use std::mem;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

/// Main engine: owns the window and drives the render loop of one app.
///
/// The app is dropped while the gl context is still current, so gl resources held by the app are released properly.
pub struct Engine {
    app: Option<Box<dyn SpriteApp>>,
    app_initialized: bool,
    exit_state: Result<(), Box<dyn Error>>,
    clear_color: glm::Vec4,
    video_system: VideoSystem,
}

impl Engine {
    /// engine setup on startup
    pub(crate) fn new(config: EngineAttributes) -> Self {
        let clear_color = config.clear_color;
        Self {
            app: None,
            app_initialized: false,
            exit_state: Ok(()),
            clear_color,
            video_system: VideoSystem::new(config),
        }
    }

    /// runs the main loop until the window is closed
    pub fn run(&mut self, app: impl SpriteApp) -> Result<(), Box<dyn Error>> {
        self.app = Some(Box::new(app));
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(self)?;
        mem::replace(&mut self.exit_state, Ok(()))
    }

    /// gets called every frame
    fn on_frame_redraw(&mut self) {
        if !self.video_system.has_context() {
            return;
        }
        clear_gl_screen(&self.clear_color);
        if let Some(app) = self.app.as_mut() {
            app.on_frame_update();
        }
        self.video_system.swap_window();
    }

    /// stores the error and stops the event loop
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Box<dyn Error>) {
        log::error!("{err}");
        self.exit_state = Err(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for Engine {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.video_system.on_resumed(event_loop) {
            self.fail(event_loop, err);
            return;
        }
        if !self.app_initialized {
            self.app_initialized = true;
            let init = self.app.as_mut().map_or(Ok(()), |app| app.init());
            if let Err(err) = init {
                self.fail(event_loop, err);
                return;
            }
        }
        self.video_system.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.on_frame_redraw(),
            WindowEvent::Resized(size) => self.video_system.on_resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.video_system.request_redraw();
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.video_system.on_suspended();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // release the app's gl resources before the context goes away
        if self.app.take().is_some() {
            log::debug!("app dropped");
        }
    }
}

/// all necessary app functionality to run the engine with
pub trait SpriteApp: 'static {
    /// initialize the app (e.g. create sprite batches), the gl context is current at this point
    fn init(&mut self) -> Result<(), Box<dyn Error>>;
    /// run this update code every frame, after the screen was cleared
    fn on_frame_update(&mut self);
}

/// clears the opengl viewport
fn clear_gl_screen(color: &glm::Vec4) {
    unsafe {
        gl::ClearColor(color.x, color.y, color.z, color.w);
        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
    }
}
