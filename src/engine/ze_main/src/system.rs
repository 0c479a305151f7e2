use crate::config::EngineConfig;
use crate::graphics::{Graphics, GraphicsError};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use ze_core::maths::Vec2i32;
use ze_core::{ze_error, ze_info};
use ze_gfx::backend::Backend;
use ze_platform::input::{keys, Keyboard};
use ze_platform::{centered_position, Message, Platform, Window, WindowFlagBits, WindowFlags};
use ze_shader_compiler::ShaderCompiler;

#[derive(Debug)]
pub enum SystemError {
    NoMonitor,
    Window(ze_platform::Error),
    Graphics(GraphicsError),
}

impl Display for SystemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemError::NoMonitor => write!(f, "no monitor found"),
            SystemError::Window(e) => write!(f, "{}", e),
            SystemError::Graphics(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SystemError {}

/// Application shell: owns the window, the keyboard state and the graphics
pub struct System<'a> {
    platform: &'a dyn Platform,
    backend: &'a dyn Backend,
    compiler: &'a dyn ShaderCompiler,
    config: EngineConfig,
    keyboard: Keyboard,
    graphics: Graphics,
    window: Option<Arc<dyn Window>>,
}

impl<'a> System<'a> {
    pub fn new(
        platform: &'a dyn Platform,
        backend: &'a dyn Backend,
        compiler: &'a dyn ShaderCompiler,
        config: EngineConfig,
    ) -> Self {
        Self {
            platform,
            backend,
            compiler,
            config,
            keyboard: Keyboard::new(),
            graphics: Graphics::new(),
            window: None,
        }
    }

    pub fn initialize(&mut self) -> Result<(), SystemError> {
        let window = self.create_window()?;
        self.window = Some(window.clone());

        self.graphics
            .initialize(
                self.backend,
                self.compiler,
                self.platform,
                window.as_ref(),
                &self.config,
            )
            .map_err(SystemError::Graphics)
    }

    fn create_window(&self) -> Result<Arc<dyn Window>, SystemError> {
        if self.platform.get_monitor_count() == 0 {
            return Err(SystemError::NoMonitor);
        }
        let monitor = self.platform.get_monitor(0);

        let (width, height) = self.config.resolution(
            monitor.bounds.width as u32,
            monitor.bounds.height as u32,
        );

        let (position, flags) = if self.config.fullscreen {
            (
                Vec2i32::new(0, 0),
                WindowFlags::from_flag(WindowFlagBits::Borderless),
            )
        } else {
            (centered_position(&monitor, width, height), WindowFlags::empty())
        };

        ze_info!(
            "Creating {}x{} window at ({}, {})",
            width,
            height,
            position.x,
            position.y
        );

        self.platform
            .create_window(
                &self.config.window_title,
                width,
                height,
                position.x,
                position.y,
                flags,
            )
            .map_err(SystemError::Window)
    }

    /// Pump messages and render until the window is closed, escape is pressed or a frame fails
    pub fn run(&mut self) {
        loop {
            let mut closed = false;
            while let Some(message) = self.platform.poll_event() {
                match message {
                    Message::WindowClosed(_) => closed = true,
                    Message::KeyDown(key) => self.keyboard.key_down(key),
                    Message::KeyUp(key) => self.keyboard.key_up(key),
                }
            }

            if closed || !self.frame() {
                break;
            }
        }
    }

    fn frame(&mut self) -> bool {
        if self.keyboard.is_key_down(keys::ESCAPE) {
            return false;
        }

        match self.graphics.frame() {
            Ok(()) => true,
            Err(error) => {
                ze_error!("Frame failed: {}", error);
                false
            }
        }
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn shutdown(&mut self) {
        self.graphics.shutdown();
        self.window.take();
    }
}
