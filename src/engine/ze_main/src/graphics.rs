use crate::camera::Camera;
use crate::color_shader::{ColorShader, ColorShaderError};
use crate::config::EngineConfig;
use crate::model::Model;
use std::fmt::{Display, Formatter};
use ze_core::color::Color4f32;
use ze_core::maths::Vec3f32;
use ze_core::ze_error;
use ze_gfx::backend::{Backend, DeviceError};
use ze_gfx::render_context::{FrameError, InitError, RenderContext};
use ze_platform::{Platform, Window};
use ze_shader_compiler::ShaderCompiler;

const ERROR_TITLE: &str = "Error";

#[derive(Debug)]
pub enum GraphicsError {
    NotInitialized,
    AlreadyInitialized,
    RenderContext(InitError),
    Model(DeviceError),
    ColorShader(ColorShaderError),
    Render(DeviceError),
    Frame(FrameError),
}

impl Display for GraphicsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphicsError::NotInitialized => write!(f, "graphics are not initialized"),
            GraphicsError::AlreadyInitialized => write!(f, "graphics are already initialized"),
            GraphicsError::RenderContext(e) => write!(f, "{}", e),
            GraphicsError::Model(e) => write!(f, "failed to create the model: {}", e),
            GraphicsError::ColorShader(e) => write!(f, "{}", e),
            GraphicsError::Render(e) => write!(f, "failed to render the model: {}", e),
            GraphicsError::Frame(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GraphicsError {}

/// Render context, camera and the colored quad.
/// Fields are dropped in reverse creation order.
#[derive(Default)]
pub struct Graphics {
    color_shader: Option<ColorShader>,
    model: Option<Model>,
    camera: Option<Camera>,
    render_context: Option<RenderContext>,
}

impl Graphics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create everything needed to draw into `window`.
    /// Each failing step is reported to the user with a message box.
    pub fn initialize(
        &mut self,
        backend: &dyn Backend,
        compiler: &dyn ShaderCompiler,
        platform: &dyn Platform,
        window: &dyn Window,
        config: &EngineConfig,
    ) -> Result<(), GraphicsError> {
        if self.is_initialized() {
            return Err(GraphicsError::AlreadyInitialized);
        }

        let desc =
            config.render_context_desc(window.get_width(), window.get_height(), window.get_handle());

        let render_context = match RenderContext::new(backend, &desc) {
            Ok(render_context) => render_context,
            Err(error) => {
                platform.show_message_box(Some(window), ERROR_TITLE, "Could not initialize Direct3D");
                return Err(GraphicsError::RenderContext(error));
            }
        };

        let mut camera = Camera::new();
        camera.set_position(Vec3f32::new(0.0, 0.0, -10.0));

        let model = match Model::new(render_context.device()) {
            Ok(model) => model,
            Err(error) => {
                platform.show_message_box(
                    Some(window),
                    ERROR_TITLE,
                    "Could not initialize the model object.",
                );
                return Err(GraphicsError::Model(error));
            }
        };

        let color_shader = match ColorShader::new(render_context.device(), compiler) {
            Ok(color_shader) => color_shader,
            Err(error) => {
                platform.show_message_box(
                    Some(window),
                    ERROR_TITLE,
                    "Could not initialize the color shader object.",
                );
                return Err(GraphicsError::ColorShader(error));
            }
        };

        self.render_context = Some(render_context);
        self.camera = Some(camera);
        self.model = Some(model);
        self.color_shader = Some(color_shader);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.render_context.is_some()
    }

    pub fn frame(&mut self) -> Result<(), GraphicsError> {
        self.render()
    }

    fn render(&mut self) -> Result<(), GraphicsError> {
        let (render_context, camera, model, color_shader) = match (
            self.render_context.as_mut(),
            self.camera.as_mut(),
            self.model.as_ref(),
            self.color_shader.as_ref(),
        ) {
            (Some(render_context), Some(camera), Some(model), Some(color_shader)) => {
                (render_context, camera, model, color_shader)
            }
            _ => return Err(GraphicsError::NotInitialized),
        };

        render_context
            .begin_scene(Color4f32::BLACK)
            .map_err(GraphicsError::Frame)?;

        camera.render();

        let world = render_context.world_matrix();
        let view = camera.view_matrix();
        let projection = render_context.projection_matrix();

        model.render(render_context.device_context());
        if let Err(error) = color_shader.render(
            render_context.device_context(),
            model.index_count(),
            world,
            view,
            projection,
        ) {
            ze_error!("Failed to render the color shader: {}", error);
            render_context.abort_scene();
            return Err(GraphicsError::Render(error));
        }

        render_context.end_scene().map_err(GraphicsError::Frame)
    }

    /// Release everything, safe to call at any time and more than once
    pub fn shutdown(&mut self) {
        self.color_shader.take();
        self.model.take();
        self.camera.take();
        self.render_context.take();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::color_shader::tests::FakeCompiler;
    use crate::config::EngineConfig;
    use crate::graphics::{Graphics, GraphicsError};
    use raw_window_handle::{RawWindowHandle, Win32Handle};
    use std::sync::{Arc, Mutex};
    use ze_core::color::Color4f32;
    use ze_gfx::backend::{ClearFlagBits, ClearFlags, DeviceError};
    use ze_gfx::null::{NullBackend, NullCall, NullFailure};
    use ze_platform::{Error, Message, Monitor, Platform, Window, WindowFlags};

    pub(crate) struct FakeWindow {
        pub width: u32,
        pub height: u32,
    }

    impl Window for FakeWindow {
        fn get_handle(&self) -> RawWindowHandle {
            RawWindowHandle::Win32(Win32Handle::empty())
        }

        fn get_width(&self) -> u32 {
            self.width
        }

        fn get_height(&self) -> u32 {
            self.height
        }
    }

    /// Platform without any OS window, queued messages are handed out in order
    #[derive(Default)]
    pub(crate) struct FakePlatform {
        pub monitors: Vec<Monitor>,
        pub messages: Mutex<Vec<Message>>,
        pub created_windows: Mutex<Vec<(String, u32, u32, i32, i32, WindowFlags)>>,
        pub message_boxes: Mutex<Vec<(String, String)>>,
    }

    impl Platform for FakePlatform {
        fn poll_event(&self) -> Option<Message> {
            let mut messages = self.messages.lock().unwrap();
            if messages.is_empty() {
                None
            } else {
                Some(messages.remove(0))
            }
        }

        fn create_window(
            &self,
            name: &str,
            width: u32,
            height: u32,
            x: i32,
            y: i32,
            flags: WindowFlags,
        ) -> Result<Arc<dyn Window>, Error> {
            self.created_windows
                .lock()
                .unwrap()
                .push((name.to_string(), width, height, x, y, flags));
            Ok(Arc::new(FakeWindow { width, height }))
        }

        fn get_monitor_count(&self) -> usize {
            self.monitors.len()
        }

        fn get_monitor(&self, index: usize) -> Monitor {
            self.monitors[index]
        }

        fn show_message_box(&self, _: Option<&dyn Window>, title: &str, text: &str) {
            self.message_boxes
                .lock()
                .unwrap()
                .push((title.to_string(), text.to_string()));
        }
    }

    fn window() -> FakeWindow {
        FakeWindow {
            width: 800,
            height: 600,
        }
    }

    fn initialize(backend: &NullBackend, platform: &FakePlatform) -> Result<Graphics, GraphicsError> {
        let mut graphics = Graphics::new();
        graphics.initialize(
            backend,
            &FakeCompiler::default(),
            platform,
            &window(),
            &EngineConfig::default(),
        )?;
        Ok(graphics)
    }

    #[test]
    fn frame_clears_draws_and_presents() {
        let backend = NullBackend::new();
        let platform = FakePlatform::default();
        let mut graphics = initialize(&backend, &platform).unwrap();
        assert!(graphics.is_initialized());
        assert!(platform.message_boxes.lock().unwrap().is_empty());

        backend.clear_calls();
        graphics.frame().unwrap();

        let calls = backend.calls();
        let clear = calls
            .iter()
            .position(|call| *call == NullCall::ClearRenderTargetView(Color4f32::BLACK));
        let clear_depth = calls.iter().position(|call| {
            *call
                == NullCall::ClearDepthStencilView {
                    flags: ClearFlags::from_flag(ClearFlagBits::Depth),
                    depth: 1.0,
                    stencil: 0,
                }
        });
        let draw = calls.iter().position(|call| {
            *call
                == NullCall::DrawIndexed {
                    index_count: 6,
                    first_index: 0,
                    base_vertex: 0,
                }
        });
        let present = calls
            .iter()
            .position(|call| *call == NullCall::Present { sync_interval: 1 });

        assert_eq!(clear, Some(0));
        assert_eq!(clear_depth, Some(1));
        assert!(draw.unwrap() > clear_depth.unwrap());
        assert_eq!(present, Some(calls.len() - 1));
        assert!(draw.unwrap() < present.unwrap());
    }

    #[test]
    fn failed_draw_does_not_block_later_frames() {
        let backend = NullBackend::new();
        let platform = FakePlatform::default();
        let mut graphics = initialize(&backend, &platform).unwrap();

        backend.set_failure(Some(NullFailure::UpdateBuffer));
        backend.clear_calls();
        assert!(matches!(
            graphics.frame(),
            Err(GraphicsError::Render(DeviceError::Unknown))
        ));
        assert!(!backend
            .calls()
            .iter()
            .any(|call| matches!(call, NullCall::Present { .. })));

        backend.set_failure(None);
        graphics.frame().unwrap();
    }

    #[test]
    fn initialize_twice_is_rejected() {
        let backend = NullBackend::new();
        let platform = FakePlatform::default();
        let mut graphics = initialize(&backend, &platform).unwrap();
        let live_objects = backend.live_objects();

        backend.clear_calls();
        let result = graphics.initialize(
            &backend,
            &FakeCompiler::default(),
            &platform,
            &window(),
            &EngineConfig::default(),
        );
        assert!(matches!(result, Err(GraphicsError::AlreadyInitialized)));
        assert!(backend.calls().is_empty());
        assert_eq!(backend.live_objects(), live_objects);
        graphics.frame().unwrap();
    }

    #[test]
    fn consecutive_frames() {
        let backend = NullBackend::new();
        let platform = FakePlatform::default();
        let mut graphics = initialize(&backend, &platform).unwrap();
        for _ in 0..3 {
            graphics.frame().unwrap();
        }
    }

    #[test]
    fn shutdown_releases_everything() {
        let backend = NullBackend::new();
        let platform = FakePlatform::default();
        let mut graphics = initialize(&backend, &platform).unwrap();
        assert!(backend.live_objects() > 0);

        graphics.shutdown();
        assert!(!graphics.is_initialized());
        assert_eq!(backend.live_objects(), 0);

        graphics.shutdown();
        assert_eq!(backend.live_objects(), 0);
    }

    #[test]
    fn shutdown_without_initialize() {
        let mut graphics = Graphics::new();
        graphics.shutdown();
        graphics.shutdown();
        assert!(!graphics.is_initialized());
    }

    #[test]
    fn frame_without_initialize() {
        let mut graphics = Graphics::new();
        assert!(matches!(graphics.frame(), Err(GraphicsError::NotInitialized)));
    }

    #[test]
    fn render_context_failure_reports_direct3d() {
        let backend = NullBackend::new();
        backend.set_failure(Some(NullFailure::DeviceAndSwapChain));
        let platform = FakePlatform::default();

        assert!(matches!(
            initialize(&backend, &platform),
            Err(GraphicsError::RenderContext(_))
        ));
        assert_eq!(
            *platform.message_boxes.lock().unwrap(),
            vec![("Error".to_string(), "Could not initialize Direct3D".to_string())]
        );
        assert_eq!(backend.live_objects(), 0);
    }

    #[test]
    fn model_failure_reports_model() {
        let backend = NullBackend::new();
        backend.set_failure(Some(NullFailure::Buffer));
        let platform = FakePlatform::default();

        assert!(matches!(
            initialize(&backend, &platform),
            Err(GraphicsError::Model(_))
        ));
        assert_eq!(
            *platform.message_boxes.lock().unwrap(),
            vec![(
                "Error".to_string(),
                "Could not initialize the model object.".to_string()
            )]
        );
        assert_eq!(backend.live_objects(), 0);
    }

    #[test]
    fn shader_failure_reports_color_shader() {
        let backend = NullBackend::new();
        let platform = FakePlatform::default();
        let compiler = FakeCompiler {
            error: Some("color.vs(1,1): error X3000: syntax error".to_string()),
            ..Default::default()
        };

        let mut graphics = Graphics::new();
        let result = graphics.initialize(
            &backend,
            &compiler,
            &platform,
            &window(),
            &EngineConfig::default(),
        );
        assert!(matches!(result, Err(GraphicsError::ColorShader(_))));
        assert!(!graphics.is_initialized());
        assert_eq!(
            *platform.message_boxes.lock().unwrap(),
            vec![(
                "Error".to_string(),
                "Could not initialize the color shader object.".to_string()
            )]
        );
        assert_eq!(backend.live_objects(), 0);
    }
}
