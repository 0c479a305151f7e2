use enumflags2::{bitflags, BitFlags};
use raw_window_handle::RawWindowHandle;
use std::fmt::{Debug, Display, Formatter};
use std::sync::{Arc, Weak};
use ze_core::maths::{RectI32, Vec2i32};

pub mod input;

#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WindowFlagBits {
    Borderless = 1 << 0,
}
pub type WindowFlags = BitFlags<WindowFlagBits>;

pub trait Window: Send + Sync {
    fn get_handle(&self) -> RawWindowHandle;
    fn get_width(&self) -> u32;
    fn get_height(&self) -> u32;
}

pub enum Message {
    WindowClosed(Weak<dyn Window>),

    /// Virtual key code of a pressed key
    KeyDown(u32),
    KeyUp(u32),
}

#[derive(Copy, Clone, Debug)]
pub struct Monitor {
    pub bounds: RectI32,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Error {
    Unknown,
    WindowCreationFailed,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Unknown => write!(f, "unknown platform error"),
            Error::WindowCreationFailed => write!(f, "failed to create window"),
        }
    }
}

impl std::error::Error for Error {}

/// Trait describing a platform, supporting window creation, event handling etc
pub trait Platform: Send + Sync {
    fn poll_event(&self) -> Option<Message>;
    fn create_window(
        &self,
        name: &str,
        width: u32,
        height: u32,
        x: i32,
        y: i32,
        flags: WindowFlags,
    ) -> Result<Arc<dyn Window>, Error>;

    fn get_monitor_count(&self) -> usize;
    fn get_monitor(&self, index: usize) -> Monitor;

    /// Display a modal message box with a single "OK" button, blocking until it is dismissed
    fn show_message_box(&self, window: Option<&dyn Window>, title: &str, text: &str);
}

/// Position that centers a `width` x `height` window on a monitor
pub fn centered_position(monitor: &Monitor, width: u32, height: u32) -> Vec2i32 {
    Vec2i32::new(
        monitor.bounds.x + (monitor.bounds.width - width as i32) / 2,
        monitor.bounds.y + (monitor.bounds.height - height as i32) / 2,
    )
}

#[cfg(test)]
mod tests {
    use crate::{centered_position, Monitor};
    use ze_core::maths::{RectI32, Vec2i32};

    #[test]
    fn centered_on_primary_monitor() {
        let monitor = Monitor {
            bounds: RectI32::new(0, 0, 1920, 1080),
        };
        assert_eq!(centered_position(&monitor, 800, 600), Vec2i32::new(560, 240));
    }

    #[test]
    fn centered_on_offset_monitor() {
        let monitor = Monitor {
            bounds: RectI32::new(1920, 0, 1280, 1024),
        };
        assert_eq!(centered_position(&monitor, 800, 600), Vec2i32::new(2160, 212));
    }
}
