#![cfg(windows)]

use crate::utils::utf8_to_utf16;
use parking_lot::Mutex;
use raw_window_handle::{RawWindowHandle, Win32Handle};
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::mem::size_of;
use std::sync::{Arc, Weak};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{BOOL, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, GetStockObject, BLACK_BRUSH, HBRUSH, HDC, HMONITOR,
    MONITORINFO, MONITORINFOF_PRIMARY,
};
use windows::Win32::UI::Input::KeyboardAndMouse::SetFocus;
use windows::Win32::UI::WindowsAndMessaging::*;
use ze_core::maths::RectI32;
use ze_core::{ze_verbose, ze_warn};
use ze_platform::{Error, Message, Monitor, Platform, Window, WindowFlagBits, WindowFlags};

const WIN_CLASS_NAME: &str = "ze_window";

struct HashableHWND(HWND);

impl PartialEq for HashableHWND {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for HashableHWND {}

impl Hash for HashableHWND {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_isize(self.0 .0);
    }
}

impl From<HWND> for HashableHWND {
    fn from(hwnd: HWND) -> Self {
        Self(hwnd)
    }
}

pub struct WindowsPlatform {
    class_name: Vec<u16>,
    window_map: Mutex<HashMap<HashableHWND, Weak<WindowsWindow>>>,
    message_queue: Mutex<VecDeque<Message>>,
    monitors: Mutex<Vec<Monitor>>,
}

impl WindowsPlatform {
    pub fn new() -> Result<Arc<WindowsPlatform>, Error> {
        let class_name = utf8_to_utf16(WIN_CLASS_NAME);

        unsafe {
            let win_class = WNDCLASSEXW {
                cbSize: size_of::<WNDCLASSEXW>() as u32,
                style: CS_HREDRAW | CS_VREDRAW | CS_OWNDC,
                lpfnWndProc: Some(wnd_proc),
                cbClsExtra: size_of::<usize>() as i32,
                hCursor: LoadCursorW(HINSTANCE::default(), IDC_ARROW).unwrap_or_default(),
                hbrBackground: HBRUSH(GetStockObject(BLACK_BRUSH).0),
                lpszClassName: PCWSTR(class_name.as_ptr()),
                ..Default::default()
            };
            if RegisterClassExW(&win_class) == 0 {
                return Err(Error::Unknown);
            }
        }

        let platform = Arc::new(WindowsPlatform {
            class_name,
            window_map: Default::default(),
            message_queue: Mutex::new(VecDeque::new()),
            monitors: Default::default(),
        });

        // Create dummy window to set platform pointer into the WNDCLASS
        unsafe {
            let dummy_window = CreateWindowExW(
                WINDOW_EX_STYLE(0),
                PCWSTR(platform.class_name.as_ptr()),
                PCWSTR::null(),
                WINDOW_STYLE(0),
                0,
                0,
                1,
                1,
                HWND::default(),
                HMENU::default(),
                HINSTANCE::default(),
                None,
            );
            if dummy_window.0 == 0 {
                return Err(Error::Unknown);
            }

            SetClassLongPtrW(
                dummy_window,
                GET_CLASS_LONG_INDEX(0),
                (platform.as_ref() as *const WindowsPlatform) as isize,
            );

            let _ = DestroyWindow(dummy_window);
        }

        platform.update_monitors();

        Ok(platform)
    }

    /// Primary monitor first
    fn update_monitors(&self) {
        let mut monitors = self.monitors.lock();
        monitors.clear();

        let mut found: Vec<(bool, Monitor)> = vec![];
        unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(enum_display_monitors_callback),
                LPARAM((&mut found as *mut Vec<(bool, Monitor)>) as isize),
            );
        }

        found.sort_by_key(|(primary, _)| !*primary);
        monitors.extend(found.into_iter().map(|(_, monitor)| monitor));
        ze_verbose!("Found {} monitor(s)", monitors.len());
    }

    /// Returns true if the message was consumed and must not reach the default procedure
    fn send_window_message(&self, hwnd: HWND, msg: u32, wparam: WPARAM) -> bool {
        let window_map = self.window_map.lock();
        if let Some(window) = window_map.get(&hwnd.into()) {
            let mut message_queue = self.message_queue.lock();
            match msg {
                WM_CLOSE => {
                    // Destruction is left to the window owner
                    message_queue.push_back(Message::WindowClosed(window.clone()));
                    return true;
                }
                WM_DESTROY => {
                    message_queue.push_back(Message::WindowClosed(window.clone()));
                }
                WM_KEYDOWN => {
                    message_queue.push_back(Message::KeyDown(wparam.0 as u32));
                }
                WM_KEYUP => {
                    message_queue.push_back(Message::KeyUp(wparam.0 as u32));
                }
                _ => (),
            }
        }

        false
    }
}

unsafe extern "system" fn enum_display_monitors_callback(
    monitor: HMONITOR,
    _: HDC,
    _: *mut RECT,
    userdata: LPARAM,
) -> BOOL {
    let mut info = MONITORINFO {
        cbSize: size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    if !GetMonitorInfoW(monitor, &mut info).as_bool() {
        return BOOL::from(true);
    }

    if let Some(monitors) = (userdata.0 as *mut Vec<(bool, Monitor)>).as_mut() {
        monitors.push((
            info.dwFlags & MONITORINFOF_PRIMARY != 0,
            Monitor {
                bounds: RectI32::new(
                    info.rcMonitor.left,
                    info.rcMonitor.top,
                    info.rcMonitor.right - info.rcMonitor.left,
                    info.rcMonitor.bottom - info.rcMonitor.top,
                ),
            },
        ));
    }

    BOOL::from(true)
}

impl Drop for WindowsPlatform {
    fn drop(&mut self) {
        unsafe {
            if UnregisterClassW(PCWSTR(self.class_name.as_ptr()), HINSTANCE::default()).is_err() {
                ze_warn!("Failed to unregister the window class");
            }
        }
    }
}

impl Platform for WindowsPlatform {
    fn poll_event(&self) -> Option<Message> {
        let mut message_queue = self.message_queue.lock();
        if let Some(message) = message_queue.pop_front() {
            Some(message)
        } else {
            drop(message_queue);

            unsafe {
                let mut msg = MSG::default();
                if PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE).as_bool() {
                    TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }

            None
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
        let ex_style = WS_EX_APPWINDOW;
        let mut style = WS_CLIPSIBLINGS | WS_CLIPCHILDREN;

        if flags.contains(WindowFlagBits::Borderless) {
            style |= WS_POPUP;
        } else {
            style |= WS_OVERLAPPED | WS_CAPTION | WS_SYSMENU | WS_MINIMIZEBOX;
        }

        // Rect must be ajusted since Win32 api include window decoration in the width/height
        let mut initial_rect = RECT {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        };

        let title = utf8_to_utf16(name);
        unsafe {
            AdjustWindowRectEx(&mut initial_rect, style, false, ex_style)
                .map_err(|_| Error::WindowCreationFailed)?;
            let hwnd = CreateWindowExW(
                ex_style,
                PCWSTR(self.class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                style,
                x + initial_rect.left,
                y + initial_rect.top,
                initial_rect.right - initial_rect.left,
                initial_rect.bottom - initial_rect.top,
                HWND::default(),
                HMENU::default(),
                HINSTANCE::default(),
                None,
            );

            if hwnd.0 == 0 {
                return Err(Error::WindowCreationFailed);
            }

            let window = WindowsWindow::new(hwnd, width, height);
            self.window_map
                .lock()
                .insert(hwnd.into(), Arc::downgrade(&window));

            ShowWindow(hwnd, SW_SHOW);
            SetForegroundWindow(hwnd);
            SetFocus(hwnd);

            Ok(window)
        }
    }

    fn get_monitor_count(&self) -> usize {
        self.monitors.lock().len()
    }

    fn get_monitor(&self, index: usize) -> Monitor {
        self.monitors.lock()[index]
    }

    fn show_message_box(&self, window: Option<&dyn Window>, title: &str, text: &str) {
        let owner = match window.map(|window| window.get_handle()) {
            Some(RawWindowHandle::Win32(handle)) => HWND(handle.hwnd as isize),
            _ => HWND::default(),
        };

        let title = utf8_to_utf16(title);
        let text = utf8_to_utf16(text);
        unsafe {
            MessageBoxW(owner, PCWSTR(text.as_ptr()), PCWSTR(title.as_ptr()), MB_OK);
        }
    }
}

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let ptr = GetClassLongPtrW(hwnd, GET_CLASS_LONG_INDEX(0));
    if let Some(platform) = (ptr as *const WindowsPlatform).as_ref() {
        if platform.send_window_message(hwnd, msg, wparam) {
            return LRESULT(0);
        }
    }

    DefWindowProcW(hwnd, msg, wparam, lparam)
}

/// Fixed size window, it is never resized nor moved after creation
pub struct WindowsWindow {
    hwnd: HWND,
    width: u32,
    height: u32,
}

impl WindowsWindow {
    fn new(hwnd: HWND, width: u32, height: u32) -> Arc<WindowsWindow> {
        Arc::new(WindowsWindow {
            hwnd,
            width,
            height,
        })
    }
}

impl Drop for WindowsWindow {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

impl Window for WindowsWindow {
    fn get_handle(&self) -> RawWindowHandle {
        let mut handle = Win32Handle::empty();
        handle.hwnd = self.hwnd.0 as *mut std::ffi::c_void;
        RawWindowHandle::Win32(handle)
    }

    fn get_width(&self) -> u32 {
        self.width
    }

    fn get_height(&self) -> u32 {
        self.height
    }
}

mod utils;
