//! Windows backend
//!
//! Implements [`WindowSystem`] over Win32. Hit resolution follows the
//! classic pair `WindowFromPoint` + `GetAncestor(GA_ROOT)`: the point query
//! may land on a child control, and the root ancestor is the top-level
//! window the gesture targets. Windows exposes no cheap synchronous UI
//! tree, so tree inspection reports no children and the classifier's
//! geometric fallback covers those processes.

pub mod monitors;
pub mod window;

use std::time::Duration;

use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};
use windows::Win32::UI::WindowsAndMessaging::{GA_ROOT, GetAncestor, WindowFromPoint};

use crate::domain::display::DisplayInfo;
use crate::domain::geometry::{Point, Rect};
use crate::domain::hit::{NativeHit, UiRole};
use crate::platform::{PlatformError, WindowSystem};

/// Opts the process into per-monitor DPI awareness so every coordinate the
/// engine sees is a real pixel. Must run before the first window query;
/// failure (older Windows) is harmless.
pub fn set_dpi_awareness() {
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// The Win32-backed window system
#[derive(Debug, Default, Clone, Copy)]
pub struct WinWindowSystem;

impl WinWindowSystem {
    pub fn new() -> Self {
        Self
    }
}

impl WindowSystem for WinWindowSystem {
    type Node = HWND;

    fn node_at(&self, point: Point) -> Option<HWND> {
        let hwnd = unsafe { WindowFromPoint(POINT { x: point.x, y: point.y }) };
        if hwnd.0 == 0 { None } else { Some(hwnd) }
    }

    fn parent(&self, node: &HWND) -> Option<HWND> {
        let root = unsafe { GetAncestor(*node, GA_ROOT) };
        if root.0 == 0 || root == *node { None } else { Some(root) }
    }

    fn is_window(&self, node: &HWND) -> bool {
        unsafe { GetAncestor(*node, GA_ROOT) == *node }
    }

    fn caption_hit_test(&self, window: &HWND, point: Point, timeout: Duration) -> NativeHit {
        window::caption_hit_test(*window, point, timeout)
    }

    fn process_name(&self, window: &HWND) -> Option<String> {
        window::process_name(*window)
    }

    fn children(&self, _node: &HWND) -> Vec<HWND> {
        Vec::new()
    }

    fn role(&self, node: &HWND) -> UiRole {
        if self.is_window(node) { UiRole::Window } else { UiRole::Other }
    }

    fn node_frame(&self, node: &HWND) -> Option<Rect> {
        window::frame(*node).ok()
    }

    fn displays(&self) -> Result<Vec<DisplayInfo>, PlatformError> {
        monitors::enumerate_displays()
    }

    fn frame(&self, window: &HWND) -> Result<Rect, PlatformError> {
        window::frame(*window)
    }

    fn is_maximized(&self, window: &HWND) -> bool {
        window::is_maximized(*window)
    }

    fn is_focused(&self, window: &HWND) -> bool {
        window::is_focused(*window)
    }

    fn restore(&self, window: &HWND) -> Result<(), PlatformError> {
        window::restore(*window)
    }

    fn maximize(&self, window: &HWND) -> Result<(), PlatformError> {
        window::maximize(*window)
    }

    fn set_frame(&self, window: &HWND, frame: Rect) -> Result<(), PlatformError> {
        window::set_frame(*window, frame)
    }

    fn resize(&self, window: &HWND, w: i32, h: i32) -> Result<(), PlatformError> {
        window::resize(*window, w, h)
    }

    fn raise(&self, window: &HWND) -> Result<(), PlatformError> {
        window::raise(*window)
    }

    fn force_foreground(&self, window: &HWND) -> Result<(), PlatformError> {
        window::force_foreground(*window)
    }
}
