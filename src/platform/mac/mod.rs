//! macOS backend
//!
//! Implements [`WindowSystem`] over the Accessibility API. macOS has no
//! synchronous "is this the title bar" query, so the native hit-test
//! always answers "no answer" and classification rests on the policy table
//! and the geometric band, with real UI-tree inspection available for the
//! shells that need it. Accessibility trust is a hard prerequisite; the
//! tap installer checks it before anything else.

pub mod ax;
pub mod displays;

use std::ffi::CStr;
use std::time::Duration;

use cocoa::base::{id, nil};
use objc::{class, msg_send, sel, sel_impl};

use crate::domain::display::DisplayInfo;
use crate::domain::geometry::{Point, Rect};
use crate::domain::hit::{NativeHit, UiRole};
use crate::platform::{PlatformError, WindowSystem};

use ax::AxElement;

/// NSApplicationActivateIgnoringOtherApps
const ACTIVATE_IGNORING_OTHER_APPS: u64 = 1 << 1;

/// The accessibility-backed window system
pub struct MacWindowSystem {
    system_wide: Option<AxElement>,
}

impl MacWindowSystem {
    /// `hit_test_timeout` bounds every accessibility round trip.
    pub fn new(hit_test_timeout: Duration) -> Self {
        Self { system_wide: AxElement::system_wide(hit_test_timeout) }
    }
}

impl WindowSystem for MacWindowSystem {
    type Node = AxElement;

    fn node_at(&self, point: Point) -> Option<AxElement> {
        self.system_wide.as_ref()?.element_at(point)
    }

    fn parent(&self, node: &AxElement) -> Option<AxElement> {
        node.parent()
    }

    fn is_window(&self, node: &AxElement) -> bool {
        node.role().is_some_and(|role| role == ax::WINDOW_ROLE)
    }

    fn caption_hit_test(&self, _window: &AxElement, _point: Point, _timeout: Duration) -> NativeHit {
        // No such primitive on this platform; the classifier falls through
        // to the policy table and the geometric band.
        NativeHit::NoAnswer
    }

    fn process_name(&self, window: &AxElement) -> Option<String> {
        let pid = window.pid()?;
        unsafe {
            let app: id = msg_send![
                class!(NSRunningApplication),
                runningApplicationWithProcessIdentifier: pid
            ];
            if app == nil {
                return None;
            }
            let name: id = msg_send![app, localizedName];
            if name == nil {
                return None;
            }
            let utf8: *const std::os::raw::c_char = msg_send![name, UTF8String];
            if utf8.is_null() {
                return None;
            }
            Some(CStr::from_ptr(utf8).to_string_lossy().to_lowercase())
        }
    }

    fn children(&self, node: &AxElement) -> Vec<AxElement> {
        node.children()
    }

    fn role(&self, node: &AxElement) -> UiRole {
        match node.role().as_deref() {
            Some(ax::WINDOW_ROLE) => UiRole::Window,
            Some(ax::TAB_GROUP_ROLE) => UiRole::TabControl,
            Some(_) if node.subrole().as_deref() == Some(ax::TAB_BUTTON_SUBROLE) => {
                UiRole::TabControl
            }
            _ => UiRole::Other,
        }
    }

    fn node_frame(&self, node: &AxElement) -> Option<Rect> {
        node.frame()
    }

    fn displays(&self) -> Result<Vec<DisplayInfo>, PlatformError> {
        displays::enumerate_displays()
    }

    fn frame(&self, window: &AxElement) -> Result<Rect, PlatformError> {
        window.frame().ok_or(PlatformError::FrameUnavailable)
    }

    fn is_maximized(&self, _window: &AxElement) -> bool {
        // No zoom/maximize state is exposed through AX; restore-and-
        // re-maximize is a Windows-only concern.
        false
    }

    fn is_focused(&self, window: &AxElement) -> bool {
        window.is_main() || window.is_focused()
    }

    fn restore(&self, window: &AxElement) -> Result<(), PlatformError> {
        if window.unminimize() { Ok(()) } else { Err(PlatformError::StateChangeFailed) }
    }

    fn maximize(&self, _window: &AxElement) -> Result<(), PlatformError> {
        Ok(())
    }

    fn set_frame(&self, window: &AxElement, frame: Rect) -> Result<(), PlatformError> {
        // AX applies position and size separately; position first so the
        // size clamp happens on the destination display.
        if !window.set_position(Point::new(frame.x, frame.y)) {
            return Err(PlatformError::PlacementFailed);
        }
        if !window.set_size(frame.w, frame.h) {
            return Err(PlatformError::PlacementFailed);
        }
        Ok(())
    }

    fn resize(&self, window: &AxElement, w: i32, h: i32) -> Result<(), PlatformError> {
        if window.set_size(w, h) { Ok(()) } else { Err(PlatformError::PlacementFailed) }
    }

    fn raise(&self, window: &AxElement) -> Result<(), PlatformError> {
        if window.raise() { Ok(()) } else { Err(PlatformError::FocusFailed) }
    }

    fn force_foreground(&self, window: &AxElement) -> Result<(), PlatformError> {
        window.set_main();
        window.set_focused();
        if !window.raise() {
            return Err(PlatformError::FocusFailed);
        }

        // Raising the window within its application is not enough when
        // another application is active; activate the owning application
        // as well.
        if let Some(pid) = window.pid() {
            unsafe {
                let app: id = msg_send![
                    class!(NSRunningApplication),
                    runningApplicationWithProcessIdentifier: pid
                ];
                if app != nil {
                    let _: cocoa::base::BOOL =
                        msg_send![app, activateWithOptions: ACTIVATE_IGNORING_OTHER_APPS];
                }
            }
        }
        Ok(())
    }
}
