//! Quartz event tap
//!
//! Creates a session event tap for other-mouse-down events, attached to
//! the current thread's run loop. Swallowing an event is expressed by
//! returning null from the tap callback, which the safe wrappers cannot
//! do, so the tap itself is declared here directly against the framework.

use std::ffi::c_void;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use core_foundation::base::TCFType;
use core_foundation::mach_port::{CFMachPort, CFMachPortRef};
use core_foundation::runloop::{CFRunLoop, CFRunLoopSource, kCFRunLoopCommonModes};
use core_graphics::display::CGPoint;

use crate::domain::geometry::Point;
use crate::engine::{Gesture, MoveEngine};
use crate::input::{TapError, dispatch};
use crate::platform::mac::{MacWindowSystem, ax};

type CGEventRef = *mut c_void;
type CGEventTapCallBack = unsafe extern "C" fn(
    proxy: *mut c_void,
    event_type: u32,
    event: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef;

const K_CG_SESSION_EVENT_TAP: u32 = 1;
const K_CG_HEAD_INSERT_EVENT_TAP: u32 = 0;
const K_CG_EVENT_TAP_OPTION_DEFAULT: u32 = 0;
const K_CG_EVENT_OTHER_MOUSE_DOWN: u32 = 25;
const K_CG_MOUSE_EVENT_BUTTON_NUMBER: u32 = 3;
const MIDDLE_BUTTON: i64 = 2;

#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    fn CGEventTapCreate(
        tap: u32,
        place: u32,
        options: u32,
        events_of_interest: u64,
        callback: CGEventTapCallBack,
        user_info: *mut c_void,
    ) -> CFMachPortRef;
    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
    fn CGEventGetLocation(event: CGEventRef) -> CGPoint;
    fn CGEventGetIntegerValueField(event: CGEventRef, field: u32) -> i64;
}

struct TapState {
    engine: MoveEngine<MacWindowSystem>,
    enabled: Arc<AtomicBool>,
}

/// Installed session event tap; detached from the run loop on drop
pub struct EventTap {
    port: CFMachPort,
    source: CFRunLoopSource,
    // Referenced by the tap callback through its user-info pointer; must
    // outlive the tap.
    _state: Box<TapState>,
}

impl EventTap {
    /// Creates and enables the tap on the current thread's run loop.
    ///
    /// Fails with `PermissionDenied` when the process is not trusted for
    /// accessibility control. Tap creation itself would also fail, but
    /// the explicit probe yields an actionable error for the shell.
    pub fn install(
        engine: MoveEngine<MacWindowSystem>,
        enabled: Arc<AtomicBool>,
    ) -> Result<Self, TapError> {
        if !ax::is_trusted() {
            return Err(TapError::PermissionDenied);
        }

        let state = Box::new(TapState { engine, enabled });

        let port_ref = unsafe {
            CGEventTapCreate(
                K_CG_SESSION_EVENT_TAP,
                K_CG_HEAD_INSERT_EVENT_TAP,
                K_CG_EVENT_TAP_OPTION_DEFAULT,
                1u64 << K_CG_EVENT_OTHER_MOUSE_DOWN,
                tap_callback,
                std::ptr::from_ref(&*state) as *mut c_void,
            )
        };
        if port_ref.is_null() {
            return Err(TapError::InstallFailed);
        }

        let port = unsafe { CFMachPort::wrap_under_create_rule(port_ref) };
        let source = port.create_runloop_source(0).map_err(|()| TapError::InstallFailed)?;
        CFRunLoop::get_current().add_source(&source, unsafe { kCFRunLoopCommonModes });
        unsafe { CGEventTapEnable(port.as_concrete_TypeRef(), true) };

        Ok(Self { port, source, _state: state })
    }
}

impl Drop for EventTap {
    fn drop(&mut self) {
        unsafe { CGEventTapEnable(self.port.as_concrete_TypeRef(), false) };
        CFRunLoop::get_current().remove_source(&self.source, unsafe { kCFRunLoopCommonModes });
    }
}

/// Tap callback for every other-mouse-down in the session.
///
/// Returning the event passes it along; returning null deletes it so the
/// application under the cursor never sees the click.
unsafe extern "C" fn tap_callback(
    _proxy: *mut c_void,
    event_type: u32,
    event: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef {
    if event_type != K_CG_EVENT_OTHER_MOUSE_DOWN || user_info.is_null() {
        return event;
    }

    let button = unsafe { CGEventGetIntegerValueField(event, K_CG_MOUSE_EVENT_BUTTON_NUMBER) };
    if button != MIDDLE_BUTTON {
        return event;
    }

    let state = unsafe { &*(user_info as *const TapState) };
    let location = unsafe { CGEventGetLocation(event) };
    let point = Point::new(location.x.round() as i32, location.y.round() as i32);

    match dispatch(&state.engine, &state.enabled, point) {
        Gesture::Swallow => std::ptr::null_mut(),
        Gesture::PassThrough => event,
    }
}
