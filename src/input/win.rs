//! Low-level mouse hook
//!
//! Installs a WH_MOUSE_LL hook and runs the full gesture pipeline inside
//! the callback. Threading notes that matter here:
//! - the callback runs on the thread that installed the hook, which must
//!   pump messages;
//! - the callback must return promptly or Windows silently removes the
//!   hook; every wait inside the pipeline is explicitly bounded;
//! - `CallNextHookEx` must run for every event the gesture does not
//!   swallow, or other hooks in the system stop seeing input.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, HHOOK, MSLLHOOKSTRUCT, SetWindowsHookExW, UnhookWindowsHookEx, WH_MOUSE_LL,
    WM_MBUTTONDOWN,
};
use windows::core::PCWSTR;

use crate::domain::geometry::Point;
use crate::engine::{Gesture, MoveEngine};
use crate::input::{TapError, dispatch};
use crate::platform::win::WinWindowSystem;

/// Global state for the hook callback.
/// Set exactly once per install, cleared on removal; the callback only
/// reads it.
static mut HOOK_STATE: Option<HookState> = None;

struct HookState {
    engine: MoveEngine<WinWindowSystem>,
    enabled: Arc<AtomicBool>,
}

fn call_next_hook(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

/// Installed low-level mouse hook; removal on drop
pub struct MouseHook {
    hook: Option<HHOOK>,
}

impl MouseHook {
    /// Installs the hook on the current thread.
    pub fn install(
        engine: MoveEngine<WinWindowSystem>,
        enabled: Arc<AtomicBool>,
    ) -> Result<Self, TapError> {
        unsafe {
            HOOK_STATE = Some(HookState { engine, enabled });

            let hinstance = match GetModuleHandleW(PCWSTR::null()) {
                Ok(hinstance) => hinstance,
                Err(_) => {
                    HOOK_STATE = None;
                    return Err(TapError::InstallFailed);
                }
            };

            match SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), hinstance, 0) {
                Ok(hook) => Ok(Self { hook: Some(hook) }),
                Err(_) => {
                    HOOK_STATE = None;
                    Err(TapError::InstallFailed)
                }
            }
        }
    }

    /// Removes the hook. Safe to call more than once.
    pub fn remove(&mut self) {
        if let Some(hook) = self.hook.take() {
            unsafe {
                let _ = UnhookWindowsHookEx(hook);
                HOOK_STATE = None;
            }
        }
    }
}

impl Drop for MouseHook {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Hook procedure for every low-level mouse event in the session.
///
/// Anything that is not an enabled middle-button-down leaves through
/// `CallNextHookEx` untouched. A swallowed event returns nonzero so the
/// click never reaches the application under the cursor.
unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code < 0 {
        return call_next_hook(code, wparam, lparam);
    }

    if wparam.0 as u32 != WM_MBUTTONDOWN {
        return call_next_hook(code, wparam, lparam);
    }

    let state = unsafe {
        match &*std::ptr::addr_of!(HOOK_STATE) {
            Some(state) => state,
            None => return call_next_hook(code, wparam, lparam),
        }
    };

    let mouse_data = lparam.0 as *const MSLLHOOKSTRUCT;
    let pt = unsafe { (*mouse_data).pt };

    match dispatch(&state.engine, &state.enabled, Point::new(pt.x, pt.y)) {
        Gesture::Swallow => LRESULT(1),
        Gesture::PassThrough => call_next_hook(code, wparam, lparam),
    }
}
