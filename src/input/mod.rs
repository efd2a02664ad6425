//! Global input tap
//!
//! A process-wide listener for middle-button-down, installed ahead of
//! normal event delivery. [`InputTapHandle`] owns the tap's lifecycle and
//! its enabled flag; the platform callbacks funnel every event through
//! [`dispatch`], which reads the flag exactly once per event.
//!
//! Threading: the OS delivers tap events on one dedicated thread and the
//! whole pipeline runs synchronously inside the callback. The callback must
//! return promptly; the only bounded waits inside it are the classifier's
//! hit-test timeout and the mover's settle delay.

#[cfg(target_os = "macos")]
pub mod mac;
#[cfg(windows)]
pub mod win;

#[cfg(any(windows, target_os = "macos"))]
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::geometry::Point;
use crate::engine::{Gesture, MoveEngine};
use crate::platform::WindowSystem;

/// Failure to install the tap
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TapError {
    /// The OS refused the tap because the process lacks the required
    /// privilege (accessibility trust on macOS). Fatal to functionality,
    /// not to the process; the surrounding shell should prompt the user.
    #[error("global input capture permission is not granted")]
    PermissionDenied,
    #[error("failed to install the global input tap")]
    InstallFailed,
}

/// Gate shared by every platform callback.
///
/// Disabled means events keep flowing but are always passed along without
/// any classification work. The flag is read once at entry; a toggle lands
/// on the next event, never the current one.
pub(crate) fn dispatch<P: WindowSystem>(
    engine: &MoveEngine<P>,
    enabled: &AtomicBool,
    point: Point,
) -> Gesture {
    if !enabled.load(Ordering::Relaxed) {
        return Gesture::PassThrough;
    }
    engine.handle_middle_click(point)
}

/// Owns the installed tap and its enabled flag
///
/// Dropping the handle removes the tap. Removal is idempotent.
#[cfg(any(windows, target_os = "macos"))]
pub struct InputTapHandle {
    enabled: Arc<AtomicBool>,
    #[cfg(windows)]
    tap: Option<win::MouseHook>,
    #[cfg(target_os = "macos")]
    tap: Option<mac::EventTap>,
}

#[cfg(any(windows, target_os = "macos"))]
impl InputTapHandle {
    /// Installs the tap with handling enabled.
    ///
    /// Must be called on a thread that will run the platform event loop;
    /// tap callbacks are delivered there.
    #[cfg(windows)]
    pub fn install(
        engine: MoveEngine<crate::platform::win::WinWindowSystem>,
    ) -> Result<Self, TapError> {
        let enabled = Arc::new(AtomicBool::new(true));
        let tap = win::MouseHook::install(engine, Arc::clone(&enabled))?;
        Ok(Self { enabled, tap: Some(tap) })
    }

    /// Installs the tap with handling enabled.
    ///
    /// Must be called on a thread that will run the platform event loop;
    /// tap callbacks are delivered there.
    #[cfg(target_os = "macos")]
    pub fn install(
        engine: MoveEngine<crate::platform::mac::MacWindowSystem>,
    ) -> Result<Self, TapError> {
        let enabled = Arc::new(AtomicBool::new(true));
        let tap = mac::EventTap::install(engine, Arc::clone(&enabled))?;
        Ok(Self { enabled, tap: Some(tap) })
    }

    /// Toggles gesture handling. Events always keep flowing; disabled just
    /// means they are never acted on.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Removes the tap. Safe to call more than once.
    pub fn stop(&mut self) {
        self.tap = None;
    }

    pub fn is_installed(&self) -> bool {
        self.tap.is_some()
    }
}
