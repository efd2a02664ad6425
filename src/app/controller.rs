//! Application controller
//!
//! Owns the input tap for the lifetime of the process and exposes the
//! calls the settings shell makes: enable/disable, shutdown, and the
//! blocking event loop. Initialization and `run` must happen on the same
//! thread, because tap callbacks are delivered to the thread that installed it.

use tracing::info;

use crate::app::AppError;
use crate::config::MoveConfig;
use crate::domain::policy::ProcessPolicyTable;
use crate::engine::MoveEngine;
use crate::input::InputTapHandle;

/// Composition root holding the installed tap
pub struct Controller {
    tap: InputTapHandle,
}

impl Controller {
    /// Builds the platform backend and engine, then installs the tap.
    ///
    /// Fails with [`crate::input::TapError::PermissionDenied`] when the OS
    /// refuses global input capture; the surrounding shell should surface
    /// that to the user and retry after permission is granted.
    #[cfg(windows)]
    pub fn initialize(config: MoveConfig) -> Result<Self, AppError> {
        use crate::platform::win::{WinWindowSystem, set_dpi_awareness};

        set_dpi_awareness();
        let engine = MoveEngine::new(WinWindowSystem::new(), ProcessPolicyTable::builtin(), config);
        let tap = InputTapHandle::install(engine)?;
        info!(event = "controller.initialized", backend = "win32");
        Ok(Self { tap })
    }

    /// Builds the platform backend and engine, then installs the tap.
    ///
    /// Fails with [`crate::input::TapError::PermissionDenied`] when the
    /// process is not trusted for accessibility control; the surrounding
    /// shell should prompt and retry after trust is granted.
    #[cfg(target_os = "macos")]
    pub fn initialize(config: MoveConfig) -> Result<Self, AppError> {
        use std::time::Duration;

        use crate::platform::mac::MacWindowSystem;

        let config = config.sanitize();
        let timeout = Duration::from_millis(u64::from(config.hit_test_timeout_ms));
        let engine =
            MoveEngine::new(MacWindowSystem::new(timeout), ProcessPolicyTable::builtin(), config);
        let tap = InputTapHandle::install(engine)?;
        info!(event = "controller.initialized", backend = "accessibility");
        Ok(Self { tap })
    }

    /// Toggles gesture handling without touching the tap itself.
    pub fn set_enabled(&self, enabled: bool) {
        info!(event = "controller.set_enabled", enabled);
        self.tap.set_enabled(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.tap.is_enabled()
    }

    /// Removes the tap. Idempotent; also happens on drop.
    pub fn shutdown(&mut self) {
        if self.tap.is_installed() {
            info!(event = "controller.shutdown");
            self.tap.stop();
        }
    }

    /// Blocks on the platform event loop that delivers tap callbacks.
    #[cfg(windows)]
    pub fn run(&self) -> Result<(), AppError> {
        use windows::Win32::UI::WindowsAndMessaging::{DispatchMessageW, GetMessageW, MSG};

        let mut msg = MSG::default();
        loop {
            let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            if result.0 == 0 || result.0 == -1 {
                break;
            }
            unsafe {
                DispatchMessageW(&msg);
            }
        }
        Ok(())
    }

    /// Blocks on the platform event loop that delivers tap callbacks.
    #[cfg(target_os = "macos")]
    pub fn run(&self) -> Result<(), AppError> {
        core_foundation::runloop::CFRunLoop::run_current();
        Ok(())
    }
}
