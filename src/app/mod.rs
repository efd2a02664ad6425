//! Application orchestration layer
//!
//! The composition root: builds the platform backend, engine, and input
//! tap, and exposes the narrow interface the surrounding shell (settings
//! UI, tray icon) talks to.

#[cfg(any(windows, target_os = "macos"))]
pub mod controller;

#[cfg(any(windows, target_os = "macos"))]
pub use controller::Controller;

use crate::input::TapError;

/// Top-level application errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Tap(#[from] TapError),
    #[error("no window system backend exists for this platform")]
    UnsupportedPlatform,
}

/// Initializes a controller with default configuration and blocks on the
/// platform event loop until it ends.
#[cfg(any(windows, target_os = "macos"))]
pub fn run() -> Result<(), AppError> {
    let controller = Controller::initialize(crate::config::MoveConfig::default())?;
    controller.run()
}

#[cfg(not(any(windows, target_os = "macos")))]
pub fn run() -> Result<(), AppError> {
    Err(AppError::UnsupportedPlatform)
}
