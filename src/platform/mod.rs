//! Platform abstraction
//!
//! [`WindowSystem`] is the single seam between the engine and the OS: every
//! raw primitive the pipeline needs (spatial hit-test, ancestor walk, frame
//! get/set, display enumeration, window-state control, focus assignment)
//! is one fallible method here. The engine is generic over this trait, so
//! its behavior is identical on every platform and fully testable against
//! the in-memory fake.

use std::time::Duration;

use crate::domain::display::DisplayInfo;
use crate::domain::geometry::{Point, Rect};
use crate::domain::hit::{NativeHit, UiRole};

#[cfg(target_os = "macos")]
pub mod mac;
#[cfg(windows)]
pub mod win;

#[cfg(test)]
pub mod fake;

/// Failure of a single OS call
///
/// Every variant aborts the current gesture and nothing else: the event
/// passes through, the tap stays installed, the process keeps running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("failed to enumerate displays")]
    DisplayEnumeration,
    #[error("no displays reported by the system")]
    NoDisplays,
    #[error("failed to read window frame")]
    FrameUnavailable,
    #[error("failed to apply window frame")]
    PlacementFailed,
    #[error("failed to change window state")]
    StateChangeFailed,
    #[error("failed to raise or focus window")]
    FocusFailed,
}

/// Raw OS primitives consumed by the engine
///
/// `Node` is an opaque, OS-owned handle to a UI element or window. The
/// engine never assumes ownership and never holds one beyond the gesture
/// that produced it.
pub trait WindowSystem {
    type Node: Clone;

    // Locating

    /// Element under `point`, which may be a leaf control
    fn node_at(&self, point: Point) -> Option<Self::Node>;

    /// Parent of `node` in the UI tree, `None` at the root
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// True if `node` is a top-level application window
    fn is_window(&self, node: &Self::Node) -> bool;

    // Classifier probes

    /// Synchronous "what is here" query against the window, bounded by
    /// `timeout`. Platforms without the primitive answer
    /// [`NativeHit::NoAnswer`].
    fn caption_hit_test(&self, window: &Self::Node, point: Point, timeout: Duration) -> NativeHit;

    /// Lowercase name of the process owning `window`
    fn process_name(&self, window: &Self::Node) -> Option<String>;

    /// Direct UI-tree children of `node`. Platforms without a cheap
    /// synchronous UI tree return an empty vec.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Coarse role of `node`
    fn role(&self, node: &Self::Node) -> UiRole;

    /// Frame of an arbitrary tree node, if it has one
    fn node_frame(&self, node: &Self::Node) -> Option<Rect>;

    // Display topology

    /// Fresh enumeration of all displays, primary first, in canonical
    /// coordinates
    fn displays(&self) -> Result<Vec<DisplayInfo>, PlatformError>;

    // Window state and mutation

    /// Current frame of a top-level window
    fn frame(&self, window: &Self::Node) -> Result<Rect, PlatformError>;

    fn is_maximized(&self, window: &Self::Node) -> bool;

    fn is_focused(&self, window: &Self::Node) -> bool;

    /// Restore a maximized window to its normal state
    fn restore(&self, window: &Self::Node) -> Result<(), PlatformError>;

    /// Maximize the window on whichever display now contains it
    fn maximize(&self, window: &Self::Node) -> Result<(), PlatformError>;

    /// Apply origin and size in one placement call
    fn set_frame(&self, window: &Self::Node, frame: Rect) -> Result<(), PlatformError>;

    /// Resize without moving; used only for the post-placement repaint nudge
    fn resize(&self, window: &Self::Node, w: i32, h: i32) -> Result<(), PlatformError>;

    /// Raise the window without taking focus from the active window
    fn raise(&self, window: &Self::Node) -> Result<(), PlatformError>;

    /// Bring the window to the foreground and give it focus, bridging input
    /// contexts where the OS requires it. The bridge is strictly scoped to
    /// this one call: associate, act, dissociate.
    fn force_foreground(&self, window: &Self::Node) -> Result<(), PlatformError>;
}
