//! Runtime configuration
//!
//! The core owns no persisted state; the surrounding settings shell
//! deserializes a [`MoveConfig`] from wherever it stores preferences and
//! hands it to the controller at initialization. Values are clamped into
//! safe ranges before use.

use serde::{Deserialize, Serialize};

/// What happens to focus and Z-order after a successful move
///
/// The two behaviors are both legitimate: forcing foreground brings the
/// moved window to the user, preserving focus keeps their current window
/// active. Default is [`FocusPolicy::ForceForeground`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusPolicy {
    /// Always raise and focus the moved window
    #[default]
    ForceForeground,
    /// Raise and focus only if the window was focused before the move
    PreserveFocus,
}

/// Tunables for the targeting and placement engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveConfig {
    /// Height of the geometric title-bar band, in logical units
    pub title_band_height: i32,
    /// Upper bound on the native hit-test round trip, in milliseconds
    pub hit_test_timeout_ms: u32,
    /// Pause after un-maximizing before the restored frame is read
    pub settle_delay_ms: u32,
    /// Issue the post-placement resize pair that forces self-compositing
    /// applications to repaint
    pub repaint_nudge: bool,
    /// Focus behavior after a successful move
    pub focus_policy: FocusPolicy,
}

impl MoveConfig {
    /// Default band height: generous enough for self-drawn title bars.
    /// macOS chrome is slightly shorter than Windows chrome.
    pub const DEFAULT_TITLE_BAND: i32 = if cfg!(target_os = "macos") { 40 } else { 45 };
    pub const MIN_TITLE_BAND: i32 = 10;
    pub const MAX_TITLE_BAND: i32 = 200;

    pub const DEFAULT_HIT_TEST_TIMEOUT_MS: u32 = 200;
    pub const MIN_HIT_TEST_TIMEOUT_MS: u32 = 50;
    pub const MAX_HIT_TEST_TIMEOUT_MS: u32 = 1_000;

    pub const DEFAULT_SETTLE_DELAY_MS: u32 = 50;
    pub const MAX_SETTLE_DELAY_MS: u32 = 500;

    /// Returns a copy with every field clamped into its safe range.
    pub fn sanitize(&self) -> Self {
        Self {
            title_band_height: self
                .title_band_height
                .clamp(Self::MIN_TITLE_BAND, Self::MAX_TITLE_BAND),
            hit_test_timeout_ms: self
                .hit_test_timeout_ms
                .clamp(Self::MIN_HIT_TEST_TIMEOUT_MS, Self::MAX_HIT_TEST_TIMEOUT_MS),
            settle_delay_ms: self.settle_delay_ms.min(Self::MAX_SETTLE_DELAY_MS),
            repaint_nudge: self.repaint_nudge,
            focus_policy: self.focus_policy,
        }
    }
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            title_band_height: Self::DEFAULT_TITLE_BAND,
            hit_test_timeout_ms: Self::DEFAULT_HIT_TEST_TIMEOUT_MS,
            settle_delay_ms: Self::DEFAULT_SETTLE_DELAY_MS,
            repaint_nudge: true,
            focus_policy: FocusPolicy::default(),
        }
    }
}
