//! Window mutation
//!
//! Applies a placement to a live window: restore-before-move for maximized
//! windows, one placement call, the optional repaint nudge, re-maximize on
//! the new display, and the configured focus behavior.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::config::{FocusPolicy, MoveConfig};
use crate::domain::display::{display_containing, next_display};
use crate::domain::placement::compute_target;
use crate::platform::{PlatformError, WindowSystem};

/// Result of one move attempt that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The window now sits on the next display
    Moved,
    /// Only one display exists; nothing to do
    SingleDisplay,
}

/// Relocates `window` to the next display in enumeration order.
///
/// Topology is enumerated fresh on every call; displays may have been
/// hot-plugged since the last gesture.
pub fn move_to_next_display<P: WindowSystem>(
    platform: &P,
    window: &P::Node,
    config: &MoveConfig,
) -> Result<MoveOutcome, PlatformError> {
    let displays = platform.displays()?;
    if displays.is_empty() {
        return Err(PlatformError::NoDisplays);
    }
    if displays.len() == 1 {
        return Ok(MoveOutcome::SingleDisplay);
    }

    let current = display_containing(&displays, platform.frame(window)?.center());
    let next = next_display(&displays, current);

    // Read before any mutation; both inform what happens after placement.
    let was_focused = platform.is_focused(window);
    let was_maximized = platform.is_maximized(window);

    if was_maximized {
        // Geometry changes on a maximized window are refused or silently
        // wrong; restore first and let the OS settle before reading the
        // restored frame.
        platform.restore(window)?;
        thread::sleep(Duration::from_millis(u64::from(config.settle_delay_ms)));
    }

    let frame = platform.frame(window)?;
    let target = compute_target(frame, &displays[current], &displays[next]);
    debug!(
        event = "mover.placing",
        from_display = displays[current].id,
        to_display = displays[next].id,
        x = target.x,
        y = target.y,
        w = target.w,
        h = target.h,
    );

    platform.set_frame(window, target)?;

    if was_maximized {
        platform.maximize(window)?;
    } else if config.repaint_nudge {
        // Self-compositing applications sometimes keep painting at the old
        // size; a resize pair forces a repaint. Cosmetic, so failures are
        // ignored.
        let _ = platform.resize(window, target.w + 1, target.h);
        let _ = platform.resize(window, target.w, target.h);
    }

    match config.focus_policy {
        FocusPolicy::ForceForeground => platform.force_foreground(window)?,
        FocusPolicy::PreserveFocus => {
            if was_focused {
                platform.force_foreground(window)?;
            } else {
                platform.raise(window)?;
            }
        }
    }

    Ok(MoveOutcome::Moved)
}
