//! The targeting and placement engine
//!
//! One middle click is one self-contained pass through
//! locate → classify → move, executed synchronously inside the input
//! callback. The engine carries no per-gesture state; the only inputs are
//! the read-only policy table and the sanitized configuration.

pub mod classifier;
pub mod locator;
pub mod mover;

use tracing::{debug, warn};

use crate::config::MoveConfig;
use crate::domain::geometry::Point;
use crate::domain::hit::HitClass;
use crate::domain::policy::ProcessPolicyTable;
use crate::platform::WindowSystem;

/// What the input callback should do with the event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// The window moved; consume the event so the application under the
    /// cursor never sees the click
    Swallow,
    /// Hand the event to the next consumer untouched
    PassThrough,
}

/// The unified engine, generic over the platform backend
pub struct MoveEngine<P: WindowSystem> {
    platform: P,
    policies: ProcessPolicyTable,
    config: MoveConfig,
}

impl<P: WindowSystem> MoveEngine<P> {
    pub fn new(platform: P, policies: ProcessPolicyTable, config: MoveConfig) -> Self {
        Self { platform, policies, config: config.sanitize() }
    }

    #[cfg(test)]
    pub(crate) fn platform(&self) -> &P {
        &self.platform
    }

    /// Runs the full pipeline for one middle-button-down at `point`.
    ///
    /// Every failure path is silent-and-safe: the event passes through and
    /// the listener stays healthy.
    pub fn handle_middle_click(&self, point: Point) -> Gesture {
        let Some(window) = locator::locate_window(&self.platform, point) else {
            debug!(event = "gesture.no_target", x = point.x, y = point.y);
            return Gesture::PassThrough;
        };

        let class = classifier::classify(&self.platform, &self.policies, &self.config, point, &window);
        if class != HitClass::TitleBarDrag {
            return Gesture::PassThrough;
        }

        match mover::move_to_next_display(&self.platform, &window, &self.config) {
            Ok(mover::MoveOutcome::Moved) => Gesture::Swallow,
            Ok(mover::MoveOutcome::SingleDisplay) => {
                debug!(event = "gesture.single_display");
                Gesture::PassThrough
            }
            Err(error) => {
                warn!(event = "gesture.move_failed", error = %error);
                Gesture::PassThrough
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FocusPolicy;
    use crate::domain::display::DisplayInfo;
    use crate::domain::geometry::Rect;
    use crate::domain::hit::NativeHit;
    use crate::platform::fake::{FakeWindowSystem, Mutation};

    fn display(id: u64, bounds: Rect, work_area: Rect) -> DisplayInfo {
        DisplayInfo::new(id, bounds, work_area)
    }

    fn two_identical_displays() -> Vec<DisplayInfo> {
        vec![
            display(1, Rect::new(0, 0, 1920, 1080), Rect::new(0, 0, 1920, 1040)),
            display(2, Rect::new(1920, 0, 1920, 1080), Rect::new(1920, 0, 1920, 1040)),
        ]
    }

    fn quiet_config() -> MoveConfig {
        MoveConfig { repaint_nudge: false, settle_delay_ms: 0, ..MoveConfig::default() }
    }

    fn engine(platform: FakeWindowSystem, config: MoveConfig) -> MoveEngine<FakeWindowSystem> {
        MoveEngine::new(platform, ProcessPolicyTable::builtin(), config)
    }

    #[test]
    fn single_display_gesture_passes_through_without_mutation() {
        let platform = FakeWindowSystem::new(vec![display(
            1,
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 0, 1920, 1040),
        )]);
        platform.add_window(Rect::new(100, 100, 600, 400), "notepad", NativeHit::Caption);
        let engine = engine(platform, quiet_config());

        assert_eq!(engine.handle_middle_click(Point::new(300, 110)), Gesture::PassThrough);
        assert!(engine.platform.mutations.borrow().is_empty());
    }

    #[test]
    fn moves_to_adjacent_display_preserving_relative_origin() {
        let platform = FakeWindowSystem::new(vec![
            display(1, Rect::new(0, 0, 1920, 1080), Rect::new(0, 0, 1920, 1080)),
            display(2, Rect::new(1920, 0, 1920, 1200), Rect::new(1920, 0, 1920, 1200)),
        ]);
        let window =
            platform.add_window(Rect::new(100, 100, 600, 400), "notepad", NativeHit::Caption);
        let engine = engine(platform, quiet_config());

        assert_eq!(engine.handle_middle_click(Point::new(300, 110)), Gesture::Swallow);

        let moved = engine.platform.window_frame(window);
        assert_eq!(moved.x, 1920 + 100);
        assert_eq!(moved.w, 600);
        assert_eq!(moved.h, 400);
    }

    #[test]
    fn moving_twice_between_identical_displays_round_trips() {
        let platform = FakeWindowSystem::new(two_identical_displays());
        let original = Rect::new(137, 211, 811, 613);
        let window = platform.add_window(original, "notepad", NativeHit::Caption);
        let engine = engine(platform, quiet_config());

        assert_eq!(engine.handle_middle_click(Point::new(300, 220)), Gesture::Swallow);
        let hop = engine.platform.window_frame(window);
        assert_ne!(hop, original);

        // Click the title bar at its new location.
        assert_eq!(
            engine.handle_middle_click(Point::new(hop.x + 50, hop.y + 10)),
            Gesture::Swallow
        );
        assert_eq!(engine.platform.window_frame(window), original);
    }

    #[test]
    fn maximized_window_is_restored_moved_and_remaximized() {
        let platform = FakeWindowSystem::new(vec![
            display(1, Rect::new(0, 0, 2560, 1440), Rect::new(0, 0, 2560, 1400)),
            display(2, Rect::new(2560, 0, 1920, 1080), Rect::new(2560, 0, 1920, 1040)),
        ]);
        let window =
            platform.add_window(Rect::new(0, 0, 2560, 1440), "notepad", NativeHit::Caption);
        platform.set_maximized(window, Rect::new(200, 150, 1200, 800));
        let engine = engine(platform, quiet_config());

        assert_eq!(engine.handle_middle_click(Point::new(1000, 10)), Gesture::Swallow);

        assert!(engine.platform.window_maximized(window));
        let mutations = engine.platform.mutations.borrow();
        let order: Vec<_> = mutations
            .iter()
            .map(|m| match m {
                Mutation::Restored(_) => "restore",
                Mutation::SetFrame(..) => "place",
                Mutation::Maximized(_) => "maximize",
                Mutation::ForcedForeground(_) => "focus",
                other => panic!("unexpected mutation {other:?}"),
            })
            .collect();
        assert_eq!(order, ["restore", "place", "maximize", "focus"]);
    }

    #[test]
    fn repaint_nudge_resizes_out_and_back() {
        let platform = FakeWindowSystem::new(two_identical_displays());
        let window =
            platform.add_window(Rect::new(100, 100, 600, 400), "notepad", NativeHit::Caption);
        let config = MoveConfig { repaint_nudge: true, settle_delay_ms: 0, ..MoveConfig::default() };
        let engine = engine(platform, config);

        assert_eq!(engine.handle_middle_click(Point::new(300, 110)), Gesture::Swallow);

        let frame = engine.platform.window_frame(window);
        assert_eq!((frame.w, frame.h), (600, 400));
        let mutations = engine.platform.mutations.borrow();
        assert!(mutations.contains(&Mutation::Resized(window, 601, 400)));
        assert!(mutations.contains(&Mutation::Resized(window, 600, 400)));
    }

    #[test]
    fn content_click_passes_through() {
        let platform = FakeWindowSystem::new(two_identical_displays());
        platform.add_window(Rect::new(100, 100, 600, 400), "notepad", NativeHit::NonCaption);
        let engine = engine(platform, quiet_config());

        // Middle of the client area.
        assert_eq!(engine.handle_middle_click(Point::new(400, 300)), Gesture::PassThrough);
        assert!(engine.platform.mutations.borrow().is_empty());
    }

    #[test]
    fn empty_desktop_click_passes_through() {
        let platform = FakeWindowSystem::new(two_identical_displays());
        let engine = engine(platform, quiet_config());
        assert_eq!(engine.handle_middle_click(Point::new(400, 300)), Gesture::PassThrough);
    }

    #[test]
    fn placement_failure_passes_event_through() {
        let mut platform = FakeWindowSystem::new(two_identical_displays());
        platform.fail_set_frame = true;
        platform.add_window(Rect::new(100, 100, 600, 400), "notepad", NativeHit::Caption);
        let engine = engine(platform, quiet_config());

        assert_eq!(engine.handle_middle_click(Point::new(300, 110)), Gesture::PassThrough);
    }

    #[test]
    fn display_enumeration_failure_passes_event_through() {
        let mut platform = FakeWindowSystem::new(two_identical_displays());
        platform.fail_displays = true;
        platform.add_window(Rect::new(100, 100, 600, 400), "notepad", NativeHit::Caption);
        let engine = engine(platform, quiet_config());

        assert_eq!(engine.handle_middle_click(Point::new(300, 110)), Gesture::PassThrough);
    }

    #[test]
    fn preserve_focus_policy_only_raises_unfocused_windows() {
        let platform = FakeWindowSystem::new(two_identical_displays());
        let window =
            platform.add_window(Rect::new(100, 100, 600, 400), "notepad", NativeHit::Caption);
        platform.set_focused(window, false);
        let config = MoveConfig { focus_policy: FocusPolicy::PreserveFocus, ..quiet_config() };
        let engine = engine(platform, config);

        assert_eq!(engine.handle_middle_click(Point::new(300, 110)), Gesture::Swallow);

        let mutations = engine.platform.mutations.borrow();
        assert!(mutations.contains(&Mutation::Raised(window)));
        assert!(!mutations.iter().any(|m| matches!(m, Mutation::ForcedForeground(_))));
    }

    #[test]
    fn preserve_focus_policy_refocuses_previously_focused_window() {
        let platform = FakeWindowSystem::new(two_identical_displays());
        let window =
            platform.add_window(Rect::new(100, 100, 600, 400), "notepad", NativeHit::Caption);
        platform.set_focused(window, true);
        let config = MoveConfig { focus_policy: FocusPolicy::PreserveFocus, ..quiet_config() };
        let engine = engine(platform, config);

        assert_eq!(engine.handle_middle_click(Point::new(300, 110)), Gesture::Swallow);
        assert!(
            engine
                .platform
                .mutations
                .borrow()
                .contains(&Mutation::ForcedForeground(window))
        );
    }

    #[test]
    fn oversized_window_shrinks_to_target_work_area() {
        let platform = FakeWindowSystem::new(vec![
            display(1, Rect::new(0, 0, 3840, 2160), Rect::new(0, 0, 3840, 2120)),
            display(2, Rect::new(3840, 0, 1280, 1024), Rect::new(3840, 0, 1280, 984)),
        ]);
        let window =
            platform.add_window(Rect::new(100, 100, 3000, 1800), "notepad", NativeHit::Caption);
        let engine = engine(platform, quiet_config());

        assert_eq!(engine.handle_middle_click(Point::new(500, 110)), Gesture::Swallow);

        let frame = engine.platform.window_frame(window);
        assert!(frame.w <= 1280);
        assert!(frame.h <= 984);
        assert!(frame.x >= 3840);
        assert!(frame.right() <= 3840 + 1280);
    }
}
