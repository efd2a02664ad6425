//! Hit classification
//!
//! Decides whether a click landed on draggable chrome or on interactive
//! content. The policy is layered and conservative: a failed drag is
//! harmless, a stolen tab click is not, so every uncertain path ends in
//! `InteractiveContent`.
//!
//! Tiers, first match wins:
//! 1. the window's own synchronous hit-test answer (bounded by a timeout so
//!    a hung application cannot stall the input pipeline),
//! 2. the per-process strategy override,
//! 3. the geometric title-band fallback for self-drawn chrome.

use std::time::Duration;

use tracing::debug;

use crate::config::MoveConfig;
use crate::domain::geometry::{Point, Rect};
use crate::domain::hit::{HitClass, NativeHit, UiRole};
use crate::domain::policy::{ClassifyStrategy, ProcessPolicyTable};
use crate::platform::WindowSystem;

/// Classifies `point` within `window`.
pub fn classify<P: WindowSystem>(
    platform: &P,
    policies: &ProcessPolicyTable,
    config: &MoveConfig,
    point: Point,
    window: &P::Node,
) -> HitClass {
    let Ok(frame) = platform.frame(window) else {
        return HitClass::Undetermined;
    };

    let timeout = Duration::from_millis(u64::from(config.hit_test_timeout_ms));
    let native = platform.caption_hit_test(window, point, timeout);
    if native == NativeHit::Caption {
        return HitClass::TitleBarDrag;
    }

    let process = platform.process_name(window);
    let strategy = policies.lookup(process.as_deref());
    debug!(
        event = "classifier.fallthrough",
        process = process.as_deref().unwrap_or("<unknown>"),
        native = ?native,
        strategy = ?strategy,
        x = point.x,
        y = point.y,
    );

    let class = match strategy {
        ClassifyStrategy::GeometricOnly => geometric(frame, point, config.title_band_height),
        ClassifyStrategy::TreeInspect => {
            if tab_control_under_point(platform, window, point) {
                HitClass::InteractiveContent
            } else {
                geometric(frame, point, config.title_band_height)
            }
        }
        ClassifyStrategy::Standard => match native {
            // The application mapped its own chrome and said this is not
            // the title bar; believe it.
            NativeHit::NonCaption => HitClass::InteractiveContent,
            NativeHit::NoAnswer => geometric(frame, point, config.title_band_height),
            NativeHit::Caption => HitClass::TitleBarDrag,
        },
    };

    debug!(event = "classifier.decided", class = ?class);
    class
}

fn geometric(frame: Rect, point: Point, band: i32) -> HitClass {
    if frame.in_top_band(point, band) {
        HitClass::TitleBarDrag
    } else {
        HitClass::InteractiveContent
    }
}

/// True if a tab/tab-group/selector control sits under `point`.
///
/// Looks at the window's children that geometrically contain the point, and
/// their direct children, one level deep; tab strips nest exactly that
/// shallowly in the shells this matters for.
fn tab_control_under_point<P: WindowSystem>(platform: &P, window: &P::Node, point: Point) -> bool {
    for child in platform.children(window) {
        let Some(frame) = platform.node_frame(&child) else {
            continue;
        };
        if !frame.contains(point) {
            continue;
        }
        if platform.role(&child) == UiRole::TabControl {
            return true;
        }
        for grandchild in platform.children(&child) {
            if platform.role(&grandchild) == UiRole::TabControl {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::display::DisplayInfo;
    use crate::platform::fake::FakeWindowSystem;

    const BAND: i32 = 45;

    fn config() -> MoveConfig {
        MoveConfig { title_band_height: BAND, ..MoveConfig::default() }
    }

    fn fake() -> FakeWindowSystem {
        FakeWindowSystem::new(vec![DisplayInfo::new(
            1,
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 0, 1920, 1040),
        )])
    }

    #[test]
    fn caption_answer_wins_immediately() {
        let platform = fake();
        let window = platform.add_window(Rect::new(100, 100, 800, 600), "notepad", NativeHit::Caption);
        let class = classify(
            &platform,
            &ProcessPolicyTable::builtin(),
            &config(),
            Point::new(400, 115),
            &window,
        );
        assert_eq!(class, HitClass::TitleBarDrag);
    }

    #[test]
    fn standard_process_with_definite_client_answer_never_drags() {
        let platform = fake();
        let window =
            platform.add_window(Rect::new(100, 100, 800, 600), "chrome", NativeHit::NonCaption);
        // Inside the band, but the window said "not my title bar".
        let class = classify(
            &platform,
            &ProcessPolicyTable::builtin(),
            &config(),
            Point::new(400, 110),
            &window,
        );
        assert_eq!(class, HitClass::InteractiveContent);
    }

    #[test]
    fn timeout_without_policy_entry_falls_to_geometry() {
        let platform = fake();
        let window =
            platform.add_window(Rect::new(100, 100, 800, 600), "selfdrawn", NativeHit::NoAnswer);
        let table = ProcessPolicyTable::empty();

        let in_band = classify(&platform, &table, &config(), Point::new(400, 120), &window);
        assert_eq!(in_band, HitClass::TitleBarDrag);

        let below = classify(&platform, &table, &config(), Point::new(400, 400), &window);
        assert_eq!(below, HitClass::InteractiveContent);
    }

    #[test]
    fn geometric_only_band_boundaries() {
        let platform = fake();
        let window = platform.add_window(Rect::new(100, 100, 800, 600), "code", NativeHit::NonCaption);
        let table = ProcessPolicyTable::builtin();

        let just_inside = classify(&platform, &table, &config(), Point::new(400, 100 + BAND - 1), &window);
        assert_eq!(just_inside, HitClass::TitleBarDrag);

        let just_outside = classify(&platform, &table, &config(), Point::new(400, 100 + BAND + 1), &window);
        assert_eq!(just_outside, HitClass::InteractiveContent);
    }

    #[test]
    fn tree_inspect_rejects_tab_strip_hits() {
        let platform = fake();
        let window = platform.add_window(Rect::new(0, 0, 1000, 700), "finder", NativeHit::NoAnswer);
        let strip = platform.add_child(window, UiRole::Other, Some(Rect::new(0, 28, 1000, 30)));
        platform.add_child(strip, UiRole::TabControl, Some(Rect::new(10, 30, 180, 26)));

        let table = ProcessPolicyTable::builtin();
        // Click inside the band but on the tab strip: deny.
        let on_tabs = classify(&platform, &table, &config(), Point::new(100, 40), &window);
        assert_eq!(on_tabs, HitClass::InteractiveContent);
    }

    #[test]
    fn tree_inspect_falls_to_geometry_off_the_tab_strip() {
        let platform = fake();
        let window = platform.add_window(Rect::new(0, 0, 1000, 700), "finder", NativeHit::NoAnswer);
        // A toolbar with no tab controls anywhere under the point.
        platform.add_child(window, UiRole::Other, Some(Rect::new(0, 0, 1000, 20)));

        let table = ProcessPolicyTable::builtin();
        let in_band = classify(&platform, &table, &config(), Point::new(500, 10), &window);
        assert_eq!(in_band, HitClass::TitleBarDrag);

        let content = classify(&platform, &table, &config(), Point::new(500, 300), &window);
        assert_eq!(content, HitClass::InteractiveContent);
    }

    #[test]
    fn unreadable_frame_is_undetermined() {
        let platform = fake();
        let anchor = platform.add_window(Rect::new(0, 0, 400, 300), "app", NativeHit::NoAnswer);
        // A window whose frame cannot be read at all.
        let ghost = platform.add_child(anchor, UiRole::Window, None);

        let class = classify(
            &platform,
            &ProcessPolicyTable::builtin(),
            &config(),
            Point::new(50, 10),
            &ghost,
        );
        assert_eq!(class, HitClass::Undetermined);
    }

    #[test]
    fn direct_tab_group_child_is_detected() {
        let platform = fake();
        let window = platform.add_window(Rect::new(0, 0, 1000, 700), "finder", NativeHit::NoAnswer);
        platform.add_child(window, UiRole::TabControl, Some(Rect::new(0, 25, 1000, 30)));

        let table = ProcessPolicyTable::builtin();
        let class = classify(&platform, &table, &config(), Point::new(500, 35), &window);
        assert_eq!(class, HitClass::InteractiveContent);
    }
}
