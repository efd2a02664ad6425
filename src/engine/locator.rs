//! Window location
//!
//! The spatial hit-test usually lands on a leaf control (a button, a tab, a
//! toolbar). The locator walks the ancestor chain until it reaches a true
//! top-level window. Absence of a window is not an error; it simply means
//! the gesture has no target.

use crate::domain::geometry::Point;
use crate::platform::WindowSystem;

/// Walk limit. Real UI trees are shallow; this only guards against a
/// malformed tree reporting a parent cycle.
const MAX_ANCESTOR_DEPTH: usize = 32;

/// Resolves the top-level window under `point`, or `None`.
pub fn locate_window<P: WindowSystem>(platform: &P, point: Point) -> Option<P::Node> {
    let mut node = platform.node_at(point)?;
    for _ in 0..MAX_ANCESTOR_DEPTH {
        if platform.is_window(&node) {
            return Some(node);
        }
        node = platform.parent(&node)?;
    }
    None
}
