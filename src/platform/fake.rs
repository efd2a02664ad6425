//! In-memory window system for engine tests
//!
//! Implements [`WindowSystem`] over a hand-built UI tree so the pipeline
//! can be exercised without a display server. Mutations are recorded in an
//! event log for assertions.

use std::cell::RefCell;
use std::time::Duration;

use crate::domain::display::DisplayInfo;
use crate::domain::geometry::{Point, Rect};
use crate::domain::hit::{NativeHit, UiRole};
use crate::platform::{PlatformError, WindowSystem};

/// Everything the fake knows about one tree node
#[derive(Debug, Clone)]
struct FakeNode {
    parent: Option<usize>,
    role: UiRole,
    frame: Option<Rect>,
    process: Option<String>,
    native_hit: NativeHit,
    maximized: bool,
    focused: bool,
    /// Frame the window snaps back to when restored from maximized
    restored_frame: Option<Rect>,
}

/// One recorded mutation, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Restored(usize),
    SetFrame(usize, Rect),
    Resized(usize, i32, i32),
    Maximized(usize),
    Raised(usize),
    ForcedForeground(usize),
}

#[derive(Debug, Default)]
pub struct FakeWindowSystem {
    nodes: RefCell<Vec<FakeNode>>,
    displays: Vec<DisplayInfo>,
    pub mutations: RefCell<Vec<Mutation>>,
    pub hit_test_calls: RefCell<u32>,
    pub fail_set_frame: bool,
    pub fail_displays: bool,
}

impl FakeWindowSystem {
    pub fn new(displays: Vec<DisplayInfo>) -> Self {
        Self { displays, ..Self::default() }
    }

    /// Adds a top-level window and returns its node handle.
    pub fn add_window(&self, frame: Rect, process: &str, native_hit: NativeHit) -> usize {
        self.push(FakeNode {
            parent: None,
            role: UiRole::Window,
            frame: Some(frame),
            process: Some(process.to_string()),
            native_hit,
            maximized: false,
            focused: false,
            restored_frame: None,
        })
    }

    /// Adds a child element under `parent` and returns its node handle.
    pub fn add_child(&self, parent: usize, role: UiRole, frame: Option<Rect>) -> usize {
        self.push(FakeNode {
            parent: Some(parent),
            role,
            frame,
            process: None,
            native_hit: NativeHit::NoAnswer,
            maximized: false,
            focused: false,
            restored_frame: None,
        })
    }

    pub fn set_maximized(&self, window: usize, restored_frame: Rect) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[window].maximized = true;
        nodes[window].restored_frame = Some(restored_frame);
    }

    pub fn set_focused(&self, window: usize, focused: bool) {
        self.nodes.borrow_mut()[window].focused = focused;
    }

    pub fn window_frame(&self, window: usize) -> Rect {
        self.nodes.borrow()[window].frame.unwrap()
    }

    pub fn window_maximized(&self, window: usize) -> bool {
        self.nodes.borrow()[window].maximized
    }

    fn push(&self, node: FakeNode) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        nodes.len() - 1
    }

    fn record(&self, mutation: Mutation) {
        self.mutations.borrow_mut().push(mutation);
    }
}

impl WindowSystem for FakeWindowSystem {
    type Node = usize;

    fn node_at(&self, point: Point) -> Option<usize> {
        let nodes = self.nodes.borrow();
        // Deepest node first: children are pushed after their parents, so a
        // reverse scan finds the leaf control before its window.
        nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, n)| n.frame.is_some_and(|f| f.contains(point)))
            .map(|(i, _)| i)
    }

    fn parent(&self, node: &usize) -> Option<usize> {
        self.nodes.borrow()[*node].parent
    }

    fn is_window(&self, node: &usize) -> bool {
        self.nodes.borrow()[*node].role == UiRole::Window
    }

    fn caption_hit_test(&self, window: &usize, _point: Point, _timeout: Duration) -> NativeHit {
        *self.hit_test_calls.borrow_mut() += 1;
        self.nodes.borrow()[*window].native_hit
    }

    fn process_name(&self, window: &usize) -> Option<String> {
        self.nodes.borrow()[*window].process.clone()
    }

    fn children(&self, node: &usize) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        (0..nodes.len()).filter(|i| nodes[*i].parent == Some(*node)).collect()
    }

    fn role(&self, node: &usize) -> UiRole {
        self.nodes.borrow()[*node].role
    }

    fn node_frame(&self, node: &usize) -> Option<Rect> {
        self.nodes.borrow()[*node].frame
    }

    fn displays(&self) -> Result<Vec<DisplayInfo>, PlatformError> {
        if self.fail_displays {
            return Err(PlatformError::DisplayEnumeration);
        }
        Ok(self.displays.clone())
    }

    fn frame(&self, window: &usize) -> Result<Rect, PlatformError> {
        self.nodes.borrow()[*window].frame.ok_or(PlatformError::FrameUnavailable)
    }

    fn is_maximized(&self, window: &usize) -> bool {
        self.nodes.borrow()[*window].maximized
    }

    fn is_focused(&self, window: &usize) -> bool {
        self.nodes.borrow()[*window].focused
    }

    fn restore(&self, window: &usize) -> Result<(), PlatformError> {
        {
            let mut nodes = self.nodes.borrow_mut();
            nodes[*window].maximized = false;
            if let Some(frame) = nodes[*window].restored_frame {
                nodes[*window].frame = Some(frame);
            }
        }
        self.record(Mutation::Restored(*window));
        Ok(())
    }

    fn maximize(&self, window: &usize) -> Result<(), PlatformError> {
        self.nodes.borrow_mut()[*window].maximized = true;
        self.record(Mutation::Maximized(*window));
        Ok(())
    }

    fn set_frame(&self, window: &usize, frame: Rect) -> Result<(), PlatformError> {
        if self.fail_set_frame {
            return Err(PlatformError::PlacementFailed);
        }
        self.nodes.borrow_mut()[*window].frame = Some(frame);
        self.record(Mutation::SetFrame(*window, frame));
        Ok(())
    }

    fn resize(&self, window: &usize, w: i32, h: i32) -> Result<(), PlatformError> {
        {
            let mut nodes = self.nodes.borrow_mut();
            if let Some(frame) = nodes[*window].frame.as_mut() {
                frame.w = w;
                frame.h = h;
            }
        }
        self.record(Mutation::Resized(*window, w, h));
        Ok(())
    }

    fn raise(&self, window: &usize) -> Result<(), PlatformError> {
        self.record(Mutation::Raised(*window));
        Ok(())
    }

    fn force_foreground(&self, window: &usize) -> Result<(), PlatformError> {
        self.nodes.borrow_mut()[*window].focused = true;
        self.record(Mutation::ForcedForeground(*window));
        Ok(())
    }
}
