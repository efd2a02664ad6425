//! Hit classification vocabulary
//!
//! These enums are the entire contract between the classifier and the
//! platform probes: the platform answers in this vocabulary, the classifier
//! decides in it. Produced per event, never persisted.

/// Final verdict for one middle-click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitClass {
    /// The point lies on draggable chrome; the gesture may move the window
    TitleBarDrag,
    /// The point lies on content the user meant to interact with
    InteractiveContent,
    /// The window could not be inspected at all
    Undetermined,
}

/// Answer from the platform's synchronous "what is here" query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeHit {
    /// The window identified the point as its title bar
    Caption,
    /// The window gave a definite answer that is not the title bar
    NonCaption,
    /// Timeout, unresponsive window, or a platform without the query
    NoAnswer,
}

/// Coarse role of a UI-tree node, as needed by tree inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiRole {
    /// A true top-level window
    Window,
    /// A tab, tab group, or similar selector control
    TabControl,
    /// Anything else
    Other,
}
