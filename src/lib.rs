//! midmove moves a window to the next display on a middle click on its
//! title bar.
//!
//! The crate is split the way the data flows: [`domain`] holds the pure
//! types and math, [`engine`] runs the locate→classify→move pipeline,
//! [`platform`] supplies the OS primitives behind one trait, [`input`]
//! owns the global tap, and [`app`] wires it all together.

pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod input;
pub mod platform;
