//! GUI module
//!
//! slint window wiring: the collaborator the tracker drives, the screen
//! sampler behind it and the optional global pick shortcut.

pub mod desktop;
pub mod hotkey;
pub mod sampler;

pub use desktop::{SharedTracker, SlintDesktop};
pub use sampler::ScrapSampler;
