//! Two-layer image crossfade slider.
//!
//! [`SliderController`] mounts on a [`HostElement`] carrying a JSON image list
//! and two background layers, then swaps the visible layer every
//! [`TICK_INTERVAL`](constants::TICK_INTERVAL). [`Stage`] is the raylib host
//! used by the `crossfade` binary; [`MemoryHost`] records everything in memory.

pub mod constants;
pub mod host;
pub mod image_list;
pub mod rotation;
pub mod slider;
pub mod stage;
pub mod texture_loader;
pub mod timer;

pub use host::{HostElement, LayerElement, MemoryHost, MemoryLayer};
pub use image_list::{ImageList, ImageListError, ImageSources};
pub use rotation::{Layer, LayerUpdate, RotationState, TickUpdates};
pub use slider::SliderController;
pub use stage::Stage;
