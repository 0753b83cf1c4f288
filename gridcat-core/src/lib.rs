// ABOUTME: Core engine for gridcat: image discovery, grid layout, rendering and resize coordination
// ABOUTME: Terminal and codec specifics plug in through the GeometryProvider, ImageEncoder and ImageProtocol traits

pub mod coordinator;
pub mod discovery;
pub mod encoder;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod render;

pub use coordinator::{
    Coordinator, CoordinatorState, RenderTrigger, ResizeNotifier, ResizeReceiver, resize_channel,
};
pub use discovery::{DiscoveryOptions, discover, is_image_path};
pub use encoder::{EncodedImage, ImageEncoder, ImageEntry, ImageSet, build_image_set};
pub use error::GridError;
pub use geometry::{FixedGeometry, GeometryProvider, TerminalGeometry};
pub use layout::{GridLayout, compute_layout};
pub use render::{CellSize, ImageProtocol, PlainProtocol, Renderer};
