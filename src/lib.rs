pub mod bridge;
pub mod common;
pub mod layout;

pub use layout::{
    LayoutBroadcast, LayoutCoordinator, LayoutHandle, Position, Registration, Size, SurfaceGuard,
    ViewportTracker, Zone,
};
