pub mod broadcast;
pub mod coordinator;
pub mod handle;
pub mod registry;
pub mod viewport;
pub mod zone;

pub use broadcast::{BroadcastReceiver, BroadcastSender, LayoutBroadcast};
pub use coordinator::{LayoutCoordinator, Position};
pub use handle::{LayoutHandle, SurfaceGuard};
pub use registry::{Registration, SurfaceRegistry};
pub use viewport::{Size, ViewportTracker};
pub use zone::Zone;
