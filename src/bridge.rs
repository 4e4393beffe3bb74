pub mod events;
pub mod invoke;

pub use events::{EventBus, Subscription};
pub use invoke::{Backend, BackendError, invoke_typed};
