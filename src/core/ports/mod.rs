pub mod allocator;
pub mod layout;
pub mod store;

pub use allocator::PortAllocator;
pub use layout::PortLayout;
pub use store::{PortState, PortStateStore};
