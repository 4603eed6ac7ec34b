pub mod arena;
pub use arena::{Arena, Lease, Ownership, DEFAULT_BUFFER_COUNT};

pub mod frame;
pub use frame::Frame;

pub mod stream;
pub use stream::{State, Stream};
