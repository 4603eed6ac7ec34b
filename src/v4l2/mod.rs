//! Raw kernel interface: structure layouts, request codes and syscall wrappers.

mod api;
pub use api::*;

pub mod vidioc;
pub mod videodev;
