//! Streaming I/O
//!
//! Only memory mapped buffers are supported: the driver allocates a fixed ring of equally
//! sized buffers which are mapped into the process and passed back and forth.

pub mod mmap;
