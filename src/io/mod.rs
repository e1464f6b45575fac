//! Low-level I/O helpers shared by the TIFF reader and writer

pub mod seekable;
pub mod byte_order;
