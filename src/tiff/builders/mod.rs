//! Tag groups and the streaming file writer used by `TiffBuilder`

pub mod basic_tags;
pub mod geo_tags;
pub mod metadata_tags;
pub mod writer;
