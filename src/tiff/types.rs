//! Core TIFF data structures

use crate::tiff::ifd::IFD;
use std::fmt;

/// A parsed TIFF file: its header flavour and directory chain
#[derive(Debug)]
pub struct TIFF {
    /// Image File Directories in file order
    pub ifds: Vec<IFD>,
    /// Whether this is a BigTIFF format
    pub is_big_tiff: bool,
}

impl TIFF {
    /// Creates a new empty TIFF structure
    pub fn new(is_big_tiff: bool) -> Self {
        TIFF {
            ifds: Vec::new(),
            is_big_tiff,
        }
    }

    /// Returns the main (first full-resolution) IFD if available
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.iter()
            .find(|ifd| !ifd.is_overview())
            .or_else(|| self.ifds.first())
    }

    /// Returns the number of IFDs in the TIFF file
    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }

    /// Returns all reduced-resolution overview IFDs
    pub fn overviews(&self) -> Vec<&IFD> {
        self.ifds.iter().filter(|ifd| ifd.is_overview()).collect()
    }
}

impl fmt::Display for TIFF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TIFF File:")?;
        writeln!(f, "  Format: {}", if self.is_big_tiff { "BigTIFF" } else { "TIFF" })?;
        writeln!(f, "  Number of IFDs: {}", self.ifds.len())?;

        if let Some(ifd) = self.main_ifd() {
            write!(f, "{}", ifd)?;
        }

        Ok(())
    }
}
