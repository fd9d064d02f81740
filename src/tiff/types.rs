//! Core TIFF data structures

use crate::tiff::ifd::IFD;
use std::fmt;

/// Represents a TIFF file with its Image File Directories (IFDs)
///
/// Each IFD is one page, in file order.
#[derive(Debug, Default)]
pub struct TIFF {
    /// Image File Directories in the TIFF file
    pub ifds: Vec<IFD>,
}

impl TIFF {
    /// Creates a new empty TIFF structure
    pub fn new() -> Self {
        TIFF { ifds: Vec::new() }
    }

    /// Returns the main (first) IFD if available
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.first()
    }

    /// Returns the number of pages in the TIFF file
    pub fn page_count(&self) -> usize {
        self.ifds.len()
    }
}

impl fmt::Display for TIFF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TIFF File:")?;
        writeln!(f, "  Number of pages: {}", self.ifds.len())?;

        for ifd in &self.ifds {
            write!(f, "{}", ifd)?;
        }

        Ok(())
    }
}
