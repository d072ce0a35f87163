//! Listing, filtering and classification of daligner `.las` overlap
//! files.

pub mod libs;

pub use libs::classify::{classify, forward_b, identity, Containment};
pub use libs::las::{LasHeader, LasReader, LasWriter, Overlap};
pub use libs::ranges::{RangeCursor, RangeSet};
