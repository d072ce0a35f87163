use std::fmt;

use crate::libs::las::Overlap;

/// Containment relation of a classified overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Overlap,
    Contains,
    Contained,
}

impl fmt::Display for Containment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Containment::Overlap => write!(f, "overlap"),
            Containment::Contains => write!(f, "contains"),
            Containment::Contained => write!(f, "contained"),
        }
    }
}

/// The b-read interval in b-forward coordinates.
///
/// When the complement bit is set, the recorded interval lives on the
/// reverse strand and is flipped back: `(blen - bepos, blen - bbpos)`.
pub fn forward_b(ovl: &Overlap) -> (i64, i64) {
    let blen = ovl.blen as i64;
    if ovl.is_comp() {
        (blen - ovl.bepos as i64, blen - ovl.bbpos as i64)
    } else {
        (ovl.bbpos as i64, ovl.bepos as i64)
    }
}

/// Classifies an overlap as contained, containing, or a proper overlap.
/// Exactly one label applies to any record.
pub fn classify(ovl: &Overlap) -> Containment {
    let (bb, be) = forward_b(ovl);
    let alen = ovl.alen as i64;
    let blen = ovl.blen as i64;

    if blen < alen && bb < 1 && blen - be < 1 {
        Containment::Contained
    } else if alen < blen && (ovl.abpos as i64) < 1 && alen - (ovl.aepos as i64) < 1 {
        Containment::Contains
    } else {
        Containment::Overlap
    }
}

/// Alignment identity percentage: `100 - 200*diffs / combined span`.
///
/// A zero (or negative) combined span is degenerate; we fail closed and
/// report 0% rather than divide by zero.
pub fn identity(ovl: &Overlap) -> f64 {
    let (bb, be) = forward_b(ovl);
    let span = (ovl.aepos - ovl.abpos) as i64 + (be - bb);
    if span <= 0 {
        return 0.0;
    }
    100.0 - 200.0 * ovl.diffs as f64 / span as f64
}
