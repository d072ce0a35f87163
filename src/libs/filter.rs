use crate::libs::classify::forward_b;
use crate::libs::las::Overlap;
use crate::libs::ranges::{RangeCursor, RangeSet};

/// Default minimum a-read length for the FALCON dovetail policy.
pub const SEED_MIN_DEFAULT: i32 = 8000;

/// FALCON tolerance for an alignment end to count as touching a
/// sequence boundary.
const FALCON_END_SLOP: i32 = 1000;

/// Full-length filter tolerances (start / end, in bp).
const FL_START_MAX: i64 = 200;
const FL_END_SLOP: i64 = 50;

/// Which dovetail-overlap policy to apply, if any.
///
/// The strict and FALCON thresholds differ (0bp vs 1000bp) with no
/// shared derivation in the originating pipelines; they are kept as
/// distinct named policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dovetail {
    /// Exact boundary contact on both ends.
    Strict,
    /// FALCON-style: within 1000bp of both boundaries, and the a read
    /// must be at least `seed_min` long.
    Falcon { seed_min: i32 },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOpts {
    pub dovetail: Option<Dovetail>,
    pub full_length: bool,
}

/// Decides whether a record is reported. Predicates run in a fixed
/// order and short-circuit; only the range cursor is mutated.
///
/// Records must arrive in non-decreasing `aread` order, the same
/// guarantee `RangeSet::advance` relies on.
pub fn select(
    ovl: &Overlap,
    ranges: &RangeSet,
    cursor: &mut RangeCursor,
    opts: &FilterOpts,
) -> bool {
    if !ranges.advance(cursor, ovl.aread as i64 + 1) {
        return false;
    }

    match opts.dovetail {
        Some(Dovetail::Strict) => {
            if ovl.abpos != 0 && ovl.bbpos != 0 {
                return false;
            }
            if ovl.aepos != ovl.alen && ovl.bepos != ovl.blen {
                return false;
            }
        }
        Some(Dovetail::Falcon { seed_min }) => {
            if ovl.abpos > FALCON_END_SLOP && ovl.bbpos > FALCON_END_SLOP {
                return false;
            }
            if ovl.alen - ovl.aepos > FALCON_END_SLOP && ovl.blen - ovl.bepos > FALCON_END_SLOP {
                return false;
            }
            if ovl.alen < seed_min {
                return false;
            }
        }
        None => {}
    }

    if opts.full_length {
        let (bb, be) = forward_b(ovl);
        if ovl.abpos as i64 > FL_START_MAX || bb > FL_START_MAX {
            return false;
        }
        if (ovl.aepos as i64) + FL_END_SLOP < ovl.alen as i64 {
            return false;
        }
        if be + FL_END_SLOP < ovl.blen as i64 {
            return false;
        }
    }

    true
}
