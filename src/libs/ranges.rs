use anyhow::{anyhow, Result};
use itertools::Itertools;

/// Open upper bound for `b-#` style ranges.
pub const OPEN_END: i64 = i64::MAX;

/// A merged, sorted set of 1-based inclusive read-index ranges.
///
/// Built once from the range arguments of the command line. After
/// `build()` the ranges are ascending, pairwise disjoint with a gap of
/// at least 2 between consecutive ranges, and terminated by a
/// `(OPEN_END, OPEN_END)` sentinel so the forward scan never has to
/// bounds-check.
#[derive(Debug, Clone)]
pub struct RangeSet {
    ranges: Vec<(i64, i64)>,
}

/// Scan state for `RangeSet::advance`. Moves forward only.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeCursor {
    idx: usize,
}

impl RangeSet {
    /// Builds a range set from raw argument tokens.
    ///
    /// Each token is a single index `n`, a bounded range `b-e`, or an
    /// open range `b-#`. No tokens at all selects every read.
    pub fn build<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let mut pairs: Vec<(i64, i64)> = Vec::with_capacity(tokens.len() + 1);

        if tokens.is_empty() {
            pairs.push((1, OPEN_END));
        } else {
            for token in tokens {
                pairs.push(Self::parse_token(token.as_ref())?);
            }
        }

        pairs = pairs.into_iter().sorted().collect();

        // Merge adjacent or overlapping ranges
        let mut merged: Vec<(i64, i64)> = Vec::with_capacity(pairs.len() + 1);
        for (low, high) in pairs {
            match merged.last_mut() {
                Some(last) if last.1 >= low.saturating_sub(1) => {
                    if high > last.1 {
                        last.1 = high;
                    }
                }
                _ => merged.push((low, high)),
            }
        }
        merged.push((OPEN_END, OPEN_END));

        Ok(Self { ranges: merged })
    }

    fn parse_token(token: &str) -> Result<(i64, i64)> {
        if token.starts_with('#') {
            return Err(anyhow!("# is not allowed as range start, '{}'", token));
        }

        let (low, high) = match token.split_once('-') {
            None => {
                let b: i64 = token
                    .parse()
                    .map_err(|_| anyhow!("argument '{}' is not an integer range", token))?;
                (b, b)
            }
            Some((b_str, e_str)) => {
                let b: i64 = b_str
                    .parse()
                    .map_err(|_| anyhow!("argument '{}' is not an integer range", token))?;
                let e: i64 = if e_str == "#" {
                    OPEN_END
                } else {
                    e_str
                        .parse()
                        .map_err(|_| anyhow!("argument '{}' is not an integer range", token))?
                };
                (b, e)
            }
        };

        if low < 1 {
            return Err(anyhow!("non-positive index?, '{}'", low));
        }
        if low > high {
            return Err(anyhow!("empty range '{}'", token));
        }

        Ok((low, high))
    }

    /// The merged ranges, without the trailing sentinel.
    pub fn ranges(&self) -> &[(i64, i64)] {
        &self.ranges[..self.ranges.len() - 1]
    }

    pub fn cursor(&self) -> RangeCursor {
        RangeCursor::default()
    }

    /// Monotone membership probe.
    ///
    /// `probe` values must be non-decreasing across calls with the same
    /// cursor; the cursor only moves forward, so a full ascending scan
    /// costs O(number of ranges) in total.
    pub fn advance(&self, cursor: &mut RangeCursor, probe: i64) -> bool {
        while probe > self.ranges[cursor.idx].1 {
            cursor.idx += 1;
        }
        probe >= self.ranges[cursor.idx].0
    }
}
