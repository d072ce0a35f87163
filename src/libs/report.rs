use std::io::Write;

use anyhow::Result;

use crate::libs::classify::{classify, forward_b, identity};
use crate::libs::las::Overlap;

/// The report rendered for each selected record. A single invocation
/// uses exactly one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Compact,
    M4,
    Cartoon,
    Align,
}

/// Display knobs passed through to the alignment service.
#[derive(Debug, Clone, Copy)]
pub struct DisplayParams {
    pub indent: usize,
    pub width: usize,
    pub border: usize,
    pub upper: bool,
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            indent: 4,
            width: 100,
            border: 10,
            upper: false,
        }
    }
}

/// Digit-grouped decimal rendering: 1234567 -> "1,234,567".
pub fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn padded(n: i64, width: usize) -> String {
    format!("{:>width$}", group_digits(n))
}

/// Banner printed before a compact listing.
pub fn write_banner(out: &mut dyn Write, stem: &str, novl: i64) -> Result<()> {
    writeln!(out, "\n{}: {} records", stem, group_digits(novl))?;
    Ok(())
}

/// The coordinate part of a listing line, without the trailer:
/// read ids, strand flag, and the four alignment boundaries.
pub fn compact_coords(ovl: &Overlap) -> String {
    format!(
        "{}  {} {}   [{}..{}] x [{}..{}]",
        padded(ovl.aread as i64 + 1, 10),
        padded(ovl.bread as i64 + 1, 9),
        if ovl.is_comp() { 'c' } else { 'n' },
        padded(ovl.abpos as i64, 6),
        padded(ovl.aepos as i64, 6),
        padded(ovl.bbpos as i64, 6),
        padded(ovl.bepos as i64, 6),
    )
}

/// Diff and trace-point trailer of a listing line.
pub fn compact_trailer(ovl: &Overlap, tspace: i32) -> String {
    format!(
        " :   < {} diffs  ({} trace pts)",
        padded(ovl.diffs as i64, 6),
        padded(ovl.trace_point_count(tspace), 3),
    )
}

/// One line of the compact listing (the default report).
pub fn write_compact(out: &mut dyn Write, ovl: &Overlap, tspace: i32) -> Result<()> {
    writeln!(out, "{}{}", compact_coords(ovl), compact_trailer(ovl, tspace))?;
    Ok(())
}

/// One line of the M4 tabular summary.
///
/// Read ids are 0-based here (downstream ICE tooling parses them that
/// way); the b interval is strand-corrected.
pub fn write_m4(out: &mut dyn Write, ovl: &Overlap) -> Result<()> {
    let (bb, be) = forward_b(ovl);
    writeln!(
        out,
        "{:09} {:09} {} {:5.2} 0 {} {} {} {} {} {} {} {}",
        ovl.aread,
        ovl.bread,
        bb - be,
        identity(ovl),
        ovl.abpos,
        ovl.aepos,
        ovl.alen,
        ovl.is_comp() as u8,
        bb,
        be,
        ovl.blen,
        classify(ovl),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Overlap {
        let mut ovl = Overlap {
            aread: 0,
            bread: 1,
            alen: 1000,
            blen: 1000,
            flags: 0,
            abpos: 0,
            aepos: 1000,
            bbpos: 0,
            bepos: 1000,
            diffs: 10,
            ..Default::default()
        };
        let trace: Vec<u16> = (0..10).flat_map(|_| [1u16, 100u16]).collect();
        ovl.set_trace(&trace);
        ovl
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1234567), "1,234,567");
        assert_eq!(group_digits(-1000), "-1,000");
    }

    #[test]
    fn test_compact_line() {
        let ovl = sample_record();
        let mut out = Vec::new();
        write_compact(&mut out, &ovl, 100).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "         1          2 n   [     0.. 1,000] x [     0.. 1,000]\
             \u{20}:   <     10 diffs  (  9 trace pts)\n"
        );
    }

    #[test]
    fn test_m4_line() {
        let ovl = sample_record();
        let mut out = Vec::new();
        write_m4(&mut out, &ovl).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "000000000 000000001 -1000 99.00 0 0 1000 1000 0 0 1000 1000 overlap\n"
        );
    }

    #[test]
    fn test_m4_line_complemented() {
        let mut ovl = sample_record();
        ovl.flags = crate::libs::las::COMP_FLAG;
        ovl.bbpos = 100;
        ovl.bepos = 800;
        let mut out = Vec::new();
        write_m4(&mut out, &ovl).unwrap();
        let line = String::from_utf8(out).unwrap();
        // Flipped to forward coordinates: 1000-800 .. 1000-100
        assert!(line.contains(" 1 200 900 1000 "), "{}", line);
    }

    #[test]
    fn test_banner() {
        let mut out = Vec::new();
        write_banner(&mut out, "reads", 1234).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\nreads: 1,234 records\n");
    }
}
