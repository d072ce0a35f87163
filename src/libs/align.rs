use anyhow::{anyhow, Result};
use std::io::Write;

use crate::libs::fadb::{revcomp, SequenceDb};
use crate::libs::las::Overlap;
use crate::libs::report::{group_digits, DisplayParams};

/// Rendering collaborator for the cartoon and full-alignment report
/// modes. The decode loop hands over the decoded record, its trace
/// values, and the display parameters; the service owns the drawing.
pub trait AlignService {
    fn print_cartoon(
        &mut self,
        out: &mut dyn Write,
        ovl: &Overlap,
        par: &DisplayParams,
    ) -> Result<()>;

    fn print_alignment(
        &mut self,
        out: &mut dyn Write,
        ovl: &Overlap,
        tspace: i32,
        par: &DisplayParams,
    ) -> Result<()>;
}

/// Geometry-only renderer. Draws the overlap cartoon from the record
/// alone; it has no sequence access and cannot render base-level
/// alignments.
#[derive(Debug, Default)]
pub struct Schematic;

impl AlignService for Schematic {
    fn print_cartoon(
        &mut self,
        out: &mut dyn Write,
        ovl: &Overlap,
        par: &DisplayParams,
    ) -> Result<()> {
        cartoon(out, ovl, par)
    }

    fn print_alignment(
        &mut self,
        _out: &mut dyn Write,
        _ovl: &Overlap,
        _tspace: i32,
        _par: &DisplayParams,
    ) -> Result<()> {
        Err(anyhow!(
            "schematic renderer has no sequence database; cannot draw base-level alignments"
        ))
    }
}

/// Draws both reads to a common scale, aligned spans as `=`, unaligned
/// flanks as `.`, with the aligned columns vertically lined up.
pub fn cartoon(out: &mut dyn Write, ovl: &Overlap, par: &DisplayParams) -> Result<()> {
    let pre_a = ovl.abpos as i64;
    let span_a = (ovl.aepos - ovl.abpos) as i64;
    let suf_a = (ovl.alen - ovl.aepos) as i64;
    let pre_b = ovl.bbpos as i64;
    let span_b = (ovl.bepos - ovl.bbpos) as i64;
    let suf_b = (ovl.blen - ovl.bepos) as i64;

    let total = pre_a.max(pre_b) + span_a.max(span_b) + suf_a.max(suf_b);
    let scale = if total > 0 {
        par.width as f64 / total as f64
    } else {
        0.0
    };
    let cols = |x: i64| {
        if x <= 0 {
            0
        } else {
            ((x as f64 * scale).round() as usize).max(1)
        }
    };

    let lead = cols(pre_a).max(cols(pre_b));
    let ind = " ".repeat(par.indent);
    let bar = |pre: i64, span: i64, suf: i64| {
        format!(
            "{}{}{}{}>",
            " ".repeat(lead - cols(pre)),
            ".".repeat(cols(pre)),
            "=".repeat(cols(span)),
            ".".repeat(cols(suf)),
        )
    };

    writeln!(
        out,
        "{}A {} {}   [{}..{}] of {}",
        ind,
        group_digits(ovl.aread as i64 + 1),
        bar(pre_a, span_a, suf_a),
        ovl.abpos,
        ovl.aepos,
        ovl.alen,
    )?;
    writeln!(
        out,
        "{}B {} {}   [{}..{}] of {}{}",
        ind,
        group_digits(ovl.bread as i64 + 1),
        bar(pre_b, span_b, suf_b),
        ovl.bbpos,
        ovl.bepos,
        ovl.blen,
        if ovl.is_comp() { " c" } else { "" },
    )?;
    Ok(())
}

/// Reconstructs base-level alignments from trace points and renders
/// them in width-chunked rows.
///
/// `bdb` is consulted for b reads when a and b come from different
/// databases; otherwise both sides load from `adb`.
pub struct BaseAligner<D: SequenceDb> {
    adb: D,
    bdb: Option<D>,
}

impl<D: SequenceDb> BaseAligner<D> {
    pub fn new(adb: D, bdb: Option<D>) -> Self {
        Self { adb, bdb }
    }

    fn b_db(&self) -> &D {
        self.bdb.as_ref().unwrap_or(&self.adb)
    }
}

impl<D: SequenceDb> AlignService for BaseAligner<D> {
    fn print_cartoon(
        &mut self,
        out: &mut dyn Write,
        ovl: &Overlap,
        par: &DisplayParams,
    ) -> Result<()> {
        cartoon(out, ovl, par)
    }

    fn print_alignment(
        &mut self,
        out: &mut dyn Write,
        ovl: &Overlap,
        tspace: i32,
        par: &DisplayParams,
    ) -> Result<()> {
        let aseq = self.adb.load_read(ovl.aread as usize)?.to_vec();
        let mut bseq = self.b_db().load_read(ovl.bread as usize)?.to_vec();
        if ovl.is_comp() {
            bseq = revcomp(&bseq);
        }

        if ovl.aepos as usize > aseq.len() {
            return Err(anyhow!(
                "alignment end {} beyond a read length {}",
                ovl.aepos,
                aseq.len()
            ));
        }
        if ovl.bepos as usize > bseq.len() {
            return Err(anyhow!(
                "alignment end {} beyond b read length {}",
                ovl.bepos,
                bseq.len()
            ));
        }

        let (top, bot) = trace_rows(&aseq, &bseq, ovl, tspace)?;
        render(out, &aseq, &bseq, ovl, &top, &bot, par)
    }
}

/// Builds the two gapped alignment rows over the aligned interval,
/// segment by segment. The odd trace entries give the b-side advance
/// of each `tspace` segment on a.
fn trace_rows(aseq: &[u8], bseq: &[u8], ovl: &Overlap, tspace: i32) -> Result<(Vec<u8>, Vec<u8>)> {
    let trace = ovl.trace();
    if trace.len() % 2 != 0 {
        return Err(anyhow!("odd trace length {}", trace.len()));
    }

    let ts = tspace as usize;
    let aepos = ovl.aepos as usize;
    let mut apos = ovl.abpos as usize;
    let mut bpos = ovl.bbpos as usize;
    let mut top = Vec::with_capacity(aepos - apos + trace.len());
    let mut bot = Vec::with_capacity(top.capacity());

    let segments = trace.len() / 2;
    for k in 0..segments {
        let a_hi = if k + 1 == segments {
            aepos
        } else {
            ((apos / ts + 1) * ts).min(aepos)
        };
        let b_adv = trace[2 * k + 1] as usize;
        if a_hi < apos || bpos + b_adv > bseq.len() {
            return Err(anyhow!("trace runs outside the alignment"));
        }
        align_segment(&aseq[apos..a_hi], &bseq[bpos..bpos + b_adv], &mut top, &mut bot);
        apos = a_hi;
        bpos += b_adv;
    }

    if apos != aepos || bpos != ovl.bepos as usize {
        return Err(anyhow!(
            "trace ends at ({}, {}), alignment at ({}, {})",
            apos,
            bpos,
            aepos,
            ovl.bepos
        ));
    }

    Ok((top, bot))
}

/// Minimum-edit alignment of one trace segment, appended to the rows
/// with `-` marking gaps.
fn align_segment(a: &[u8], b: &[u8], top: &mut Vec<u8>, bot: &mut Vec<u8>) {
    let n = a.len();
    let m = b.len();
    let at = |i: usize, j: usize| i * (m + 1) + j;

    let mut dp = vec![0u32; (n + 1) * (m + 1)];
    for i in 1..=n {
        dp[at(i, 0)] = i as u32;
    }
    for j in 1..=m {
        dp[at(0, j)] = j as u32;
    }
    for i in 1..=n {
        for j in 1..=m {
            let sub = dp[at(i - 1, j - 1)] + (a[i - 1] != b[j - 1]) as u32;
            let del = dp[at(i - 1, j)] + 1;
            let ins = dp[at(i, j - 1)] + 1;
            dp[at(i, j)] = sub.min(del).min(ins);
        }
    }

    let mut rev_top = Vec::with_capacity(n + m);
    let mut rev_bot = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0
            && j > 0
            && dp[at(i, j)] == dp[at(i - 1, j - 1)] + (a[i - 1] != b[j - 1]) as u32
        {
            rev_top.push(a[i - 1]);
            rev_bot.push(b[j - 1]);
            i -= 1;
            j -= 1;
        } else if i > 0 && dp[at(i, j)] == dp[at(i - 1, j)] + 1 {
            rev_top.push(a[i - 1]);
            rev_bot.push(b'-');
            i -= 1;
        } else {
            rev_top.push(b'-');
            rev_bot.push(b[j - 1]);
            j -= 1;
        }
    }
    top.extend(rev_top.into_iter().rev());
    bot.extend(rev_bot.into_iter().rev());
}

/// Width-chunked side-by-side rendering with up to `border` bases of
/// flanking context and a match-bar line between the rows.
fn render(
    out: &mut dyn Write,
    aseq: &[u8],
    bseq: &[u8],
    ovl: &Overlap,
    top: &[u8],
    bot: &[u8],
    par: &DisplayParams,
) -> Result<()> {
    let abpos = ovl.abpos as usize;
    let aepos = ovl.aepos as usize;
    let bbpos = ovl.bbpos as usize;
    let bepos = ovl.bepos as usize;

    let la = par.border.min(abpos);
    let lb = par.border.min(bbpos);
    let lw = la.max(lb);
    let ra = par.border.min(aseq.len() - aepos);
    let rb = par.border.min(bseq.len() - bepos);

    let mut t_row: Vec<u8> = Vec::with_capacity(lw + top.len() + ra);
    let mut b_row: Vec<u8> = Vec::with_capacity(lw + bot.len() + rb);
    t_row.resize(lw - la, b' ');
    t_row.extend_from_slice(&aseq[abpos - la..abpos]);
    t_row.extend_from_slice(top);
    t_row.extend_from_slice(&aseq[aepos..aepos + ra]);
    b_row.resize(lw - lb, b' ');
    b_row.extend_from_slice(&bseq[bbpos - lb..bbpos]);
    b_row.extend_from_slice(bot);
    b_row.extend_from_slice(&bseq[bepos..bepos + rb]);
    t_row.resize(t_row.len().max(b_row.len()), b' ');
    b_row.resize(t_row.len(), b' ');

    for byte in t_row.iter_mut().chain(b_row.iter_mut()) {
        *byte = if par.upper {
            byte.to_ascii_uppercase()
        } else {
            byte.to_ascii_lowercase()
        };
    }

    let bars: Vec<u8> = t_row
        .iter()
        .zip(b_row.iter())
        .map(|(&x, &y)| {
            if x.is_ascii_alphabetic() && x == y {
                b'|'
            } else {
                b' '
            }
        })
        .collect();

    let ind = " ".repeat(par.indent);
    let width = par.width.max(1);
    let mut a_pos = (abpos - la) as i64;
    let mut b_pos = (bbpos - lb) as i64;

    let mut offset = 0;
    while offset < t_row.len() {
        let end = (offset + width).min(t_row.len());
        let t_chunk = &t_row[offset..end];
        let b_chunk = &b_row[offset..end];

        writeln!(
            out,
            "{}{:>9} {}",
            ind,
            group_digits(a_pos),
            String::from_utf8_lossy(t_chunk)
        )?;
        writeln!(
            out,
            "{}{:>9} {}",
            ind,
            "",
            String::from_utf8_lossy(&bars[offset..end])
        )?;
        writeln!(
            out,
            "{}{:>9} {}",
            ind,
            group_digits(b_pos),
            String::from_utf8_lossy(b_chunk)
        )?;
        writeln!(out)?;

        a_pos += t_chunk.iter().filter(|b| b.is_ascii_alphabetic()).count() as i64;
        b_pos += b_chunk.iter().filter(|b| b.is_ascii_alphabetic()).count() as i64;
        offset = end;
    }

    Ok(())
}
