use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Largest trace spacing stored with 1-byte trace values.
pub const TRACE_XOVR: i32 = 125;

/// Complement-strand bit in `Overlap::flags`.
pub const COMP_FLAG: u32 = 0x1;

/// On-disk size of one overlap record, excluding the trace payload.
///
/// The producing C library writes its in-memory struct image: eleven
/// little-endian 32-bit fields followed by 4 bytes of tail padding.
const RECORD_BYTES: usize = 48;

const TRACE_SLACK: usize = 100;

/// Header of a .las file: record count and trace-point spacing.
#[derive(Debug, Clone, Copy)]
pub struct LasHeader {
    pub novl: i64,
    pub tspace: i32,
}

impl LasHeader {
    /// Width of one trace value in the file.
    pub fn trace_bytes(&self) -> usize {
        if self.tspace <= TRACE_XOVR {
            1
        } else {
            2
        }
    }
}

/// One pairwise overlap record.
///
/// A single `Overlap` buffer is meant to be reused across the stream;
/// `LasReader::read_into` grows the trace buffer geometrically and
/// never shrinks it.
#[derive(Debug, Clone, Default)]
pub struct Overlap {
    pub aread: i32,
    pub bread: i32,
    pub alen: i32,
    pub blen: i32,
    pub flags: u32,
    pub abpos: i32,
    pub aepos: i32,
    pub bbpos: i32,
    pub bepos: i32,
    pub diffs: i32,
    pub tlen: i32,
    pub(crate) trace: Vec<u16>,
}

impl Overlap {
    pub fn is_comp(&self) -> bool {
        self.flags & COMP_FLAG != 0
    }

    /// The trace values of the current record. The underlying buffer
    /// may be larger than `tlen`; this is the valid prefix.
    pub fn trace(&self) -> &[u16] {
        &self.trace[..self.tlen as usize]
    }

    /// Replaces the trace values, keeping `tlen` in sync. Used when
    /// building records by hand rather than decoding them.
    pub fn set_trace(&mut self, values: &[u16]) {
        self.trace.clear();
        self.trace.extend_from_slice(values);
        self.tlen = values.len() as i32;
    }

    /// Number of trace-point intervals shown in listings.
    pub fn trace_point_count(&self, tspace: i32) -> i64 {
        (self.aepos as i64 - 1) / tspace as i64 - self.abpos as i64 / tspace as i64
    }
}

/// Streaming decoder for .las overlap files.
pub struct LasReader {
    input: Box<dyn Read>,
    pub header: LasHeader,
    seen: i64,
    raw: Vec<u8>,
}

impl std::fmt::Debug for LasReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LasReader")
            .field("header", &self.header)
            .field("seen", &self.seen)
            .finish_non_exhaustive()
    }
}

impl LasReader {
    /// Opens a .las file, transparently decompressing `.gz`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        let input: Box<dyn Read> = if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Self::new(input).with_context(|| format!("while reading {}", path.display()))
    }

    pub fn new(mut input: Box<dyn Read>) -> Result<Self> {
        let mut buf8 = [0u8; 8];
        let mut buf4 = [0u8; 4];
        input
            .read_exact(&mut buf8)
            .context("truncated .las header")?;
        input
            .read_exact(&mut buf4)
            .context("truncated .las header")?;

        let novl = i64::from_le_bytes(buf8);
        let tspace = i32::from_le_bytes(buf4);

        if novl < 0 {
            return Err(anyhow!("inconsistent header: negative record count {}", novl));
        }
        if tspace <= 0 {
            return Err(anyhow!(
                "inconsistent header: non-positive trace spacing {}",
                tspace
            ));
        }

        Ok(Self {
            input,
            header: LasHeader { novl, tspace },
            seen: 0,
            raw: Vec::new(),
        })
    }

    /// Decodes the next record into `ovl`, reusing its trace buffer.
    /// Returns `Ok(false)` once all `novl` records have been read.
    /// A short read anywhere inside a record is fatal.
    pub fn read_into(&mut self, ovl: &mut Overlap) -> Result<bool> {
        if self.seen >= self.header.novl {
            return Ok(false);
        }

        let mut fields = [0u8; RECORD_BYTES];
        self.input
            .read_exact(&mut fields)
            .map_err(|e| anyhow!("record {}: short read in overlap fields: {}", self.seen, e))?;

        let f = |i: usize| i32::from_le_bytes(fields[4 * i..4 * i + 4].try_into().unwrap());

        ovl.tlen = f(0);
        ovl.diffs = f(1);
        ovl.abpos = f(2);
        ovl.bbpos = f(3);
        ovl.aepos = f(4);
        ovl.bepos = f(5);
        ovl.flags = f(6) as u32;
        ovl.aread = f(7);
        ovl.bread = f(8);
        ovl.alen = f(9);
        ovl.blen = f(10);

        if ovl.tlen < 0 {
            return Err(anyhow!(
                "record {}: negative trace length {}",
                self.seen,
                ovl.tlen
            ));
        }

        let tlen = ovl.tlen as usize;
        let tbytes = self.header.trace_bytes();

        // Grow factor 1.2 plus fixed slack, as the producer does
        if tlen > ovl.trace.len() {
            ovl.trace.resize(tlen + tlen / 5 + TRACE_SLACK, 0);
        }

        self.raw.resize(tlen * tbytes, 0);
        self.input
            .read_exact(&mut self.raw)
            .map_err(|e| anyhow!("record {}: short read in trace values: {}", self.seen, e))?;

        if tbytes == 1 {
            for (i, &b) in self.raw.iter().enumerate() {
                ovl.trace[i] = b as u16;
            }
        } else {
            for i in 0..tlen {
                ovl.trace[i] = u16::from_le_bytes([self.raw[2 * i], self.raw[2 * i + 1]]);
            }
        }

        self.seen += 1;
        Ok(true)
    }
}

/// Encoder matching `LasReader`, used to build overlap files.
pub struct LasWriter<W: Write> {
    output: W,
    header: LasHeader,
    written: i64,
}

impl LasWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P, novl: i64, tspace: i32) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("could not create {}", path.display()))?;
        Self::new(BufWriter::new(file), novl, tspace)
    }
}

impl<W: Write> LasWriter<W> {
    pub fn new(mut output: W, novl: i64, tspace: i32) -> Result<Self> {
        if tspace <= 0 {
            return Err(anyhow!("non-positive trace spacing {}", tspace));
        }
        output.write_all(&novl.to_le_bytes())?;
        output.write_all(&tspace.to_le_bytes())?;
        Ok(Self {
            output,
            header: LasHeader { novl, tspace },
            written: 0,
        })
    }

    pub fn write_record(&mut self, ovl: &Overlap) -> Result<()> {
        if self.written >= self.header.novl {
            return Err(anyhow!(
                "more than the declared {} records written",
                self.header.novl
            ));
        }

        let mut fields = [0u8; RECORD_BYTES];
        let values = [
            ovl.tlen,
            ovl.diffs,
            ovl.abpos,
            ovl.bbpos,
            ovl.aepos,
            ovl.bepos,
            ovl.flags as i32,
            ovl.aread,
            ovl.bread,
            ovl.alen,
            ovl.blen,
        ];
        for (i, v) in values.iter().enumerate() {
            fields[4 * i..4 * i + 4].copy_from_slice(&v.to_le_bytes());
        }
        self.output.write_all(&fields)?;

        let trace = ovl.trace();
        if self.header.trace_bytes() == 1 {
            for &t in trace {
                if t > u8::MAX as u16 {
                    return Err(anyhow!(
                        "trace value {} does not fit 1-byte encoding (tspace {})",
                        t,
                        self.header.tspace
                    ));
                }
                self.output.write_all(&[t as u8])?;
            }
        } else {
            for &t in trace {
                self.output.write_all(&t.to_le_bytes())?;
            }
        }

        self.written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        if self.written != self.header.novl {
            return Err(anyhow!(
                "{} records declared but {} written",
                self.header.novl,
                self.written
            ));
        }
        self.output.flush()?;
        Ok(())
    }
}
