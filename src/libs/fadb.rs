use anyhow::{anyhow, Result};

/// Read store consulted by the alignment display mode. Reads are
/// addressed by the 0-based indices the aligner assigned them.
pub trait SequenceDb {
    fn read_count(&self) -> usize;

    fn load_read(&self, index: usize) -> Result<&[u8]>;
}

/// FASTA-backed sequence database.
///
/// Read index is record order in the file, which is the aligner's
/// numbering for untrimmed databases. Sequences are held uppercase.
pub struct FaDb {
    names: Vec<String>,
    reads: Vec<Vec<u8>>,
}

impl FaDb {
    /// Loads a (possibly gzipped) FASTA file.
    pub fn open(input: &str) -> Result<Self> {
        let reader = intspan::reader(input);
        let mut fa_in = noodles_fasta::io::Reader::new(reader);

        let mut names = Vec::new();
        let mut reads = Vec::new();
        for result in fa_in.records() {
            let record = result?;
            let name = String::from_utf8(record.name().into())?;
            let seq: Vec<u8> = record
                .sequence()
                .get(..)
                .unwrap_or(&[])
                .iter()
                .map(|b| b.to_ascii_uppercase())
                .collect();
            names.push(name);
            reads.push(seq);
        }

        Ok(Self { names, reads })
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|s| s.as_str())
    }
}

impl SequenceDb for FaDb {
    fn read_count(&self) -> usize {
        self.reads.len()
    }

    fn load_read(&self, index: usize) -> Result<&[u8]> {
        self.reads
            .get(index)
            .map(|s| s.as_slice())
            .ok_or_else(|| anyhow!("read {} not in database ({} reads)", index, self.reads.len()))
    }
}

/// Reverse complement, IUPAC-aware for the common bases; other bytes
/// pass through unchanged.
pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| match b {
            b'A' => b'T',
            b'T' => b'A',
            b'C' => b'G',
            b'G' => b'C',
            b'a' => b't',
            b't' => b'a',
            b'c' => b'g',
            b'g' => b'c',
            other => other,
        })
        .collect()
}
