use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::error::{HivevoError, Result};
use crate::stats::Alignment;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    /// 原样保留 gap 与非标准字符，仅转大写
    pub seq: Vec<u8>,
}

/// 流式 FASTA 读取器，多行序列会被拼接
pub struct FastaReader<R: BufRead> {
    reader: R,
    line: String,
    pending_header: Option<String>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pending_header: None,
            done: false,
        }
    }

    fn read_line(&mut self) -> std::io::Result<bool> {
        self.line.clear();
        Ok(self.reader.read_line(&mut self.line)? > 0)
    }

    pub fn next_record(&mut self) -> std::io::Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        let header = match self.pending_header.take() {
            Some(h) => h,
            None => loop {
                if !self.read_line()? {
                    self.done = true;
                    return Ok(None);
                }
                if let Some(rest) = self.line.strip_prefix('>') {
                    break rest.trim().to_string();
                }
            },
        };

        let (id, desc) = match header.split_once(char::is_whitespace) {
            Some((id, rest)) => {
                let rest = rest.trim();
                (id.to_string(), (!rest.is_empty()).then(|| rest.to_string()))
            }
            None => (header, None),
        };

        let mut seq = Vec::new();
        loop {
            if !self.read_line()? {
                self.done = true;
                break;
            }
            if let Some(rest) = self.line.strip_prefix('>') {
                self.pending_header = Some(rest.trim().to_string());
                break;
            }
            seq.extend(
                self.line
                    .bytes()
                    .filter(|b| !b.is_ascii_whitespace())
                    .map(|b| b.to_ascii_uppercase()),
            );
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = std::io::Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Reads a FASTA multiple alignment; all rows must have the same length.
pub fn read_alignment(path: &Path) -> Result<Alignment> {
    let fh = std::fs::File::open(path).map_err(|e| HivevoError::data_load(path, e))?;
    let reader = FastaReader::new(std::io::BufReader::new(fh));
    let rows = reader
        .map(|rec| rec.map(|r| r.seq))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| HivevoError::data_load(path, e))?;
    let aln = Alignment::new(rows).map_err(|e| HivevoError::data_load(path, e))?;
    debug!(path = %path.display(), rows = aln.num_rows(), width = aln.width(), "alignment loaded");
    Ok(aln)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn parse_alignment_records_with_gaps() {
        let data = b">s1 patient one\nAC-GT\nac\n>s2\nACG-TTA\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.id, "s1");
        assert_eq!(r1.desc.as_deref(), Some("patient one"));
        assert_eq!(r1.seq, b"AC-GTAC");

        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.id, "s2");
        assert_eq!(r2.desc, None);
        assert_eq!(r2.seq, b"ACG-TTA");

        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn parse_with_crlf_and_leading_blank_lines() {
        let data = b"\r\n\n>x desc\r\nA C\r\n-T\r\n";
        let recs: Vec<_> = FastaReader::new(Cursor::new(&data[..]))
            .collect::<std::io::Result<_>>()
            .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].seq, b"AC-T");
    }

    #[test]
    fn read_alignment_rejects_ragged_rows() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b">a\nACGT\n>b\nACG\n").unwrap();
        let err = read_alignment(f.path()).unwrap_err();
        assert!(matches!(err, HivevoError::DataLoad { .. }));
    }

    #[test]
    fn read_alignment_missing_file() {
        let err = read_alignment(Path::new("/nonexistent/aln.fasta")).unwrap_err();
        assert!(matches!(err, HivevoError::DataLoad { .. }));
    }
}
