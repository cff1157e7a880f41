//! Delimiter sniffing for delimited text uploads.
//!
//! Every candidate byte is counted per line (ignoring anything inside double
//! quotes). A candidate is plausible when its most common per-line count is
//! non-zero and holds on at least [`MIN_CONSISTENCY`] of the sampled lines.
//! The most consistent candidate wins; ties fall back to [`PREFERRED`] order,
//! then to byte value, so the result only depends on the sample.

use std::collections::BTreeMap;

use crate::core::TabchatError;

/// Bytes read from the head of a file before sniffing.
pub const SAMPLE_BYTES: usize = 1024;

const PREFERRED: [u8; 6] = [b',', b'\t', b';', b' ', b':', b'|'];
const MIN_CONSISTENCY: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    delimiter: u8,
    consistency: f64,
}

impl Candidate {
    fn rank(&self) -> usize {
        PREFERRED
            .iter()
            .position(|&d| d == self.delimiter)
            .unwrap_or(PREFERRED.len())
    }
}

/// Infer the field delimiter from the first bytes of a delimited text file.
pub fn sniff_delimiter(sample: &[u8]) -> Result<u8, TabchatError> {
    let text = String::from_utf8_lossy(sample);
    let lines = sample_lines(&text, sample.len() >= SAMPLE_BYTES);
    if lines.is_empty() {
        return Err(TabchatError::ParseError(
            "Could not determine delimiter: empty sample".to_string(),
        ));
    }

    let mut best: Option<Candidate> = None;
    for delimiter in candidates(&lines) {
        let Some(candidate) = score(delimiter, &lines) else {
            continue;
        };
        let better = match &best {
            None => true,
            Some(current) => {
                candidate.consistency > current.consistency
                    || (candidate.consistency == current.consistency
                        && (candidate.rank(), candidate.delimiter)
                            < (current.rank(), current.delimiter))
            }
        };
        if better {
            best = Some(candidate);
        }
    }

    best.map(|c| c.delimiter)
        .ok_or_else(|| TabchatError::ParseError("Could not determine delimiter".to_string()))
}

/// Non-blank lines of the sample. A truncated sample loses its last line,
/// which is most likely cut mid-record.
fn sample_lines(text: &str, truncated: bool) -> Vec<&str> {
    let mut lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .collect();
    if truncated && lines.len() > 1 && !text.ends_with('\n') {
        lines.pop();
    }
    lines
}

fn candidates(lines: &[&str]) -> Vec<u8> {
    let mut seen = [false; 128];
    for line in lines {
        for b in line.bytes() {
            if b.is_ascii() && is_candidate(b) {
                seen[b as usize] = true;
            }
        }
    }
    (0u8..128).filter(|&b| seen[b as usize]).collect()
}

fn is_candidate(b: u8) -> bool {
    b == b'\t' || b == b' ' || (b.is_ascii_punctuation() && b != b'"' && b != b'\'')
}

fn score(delimiter: u8, lines: &[&str]) -> Option<Candidate> {
    let mut frequencies: BTreeMap<usize, usize> = BTreeMap::new();
    for line in lines {
        *frequencies.entry(count_unquoted(line, delimiter)).or_default() += 1;
    }

    // Ties between counts go to the larger count.
    let (&per_line, &hits) = frequencies
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)))?;
    if per_line == 0 {
        return None;
    }

    let consistency = hits as f64 / lines.len() as f64;
    (consistency >= MIN_CONSISTENCY).then_some(Candidate {
        delimiter,
        consistency,
    })
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut quoted = false;
    let mut count = 0;
    for b in line.bytes() {
        if b == b'"' {
            quoted = !quoted;
        } else if b == delimiter && !quoted {
            count += 1;
        }
    }
    count
}
