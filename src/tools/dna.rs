//! DNA short-tandem-repeat (STR) profile matching.
//!
//! The profile database is a CSV whose header row names the STRs
//! (`name,AGAT,AATG,TATC`) and whose data rows carry the repeat counts for
//! each person. A sequence matches a person when the longest run of every
//! STR in the sequence equals that person's counts exactly.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Longest run of consecutive repeats of `pattern` within `sequence`.
///
/// Scanning resumes one character past the end of a run, so runs never
/// overlap each other.
pub fn longest_run(sequence: &str, pattern: &str) -> usize {
    let seq = sequence.as_bytes();
    let pat = pattern.as_bytes();
    if pat.is_empty() {
        return 0;
    }

    let mut best = 0;
    let mut i = 0;
    while i < seq.len() {
        if seq[i..].starts_with(pat) {
            let mut count = 0;
            while seq[i..].starts_with(pat) {
                count += 1;
                i += pat.len();
            }
            best = best.max(count);
        }
        i += 1;
    }

    best
}

/// Match a sequence against profiles read from CSV data.
///
/// Returns the first profile whose counts equal the sequence's maxima.
pub fn identify_from<R: Read>(csv_data: R, sequence: &str) -> Result<Option<String>> {
    let mut reader = csv::Reader::from_reader(csv_data);

    let strs: Vec<String> = reader
        .headers()
        .context("Failed to read STR header row")?
        .iter()
        .skip(1)
        .map(|s| s.to_string())
        .collect();

    let counts: Vec<usize> = strs
        .iter()
        .map(|s| longest_run(sequence, s))
        .collect();

    for record in reader.records() {
        let record = record.context("Failed to read profile row")?;
        let name = record
            .get(0)
            .context("Profile row missing name column")?
            .to_string();

        let profile: Vec<usize> = record
            .iter()
            .skip(1)
            .map(|field| field.trim().parse::<usize>())
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("Non-numeric repeat count for {}", name))?;

        if profile == counts {
            return Ok(Some(name));
        }
    }

    Ok(None)
}

/// Match the sequence in `sequence_path` against the CSV at `csv_path`.
pub fn identify(csv_path: &Path, sequence_path: &Path) -> Result<Option<String>> {
    let csv_file = File::open(csv_path)
        .with_context(|| format!("Failed to open {}", csv_path.display()))?;
    let mut sequence = String::new();
    File::open(sequence_path)
        .with_context(|| format!("Failed to open {}", sequence_path.display()))?
        .read_to_string(&mut sequence)
        .context("Failed to read sequence file")?;

    identify_from(csv_file, sequence.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILES: &str = "\
name,AGAT,AATG,TATC
Alice,2,8,3
Bob,4,1,5
Charlie,3,2,5
";

    #[test]
    fn test_longest_run_counts_consecutive_repeats() {
        assert_eq!(longest_run("AGATAGATAGAT", "AGAT"), 3);
        assert_eq!(longest_run("AGATAGATTTAGAT", "AGAT"), 2);
        assert_eq!(longest_run("TTTT", "AGAT"), 0);
        assert_eq!(longest_run("", "AGAT"), 0);
    }

    #[test]
    fn test_longest_run_picks_the_longest_of_many() {
        // One run of 2, later a run of 4.
        assert_eq!(longest_run("AATGAATGCCAATGAATGAATGAATG", "AATG"), 4);
    }

    #[test]
    fn test_identify_finds_matching_profile() {
        let sequence = concat!(
            "TT",
            "AGATAGATAGAT", // AGAT x3
            "CC",
            "AATGAATG", // AATG x2
            "GG",
            "TATCTATCTATCTATCTATC", // TATC x5
        );

        let result = identify_from(PROFILES.as_bytes(), sequence).unwrap();
        assert_eq!(result.as_deref(), Some("Charlie"));
    }

    #[test]
    fn test_identify_requires_exact_counts() {
        // AGAT x2 but AATG and TATC absent: nobody matches 2,0,0.
        let result = identify_from(PROFILES.as_bytes(), "AGATAGAT").unwrap();
        assert_eq!(result, None);
    }
}
