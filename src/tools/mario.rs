//! Double half-pyramid rendering.

use anyhow::{bail, Result};

/// Render a double half-pyramid of the given height (1 through 8).
///
/// Each row is a right-aligned block of `#`, a two-space gap, and the
/// mirrored block.
pub fn pyramid(height: u32) -> Result<String> {
    if !(1..=8).contains(&height) {
        bail!("height must be between 1 and 8, got {}", height);
    }

    let mut out = String::new();
    for row in 1..=height {
        let spaces = (height - row) as usize;
        let blocks = "#".repeat(row as usize);
        out.push_str(&" ".repeat(spaces));
        out.push_str(&blocks);
        out.push_str("  ");
        out.push_str(&blocks);
        out.push('\n');
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_one() {
        assert_eq!(pyramid(1).unwrap(), "#  #\n");
    }

    #[test]
    fn test_height_three_alignment() {
        let expected = "  #  #\n ##  ##\n###  ###\n";
        assert_eq!(pyramid(3).unwrap(), expected);
    }

    #[test]
    fn test_rejects_out_of_range_heights() {
        assert!(pyramid(0).is_err());
        assert!(pyramid(9).is_err());
        assert!(pyramid(8).is_ok());
    }
}
