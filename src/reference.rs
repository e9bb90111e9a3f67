//! Ground-truth reader
//!
//! Records are `quantity;label[;...]` (or comma separated). The label only
//! has to contain a tag, so `wpa1302_0101.dxf` is accepted.

use crate::recognize::recognize_tag;
use crate::tagmap::TagQuantityMap;
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::BufRead;
use std::path::Path;

static FIELD_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;,]").unwrap());

/// Parsed ground truth
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    /// Expected quantity per canonical tag
    pub quantities: TagQuantityMap,
    /// Non-empty rows that were not `quantity;tag` records (headers, notes)
    pub skipped: usize,
}

/// Load a reference file
pub fn load_reference<P: AsRef<Path>>(path: P) -> Result<Reference> {
    let file = std::fs::File::open(path)?;
    read_reference(std::io::BufReader::new(file))
}

/// Parse reference records held in memory
pub fn parse_reference(content: &str) -> Reference {
    let mut reference = Reference::default();
    for (idx, line) in content.lines().enumerate() {
        apply_row(&mut reference, idx + 1, line);
    }
    finish(reference)
}

/// Read reference records from any buffered reader
pub fn read_reference<R: BufRead>(reader: R) -> Result<Reference> {
    let mut reference = Reference::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        apply_row(&mut reference, idx + 1, &line);
    }
    Ok(finish(reference))
}

fn apply_row(reference: &mut Reference, line_no: usize, line: &str) {
    let row = line.trim_start_matches('\u{feff}').trim();
    if row.is_empty() {
        return;
    }
    match parse_row(row) {
        Some((tag, quantity)) => {
            // a later row for the same tag replaces the earlier one
            reference.quantities.set(tag, quantity);
        }
        None => {
            log::debug!("Skipping reference line {}: {:?}", line_no, row);
            reference.skipped += 1;
        }
    }
}

fn parse_row(row: &str) -> Option<(String, u32)> {
    let mut fields = FIELD_SEPARATOR.split(row);
    let quantity = fields.next()?.trim().parse().ok()?;
    let tag = recognize_tag(fields.next()?)?;
    Some((tag, quantity))
}

fn finish(reference: Reference) -> Reference {
    log::debug!(
        "Reference: {} tags, {} rows skipped",
        reference.quantities.len(),
        reference.skipped
    );
    reference
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_rows() {
        let reference = parse_reference(
            "\u{feff}Qty;File\n3;wpa1302_0101.dxf\n12,ABC123-0002\n\nnote: none\n7;no tag here\n",
        );
        assert_eq!(reference.quantities.len(), 2);
        assert_eq!(reference.quantities.get("WPA1302-0101"), Some(3));
        assert_eq!(reference.quantities.get("ABC123-0002"), Some(12));
        assert_eq!(reference.skipped, 3);
    }

    #[test]
    fn test_later_row_overwrites() {
        let reference = parse_reference("2;AB123-456\n5;ab123_456\n");
        assert_eq!(reference.quantities.get("AB123-456"), Some(5));
    }

    #[test]
    fn test_zero_and_large_quantities_kept() {
        let reference = parse_reference("0;AB123-456\n1500;CD123-456\n");
        assert_eq!(reference.quantities.get("AB123-456"), Some(0));
        assert_eq!(reference.quantities.get("CD123-456"), Some(1500));
    }

    #[test]
    fn test_load_reference_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "4;XY100-200").unwrap();
        writeln!(file, " 6 ; ZZ9999-999 ").unwrap();
        let reference = load_reference(file.path()).unwrap();
        assert_eq!(reference.quantities.get("XY100-200"), Some(4));
        assert_eq!(reference.quantities.get("ZZ9999-999"), Some(6));
        assert_eq!(reference.skipped, 0);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_reference("/nonexistent/reference.csv").is_err());
    }
}
