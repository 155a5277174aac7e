use crate::clustering::{ClusteringError, ClusteringResult};
use crate::core::feature::FeatureVector;
use csv::{Reader, ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

/// Cells read as a missing coordinate.
pub const MISSING_TOKENS: [&str; 3] = ["", "?", "NA"];

fn builder(delimiter: u8) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(delimiter)
        .has_headers(true)
        .comment(Some(b'#'))
        .flexible(false)
        .trim(csv::Trim::All);
    builder
}

/// Reads a delimited file with a header line. The first column is the row
/// id, every other column a numeric coordinate; lines starting with `#` are
/// skipped and every record must have as many cells as the header.
pub fn read_rows<P: AsRef<Path>>(path: P, delimiter: u8) -> ClusteringResult<Vec<FeatureVector<f64>>> {
    rows_from_csv(builder(delimiter).from_path(path)?)
}

/// Same as [`read_rows`], from any reader.
pub fn read_rows_from<R: Read>(reader: R, delimiter: u8) -> ClusteringResult<Vec<FeatureVector<f64>>> {
    rows_from_csv(builder(delimiter).from_reader(reader))
}

fn rows_from_csv<R: Read>(mut reader: Reader<R>) -> ClusteringResult<Vec<FeatureVector<f64>>> {
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = parse_record(&record, rows.len())?;
        rows.push(row);
    }
    Ok(rows)
}

fn parse_record(record: &StringRecord, index: usize) -> ClusteringResult<FeatureVector<f64>> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let id = record
        .get(0)
        .ok_or_else(|| ClusteringError::InvalidData(format!("line {}: empty record", line)))?;
    let values = record
        .iter()
        .skip(1)
        .map(|cell| {
            if MISSING_TOKENS.contains(&cell) {
                Ok(None)
            } else {
                cell.parse::<f64>().map(Some).map_err(|e| {
                    ClusteringError::InvalidData(format!("line {}: '{}': {}", line, cell, e))
                })
            }
        })
        .collect::<ClusteringResult<Vec<Option<f64>>>>()?;
    Ok(FeatureVector::new(id, index, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_comment_before_header() {
        let data = "# exported data\nid,x,y\na,1.0,2.0\nb,3.0,4.0\n";
        let rows = read_rows_from(data.as_bytes(), b',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].id(), "b");
        assert_eq!(rows[1].index(), 1);
        assert_eq!(rows[0].get(1), Some(2.0));
    }

    #[test]
    fn test_missing_tokens() {
        let data = "id,x,y,z\na,,?,NA\nb, 1.5 ,2,3\n";
        let rows = read_rows_from(data.as_bytes(), b',').unwrap();
        assert_eq!(rows[0].len(), 3);
        assert!((0..3).all(|i| rows[0].get(i).is_none()));
        assert_eq!(rows[1].get(0), Some(1.5));
    }

    #[test]
    fn test_quoted_id() {
        let data = "id,x\n\"a,b\",1.0\n";
        let rows = read_rows_from(data.as_bytes(), b',').unwrap();
        assert_eq!(rows[0].id(), "a,b");
        assert_eq!(rows[0].get(0), Some(1.0));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let data = "id,x,y\na,1.0,2.0\nb,3.0\n";
        assert!(matches!(read_rows_from(data.as_bytes(), b','), Err(ClusteringError::Csv(_))));
    }

    #[test]
    fn test_non_numeric_cell() {
        let data = "id,x\na,abc\n";
        assert!(matches!(
            read_rows_from(data.as_bytes(), b','),
            Err(ClusteringError::InvalidData(msg)) if msg.contains("abc")
        ));
    }

    #[test]
    fn test_read_rows_from_file_with_semicolons() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "id;x\np;1\nq;2\n").unwrap();
        let rows = read_rows(file.path(), b';').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get(0), Some(2.0));
    }
}
