//! Reads the raw incident CSV.
//!
//! The source file is Latin-1 encoded, so bytes are decoded before the CSV
//! reader sees them. Only the header is validated here; cell parsing is the
//! normalizer's job.

use crate::error::LoadError;
use crate::types::RawRow;
use crate::util::decode_latin1;
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

/// Columns the source must provide. Any others are ignored.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "iyear",
    "imonth",
    "iday",
    "provstate",
    "city",
    "longitude",
    "latitude",
    "nkill",
    "nwound",
    "summary",
    "target1",
    "gname",
];

#[derive(Debug, Clone)]
pub struct RawLoad {
    pub rows: Vec<RawRow>,
    /// Rows the CSV reader could not turn into a [`RawRow`].
    pub malformed_rows: usize,
}

pub fn load_raw_rows(path: impl AsRef<Path>) -> Result<RawLoad, LoadError> {
    let path = path.as_ref();
    log::info!("Loading incidents from {}", path.display());
    let file = std::fs::File::open(path)?;
    load_raw_rows_from_reader(file)
}

pub fn load_raw_rows_from_reader<R: Read>(mut reader: R) -> Result<RawLoad, LoadError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = decode_latin1(&bytes);

    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| (*col).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns { missing });
    }

    let mut rows = Vec::new();
    let mut malformed_rows = 0usize;
    for result in rdr.deserialize::<RawRow>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                log::debug!("Skipping malformed row: {e}");
                malformed_rows += 1;
            }
        }
    }

    log::info!("Read {} raw rows ({malformed_rows} malformed)", rows.len());
    Ok(RawLoad {
        rows,
        malformed_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "eventid,iyear,imonth,iday,provstate,city,longitude,latitude,nkill,nwound,summary,target1,gname";

    #[test]
    fn reads_rows_and_ignores_extra_columns() {
        let csv = format!(
            "{HEADER}\n1,2015,3,0,X,A,44.1,33.3,2,5,Bomb,Market,Group\n2,2016,5,1,Y,B,,,,,,,\n"
        );
        let load = load_raw_rows_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(load.rows.len(), 2);
        assert_eq!(load.malformed_rows, 0);
        assert_eq!(load.rows[0].year.as_deref(), Some("2015"));
        assert_eq!(load.rows[0].actor_group.as_deref(), Some("Group"));
        assert_eq!(load.rows[1].longitude, None);
    }

    #[test]
    fn decodes_latin1_cells() {
        let mut bytes = format!("{HEADER}\n1,2015,3,1,").into_bytes();
        bytes.extend_from_slice(b"S\xe3o Paulo,S\xe3o Paulo,,,,,,,\n");
        let load = load_raw_rows_from_reader(bytes.as_slice()).unwrap();
        assert_eq!(load.rows[0].region.as_deref(), Some("São Paulo"));
    }

    #[test]
    fn reports_every_missing_column() {
        let csv = "iyear,imonth,iday,city\n2015,3,1,A\n";
        let err = load_raw_rows_from_reader(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::MissingColumns { missing } => {
                assert!(missing.contains(&"provstate".to_string()));
                assert!(missing.contains(&"gname".to_string()));
                assert!(!missing.contains(&"city".to_string()));
                assert_eq!(missing.len(), 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_raw_rows("/definitely/not/here/terrorism.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "1,1970,7,2,Lima,Lima,,,1,0,,,Unknown").unwrap();
        file.flush().unwrap();

        let load = load_raw_rows(file.path()).unwrap();
        assert_eq!(load.rows.len(), 1);
        assert_eq!(load.rows[0].city.as_deref(), Some("Lima"));
    }
}
