//! Fragment sources.
//!
//! Glyph extraction from the statement document happens outside this
//! workspace. A decoder dumps its positioned text as CSV or JSON and the
//! sources here load it back:
//!
//!   page,x,y,text
//!   1,40.5,712.0,RODRIGO S SILVA - 4258 XXXX XXXX 1234
//!   1,40.5,698.2,15/03
//!   1,72.0,698.9,SUPERMARKET XYZ

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::types::TextFragment;

/// Anything that can produce the full fragment set of one document.
pub trait FragmentSource {
    fn fragments(&self) -> Result<Vec<TextFragment>, SourceError>;
}

/// Fragments already in memory
impl FragmentSource for Vec<TextFragment> {
    fn fragments(&self) -> Result<Vec<TextFragment>, SourceError> {
        validate(self.clone())
    }
}

/// On-disk dump format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    Csv,
    Json,
}

impl DumpFormat {
    /// Guess from the file extension; anything that is not `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DumpFormat::Json,
            _ => DumpFormat::Csv,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvFragmentSource {
    path: PathBuf,
}

impl CsvFragmentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FragmentSource for CsvFragmentSource {
    fn fragments(&self) -> Result<Vec<TextFragment>, SourceError> {
        let file = File::open(&self.path)?;
        read_csv_fragments(BufReader::new(file))
    }
}

#[derive(Debug, Clone)]
pub struct JsonFragmentSource {
    path: PathBuf,
}

impl JsonFragmentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FragmentSource for JsonFragmentSource {
    fn fragments(&self) -> Result<Vec<TextFragment>, SourceError> {
        let file = File::open(&self.path)?;
        read_json_fragments(BufReader::new(file))
    }
}

/// Build the source matching `format` for `path`.
pub fn open_source(path: &Path, format: DumpFormat) -> Box<dyn FragmentSource + Send + Sync> {
    match format {
        DumpFormat::Csv => Box::new(CsvFragmentSource::new(path)),
        DumpFormat::Json => Box::new(JsonFragmentSource::new(path)),
    }
}

/// Decode a CSV dump with a `page,x,y,text` header row (column order free).
pub fn read_csv_fragments<R: Read>(reader: R) -> Result<Vec<TextFragment>, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut out = Vec::new();
    for result in rdr.deserialize::<TextFragment>() {
        out.push(result?);
    }
    validate(out)
}

/// Decode a JSON array of `{ "page", "x", "y", "text" }` objects.
pub fn read_json_fragments<R: Read>(reader: R) -> Result<Vec<TextFragment>, SourceError> {
    let fragments: Vec<TextFragment> = serde_json::from_reader(reader)?;
    validate(fragments)
}

fn validate(fragments: Vec<TextFragment>) -> Result<Vec<TextFragment>, SourceError> {
    for (index, f) in fragments.iter().enumerate() {
        if f.page == 0 {
            return Err(SourceError::Malformed {
                index,
                reason: "page numbers start at 1".into(),
            });
        }
        if !f.x.is_finite() || !f.y.is_finite() {
            return Err(SourceError::Malformed {
                index,
                reason: format!("non-finite position ({}, {})", f.x, f.y),
            });
        }
    }

    if fragments.iter().all(|f| f.text.trim().is_empty()) {
        return Err(SourceError::Empty);
    }

    debug!("loaded {} text fragments", fragments.len());
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_csv_dump() {
        let csv = "page,x,y,text\n\
                   1,40.5,712.0,RODRIGO S SILVA - 4258 XXXX XXXX 1234\n\
                   1,40.5,698.2,15/03\n\
                   1,72.0,698.9,\"SUPERMARKET, XYZ\"\n";
        let frags = read_csv_fragments(csv.as_bytes()).unwrap();
        assert_eq!(frags.len(), 3);
        assert_eq!(frags[0].page, 1);
        assert_eq!(frags[1].y, 698.2);
        assert_eq!(frags[2].text, "SUPERMARKET, XYZ");
    }

    #[test]
    fn test_reads_json_dump() {
        let json = r#"[{"page": 2, "x": 310.0, "y": 500.0, "text": "Despesas"}]"#;
        let frags = read_json_fragments(json.as_bytes()).unwrap();
        assert_eq!(frags, vec![TextFragment::new(2, 310.0, 500.0, "Despesas")]);
    }

    #[test]
    fn test_empty_document_is_fatal() {
        let err = read_csv_fragments("page,x,y,text\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SourceError::Empty));

        let blank = vec![TextFragment::new(1, 0.0, 0.0, "   ")];
        assert!(matches!(blank.fragments(), Err(SourceError::Empty)));
    }

    #[test]
    fn test_rejects_page_zero_and_bad_rows() {
        let err = read_csv_fragments("page,x,y,text\n0,1.0,2.0,abc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { index: 0, .. }));

        let err = read_csv_fragments("page,x,y,text\n1,abc,2.0,abc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SourceError::Csv(_)));

        let err = read_json_fragments("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let src = CsvFragmentSource::new("/definitely/not/here.csv");
        assert!(matches!(src.fragments(), Err(SourceError::Io(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DumpFormat::from_path(Path::new("a.JSON")), DumpFormat::Json);
        assert_eq!(DumpFormat::from_path(Path::new("a.csv")), DumpFormat::Csv);
        assert_eq!(DumpFormat::from_path(Path::new("dump")), DumpFormat::Csv);
    }
}
