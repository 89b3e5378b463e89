use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::{Reader, ReaderBuilder};
use flate2::read::MultiGzDecoder;

use crate::input::InputError;

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    /// `.csv` and `.csv.gz` are comma separated, everything else is tab separated.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(name.as_str());
        if name.ends_with(".csv") {
            Delimiter::Comma
        } else {
            Delimiter::Tab
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }
}

/// Delimited reader over a possibly gzipped file. Quoted fields may contain
/// the delimiter, doubled quotes and line breaks (geometry is often quoted
/// WKT or GeoJSON). Row width is checked by the caller.
pub fn open_delimited(path: &Path) -> Result<Reader<Box<dyn BufRead>>, InputError> {
    let source = open_maybe_gz(path)?;
    Ok(ReaderBuilder::new()
        .delimiter(Delimiter::from_path(path).as_byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(source))
}
