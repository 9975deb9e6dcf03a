use std::io::Read;

use flate2::read::GzDecoder;
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvError {
    /// The bytes are not valid gzip, or the decompressed text is not UTF-8.
    #[error("failed to decompress: {0}")]
    Decompress(#[source] std::io::Error),

    /// The decompressed text is not well-formed CSV.
    #[error("failed to parse CSV: {0}")]
    Parse(#[from] csv::Error),
}

/// Decompresses `bytes` and parses them as CSV with a header row.
///
/// Each record becomes a map from header name to field, in column order.
pub fn read_gzip_csv(bytes: &[u8]) -> Result<Vec<IndexMap<String, String>>, CsvError> {
    let mut text = String::new();
    GzDecoder::new(bytes)
        .read_to_string(&mut text)
        .map_err(CsvError::Decompress)?;

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let rows = reader
        .deserialize::<IndexMap<String, String>>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
pub(crate) fn gzip(text: &str) -> Vec<u8> {
    use std::io::Write;

    use flate2::{Compression, write::GzEncoder};

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}
