//! CSV record source.
//!
//! Reads the IP geolocation dump format: semicolon-delimited, double-quoted,
//! one header row, columns
//! `ip_start;country_code;country_name;region_code;region_name;city;zipcode;latitude;longitude;metrocode`.
//! Files ending in `.gz` are decompressed on the fly.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use log::info;

use crate::error_handling::SourceError;
use crate::record::RawRecord;

use super::RecordSource;

/// Streams raw rows out of a (possibly gzipped) CSV dump.
pub struct CsvRecordSource {
    reader: csv::Reader<Box<dyn Read + Send>>,
    buf: csv::StringRecord,
}

impl CsvRecordSource {
    /// Opens `path` and positions the reader past the header row.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Open`] if the file cannot be opened: this is
    /// the "downloaded file is no longer there" case and aborts the pipeline
    /// before any record is queued.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let raw: Box<dyn Read + Send> = if path.extension().is_some_and(|e| e == "gz") {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        let reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            // Short rows surface as validation rejections, not decode aborts.
            .flexible(true)
            .from_reader(raw);

        info!("Opened input {}", path.display());

        Ok(CsvRecordSource {
            reader,
            buf: csv::StringRecord::new(),
        })
    }

    fn field(&self, idx: usize) -> String {
        self.buf.get(idx).unwrap_or("").to_string()
    }
}

impl RecordSource for CsvRecordSource {
    fn next_row(&mut self) -> Result<Option<RawRecord>, SourceError> {
        if !self.reader.read_record(&mut self.buf)? {
            return Ok(None);
        }
        Ok(Some(RawRecord {
            ip_start: self.field(0),
            country_code: self.field(1),
            country_name: self.field(2),
            region_code: self.field(3),
            region_name: self.field(4),
            city: self.field(5),
            postal_code: self.field(6),
            latitude: self.field(7),
            longitude: self.field(8),
            metro_code: self.field(9),
        }))
    }
}
