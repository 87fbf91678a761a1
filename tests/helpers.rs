// Shared test helpers for input files and configuration.
//
// This module provides common utilities used across multiple test files to
// reduce duplication.

use std::io::Write;
use std::path::{Path, PathBuf};

use ip_spatial_index::{Config, LogLevel};

/// Header row of the IP geolocation dump format.
pub const CSV_HEADER: &str = "\"ip_start\";\"country_code\";\"country_name\";\"region_code\";\"region_name\";\"city\";\"zipcode\";\"latitude\";\"longitude\";\"metrocode\"";

/// Formats one quoted, semicolon-delimited data row.
#[allow(clippy::too_many_arguments)]
pub fn csv_row(
    ip_start: &str,
    country_code: &str,
    country_name: &str,
    region_code: &str,
    region_name: &str,
    city: &str,
    zipcode: &str,
    latitude: &str,
    longitude: &str,
    metrocode: &str,
) -> String {
    format!(
        "\"{ip_start}\";\"{country_code}\";\"{country_name}\";\"{region_code}\";\"{region_name}\";\"{city}\";\"{zipcode}\";\"{latitude}\";\"{longitude}\";\"{metrocode}\""
    )
}

/// A well-formed Chicago row with the given numeric IP.
#[allow(dead_code)] // Used by other test files
pub fn chicago_row(ip_start: &str) -> String {
    csv_row(
        ip_start,
        "US",
        "United States",
        "17",
        "Illinois",
        "Chicago",
        "60611",
        "41.9288",
        "-87.6315",
        "602",
    )
}

/// Writes header plus `rows` to `name` inside `dir` and returns the path.
#[allow(dead_code)] // Used by other test files
pub fn write_csv(dir: &Path, name: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut body = String::from(CSV_HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    std::fs::write(&path, body).expect("Failed to write test CSV");
    path
}

/// Same as [`write_csv`] but gzip-compressed; `name` should end in `.gz`.
#[allow(dead_code)] // Used by other test files
pub fn write_csv_gz(dir: &Path, name: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).expect("Failed to create gzip test CSV");
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    writeln!(encoder, "{}", CSV_HEADER).expect("Failed to write header");
    for row in rows {
        writeln!(encoder, "{}", row).expect("Failed to write row");
    }
    encoder.finish().expect("Failed to finish gzip stream");
    path
}

/// A small, quiet configuration pointed at the given input and database.
#[allow(dead_code)] // Used by other test files
pub fn test_config(input: PathBuf, db_path: PathBuf) -> Config {
    Config {
        input,
        db_path,
        queue_capacity: 64,
        workers: 2,
        pop_timeout_secs: 1,
        progress_interval: 0,
        log_level: LogLevel::Error, // Reduce noise in tests
        ..Default::default()
    }
}
