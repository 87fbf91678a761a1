//! Record validation.
//!
//! Pure function from a raw row to a validated [`GeoIpRecord`] or a
//! [`ValidationRejection`] naming the reason. Rejections are counted and
//! skipped by the producer; they never abort the pipeline.

use crate::config::MAX_IP_START;
use crate::error_handling::ValidationRejection;

use super::types::{GeoIpRecord, RawRecord};

/// Validates one raw row.
///
/// Required: `ip_start` (0..=[`MAX_IP_START`]), `country_code` (exactly two
/// characters), parseable in-range `latitude`/`longitude`. Everything else is
/// optional and defaults to the empty string.
///
/// # Errors
///
/// Returns the first violated constraint, checked in column order.
pub fn validate(raw: &RawRecord) -> Result<GeoIpRecord, ValidationRejection> {
    let ip_field = raw.ip_start.trim();
    if ip_field.is_empty() {
        return Err(ValidationRejection::MissingRequiredField("ip_start"));
    }
    // Parse wide, then range-check, so values above u32::MAX report as
    // out-of-range rather than malformed.
    let ip_start: u64 = ip_field
        .parse()
        .map_err(|_| ValidationRejection::MalformedNumeric {
            field: "ip_start",
            value: raw.ip_start.clone(),
        })?;
    if ip_start > u64::from(MAX_IP_START) {
        return Err(ValidationRejection::OutOfRangeNumeric {
            field: "ip_start",
            value: raw.ip_start.clone(),
        });
    }

    let country_code = raw.country_code.trim();
    if country_code.chars().count() != 2 {
        return Err(ValidationRejection::MissingRequiredField("country_code"));
    }

    let lat = parse_coordinate("latitude", &raw.latitude, 90.0)?;
    let lon = parse_coordinate("longitude", &raw.longitude, 180.0)?;

    Ok(GeoIpRecord {
        ip_start: ip_start as u32,
        country_code: country_code.to_string(),
        country_name: raw.country_name.trim().to_string(),
        region_code: raw.region_code.trim().to_string(),
        region_name: raw.region_name.trim().to_string(),
        city: raw.city.trim().to_string(),
        postal_code: raw.postal_code.trim().to_string(),
        metro_code: raw.metro_code.trim().to_string(),
        lat,
        lon,
    })
}

fn parse_coordinate(
    field: &'static str,
    value: &str,
    bound: f64,
) -> Result<f64, ValidationRejection> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationRejection::MissingRequiredField(field));
    }
    let parsed: f64 = trimmed
        .parse()
        .map_err(|_| ValidationRejection::MalformedNumeric {
            field,
            value: value.to_string(),
        })?;
    if !parsed.is_finite() || parsed < -bound || parsed > bound {
        return Err(ValidationRejection::OutOfRangeNumeric {
            field,
            value: value.to_string(),
        });
    }
    Ok(parsed)
}
