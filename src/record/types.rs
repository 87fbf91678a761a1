//! Record value types.

/// One raw row as decoded from the input stream, all fields still strings.
///
/// Column order follows the source dump:
/// `"ip_start";"country_code";"country_name";"region_code";"region_name";"city";"zipcode";"latitude";"longitude";"metrocode"`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// First address of the block, decimal string.
    pub ip_start: String,
    /// Two-letter country code.
    pub country_code: String,
    /// Country display name.
    pub country_name: String,
    /// Region/state code.
    pub region_code: String,
    /// Region/state display name.
    pub region_name: String,
    /// City name.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// Latitude, decimal string.
    pub latitude: String,
    /// Longitude, decimal string.
    pub longitude: String,
    /// Metro code.
    pub metro_code: String,
}

/// A validated, immutable IP geolocation record.
///
/// Created by the producer from one decoded input row, consumed exactly once
/// by exactly one writer worker, never mutated after creation. Optional
/// fields are empty strings, never absent.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoIpRecord {
    /// First address in the block (the pipeline enforces no cross-record
    /// uniqueness; records are processed independently).
    pub ip_start: u32,
    /// Two-letter country code, always exactly 2 characters.
    pub country_code: String,
    /// Country display name, possibly empty.
    pub country_name: String,
    /// Region/state code, possibly empty.
    pub region_code: String,
    /// Region/state display name, possibly empty.
    pub region_name: String,
    /// City name, possibly empty.
    pub city: String,
    /// Postal code, possibly empty.
    pub postal_code: String,
    /// Metro code, possibly empty.
    pub metro_code: String,
    /// Latitude in [-90, 90].
    pub lat: f64,
    /// Longitude in [-180, 180].
    pub lon: f64,
}
