//! Index document construction.
//!
//! An [`IndexDocument`] is the unit submitted to the index sink: the original
//! record fields, four IP-octet integer fields for range/prefix filtering,
//! and one tile identifier per configured resolution level. Built by the
//! writer worker that owns the record, handed to the sink, never referenced
//! again.


use crate::record::GeoIpRecord;
use crate::tile::TileEncoder;

/// The four octets of an IPv4 address, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpOctets {
    /// First (most significant) octet.
    pub a: u8,
    /// Second octet.
    pub b: u8,
    /// Third octet.
    pub c: u8,
    /// Fourth (least significant) octet.
    pub d: u8,
}

/// Decomposes a numeric IPv4 address into its octets.
pub fn ip_octets(ip: u32) -> IpOctets {
    IpOctets {
        a: ((ip / 16_777_216) % 256) as u8,
        b: ((ip / 65_536) % 256) as u8,
        c: ((ip / 256) % 256) as u8,
        d: (ip % 256) as u8,
    }
}

/// One document ready for submission to the index sink.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocument {
    /// The validated record this document was built from.
    pub record: GeoIpRecord,
    /// IP-octet fields (`ip_start_a` .. `ip_start_d`).
    pub octets: IpOctets,
    /// `(level, tile id)` pairs, coarse to fine, one per configured level.
    pub tiles: Vec<(u8, f64)>,
}

/// Builds index documents for a fixed level range.
///
/// Owns the tile encoder so the per-record path is pure arithmetic. Shared
/// read-only across the worker pool.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    encoder: TileEncoder,
}

impl DocumentBuilder {
    /// Creates a builder computing tiles for `levels` inclusively.
    pub fn new(levels: std::ops::RangeInclusive<u8>) -> Self {
        DocumentBuilder {
            encoder: TileEncoder::new(levels),
        }
    }

    /// Number of tile fields every built document carries.
    pub fn tile_field_count(&self) -> usize {
        self.encoder.level_count()
    }

    /// Builds the document for one record, consuming it.
    pub fn build(&self, record: GeoIpRecord) -> IndexDocument {
        let octets = ip_octets(record.ip_start);
        let tiles = self.encoder.assignments(record.lat, record.lon);
        IndexDocument {
            record,
            octets,
            tiles,
        }
    }
}
