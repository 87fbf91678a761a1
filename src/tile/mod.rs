//! Spatial tile encoding.
//!
//! Maps a (latitude, longitude) pair to a numeric tile identifier at a fixed
//! resolution level. The point is projected through a sinusoidal equal-area
//! projection onto a plane, the plane is cut into a uniform grid of `2^level`
//! cells per 180 units, and the (column, row) cell pair is packed into a
//! single `f64`. Two points in the same cell at the same level always yield
//! the same identifier; points in different cells never do.
//!
//! The pipeline computes one identifier per level over a fixed inclusive
//! range (default 5..=15), so a proximity query can intersect candidate tiles
//! at a coarse level cheaply and then refine, with no runtime geometry
//! beyond tile-containment checks.
//!
//! Out-of-range coordinates are undefined by contract: the record validator
//! runs before anything reaches this module.


/// Prefix of the per-level tile fields attached to each document.
pub const TIER_FIELD_PREFIX: &str = "_localTier";

/// Extent of the projected plane per axis, in degrees.
const GRID_EXTENT: f64 = 180.0;

/// Projects (lat, lon) onto the planar grid, degree scale.
///
/// Sinusoidal: the x axis shrinks with the cosine of the latitude so cell
/// area stays roughly constant toward the poles; the y axis is latitude
/// unchanged.
fn project(lat: f64, lon: f64) -> (f64, f64) {
    (lon * lat.to_radians().cos(), lat)
}

/// Tile identifier encoder for a single resolution level.
///
/// Construction precomputes the grid geometry; [`tile_id`](Self::tile_id) is
/// then pure arithmetic, cheap enough to call once per level per record.
#[derive(Debug, Clone)]
pub struct TierPlotter {
    level: u8,
    cell_size: f64,
    vertical_divider: f64,
}

impl TierPlotter {
    /// Creates a plotter for the given resolution level.
    ///
    /// Level L cuts each 180-unit axis into `2^L` cells, so the cell size
    /// halves with each successive level and a finer grid is a strict
    /// refinement of the coarser one.
    pub fn new(level: u8) -> Self {
        debug_assert!(level <= 30, "tile level {level} out of the sane range");
        let tier_length = (1u64 << level) as f64;
        // Smallest power of ten that keeps the row id in the fractional part
        // without colliding with the column id: |row| <= 2^(L-1) < divider.
        let vertical_divider = 10f64.powi(tier_length.log10().ceil() as i32);
        TierPlotter {
            level,
            cell_size: GRID_EXTENT / tier_length,
            vertical_divider,
        }
    }

    /// The resolution level this plotter encodes.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Index field name carrying this level's tile identifier.
    pub fn field_name(&self) -> String {
        format!("{}{}", TIER_FIELD_PREFIX, self.level)
    }

    /// Computes the tile identifier for a point.
    ///
    /// Deterministic: repeated calls with the same inputs return the
    /// identical value. The column id lands in the integer part, the row id
    /// in the fractional part, scaled so the two can never overlap.
    pub fn tile_id(&self, lat: f64, lon: f64) -> f64 {
        let (x, y) = project(lat, lon);
        self.box_id(x) + self.box_id(y) / self.vertical_divider
    }

    fn box_id(&self, coord: f64) -> f64 {
        (coord / self.cell_size).floor()
    }
}

/// Convenience form of the encoder contract: `tile_id(level, lat, lon)`.
pub fn tile_id(level: u8, lat: f64, lon: f64) -> f64 {
    TierPlotter::new(level).tile_id(lat, lon)
}

/// Encoder for the full configured level range.
///
/// Owns one [`TierPlotter`] per level so per-record encoding does no setup
/// work. Shared read-only across all writer workers.
#[derive(Debug, Clone)]
pub struct TileEncoder {
    plotters: Vec<TierPlotter>,
}

impl TileEncoder {
    /// Creates an encoder covering `levels` inclusively.
    pub fn new(levels: std::ops::RangeInclusive<u8>) -> Self {
        TileEncoder {
            plotters: levels.map(TierPlotter::new).collect(),
        }
    }

    /// Number of levels (and therefore tile fields) per record.
    pub fn level_count(&self) -> usize {
        self.plotters.len()
    }

    /// Computes the `(level, tile id)` assignment for every configured level.
    pub fn assignments(&self, lat: f64, lon: f64) -> Vec<(u8, f64)> {
        self.plotters
            .iter()
            .map(|p| (p.level(), p.tile_id(lat, lon)))
            .collect()
    }

    /// The plotters in level order, coarse to fine.
    pub fn plotters(&self) -> &[TierPlotter] {
        &self.plotters
    }
}
