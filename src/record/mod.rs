//! Record types and validation.
//!
//! [`RawRecord`] is one undecoded row from the input stream; [`validate`]
//! turns it into an immutable [`GeoIpRecord`] or a rejection reason.

mod types;
mod validate;

pub use types::{GeoIpRecord, RawRecord};
pub use validate::validate;
