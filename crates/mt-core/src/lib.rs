//! mt-core: shared foundation for matflow.
//!
//! Contains:
//! - numeric (Real + float helpers)
//! - units (uom SI types, unit-label parsing, temperature scales)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{MtError, MtResult};
pub use numeric::*;
pub use units::*;
