//! Value formatting adapters used by the operators.
//!
//! - [`codec`]: percent-encoding and base64
//! - [`printf`]: printf-style conversions of typed values
//! - [`datetime`]: date pattern compilation and rendering
//! - [`zone`]: time-zone identifiers

pub mod codec;
pub mod datetime;
pub mod printf;
pub mod zone;

pub use datetime::DatePattern;
pub use printf::format_value;
pub use zone::{TimeZone, ZonedInstant};
