//! Small shared utilities.

mod timestamps;

pub use timestamps::iso_timestamp;
