//! Column type inference
//!
//! Maps a field name and one sample value to a [`ColumnType`]. Identity
//! names (`id` in any case) never produce a column; strings are promoted to
//! `datetime` only when they start with a four digit year and parse as a
//! timestamp at or after the Unix epoch.
//!
//! ## Example
//!
//! ```rust,ignore
//! use autotable_core::{ColumnType, FieldValue, infer_type};
//!
//! assert_eq!(infer_type("id", &FieldValue::Integer(1)), None);
//! assert_eq!(
//!     infer_type("born", &FieldValue::from("2024-12-25T10:00:00")),
//!     Some(ColumnType::Datetime)
//! );
//! ```

mod formats;
mod inferrer;
mod types;

pub use formats::{has_year_prefix, parse_timestamp};
pub use inferrer::{infer_type, is_identity_name};
pub use types::{ColumnSpec, ColumnType};
