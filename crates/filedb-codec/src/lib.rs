//! Record codec for filedb.
//!
//! Turns the bytes of a record file into field maps and back. Two concerns
//! live here:
//!
//! - [`RecordFormat`]: document serialization (`yaml` block mappings, `json`
//!   indented objects with a trailing newline)
//! - [`LocaleProjection`]: flattening `column -> locale -> value` into a flat
//!   `column -> value` on read, and nesting it back on write without losing
//!   other locales already on disk
//!
//! [`RecordCodec`] combines both for one collection.

pub mod codec;
pub mod error;
pub mod format;
pub mod locale;

pub use codec::{RecordCodec, RecordMap};
pub use error::{FormatError, FormatResult};
pub use format::{kind_of, RecordFormat};
pub use locale::LocaleProjection;
