//! EXIF capture-date extraction.
//!
//! A single entry point, [`extract_date`], reads the capture date out of an
//! image's metadata. Absence of a date is an expected outcome, not an error:
//! the batch loop skips such files with a warning.

mod reader;

pub use reader::extract_date;
