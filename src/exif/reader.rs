use chrono::{DateTime, NaiveDate, NaiveDateTime};
use nom_exif::*;
use std::path::Path;

/// Date tags in priority order: original capture time first, then the
/// digitization time, then the file modification time (`Image DateTime`).
/// A tag that is present but unparseable falls through to the next one.
const DATE_TAGS: &[ExifTag] = &[
    ExifTag::DateTimeOriginal,
    ExifTag::CreateDate,
    ExifTag::ModifyDate,
];

/// Extract the capture date from an image's EXIF metadata.
///
/// Returns `None` when the file has no readable metadata container, none of
/// the known date tags are present, or no tag value parses as a date. The
/// caller treats `None` as "skip this file", never as a failure.
pub fn extract_date(path: &Path) -> Option<NaiveDate> {
    let mut parser = MediaParser::new();
    let ms = match MediaSource::file_path(path) {
        Ok(ms) => ms,
        Err(e) => {
            log::debug!("No readable metadata container in {}: {e}", path.display());
            return None;
        }
    };

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(e) => {
            log::debug!("No EXIF data found in {}: {e}", path.display());
            return None;
        }
    };
    let exif: Exif = iter.into();

    for tag in DATE_TAGS {
        if let Some(val) = exif.get(*tag) {
            if let Some(date) = entry_to_date(val) {
                return Some(date);
            }
            log::debug!(
                "{tag} in {} did not parse as a date: {val}",
                path.display()
            );
        }
    }

    None
}

/// Convert an EntryValue to a calendar date, discarding time of day.
fn entry_to_date(val: &EntryValue) -> Option<NaiveDate> {
    if let EntryValue::Time(t) = val {
        return Some(t.date_naive());
    }
    parse_datetime_text(&val.to_string())
}

/// Parse the textual EXIF date representation.
///
/// The EXIF convention is `YYYY:MM:DD HH:MM:SS`; dash-separated and RFC 3339
/// renderings are also accepted since nom-exif stringifies time-typed
/// entries that way.
fn parse_datetime_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim().trim_matches('"').trim();

    for fmt in ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    // Date-only prefix, e.g. a truncated or seconds-less tag value.
    // get() rather than indexing: tag text is arbitrary bytes and byte 10
    // need not be a char boundary.
    if let Some(prefix) = s.get(..10) {
        for fmt in ["%Y:%m:%d", "%Y-%m-%d"] {
            if let Ok(d) = NaiveDate::parse_from_str(prefix, fmt) {
                return Some(d);
            }
        }
    }

    None
}
