//! Bar table schema contract: the boundary between the data collaborator and the engine.
//!
//! The header must start with `BAR_COLUMNS` in that order; trailing columns
//! are ignored.
//! `Time` must parse with one of `TIME_FORMATS` and be strictly ascending.

pub const TIME_COLUMN: &str = "Time";

/// Required columns, in canonical output order.
pub const BAR_COLUMNS: [&str; 6] = [TIME_COLUMN, "Open", "High", "Low", "Close", "Volume"];

/// Accepted timestamp formats, tried in order. Date-only values map to midnight.
pub const TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used when writing timestamps back out.
pub const OUTPUT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Why a header row does not satisfy the bar schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderMismatch {
    /// Required column absent from the header.
    Missing(&'static str),
    /// Required column present at the wrong position.
    Misplaced {
        column: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Check that a header row starts with `BAR_COLUMNS` in canonical order.
///
/// Absence is reported before misplacement so a missing column is never
/// described as out of order.
pub fn check_header<'a, I>(headers: I) -> Result<(), HeaderMismatch>
where
    I: IntoIterator<Item = &'a str>,
{
    let headers: Vec<&str> = headers.into_iter().map(str::trim).collect();
    let mut positions = [0usize; 6];
    for (slot, name) in positions.iter_mut().zip(BAR_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| *h == name)
            .ok_or(HeaderMismatch::Missing(name))?;
    }
    for (expected, (&found, column)) in positions.iter().zip(BAR_COLUMNS).enumerate() {
        if found != expected {
            return Err(HeaderMismatch::Misplaced {
                column,
                expected,
                found,
            });
        }
    }
    Ok(())
}
