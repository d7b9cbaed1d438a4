//! Field checks enforced by the movie service on every write.

use crate::error::CoreError;

/// The first publicly screened film dates from 1888.
pub const MIN_PUBLISHING_YEAR: i32 = 1888;

/// How many years past the current one a release may be announced.
pub const MAX_YEARS_AHEAD: i32 = 10;

/// Reject empty or whitespace-only titles.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::invalid_field("title", "must not be empty"));
    }
    Ok(())
}

/// Ensure `year` lies within `[MIN_PUBLISHING_YEAR, current_year + MAX_YEARS_AHEAD]`.
pub fn validate_publishing_year(year: i32, current_year: i32) -> Result<(), CoreError> {
    let max = current_year.saturating_add(MAX_YEARS_AHEAD);
    if !(MIN_PUBLISHING_YEAR..=max).contains(&year) {
        return Err(CoreError::invalid_field(
            "publishingYear",
            format!("must be between {MIN_PUBLISHING_YEAR} and {max}, got {year}"),
        ));
    }
    Ok(())
}

/// An external poster reference must be an absolute `http` or `https` URL.
pub fn validate_external_poster(url: &str) -> Result<(), CoreError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !url.chars().any(char::is_whitespace) => Ok(()),
        _ => Err(CoreError::invalid_field(
            "poster",
            "external poster must be an absolute http(s) URL",
        )),
    }
}
