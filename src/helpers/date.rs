//! Date helper functions

use chrono::{DateTime, Locale, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

use crate::config::SiteConfig;

/// Format a date using a Moment.js-compatible format string in the given locale
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMM YYYY", Locale::pt_BR) // -> "15 mar 2021"
/// ```
pub fn format_date<Tz2: TimeZone>(date: &DateTime<Tz2>, format: &str, locale: Locale) -> String
where
    Tz2::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    let mut output = String::new();
    if write!(output, "{}", date.format_localized(&chrono_format, locale)).is_err() {
        tracing::warn!("Invalid date format {:?}, using ISO 8601", format);
        return date_xml(date);
    }
    output
}

/// Format a UTC timestamp in the site's timezone and language
pub fn site_date(config: &SiteConfig, date: &DateTime<Utc>, format: &str) -> String {
    let local = date.with_timezone(&site_timezone(config));
    format_date(&local, format, site_locale(config))
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz2: TimeZone>(date: &DateTime<Tz2>) -> String
where
    Tz2::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// The configured timezone, UTC when unset or unknown
pub fn site_timezone(config: &SiteConfig) -> Tz {
    if config.timezone.is_empty() {
        return Tz::UTC;
    }
    config.timezone.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone {:?}, using UTC", config.timezone);
        Tz::UTC
    })
}

/// The chrono locale for the configured language (`pt-BR` -> `pt_BR`)
pub fn site_locale(config: &SiteConfig) -> Locale {
    let name = config.language.replace('-', "_");
    Locale::try_from(name.as_str())
        .or_else(|_| match name.as_str() {
            "en" => Ok(Locale::en_US),
            "pt" => Ok(Locale::pt_BR),
            _ => Err(()),
        })
        .unwrap_or(Locale::POSIX)
}

/// Convert Moment.js format to chrono format.
///
/// Text inside square brackets is copied literally.
fn moment_to_chrono_format(format: &str) -> String {
    let mut result = String::with_capacity(format.len());
    let mut rest = format;

    while let Some(start) = rest.find('[') {
        result.push_str(&convert_tokens(&rest[..start]));
        match rest[start + 1..].find(']') {
            Some(len) => {
                let literal = &rest[start + 1..start + 1 + len];
                result.push_str(&literal.replace('%', "%%"));
                rest = &rest[start + 2 + len..];
            }
            None => {
                rest = &rest[start..];
                break;
            }
        }
    }
    result.push_str(&convert_tokens(rest));
    result
}

/// Moment tokens and their chrono equivalents, longest first per unit
const TOKENS: [(&str, &str); 21] = [
    // Year
    ("YYYY", "%Y"),
    ("YY", "%y"),
    // Month
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    // Day of week
    ("dddd", "%A"),
    ("ddd", "%a"),
    // Day of month
    ("DD", "%d"),
    ("D", "%-d"),
    // Hour
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    // Minute
    ("mm", "%M"),
    ("m", "%-M"),
    // Second
    ("ss", "%S"),
    ("s", "%-S"),
    ("A", "%p"),
    // Timezone
    ("ZZ", "%z"),
    ("Z", "%:z"),
];

/// Translate Moment tokens outside brackets; any other text is literal,
/// so `%` is escaped for chrono
fn convert_tokens(format: &str) -> String {
    let mut result = String::with_capacity(format.len() * 2);
    let mut rest = format;

    while let Some(c) = rest.chars().next() {
        if let Some((from, to)) = TOKENS.iter().find(|(from, _)| rest.starts_with(from)) {
            result.push_str(to);
            rest = &rest[from.len()..];
            continue;
        }
        if c == '%' {
            result.push_str("%%");
        } else {
            result.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    result
}
