//! Cookie string codec.
//!
//! Raw cookie blobs look like `a=1; b=2`. Values are stored in the legacy
//! escaped form browsers produce for `escape()`: ASCII letters, digits and
//! `@*_+-./` pass through, other UTF-16 code units become `%XX` or `%uXXXX`.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt::Write;

/// Format of the `expires` attribute, e.g. `Thu, 01 Jan 2026 00:00:00 GMT`.
pub const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

fn is_unescaped(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"@*_+-./".contains(&byte)
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for unit in input.encode_utf16() {
        if unit < 0x80 && is_unescaped(unit as u8) {
            out.push(unit as u8 as char);
        } else if unit < 0x100 {
            let _ = write!(out, "%{:02X}", unit);
        } else {
            let _ = write!(out, "%u{:04X}", unit);
        }
    }
    out
}

/// Reverse of [`escape`]. Malformed escape sequences are kept literally.
pub fn unescape(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut units: Vec<u16> = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '%' {
            if chars.get(i + 1) == Some(&'u') {
                if let Some(unit) = hex_unit(&chars, i + 2, 4) {
                    units.push(unit);
                    i += 6;
                    continue;
                }
            } else if let Some(unit) = hex_unit(&chars, i + 1, 2) {
                units.push(unit);
                i += 3;
                continue;
            }
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(chars[i].encode_utf16(&mut buf));
        i += 1;
    }

    String::from_utf16_lossy(&units)
}

fn hex_unit(chars: &[char], start: usize, len: usize) -> Option<u16> {
    let digits = chars.get(start..start + len)?;
    digits.iter().try_fold(0u16, |acc, c| {
        c.to_digit(16).map(|d| (acc << 4) | d as u16)
    })
}

/// Look up `name` in a raw cookie blob and return its unescaped value.
///
/// Pairs are split at their first `=` and keys are trimmed; the first
/// matching pair wins. Pairs without `=` are ignored.
pub fn parse_cookie(blob: &str, name: &str) -> Option<String> {
    blob.split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| unescape(value))
}

/// Build the string assigned to the cookie blob when persisting `value`.
pub fn format_cookie(name: &str, value: &str, expires: Option<DateTime<Utc>>) -> String {
    let mut cookie = format!("{}={}", name, escape(value));
    if let Some(expires) = expires {
        let _ = write!(cookie, "; expires={}", format_expires(expires));
    }
    cookie
}

pub fn format_expires(expires: DateTime<Utc>) -> String {
    expires.format(EXPIRES_FORMAT).to_string()
}

pub fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), EXPIRES_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_escape_matches_legacy_format() {
        assert_eq!(escape("confirmed"), "confirmed");
        assert_eq!(escape("a b;c=d"), "a%20b%3Bc%3Dd");
        assert_eq!(escape("@*_+-./"), "@*_+-./");
        assert_eq!(escape("é"), "%E9");
        assert_eq!(escape("日本"), "%u65E5%u672C");
        // Astral characters are escaped per UTF-16 surrogate
        assert_eq!(escape("😀"), "%uD83D%uDE00");
    }

    #[test]
    fn test_unescape_reverses_escape() {
        for value in ["confirmed", "a b;c=d", "é", "日本", "😀", "100%"] {
            assert_eq!(unescape(&escape(value)), value);
        }
    }

    #[test]
    fn test_unescape_is_lenient() {
        assert_eq!(unescape("100%"), "100%");
        assert_eq!(unescape("%zz"), "%zz");
        assert_eq!(unescape("%u12"), "%u12");
        assert_eq!(unescape("%41%u0042"), "AB");
        assert_eq!(unescape("plain"), "plain");
    }

    #[test]
    fn test_parse_cookie_handles_multiple_keys_and_whitespace() {
        let blob = "session=abc123;   c1=confirmed ; other=x%20y";
        assert_eq!(parse_cookie(blob, "c1").as_deref(), Some("confirmed "));
        assert_eq!(parse_cookie(blob, "session").as_deref(), Some("abc123"));
        assert_eq!(parse_cookie(blob, "other").as_deref(), Some("x y"));
        assert_eq!(parse_cookie(blob, "missing"), None);
    }

    #[test]
    fn test_parse_cookie_edge_cases() {
        assert_eq!(parse_cookie("", "c1"), None);
        assert_eq!(parse_cookie("c1", "c1"), None);
        assert_eq!(parse_cookie("c1=", "c1").as_deref(), Some(""));
        assert_eq!(parse_cookie("c1=a=b", "c1").as_deref(), Some("a=b"));
        assert_eq!(parse_cookie("c1=first; c1=second", "c1").as_deref(), Some("first"));
        // Only whole keys match
        assert_eq!(parse_cookie("xc1=denied", "c1"), None);
    }

    #[test]
    fn test_format_cookie_with_expiry() {
        let expires = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            format_cookie("c1", "confirmed", Some(expires)),
            "c1=confirmed; expires=Thu, 01 Jan 2026 00:00:00 GMT"
        );
        assert_eq!(format_cookie("c1", "a b", None), "c1=a%20b");
    }

    #[test]
    fn test_expires_round_trip() {
        let expires = Utc.with_ymd_and_hms(2026, 4, 1, 8, 30, 15).unwrap();
        assert_eq!(parse_expires(&format_expires(expires)), Some(expires));
        assert_eq!(parse_expires("not a date"), None);
    }
}
