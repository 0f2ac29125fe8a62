//! Character encoding detection from response metadata.
//!
//! The closed set covers UTF-8 plus the two Japanese legacy encodings
//! still common on older sites. Detection gathers up to three independent
//! hints (the Content-Type header, an HTML5 `<meta charset>`, an HTML4
//! `<meta http-equiv="Content-Type">`) and answers only when every
//! surviving hint names the same encoding. On conflict it returns nothing:
//! a missed title beats a mojibake one.

use scraper::{Html, Selector};

/// Recognized character encodings. Closed set, not runtime-extensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    ShiftJis,
    EucJp,
}

impl Encoding {
    /// Match one metadata hint against the recognized set.
    ///
    /// Case-insensitive, accepting hyphen and underscore spellings. The
    /// hint may be a full header value ("text/html; charset=UTF-8"); any
    /// recognized substring counts.
    pub fn from_hint(hint: &str) -> Option<Self> {
        let lower = hint.to_ascii_lowercase();
        if lower.contains("utf-8") || lower.contains("utf_8") {
            Some(Encoding::Utf8)
        } else if lower.contains("shift-jis") || lower.contains("shift_jis") {
            Some(Encoding::ShiftJis)
        } else if lower.contains("euc-jp") || lower.contains("euc_jp") {
            Some(Encoding::EucJp)
        } else {
            None
        }
    }

    /// Decode raw bytes with this encoding, substituting malformed
    /// sequences rather than failing.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, _) = self.as_encoding_rs().decode(bytes);
        text.into_owned()
    }

    fn as_encoding_rs(&self) -> &'static encoding_rs::Encoding {
        match self {
            Encoding::Utf8 => encoding_rs::UTF_8,
            Encoding::ShiftJis => encoding_rs::SHIFT_JIS,
            Encoding::EucJp => encoding_rs::EUC_JP,
        }
    }
}

/// Detect the document encoding from up to three independent hints.
///
/// Hints that match nothing are discarded; survivors are deduplicated.
/// Exactly one distinct survivor decides the answer. Zero survivors, or
/// two or more that disagree, return `None`.
pub fn detect(content_type: Option<&str>, document: &Html) -> Option<Encoding> {
    let header_hint = content_type.and_then(Encoding::from_hint);
    let charset_hint = meta_charset(document).as_deref().and_then(Encoding::from_hint);
    let http_equiv_hint = meta_http_equiv_content_type(document)
        .as_deref()
        .and_then(Encoding::from_hint);

    let mut survivors: Vec<Encoding> = Vec::with_capacity(3);
    for hint in [header_hint, charset_hint, http_equiv_hint].into_iter().flatten() {
        if !survivors.contains(&hint) {
            survivors.push(hint);
        }
    }

    match survivors.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

/// HTML5 `<meta charset="...">` attribute value, if present.
fn meta_charset(document: &Html) -> Option<String> {
    let selector = Selector::parse("meta[charset]").expect("invalid selector");
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("charset"))
        .map(str::to_string)
}

/// HTML4 `<meta http-equiv="Content-Type" content="...">` value, if present.
fn meta_http_equiv_content_type(document: &Html) -> Option<String> {
    let selector = Selector::parse("meta[http-equiv]").expect("invalid selector");
    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr("http-equiv")
                .is_some_and(|v| v.eq_ignore_ascii_case("content-type"))
        })
        .find_map(|el| el.value().attr("content"))
        .map(str::to_string)
}
