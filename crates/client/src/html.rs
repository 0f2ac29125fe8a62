//! Title extraction and display normalization.

use scraper::{Html, Selector};

/// Extract the raw text of the document's `<title>` element.
///
/// Returns the first title element's text as-is; callers normalize.
pub fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").expect("invalid selector");
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Normalize a raw title for single-line display.
///
/// Trims surrounding whitespace and collapses every whitespace run that
/// contains a newline into a single space. Runs of plain spaces pass
/// through untouched, so inner spacing survives. This also flattens the
/// newline markers the provider path inserts for paragraph breaks.
pub fn normalize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut run = String::new();

    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            run.push(ch);
        } else {
            flush_whitespace_run(&mut out, &run);
            run.clear();
            out.push(ch);
        }
    }
    // The input was trimmed, so no trailing run is pending here.

    out
}

fn flush_whitespace_run(out: &mut String, run: &str) {
    if run.is_empty() {
        return;
    }
    if run.contains('\n') || run.contains('\r') {
        out.push(' ');
    } else {
        out.push_str(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_basic() {
        let document = Html::parse_document("<html><head><title>Example</title></head><body></body></html>");
        assert_eq!(extract_title(&document).as_deref(), Some("Example"));
    }

    #[test]
    fn test_extract_title_missing() {
        let document = Html::parse_document("<html><head></head><body><h1>No title</h1></body></html>");
        assert_eq!(extract_title(&document), None);
    }

    #[test]
    fn test_extract_title_keeps_raw_whitespace() {
        let document = Html::parse_document("<html><head><title>\n  Spaced Out  \n</title></head></html>");
        let title = extract_title(&document).unwrap();
        assert!(title.contains("Spaced Out"));
        assert_ne!(title, "Spaced Out");
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_title("  Example  "), "Example");
    }

    #[test]
    fn test_normalize_collapses_newline_runs() {
        assert_eq!(normalize_title("Line one\n\nLine two"), "Line one Line two");
        assert_eq!(normalize_title("A\r\nB"), "A B");
    }

    #[test]
    fn test_normalize_newline_with_surrounding_spaces() {
        assert_eq!(normalize_title("A \n B"), "A B");
    }

    #[test]
    fn test_normalize_preserves_inner_spaces() {
        assert_eq!(normalize_title("Example – Site  Name"), "Example – Site  Name");
    }

    #[test]
    fn test_normalize_empty_and_whitespace_only() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title(" \n \r\n "), "");
    }

    #[test]
    fn test_normalize_single_line_passthrough() {
        assert_eq!(normalize_title("Plain Title"), "Plain Title");
    }
}
