//! Consumer-side sanity gate for resolved titles.
//!
//! Applied at the point a resolved title replaces a visible link label. A
//! corrupted or pathological title is worse than no change, so both checks
//! err toward keeping the existing label.

/// Hard ceiling on accepted title length, in chars. Anything longer is
/// symptomatic of mis-parsed markup swallowing unrelated page content.
pub const MAX_TITLE_LEN: usize = 500;

/// Decide whether `candidate` should replace `current_label`.
///
/// Rejects a candidate longer than [`MAX_TITLE_LEN`], and a candidate
/// shorter than the label once trailing ellipsis markers are stripped. A
/// "full" title shorter than its own truncation points to a failed fetch,
/// not a genuinely short title. Lengths are counted in chars.
pub fn should_replace(candidate: &str, current_label: &str) -> bool {
    let candidate_len = candidate.chars().count();
    if candidate_len > MAX_TITLE_LEN {
        return false;
    }

    let stripped = current_label.trim_end().trim_end_matches(['\u{2026}', '.']);
    candidate_len >= stripped.chars().count()
}
