// crates/lingloop-core/src/helpers/text.rs
//
// Proportional partitioning and merging of subtitle text.
//
// Splitting a segment at a time point has to split its text too, and there is
// no linguistic alignment to lean on — the cut index is a proportion of the
// unit count, where a "unit" is a word for space-delimited scripts and a
// character for dense scripts (Chinese, Japanese). This is a heuristic, not a
// linguistic boundary; callers treat the partition point as approximate and
// only the reconstruction law (partition then join restores the original) is
// guaranteed.
//
// Mixed-directionality text is deliberately unspecified upstream: a field
// counts as dense only when it is whitespace-free AND contains a non-ASCII
// character. Everything else — including mixed CJK/Latin with spaces — is
// handled word-wise.

/// `true` when `text` should be split and joined character-wise.
pub fn is_dense(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && !trimmed.chars().any(char::is_whitespace)
        && trimmed.chars().any(|c| !c.is_ascii())
}

/// Split `text` into two parts at `ceil(units × proportion)`.
///
/// Empty/blank input yields two empty strings. `proportion` is clamped to
/// `[0, 1]`; a proportion at either extreme still produces a valid (possibly
/// empty-on-one-side) partition.
pub fn partition(text: &str, proportion: f64) -> (String, String) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return (String::new(), String::new());
    }
    let p = proportion.clamp(0.0, 1.0);

    if is_dense(trimmed) {
        let chars: Vec<char> = trimmed.chars().collect();
        let cut = ((chars.len() as f64 * p).ceil() as usize).min(chars.len());
        let head: String = chars[..cut].iter().collect();
        let tail: String = chars[cut..].iter().collect();
        (head, tail)
    } else {
        let words: Vec<&str> = trimmed.split_whitespace().collect();
        let cut = ((words.len() as f64 * p).ceil() as usize).min(words.len());
        (words[..cut].join(" "), words[cut..].join(" "))
    }
}

/// Concatenate text parts across a merge, filtering out blanks.
///
/// Space-delimited parts are joined with a single space; when every non-blank
/// part is dense, no separator is inserted.
pub fn join_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let kept: Vec<&str> = parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if kept.is_empty() {
        return String::new();
    }
    let sep = if kept.iter().all(|p| is_dense(p)) { "" } else { " " };
    kept.join(sep)
}
