/// Strips byte-order and zero-width marks and collapses runs of whitespace.
///
/// Case is preserved: the German labels differ from each other by more than case,
/// and umlauts must match exactly.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{00ad}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
