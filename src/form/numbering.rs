/// Prefixes every non-blank line with a running `"<n>. "` counter.
///
/// Blank (whitespace-only) lines pass through and do not advance the counter.
/// Already numbered lines are numbered again: `"1. a"` becomes `"1. 1. a"`.
pub fn number_lines(text: &str) -> String {
    let mut counter = 0usize;
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                counter += 1;
                format!("{counter}. {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
