//! Orthographic punctuation → IPA prosodic markers.

/// Punctuation kept as tokens by the tokenizer.
pub const RETAINED_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Map punctuation to pause/intonation markers and tidy whitespace.
///
/// Works line by line: line breaks are never touched, runs of other
/// whitespace collapse to a single space and spaces before a retained
/// punctuation mark are removed.
pub fn transform_symbols(text: &str) -> String {
    text.split('\n')
        .map(transform_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn transform_line(line: &str) -> String {
    let mut collapsed = String::with_capacity(line.len());
    let mut pending_space = false;
    for c in line.chars() {
        if c.is_whitespace() {
            pending_space = !collapsed.is_empty();
            continue;
        }
        if pending_space && !RETAINED_PUNCTUATION.contains(&c) {
            collapsed.push(' ');
        }
        pending_space = false;
        collapsed.push(c);
    }

    // `.` must follow `!`/`?` so the parenthesized markers stay intact.
    collapsed
        .replace('!', "(!)")
        .replace('?', "(?)")
        .replace('.', "//")
        .replace(',', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markers() {
        assert_eq!(transform_symbols("a, b."), "a/ b//");
        assert_eq!(transform_symbols("wow!"), "wow(!)");
        assert_eq!(transform_symbols("why?"), "why(?)");
    }

    #[test]
    fn test_markers_not_clobbered() {
        assert_eq!(transform_symbols("what?!"), "what(?)(!)");
        assert!(!transform_symbols("hey! you?").contains("//"));
    }

    #[test]
    fn test_space_before_punctuation_removed() {
        assert_eq!(transform_symbols("aɪ kæn ."), "aɪ kæn//");
        assert_eq!(transform_symbols("wʌn , tuː"), "wʌn/ tuː");
        assert_eq!(transform_symbols("seɪ ; ðen"), "seɪ; ðen");
    }

    #[test]
    fn test_whitespace_collapsed_lines_kept() {
        assert_eq!(transform_symbols("a   b\t c\n\nd  e"), "a b c\n\nd e");
        assert_eq!(transform_symbols("  lead"), "lead");
        assert_eq!(transform_symbols("trail  "), "trail");
    }

    #[test]
    fn test_empty() {
        assert_eq!(transform_symbols(""), "");
        assert_eq!(transform_symbols("\n"), "\n");
    }
}
