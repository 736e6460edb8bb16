//! Sentence expansion around an extracted span.

/// Expansion limits.
#[derive(Debug, Clone, Copy)]
pub struct ExpansionRules<'a> {
    /// Characters that end a sentence when followed by whitespace or end of text
    pub delimiters: &'a [char],
    /// Maximum bytes scanned on each side of the span
    pub max_chars: usize,
}

/// Expand `text[start..end]` to its containing sentence.
///
/// Scans left and right to the nearest delimiter, stopping early at a
/// paragraph break (`\n\n`) or after `max_chars` bytes on either side. The
/// result is trimmed; if it ends up shorter than the span, the span is
/// returned unchanged.
pub fn expand_to_sentence(text: &str, start: usize, end: usize, rules: ExpansionRules<'_>) -> String {
    let span = text[start..end].trim();
    let is_delimiter = |c: char| rules.delimiters.contains(&c);
    let ends_sentence = |i: usize, c: char| {
        is_delimiter(c)
            && text[i + c.len_utf8()..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace)
    };

    let mut left = start;
    for (i, c) in text[..start].char_indices().rev() {
        if start - i > rules.max_chars {
            break;
        }
        if ends_sentence(i, c) {
            break;
        }
        if c == '\n' && text[..i].ends_with('\n') {
            break;
        }
        left = i;
    }

    let mut right = end;
    for (offset, c) in text[end..].char_indices() {
        let i = end + offset;
        if i - end >= rules.max_chars {
            break;
        }
        if c == '\n' && text[i + 1..].starts_with('\n') {
            break;
        }
        right = i + c.len_utf8();
        if ends_sentence(i, c) {
            break;
        }
    }

    let expanded = text[left..right].trim();
    if expanded.len() < span.len() {
        span.to_string()
    } else {
        expanded.to_string()
    }
}
