//! Char-offset string editing shared by the surface and the controller.

use super::selection::Selection;

pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

pub fn clamp_cursor(cursor: usize, value: &str) -> usize {
    cursor.min(char_count(value))
}

/// Insert `text` at char offset `at`, returning the caret after the insert.
pub fn insert_str(value: &mut String, at: usize, text: &str) -> usize {
    let pos = clamp_cursor(at, value);
    let byte_pos = byte_index_at_char(value, pos);
    value.insert_str(byte_pos, text);
    pos + char_count(text)
}

/// Remove the chars covered by `span`, returning the removed text.
pub fn remove_span(value: &mut String, span: Selection) -> String {
    let span = span.clamp(char_count(value));
    if span.is_empty() {
        return String::new();
    }
    let start = byte_index_at_char(value, span.start);
    let end = byte_index_at_char(value, span.end);
    value.drain(start..end).collect()
}

pub fn slice(value: &str, span: Selection) -> String {
    value
        .chars()
        .skip(span.start)
        .take(span.len())
        .collect()
}

pub fn prefix(value: &str, chars: usize) -> String {
    value.chars().take(chars).collect()
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove_respect_char_offsets() {
        let mut value = String::from("añb");
        let caret = insert_str(&mut value, 2, "xy");
        assert_eq!(value, "añxyb");
        assert_eq!(caret, 4);

        let removed = remove_span(&mut value, Selection::new(1, 3));
        assert_eq!(removed, "ñx");
        assert_eq!(value, "ayb");
    }

    #[test]
    fn remove_span_out_of_bounds_is_clamped() {
        let mut value = String::from("abc");
        assert_eq!(remove_span(&mut value, Selection::new(2, 10)), "c");
        assert_eq!(remove_span(&mut value, Selection::new(5, 9)), "");
        assert_eq!(value, "ab");
    }

    #[test]
    fn slice_and_prefix_count_chars() {
        assert_eq!(slice("(555) 123", Selection::new(1, 4)), "555");
        assert_eq!(prefix("ñandú", 3), "ñan");
    }
}
