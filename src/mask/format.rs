use super::model::Pattern;

/// Lay `value` over the pattern. Invalid chars become placeholders; literal
/// chars present in `value` at literal positions are consumed, so an
/// already-formatted value formats to itself.
pub(super) fn format_value(pattern: &Pattern, placeholder: char, value: &[char]) -> Vec<char> {
    let mut out = Vec::<char>::with_capacity(pattern.len());
    let mut value_idx = 0usize;

    for idx in 0..pattern.len() {
        if pattern.is_editable(idx) {
            let next = value.get(value_idx).copied();
            match next {
                Some(ch) if pattern.accepts(idx, ch) => out.push(pattern.transform(idx, ch)),
                _ => out.push(placeholder),
            }
            value_idx += 1;
        } else if let Some(literal) = pattern.literal_at(idx) {
            out.push(literal);
            if value.get(value_idx).copied() == Some(literal) {
                value_idx += 1;
            }
        }
    }

    out
}

/// Put raw slot chars into the pattern's slots in order. Literal positions
/// never consume input, so a raw char equal to a literal is kept.
pub(super) fn fill_slots(pattern: &Pattern, placeholder: char, raw: &[char]) -> Vec<char> {
    let mut slots = raw.iter().copied();
    (0..pattern.len())
        .map(|idx| match pattern.literal_at(idx) {
            Some(literal) => literal,
            None => match slots.next() {
                Some(ch) if pattern.accepts(idx, ch) => pattern.transform(idx, ch),
                _ => placeholder,
            },
        })
        .collect()
}

pub(super) fn empty_value(pattern: &Pattern, placeholder: char) -> String {
    format_value(pattern, placeholder, &[]).into_iter().collect()
}

/// Chars at data slots, placeholders included.
pub(super) fn raw_value(pattern: &Pattern, value: &[char]) -> String {
    value
        .iter()
        .enumerate()
        .filter(|(idx, _)| pattern.is_editable(*idx))
        .map(|(_, ch)| *ch)
        .collect()
}

/// Number of raw chars up to and including the last filled slot.
pub(super) fn significant_len(raw: &str, placeholder: char) -> usize {
    raw.chars()
        .enumerate()
        .filter(|(_, ch)| *ch != placeholder)
        .map(|(idx, _)| idx + 1)
        .last()
        .unwrap_or(0)
}

pub(super) fn is_complete(pattern: &Pattern, placeholder: char, value: &[char]) -> bool {
    value
        .iter()
        .enumerate()
        .all(|(idx, ch)| !pattern.is_editable(idx) || *ch != placeholder)
}

pub(super) fn has_any_input(pattern: &Pattern, placeholder: char, value: &[char]) -> bool {
    value
        .iter()
        .enumerate()
        .any(|(idx, ch)| pattern.is_editable(idx) && *ch != placeholder)
}
