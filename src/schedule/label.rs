/// Strips a numeric disambiguation suffix from a lesson id.
///
/// The generation service numbers repeated lessons (`Math_1`, `Math_2`, ...);
/// the display collapses them back to `Math`. The suffix after the last `_`
/// counts as numeric when it starts with an integer (after optional leading
/// whitespace and sign), so `Math_3.5` and `Math_2b` collapse too. Other ids
/// come back unchanged.
pub fn derive_base_label(lesson_id: &str) -> &str {
    match lesson_id.rfind('_') {
        Some(idx) if idx + 1 < lesson_id.len() => {
            if starts_with_integer(&lesson_id[idx + 1..]) {
                &lesson_id[..idx]
            } else {
                lesson_id
            }
        }
        _ => lesson_id,
    }
}

fn starts_with_integer(text: &str) -> bool {
    let text = text.trim_start();
    let digits = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    digits.starts_with(|c: char| c.is_ascii_digit())
}

/// Formats an assignment as `person(base label)`
pub fn format_assignment_label(person: &str, lesson_id: &str) -> String {
    format!("{}({})", person, derive_base_label(lesson_id))
}
