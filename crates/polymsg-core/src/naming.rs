//! Naming convention utilities shared by the backends.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `camelCase` | [`camel_to_snake_case`] | `camel_case` |
//! | `word` | [`capitalize`] | `Word` |
//! | `Word` | [`first_lower`] | `word` |
//! | `kebab-case` | [`kebab_to_snake`] | `kebab_case` |

/// Convert camelCase or PascalCase to snake_case.
///
/// Acronym runs stay together (`ZIPCode` becomes `zip_code`) and runs of
/// single-letter segments are collapsed (`a_b_c_d` becomes `a_bcd`).
/// Inputs shorter than three characters are returned unchanged.
///
/// # Examples
///
/// ```
/// use polymsg_core::naming::camel_to_snake_case;
///
/// assert_eq!(camel_to_snake_case("newAddress"), "new_address");
/// assert_eq!(camel_to_snake_case("ZIPCode"), "zip_code");
/// assert_eq!(camel_to_snake_case("iD"), "iD");
/// ```
pub fn camel_to_snake_case(s: &str) -> String {
    if s.chars().count() < 3 {
        return s.to_string();
    }
    collapse_single_letter_segments(&split_case_transitions(s).to_lowercase())
}

/// Insert `_` at lower→upper transitions and before the last capital of an
/// acronym run that is followed by a lowercase letter.
fn split_case_transitions(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    let mut run_start = 0;

    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();

        if next.is_some_and(|n| n.is_ascii_uppercase()) && !c.is_ascii_uppercase() && c != '_' {
            out.push(c);
            out.push('_');
            run_start = i + 1;
            continue;
        }

        if c.is_ascii_uppercase()
            && next.is_some_and(|n| n.is_ascii_lowercase())
            && i.saturating_sub(run_start) > 1
        {
            out.push('_');
        }
        out.push(c);
    }

    out
}

/// Collapse `_a_b_c_` style runs into `_abc_`.
fn collapse_single_letter_segments(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    if chars.len() <= 3 {
        return s.to_string();
    }

    let padded = chars[chars.len() - 2] == '_';
    if padded {
        chars.push('_');
    }

    let underscore_at = |idx: usize| chars.get(idx) == Some(&'_');
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;

    while i + 3 < chars.len() {
        if underscore_at(i) && underscore_at(i + 2) {
            let start = i;
            let mut end = start + 2;
            while underscore_at(end) && underscore_at(end + 2) {
                end += 2;
            }
            if end > start + 2 {
                out.push('_');
                out.extend(chars[start..=end].iter().filter(|c| **c != '_'));
                out.push('_');
                i = end;
            } else {
                out.push(chars[i]);
            }
        } else {
            out.push(chars[i]);
        }
        i += 1;
    }
    out.extend(chars.iter().skip(i));

    if padded {
        out.pop();
    }
    out
}

/// Capitalize the first letter of a string.
///
/// ```
/// use polymsg_core::naming::capitalize;
///
/// assert_eq!(capitalize("newAddress"), "NewAddress");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first letter of a string.
pub fn first_lower(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Replace dashes with underscores.
pub fn kebab_to_snake(s: &str) -> String {
    s.replace('-', "_")
}

/// Split on the last occurrence of `separator`.
///
/// Returns `("", s)` when the separator does not occur.
pub fn split_by_last<'a>(s: &'a str, separator: char) -> (&'a str, &'a str) {
    match s.rfind(separator) {
        Some(idx) => (&s[..idx], &s[idx + separator.len_utf8()..]),
        None => ("", s),
    }
}

#[cfg(test)]
#[path = "naming/naming_tests.rs"]
mod naming_tests;
