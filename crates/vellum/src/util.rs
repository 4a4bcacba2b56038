//! Small text utilities used by the helper loader.

/// Converts a string to camelCase.
///
/// Words are split on non-alphanumeric separators and on lower-to-upper
/// case boundaries. The first word is lowercased, every following word is
/// capitalized. This is the naming convention applied to auto-named helper
/// modules (file stem → helper key).
///
/// # Example
///
/// ```rust
/// use vellum::camel_case;
///
/// assert_eq!(camel_case("math_helper"), "mathHelper");
/// assert_eq!(camel_case("text-helper"), "textHelper");
/// assert_eq!(camel_case("FooBar"), "fooBar");
/// ```
pub fn camel_case(input: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = ch.is_lowercase() || ch.is_numeric();
            current.push(ch);
        } else {
            prev_lower = false;
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}
