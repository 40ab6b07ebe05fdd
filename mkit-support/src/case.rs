//! First-character case transformers.

/// Returns a function that upper-cases the first character.
///
/// ```
/// let capitalize = mkit_support::case::make_capitalizer();
/// assert_eq!(capitalize("click"), "Click");
/// ```
pub fn make_capitalizer() -> impl Fn(&str) -> String + Send + Sync + Copy {
    |input: &str| map_first(input, |c| c.to_uppercase().collect())
}

/// Returns a function that lower-cases the first character.
pub fn make_uncapitalizer() -> impl Fn(&str) -> String + Send + Sync + Copy {
    |input: &str| map_first(input, |c| c.to_lowercase().collect())
}

fn map_first(input: &str, f: impl FnOnce(char) -> String) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => {
            let mut out = f(first);
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}
