//! Text rendering helpers for error messages.
//!
//! Used by the container to format resolution chains, type names and
//! "did you mean?" hints.

/// Renders a resolution chain as a readable string.
///
/// # Examples
/// ```
/// use mkit_support::rendering::render_chain;
///
/// let chain = vec!["users", "repository", "database", "users"];
/// assert_eq!(render_chain(&chain), "users → repository → database → users");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Shortens a fully qualified type name for display.
///
/// ```
/// use mkit_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("my_app::services::UserService"), "UserService");
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
///     "Arc<dyn Logger>"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            '<' | '>' | ',' | ' ' | '&' | '[' | ']' | ';' | '(' | ')' => {
                result.push_str(&segment);
                result.push(ch);
                segment.clear();
            }
            _ => segment.push(ch),
        }
    }

    result.push_str(&segment);
    result
}

/// Suggests registered names that look like `requested`.
///
/// Substring matches rank first, then names sharing a prefix of at least
/// three characters, then names within a small edit distance.
///
/// ```
/// use mkit_support::rendering::suggest_similar;
///
/// let available = ["database", "userService", "logger"];
/// assert_eq!(suggest_similar("userServise", &available, 3), vec!["userService"]);
/// ```
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let requested_lower = requested.to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            let common = name_lower
                .chars()
                .zip(requested_lower.chars())
                .take_while(|(a, b)| a == b)
                .count();
            if common >= 3 {
                return Some((name, 50 + common));
            }

            if edit_distance(&name_lower, &requested_lower) <= 2 {
                return Some((name, 40));
            }

            None
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut current = Vec::with_capacity(b.len() + 1);
        current.push(i + 1);
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current.push(substitution.min(previous[j + 1] + 1).min(current[j] + 1));
        }
        previous = current;
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_simple_chain() {
        assert_eq!(render_chain(&["a", "b", "a"]), "a → b → a");
    }

    #[test]
    fn render_single_and_empty_chain() {
        assert_eq!(render_chain(&["a"]), "a");
        let empty: Vec<&str> = vec![];
        assert_eq!(render_chain(&empty), "");
    }

    #[test]
    fn shorten_paths_and_generics() {
        assert_eq!(shorten_type_name("String"), "String");
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<alloc::vec::Vec<u8>>"),
            "Arc<Vec<u8>>"
        );
        assert_eq!(shorten_type_name("&str"), "&str");
    }

    #[test]
    fn suggests_typos_and_substrings() {
        let available = ["database", "databaseReplica", "logger"];
        let suggestions = suggest_similar("databse", &available, 3);
        assert_eq!(suggestions[0], "database");

        let suggestions = suggest_similar("replica", &available, 3);
        assert_eq!(suggestions, vec!["databaseReplica"]);
    }

    #[test]
    fn suggests_nothing_for_unrelated_names() {
        let available = ["database"];
        assert!(suggest_similar("xyz", &available, 3).is_empty());
    }

    #[test]
    fn edit_distance_counts_operations() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
    }
}
