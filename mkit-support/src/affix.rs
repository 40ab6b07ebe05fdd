//! Prefix and suffix transformers.
//!
//! The `un*` variants return `None` when the input does not carry the
//! expected affix, so callers can tell "stripped to empty" from "no match".

/// Returns a function that prepends `prefix`.
///
/// ```
/// let on = mkit_support::affix::make_prefixer("on");
/// assert_eq!(on("Click"), "onClick");
/// ```
pub fn make_prefixer(prefix: impl Into<String>) -> impl Fn(&str) -> String + Send + Sync + Clone {
    let prefix = prefix.into();
    move |input: &str| format!("{prefix}{input}")
}

/// Returns a function that strips `prefix`, or yields `None` if absent.
///
/// ```
/// let strip = mkit_support::affix::make_unprefixer("on");
/// assert_eq!(strip("onClick").as_deref(), Some("Click"));
/// assert_eq!(strip("click"), None);
/// ```
pub fn make_unprefixer(prefix: impl Into<String>) -> impl Fn(&str) -> Option<String> + Send + Sync + Clone {
    let prefix = prefix.into();
    move |input: &str| input.strip_prefix(prefix.as_str()).map(str::to_owned)
}

/// Returns a function that appends `suffix`.
pub fn make_suffixer(suffix: impl Into<String>) -> impl Fn(&str) -> String + Send + Sync + Clone {
    let suffix = suffix.into();
    move |input: &str| format!("{input}{suffix}")
}

/// Returns a function that strips `suffix`, or yields `None` if absent.
pub fn make_unsuffixer(suffix: impl Into<String>) -> impl Fn(&str) -> Option<String> + Send + Sync + Clone {
    let suffix = suffix.into();
    move |input: &str| input.strip_suffix(suffix.as_str()).map(str::to_owned)
}
