//! Left-to-right function composition.
//!
//! ```
//! use mkit_support::affix::make_prefixer;
//! use mkit_support::case::make_capitalizer;
//! use mkit_support::transform::Transformer;
//!
//! let capitalize = make_capitalizer();
//! let prefix = make_prefixer("use");
//! let hook_name = Transformer::new(move |s: String| capitalize(&s))
//!     .then(move |s: String| prefix(&s));
//!
//! assert_eq!(hook_name.apply("state".to_string()), "useState");
//! ```

use std::fmt;

/// One boxed stage of a [`Transformer`].
pub type Step<A, B> = Box<dyn Fn(A) -> B + Send + Sync>;

/// A composed pipeline from `A` to `B`.
pub struct Transformer<A, B> {
    run: Step<A, B>,
}

impl<A: 'static> Transformer<A, A> {
    /// The empty pipeline: returns its input unchanged.
    pub fn identity() -> Self {
        Self { run: Box::new(|input| input) }
    }
}

impl<A: 'static, B: 'static> Transformer<A, B> {
    /// Starts a pipeline from a single step.
    pub fn new(step: impl Fn(A) -> B + Send + Sync + 'static) -> Self {
        Self { run: Box::new(step) }
    }

    /// Appends `next`, feeding it this pipeline's output.
    pub fn then<C: 'static>(self, next: impl Fn(B) -> C + Send + Sync + 'static) -> Transformer<A, C> {
        let run = self.run;
        Transformer {
            run: Box::new(move |input| next(run(input))),
        }
    }

    /// Runs the pipeline.
    pub fn apply(&self, input: A) -> B {
        (self.run)(input)
    }
}

impl<A, B> fmt::Debug for Transformer<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer").finish_non_exhaustive()
    }
}

/// Builds a pipeline from same-typed steps, applied in order.
///
/// With no steps the result is the identity.
///
/// ```
/// use mkit_support::transform::{Step, make_transformer};
///
/// let steps: Vec<Step<String, String>> = vec![
///     Box::new(|s: String| s.trim().to_string()),
///     Box::new(|s: String| format!("{s}!")),
/// ];
/// assert_eq!(make_transformer(steps).apply("  hi ".to_string()), "hi!");
/// ```
pub fn make_transformer<T: 'static>(steps: impl IntoIterator<Item = Step<T, T>>) -> Transformer<T, T> {
    let steps: Vec<Step<T, T>> = steps.into_iter().collect();
    if steps.is_empty() {
        return Transformer::identity();
    }
    Transformer::new(move |input| steps.iter().fold(input, |acc, step| step(acc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transformer_is_identity() {
        let t = make_transformer::<i32>(Vec::new());
        assert_eq!(t.apply(7), 7);
    }

    #[test]
    fn steps_run_left_to_right() {
        let steps: Vec<Step<i32, i32>> = vec![Box::new(|x| x + 1), Box::new(|x| x * 10)];
        let t = make_transformer(steps);
        assert_eq!(t.apply(1), 20);
    }

    #[test]
    fn then_changes_the_output_type() {
        let t = Transformer::new(|x: u8| u32::from(x) * 2)
            .then(|x| x.to_string())
            .then(|s| s.len());
        assert_eq!(t.apply(60), 3);
    }

    #[test]
    fn string_transformers_compose() {
        use crate::affix::{make_suffixer, make_unprefixer};

        let strip = make_unprefixer("on");
        let suffix = make_suffixer("Event");
        let t = Transformer::new(move |s: String| strip(&s).unwrap_or(s))
            .then(move |s: String| suffix(&s));

        assert_eq!(t.apply("onClick".into()), "ClickEvent");
        assert_eq!(t.apply("hover".into()), "hoverEvent");
    }
}
