use crate::entity::Filterable;
use crate::error::Error;
use crate::loader::FilterLoader;
use crate::rule::Rule;

/// Applies rule chains to the properties of one object.
///
/// A walker is created per filtering operation and bound to a single object
/// and loader. It reads a property, folds the value left to right through the
/// rule chain and writes the result back through the object's own setter.
///
/// The property is written only after the whole chain succeeded. When a
/// filter fails, the error propagates and the property keeps its previous
/// value.
pub struct ObjectWalker<'a, T: ?Sized> {
    object: &'a mut T,
    loader: &'a dyn FilterLoader,
}

impl<'a, T: Filterable + ?Sized> ObjectWalker<'a, T> {
    /// Binds a walker to `object`, resolving filters through `loader`.
    pub fn new(object: &'a mut T, loader: &'a dyn FilterLoader) -> Self {
        Self { object, loader }
    }

    /// Applies `rules` to `property` and writes the result back.
    ///
    /// An empty chain leaves the object untouched.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::ReflectionFailure`](crate::ErrorKind::ReflectionFailure) if the
    ///   property cannot be read or written.
    /// - Any error from resolving or applying a filter.
    pub fn apply_filter_rules(&mut self, property: &str, rules: &[Rule]) -> Result<(), Error> {
        if rules.is_empty() {
            return Ok(());
        }

        let value = self
            .object
            .get_property(property)
            .ok_or_else(|| Error::reflection(format!("cannot read property '{}'", property)))?;

        let value = rules.iter().try_fold(value, |value, rule| {
            tracing::trace!(property, rule = rule.name(), "applying rule");
            self.loader.filter_for_rule(rule)?.apply(rule, value)
        })?;

        self.object.set_property(property, value)
    }

    /// Returns the bound object.
    pub fn object(&self) -> &T {
        &*self.object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_fn;
    use crate::loader::FilterRegistry;
    use crate::rule::RuleKind;
    use crate::test_utils::Article;
    use crate::{filters, ErrorKind};
    use serde_json::Value;

    fn rules(kinds: &[RuleKind]) -> Vec<Rule> {
        kinds.iter().map(|k| Rule::of(*k).unwrap()).collect()
    }

    #[test]
    fn applies_chain_left_to_right() {
        let registry = FilterRegistry::builtin();
        let mut article = Article::new("  Hello\nWorld  ", "", false);
        let mut walker = ObjectWalker::new(&mut article, &registry);

        walker
            .apply_filter_rules("title", &rules(&[filters::STRIP_NEWLINES, filters::TRIM]))
            .unwrap();

        assert_eq!(article.title, "HelloWorld");
    }

    #[test]
    fn empty_chain_does_not_touch_object() {
        let registry = FilterRegistry::new();
        let mut article = Article::new(" x ", "", false);
        let mut walker = ObjectWalker::new(&mut article, &registry);

        walker.apply_filter_rules("nonexistent", &[]).unwrap();

        assert_eq!(walker.object().title, " x ");
        assert_eq!(article.writes, 0);
    }

    #[test]
    fn writes_through_setter() {
        let registry = FilterRegistry::builtin();
        let mut article = Article::new("Title", "", false);

        ObjectWalker::new(&mut article, &registry)
            .apply_filter_rules("title", &rules(&[filters::TO_UPPER]))
            .unwrap();

        assert_eq!(article.title, "TITLE");
        assert_eq!(article.writes, 1);
    }

    #[test]
    fn unknown_property_is_reflection_failure() {
        let registry = FilterRegistry::builtin();
        let mut article = Article::new("", "", false);

        let error = ObjectWalker::new(&mut article, &registry)
            .apply_filter_rules("body", &rules(&[filters::TRIM]))
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::ReflectionFailure);
        assert!(error.message().contains("body"));
    }

    #[test]
    fn failing_step_leaves_property_unchanged() {
        let registry = FilterRegistry::builtin().with(
            "fail",
            filter_fn(|rule, _: Value| Err(Error::filter_failure(rule.name(), "nope"))),
        );
        let mut article = Article::new("  keep  ", "", false);
        let chain = rules(&[filters::TRIM, RuleKind::new("fail"), filters::TO_UPPER]);

        let error = ObjectWalker::new(&mut article, &registry)
            .apply_filter_rules("title", &chain)
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::FilterFailure);
        assert_eq!(article.title, "  keep  ");
        assert_eq!(article.writes, 0);
    }

    #[test]
    fn unresolvable_filter_propagates() {
        let registry = FilterRegistry::new();
        let mut article = Article::new("", "", false);

        let error = ObjectWalker::new(&mut article, &registry)
            .apply_filter_rules("title", &rules(&[filters::TRIM]))
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UnresolvableFilter);
    }
}
