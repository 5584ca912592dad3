//! Override reconciliation
//!
//! Overrides are sorted lexicographically as whole strings, then adjacent
//! expressions for the same path collapse to the one sorting last. The
//! result is path-sorted with every path present once, so the same set of
//! inputs always produces the same list regardless of the order given.

use crate::error::Result;
use crate::setter;
use edgeadm_types::{OverrideExpression, ValueTree};
use tracing::warn;

/// Sort, split and deduplicate `path=value` strings.
///
/// Strings without `=` are logged and dropped.
pub fn reconcile<S: AsRef<str>>(overrides: &[S]) -> Vec<OverrideExpression> {
    let mut sorted: Vec<&str> = overrides.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    let mut kept: Vec<OverrideExpression> = Vec::with_capacity(sorted.len());
    for raw in sorted {
        let Some(expression) = OverrideExpression::parse(raw) else {
            warn!(expression = raw, "Unsupported override, ignoring");
            continue;
        };

        match kept.last_mut() {
            Some(previous) if previous.path == expression.path => *previous = expression,
            _ => kept.push(expression),
        }
    }
    kept
}

/// Apply reconciled overrides onto `tree` in order
pub fn fold_into(tree: &mut ValueTree, reconciled: &[OverrideExpression]) -> Result<()> {
    for expression in reconciled {
        setter::apply(tree, expression)?;
    }
    Ok(())
}

/// Reconcile `overrides` and fold them onto `base`
pub fn merge<S: AsRef<str>>(base: ValueTree, overrides: &[S]) -> Result<ValueTree> {
    let mut tree = base;
    fold_into(&mut tree, &reconcile(overrides))?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn paths(reconciled: &[OverrideExpression]) -> Vec<String> {
        reconciled.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_last_in_sort_order_wins() {
        let reconciled = reconcile(&["a.b=1", "a.b=2", "c=3"]);
        assert_eq!(paths(&reconciled), vec!["a.b=2", "c=3"]);

        let tree = merge(ValueTree::new(), &["c=3", "a.b=2", "a.b=1"]).unwrap();
        assert_eq!(
            serde_json::Value::Object(tree.into_inner()),
            json!({"a": {"b": 2}, "c": 3})
        );
    }

    #[test]
    fn test_malformed_expressions_dropped() {
        let reconciled = reconcile(&["novalue", "x=1", "alsonovalue"]);
        assert_eq!(paths(&reconciled), vec!["x=1"]);
    }

    #[test]
    fn test_dropped_expression_does_not_break_dedup() {
        // dropped strings never become the previous kept path
        let reconciled = reconcile(&["a=2", "a", "a=1"]);
        assert_eq!(paths(&reconciled), vec!["a=2"]);
    }

    #[test]
    fn test_overrides_win_over_base() {
        let base = ValueTree::from_yaml("cloudCore:\n  image:\n    tag: v1.10.0\n    repository: kubeedge/cloudcore\n").unwrap();
        let tree = merge(base, &["cloudCore.image.tag=v1.12.0"]).unwrap();
        assert_eq!(tree.get("cloudCore.image.tag"), Some(&json!("v1.12.0")));
        assert_eq!(
            tree.get("cloudCore.image.repository"),
            Some(&json!("kubeedge/cloudcore"))
        );
    }

    #[test]
    fn test_malformed_path_fails_merge() {
        assert!(merge(ValueTree::new(), &["a[x]=1"]).is_err());
    }

    proptest! {
        #[test]
        fn prop_reconcile_is_order_independent(
            (inputs, shuffled_inputs) in prop::collection::vec("[a-c]{1,2}(\\.[a-c])?=[0-9]{1,2}", 0..12)
                .prop_flat_map(|inputs| (Just(inputs.clone()), Just(inputs).prop_shuffle())),
        ) {
            let expected = reconcile(&inputs);

            let shuffled = reconcile(&shuffled_inputs);
            prop_assert_eq!(&expected, &shuffled);

            let mut seen = std::collections::HashSet::new();
            for expression in &shuffled {
                prop_assert!(seen.insert(expression.path.clone()));
            }
            let mut sorted = paths(&shuffled);
            sorted.sort();
            prop_assert_eq!(sorted, paths(&shuffled));
        }
    }
}
