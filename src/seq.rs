//! Order-preserving sequence utilities.
//!
//! Small helpers for deduplicating, sorting, and filtering in-memory
//! sequences. None of them mutate their input; each returns a fresh
//! `Vec` so intermediate results can be inspected side by side in a
//! notebook without defensive copies at the call site.

use std::cmp::Ordering;

/// Returns each distinct element of `items` exactly once, preserving the
/// order of first occurrence.
///
/// Equality is by `==`. The quadratic scan is deliberate: it only asks
/// for `PartialEq`, so it works on `f64` slices, and the inputs this
/// crate sees are notebook-sized.
///
/// # Examples
/// ```
/// use nbstat::seq::unique;
/// assert_eq!(unique(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
/// ```
pub fn unique<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Returns a sorted copy of `values` in ascending numeric order.
///
/// Uses [`f64::total_cmp`], so NaN gets a defined place in the order
/// instead of poisoning the comparison.
///
/// # Examples
/// ```
/// use nbstat::seq::sorted;
/// assert_eq!(sorted(&[10.0, 2.0, 33.0]), vec![2.0, 10.0, 33.0]);
/// ```
pub fn sorted(values: &[f64]) -> Vec<f64> {
    sorted_by(values, |a, b| a.total_cmp(b))
}

/// Returns a copy of `items` sorted by the given comparator.
///
/// The escape hatch for callers that want an order other than ascending
/// numeric — descending, by key, lexicographic on strings, and so on.
/// The sort is stable.
///
/// # Examples
/// ```
/// use nbstat::seq::sorted_by;
/// let v = sorted_by(&[1, 3, 2], |a, b| b.cmp(a));
/// assert_eq!(v, vec![3, 2, 1]);
/// ```
pub fn sorted_by<T, F>(items: &[T], cmp: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut out = items.to_vec();
    out.sort_by(cmp);
    out
}

/// Returns the elements of `items` for which `predicate` returns true,
/// preserving relative order.
///
/// # Examples
/// ```
/// use nbstat::seq::filter;
/// assert_eq!(filter(&[1, 2, 3, 4], |x| x % 2 == 0), vec![2, 4]);
/// ```
pub fn filter<T, P>(items: &[T], mut predicate: P) -> Vec<T>
where
    T: Clone,
    P: FnMut(&T) -> bool,
{
    items
        .iter()
        .filter(|item| predicate(*item))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        // --- unique output has no duplicates and is a subsequence ---
        #[test]
        fn unique_is_deduplicated_subsequence(data in proptest::collection::vec(0_i32..20, 0..50)) {
            let out = unique(&data);
            for (i, a) in out.iter().enumerate() {
                for b in &out[i + 1..] {
                    prop_assert_ne!(a, b, "duplicate survived unique()");
                }
            }
            // Every input element is represented, every output element came
            // from the input.
            for x in &data {
                prop_assert!(out.contains(x));
            }
            for x in &out {
                prop_assert!(data.contains(x));
            }
        }

        // --- sorted output is ordered and a permutation ---
        #[test]
        fn sorted_is_ordered_permutation(
            data in proptest::collection::vec(-1e9_f64..1e9, 0..50)
        ) {
            let out = sorted(&data);
            for w in out.windows(2) {
                prop_assert!(w[0] <= w[1]);
            }
            let mut expected = data.clone();
            expected.sort_by(f64::total_cmp);
            prop_assert_eq!(out, expected);
        }

        // --- filter keeps exactly the matching elements in order ---
        #[test]
        fn filter_matches_iterator(data in proptest::collection::vec(-100_i32..100, 0..50)) {
            let out = filter(&data, |x| x % 3 == 0);
            let expected: Vec<i32> = data.iter().copied().filter(|x| x % 3 == 0).collect();
            prop_assert_eq!(out, expected);
        }
    }
}
