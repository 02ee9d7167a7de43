//! Algebraic properties of the tree diff

use std::collections::HashSet;

use hearth_core::diff;
use hearth_fs::{DirectoryTree, SegmentPath};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from)
}

/// Paths over a tiny alphabet so trees overlap often. Files are named with a
/// `.f` suffix so no name is ever both a file and a directory.
fn path() -> impl Strategy<Value = SegmentPath> {
    (prop::collection::vec(segment(), 0..3), segment(), any::<bool>()).prop_map(
        |(dirs, leaf, is_dir)| {
            let mut raw = dirs.join("/");
            if !raw.is_empty() {
                raw.push('/');
            }
            raw.push_str(&leaf);
            if is_dir {
                raw.push('/');
            } else {
                raw.push_str(".f");
            }
            raw.parse().unwrap()
        },
    )
}

fn tree() -> impl Strategy<Value = DirectoryTree> {
    prop::collection::vec(path(), 0..12)
        .prop_map(|paths| DirectoryTree::from_paths("root", &paths).unwrap())
}

proptest! {
    #[test]
    fn swapping_inputs_swaps_the_sides(a in tree(), b in tree()) {
        let ab = diff(&a, &b).unwrap();
        let ba = diff(&b, &a).unwrap();

        prop_assert_eq!(ab.only_in_a(), ba.only_in_b());
        prop_assert_eq!(ab.only_in_b(), ba.only_in_a());
        prop_assert_eq!(ab.in_both(), ba.in_both());
        prop_assert_eq!(ab.swapped(), ba);
    }

    #[test]
    fn diff_with_itself_is_all_common(a in tree()) {
        let result = diff(&a, &a).unwrap();

        prop_assert!(result.is_identical());
        prop_assert_eq!(result.in_both(), &a.flatten());
    }

    #[test]
    fn sets_partition_both_trees(a in tree(), b in tree()) {
        let result = diff(&a, &b).unwrap();

        prop_assert!(result.only_in_a().is_disjoint(result.in_both()));
        prop_assert!(result.only_in_b().is_disjoint(result.in_both()));
        prop_assert!(result.only_in_a().is_disjoint(result.only_in_b()));

        let side_a: HashSet<SegmentPath> =
            result.only_in_a().union(result.in_both()).cloned().collect();
        let side_b: HashSet<SegmentPath> =
            result.only_in_b().union(result.in_both()).cloned().collect();
        prop_assert_eq!(side_a, a.flatten());
        prop_assert_eq!(side_b, b.flatten());
    }

    #[test]
    fn sorted_views_are_ascending(a in tree(), b in tree()) {
        let result = diff(&a, &b).unwrap();
        let sorted = result.sorted_only_in_a();
        prop_assert!(sorted.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(sorted.len(), result.only_in_a().len());
    }
}
