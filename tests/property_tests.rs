//! Properties of the sorted, windowed, sampled and concurrent operators.

use std::collections::BTreeSet;

use proptest::collection::{btree_set, vec};
use proptest::prelude::*;

use seqflow::exec::{collect, sample};
use seqflow::operators::{full_join, inner_join, left_join, merge};
use seqflow::prelude::*;
use seqflow::sources::{from_iter, from_vec, VecSource};

fn sources(sets: &[BTreeSet<u8>]) -> Vec<VecSource<u8>> {
    sets.iter()
        .map(|s| from_vec(s.iter().copied().collect()))
        .collect()
}

fn expected_windows(len: usize, size: usize, step: usize, omit: bool) -> usize {
    if len == 0 {
        0
    } else if len < size {
        usize::from(!omit)
    } else if omit {
        (len - size) / step + 1
    } else {
        (len - size + step - 1) / step + 1
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn merge_of_sorted_inputs_is_sorted(inputs in vec(vec(any::<u16>(), 0..30), 1..6)) {
        let ctx = Context::new();
        let sorted: Vec<Vec<u16>> = inputs
            .into_iter()
            .map(|mut v| {
                v.sort_unstable();
                v
            })
            .collect();
        let mut expected: Vec<u16> = sorted.iter().flatten().copied().collect();
        expected.sort_unstable();

        let out = collect(merge(sorted.into_iter().map(from_vec).collect()), &ctx).unwrap();
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn full_join_one_record_per_distinct_key(sets in vec(btree_set(0u8..60, 0..25), 1..5)) {
        let ctx = Context::new();
        let out = collect(full_join(sources(&sets), |x: &u8| *x), &ctx).unwrap();
        let all: BTreeSet<u8> = sets.iter().flatten().copied().collect();

        prop_assert_eq!(out.iter().map(|j| j.key).collect::<Vec<_>>(), all.into_iter().collect::<Vec<_>>());
        for joined in &out {
            for (set, value) in sets.iter().zip(&joined.values) {
                prop_assert_eq!(value.is_some(), set.contains(&joined.key));
            }
        }
    }

    #[test]
    fn inner_join_keeps_only_common_keys(sets in vec(btree_set(0u8..30, 0..20), 1..5)) {
        let ctx = Context::new();
        let out = collect(inner_join(sources(&sets), |x: &u8| *x), &ctx).unwrap();
        let common: Vec<u8> = sets[0]
            .iter()
            .copied()
            .filter(|k| sets.iter().all(|s| s.contains(k)))
            .collect();

        prop_assert_eq!(out.iter().map(|j| j.key).collect::<Vec<_>>(), common);
        prop_assert!(out.iter().all(|j| j.values.len() == sets.len()));
    }

    #[test]
    fn left_join_one_record_per_primary_element(
        sets in vec(btree_set(0u8..40, 0..20), 1..5),
        pick in any::<prop::sample::Index>(),
    ) {
        let ctx = Context::new();
        let primary = pick.index(sets.len());
        let out = collect(left_join(sources(&sets), primary, |x: &u8| *x), &ctx).unwrap();

        prop_assert_eq!(out.len(), sets[primary].len());
        for joined in &out {
            prop_assert!(joined.values[primary].is_some());
            for (set, value) in sets.iter().zip(&joined.values) {
                prop_assert_eq!(value.is_some(), set.contains(&joined.key));
            }
        }
    }

    #[test]
    fn window_count_matches_shape(
        len in 0usize..60,
        size in 1usize..8,
        step_seed in any::<prop::sample::Index>(),
        omit in any::<bool>(),
    ) {
        let ctx = Context::new();
        let step = step_seed.index(size) + 1;
        let config = WindowConfig::new(size).step(step).omit_partial(omit);
        let windows = from_iter(move || 0..len).window(config).collect_vec(&ctx).unwrap();

        prop_assert_eq!(windows.len(), expected_windows(len, size, step, omit));
        if let Some((last, full)) = windows.split_last() {
            prop_assert!(full.iter().all(|w| w.len() == size));
            prop_assert!(!last.is_empty() && last.len() <= size);
        }
    }

    #[test]
    fn reservoir_returns_min_of_k_and_len(len in 0usize..300, k in 1usize..40, seed in any::<u64>()) {
        let ctx = Context::new();
        let out = sample(from_iter(move || 0..len), &ctx, k, Some(seed)).unwrap();
        prop_assert_eq!(out.len(), k.min(len));
        let distinct: BTreeSet<usize> = out.iter().copied().collect();
        prop_assert_eq!(distinct.len(), out.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn concurrent_map_matches_sequential_multiset(items in vec(any::<i32>(), 0..200), workers in 1usize..6) {
        let ctx = Context::new();
        let mut expected: Vec<i64> = items.iter().map(|x| i64::from(*x) * 3).collect();
        expected.sort_unstable();

        let source = from_vec(items);
        let mut out = source
            .map_concurrent(workers, |x: i32| Ok(i64::from(x) * 3))
            .collect_vec(&ctx)
            .unwrap();
        out.sort_unstable();
        prop_assert_eq!(out, expected);
    }
}

#[test]
fn test_reservoir_selection_is_uniform() {
    let ctx = Context::new();
    let mut hits = [0u32; 20];
    for seed in 0..3000 {
        for i in sample(from_iter(|| 0..20usize), &ctx, 5, Some(seed)).unwrap() {
            hits[i] += 1;
        }
    }
    // 3000 trials * 5 / 20 = 750 expected per element.
    for count in hits {
        assert!((630..870).contains(&count), "{hits:?}");
    }
}
