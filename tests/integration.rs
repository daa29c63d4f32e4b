//! End-to-end scenarios exercising the public `BTree` surface together:
//! point operations, positional access, range iteration and the cursor,
//! all through the same handle or across clones.

use cow_btree::BTree;

#[test]
fn example_sequence() {
    let mut tr = BTree::new(32);
    for i in 0..10 {
        tr.set(i, i);
    }

    assert_eq!(tr.len(), 10);
    assert_eq!(tr.get(&3), Some(&3));
    assert_eq!(tr.get(&100), None);
    assert_eq!(tr.at(7), Some((&7, &7)));
    assert_eq!(tr.delete(&4), Some(4));
    assert_eq!(tr.delete(&100), None);
    assert_eq!(tr.set(5, 11), Some(5));
    assert_eq!(tr.set(100, 100), None);
    assert_eq!(tr.min(), Some((&0, &0)));
    assert_eq!(tr.delete_min(), Some((0, 0)));
    assert_eq!(tr.max(), Some((&100, &100)));
    assert_eq!(tr.delete_max(), Some((100, 100)));
    assert_eq!(tr.len(), 8);
}

#[test]
fn cursor_walk_from_start() {
    let mut tr = BTree::new(16);
    for i in 0..5 {
        tr.set(i, i);
    }

    let mut it = tr.before_min();
    for expected in 0..5 {
        assert!(it.next());
        assert_eq!(it.key(), Some(&expected));
        assert_eq!(it.value(), Some(&expected));
        assert_eq!(it.index(), Some(expected as usize));
    }
    assert!(!it.next());
}

#[test]
fn shuffled_insert_order_yields_sorted_result() {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    // Lets `RUST_LOG=cow_btree=trace cargo test` surface split/merge/rotate
    // activity while this test reshapes the tree thousands of times.
    let _ = env_logger::try_init();

    let n: i64 = 10_000;
    let mut keys: Vec<i64> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(0x2545_f491_4f6c_dd1d);
    keys.shuffle(&mut rng);

    let mut tr = BTree::new(2);
    for &k in &keys {
        tr.set(k, k);
    }

    let mut seen = Vec::with_capacity(n as usize);
    tr.ascend(|k, v| {
        seen.push((*k, *v));
        true
    });
    let expected: Vec<(i64, i64)> = (0..n).map(|i| (i, i)).collect();
    assert_eq!(seen, expected);

    for i in 0..n {
        assert_eq!(tr.delete_min(), Some((i, i)));
    }
    assert_eq!(tr.len(), 0);
}

#[test]
fn clone_divergence() {
    let mut tr = BTree::new(8);
    for i in 0..10_000 {
        tr.set(i, i);
    }
    let tr2 = tr.clone();

    for i in 5_000..10_000 {
        tr.delete(&i);
    }

    let mut first: Vec<i64> = Vec::new();
    tr.ascend(|k, _| {
        first.push(*k);
        true
    });
    assert_eq!(first, (0..5_000).collect::<Vec<_>>());

    let mut second: Vec<i64> = Vec::new();
    tr2.ascend(|k, _| {
        second.push(*k);
        true
    });
    assert_eq!(second, (0..10_000).collect::<Vec<_>>());
}

#[test]
fn range_with_early_stop() {
    let mut tr = BTree::new(4);
    for i in 0..100 {
        tr.set(i, i);
    }

    let mut visited = Vec::new();
    tr.ascend_range(&40, &60, |k, _| {
        if *k > 50 {
            return false;
        }
        visited.push(*k);
        true
    });
    assert_eq!(visited, (40..=50).collect::<Vec<_>>());
}

#[test]
fn seeking_around_absent_keys() {
    let mut tr = BTree::new(4);
    for k in (0..200).step_by(2) {
        tr.set(k, k);
    }

    for k in (-1..=101).step_by(2) {
        let mut ascending = Vec::new();
        let mut it = tr.before(&k);
        while it.next() {
            ascending.push(*it.key().unwrap());
        }
        let expected_up: Vec<i32> = (k + 1..200).step_by(2).collect();
        assert_eq!(ascending, expected_up, "Before({k})");

        let mut descending = Vec::new();
        let mut it = tr.after(&k);
        while it.next() {
            descending.push(*it.key().unwrap());
        }
        let expected_down: Vec<i32> = (0..=k - 1).rev().step_by(2).collect();
        assert_eq!(descending, expected_down, "After({k})");
    }
}

#[test]
fn operations_on_an_empty_tree_are_absent_not_errors() {
    let tr: BTree<i32, i32> = BTree::new(4);
    assert_eq!(tr.min(), None);
    assert_eq!(tr.max(), None);
    assert_eq!(tr.get(&0), None);
    assert_eq!(tr.at(0), None);
    assert!(!tr.before_min().next());
    assert!(!tr.before(&0).next());
    assert!(!tr.after(&0).next());

    let mut tr = tr;
    assert_eq!(tr.delete(&0), None);
    assert_eq!(tr.delete_min(), None);
    assert_eq!(tr.delete_max(), None);
}

#[test]
fn degree_two_passes_round_trips() {
    let mut tr = BTree::new(2);
    for i in 0..500 {
        tr.set(i, i * 3);
    }
    for i in 0..500 {
        assert_eq!(tr.get(&i), Some(&(i * 3)));
    }
    for i in (0..500).step_by(2) {
        assert_eq!(tr.delete(&i), Some(i * 3));
    }
    assert_eq!(tr.len(), 250);
}
