//! Property tests for the node algebra: ordering and uniqueness invariants,
//! value cardinality, model-based checking of the locked operations against
//! `BTreeMap`, and conservation/inverse laws for the structural operations.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use proptest::prelude::*;
use vaultidx::{BTree, ByteKey, Error, IndexHeader, IndexParams, PageType, PageView};

/// Computed geometry: 20 leaf keys, half-full minimum of 10.
fn tree() -> BTree<ByteKey> {
    let ih = IndexHeader::compute(&IndexParams {
        page_size: 188,
        key_size: 1,
        value_size: 8,
    })
    .unwrap();
    BTree::new(ih, ByteKey)
}

/// Hand-built root-style geometry (`min_keys = 0`) so deletes never
/// underflow; 16 leaf keys.
fn model_tree() -> BTree<ByteKey> {
    let ih = IndexHeader {
        page_size: 160,
        key_size: 1,
        val_size: [4, 8],
        max_keys: [16, 16],
        min_keys: [0, 0],
    };
    BTree::new(ih, ByteKey)
}

fn new_leaf(tree: &BTree<ByteKey>) -> Vec<u8> {
    let mut buf = vec![0u8; tree.header().page_size()];
    tree.init_leaf_page(&mut buf).unwrap();
    buf
}

fn val(k: u8) -> [u8; 8] {
    (k as u64 * 31 + 7).to_ne_bytes()
}

/// Keys strictly ascending and unique, value count matching key count.
fn assert_page_invariants(tree: &BTree<ByteKey>, buf: &[u8]) {
    let view = PageView::bind(tree.header(), buf).unwrap();
    assert_eq!(view.num_vals(), view.num_keys());
    for i in 1..view.num_keys() {
        assert!(
            view.key_at(i - 1)[0] < view.key_at(i)[0],
            "keys out of order at slot {i}"
        );
    }
}

fn leaf_entries(tree: &BTree<ByteKey>, buf: &[u8]) -> Vec<(u8, [u8; 8])> {
    let view = PageView::bind(tree.header(), buf).unwrap();
    (0..view.num_keys())
        .map(|i| (view.key_at(i)[0], view.val_at(i).try_into().unwrap()))
        .collect()
}

proptest! {
    /// Any insert sequence leaves the page sorted and duplicate-free.
    #[test]
    fn insert_sequences_stay_sorted(keys in proptest::collection::vec(any::<u8>(), 0..60)) {
        let t = tree();
        let page = RwLock::new(new_leaf(&t));

        for k in &keys {
            match t.block_insert(&page, &[*k], &val(*k)) {
                Ok(()) | Err(Error::DuplicateInsert) | Err(Error::NodeFull) => {}
                Err(e) => prop_assert!(false, "unexpected error: {e}"),
            }
            assert_page_invariants(&t, &page.read());
        }
    }

    /// Inserting into a non-full page and reading the key back returns the
    /// stored value.
    #[test]
    fn insert_then_find_round_trips(
        keys in proptest::collection::btree_set(any::<u8>(), 1..=20)
    ) {
        let t = tree();
        let page = RwLock::new(new_leaf(&t));

        for &k in &keys {
            t.block_insert(&page, &[k], &val(k)).unwrap();
        }

        let mut out = [0u8; 8];
        for &k in &keys {
            t.block_find(&page, &[k], Some(&mut out)).unwrap();
            prop_assert_eq!(out, val(k));
        }
    }

    /// The locked ops agree with a `BTreeMap` model, error-for-error.
    #[test]
    fn ops_match_btreemap_model(
        ops in proptest::collection::vec((any::<bool>(), any::<u8>()), 1..120)
    ) {
        let t = model_tree();
        let max = t.header().max_keys(PageType::Leaf);
        let page = RwLock::new(new_leaf(&t));
        let mut model: BTreeMap<u8, [u8; 8]> = BTreeMap::new();

        for (is_insert, k) in ops {
            if is_insert {
                // the full check precedes the duplicate probe
                let expected = if model.len() == max {
                    Err(Error::NodeFull)
                } else if model.contains_key(&k) {
                    Err(Error::DuplicateInsert)
                } else {
                    Ok(())
                };
                prop_assert_eq!(t.block_insert(&page, &[k], &val(k)), expected.clone());
                if expected.is_ok() {
                    model.insert(k, val(k));
                }
            } else {
                let expected = if model.contains_key(&k) {
                    Ok(())
                } else {
                    Err(Error::KeyNotFound)
                };
                prop_assert_eq!(t.block_delete(&page, &[k]), expected.clone());
                if expected.is_ok() {
                    model.remove(&k);
                }
            }
            assert_page_invariants(&t, &page.read());
        }

        let stored = leaf_entries(&t, &page.read());
        let expected: Vec<(u8, [u8; 8])> = model.into_iter().collect();
        prop_assert_eq!(stored, expected);
    }

    /// Splitting a full page and concatenating the halves restores the
    /// occupied prefix of both slabs byte-for-byte.
    #[test]
    fn split_concat_is_identity_on_slabs(
        vals in proptest::collection::vec(any::<u64>(), 20)
    ) {
        let t = tree();
        let page = RwLock::new(new_leaf(&t));
        for (k, v) in (0..20u8).zip(&vals) {
            t.block_insert(&page, &[k], &v.to_ne_bytes()).unwrap();
        }
        let original = page.into_inner();

        let mut full = original.clone();
        let mut empty = new_leaf(&t);
        let mut promote = [0u8; 1];
        t.split_node(&mut full, &mut empty, &mut promote).unwrap();
        prop_assert_eq!(promote, [10u8]);
        t.concat_nodes(&mut full, &mut empty, true).unwrap();

        let ih = t.header();
        let vals_range = ih.vals_offset()..ih.vals_offset() + 20 * ih.val_size(PageType::Leaf);
        let keys_range =
            ih.keys_offset(PageType::Leaf)..ih.keys_offset(PageType::Leaf) + 20 * ih.key_size();
        prop_assert_eq!(&full[vals_range.clone()], &original[vals_range]);
        prop_assert_eq!(&full[keys_range.clone()], &original[keys_range]);
    }

    /// Redistribution conserves the key/value multiset and leaves both
    /// siblings at or above the half-full minimum.
    #[test]
    fn redistribute_conserves_entries(
        left in proptest::collection::btree_set(0u8..100, 0..=20),
        right in proptest::collection::btree_set(100u8..200, 0..=20),
    ) {
        let t = tree();
        let min = t.header().min_keys(PageType::Leaf);
        prop_assume!(left.len() + right.len() >= 2 * min);

        let fill = |keys: &std::collections::BTreeSet<u8>| {
            let page = RwLock::new(new_leaf(&t));
            for &k in keys {
                t.block_insert(&page, &[k], &val(k)).unwrap();
            }
            page.into_inner()
        };
        let mut n1 = fill(&left);
        let mut n2 = fill(&right);

        let mut combined: Vec<(u8, [u8; 8])> = leaf_entries(&t, &n1);
        combined.extend(leaf_entries(&t, &n2));

        t.redistribute_nodes(&mut n1, &mut n2).unwrap();

        let after1 = leaf_entries(&t, &n1);
        let after2 = leaf_entries(&t, &n2);
        prop_assert!(after1.len() >= min);
        prop_assert!(after2.len() >= min);
        assert_page_invariants(&t, &n1);
        assert_page_invariants(&t, &n2);

        let mut merged = after1;
        merged.extend(after2);
        merged.sort();
        combined.sort();
        prop_assert_eq!(merged, combined);
    }

    /// Failing finds and duplicate inserts leave the page bytes untouched.
    #[test]
    fn failures_preserve_bytes(
        // below capacity, so a present probe always reports the duplicate
        keys in proptest::collection::btree_set(any::<u8>(), 1..=19),
        probe in any::<u8>(),
    ) {
        let t = tree();
        let page = RwLock::new(new_leaf(&t));
        for &k in &keys {
            t.block_insert(&page, &[k], &val(k)).unwrap();
        }

        let before = page.read().clone();
        if keys.contains(&probe) {
            prop_assert_eq!(
                t.block_insert(&page, &[probe], &val(probe)),
                Err(Error::DuplicateInsert)
            );
        } else {
            prop_assert_eq!(t.block_find(&page, &[probe], None), Err(Error::KeyNotFound));
        }
        prop_assert_eq!(&*page.read(), &before);
    }
}
