use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Walk the tree and check every structural invariant.
fn validate_tree<T: PartialEq + std::fmt::Debug, C: Comparator<T>>(t: &SortedTree<T, C>) {
    let cmp = t.comparator();

    let Some(root) = t.root else {
        assert_eq!(t.len(), 0, "empty root must mean an empty tree");
        return;
    };
    assert_eq!(t.nodes[root].parent, None, "root must not have a parent");

    // (node, exclusive lower bound, exclusive upper bound)
    let mut stack: Vec<(node::NodeId, Option<&T>, Option<&T>)> = vec![(root, None, None)];
    let mut reachable = 0usize;
    let mut elements = 0usize;
    while let Some((id, lo, hi)) = stack.pop() {
        reachable += 1;
        let n = &t.nodes[id];
        assert!(!n.bucket.is_empty(), "reachable node with an empty bucket");
        elements += n.bucket.len();

        let rank = n.rank();
        if let Some(lo) = lo {
            assert_eq!(cmp.compare(rank, lo), Ordering::Greater, "{rank:?} not above {lo:?}");
        }
        if let Some(hi) = hi {
            assert_eq!(cmp.compare(rank, hi), Ordering::Less, "{rank:?} not below {hi:?}");
        }
        for (i, member) in n.bucket.iter().enumerate() {
            assert_eq!(cmp.compare(member, rank), Ordering::Equal, "bucket member out of rank");
            assert!(
                !n.bucket[..i].contains(member),
                "bucket holds {member:?} twice"
            );
        }

        if let Some(left) = n.left {
            assert_eq!(t.nodes[left].parent, Some(id), "left child parent link");
            stack.push((left, lo, Some(rank)));
        }
        if let Some(right) = n.right {
            assert_eq!(t.nodes[right].parent, Some(id), "right child parent link");
            stack.push((right, Some(rank), hi));
        }
    }

    assert_eq!(reachable, t.nodes.live(), "every live slot must be reachable");
    assert_eq!(elements, t.len(), "len must equal the sum of bucket sizes");

    let listed = t.to_sorted_list();
    assert_eq!(listed.len(), elements);
    for w in listed.windows(2) {
        assert_ne!(cmp.compare(w[0], w[1]), Ordering::Greater, "list not sorted");
    }
}

/// Ranked by `key`; `tag` separates members of one bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Arbitrary)]
struct Item {
    #[proptest(strategy = "0u8..32")]
    key: u8,
    #[proptest(strategy = "0u8..3")]
    tag: u8,
}

fn by_key(a: &Item, b: &Item) -> Ordering {
    a.key.cmp(&b.key)
}

type ItemTree = SortedTree<Item, fn(&Item, &Item) -> Ordering>;

fn item_tree() -> ItemTree {
    SortedTree::with_comparator(by_key as fn(&Item, &Item) -> Ordering)
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(Item),
    #[proptest(weight = 3)]
    Remove(Item),
    Contains(Item),
    Get(#[proptest(strategy = "0usize..64")] usize),
}

/// Buckets keyed by rank, each in insertion order.
#[derive(Clone, Default)]
struct Model {
    buckets: BTreeMap<u8, Vec<Item>>,
}

impl Model {
    fn insert(&mut self, x: Item) -> bool {
        let bucket = self.buckets.entry(x.key).or_default();
        if bucket.contains(&x) {
            return false;
        }
        bucket.push(x);
        true
    }

    fn remove(&mut self, x: &Item) -> Option<Item> {
        let bucket = self.buckets.get_mut(&x.key)?;
        let pos = bucket.iter().position(|v| v == x)?;
        let removed = bucket.remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(&x.key);
        }
        Some(removed)
    }

    fn contains(&self, x: &Item) -> bool {
        self.buckets.get(&x.key).is_some_and(|b| b.contains(x))
    }

    fn flatten(&self) -> Vec<Item> {
        self.buckets.values().flatten().copied().collect()
    }
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=1000)
}

fn insert_then_shuffle() -> impl Strategy<Value = (Vec<Item>, Vec<Item>)> {
    prop::collection::vec(any::<Item>(), 0..=200).prop_flat_map(|items| {
        let shuffled = Just(items.clone()).prop_shuffle();
        (Just(items), shuffled)
    })
}

#[derive(Clone, Debug)]
enum SetOp {
    Insert(u16),
    Remove(u16),
}

fn set_ops_strategy() -> impl Strategy<Value = Vec<SetOp>> {
    let op = prop_oneof![
        3 => (0u16..512).prop_map(SetOp::Insert),
        2 => (0u16..512).prop_map(SetOp::Remove),
    ];
    prop::collection::vec(op, 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_buckets(ops in ops_strategy()) {
        let mut t = item_tree();
        let mut m = Model::default();

        for op in ops {
            match op {
                Op::Insert(x) => prop_assert_eq!(t.insert(x), m.insert(x)),
                Op::Remove(x) => prop_assert_eq!(t.remove(&x), m.remove(&x)),
                Op::Contains(x) => prop_assert_eq!(t.contains(&x), m.contains(&x)),
                Op::Get(i) => {
                    let expected = m.flatten();
                    prop_assert_eq!(t.get(i).ok(), expected.get(i));
                }
            }
        }

        validate_tree(&t);
        let got: Vec<Item> = t.iter().copied().collect();
        prop_assert_eq!(got, m.flatten());
    }

    #[test]
    fn prop_round_trip_empties((items, order) in insert_then_shuffle()) {
        let mut t = item_tree();
        t.extend(items);
        validate_tree(&t);

        for x in order {
            t.remove(&x);
            validate_tree(&t);
        }
        prop_assert!(t.is_empty());
        prop_assert_eq!(t.len(), 0);
        prop_assert!(t.root.is_none());
    }

    #[test]
    fn prop_matches_btreeset(ops in set_ops_strategy()) {
        let mut t: SortedTree<u16> = SortedTree::new();
        let mut s: BTreeSet<u16> = BTreeSet::new();

        for op in ops {
            match op {
                SetOp::Insert(v) => prop_assert_eq!(t.insert(v), s.insert(v)),
                SetOp::Remove(v) => prop_assert_eq!(t.remove(&v).is_some(), s.remove(&v)),
            }
        }

        validate_tree(&t);
        prop_assert_eq!(t.first(), s.first());
        prop_assert_eq!(t.last(), s.last());
        for (i, v) in s.iter().enumerate() {
            prop_assert_eq!(t.get(i), Ok(v));
        }
        prop_assert!(t.get(s.len()).is_err());
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

fn small_set() -> Vec<Item> {
    vec![
        Item { key: 4, tag: 0 },
        Item { key: 2, tag: 0 },
        Item { key: 6, tag: 0 },
        Item { key: 2, tag: 1 },
        Item { key: 5, tag: 0 },
        Item { key: 7, tag: 0 },
        Item { key: 1, tag: 0 },
    ]
}

#[test]
fn exhaustive_insert_order_small_set() {
    let items = small_set();

    for_each_permutation(&items, |perm| {
        let mut t = item_tree();
        let mut m = Model::default();
        for x in perm {
            assert_eq!(t.insert(x), m.insert(x));
        }

        validate_tree(&t);
        let got: Vec<Item> = t.iter().copied().collect();
        assert_eq!(got, m.flatten());
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let items = small_set();

    // Insert in a fixed order, then remove in all permutations.
    let mut base_tree = item_tree();
    let mut base_model = Model::default();
    for x in &items {
        assert_eq!(base_tree.insert(*x), base_model.insert(*x));
    }

    for_each_permutation(&items, |perm| {
        let mut t = base_tree.clone();
        let mut m = base_model.clone();

        for x in perm {
            assert_eq!(t.remove(&x), m.remove(&x));
            validate_tree(&t);
            assert_eq!(t.iter().copied().collect::<Vec<_>>(), m.flatten());
        }
        assert_eq!(t.len(), 0);
        assert!(t.root.is_none());
    });
}
