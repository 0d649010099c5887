//! Random operation sequences: every operation either keeps all back-links
//! consistent or fails without changing anything.

use discotree::{Tree, TreeId};
use proptest::prelude::*;

const POOL: usize = 6;
const MAX_POOL: usize = 16;

#[derive(Debug, Clone)]
enum Op {
    Append(usize, usize),
    Add(usize, usize),
    Insert(usize, usize, usize),
    Replace(usize, usize, usize),
    Remove(usize),
    InsertNewAbove(usize),
    InsertAbove(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    let n = 0..MAX_POOL;
    prop_oneof![
        (n.clone(), n.clone()).prop_map(|(a, b)| Op::Append(a, b)),
        (n.clone(), n.clone()).prop_map(|(a, b)| Op::Add(a, b)),
        (n.clone(), n.clone(), 0..4usize).prop_map(|(a, b, i)| Op::Insert(a, b, i)),
        (n.clone(), 0..4usize, n.clone()).prop_map(|(a, i, b)| Op::Replace(a, i, b)),
        n.clone().prop_map(Op::Remove),
        n.clone().prop_map(Op::InsertNewAbove),
        (n.clone(), n).prop_map(|(a, b)| Op::InsertAbove(a, b)),
    ]
}

/// Parent and children of every pool node, by id.
type Snapshot = Vec<(Option<TreeId<u32>>, Vec<TreeId<u32>>)>;

fn snapshot(pool: &[Tree<u32>]) -> Snapshot {
    pool.iter()
        .map(|node| {
            (
                node.parent().map(|p| p.id()),
                node.children().iter().map(Tree::id).collect(),
            )
        })
        .collect()
}

fn assert_consistent(pool: &[Tree<u32>]) {
    for node in pool {
        node.root().validate().unwrap();
        if let Some(parent) = node.parent() {
            let siblings: Vec<_> = parent.children().iter().map(Tree::id).collect();
            assert_eq!(siblings.iter().filter(|&&id| id == node.id()).count(), 1);
            assert!(!node.contains(&parent));
        }
        for child in node.children() {
            assert!(child.parent().unwrap().ptr_eq(node));
        }
    }
}

fn apply(pool: &mut Vec<Tree<u32>>, op: &Op) -> bool {
    let len = pool.len();
    let at = |i: usize| pool[i % len].clone();
    match *op {
        Op::Append(a, b) => at(a).append_child(&at(b)).is_ok(),
        Op::Add(a, b) => at(a).add(&at(b)).is_ok(),
        Op::Insert(a, b, i) => at(a).insert_child(&at(b), i).is_ok(),
        Op::Replace(a, i, b) => at(a).replace_child(i, &at(b)).is_ok(),
        Op::Remove(a) => {
            at(a).remove_from_parent();
            true
        }
        Op::InsertNewAbove(a) => match at(a).insert_new_tree_above() {
            Ok(node) => {
                if pool.len() < MAX_POOL {
                    node.set_content(Some(pool.len() as u32));
                    pool.push(node);
                }
                true
            }
            Err(_) => false,
        },
        Op::InsertAbove(a, b) => at(b).insert_above(&at(a)).is_ok(),
    }
}

proptest! {
    #[test]
    fn back_links_stay_consistent(ops in prop::collection::vec(op(), 1..60)) {
        let mut pool: Vec<Tree<u32>> = (0..POOL as u32).map(Tree::with_content).collect();

        for op in &ops {
            let before = snapshot(&pool);
            let succeeded = apply(&mut pool, op);
            if !succeeded {
                prop_assert_eq!(snapshot(&pool), before, "failed {:?} changed the graph", op);
            }
            assert_consistent(&pool);
        }
    }

    #[test]
    fn ancestors_cannot_become_descendants(
        links in prop::collection::vec((0..POOL, 0..POOL), 1..20)
    ) {
        let pool: Vec<Tree<u32>> = (0..POOL as u32).map(Tree::with_content).collect();
        for (a, b) in links {
            let _ = pool[a].append_child(&pool[b]);
        }

        for a in &pool {
            for b in &pool {
                if a.ptr_eq(b) || !a.contains(b) {
                    continue;
                }
                let before = snapshot(&pool);
                let err = b.append_child(a).unwrap_err();
                prop_assert!(err.is_cycle(), "unexpected {:?}", err);
                let err = b.insert_child(a, 0).unwrap_err();
                prop_assert!(err.is_cycle(), "unexpected {:?}", err);
                // Index validity must not mask the cycle, even for a leaf `b`.
                let err = b.insert_child(a, b.child_count() + 1).unwrap_err();
                prop_assert!(err.is_cycle(), "unexpected {:?}", err);
                let err = b.replace_child(0, a).unwrap_err();
                prop_assert!(err.is_cycle(), "unexpected {:?}", err);
                prop_assert_eq!(snapshot(&pool), before);
            }
        }
    }
}
