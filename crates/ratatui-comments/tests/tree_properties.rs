//! Properties of the pure tree updates over arbitrary forests with unique ids.

use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use proptest::prelude::*;
use proptest::sample::Index;
use ratatui_comments::model::CommentId;
use ratatui_comments::model::CommentNode;
use ratatui_comments::tree;

fn ts() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn shape(likes: u64, blocked: bool, replies: Vec<CommentNode>) -> CommentNode {
    let mut node = CommentNode::new(0, "Someone", "text", ts())
        .with_likes(likes)
        .with_replies(replies);
    node.blocked = blocked;
    node
}

fn arb_node() -> impl Strategy<Value = CommentNode> {
    let leaf = (0u64..5, any::<bool>()).prop_map(|(likes, blocked)| shape(likes, blocked, vec![]));
    leaf.prop_recursive(4, 48, 4, |inner| {
        (0u64..5, any::<bool>(), prop::collection::vec(inner, 0..4))
            .prop_map(|(likes, blocked, replies)| shape(likes, blocked, replies))
    })
}

// Ids 1..=n in pre-order.
fn renumber(forest: &mut [CommentNode], next: &mut i64) {
    for node in forest {
        node.id = CommentId::Int(*next);
        *next += 1;
        renumber(&mut node.replies, next);
    }
}

fn arb_forest() -> impl Strategy<Value = Vec<CommentNode>> {
    prop::collection::vec(arb_node(), 0..5).prop_map(|mut forest| {
        renumber(&mut forest, &mut 1);
        forest
    })
}

fn ids(forest: &[CommentNode], out: &mut Vec<CommentId>) {
    for node in forest {
        out.push(node.id.clone());
        ids(&node.replies, out);
    }
}

fn all_ids(forest: &[CommentNode]) -> Vec<CommentId> {
    let mut out = Vec::new();
    ids(forest, &mut out);
    out
}

fn recount(forest: &[CommentNode]) -> usize {
    forest.iter().map(|n| 1 + recount(&n.replies)).sum()
}

proptest! {
    #[test]
    fn generated_forests_have_unique_ids(forest in arb_forest()) {
        prop_assert!(tree::check_unique_ids(&forest).is_ok());
    }

    #[test]
    fn total_count_matches_recursive_sum(forest in arb_forest()) {
        prop_assert_eq!(tree::total_count(&forest), recount(&forest));
        prop_assert_eq!(tree::total_count(&forest), all_ids(&forest).len());
    }

    #[test]
    fn insert_appends_one_reply_to_parent_only(forest in arb_forest(), pick in any::<Index>()) {
        let existing = all_ids(&forest);
        prop_assume!(!existing.is_empty());
        let parent = pick.get(&existing).clone();
        let reply = CommentNode::new(10_000, "New", "reply", ts());

        let out = tree::insert_reply(&forest, &parent, reply.clone());
        prop_assert_eq!(tree::total_count(&out), tree::total_count(&forest) + 1);
        let updated = tree::find(&out, &parent).unwrap();
        prop_assert_eq!(updated.replies.last(), Some(&reply));

        for id in &existing {
            if id == &parent {
                continue;
            }
            let before = tree::find(&forest, id).unwrap();
            let after = tree::find(&out, id).unwrap();
            let before_ids: Vec<_> = before.replies.iter().map(|r| &r.id).collect();
            let after_ids: Vec<_> = after.replies.iter().map(|r| &r.id).collect();
            prop_assert_eq!(before_ids, after_ids);
        }
    }

    #[test]
    fn like_touches_exactly_one_node(forest in arb_forest(), pick in any::<Index>()) {
        let existing = all_ids(&forest);
        prop_assume!(!existing.is_empty());
        let target = pick.get(&existing).clone();

        let out = tree::increment_like(&forest, &target);
        for id in &existing {
            let before = tree::find(&forest, id).unwrap().likes;
            let after = tree::find(&out, id).unwrap().likes;
            let expected = if id == &target { before + 1 } else { before };
            prop_assert_eq!(after, expected);
        }
    }

    #[test]
    fn remove_drops_node_and_subtree(forest in arb_forest(), pick in any::<Index>()) {
        let existing = all_ids(&forest);
        prop_assume!(!existing.is_empty());
        let target = pick.get(&existing).clone();
        let subtree = all_ids(std::slice::from_ref(tree::find(&forest, &target).unwrap()));

        let out = tree::remove_node(&forest, &target);
        prop_assert_eq!(tree::total_count(&out), tree::total_count(&forest) - subtree.len());
        for id in &subtree {
            prop_assert!(!tree::contains(&out, id));
        }
    }

    #[test]
    fn absent_id_leaves_forest_unchanged(forest in arb_forest()) {
        let missing = CommentId::Int(-1);
        let reply = CommentNode::new(10_000, "New", "reply", ts());
        prop_assert_eq!(&tree::insert_reply(&forest, &missing, reply), &forest);
        prop_assert_eq!(&tree::increment_like(&forest, &missing), &forest);
        prop_assert_eq!(&tree::remove_node(&forest, &missing), &forest);
        prop_assert!(tree::try_increment_like(&forest, &missing).is_err());
    }
}
