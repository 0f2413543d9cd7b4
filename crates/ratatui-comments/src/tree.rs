//! Pure updates over a comment forest.
//!
//! Every function borrows the forest and returns a new one; nothing is mutated in place. Nodes are
//! located by id. Ids are expected to be unique across the forest (see [`check_unique_ids`]); if
//! they are not, every node with a matching id is updated, at any depth.
//!
//! A target id that matches nothing is not an error for the plain functions: they return a forest
//! equal to the input. The `try_*` variants report [`CommentError::NotFound`] instead.
use std::collections::HashSet;

use crate::error::CommentError;
use crate::model::CommentId;
use crate::model::CommentNode;

/// Appends `reply` to the replies of every node whose id is `parent_id`.
pub fn insert_reply(
    forest: &[CommentNode],
    parent_id: &CommentId,
    reply: CommentNode,
) -> Vec<CommentNode> {
    let (out, matched) = insert_reply_counted(forest, parent_id, &reply);
    if matched == 0 {
        log::debug!("insert_reply: no comment with id {parent_id}; forest unchanged");
    }
    out
}

/// Adds one like to every node whose id is `target_id`.
pub fn increment_like(forest: &[CommentNode], target_id: &CommentId) -> Vec<CommentNode> {
    let (out, matched) = increment_like_counted(forest, target_id);
    if matched == 0 {
        log::debug!("increment_like: no comment with id {target_id}; forest unchanged");
    }
    out
}

/// Drops every node whose id is `target_id`, together with its whole subtree.
pub fn remove_node(forest: &[CommentNode], target_id: &CommentId) -> Vec<CommentNode> {
    let (out, matched) = remove_node_counted(forest, target_id);
    if matched == 0 {
        log::debug!("remove_node: no comment with id {target_id}; forest unchanged");
    }
    out
}

pub fn try_insert_reply(
    forest: &[CommentNode],
    parent_id: &CommentId,
    reply: CommentNode,
) -> Result<Vec<CommentNode>, CommentError> {
    match insert_reply_counted(forest, parent_id, &reply) {
        (_, 0) => Err(CommentError::NotFound(parent_id.clone())),
        (out, _) => Ok(out),
    }
}

pub fn try_increment_like(
    forest: &[CommentNode],
    target_id: &CommentId,
) -> Result<Vec<CommentNode>, CommentError> {
    match increment_like_counted(forest, target_id) {
        (_, 0) => Err(CommentError::NotFound(target_id.clone())),
        (out, _) => Ok(out),
    }
}

pub fn try_remove_node(
    forest: &[CommentNode],
    target_id: &CommentId,
) -> Result<Vec<CommentNode>, CommentError> {
    match remove_node_counted(forest, target_id) {
        (_, 0) => Err(CommentError::NotFound(target_id.clone())),
        (out, _) => Ok(out),
    }
}

/// Number of comments in the forest, replies included. Walks every node on each call.
pub fn total_count(forest: &[CommentNode]) -> usize {
    forest
        .iter()
        .map(|node| 1 + total_count(&node.replies))
        .sum()
}

/// First node with `id` in pre-order (a node before its replies, replies before later siblings).
pub fn find<'a>(forest: &'a [CommentNode], id: &CommentId) -> Option<&'a CommentNode> {
    for node in forest {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.replies, id) {
            return Some(found);
        }
    }
    None
}

pub fn contains(forest: &[CommentNode], id: &CommentId) -> bool {
    find(forest, id).is_some()
}

/// Nesting depth of the first node with `id`; roots are at depth 0.
pub fn depth_of(forest: &[CommentNode], id: &CommentId) -> Option<usize> {
    fn walk(nodes: &[CommentNode], id: &CommentId, depth: usize) -> Option<usize> {
        for node in nodes {
            if &node.id == id {
                return Some(depth);
            }
            if let Some(d) = walk(&node.replies, id, depth + 1) {
                return Some(d);
            }
        }
        None
    }
    walk(forest, id, 0)
}

/// Fails with the first id that occurs twice (pre-order).
pub fn check_unique_ids(forest: &[CommentNode]) -> Result<(), CommentError> {
    fn walk<'a>(nodes: &'a [CommentNode], seen: &mut HashSet<&'a CommentId>) -> Result<(), CommentError> {
        for node in nodes {
            if !seen.insert(&node.id) {
                return Err(CommentError::DuplicateId(node.id.clone()));
            }
            walk(&node.replies, seen)?;
        }
        Ok(())
    }
    walk(forest, &mut HashSet::new())
}

fn insert_reply_counted(
    forest: &[CommentNode],
    parent_id: &CommentId,
    reply: &CommentNode,
) -> (Vec<CommentNode>, usize) {
    let mut matched = 0;
    let out = forest
        .iter()
        .map(|node| {
            let (mut replies, nested) = insert_reply_counted(&node.replies, parent_id, reply);
            matched += nested;
            if &node.id == parent_id {
                replies.push(reply.clone());
                matched += 1;
            }
            CommentNode {
                replies,
                ..shallow(node)
            }
        })
        .collect();
    (out, matched)
}

fn increment_like_counted(
    forest: &[CommentNode],
    target_id: &CommentId,
) -> (Vec<CommentNode>, usize) {
    let mut matched = 0;
    let out = forest
        .iter()
        .map(|node| {
            let (replies, nested) = increment_like_counted(&node.replies, target_id);
            matched += nested;
            let mut likes = node.likes;
            if &node.id == target_id {
                likes = likes.saturating_add(1);
                matched += 1;
            }
            CommentNode {
                likes,
                replies,
                ..shallow(node)
            }
        })
        .collect();
    (out, matched)
}

fn remove_node_counted(
    forest: &[CommentNode],
    target_id: &CommentId,
) -> (Vec<CommentNode>, usize) {
    let mut matched = 0;
    let out = forest
        .iter()
        .filter_map(|node| {
            if &node.id == target_id {
                matched += 1;
                return None;
            }
            let (replies, nested) = remove_node_counted(&node.replies, target_id);
            matched += nested;
            Some(CommentNode {
                replies,
                ..shallow(node)
            })
        })
        .collect();
    (out, matched)
}

/// Copy of `node` without its replies; callers rebuild the replies themselves.
fn shallow(node: &CommentNode) -> CommentNode {
    CommentNode {
        id: node.id.clone(),
        author: node.author.clone(),
        avatar: node.avatar.clone(),
        content: node.content.clone(),
        created_at: node.created_at,
        likes: node.likes,
        blocked: node.blocked,
        replies: Vec::new(),
    }
}
