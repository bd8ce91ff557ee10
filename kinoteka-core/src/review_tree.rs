//! In-memory assembly of the nested review tree.
//!
//! Reviews are fetched flat (one row per review, aggregates precomputed) and
//! nested here: only parentless reviews appear at the top level, newest
//! first; replies hang off their parent recursively in the same shape. A
//! visited set guards traversal against crafted parent cycles, which the
//! storage layer does not rule out.

use std::collections::{HashMap, HashSet};

use crate::api_types::{ParentAuthor, ReviewNode};
use crate::types::ReviewRow;

pub fn build_tree(mut rows: Vec<ReviewRow>) -> Vec<ReviewNode> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let by_id: HashMap<i64, &ReviewRow> = rows.iter().map(|row| (row.id, row)).collect();
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut top_level = Vec::new();
    for row in &rows {
        match row.parent_id {
            Some(parent_id) => children.entry(parent_id).or_default().push(row.id),
            None => top_level.push(row.id),
        }
    }

    let mut visited = HashSet::new();
    top_level
        .into_iter()
        .filter_map(|id| build_node(id, &by_id, &children, &mut visited))
        .collect()
}

fn build_node(
    id: i64,
    by_id: &HashMap<i64, &ReviewRow>,
    children: &HashMap<i64, Vec<i64>>,
    visited: &mut HashSet<i64>,
) -> Option<ReviewNode> {
    if !visited.insert(id) {
        return None;
    }
    let row = by_id.get(&id)?;

    let parent = row
        .parent_id
        .and_then(|parent_id| by_id.get(&parent_id))
        .map(|parent| ParentAuthor {
            username: parent.username.clone(),
        });

    let nested = children
        .get(&id)
        .map(|ids| {
            ids.iter()
                .filter_map(|child| build_node(*child, by_id, children, visited))
                .collect()
        })
        .unwrap_or_default();

    Some(ReviewNode {
        id: row.id,
        username: row.username.clone(),
        content: row.content.clone(),
        likes: row.likes,
        is_like: row.is_like,
        unlikes: row.unlikes,
        is_unlike: row.is_unlike,
        spoiler: row.spoiler,
        is_reply: row.parent_id.is_some(),
        timestamp: row.created_at,
        parent,
        children: nested,
    })
}

/// Locate a review inside an assembled tree, at any depth.
pub fn find_node(nodes: &[ReviewNode], id: i64) -> Option<&ReviewNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}
