//! Connection graph: Delaunay candidates, Prim MST, and extra loop edges.

use std::collections::HashSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::rng::DungeonRng;
use crate::room::Room;
use crate::triangulate::{self, Point};

/// An undirected connection between two rooms, identified by room index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub len: f32,
}

impl Edge {
    pub fn new(a: usize, b: usize, len: f32) -> Self {
        Self { a, b, len }
    }

    /// Direction-independent identity.
    pub fn key(&self) -> (usize, usize) {
        (self.a.min(self.b), self.a.max(self.b))
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

fn edge_between(rooms: &[Room], a: usize, b: usize) -> Edge {
    Edge::new(a, b, rooms[a].center_distance(&rooms[b]))
}

/// Build the candidate edge set from the Delaunay triangulation of the
/// room centers, deduplicated across shared triangle edges.
///
/// Falls back to the complete graph when triangulation is impossible
/// (fewer than 3 rooms, or all centers collinear).
pub fn candidate_edges(rooms: &[Room]) -> Vec<Edge> {
    if rooms.len() < 2 {
        return Vec::new();
    }

    let points: Vec<Point> = rooms
        .iter()
        .map(|r| {
            let (x, y) = r.center();
            Point::new(x, y)
        })
        .collect();

    if let Some(triangles) = triangulate::triangulate(&points) {
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut edges = Vec::new();
        for t in &triangles {
            for (a, b) in [(t.0, t.1), (t.1, t.2), (t.2, t.0)] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.push(edge_between(rooms, key.0, key.1));
                }
            }
        }
        debug!(
            "triangulation: {} triangles, {} candidate edges",
            triangles.len(),
            edges.len()
        );
        edges
    } else {
        debug!(
            "triangulation degenerate for {} rooms, using complete graph",
            rooms.len()
        );
        let mut edges = Vec::new();
        for a in 0..rooms.len() {
            for b in a + 1..rooms.len() {
                edges.push(edge_between(rooms, a, b));
            }
        }
        edges
    }
}

/// Compute a minimum spanning tree over the candidate edges with Prim's
/// algorithm, growing from room 0.
///
/// When the candidate set does not span all rooms, each stranded room is
/// attached to its nearest visited room by center distance so the result
/// is always a spanning tree of `rooms.len() - 1` edges.
pub fn prim_mst(candidates: &[Edge], rooms: &[Room]) -> Vec<Edge> {
    if rooms.len() < 2 {
        return Vec::new();
    }

    let mut visited = vec![false; rooms.len()];
    visited[0] = true;
    let mut tree: Vec<Edge> = Vec::with_capacity(rooms.len() - 1);

    while tree.len() < rooms.len() - 1 {
        let mut best: Option<Edge> = None;
        for e in candidates {
            if visited[e.a] == visited[e.b] {
                continue;
            }
            if best.is_none_or(|b| e.len < b.len) {
                best = Some(*e);
            }
        }

        let edge = match best {
            Some(e) => e,
            None => {
                // Candidate set does not reach the remaining rooms; stitch
                // the first stranded room to its nearest visited one.
                let orphan = match (0..rooms.len()).find(|&i| !visited[i]) {
                    Some(i) => i,
                    None => break,
                };
                let mut nearest = None;
                for (i, &v) in visited.iter().enumerate() {
                    if !v {
                        continue;
                    }
                    let d = rooms[orphan].center_distance(&rooms[i]);
                    if nearest.is_none_or(|(_, nd)| d < nd) {
                        nearest = Some((i, d));
                    }
                }
                let (near, d) = match nearest {
                    Some(n) => n,
                    None => break,
                };
                warn!(
                    "candidate graph does not span room {orphan}, forcing edge to room {near}"
                );
                Edge::new(near, orphan, d)
            }
        };

        visited[edge.a] = true;
        visited[edge.b] = true;
        tree.push(edge);
    }

    tree
}

/// Add extra loop edges on top of the spanning tree.
///
/// The budget is `floor(tree_len * ratio)` and is never exceeded. A share
/// of the budget goes to the longest unused candidates (long shortcuts
/// across the map), the remainder is drawn at random from what is left.
pub fn add_extra_edges(
    candidates: &[Edge],
    tree: &[Edge],
    ratio: f32,
    rng: &mut DungeonRng,
) -> Vec<Edge> {
    let mut graph: Vec<Edge> = tree.to_vec();
    let budget = (tree.len() as f32 * ratio).floor() as usize;
    if budget == 0 {
        return graph;
    }

    let in_tree: HashSet<(usize, usize)> = tree.iter().map(|e| e.key()).collect();
    let mut unused: Vec<Edge> = candidates
        .iter()
        .filter(|e| e.a != e.b && !in_tree.contains(&e.key()))
        .copied()
        .collect();

    // Longest first, so the head of the list holds the big shortcuts
    unused.sort_by(|x, y| y.len.partial_cmp(&x.len).unwrap_or(std::cmp::Ordering::Equal));

    let long_count = (unused.len().div_ceil(5)).max(2).min(budget / 2);
    let mut extras: Vec<Edge> = unused.drain(..long_count.min(unused.len())).collect();

    rng.shuffle(&mut unused);
    for e in unused {
        if extras.len() >= budget {
            break;
        }
        extras.push(e);
    }
    extras.truncate(budget);

    debug!("extra edges: {} of budget {}", extras.len(), budget);
    graph.extend(extras);
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rooms_at(centers: &[(usize, usize)]) -> Vec<Room> {
        // 2x2 rooms so center() lands exactly on x+1, y+1
        centers
            .iter()
            .map(|&(x, y)| Room::new(x, y, 2, 2))
            .collect()
    }

    #[test]
    fn test_candidate_edges_small_counts() {
        assert!(candidate_edges(&[]).is_empty());
        assert!(candidate_edges(&rooms_at(&[(1, 1)])).is_empty());

        let two = candidate_edges(&rooms_at(&[(1, 1), (10, 10)]));
        assert_eq!(two.len(), 1);
        assert_eq!(two[0].key(), (0, 1));
    }

    #[test]
    fn test_candidate_edges_collinear_fall_back_to_complete() {
        let rooms = rooms_at(&[(1, 5), (10, 5), (20, 5), (30, 5)]);
        let edges = candidate_edges(&rooms);
        assert_eq!(edges.len(), 6, "complete graph on 4 rooms");
    }

    #[test]
    fn test_candidate_edges_deduplicated() {
        let rooms = rooms_at(&[(1, 1), (20, 1), (20, 20), (1, 20), (10, 10)]);
        let edges = candidate_edges(&rooms);
        let keys: HashSet<(usize, usize)> = edges.iter().map(|e| e.key()).collect();
        assert_eq!(keys.len(), edges.len(), "no duplicate edges");
    }

    #[test]
    fn test_mst_edge_count_and_spanning() {
        let rooms = rooms_at(&[(1, 1), (20, 1), (20, 20), (1, 20), (10, 10), (30, 8)]);
        let candidates = candidate_edges(&rooms);
        let tree = prim_mst(&candidates, &rooms);
        assert_eq!(tree.len(), rooms.len() - 1);

        let mut uf = crate::union_find::UnionFind::new(rooms.len());
        for e in &tree {
            uf.union(e.a, e.b);
        }
        assert_eq!(uf.set_count(), 1, "tree must span all rooms");
    }

    #[test]
    fn test_mst_stitches_disconnected_candidates() {
        let rooms = rooms_at(&[(1, 1), (10, 1), (40, 40), (50, 40)]);
        // Only two disjoint candidate edges: MST must force the gap closed
        let candidates = vec![edge_between(&rooms, 0, 1), edge_between(&rooms, 2, 3)];
        let tree = prim_mst(&candidates, &rooms);
        assert_eq!(tree.len(), 3);
        let mut uf = crate::union_find::UnionFind::new(rooms.len());
        for e in &tree {
            uf.union(e.a, e.b);
        }
        assert_eq!(uf.set_count(), 1);
    }

    #[test]
    fn test_extra_edges_respect_budget() {
        let rooms = rooms_at(&[
            (1, 1),
            (20, 1),
            (20, 20),
            (1, 20),
            (10, 10),
            (30, 8),
            (30, 25),
            (5, 30),
        ]);
        let candidates = candidate_edges(&rooms);
        let tree = prim_mst(&candidates, &rooms);
        let mut rng = DungeonRng::new(5);

        for ratio in [0.0, 0.3, 0.5, 1.0, 5.0] {
            let graph = add_extra_edges(&candidates, &tree, ratio, &mut rng);
            let budget = (tree.len() as f32 * ratio).floor() as usize;
            assert!(
                graph.len() <= tree.len() + budget,
                "ratio {ratio} exceeded budget"
            );
            assert!(graph.len() >= tree.len());
        }
    }

    #[test]
    fn test_extra_edges_zero_ratio_is_tree() {
        let rooms = rooms_at(&[(1, 1), (20, 1), (20, 20), (1, 20)]);
        let candidates = candidate_edges(&rooms);
        let tree = prim_mst(&candidates, &rooms);
        let mut rng = DungeonRng::new(9);
        let graph = add_extra_edges(&candidates, &tree, 0.0, &mut rng);
        assert_eq!(graph.len(), tree.len());
    }

    #[test]
    fn test_extra_edges_no_duplicates() {
        let rooms = rooms_at(&[(1, 1), (20, 1), (20, 20), (1, 20), (10, 10), (32, 12)]);
        let candidates = candidate_edges(&rooms);
        let tree = prim_mst(&candidates, &rooms);
        let mut rng = DungeonRng::new(13);
        let graph = add_extra_edges(&candidates, &tree, 2.0, &mut rng);
        let keys: HashSet<(usize, usize)> = graph.iter().map(|e| e.key()).collect();
        assert_eq!(keys.len(), graph.len());
    }
}
