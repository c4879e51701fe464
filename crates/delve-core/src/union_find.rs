//! Disjoint-set forest for room connectivity bookkeeping.

/// Path-compressed, union-by-rank disjoint sets over `0..n`.
///
/// Rebuilt from scratch for each connectivity audit; both operations are
/// effectively O(1) amortized. `find` is iterative so deep parent chains
/// cannot blow the stack.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Create n singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Find the set representative, compressing the path walked.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Second pass: point everything on the walked path at the root
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing a and b. Returns false if already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    /// Check whether a and b are in the same set.
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of distinct sets.
    pub fn set_count(&mut self) -> usize {
        (0..self.parent.len())
            .filter(|&i| self.find(i) == i)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initially_disjoint() {
        let mut uf = UnionFind::new(5);
        assert!(!uf.connected(0, 1));
        assert_eq!(uf.set_count(), 5);
    }

    #[test]
    fn test_union_transitivity() {
        let mut uf = UnionFind::new(5);
        assert!(uf.union(0, 1));
        assert!(uf.union(1, 2));
        assert!(!uf.union(0, 2), "already merged");

        assert!(uf.connected(0, 2));
        assert!(!uf.connected(0, 3));
        assert_eq!(uf.set_count(), 3);
    }

    #[test]
    fn test_all_merged() {
        let mut uf = UnionFind::new(8);
        for i in 1..8 {
            uf.union(0, i);
        }
        assert_eq!(uf.set_count(), 1);
        for i in 0..8 {
            for j in 0..8 {
                assert!(uf.connected(i, j));
            }
        }
    }

    #[test]
    fn test_long_chain_compresses() {
        // Chain unions in the worst order, then find from the deep end
        let n = 10_000;
        let mut uf = UnionFind::new(n);
        for i in 0..n - 1 {
            uf.union(i, i + 1);
        }
        let root = uf.find(n - 1);
        assert_eq!(uf.find(0), root);
        assert_eq!(uf.set_count(), 1);
    }
}
