//! Course conflict graph.
//!
//! Vertices are courses. Two courses are adjacent when some curriculum,
//! declared or derived from a shared teacher, contains both.

use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::error::{CutError, CutResult};
use crate::model::Instance;

/// Conflict graph over courses.
#[derive(Debug, Clone)]
pub struct ConflictGraph {
    /// Adjacency sets (sorted for each vertex).
    adj: Vec<BTreeSet<usize>>,

    /// Inserted edges. A pair shared by several curricula appears once per
    /// curriculum.
    edges: Vec<(usize, usize)>,
}

impl ConflictGraph {
    /// Create a graph with `n` isolated vertices.
    pub fn new(n: usize) -> Self {
        Self {
            adj: vec![BTreeSet::new(); n],
            edges: Vec::new(),
        }
    }

    /// Add an undirected edge, updating both endpoints.
    pub fn add_edge(&mut self, u: usize, v: usize) -> CutResult<()> {
        let n = self.adj.len();
        if u >= n || v >= n {
            return Err(CutError::InvalidInstance(format!(
                "Conflict between courses {} and {} but only {} courses",
                u, v, n
            )));
        }
        if u == v {
            return Err(CutError::InvalidInstance(format!(
                "Course {} conflicts with itself",
                u
            )));
        }
        self.edges.push((u, v));
        self.adj[u].insert(v);
        self.adj[v].insert(u);
        Ok(())
    }

    /// Connect every pair inside each group.
    pub fn from_groups<'a>(
        n: usize,
        groups: impl IntoIterator<Item = &'a [usize]>,
    ) -> CutResult<Self> {
        let mut g = Self::new(n);
        for group in groups {
            for (i, &u) in group.iter().enumerate() {
                for &v in &group[i + 1..] {
                    g.add_edge(u, v)?;
                }
            }
        }
        Ok(g)
    }

    /// Build the conflict graph of an instance from all its curricula.
    pub fn build(instance: &Instance) -> CutResult<Self> {
        let g = Self::from_groups(
            instance.course_count(),
            instance.curricula().iter().map(|u| u.courses.as_slice()),
        )?;
        log::info!(
            "Conflict graph with {} vertices and {} edges",
            g.n(),
            g.edges.len()
        );
        Ok(g)
    }

    /// Number of vertices.
    pub fn n(&self) -> usize {
        self.adj.len()
    }

    /// Inserted edges, duplicates included.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Number of adjacent pairs.
    pub fn distinct_edge_count(&self) -> usize {
        self.adj.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adj[v].len()
    }

    pub fn neighbors(&self, v: usize) -> &BTreeSet<usize> {
        &self.adj[v]
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        u != v && self.adj[u].contains(&v)
    }

    /// True when every pair of `vertices` is adjacent.
    pub fn is_clique(&self, vertices: &[usize]) -> bool {
        vertices
            .iter()
            .enumerate()
            .all(|(i, &u)| vertices[i + 1..].iter().all(|&v| self.has_edge(u, v)))
    }

    /// All triangles `u < v < w`.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let mut out = Vec::new();
        for u in 0..self.n() {
            for &v in self.adj[u].range(u + 1..) {
                for &w in self.adj[v].range(v + 1..) {
                    if self.adj[w].contains(&u) {
                        out.push([u, v, w]);
                    }
                }
            }
        }
        out
    }

    /// Write the graph in DIMACS ASCII edge format (1-based vertices).
    pub fn write_dimacs<W: Write>(&self, mut out: W, comment: &str) -> io::Result<()> {
        for line in comment.lines() {
            writeln!(out, "c {}", line)?;
        }
        writeln!(out, "p edge {} {}", self.n(), self.distinct_edge_count())?;
        for u in 0..self.n() {
            for &v in self.adj[u].range(u + 1..) {
                writeln!(out, "e {} {}", u + 1, v + 1)?;
            }
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Course, InstanceBuilder, Room};

    #[test]
    fn test_symmetric_adjacency() {
        let g = ConflictGraph::from_groups(5, [&[0, 1, 2][..], &[2, 3][..], &[1, 2][..]]).unwrap();

        for u in 0..g.n() {
            for v in 0..g.n() {
                assert_eq!(g.neighbors(u).contains(&v), g.neighbors(v).contains(&u));
            }
        }
        assert_eq!(g.degree(4), 0);
        assert!(g.has_edge(3, 2));
        assert!(!g.has_edge(0, 3));
    }

    #[test]
    fn test_duplicate_edges_tolerated() {
        let g = ConflictGraph::from_groups(3, [&[0, 1][..], &[1, 0][..]]).unwrap();
        assert_eq!(g.edges().len(), 2);
        assert_eq!(g.distinct_edge_count(), 1);
        assert_eq!(g.degree(0), 1);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(ConflictGraph::from_groups(2, [&[0, 2][..]]).is_err());
        let mut g = ConflictGraph::new(2);
        assert!(g.add_edge(1, 1).is_err());
    }

    #[test]
    fn test_build_includes_teacher_conflicts() {
        let inst = InstanceBuilder::new("g", 1, 3)
            .course(Course::new("a", "t0", 1, 1, 1))
            .course(Course::new("b", "t1", 1, 1, 1))
            .course(Course::new("c", "t0", 1, 1, 1))
            .room(Room::new("r", 1))
            .curriculum("u", vec![0, 1])
            .build()
            .unwrap();
        let g = ConflictGraph::build(&inst).unwrap();
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(0, 2));
        assert!(!g.has_edge(1, 2));
    }

    #[test]
    fn test_triangles() {
        // K4 on 0..4 plus a pendant edge
        let g = ConflictGraph::from_groups(5, [&[0, 1, 2, 3][..], &[3, 4][..]]).unwrap();
        let t = g.triangles();
        assert_eq!(t, vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]]);
        assert!(g.is_clique(&[0, 1, 2, 3]));
        assert!(!g.is_clique(&[2, 3, 4]));
    }

    #[test]
    fn test_dimacs() {
        let g = ConflictGraph::from_groups(3, [&[0, 1][..], &[1, 2][..], &[0, 1][..]]).unwrap();
        let mut buf = Vec::new();
        g.write_dimacs(&mut buf, "conflicts\nof test").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "c conflicts\nc of test\np edge 3 2\ne 1 2\ne 2 3\n");
    }
}
