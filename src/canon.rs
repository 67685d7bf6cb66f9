//! Canonical labeling of simple graphs.
//!
//! The search only talks to `CanonicalOracle`. `Refinement` is the oracle the
//! crate ships: colour refinement plus individualization, exploring the whole
//! tree and keeping the smallest relabelled edge list. The maps enumerated
//! here have one triangle, so their symmetry groups and trees stay small.

use itertools::Itertools;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::OracleError;

/// Encoding shared by exactly the graphs isomorphic to one another.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalForm(Vec<u32>);

impl CanonicalForm {
  pub fn as_slice(&self) -> &[u32] {
    &self.0
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canonical {
  pub form: CanonicalForm,
  /// Order of the automorphism group.
  pub automorphisms: u64,
}

pub trait CanonicalOracle {
  /// `edges` are unordered pairs of 1-based vertex ids in `1..=vertex_count`.
  fn canonical_form(
    &self,
    vertex_count: usize,
    edges: &[(usize, usize)],
  ) -> Result<Canonical, OracleError>;
}

/// Individualization-refinement labeler.
#[derive(Clone, Copy, Debug, Default)]
pub struct Refinement;

impl CanonicalOracle for Refinement {
  fn canonical_form(
    &self,
    vertex_count: usize,
    edges: &[(usize, usize)],
  ) -> Result<Canonical, OracleError> {
    let graph = build_graph(vertex_count, edges)?;
    let adjacency: Vec<Vec<usize>> = graph
      .node_indices()
      .map(|v| graph.neighbors(v).map(|u| u.index()).collect())
      .collect();

    let mut leaves = Leaves { adjacency: &adjacency, best: None, hits: 0 };
    leaves.descend(vec![0; vertex_count]);
    let form = leaves.best.map(CanonicalForm).ok_or(OracleError::Empty)?;
    Ok(Canonical { form, automorphisms: leaves.hits })
  }
}

/// Checked conversion of a 1-based edge list into a petgraph graph.
pub fn build_graph(
  vertex_count: usize,
  edges: &[(usize, usize)],
) -> Result<UnGraph<(), ()>, OracleError> {
  if vertex_count == 0 {
    return Err(OracleError::Empty);
  }
  let mut graph = UnGraph::<(), ()>::with_capacity(vertex_count, edges.len());
  for _ in 0..vertex_count {
    graph.add_node(());
  }
  for &(a, b) in edges {
    for v in [a, b] {
      if v == 0 || v > vertex_count {
        return Err(OracleError::VertexOutOfRange { vertex: v, count: vertex_count });
      }
    }
    if a == b {
      return Err(OracleError::SelfLoop { vertex: a });
    }
    let (u, v) = (NodeIndex::new(a - 1), NodeIndex::new(b - 1));
    if graph.find_edge(u, v).is_some() {
      return Err(OracleError::DuplicateEdge { a, b });
    }
    graph.add_edge(u, v, ());
  }
  Ok(graph)
}

/// Replace each value by its rank among the distinct values.
fn rank<T: Ord>(keys: &[T]) -> Vec<usize> {
  let distinct: Vec<&T> = keys.iter().sorted().dedup().collect();
  keys
    .iter()
    .map(|k| match distinct.binary_search(&k) {
      Ok(i) | Err(i) => i,
    })
    .collect()
}

/// Split colour classes by the colours of their neighbours until stable.
fn refine(adjacency: &[Vec<usize>], colors: &mut Vec<usize>) {
  let mut classes = colors.iter().unique().count();
  loop {
    let signatures: Vec<(usize, Vec<usize>)> = (0..adjacency.len())
      .map(|v| {
        let around = adjacency[v].iter().map(|&u| colors[u]).sorted().collect();
        (colors[v], around)
      })
      .collect();
    *colors = rank(&signatures);
    let next = colors.iter().unique().count();
    if next == classes {
      return;
    }
    classes = next;
  }
}

struct Leaves<'g> {
  adjacency: &'g [Vec<usize>],
  best: Option<Vec<u32>>,
  hits: u64,
}

impl Leaves<'_> {
  fn descend(&mut self, mut colors: Vec<usize>) {
    refine(self.adjacency, &mut colors);

    let n = colors.len();
    let mut sizes = vec![0usize; n];
    for &c in &colors {
      sizes[c] += 1;
    }
    let Some(target) = (0..n).find(|&c| sizes[c] > 1) else {
      self.leaf(&colors);
      return;
    };

    for v in (0..n).filter(|&v| colors[v] == target) {
      let child = colors
        .iter()
        .enumerate()
        .map(|(u, &c)| if u == v { 2 * c } else { 2 * c + 1 })
        .collect();
      self.descend(child);
    }
  }

  /// `colors` is a permutation here: vertex `v` gets label `colors[v]`.
  fn leaf(&mut self, colors: &[usize]) {
    let mut code = vec![colors.len() as u32];
    let relabelled = self
      .adjacency
      .iter()
      .enumerate()
      .flat_map(|(v, around)| around.iter().map(move |&u| (v, u)))
      .filter(|(v, u)| v < u)
      .map(|(v, u)| {
        let (a, b) = (colors[v] as u32, colors[u] as u32);
        (a.min(b), a.max(b))
      })
      .sorted();
    for (a, b) in relabelled {
      code.extend([a, b]);
    }

    match self.best.as_ref().map(|best| code.cmp(best)) {
      None | Some(std::cmp::Ordering::Less) => {
        self.best = Some(code);
        self.hits = 1;
      }
      Some(std::cmp::Ordering::Equal) => self.hits += 1,
      Some(std::cmp::Ordering::Greater) => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form(n: usize, edges: &[(usize, usize)]) -> Canonical {
    Refinement.canonical_form(n, edges).unwrap()
  }

  fn relabel(edges: &[(usize, usize)], perm: &[usize]) -> Vec<(usize, usize)> {
    edges.iter().map(|&(a, b)| (perm[a - 1], perm[b - 1])).rev().collect()
  }

  const K4: [(usize, usize); 6] = [(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)];
  const CUBE: [(usize, usize); 12] = [
    (1, 2), (2, 3), (3, 4), (4, 1), (5, 6), (6, 7), (7, 8), (8, 5), (1, 5), (2, 6), (3, 7), (4, 8),
  ];
  // Triangular prism and K3,3: both cubic on six vertices.
  const PRISM: [(usize, usize); 9] =
    [(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4), (1, 4), (2, 5), (3, 6)];
  const K33: [(usize, usize); 9] =
    [(1, 4), (1, 5), (1, 6), (2, 4), (2, 5), (2, 6), (3, 4), (3, 5), (3, 6)];

  #[test]
  fn relabelled_graphs_agree() {
    let perm = [6, 3, 8, 1, 5, 2, 7, 4];
    assert_eq!(form(8, &CUBE).form, form(8, &relabel(&CUBE, &perm)).form);
    let perm = [4, 6, 1, 5, 2, 3];
    assert_eq!(form(6, &PRISM).form, form(6, &relabel(&PRISM, &perm)).form);
  }

  #[test]
  fn same_degrees_different_graphs() {
    assert_ne!(form(6, &PRISM).form, form(6, &K33).form);
  }

  #[test]
  fn automorphism_counts() {
    assert_eq!(form(4, &K4).automorphisms, 24);
    assert_eq!(form(6, &K33).automorphisms, 72);
    assert_eq!(form(8, &CUBE).automorphisms, 48);
    assert_eq!(form(6, &PRISM).automorphisms, 12);
  }

  #[test]
  fn bad_input_is_reported() {
    assert_eq!(Refinement.canonical_form(0, &[]), Err(OracleError::Empty));
    assert_eq!(
      Refinement.canonical_form(3, &[(1, 4)]),
      Err(OracleError::VertexOutOfRange { vertex: 4, count: 3 })
    );
    assert_eq!(Refinement.canonical_form(3, &[(2, 2)]), Err(OracleError::SelfLoop { vertex: 2 }));
    assert_eq!(
      Refinement.canonical_form(3, &[(1, 2), (2, 1)]),
      Err(OracleError::DuplicateEdge { a: 2, b: 1 })
    );
  }

  #[test]
  fn ranks_are_dense() {
    assert_eq!(rank(&[30, 10, 30, 20]), vec![2, 0, 2, 1]);
  }
}
