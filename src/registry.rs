use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, warn};

use crate::canon::{CanonicalForm, CanonicalOracle};
use crate::report::Solution;
use crate::state::PlanarMap;

/// What happened to a submitted map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
  /// First member of a new class, numbered from 1.
  New(usize),
  Duplicate,
  /// The oracle refused the graph; it is not counted.
  Failed,
}

/// Canonical forms seen so far, with the per-hexagon tally of new classes.
#[derive(Debug, Default)]
pub struct Registry {
  seen: HashSet<CanonicalForm>,
  by_hexagons: BTreeMap<usize, usize>,
  solutions: Option<Vec<Solution>>,
  duplicates: usize,
  failures: usize,
}

impl Registry {
  pub fn new(keep_solutions: bool) -> Self {
    Self { solutions: keep_solutions.then(Vec::new), ..Self::default() }
  }

  /// Submit a completed map.
  pub fn submit<O: CanonicalOracle>(&mut self, oracle: &O, map: &PlanarMap) -> Verdict {
    self.record(oracle, map.tally().hexagons, map.vertex_count(), map.edge_list(), || map.summary())
  }

  /// Submit a graph given as 1-based edges. `summary` is only built for new classes.
  pub fn record<O: CanonicalOracle>(
    &mut self,
    oracle: &O,
    hexagons: usize,
    vertex_count: usize,
    edges: Vec<(usize, usize)>,
    summary: impl FnOnce() -> String,
  ) -> Verdict {
    let canonical = match oracle.canonical_form(vertex_count, &edges) {
      Ok(c) => c,
      Err(e) => {
        warn!("canonical labeling failed on {vertex_count} vertices: {e}");
        self.failures += 1;
        return Verdict::Failed;
      }
    };
    if !self.seen.insert(canonical.form) {
      self.duplicates += 1;
      debug!("seen before ({hexagons} hexagons, {vertex_count} vertices)");
      return Verdict::Duplicate;
    }

    *self.by_hexagons.entry(hexagons).or_default() += 1;
    let index = self.seen.len();
    if let Some(solutions) = self.solutions.as_mut() {
      let summary = summary();
      info!("{index}. {summary}");
      solutions.push(Solution {
        index,
        hexagons,
        vertices: vertex_count,
        automorphisms: canonical.automorphisms,
        edges,
        summary,
      });
    } else {
      info!("class {index}: {hexagons} hexagons, {vertex_count} vertices");
    }
    Verdict::New(index)
  }

  pub fn classes(&self) -> usize {
    self.seen.len()
  }

  pub fn duplicates(&self) -> usize {
    self.duplicates
  }

  pub fn failures(&self) -> usize {
    self.failures
  }

  pub fn into_parts(self) -> (BTreeMap<usize, usize>, Vec<Solution>) {
    (self.by_hexagons, self.solutions.unwrap_or_default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::canon::Refinement;

  const CUBE: [(usize, usize); 12] = [
    (1, 2), (2, 3), (3, 4), (4, 1), (5, 6), (6, 7), (7, 8), (8, 5), (1, 5), (2, 6), (3, 7), (4, 8),
  ];
  const PRISM: [(usize, usize); 9] =
    [(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4), (1, 4), (2, 5), (3, 6)];

  #[test]
  fn classes_are_counted_once() {
    let mut registry = Registry::new(true);
    let flipped: Vec<_> = CUBE.iter().map(|&(a, b)| (9 - b, 9 - a)).collect();

    assert_eq!(registry.record(&Refinement, 0, 8, CUBE.to_vec(), || "cube".into()), Verdict::New(1));
    assert_eq!(registry.record(&Refinement, 0, 8, flipped, || unreachable!()), Verdict::Duplicate);
    assert_eq!(registry.record(&Refinement, 1, 6, PRISM.to_vec(), || "prism".into()), Verdict::New(2));

    assert_eq!(registry.classes(), 2);
    assert_eq!(registry.duplicates(), 1);
    let (tally, solutions) = registry.into_parts();
    assert_eq!(tally, BTreeMap::from([(0, 1), (1, 1)]));
    assert_eq!(solutions.len(), 2);
    assert_eq!(solutions[0].automorphisms, 48);
    assert_eq!(solutions[1].summary, "prism");
  }

  #[test]
  fn oracle_failure_is_not_a_class() {
    let mut registry = Registry::new(false);
    let verdict = registry.record(&Refinement, 0, 2, vec![(1, 3)], String::new);
    assert_eq!(verdict, Verdict::Failed);
    assert_eq!(registry.failures(), 1);
    assert_eq!(registry.classes(), 0);
    assert!(registry.into_parts().1.is_empty());
  }
}
