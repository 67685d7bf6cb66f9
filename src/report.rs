//! What a finished search hands back, in text and JSON form.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::SearchConfig;
use crate::crosscheck::EdgeListGraph;
use crate::search::SearchStats;

/// First member found of one isomorphism class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Solution {
  pub index: usize,
  pub hexagons: usize,
  pub vertices: usize,
  pub automorphisms: u64,
  /// 1-based vertex pairs.
  pub edges: Vec<(usize, usize)>,
  pub summary: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
  pub max_faces: usize,
  /// Distinct isomorphism classes found.
  pub classes: usize,
  pub by_hexagons: BTreeMap<usize, usize>,
  pub stats: SearchStats,
  pub config: SearchConfig,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub solutions: Vec<Solution>,
  /// Every accepted map, duplicates included, when the config asked for them.
  #[serde(skip)]
  pub candidates: Vec<EdgeListGraph>,
}

impl Report {
  pub fn count(&self, hexagons: usize) -> usize {
    self.by_hexagons.get(&hexagons).copied().unwrap_or(0)
  }

  /// Hexagon counts a map within the face bound can have.
  pub fn hexagon_range(&self) -> std::ops::Range<usize> {
    1..self.max_faces.saturating_sub(7)
  }

  /// Column width for solution numbers.
  pub fn index_width(&self) -> usize {
    match self.max_faces {
      28.. => 5,
      21..=27 => 4,
      15..=20 => 3,
      _ => 2,
    }
  }

  /// One numbered line per kept solution.
  pub fn listing(&self) -> impl Iterator<Item = String> + '_ {
    let width = self.index_width();
    self.solutions.iter().map(move |s| format!("{:>width$}. {}", s.index, s.summary))
  }
}

impl fmt::Display for Report {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for h in self.hexagon_range() {
      writeln!(f, "{h}:  {}", self.count(h))?;
    }
    write!(f, "Total {} solutions found, with up to {} faces.", self.classes, self.max_faces)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn report(max_faces: usize, by_hexagons: &[(usize, usize)]) -> Report {
    let by_hexagons: BTreeMap<usize, usize> = by_hexagons.iter().copied().collect();
    Report {
      max_faces,
      classes: by_hexagons.values().sum(),
      by_hexagons,
      stats: SearchStats::default(),
      config: SearchConfig::with_max_faces(max_faces),
      solutions: Vec::new(),
      candidates: Vec::new(),
    }
  }

  #[test]
  fn text_lists_every_hexagon_count() {
    let text = report(11, &[(2, 3)]).to_string();
    assert_eq!(text, "1:  0\n2:  3\n3:  0\nTotal 3 solutions found, with up to 11 faces.");
  }

  #[test]
  fn widths_follow_bound() {
    assert_eq!(report(14, &[]).index_width(), 2);
    assert_eq!(report(15, &[]).index_width(), 3);
    assert_eq!(report(27, &[]).index_width(), 4);
    assert_eq!(report(28, &[]).index_width(), 5);
  }

  #[test]
  fn listing_pads_indices() {
    let mut r = report(16, &[(1, 1)]);
    r.solutions.push(Solution {
      index: 7,
      hexagons: 1,
      vertices: 18,
      automorphisms: 1,
      edges: Vec::new(),
      summary: "tri: 4, 5, 6".into(),
    });
    assert_eq!(r.listing().collect::<Vec<_>>(), vec!["  7. tri: 4, 5, 6"]);
  }

  #[test]
  fn json_omits_candidates() {
    let json = serde_json::to_value(report(10, &[(1, 2)])).unwrap();
    assert_eq!(json["classes"], 2);
    assert_eq!(json["by_hexagons"]["1"], 2);
    assert!(json.get("candidates").is_none());
    assert!(json.get("solutions").is_none());
    assert_eq!(json["config"]["pruning"]["depth_margin"], 4);
  }
}
