//! Independent duplicate removal over plain petgraph graphs.
//!
//! Candidates are bucketed by a Weisfeiler-Lehman hash and compared pairwise
//! inside each bucket with `petgraph::algo::is_isomorphic`. Nothing here uses
//! the canonical oracle, so the two counts can be compared.

use std::collections::HashMap;

use indicatif::{ProgressBar, ProgressStyle};
use petgraph::Undirected;
use petgraph::algo::is_isomorphic;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::info;
use wl_isomorphism::invariant; // 1-WL hash

pub type PlainGraph = Graph<(), (), Undirected>;

/// The graph type `wl_isomorphism` hashes.
type WlGraph = petgraph06::Graph<(), (), petgraph06::Undirected>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeListGraph {
  pub node_count: usize,
  /// 1-based.
  pub edges: Vec<(usize, usize)>,
}

pub fn to_petgraph(g: &EdgeListGraph) -> PlainGraph {
  let mut graph = PlainGraph::new_undirected();
  let nodes: Vec<NodeIndex> = (0..g.node_count).map(|_| graph.add_node(())).collect();
  for &(u, v) in &g.edges {
    graph.add_edge(nodes[u - 1], nodes[v - 1], ());
  }
  graph
}

fn to_wl_graph(graph: &PlainGraph) -> WlGraph {
  let mut wl = WlGraph::new_undirected();
  let nodes: Vec<_> = graph.node_indices().map(|_| wl.add_node(())).collect();
  for e in graph.edge_references() {
    wl.add_edge(nodes[e.source().index()], nodes[e.target().index()], ());
  }
  wl
}

/// Isomorphism invariant used to bucket candidates.
pub fn wl_hash(graph: &PlainGraph) -> u64 {
  invariant(to_wl_graph(graph))
}

fn bar(len: u64, template: &str, hidden: bool) -> ProgressBar {
  if hidden {
    return ProgressBar::hidden();
  }
  let pb = ProgressBar::new(len);
  pb.set_style(
    ProgressStyle::with_template(template)
      .unwrap_or_else(|_| ProgressStyle::default_bar())
      .progress_chars("█▉▊▋▌▍▎▏  "),
  );
  pb
}

/// Keep one graph per isomorphism class, in first-seen order within buckets.
pub fn deduplicate_graphs(graphs: Vec<PlainGraph>, progress: bool) -> Vec<PlainGraph> {
  let mut buckets: HashMap<u64, Vec<PlainGraph>> = HashMap::new();
  let mut order = Vec::new();
  let pb_hash = bar(graphs.len() as u64, "[hash ] {pos}/{len} {elapsed_precise}", !progress);
  for g in graphs {
    let h = wl_hash(&g);
    let bucket = buckets.entry(h).or_default();
    if bucket.is_empty() {
      order.push(h);
    }
    bucket.push(g);
    pb_hash.inc(1);
  }
  pb_hash.finish_with_message("✔ Hashing complete");

  let pb_iso = bar(order.len() as u64, "[iso  ] {pos}/{len} {elapsed_precise}", !progress);
  let mut uniques = Vec::new();
  let mut total_before = 0;
  for h in order {
    let bucket = buckets.remove(&h).unwrap_or_default();
    total_before += bucket.len();
    let mut bucket_uniques: Vec<PlainGraph> = Vec::new();
    for g in bucket {
      if !bucket_uniques.iter().any(|h2| is_isomorphic(&g, h2)) {
        bucket_uniques.push(g);
      }
    }
    uniques.extend(bucket_uniques);
    pb_iso.inc(1);
  }
  pb_iso.finish_with_message("✔ Isomorphism filtering complete");

  info!(
    "deduplication complete: {} -> {} ({} removed)",
    total_before,
    uniques.len(),
    total_before - uniques.len()
  );
  uniques
}

/// Number of isomorphism classes among `candidates`.
pub fn count_classes(candidates: &[EdgeListGraph], progress: bool) -> usize {
  deduplicate_graphs(candidates.iter().map(to_petgraph).collect(), progress).len()
}
