use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cubic_graph_enumeration::crosscheck::count_classes;
use cubic_graph_enumeration::{DEFAULT_MAX_FACES, PruningPolicy, SearchConfig, enumerate};

#[derive(Parser, Debug)]
#[command(name = "cubic-graph-enumeration")]
#[command(about = "Count cubic planar graphs with 1 triangle, 2 squares, 5 pentagons and any hexagons", long_about = None)]
struct Args {
  /// Largest total face count to search
  #[arg(short = 'f', long, default_value_t = DEFAULT_MAX_FACES)]
  max_faces: usize,

  /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Print one line per isomorphism class found
  #[arg(long)]
  list: bool,

  /// Print the report as JSON
  #[arg(long)]
  json: bool,

  /// Deduplicate every candidate again without the canonical oracle and compare counts
  #[arg(long)]
  cross_check: bool,

  /// Stop descending once the stack is this close to the face bound
  #[arg(long, default_value_t = PruningPolicy::default().depth_margin)]
  depth_margin: usize,

  /// Keep exploring maps with a single open face left
  #[arg(long)]
  keep_single_open: bool,

  /// Skip mirror orderings of the faces beside the triangle
  #[arg(long)]
  flank_symmetry: bool,

  /// Hide progress bars
  #[arg(long)]
  no_progress: bool,
}

fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
  let args = Args::parse();
  init_tracing(args.verbose);

  let config = SearchConfig {
    max_faces: args.max_faces,
    pruning: PruningPolicy {
      depth_margin: args.depth_margin,
      single_open_face: !args.keep_single_open,
      flank_symmetry: args.flank_symmetry,
    },
    keep_solutions: args.list || args.json,
    keep_candidates: args.cross_check,
    progress: !args.no_progress,
  };
  let report = enumerate(config).context("invalid search configuration")?;

  if args.json {
    let text = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{text}");
  } else {
    if args.list {
      for line in report.listing() {
        println!("{line}");
      }
    }
    println!("{report}");
  }

  if args.cross_check {
    let independent = count_classes(&report.candidates, !args.no_progress);
    if independent != report.classes {
      bail!(
        "cross-check disagrees: {} classes by canonical form, {} by pairwise isomorphism",
        report.classes,
        independent
      );
    }
    eprintln!("cross-check agrees: {independent} classes from {} candidates", report.candidates.len());
  }
  Ok(())
}
