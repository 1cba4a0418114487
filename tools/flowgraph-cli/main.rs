use clap::{Parser, Subcommand};
use flowgraph::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Inspect and repair flow snapshots stored as `{nodes, edges}` JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log verbosity passed to env_logger (e.g. "debug")
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print node/edge counts and every invariant violation
    Inspect {
        /// Path to the snapshot JSON file
        path: PathBuf,
    },
    /// Run the branch repair pass and write the result
    Repair {
        /// Path to the snapshot JSON file
        path: PathBuf,
        /// Where to write the repaired snapshot (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the nodes and edges of the subtree rooted at a node
    Subtree {
        /// Path to the snapshot JSON file
        path: PathBuf,
        /// Root of the subtree
        node_id: String,
    },
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    match cli.command {
        Command::Inspect { path } => inspect(&load_snapshot(&path)),
        Command::Repair { path, output } => repair(&load_snapshot(&path), output),
        Command::Subtree { path, node_id } => subtree(&load_snapshot(&path), &node_id),
    }
}

fn load_snapshot(path: &Path) -> FlowGraph {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read snapshot '{}': {}", path.display(), e))
    });
    let definition = FlowDefinition::from_json(&json)
        .and_then(IntoFlowGraph::into_flow_graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load snapshot: {}", e)));
    FlowGraph::from_definition(definition)
}

fn inspect(graph: &FlowGraph) {
    println!("Nodes: {}", graph.node_count());
    for kind in [
        NodeKind::Trigger,
        NodeKind::Action,
        NodeKind::Condition,
        NodeKind::Placeholder,
        NodeKind::Ghost,
        NodeKind::End,
    ] {
        let count = graph.nodes_of_kind(kind).len();
        if count > 0 {
            println!("  {:<12} {}", kind, count);
        }
    }
    println!("Edges: {}", graph.edge_count());

    let violations = invariants::check(graph);
    if violations.is_empty() {
        println!("\nNo invariant violations.");
    } else {
        println!("\n{} invariant violation(s):", violations.len());
        for violation in violations {
            println!("  - {}", violation);
        }
    }
}

fn repair(graph: &FlowGraph, output: Option<PathBuf>) {
    let editor = FlowEditor::new();
    let (repaired, report) = editor.repair(graph);
    eprintln!("Repair: {}", report);

    let json = JsonExporter::pretty()
        .export(&repaired)
        .unwrap_or_else(|e| exit_with_error(&format!("Repaired snapshot is still invalid: {}", e)));
    match output {
        Some(path) => {
            fs::write(&path, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
            });
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
}

fn subtree(graph: &FlowGraph, node_id: &str) {
    let Some(subtree) = graph.subtree_of(node_id) else {
        exit_with_error(&format!("'{}' is missing or is the end node", node_id));
    };
    println!("Subtree of '{}' ({} nodes):", subtree.root, subtree.nodes.len());
    for node in &subtree.nodes {
        println!("  {} [{}]", node.id, node.kind);
    }
    for edge in &subtree.edges {
        match edge.kind.branch_side() {
            Some(side) => println!("  {} --{}--> {}", edge.source, side, edge.target),
            None => println!("  {} --> {}", edge.source, edge.target),
        }
    }
}

/// Helper function to print an error message to stderr and exit the process.
fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}
