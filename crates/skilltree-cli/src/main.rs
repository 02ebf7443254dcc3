//! CLI binary for skill tree precalculation: annotate, inspect, and validate exported trees.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skilltree_core::annotate::{self, Eligibility};
use skilltree_core::config::PrecalcConfig;
use skilltree_core::graph::SkillTree;
use skilltree_core::storage;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "skilltree-precalc",
    about = "Precalculate earliest mandatory nodes for skill tree exports"
)]
struct Cli {
    /// Tree directory containing the exported document (defaults to current directory)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Config file (defaults to <dir>/.skilltree/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate every eligible node with earliestMandatoryNode and save
    Annotate {
        /// Compute and report without writing the document back
        #[arg(long)]
        dry_run: bool,
    },

    /// Show tree statistics
    Info,

    /// Validate graph integrity (missing root, dangling edges, missing labels)
    Validate,

    /// Show how a single node resolves
    Show {
        /// Node ID
        node_id: String,
    },
}

fn get_tree_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.dir {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let tree_dir = get_tree_dir(&cli)?;
    let config = match &cli.config {
        Some(path) => PrecalcConfig::load_from(path)?,
        None => PrecalcConfig::load(&tree_dir)?,
    };

    match cli.command {
        Commands::Annotate { dry_run } => cmd_annotate(&tree_dir, &config, dry_run),
        Commands::Info => cmd_info(&tree_dir, &config),
        Commands::Validate => cmd_validate(&tree_dir, &config),
        Commands::Show { node_id } => cmd_show(&tree_dir, &config, &node_id),
    }
}

fn load_tree(tree_dir: &Path, config: &PrecalcConfig) -> Result<SkillTree> {
    if !storage::tree_exists(tree_dir, &config.storage) {
        anyhow::bail!(
            "No skill tree found at {}",
            storage::tree_file(tree_dir, &config.storage).display()
        );
    }
    storage::load(tree_dir, &config.storage)
}

fn cmd_annotate(tree_dir: &Path, config: &PrecalcConfig, dry_run: bool) -> Result<()> {
    let mut tree = load_tree(tree_dir, config)?;
    let travel = config.classifier.travel_stats();

    let report = annotate::annotate(&mut tree, &travel).with_context(|| {
        format!(
            "annotation of {} aborted; nothing was written",
            storage::tree_file(tree_dir, &config.storage).display()
        )
    })?;

    if dry_run {
        eprintln!("Dry run: document left unchanged.");
    } else {
        storage::save(tree_dir, &config.storage, &tree)?;
    }

    println!("Annotated: {}", report.annotated);
    println!("  from unique exit:   {}", report.from_exit);
    println!("  from frozen label:  {}", report.from_label);
    println!("Skipped: {}", report.skipped());
    println!("  root:               {}", report.skipped_root);
    println!("  ascendancy:         {}", report.skipped_ascendancy);
    println!("  no adjacency:       {}", report.skipped_no_adjacency);

    Ok(())
}

fn cmd_info(tree_dir: &Path, config: &PrecalcConfig) -> Result<()> {
    let tree = load_tree(tree_dir, config)?;

    println!("Tree: {}", tree.tree);
    println!(
        "Kind: {}",
        if tree.is_atlas() { "atlas" } else { "passive" }
    );
    println!("File: {}", storage::tree_file(tree_dir, &config.storage).display());
    println!();
    println!("Nodes: {}", tree.nodes.len());
    println!("Edges: {}", tree.edge_count());
    println!(
        "Ascendancy nodes: {}",
        tree.nodes.values().filter(|n| n.is_ascendancy()).count()
    );
    println!("Annotated: {}/{}", tree.annotated_count(), tree.nodes.len());
    println!(
        "Travel stats: {}",
        config.classifier.travel_stats().len()
    );

    Ok(())
}

fn cmd_validate(tree_dir: &Path, config: &PrecalcConfig) -> Result<()> {
    let tree = load_tree(tree_dir, config)?;
    let issues = tree.integrity_issues();

    for issue in &issues {
        tracing::warn!("{}", issue);
        println!("WARN: {}", issue);
    }

    if issues.is_empty() {
        eprintln!("Tree is valid. No integrity issues found.");
        eprintln!(
            "  {} nodes, {} edges",
            tree.nodes.len(),
            tree.edge_count()
        );
    } else {
        eprintln!("\nFound {} integrity issue(s).", issues.len());
    }

    Ok(())
}

fn cmd_show(tree_dir: &Path, config: &PrecalcConfig, node_id: &str) -> Result<()> {
    let tree = load_tree(tree_dir, config)?;
    let node = tree
        .get_node(node_id)
        .with_context(|| format!("no node with id {}", node_id))?;

    println!("Node: {}", node_id);
    match &node.skill {
        Some(label) => println!("Label: {}", label),
        None => println!("Label: (none)"),
    }
    println!("Stats: {}", node.stats().len());
    for stat in node.stats() {
        println!("  {}", stat);
    }
    println!("Neighbors: {}", node.neighbors().join(", "));
    if let Some(stored) = &node.earliest_mandatory_node {
        println!("Stored earliestMandatoryNode: {}", stored);
    }

    let eligibility = annotate::eligibility(&tree, node_id, node);
    if eligibility != Eligibility::Eligible {
        println!("Not annotated: {}", describe_skip(eligibility));
        return Ok(());
    }

    let travel = config.classifier.travel_stats();
    let resolution = annotate::resolve(&tree, node_id, &travel)?;
    println!();
    println!("Expanded: {} node(s)", resolution.expanded);
    println!("Split found: {}", resolution.split_found);
    if resolution.exits.is_empty() {
        println!("Exits: none");
    } else {
        println!("Exits: {}", resolution.exits.join(", "));
    }
    println!(
        "Resolves to: {} ({})",
        resolution.value,
        if resolution.from_exit() {
            "unique exit"
        } else {
            "last unbranched node"
        }
    );

    Ok(())
}

fn describe_skip(eligibility: Eligibility) -> &'static str {
    match eligibility {
        Eligibility::Eligible => "eligible",
        Eligibility::Root => "root node",
        Eligibility::Ascendancy => "ascendancy node on a passive tree",
        Eligibility::NoAdjacency => "no in/out edges",
    }
}
