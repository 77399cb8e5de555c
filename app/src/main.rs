//! Command-line front end: load a mix document and print what it generates.
//!
//! Usage:
//!   chunkmix `<document.json>` [--seed N] [--root ID] [--export] [--tree]
//!   chunkmix --negatives `<items>` [--shuffle] [--limit N] [--descriptors `<items>`] [--seed N]

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chunkmix::negatives::{self, NegativeVersions, NegativesOptions};
use chunkmix::{MixDocument, MixTree, NodeId, RandomSource, SeededRandom, export_mix_state, generate, generate_all};
use clap::Parser;
use log::{debug, info};

mod config;

#[derive(Parser, Debug)]
#[command(name = "chunkmix", version, about = "Generate text from nested chunk/mix documents")]
struct Cli {
    /// Path to the mix document (JSON). Falls back to `document` in config.toml.
    document: Option<PathBuf>,

    /// Seed for every random decision; the same seed reproduces the same output.
    #[arg(long)]
    seed: Option<u64>,

    /// Generate only the node with this id instead of every top-level mix.
    #[arg(long)]
    root: Option<u64>,

    /// Print the normalized document instead of generating.
    #[arg(long)]
    export: bool,

    /// Print the annotated output tree as JSON.
    #[arg(long)]
    tree: bool,

    /// Build good/bad term lists from a comma or semicolon separated list
    /// instead of loading a document. `-` reads one item per line from stdin.
    #[arg(long, value_name = "ITEMS")]
    negatives: Option<String>,

    /// With --negatives, also print a version built from shuffled items.
    #[arg(long, requires = "negatives")]
    shuffle: bool,

    /// With --negatives, character budget of the bad version.
    #[arg(long, requires = "negatives")]
    limit: Option<usize>,

    /// With --negatives, descriptors to pair with the items instead of the built-in pool.
    #[arg(long, requires = "negatives", value_name = "ITEMS")]
    descriptors: Option<String>,
}

fn make_rng(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => {
            debug!("Using seed {}", seed);
            Box::new(SeededRandom::from_seed(seed))
        }
        None => Box::new(SeededRandom::from_entropy()),
    }
}

fn print_versions(heading: &str, versions: &NegativeVersions) {
    if !heading.is_empty() {
        println!("-- {} --", heading);
    }
    println!("Good version ({} terms):", versions.positive.len());
    println!("{}", versions.good());
    println!("Bad version ({} terms):", versions.negative.len());
    println!("{}", versions.bad());
}

fn run_negatives(cli: &Cli, raw: &str, rng: &mut dyn RandomSource) -> Result<()> {
    let items = if raw == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read items from stdin")?;
        negatives::parse_lines(&input)
    } else {
        negatives::parse_items(raw)
    };
    if items.is_empty() {
        anyhow::bail!("No non-empty items found");
    }

    let mut options = NegativesOptions::default();
    if let Some(limit) = cli.limit {
        options.limit = limit;
    }
    if let Some(descriptors) = &cli.descriptors {
        options.descriptors = negatives::parse_items(descriptors);
    }
    info!(
        "Building negatives for {} items with {} descriptors",
        items.len(),
        options.descriptors.len()
    );

    print_versions("", &negatives::build_versions(&items, &options, rng));
    if cli.shuffle {
        options.shuffle_items = true;
        print_versions("Shuffled", &negatives::build_versions(&items, &options, rng));
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = config::load_config();

    if let Some(raw) = &cli.negatives {
        let mut rng = make_rng(cli.seed.or(config.seed));
        return run_negatives(&cli, raw, rng.as_mut());
    }

    let path = cli
        .document
        .clone()
        .or(config.document.clone())
        .context("No document given and none configured")?;
    let document =
        MixDocument::from_file(&path).with_context(|| format!("Failed to load {}", path.display()))?;
    let (tree, report) = MixTree::from_document(&document)?;
    info!(
        "Loaded {} ({} roots, {} rekeyed ids)",
        path.display(),
        report.roots.len(),
        report.rekeyed.len()
    );

    if cli.export {
        let exported = export_mix_state(&tree);
        let out = if config.pretty_export {
            exported.to_json_pretty()?
        } else {
            exported.to_json()?
        };
        println!("{}", out);
        return Ok(());
    }

    let mut rng = make_rng(cli.seed.or(config.seed));

    let generated = match cli.root {
        Some(id) => vec![generate(&tree, NodeId(id), rng.as_mut())?],
        None => generate_all(&tree, rng.as_mut())?,
    };

    let show_tree = cli.tree || config.show_tree;
    for node in &generated {
        if show_tree {
            println!("{}", serde_json::to_string_pretty(node)?);
        } else {
            println!("{}", node.output);
        }
    }
    Ok(())
}
