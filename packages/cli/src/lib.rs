//! `pathtree`: load a JSON document into a path tree and inspect it.
//!
//! ```text
//! $ echo '{"map":{"foo3":[1,2]}}' | pathtree get /map/foo3
//! [1,2]
//! $ pathtree --input doc.json --at /doc leaf /doc/map/foo3/0
//! true
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};

use pathtree_core::PathTree;
use pathtree_serde::from_json;

/// Load a JSON document into a path tree and query it
#[derive(Parser, Debug)]
#[command(name = "pathtree")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON document to load; reads stdin when absent or "-"
    #[arg(short, long, env = "PATHTREE_INPUT")]
    pub input: Option<PathBuf>,

    /// Path the document is inserted at
    #[arg(long, env = "PATHTREE_AT", default_value = "/")]
    pub at: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the subtree at PATH as JSON
    Get { path: String },
    /// Print whether PATH exists as a leaf
    Leaf { path: String },
    /// Print an outline of the subtree at PATH
    Dump {
        #[arg(default_value = "/")]
        path: String,
    },
}

/// Read the document named by `args.input`, or stdin.
pub fn read_input(args: &Args) -> Result<String> {
    match &args.input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut document = String::new();
            std::io::stdin()
                .read_to_string(&mut document)
                .context("reading stdin")?;
            Ok(document)
        }
    }
}

/// Load `document` into a fresh tree at `args.at` and run the command.
pub fn execute(args: &Args, document: &str) -> Result<String> {
    let json: serde_json::Value =
        serde_json::from_str(document).context("input is not valid JSON")?;

    let mut tree = PathTree::new();
    tree.create(&args.at, from_json(json))
        .with_context(|| format!("inserting document at {}", args.at))?;
    info!("loaded document into {} nodes", tree.len());

    debug!("running {:?}", args.command);
    let output = match &args.command {
        Command::Get { path } => {
            let node = tree.get(path)?;
            if args.pretty {
                node.to_text_pretty()
            } else {
                node.to_text()
            }
        }
        Command::Leaf { path } => tree.contains_leaf(path).to_string(),
        Command::Dump { path } => tree.get(path)?.dump().trim_end().to_string(),
    };
    Ok(output)
}

/// Read the input document, then execute the command.
pub fn run(args: &Args) -> Result<String> {
    let document = read_input(args)?;
    execute(args, &document)
}
