//! Rewrite a graph document in the current format.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;
use dpr_content::GraphLoader;

use super::{load_weapons, pick_path};
use crate::config::CliConfig;

/// Load a document, migrating legacy nodes, and write it back out
#[derive(Parser)]
pub struct Migrate {
    /// Document to read
    #[arg(value_name = "IN")]
    input: PathBuf,

    /// Where to write the migrated document (may equal IN)
    #[arg(value_name = "OUT")]
    output: PathBuf,

    /// Weapon catalog (RON) used to resolve weapon ids
    #[arg(long, value_name = "FILE")]
    weapons: Option<PathBuf>,
}

impl Migrate {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let catalog = load_weapons(pick_path(
            self.weapons.as_deref(),
            config.weapons_path.as_ref(),
        ))?;

        let parts = GraphLoader::load(&self.input, &catalog)?;
        GraphLoader::save(&self.output, &parts.graph, &parts.settings)?;

        println!(
            "{} {} -> {}",
            style("Migrated:").bold().cyan(),
            self.input.display(),
            self.output.display()
        );
        println!(
            "  {} nodes, {} edges, {} legacy nodes rewritten, {} unknown nodes dropped",
            parts.graph.nodes.len(),
            parts.graph.edges.len(),
            parts.migrated,
            parts.skipped
        );
        Ok(())
    }
}
