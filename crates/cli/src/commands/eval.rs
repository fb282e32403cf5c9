//! Evaluate every Output node of a graph document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use dpr_content::{BuilderLoader, GraphLoader, SettingsLoader};
use dpr_core::{AttackerProfile, DprEngine, EngineSettings, NodeId, Summary, TargetProfile};
use serde::Serialize;

use super::{OutputFormat, load_monsters, load_weapons, pick_path};
use crate::config::CliConfig;

/// Evaluate expected damage per round for a graph document
#[derive(Parser)]
pub struct Eval {
    /// Graph document (JSON)
    #[arg(value_name = "GRAPH")]
    graph: PathBuf,

    /// Settings file (TOML) replacing the document's settings block
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Character-builder profile (JSON) overriding level and modifiers
    #[arg(long, value_name = "FILE")]
    builder: Option<PathBuf>,

    /// Monster id whose AC and physical resistances become the target
    #[arg(long, value_name = "ID")]
    monster: Option<String>,

    /// Keep the settings' target even when a monster is selected
    #[arg(long)]
    manual_target: bool,

    /// Monster catalog (RON), defaults to the built-in bestiary
    #[arg(long, value_name = "FILE")]
    monsters: Option<PathBuf>,

    /// Weapon catalog (RON), defaults to the built-in weapons
    #[arg(long, value_name = "FILE")]
    weapons: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the graph back with summaries attached to its Output nodes
    #[arg(short, long, value_name = "FILE")]
    write: Option<PathBuf>,
}

/// One Output node in JSON output.
#[derive(Serialize)]
struct OutputReport<'a> {
    output: &'a NodeId,
    summary: Option<&'a Summary>,
}

impl Eval {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let catalog = load_weapons(pick_path(
            self.weapons.as_deref(),
            config.weapons_path.as_ref(),
        ))?;

        let parts = GraphLoader::load(&self.graph, &catalog)?;
        if parts.migrated > 0 || parts.skipped > 0 {
            tracing::info!(
                migrated = parts.migrated,
                skipped = parts.skipped,
                "document needed cleanup; run `dpr migrate` to rewrite it"
            );
        }

        let mut settings = match &self.settings {
            Some(path) => SettingsLoader::load(path)?,
            None => parts.settings,
        };

        if let Some(id) = &self.monster {
            let monsters = load_monsters(pick_path(
                self.monsters.as_deref(),
                config.monsters_path.as_ref(),
            ))?;
            let monster = monsters.require(id)?;
            TargetProfile::resolve(&settings, Some(monster), self.manual_target)
                .apply_to(&mut settings);
            tracing::info!(monster = %monster.id, ac = settings.target_ac, "target selected");
        }

        let builder = self
            .builder
            .as_deref()
            .map(BuilderLoader::load)
            .transpose()?;

        let engine = DprEngine::new(&catalog, &settings).with_builder(builder);
        let mut graph = parts.graph;
        let evaluation = engine.evaluate(&graph);

        match self.format.or(config.output_format).unwrap_or_default() {
            OutputFormat::Summary => {
                print!("{}", render_settings(&settings, engine.attacker()));
                for (output, summary) in evaluation.iter() {
                    print!("{}", render_output(output, summary));
                }
            }
            OutputFormat::Json => {
                let reports: Vec<OutputReport<'_>> = evaluation
                    .iter()
                    .map(|(output, summary)| OutputReport { output, summary })
                    .collect();
                let json = serde_json::to_string_pretty(&reports)
                    .context("Failed to encode evaluation as JSON")?;
                println!("{json}");
            }
        }

        if let Some(path) = &self.write {
            let refreshed = engine.refresh(&mut graph);
            GraphLoader::save(path, &graph, &settings)?;
            tracing::info!(path = %path.display(), outputs = refreshed, "wrote evaluated graph");
        }

        Ok(())
    }
}

/// Header lines: the attacker as the engine sees it (builder profile applied)
/// and the target from the settings.
fn render_settings(settings: &EngineSettings, attacker: &AttackerProfile) -> String {
    let mut target = format!("AC {}", settings.target_ac);
    if let Some(resist) = settings.resist {
        target.push_str(&format!(", resists {resist}"));
    }
    if let Some(vuln) = settings.vuln {
        target.push_str(&format!(", vulnerable to {vuln}"));
    }

    format!(
        "{} level {}, STR {:+}, DEX {:+}, {}\n{} {}\n\n",
        style("Attacker:").bold().cyan(),
        attacker.level,
        attacker.str_mod,
        attacker.dex_mod,
        settings.adv_mode,
        style("Target:").bold().cyan(),
        target,
    )
}

fn render_output(output: &NodeId, summary: Option<&Summary>) -> String {
    let mut out = format!("{}\n", style(format!("=== {output} ===")).bold().green());

    let Some(summary) = summary else {
        out.push_str(&format!("  {}\n\n", style("No attack sequences connected").dim()));
        return out;
    };

    out.push_str(&format!(
        "  {} {:.2}\n",
        style("DPR:").bold().yellow(),
        summary.dpr
    ));
    out.push_str(&format!(
        "  To-hit {:+}  vs AC {} ({})\n",
        summary.to_hit, summary.target_ac, summary.adv_mode
    ));
    out.push_str(&format!(
        "  Hit {:.1}%  Crit {:.1}%  Attacks {}\n",
        summary.hit_percent(),
        summary.crit_percent(),
        summary.attacks
    ));

    if !summary.sequences.is_empty() {
        out.push_str(&format!("  {}\n", style("Sequences:").bold()));
        for sequence in &summary.sequences {
            let source = sequence
                .source
                .as_ref()
                .map_or_else(|| "implied".to_string(), NodeId::to_string);
            out.push_str(&format!(
                "    {:<12} {:<16} {:<8} x{}  {:+}  {:.2}\n",
                source,
                sequence.weapon,
                sequence.action_type,
                sequence.attacks,
                sequence.to_hit,
                sequence.dpr
            ));
        }
    }

    for note in &summary.notes {
        out.push_str(&format!("  {} {}\n", style("note:").dim(), note));
    }
    out.push('\n');
    out
}
