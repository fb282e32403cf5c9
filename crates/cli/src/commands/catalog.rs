//! List the weapon and monster catalogs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use dpr_core::{CatalogOracle, MonsterEntry, WeaponPreset, WeaponTags};

use super::{OutputFormat, load_monsters, load_weapons, pick_path};
use crate::config::CliConfig;

/// List weapons available to Attack nodes
#[derive(Parser)]
pub struct Weapons {
    /// Weapon catalog (RON), defaults to the built-in weapons
    #[arg(long, value_name = "FILE")]
    weapons: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

impl Weapons {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let catalog = load_weapons(pick_path(
            self.weapons.as_deref(),
            config.weapons_path.as_ref(),
        ))?;

        match self.format.or(config.output_format).unwrap_or_default() {
            OutputFormat::Summary => {
                println!("{}", style("=== Weapons ===").bold().green());
                for weapon in catalog.weapons() {
                    println!("{}", weapon_row(weapon));
                }
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(catalog.weapons())
                    .context("Failed to encode weapons as JSON")?;
                println!("{json}");
            }
        }
        Ok(())
    }
}

/// List monsters that can be selected as the target
#[derive(Parser)]
pub struct Monsters {
    /// Monster catalog (RON), defaults to the built-in bestiary
    #[arg(long, value_name = "FILE")]
    monsters: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

impl Monsters {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let catalog = load_monsters(pick_path(
            self.monsters.as_deref(),
            config.monsters_path.as_ref(),
        ))?;

        match self.format.or(config.output_format).unwrap_or_default() {
            OutputFormat::Summary => {
                println!("{}", style("=== Monsters ===").bold().green());
                for monster in catalog.iter() {
                    println!("{}", monster_row(monster));
                }
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&catalog.monsters)
                    .context("Failed to encode monsters as JSON")?;
                println!("{json}");
            }
        }
        Ok(())
    }
}

fn tag_names(tags: WeaponTags) -> String {
    tags.iter_names()
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join(" | ")
}

fn weapon_row(weapon: &WeaponPreset) -> String {
    let dice = match weapon.versatile {
        Some(versatile) => format!("{} ({versatile})", weapon.dice),
        None => weapon.dice.to_string(),
    };
    format!(
        "  {:<18} {:<18} {:<9} {:<12} {}",
        style(&weapon.id).cyan(),
        weapon.name,
        dice,
        weapon.damage_type,
        tag_names(weapon.tags)
    )
}

fn monster_row(monster: &MonsterEntry) -> String {
    let mut row = format!(
        "  {:<16} {:<16} CR {:<5} AC {}",
        style(&monster.id).cyan(),
        monster.name,
        monster.cr,
        monster.ac
    );
    if !monster.resistances.is_empty() {
        row.push_str(&format!("  resists {}", monster.resistances.join(", ")));
    }
    if !monster.vulnerabilities.is_empty() {
        row.push_str(&format!("  vulnerable {}", monster.vulnerabilities.join(", ")));
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpr_core::Catalog;

    #[test]
    fn weapon_rows_show_versatile_die_and_tags() {
        let catalog = Catalog::builtin();
        let longsword = catalog.weapon("longsword").unwrap();
        let row = weapon_row(longsword);
        assert!(row.contains("Longsword"));
        assert!(row.contains("1d8 (1d10)"));
        assert!(row.contains("VERSATILE"));
    }

    #[test]
    fn tag_names_are_joined() {
        assert_eq!(tag_names(WeaponTags::FINESSE | WeaponTags::LIGHT), "FINESSE | LIGHT");
        assert_eq!(tag_names(WeaponTags::empty()), "");
    }

    #[test]
    fn monster_rows_list_vulnerabilities() {
        let monsters = load_monsters(None).unwrap();
        let row = monster_row(monsters.get("skeleton").unwrap());
        assert!(row.contains("AC 13"));
        assert!(row.contains("vulnerable bludgeoning"));
    }
}
