//! List content definitions
//!
//! Loading runs the same cross-reference validation the runtime does, so a
//! clean listing doubles as a content check.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use combat_content::ContentBundle;
use combat_core::SpellDefinition;

use crate::utils::load_content;

/// Load, validate and list content definitions
#[derive(Parser)]
pub struct ListContent {
    /// Content directory (defaults to the built-in content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Only list spells usable by this class
    #[arg(short, long, value_name = "CLASS")]
    class: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Names and headline numbers
    Summary,
    /// Full definitions as JSON
    Json,
}

impl ListContent {
    pub fn execute(self) -> Result<()> {
        let content = load_content(self.data_dir.as_deref())?;
        if let Some(class) = &self.class
            && content.classes().get(class).is_none()
        {
            anyhow::bail!("Unknown class: {}", class);
        }

        let spells = select_spells(&content, self.class.as_deref());
        match self.format {
            OutputFormat::Summary => print_summary(&content, &spells),
            OutputFormat::Json => {
                let classes: Vec<_> = content.classes().iter().collect();
                let creatures: Vec<_> = content.creatures().iter().collect();
                let json = serde_json::to_string_pretty(&serde_json::json!({
                    "config": content.config(),
                    "classes": classes,
                    "spells": spells,
                    "creatures": creatures,
                }))
                .context("Failed to serialize content to JSON")?;
                println!("{}", json);
            }
        }

        Ok(())
    }
}

fn select_spells<'a>(content: &'a ContentBundle, class: Option<&str>) -> Vec<&'a SpellDefinition> {
    content
        .spells()
        .iter()
        .filter(|spell| match (class, spell.class_requirement.as_deref()) {
            (Some(wanted), Some(required)) => wanted == required,
            (Some(_), None) => true,
            (None, _) => true,
        })
        .collect()
}

fn print_summary(content: &ContentBundle, spells: &[&SpellDefinition]) {
    println!("{}", style("=== Content ===").bold().green());
    println!();

    println!("{}", style("Classes:").bold().yellow());
    for class in content.classes().iter() {
        let subclasses: Vec<_> = class.subclasses.iter().map(|sub| sub.name.as_str()).collect();
        println!(
            "  {:<12} {:?}, {} starting spell(s){}",
            class.name,
            class.resource_type,
            class.starting_spells.len(),
            if subclasses.is_empty() {
                String::new()
            } else {
                format!(", subclasses: {}", subclasses.join(", "))
            }
        );
    }
    println!();

    println!("{}", style("Spells:").bold().yellow());
    for spell in spells {
        println!(
            "  {:<18} {:<8} cost {:>3}  cd {:>5.1}s  range {:>4.1}  {}",
            spell.id.to_string(),
            format!("{:?}", spell.spell_type),
            spell.resource_cost,
            spell.cooldown,
            spell.range,
            style(spell.class_requirement.as_deref().unwrap_or("any")).dim()
        );
    }
    println!();

    println!("{}", style("Creatures:").bold().yellow());
    for creature in content.creatures().iter() {
        let spells: Vec<String> = creature.spells.iter().map(ToString::to_string).collect();
        println!(
            "  {:<18} L{:<3} reach {:>4.1}  every {:>4.1}s  [{}]",
            creature.name,
            creature.level,
            creature.attack_range,
            creature.attack_cooldown,
            spells.join(", ")
        );
    }
}
