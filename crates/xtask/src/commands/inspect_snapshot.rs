//! Read and inspect engine snapshots
//!
//! Accepts either a bare `EngineSnapshot` in JSON or a scenario report
//! written by `simulate --out`, in which case its `snapshot` field is used.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use combat_core::EngineSnapshot;

use crate::utils::{format_bytes, format_pool};

/// Inspect a saved engine snapshot or scenario report
#[derive(Parser)]
pub struct InspectSnapshot {
    /// Snapshot or report file (JSON)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Summary view (combatants, cooldowns, effects, projectiles)
    Summary,
    /// Full JSON output
    Json,
    /// Pretty-printed debug format
    Debug,
}

impl InspectSnapshot {
    pub fn execute(self) -> Result<()> {
        let bytes = std::fs::read(&self.file)
            .with_context(|| format!("Failed to read snapshot file: {}", self.file.display()))?;
        let snapshot = decode_snapshot(&bytes, &self.file)?;

        println!(
            "{} {}",
            style("Snapshot File:").bold().cyan(),
            self.file.display()
        );
        println!(
            "{} {}",
            style("File Size:").bold().cyan(),
            format_bytes(bytes.len())
        );
        println!(
            "{} {}",
            style("Digest:").bold().cyan(),
            hex::encode(snapshot.digest())
        );
        println!();

        match self.format {
            OutputFormat::Summary => print_summary(&snapshot),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&snapshot)
                    .context("Failed to serialize snapshot to JSON")?;
                println!("{}", json);
            }
            OutputFormat::Debug => println!("{:#?}", snapshot),
        }

        Ok(())
    }
}

fn decode_snapshot(bytes: &[u8], path: &Path) -> Result<EngineSnapshot> {
    let mut value: serde_json::Value = serde_json::from_slice(bytes)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;

    // Reports nest the snapshot next to the cast log.
    if let Some(snapshot) = value.get_mut("snapshot") {
        value = snapshot.take();
    }

    serde_json::from_value(value)
        .with_context(|| format!("Not an engine snapshot: {}", path.display()))
}

fn print_summary(snapshot: &EngineSnapshot) {
    println!("{}", style("=== Engine Snapshot Summary ===").bold().green());
    println!();

    println!("{}", style("Characters:").bold().yellow());
    for record in &snapshot.characters {
        println!(
            "  {} L{} XP {} - HP {}, RES {}, Position ({:.2}, {:.2}){}",
            record.id,
            record.progression.level,
            record.progression.experience,
            format_pool(record.vitals.health(), record.vitals.health_max()),
            format_pool(record.vitals.resource(), record.vitals.resource_max()),
            record.position.x,
            record.position.y,
            stun_note(record.conditions.stun_remaining()),
        );
    }
    println!();

    println!("{}", style("Creatures:").bold().yellow());
    for record in &snapshot.creatures {
        println!(
            "  {} - HP {}, Position ({:.2}, {:.2}){}",
            record.id,
            format_pool(record.vitals.health(), record.vitals.health_max()),
            record.position.x,
            record.position.y,
            stun_note(record.conditions.stun_remaining()),
        );
    }
    println!();

    println!("{}", style("Cooldowns:").bold().yellow());
    for (key, remaining) in &snapshot.cooldowns {
        println!("  {} {}: {:.2}s", key.caster, key.spell, remaining);
    }
    println!();

    println!("{}", style("Status Effects:").bold().yellow());
    for effect in &snapshot.status_effects {
        println!(
            "  #{} {} on {} ({:?}) {:.2}s left",
            effect.id.0, effect.name, effect.target, effect.kind, effect.remaining
        );
    }
    println!();

    println!("{}", style("Projectiles:").bold().yellow());
    for projectile in &snapshot.projectiles {
        println!(
            "  #{} {} from {} at ({:.2}, {:.2}), {:.2}/{:.2} travelled",
            projectile.id,
            projectile.spell,
            projectile.caster,
            projectile.position.x,
            projectile.position.y,
            projectile.travelled,
            projectile.range
        );
    }
}

fn stun_note(remaining: f32) -> String {
    if remaining > 0.0 {
        format!(", {}", style(format!("stunned {remaining:.2}s")).magenta())
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::CastTarget;
    use glam::Vec2;
    use runtime::{Scenario, ScenarioRunner};

    fn sample() -> EngineSnapshot {
        let content = crate::utils::load_content(None).unwrap();
        let mut engine = content.build_engine();
        let hero = content
            .spawn_character(&mut engine, "Rook", "Brawler", Vec2::ZERO)
            .unwrap();
        engine.cast(hero, "Block", CastTarget::Caster).unwrap();
        engine.snapshot()
    }

    #[test]
    fn bare_snapshot_decodes() {
        let snapshot = sample();
        let bytes = serde_json::to_vec(&snapshot).unwrap();
        let decoded = decode_snapshot(&bytes, Path::new("snap.json")).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn report_snapshot_is_extracted() {
        let content = crate::utils::load_content(None).unwrap();
        let scenario = Scenario::from_ron(
            r#"(
                name: "Solo",
                duration: 0.5,
                combatants: [Character(name: "Rook", class: "Brawler", position: (0.0, 0.0))],
            )"#,
        )
        .unwrap();
        let report = ScenarioRunner::new(&content).run(&scenario).unwrap();
        let bytes = serde_json::to_vec(&report).unwrap();

        let decoded = decode_snapshot(&bytes, Path::new("report.json")).unwrap();
        assert_eq!(decoded, report.snapshot);
    }

    #[test]
    fn foreign_json_is_rejected() {
        let err = decode_snapshot(br#"{"characters": 3}"#, Path::new("odd.json")).unwrap_err();
        assert!(err.to_string().contains("odd.json"));
    }
}
