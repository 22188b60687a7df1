//! Run a scenario file headless
//!
//! Loads content (built-in or from a data directory), plays the scenario
//! through the frame driver and prints the report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use runtime::{CastOutcome, CastSource, Scenario, ScenarioOutcome, ScenarioReport, ScenarioRunner};

use crate::utils::{format_bytes, format_pool, load_content};

/// Run a scenario file headless and report the outcome
#[derive(Parser)]
pub struct Simulate {
    /// Scenario file (RON)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Content directory (defaults to the built-in content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Override the scenario's RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Also write the full report as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Outcome, survivors and cast log
    Summary,
    /// Full JSON report
    Json,
    /// Every combat event, one per line
    Events,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let content = load_content(self.data_dir.as_deref())?;
        let mut scenario = Scenario::load(&self.scenario)?;
        if self.seed.is_some() {
            scenario.seed = self.seed;
        }

        let report = ScenarioRunner::new(&content).run(&scenario)?;

        if let Some(path) = &self.out {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize report to JSON")?;
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            eprintln!(
                "{} {} ({})",
                style("Report written:").bold().cyan(),
                path.display(),
                format_bytes(json.len())
            );
        }

        match self.format {
            OutputFormat::Summary => print_summary(&report),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize report to JSON")?;
                println!("{}", json);
            }
            OutputFormat::Events => print_events(&report),
        }

        Ok(())
    }
}

fn print_summary(report: &ScenarioReport) {
    println!(
        "{}",
        style(format!("=== {} ===", report.scenario)).bold().green()
    );
    println!();

    let outcome = match report.outcome {
        ScenarioOutcome::CharactersWon => style("characters won").green(),
        ScenarioOutcome::CreaturesWon => style("creatures won").red(),
        ScenarioOutcome::TimedOut => style("timed out").yellow(),
    };
    println!("{} {}", style("Outcome:").bold().cyan(), outcome);
    println!(
        "{} {} ({:.2}s)",
        style("Frames:").bold().cyan(),
        report.frames,
        report.elapsed
    );
    println!("{} {}", style("Events:").bold().cyan(), report.events.len());
    println!("{} {}", style("Digest:").bold().cyan(), report.digest);
    println!();

    println!("{}", style("Combatants:").bold().yellow());
    for combatant in &report.combatants {
        let marker = if combatant.dead {
            style("dead").red().to_string()
        } else {
            style("up").green().to_string()
        };
        println!(
            "  {:<16} L{:<3} HP {:<10} RES {:<6} {}",
            combatant.name,
            combatant.level,
            format_pool(combatant.health, combatant.health_max),
            combatant.resource,
            marker
        );
    }
    println!();

    println!("{}", style("Casts:").bold().yellow());
    for cast in &report.casts {
        let source = match cast.source {
            CastSource::Script => "script",
            CastSource::Ai => "ai",
        };
        let detail = match &cast.outcome {
            CastOutcome::Resolved { hits, projectile } => {
                let damage: i32 = hits.iter().map(|hit| hit.damage).sum();
                let healing: i32 = hits.iter().map(|hit| hit.healed).sum();
                let mut parts = vec![format!("{} hit(s)", hits.len())];
                if damage > 0 {
                    parts.push(format!("{damage} dmg"));
                }
                if healing > 0 {
                    parts.push(format!("{healing} heal"));
                }
                if *projectile {
                    parts.push("projectile".to_string());
                }
                style(parts.join(", ")).green().to_string()
            }
            CastOutcome::Rejected { code, .. } => style(code.as_str()).red().to_string(),
        };
        println!(
            "  [{:>5}] {:<6} {:<16} {:<18} {}",
            cast.frame,
            source,
            cast.caster,
            cast.spell.to_string(),
            detail
        );
    }
}

fn print_events(report: &ScenarioReport) {
    for event in &report.events {
        println!("[{:>5}] {:?}", event.frame, event.event);
    }
}
