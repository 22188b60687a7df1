//! Scripted, headless fights.
//!
//! A scenario names its combatants, places them, and lists casts to issue at
//! given times. The runner builds a fresh engine from content, plays the
//! script through a [`FrameDriver`] with creature AI enabled, and returns a
//! report with every cast attempt, every event, the final snapshot and its
//! digest. Two runs of the same scenario against the same content produce
//! identical reports.
//!
//! ```text
//! (
//!     name: "Pit fight",
//!     duration: 6.0,
//!     combatants: [
//!         Character(name: "Rook", class: "Brawler", position: (0.0, 0.0)),
//!         Creature(name: "Ghoul", template: "Ghoul", position: (1.0, 0.0)),
//!     ],
//!     script: [
//!         (at: 0.0, caster: "Rook", spell: "Heavy Punch", target: Entity("Ghoul")),
//!     ],
//! )
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use combat_content::ContentBundle;
use combat_core::{
    CastError, CastTarget, CombatEngine, Combatant, Damageable, EngineSnapshot, EntityId,
    GameError, HitReport, SpellId,
};

use crate::ai::{AiDecision, CreatureAi};
use crate::api::{Result, RuntimeError};
use crate::driver::FrameDriver;
use crate::events::FrameEvent;

// ============================================================================
// Scenario definition
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Simulated seconds before the scenario times out.
    pub duration: f32,
    #[serde(default = "Scenario::default_frame_step")]
    pub frame_step: f32,
    /// Overrides the content's RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "Scenario::default_true")]
    pub creature_ai: bool,
    /// End as soon as one side has nobody standing.
    #[serde(default = "Scenario::default_true")]
    pub stop_on_defeat: bool,
    pub combatants: Vec<ScenarioSpawn>,
    #[serde(default)]
    pub obstacles: Vec<ScenarioObstacle>,
    #[serde(default)]
    pub script: Vec<ScriptedCast>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScenarioSpawn {
    Character {
        name: String,
        class: String,
        position: Vec2,
        /// Experience granted right after spawning.
        #[serde(default)]
        experience: u64,
    },
    Creature {
        name: String,
        template: String,
        position: Vec2,
    },
}

impl ScenarioSpawn {
    pub fn name(&self) -> &str {
        match self {
            Self::Character { name, .. } | Self::Creature { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioObstacle {
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptedCast {
    /// Seconds into the scenario.
    pub at: f32,
    pub caster: String,
    pub spell: SpellId,
    pub target: ScriptTarget,
}

/// Cast aim, with combatants referenced by scenario name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScriptTarget {
    Caster,
    Point(Vec2),
    Direction(Vec2),
    Entity(String),
}

impl Scenario {
    fn default_frame_step() -> f32 {
        0.1
    }

    fn default_true() -> bool {
        true
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        ron::from_str(content)
            .map_err(|e| RuntimeError::scenario("<inline>", format!("failed to parse RON: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let label = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuntimeError::scenario(&label, format!("failed to read file: {e}")))?;
        ron::from_str(&content)
            .map_err(|e| RuntimeError::scenario(&label, format!("failed to parse RON: {e}")))
    }

    /// Number of frames the scenario lasts at its frame step.
    pub fn frame_count(&self) -> u64 {
        if self.duration <= 0.0 || self.frame_step <= 0.0 {
            return 0;
        }
        (self.duration / self.frame_step).ceil() as u64
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: String::new(),
            duration: 0.0,
            frame_step: Self::default_frame_step(),
            seed: None,
            creature_ai: true,
            stop_on_defeat: true,
            combatants: Vec::new(),
            obstacles: Vec::new(),
            script: Vec::new(),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastSource {
    Script,
    Ai,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CastOutcome {
    Resolved {
        hits: Vec<HitReport>,
        projectile: bool,
    },
    Rejected {
        code: String,
        reason: String,
    },
}

impl CastOutcome {
    fn rejected(error: &CastError) -> Self {
        Self::Rejected {
            code: error.error_code().to_string(),
            reason: error.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CastRecord {
    /// Frame the cast's events were published with.
    pub frame: u64,
    pub source: CastSource,
    pub caster: String,
    pub spell: SpellId,
    pub outcome: CastOutcome,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatantSummary {
    pub id: EntityId,
    pub name: String,
    pub level: u32,
    pub health: i32,
    pub health_max: i32,
    pub resource: i32,
    pub dead: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioOutcome {
    /// Every creature is dead.
    CharactersWon,
    /// Every character is dead.
    CreaturesWon,
    TimedOut,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub outcome: ScenarioOutcome,
    pub frames: u64,
    pub elapsed: f32,
    pub casts: Vec<CastRecord>,
    pub events: Vec<FrameEvent>,
    pub combatants: Vec<CombatantSummary>,
    pub snapshot: EngineSnapshot,
    /// Hex SHA-256 of the final snapshot.
    pub digest: String,
}

impl ScenarioReport {
    pub fn combatant(&self, name: &str) -> Option<&CombatantSummary> {
        self.combatants.iter().find(|summary| summary.name == name)
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Plays scenarios against one set of content.
pub struct ScenarioRunner<'a> {
    content: &'a ContentBundle,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(content: &'a ContentBundle) -> Self {
        Self { content }
    }

    pub fn run(&self, scenario: &Scenario) -> Result<ScenarioReport> {
        let mut config = self.content.config().clone();
        if let Some(seed) = scenario.seed {
            config = config.with_seed(seed);
        }
        let ai_seed = config.rng_seed;
        let mut engine = CombatEngine::new(config, self.content.spells().clone());

        let names = self.populate(scenario, &mut engine)?;
        let script = resolve_script(scenario, &names)?;

        let mut driver = FrameDriver::new(engine, scenario.frame_step)?;
        if scenario.creature_ai {
            driver = driver.with_ai(CreatureAi::new(ai_seed));
        }

        info!(
            target: "runtime::scenario",
            scenario = %scenario.name,
            combatants = names.len(),
            frames = scenario.frame_count(),
            "scenario started"
        );

        let labels: BTreeMap<EntityId, String> =
            names.iter().map(|(name, id)| (*id, name.clone())).collect();
        let label = |id: EntityId| labels.get(&id).cloned().unwrap_or_else(|| id.to_string());

        let mut casts = Vec::new();
        let mut events = Vec::new();
        let mut pending = script.into_iter().peekable();
        let mut outcome = ScenarioOutcome::TimedOut;

        for frame in 1..=scenario.frame_count() {
            let now = (frame - 1) as f32 * scenario.frame_step;
            while let Some(entry) = pending.next_if(|entry| entry.at <= now + 1e-4) {
                let result = driver
                    .engine_mut()
                    .cast(entry.caster, entry.spell.as_str(), entry.target);
                let cast_outcome = match &result {
                    Ok(report) => CastOutcome::Resolved {
                        hits: report.hits.clone(),
                        projectile: report.projectile.is_some(),
                    },
                    Err(error) => {
                        debug!(
                            target: "runtime::scenario",
                            caster = %entry.caster,
                            spell = %entry.spell,
                            %error,
                            "scripted cast rejected"
                        );
                        CastOutcome::rejected(error)
                    }
                };
                casts.push(CastRecord {
                    frame,
                    source: CastSource::Script,
                    caster: label(entry.caster),
                    spell: entry.spell,
                    outcome: cast_outcome,
                });
            }

            let output = driver.step();
            casts.extend(
                output
                    .decisions
                    .iter()
                    .map(|decision| ai_record(frame, decision, &label)),
            );
            events.extend(output.events);

            if scenario.stop_on_defeat {
                if let Some(decided) = decide(driver.engine()) {
                    outcome = decided;
                    break;
                }
            }
        }

        let engine = driver.engine();
        let frames = driver.frame();
        let snapshot = engine.snapshot();
        let digest = hex::encode(snapshot.digest());
        let combatants = engine
            .roster()
            .iter()
            .map(|combatant| summarize(combatant, label(combatant.id())))
            .collect();

        info!(
            target: "runtime::scenario",
            scenario = %scenario.name,
            ?outcome,
            frames,
            casts = casts.len(),
            events = events.len(),
            %digest,
            "scenario finished"
        );

        Ok(ScenarioReport {
            scenario: scenario.name.clone(),
            outcome,
            frames,
            elapsed: frames as f32 * scenario.frame_step,
            casts,
            events,
            combatants,
            snapshot,
            digest,
        })
    }

    fn populate(
        &self,
        scenario: &Scenario,
        engine: &mut CombatEngine,
    ) -> Result<BTreeMap<String, EntityId>> {
        let mut names = BTreeMap::new();
        for spawn in &scenario.combatants {
            let id = match spawn {
                ScenarioSpawn::Character {
                    name,
                    class,
                    position,
                    experience,
                } => {
                    let id = self
                        .content
                        .spawn_character(engine, name, class, *position)
                        .ok_or_else(|| RuntimeError::UnknownClass(class.clone()))?;
                    if *experience > 0 {
                        engine.grant_experience(id, *experience);
                    }
                    id
                }
                ScenarioSpawn::Creature {
                    template, position, ..
                } => self.content.spawn_creature(engine, template, *position)?,
            };
            if names.insert(spawn.name().to_string(), id).is_some() {
                return Err(RuntimeError::scenario(
                    &scenario.name,
                    format!("combatant name `{}` used twice", spawn.name()),
                ));
            }
        }
        for obstacle in &scenario.obstacles {
            engine.add_obstacle(obstacle.position, obstacle.radius);
        }
        // Spawning may emit progression events; they are not part of the fight.
        engine.drain_events();
        Ok(names)
    }
}

struct ResolvedCast {
    at: f32,
    caster: EntityId,
    spell: SpellId,
    target: CastTarget,
}

fn resolve_script(
    scenario: &Scenario,
    names: &BTreeMap<String, EntityId>,
) -> Result<Vec<ResolvedCast>> {
    let lookup = |name: &str| {
        names.get(name).copied().ok_or_else(|| {
            RuntimeError::scenario(&scenario.name, format!("unknown combatant `{name}`"))
        })
    };

    let mut script = scenario
        .script
        .iter()
        .map(|entry| {
            let target = match &entry.target {
                ScriptTarget::Caster => CastTarget::Caster,
                ScriptTarget::Point(point) => CastTarget::Point(*point),
                ScriptTarget::Direction(direction) => CastTarget::Direction(*direction),
                ScriptTarget::Entity(name) => CastTarget::Entity(lookup(name)?),
            };
            Ok(ResolvedCast {
                at: entry.at,
                caster: lookup(&entry.caster)?,
                spell: entry.spell.clone(),
                target,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    script.sort_by(|a, b| a.at.total_cmp(&b.at));
    Ok(script)
}

fn ai_record(frame: u64, decision: &AiDecision, label: &impl Fn(EntityId) -> String) -> CastRecord {
    let outcome = match &decision.outcome {
        Ok(()) => CastOutcome::Resolved {
            hits: Vec::new(),
            projectile: false,
        },
        Err(error) => CastOutcome::rejected(error),
    };
    CastRecord {
        frame,
        source: CastSource::Ai,
        caster: label(decision.creature),
        spell: decision.spell.clone(),
        outcome,
    }
}

fn decide(engine: &CombatEngine) -> Option<ScenarioOutcome> {
    let (mut characters, mut creatures) = (0usize, 0usize);
    let (mut characters_up, mut creatures_up) = (0usize, 0usize);
    for combatant in engine.roster().iter() {
        let alive = !combatant.is_dead();
        match combatant {
            Combatant::Character(_) => {
                characters += 1;
                characters_up += usize::from(alive);
            }
            Combatant::Creature(_) => {
                creatures += 1;
                creatures_up += usize::from(alive);
            }
        }
    }
    if characters == 0 || creatures == 0 {
        return None;
    }
    if creatures_up == 0 {
        Some(ScenarioOutcome::CharactersWon)
    } else if characters_up == 0 {
        Some(ScenarioOutcome::CreaturesWon)
    } else {
        None
    }
}

fn summarize(combatant: &Combatant, name: String) -> CombatantSummary {
    let vitals = combatant.vitals();
    CombatantSummary {
        id: combatant.id(),
        name,
        level: combatant.level(),
        health: vitals.health(),
        health_max: vitals.health_max(),
        resource: vitals.resource(),
        dead: vitals.is_dead(),
    }
}
