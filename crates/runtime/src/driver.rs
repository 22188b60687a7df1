//! Single-threaded frame loop around a [`CombatEngine`].

use combat_core::CombatEngine;
use tracing::trace;

use crate::ai::{AiDecision, CreatureAi};
use crate::api::Result;
use crate::clock::FixedStepClock;
use crate::events::{EventBus, FrameEvent};

/// Advances an engine in fixed steps.
///
/// One frame runs the creature AI, ticks the engine once with the clock's
/// step, then drains the engine's event queue and republishes every event on
/// the bus. Casts the host issues between frames are drained with the next
/// frame.
#[derive(Debug)]
pub struct FrameDriver {
    engine: CombatEngine,
    clock: FixedStepClock,
    ai: Option<CreatureAi>,
    bus: EventBus,
    frame: u64,
}

/// What one frame produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    pub frame: u64,
    pub decisions: Vec<AiDecision>,
    pub events: Vec<FrameEvent>,
}

impl FrameDriver {
    pub fn new(engine: CombatEngine, step: f32) -> Result<Self> {
        Ok(Self {
            engine,
            clock: FixedStepClock::new(step)?,
            ai: None,
            bus: EventBus::new(),
            frame: 0,
        })
    }

    #[must_use]
    pub fn with_ai(mut self, ai: CreatureAi) -> Self {
        self.ai = Some(ai);
        self
    }

    #[must_use]
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn engine(&self) -> &CombatEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CombatEngine {
        &mut self.engine
    }

    pub fn into_engine(self) -> CombatEngine {
        self.engine
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Frames simulated so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn step_seconds(&self) -> f32 {
        self.clock.step()
    }

    /// Feeds wall-clock time and simulates every step it releases.
    pub fn advance(&mut self, delta: f32) -> Vec<FrameOutput> {
        let steps = self.clock.advance(delta);
        (0..steps).map(|_| self.step()).collect()
    }

    /// Simulates exactly one frame.
    pub fn step(&mut self) -> FrameOutput {
        self.frame += 1;
        let dt = self.clock.step();

        let decisions = match self.ai.as_mut() {
            Some(ai) => ai.update(&mut self.engine, dt),
            None => Vec::new(),
        };
        self.engine.tick(dt);

        let events: Vec<FrameEvent> = self
            .engine
            .drain_events()
            .into_iter()
            .map(|event| FrameEvent {
                frame: self.frame,
                event,
            })
            .collect();
        for event in &events {
            self.bus.publish(event.clone());
        }
        trace!(
            target: "runtime::driver",
            frame = self.frame,
            events = events.len(),
            attacks = decisions.len(),
            "frame simulated"
        );

        FrameOutput {
            frame: self.frame,
            decisions,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::spell::Scaling;
    use combat_core::{
        AttributeKind, Attributes, CastTarget, ClassCatalog, CombatConfig, CombatEvent,
        SpellBook, SpellDefinition, SpellType, StatusEffectKind, StatusEffectSpec, Topic,
    };
    use glam::Vec2;

    fn engine() -> CombatEngine {
        let mut punch = SpellDefinition::new("Heavy Punch", SpellType::Attack);
        punch.base_damage = 20;
        punch.primary_scaling = Scaling::new(AttributeKind::Offense, 1.0);
        punch.secondary_scaling = Scaling::new(AttributeKind::Expertise, 0.0);
        punch.can_crit = false;
        punch.range = 2.0;
        let book: SpellBook = [punch].into_iter().collect();
        CombatEngine::new(CombatConfig::default(), book)
    }

    #[test]
    fn host_casts_are_published_with_the_next_frame() {
        let mut engine = engine();
        let classes = ClassCatalog::builtin();
        let hero = engine.spawn_character("Rook", classes.get("Brawler").unwrap(), Vec2::ZERO);
        let dummy = engine.spawn_creature("Dummy", 1, Attributes::new(), Vec2::X);

        let mut driver = FrameDriver::new(engine, 0.1).unwrap();
        let mut damage_rx = driver.bus().subscribe(Topic::Damage);

        driver
            .engine_mut()
            .cast(hero, "Heavy Punch", CastTarget::Entity(dummy))
            .unwrap();
        assert!(damage_rx.try_recv().is_err());

        let output = driver.step();
        assert_eq!(output.frame, 1);
        assert!(output.decisions.is_empty());
        let published = damage_rx.try_recv().unwrap();
        assert_eq!(published.frame, 1);
        assert!(matches!(
            published.event,
            CombatEvent::DamageDealt { amount: 27, .. }
        ));
    }

    #[test]
    fn periodic_effects_follow_the_fixed_step() {
        let mut engine = engine();
        let dummy = engine.spawn_creature("Dummy", 1, Attributes::new(), Vec2::ZERO);
        let mut burn = StatusEffectSpec::new("Burn", StatusEffectKind::DamageOverTime, 1.0);
        burn.tick_interval = Some(0.5);
        burn.base_value = Some(4);
        engine.apply_status(dummy, dummy, burn).unwrap();

        let mut driver = FrameDriver::new(engine, 0.25).unwrap();
        let before = driver.engine().combatant(dummy).unwrap().vitals().health();
        let outputs = driver.advance(1.0);

        assert_eq!(outputs.len(), 4);
        assert_eq!(driver.frame(), 4);
        let after = driver.engine().combatant(dummy).unwrap().vitals().health();
        assert_eq!(before - after, 8);
        assert!(!driver.engine().has_status(dummy, "Burn"));
    }
}
