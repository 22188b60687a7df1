//! Central owner and ticker of active status effects.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::combat::{DamageInfo, DamageType, deliver_damage, deliver_healing};
use crate::config::CombatConfig;
use crate::entity::{Damageable, StatusEffectTarget};
use crate::events::{CombatEvent, EventSink, RemovalReason};
use crate::ids::{EffectId, EntityId};
use crate::spatial::CombatWorld;

use super::effect::{ActiveStatusEffect, StatusApplication, StatusEffectKind};
use super::visuals::{EffectVisuals, NoVisuals};

/// Active effects per target.
///
/// Effects are presence-keyed: a target holds at most one effect per name, and
/// re-applying a name only refreshes the remaining duration.
pub struct StatusEffectManager {
    effects: BTreeMap<EntityId, Vec<ActiveStatusEffect>>,
    last_id: EffectId,
    default_tick_interval: f32,
    defense_step: f32,
    visuals: Box<dyn EffectVisuals>,
}

impl StatusEffectManager {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            effects: BTreeMap::new(),
            last_id: EffectId::default(),
            default_tick_interval: config.default_tick_interval,
            defense_step: config.status_modifier_step,
            visuals: Box::new(NoVisuals),
        }
    }

    #[must_use]
    pub fn with_visuals(mut self, visuals: impl EffectVisuals + 'static) -> Self {
        self.visuals = Box::new(visuals);
        self
    }

    pub fn set_visuals(&mut self, visuals: Box<dyn EffectVisuals>) {
        self.visuals = visuals;
    }

    /// Interval used when neither the effect nor its spell set one.
    pub fn default_tick_interval(&self) -> f32 {
        self.default_tick_interval
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn has(&self, target: EntityId, name: &str) -> bool {
        self.effects_on(target).iter().any(|e| e.name == name)
    }

    pub fn effects_on(&self, target: EntityId) -> &[ActiveStatusEffect] {
        self.effects.get(&target).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, target: EntityId, id: EffectId) -> Option<&ActiveStatusEffect> {
        self.effects_on(target).iter().find(|e| e.id == id)
    }

    /// Every active effect, grouped by target in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatusEffect> {
        self.effects.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.effects.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn last_id(&self) -> EffectId {
        self.last_id
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Applies an effect to `target`, or refreshes the same-name effect it
    /// already carries.
    ///
    /// A new effect attaches its reversible modifier and spawns its visual
    /// immediately. Returns the id of the new or refreshed effect, or `None`
    /// when the target is missing or dead.
    pub fn apply<W, S>(
        &mut self,
        world: &mut W,
        events: &mut S,
        target: EntityId,
        application: &StatusApplication,
    ) -> Option<EffectId>
    where
        W: CombatWorld + ?Sized,
        S: EventSink + ?Sized,
    {
        let combatant = world.combatant_mut(target)?;
        if combatant.is_dead() {
            return None;
        }

        let spec = &application.spec;
        let list = self.effects.entry(target).or_default();
        if let Some(existing) = list.iter_mut().find(|e| e.name == spec.name) {
            existing.remaining = spec.duration;
            trace!(
                target: "combat::status",
                %target,
                effect = %existing.id,
                name = %existing.name,
                remaining = existing.remaining,
                "status effect refreshed"
            );
            events.emit(CombatEvent::EffectApplied {
                source: application.source,
                target,
                effect: existing.id,
                name: existing.name.clone(),
                kind: existing.kind,
                refreshed: true,
            });
            return Some(existing.id);
        }

        self.last_id = self.last_id.next();
        let mut effect = ActiveStatusEffect::new(self.last_id, target, application);
        if let Some(modifier) = effect.kind.modifier(effect.potency, self.defense_step) {
            combatant.attach_modifier(effect.id, modifier);
        }
        effect.visual = effect
            .visual_key
            .as_deref()
            .and_then(|key| self.visuals.spawn(target, key));

        debug!(
            target: "combat::status",
            %target,
            effect = %effect.id,
            name = %effect.name,
            kind = %effect.kind,
            duration = effect.remaining,
            "status effect applied"
        );
        events.emit(CombatEvent::EffectApplied {
            source: effect.source,
            target,
            effect: effect.id,
            name: effect.name.clone(),
            kind: effect.kind,
            refreshed: false,
        });

        let id = effect.id;
        list.push(effect);
        Some(id)
    }

    /// Removes one effect by id, undoing its modifier. Returns whether it existed.
    pub fn remove<W, S>(&mut self, world: &mut W, events: &mut S, target: EntityId, id: EffectId) -> bool
    where
        W: CombatWorld + ?Sized,
        S: EventSink + ?Sized,
    {
        let Some(list) = self.effects.get_mut(&target) else {
            return false;
        };
        let Some(index) = list.iter().position(|e| e.id == id) else {
            return false;
        };
        let effect = list.remove(index);
        if list.is_empty() {
            self.effects.remove(&target);
        }
        self.finish(world, events, effect, RemovalReason::Dispelled);
        true
    }

    /// Removes every effect on `target`. Returns how many were removed.
    pub fn clear_target<W, S>(&mut self, world: &mut W, events: &mut S, target: EntityId) -> usize
    where
        W: CombatWorld + ?Sized,
        S: EventSink + ?Sized,
    {
        let effects = self.effects.remove(&target).unwrap_or_default();
        let count = effects.len();
        for effect in effects {
            self.finish(world, events, effect, RemovalReason::Dispelled);
        }
        count
    }

    /// Advances every effect by `delta` seconds.
    ///
    /// Each effect's duration and accumulator move once per call; periodic
    /// payloads fire when the accumulator crosses the interval. Expired
    /// effects are removed after their target's sweep, and targets that left
    /// the world have their effects dropped.
    pub fn tick<W, S>(&mut self, world: &mut W, events: &mut S, delta: f32)
    where
        W: CombatWorld + ?Sized,
        S: EventSink + ?Sized,
    {
        let targets: Vec<EntityId> = self.effects.keys().copied().collect();
        for target in targets {
            let Some(effects) = self.effects.remove(&target) else {
                continue;
            };

            if !world.contains(target) {
                trace!(target: "combat::status", %target, "dropping effects of missing target");
                for effect in effects {
                    self.finish(world, events, effect, RemovalReason::TargetGone);
                }
                continue;
            }

            let mut kept = Vec::with_capacity(effects.len());
            let mut expired = Vec::new();
            for mut effect in effects {
                let progress = effect.advance(delta);
                if progress.fired {
                    Self::deliver_payload(world, events, &effect);
                }
                if progress.expired {
                    expired.push(effect);
                } else {
                    kept.push(effect);
                }
            }

            for effect in expired {
                self.finish(world, events, effect, RemovalReason::Expired);
            }
            if !kept.is_empty() {
                self.effects.insert(target, kept);
            }
        }
    }

    fn deliver_payload<W, S>(world: &mut W, events: &mut S, effect: &ActiveStatusEffect)
    where
        W: CombatWorld + ?Sized,
        S: EventSink + ?Sized,
    {
        let amount = effect.payload();
        if amount <= 0 {
            return;
        }
        trace!(
            target: "combat::status",
            target_id = %effect.target,
            effect = %effect.id,
            amount,
            "periodic payload"
        );
        match effect.kind {
            StatusEffectKind::DamageOverTime => {
                let info = DamageInfo::new(effect.source, amount, DamageType::True);
                deliver_damage(world, events, effect.target, info);
            }
            StatusEffectKind::HealOverTime => {
                deliver_healing(world, events, effect.source, effect.target, amount);
            }
            _ => {}
        }
    }

    /// Undoes the effect's modifier, releases its visual and reports removal.
    fn finish<W, S>(
        &mut self,
        world: &mut W,
        events: &mut S,
        effect: ActiveStatusEffect,
        reason: RemovalReason,
    ) where
        W: CombatWorld + ?Sized,
        S: EventSink + ?Sized,
    {
        if let Some(combatant) = world.combatant_mut(effect.target) {
            combatant.detach_modifier(effect.id);
        }
        if let Some(handle) = effect.visual {
            self.visuals.release(handle);
        }
        debug!(
            target: "combat::status",
            target_id = %effect.target,
            effect = %effect.id,
            name = %effect.name,
            %reason,
            "status effect removed"
        );
        events.emit(CombatEvent::EffectRemoved {
            target: effect.target,
            effect: effect.id,
            name: effect.name,
            reason,
        });
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Copies of every active effect without their visual handles.
    pub fn export(&self) -> Vec<ActiveStatusEffect> {
        self.iter()
            .cloned()
            .map(|mut effect| {
                effect.visual = None;
                effect
            })
            .collect()
    }

    /// Replaces all active effects. Visuals are respawned from their keys;
    /// modifiers are expected to come back with the targets' own state.
    pub fn restore(&mut self, effects: Vec<ActiveStatusEffect>, last_id: EffectId) {
        for handle in self.iter().filter_map(|e| e.visual).collect::<Vec<_>>() {
            self.visuals.release(handle);
        }
        self.effects.clear();

        let mut highest = last_id;
        for mut effect in effects {
            highest = highest.max(effect.id);
            effect.visual = effect
                .visual_key
                .as_deref()
                .and_then(|key| self.visuals.spawn(effect.target, key));
            self.effects.entry(effect.target).or_default().push(effect);
        }
        self.last_id = highest;
    }
}

impl fmt::Debug for StatusEffectManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusEffectManager")
            .field("effects", &self.effects)
            .field("last_id", &self.last_id)
            .field("default_tick_interval", &self.default_tick_interval)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::attributes::Attributes;
    use crate::entity::{Creature, SpellCaster};
    use crate::roster::Roster;
    use crate::spell::StatusEffectSpec;
    use crate::status::VisualHandle;

    const TARGET: EntityId = EntityId(1);
    const SOURCE: EntityId = EntityId(9);

    fn world() -> Roster {
        let mut roster = Roster::new();
        roster.insert(Creature::new(TARGET, "Ghoul", 1, Attributes::new()));
        roster
    }

    fn manager() -> StatusEffectManager {
        StatusEffectManager::new(&CombatConfig::default())
    }

    fn application(name: &str, kind: StatusEffectKind, duration: f32) -> StatusApplication {
        StatusApplication::standalone(SOURCE, StatusEffectSpec::new(name, kind, duration), 1.0)
    }

    fn health(world: &Roster) -> i32 {
        world.get(TARGET).unwrap().vitals().health()
    }

    #[test]
    fn reapplying_refreshes_instead_of_stacking() {
        let mut world = world();
        let mut events = Vec::new();
        let mut manager = manager();

        let first = manager
            .apply(&mut world, &mut events, TARGET, &application("Burn", StatusEffectKind::Debuff, 5.0))
            .unwrap();
        manager.tick(&mut world, &mut events, 2.0);
        let second = manager
            .apply(&mut world, &mut events, TARGET, &application("Burn", StatusEffectKind::Debuff, 8.0))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.effects_on(TARGET).len(), 1);
        assert_eq!(manager.effects_on(TARGET)[0].remaining, 8.0);
        assert!(matches!(
            events.last(),
            Some(CombatEvent::EffectApplied { refreshed: true, .. })
        ));
    }

    #[test]
    fn damage_over_time_ticks_then_expires() {
        let mut world = world();
        world
            .get_mut(TARGET)
            .unwrap()
            .take_damage(&DamageInfo::new(SOURCE, 10, DamageType::Physical));
        assert_eq!(health(&world), 100);

        let mut events = Vec::new();
        let mut manager = manager();
        let mut spec = StatusEffectSpec::new("Bleed", StatusEffectKind::DamageOverTime, 4.0);
        spec.tick_interval = Some(1.0);
        spec.base_value = Some(10);
        manager.apply(
            &mut world,
            &mut events,
            TARGET,
            &StatusApplication::standalone(SOURCE, spec, 1.0),
        );

        for _ in 0..3 {
            manager.tick(&mut world, &mut events, 1.0);
        }
        assert_eq!(health(&world), 70);
        assert!(manager.has(TARGET, "Bleed"));

        manager.tick(&mut world, &mut events, 1.0);
        assert_eq!(health(&world), 60);
        assert!(!manager.has(TARGET, "Bleed"));
        assert!(manager.is_empty());

        let hits = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::DamageDealt { damage_type: DamageType::True, .. }))
            .count();
        assert_eq!(hits, 4);
        assert!(matches!(
            events.last(),
            Some(CombatEvent::EffectRemoved {
                reason: RemovalReason::Expired,
                ..
            })
        ));
    }

    #[test]
    fn heal_over_time_restores_health() {
        let mut world = world();
        world
            .get_mut(TARGET)
            .unwrap()
            .take_damage(&DamageInfo::new(SOURCE, 50, DamageType::Physical));

        let mut events = Vec::new();
        let mut manager = manager();
        let mut spec = StatusEffectSpec::new("Regrowth", StatusEffectKind::HealOverTime, 2.0);
        spec.base_value = Some(8);
        spec.potency = 1.5;
        manager.apply(
            &mut world,
            &mut events,
            TARGET,
            &StatusApplication::standalone(SOURCE, spec, 1.0),
        );
        manager.tick(&mut world, &mut events, 1.0);
        manager.tick(&mut world, &mut events, 1.0);

        assert_eq!(health(&world), 60 + 24);
    }

    #[test]
    fn modifiers_are_undone_on_expiry_and_removal() {
        let mut world = world();
        let mut events = Vec::new();
        let mut manager = manager();

        manager.apply(&mut world, &mut events, TARGET, &application("Chill", StatusEffectKind::Slow, 1.0));
        let stun = manager
            .apply(&mut world, &mut events, TARGET, &application("Daze", StatusEffectKind::Stun, 10.0))
            .unwrap();

        let target = world.get(TARGET).unwrap();
        assert!(target.movement_speed() < Creature::DEFAULT_MOVE_SPEED);
        assert!(target.is_stunned());

        manager.tick(&mut world, &mut events, 1.0);
        let target = world.get(TARGET).unwrap();
        assert_eq!(target.movement_speed(), Creature::DEFAULT_MOVE_SPEED);
        assert!(target.is_stunned());

        assert!(manager.remove(&mut world, &mut events, TARGET, stun));
        assert!(!world.get(TARGET).unwrap().is_stunned());
        assert!(!manager.remove(&mut world, &mut events, TARGET, stun));
        assert!(matches!(
            events.last(),
            Some(CombatEvent::EffectRemoved {
                reason: RemovalReason::Dispelled,
                ..
            })
        ));
    }

    #[test]
    fn defense_debuff_lowers_damage_reduction() {
        let mut world = world();
        let mut events = Vec::new();
        let mut manager = manager();

        let mut attrs = Attributes::new();
        attrs.set(crate::attributes::AttributeKind::Resilience, 40);
        world.insert(Creature::new(EntityId(2), "Knight", 1, attrs));
        assert_eq!(world.get(EntityId(2)).unwrap().damage_reduction(), 20.0);

        manager.apply(
            &mut world,
            &mut events,
            EntityId(2),
            &application("Sunder", StatusEffectKind::DefenseDebuff, 3.0),
        );
        assert_eq!(world.get(EntityId(2)).unwrap().damage_reduction(), 10.0);
    }

    #[test]
    fn missing_targets_are_dropped_on_tick() {
        let mut world = world();
        let mut events = Vec::new();
        let mut manager = manager();
        manager.apply(&mut world, &mut events, TARGET, &application("Burn", StatusEffectKind::Debuff, 5.0));

        world.remove(TARGET);
        manager.tick(&mut world, &mut events, 0.1);

        assert!(manager.is_empty());
        assert!(matches!(
            events.last(),
            Some(CombatEvent::EffectRemoved {
                reason: RemovalReason::TargetGone,
                ..
            })
        ));
    }

    #[test]
    fn dead_or_missing_targets_reject_effects() {
        let mut world = world();
        let mut events = Vec::new();
        let mut manager = manager();
        let burn = application("Burn", StatusEffectKind::Debuff, 5.0);

        assert!(manager.apply(&mut world, &mut events, EntityId(42), &burn).is_none());
        world
            .get_mut(TARGET)
            .unwrap()
            .take_damage(&DamageInfo::new(SOURCE, 10_000, DamageType::True));
        assert!(manager.apply(&mut world, &mut events, TARGET, &burn).is_none());
        assert!(manager.is_empty());
    }

    #[derive(Clone, Default)]
    struct CountingVisuals {
        live: Arc<AtomicU64>,
    }

    impl EffectVisuals for CountingVisuals {
        fn spawn(&mut self, _target: EntityId, _key: &str) -> Option<VisualHandle> {
            Some(VisualHandle(self.live.fetch_add(1, Ordering::SeqCst) + 1))
        }

        fn release(&mut self, _handle: VisualHandle) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn visuals_are_released_with_their_effect() {
        let visuals = CountingVisuals::default();
        let live = visuals.live.clone();
        let mut world = world();
        let mut events = Vec::new();
        let mut manager = manager().with_visuals(visuals);

        let mut spec = StatusEffectSpec::new("Burn", StatusEffectKind::Debuff, 1.0);
        spec.visual = Some("fx/flames".into());
        manager.apply(
            &mut world,
            &mut events,
            TARGET,
            &StatusApplication::standalone(SOURCE, spec.clone(), 1.0),
        );
        manager.apply(
            &mut world,
            &mut events,
            TARGET,
            &StatusApplication::standalone(SOURCE, spec, 1.0),
        );
        assert_eq!(live.load(Ordering::SeqCst), 1, "refresh spawns nothing");

        manager.tick(&mut world, &mut events, 1.0);
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn export_and_restore_round_trip() {
        let mut world = world();
        let mut events = Vec::new();
        let mut manager = manager();
        manager.apply(&mut world, &mut events, TARGET, &application("Burn", StatusEffectKind::Debuff, 5.0));
        manager.tick(&mut world, &mut events, 1.5);

        let saved = manager.export();
        let last_id = manager.last_id();
        manager.tick(&mut world, &mut events, 10.0);
        assert!(manager.is_empty());

        manager.restore(saved.clone(), last_id);
        assert_eq!(manager.export(), saved);
        let next = manager
            .apply(&mut world, &mut events, TARGET, &application("Chill", StatusEffectKind::Slow, 1.0))
            .unwrap();
        assert!(next > last_id, "ids keep increasing after restore");
    }
}
