//! Damage and healing calculation and delivery.

use glam::Vec2;
use tracing::debug;

use crate::attributes::Attributes;
use crate::entity::Damageable;
use crate::events::{CombatEvent, EventSink};
use crate::ids::EntityId;
use crate::spatial::CombatWorld;
use crate::spell::SpellDefinition;
use crate::stats::DerivedStats;
use crate::vitals::DamageOutcome;

// ============================================================================
// Damage Type
// ============================================================================

/// Damage flavour carried by every hit.
///
/// No resistances are modelled yet; the type is reported in notifications so
/// hosts can pick visuals and sounds.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    Magic,
    Fire,
    Ice,
    Lightning,
    Poison,
    /// Periodic damage from status effects.
    True,
    #[default]
    Physical,
    Magical,
    Radiation,
}

/// One instance of incoming damage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageInfo {
    pub source: EntityId,
    pub amount: i32,
    pub damage_type: DamageType,
    pub is_critical: bool,
    /// Impulse magnitude along source → target.
    pub knockback_force: f32,
    /// Seconds of stun applied if the target survives.
    pub stun_duration: f32,
}

impl DamageInfo {
    pub fn new(source: EntityId, amount: i32, damage_type: DamageType) -> Self {
        Self {
            source,
            amount,
            damage_type,
            is_critical: false,
            knockback_force: 0.0,
            stun_duration: 0.0,
        }
    }

    /// Damage payload of `spell`, carrying its knockback and stun.
    pub fn from_spell(source: EntityId, spell: &SpellDefinition, amount: i32, critical: bool) -> Self {
        Self {
            source,
            amount,
            damage_type: spell.damage_type,
            is_critical: critical,
            knockback_force: spell.knockback_force,
            stun_duration: spell.stun_duration,
        }
    }
}

/// What one resolved target received from a cast or impact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitReport {
    pub target: EntityId,
    /// Health removed.
    pub damage: i32,
    pub critical: bool,
    pub killed: bool,
    /// Health restored.
    pub healed: i32,
}

impl HitReport {
    pub fn new(target: EntityId) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }
}

// ============================================================================
// Formulas
// ============================================================================

/// `round(base + primary + secondary)` with ties to even, floored at `min_amount`.
fn scaled_amount(base: i32, spell: &SpellDefinition, attributes: &Attributes, min_amount: i32) -> i32 {
    let raw = base as f32
        + spell.primary_scaling.contribution(attributes)
        + spell.secondary_scaling.contribution(attributes);
    (raw.round_ties_even() as i32).max(min_amount)
}

/// Spell damage before critical hits.
///
/// # Formula
///
/// ```text
/// raw    = base_damage + primary_attr × primary_factor + secondary_attr × secondary_factor
/// damage = max(round(raw), min_damage)
/// ```
pub fn calculate_damage(spell: &SpellDefinition, caster: &Attributes, min_damage: i32) -> i32 {
    scaled_amount(spell.base_damage, spell, caster, min_damage)
}

/// Spell healing, using the same scaling terms as damage.
pub fn calculate_healing(spell: &SpellDefinition, caster: &Attributes, min_healing: i32) -> i32 {
    scaled_amount(spell.base_healing, spell, caster, min_healing)
}

/// Caster critical chance for `spell`, in percent.
pub fn critical_chance(spell: &SpellDefinition, caster: &Attributes) -> f32 {
    DerivedStats::critical_chance(caster) + spell.critical_chance_bonus
}

/// True when `roll` (uniform in `[0, 100)`) lands under the critical chance.
/// Spells that cannot crit never do.
pub fn roll_critical(spell: &SpellDefinition, caster: &Attributes, roll: f32) -> bool {
    spell.can_crit && roll < critical_chance(spell, caster)
}

/// Applies the spell's direct critical multiplier.
pub fn apply_critical(amount: i32, multiplier: f32) -> i32 {
    (amount as f32 * multiplier).round_ties_even() as i32
}

// ============================================================================
// Delivery
// ============================================================================

/// Applies `info` to `target`, pushes it back along source → target and
/// emits `DamageDealt` (plus `Death` on a killing blow).
///
/// Returns `None` when the target no longer exists.
pub fn deliver_damage<W, S>(
    world: &mut W,
    events: &mut S,
    target: EntityId,
    info: DamageInfo,
) -> Option<DamageOutcome>
where
    W: CombatWorld + ?Sized,
    S: EventSink + ?Sized,
{
    let source_position = world.combatant(info.source).map(|c| c.position());
    let combatant = world.combatant_mut(target)?;
    let outcome = combatant.take_damage(&info);
    if matches!(outcome, DamageOutcome::Ignored) {
        return Some(outcome);
    }
    let remaining_health = combatant.vitals().health();
    let experience_lost = combatant.death_penalty().unwrap_or(0);

    let knockback = match source_position {
        Some(origin) if info.knockback_force > 0.0 && !outcome.is_killing_blow() => {
            (combatant.position() - origin).normalize_or_zero() * info.knockback_force
        }
        _ => Vec2::ZERO,
    };
    if knockback != Vec2::ZERO {
        world.apply_impulse(target, knockback);
    }

    debug!(
        target: "combat::damage",
        source = %info.source,
        %target,
        amount = outcome.dealt(),
        critical = info.is_critical,
        remaining_health,
        "damage dealt"
    );
    events.emit(CombatEvent::DamageDealt {
        source: info.source,
        target,
        amount: outcome.dealt(),
        damage_type: info.damage_type,
        critical: info.is_critical,
        knockback,
        remaining_health,
    });
    if outcome.is_killing_blow() {
        events.emit(CombatEvent::Death {
            entity: target,
            killer: info.source,
            experience_lost,
        });
    }
    Some(outcome)
}

/// Heals `target` and emits `HealingDone`. Returns the health restored, or
/// `None` when the target no longer exists.
pub fn deliver_healing<W, S>(
    world: &mut W,
    events: &mut S,
    source: EntityId,
    target: EntityId,
    amount: i32,
) -> Option<i32>
where
    W: CombatWorld + ?Sized,
    S: EventSink + ?Sized,
{
    let combatant = world.combatant_mut(target)?;
    if combatant.is_dead() {
        return Some(0);
    }
    let healed = combatant.heal(amount);
    debug!(target: "combat::healing", %source, %target, healed, "healing done");
    events.emit(CombatEvent::HealingDone {
        source,
        target,
        amount: healed,
    });
    Some(healed)
}
