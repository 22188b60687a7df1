//! Combat resolution helpers.
//!
//! Pure formulas for spell damage, healing and critical hits live in
//! [`damage`]; [`targeting`] turns a cast's aim into the list of entities it
//! affects. Both are used by the spell engine and by projectile impacts so the
//! two delivery paths resolve hits identically.
//!
//! # Core Functions
//!
//! - `calculate_damage` / `calculate_healing`: base + two scaling terms,
//!   rounded and floored
//! - `roll_critical`: percentage roll against the caster's critical chance
//! - `deliver_damage` / `deliver_healing`: apply to a world target and emit
//!   notifications
//! - `resolve_targets`: Self / Position / Direction / AoE target sets

pub mod damage;
pub mod targeting;

pub use damage::{
    DamageInfo, DamageType, HitReport, apply_critical, calculate_damage, calculate_healing,
    critical_chance, deliver_damage, deliver_healing, roll_critical,
};
pub use targeting::{TargetQuery, resolve_targets};
