//! Spell book loader.

use std::path::Path;

use combat_core::{SpellBook, SpellDefinition, TargetingMode};
use tracing::warn;

use crate::loaders::{LoadResult, read_file};

#[derive(serde::Deserialize)]
struct SpellFile {
    spells: Vec<SpellDefinition>,
}

/// Loader for spell definitions from RON files.
///
/// RON format: `(spells: [ (id: "...", spell_type: Attack, ...), ... ])`.
/// Every field except `id` is optional.
pub struct SpellLoader;

impl SpellLoader {
    pub fn load(path: &Path) -> LoadResult<SpellBook> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SpellBook> {
        let file: SpellFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spells RON: {}", e))?;

        let mut book = SpellBook::new();
        for spell in file.spells {
            if spell.id.as_str().is_empty() {
                anyhow::bail!("Spell definition without an id");
            }
            if spell.range < 0.0 || spell.cooldown < 0.0 || spell.resource_cost < 0 {
                anyhow::bail!("Spell {} has a negative range, cooldown or cost", spell.id);
            }
            if spell.projectile.is_some() && spell.targeting == TargetingMode::SelfOnly {
                warn!(
                    target: "combat::content",
                    spell = %spell.id,
                    "self-targeted spell carries a projectile profile; it will resolve instantly"
                );
            }
            let id = spell.id.clone();
            if book.insert(spell).is_some() {
                anyhow::bail!("Duplicate spell definition: {}", id);
            }
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::embedded;
    use combat_core::{AttributeKind, SpellType, StatusEffectKind};

    #[test]
    fn embedded_heavy_punch() {
        let book = SpellLoader::parse(embedded::SPELLS).unwrap();
        let punch = book.get("Heavy Punch").unwrap();
        assert_eq!(punch.spell_type, SpellType::Attack);
        assert_eq!(punch.base_damage, 20);
        assert_eq!(punch.primary_scaling.attribute, AttributeKind::Offense);
        assert_eq!(punch.primary_scaling.factor, 1.0);
        assert_eq!(punch.secondary_scaling.factor, 0.0);
        assert!(!punch.can_crit);
        assert!(punch.range >= 1.0);
        assert_eq!(punch.class_requirement.as_deref(), Some("Brawler"));
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let book = SpellLoader::parse(r#"(spells: [(id: "Poke")])"#).unwrap();
        let poke = book.get("Poke").unwrap();
        assert_eq!(poke, &SpellDefinition::new("Poke", SpellType::default()));
    }

    #[test]
    fn embedded_book_covers_payload_kinds() {
        let book = SpellLoader::parse(embedded::SPELLS).unwrap();
        assert!(book.get("Radiation Bolt").unwrap().projectile.is_some());
        assert!(book.get("Isotope Drain").unwrap().is_aoe());
        assert!(book.get("Fortune's Favor").unwrap().heals());
        assert!(book.get("Trick Shot").unwrap().stun_duration > 0.0);

        let kinds: Vec<StatusEffectKind> = book
            .iter()
            .flat_map(|spell| spell.status_effects.iter().map(|spec| spec.kind))
            .collect();
        for kind in [
            StatusEffectKind::DamageOverTime,
            StatusEffectKind::HealOverTime,
            StatusEffectKind::Slow,
            StatusEffectKind::SpeedBuff,
            StatusEffectKind::DefenseDebuff,
        ] {
            assert!(kinds.contains(&kind), "no spell applies {kind}");
        }
    }

    #[test]
    fn rejects_duplicates_and_negative_costs() {
        let dup = r#"(spells: [(id: "Poke"), (id: "Poke")])"#;
        assert!(SpellLoader::parse(dup).is_err());

        let negative = r#"(spells: [(id: "Poke", resource_cost: -5)])"#;
        assert!(SpellLoader::parse(negative).is_err());
    }
}
