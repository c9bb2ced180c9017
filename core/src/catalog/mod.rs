//! Effect catalog: immutable metadata lookup
//!
//! The catalog owns every [`EffectDefinition`] known to the server,
//! keyed by (effect id, level). Definitions are loaded once from TOML
//! files and shared read-only behind `Arc` by every registry and
//! instance that references them.

mod definition;
mod error;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use hashbrown::HashMap;

pub use definition::{
    CancelEffect, CatalogConfig, CompulsionDefinition, EffectCondition, EffectDefinition,
    EffectProperty, EffectStatus, EffectUpdate, InvokeDefinition, ReflectDefinition,
    ShieldDefinition,
};
pub use error::CatalogError;

/// Read-only lookup of effect definitions by (id, level).
#[derive(Debug, Clone, Default)]
pub struct EffectCatalog {
    effects: HashMap<(i32, i16), Arc<EffectDefinition>>,
}

impl EffectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add definitions. If `overwrite` is true, replaces existing definitions
    /// with the same (id, level). Returns the keys of duplicates encountered
    /// (skipped if !overwrite, replaced if overwrite).
    pub fn add_definitions(
        &mut self,
        definitions: Vec<EffectDefinition>,
        overwrite: bool,
    ) -> Vec<(i32, i16)> {
        let mut duplicates = Vec::new();
        for definition in definitions {
            let key = (definition.id, definition.level);
            if self.effects.contains_key(&key) {
                duplicates.push(key);
                if !overwrite {
                    continue; // Keep the first definition
                }
            }
            self.effects.insert(key, Arc::new(definition));
        }
        duplicates
    }

    /// Look up the definition for an effect at a specific level.
    pub fn try_get(&self, effect_id: i32, level: i16) -> Option<Arc<EffectDefinition>> {
        self.effects.get(&(effect_id, level)).cloned()
    }

    /// Whether any level of the given effect id is known.
    pub fn contains_id(&self, effect_id: i32) -> bool {
        self.effects.keys().any(|&(id, _)| id == effect_id)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Load a catalog from a directory of TOML files, recursively.
    /// Duplicate (id, level) pairs across files are first-wins and logged.
    pub fn load_from_dir(dir: &Path) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        if !dir.exists() {
            return Ok(catalog);
        }
        load_dir_recursive(dir, &mut catalog)?;
        Ok(catalog)
    }
}

/// Load effect definitions from a single TOML file.
pub fn load_definitions_from_file(path: &Path) -> Result<Vec<EffectDefinition>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let config: CatalogConfig =
        toml::from_str(&content).map_err(|source| CatalogError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;

    for definition in &config.effects {
        if definition.id <= 0 {
            return Err(CatalogError::InvalidDefinition {
                path: path.to_path_buf(),
                reason: format!("effect id must be positive, got {}", definition.id),
            });
        }
        if definition.level <= 0 {
            return Err(CatalogError::InvalidDefinition {
                path: path.to_path_buf(),
                reason: format!(
                    "effect {} level must be positive, got {}",
                    definition.id, definition.level
                ),
            });
        }
    }

    Ok(config.effects)
}

fn load_dir_recursive(dir: &Path, catalog: &mut EffectCatalog) -> Result<(), CatalogError> {
    let entries = fs::read_dir(dir).map_err(|source| CatalogError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            load_dir_recursive(&path, catalog)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            let definitions = load_definitions_from_file(&path)?;
            let duplicates = catalog.add_definitions(definitions, false);
            for (id, level) in duplicates {
                tracing::warn!(
                    effect_id = id,
                    level,
                    path = %path.display(),
                    "duplicate effect definition skipped"
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_definition(id: i32, level: i16) -> EffectDefinition {
        EffectDefinition {
            id,
            level,
            name: None,
            property: EffectProperty::default(),
            condition: EffectCondition::Always,
            status: EffectStatus::default(),
            reflect: None,
            shield: None,
            invoke: None,
            update: EffectUpdate::default(),
        }
    }

    #[test]
    fn try_get_is_level_specific() {
        let mut catalog = EffectCatalog::new();
        catalog.add_definitions(vec![make_definition(100, 1), make_definition(100, 2)], false);

        assert!(catalog.try_get(100, 1).is_some());
        assert!(catalog.try_get(100, 2).is_some());
        assert!(catalog.try_get(100, 3).is_none());
        assert!(catalog.try_get(200, 1).is_none());
        assert!(catalog.contains_id(100));
        assert!(!catalog.contains_id(200));
    }

    #[test]
    fn duplicates_are_first_wins_unless_overwrite() {
        let mut catalog = EffectCatalog::new();
        let mut first = make_definition(100, 1);
        first.name = Some("first".to_string());
        let mut second = make_definition(100, 1);
        second.name = Some("second".to_string());

        let duplicates = catalog.add_definitions(vec![first, second.clone()], false);
        assert_eq!(duplicates, vec![(100, 1)]);
        assert_eq!(
            catalog.try_get(100, 1).and_then(|d| d.name.clone()),
            Some("first".to_string())
        );

        catalog.add_definitions(vec![second], true);
        assert_eq!(
            catalog.try_get(100, 1).and_then(|d| d.name.clone()),
            Some("second".to_string())
        );
    }

    #[test]
    fn parses_definition_from_toml() {
        let config: CatalogConfig = toml::from_str(
            r#"
            [[effect]]
            id = 100
            level = 1
            name = "Iron Skin"

            [effect.property]
            category = "standard"
            group = 3
            duration_ms = 5000
            max_stacks = 4

            [effect.status.values]
            defense = 50

            [effect.status.rates]
            physical_atk = 0.1

            [effect.status.resistances]
            magical_res = 0.25

            [effect.shield]
            hp_by_target_max_hp = 0.3

            [effect.update]
            immune_ids = [200]
            "#,
        )
        .unwrap();

        assert_eq!(config.effects.len(), 1);
        let definition = &config.effects[0];
        assert_eq!(definition.id, 100);
        assert_eq!(definition.property.group, 3);
        assert_eq!(definition.property.duration_ms, 5000);
        assert_eq!(definition.property.max_stacks, 4);
        assert!(definition.affects_stats());
        assert_eq!(
            definition.shield.as_ref().map(|s| s.hp_by_target_max_hp),
            Some(0.3)
        );
        assert_eq!(definition.update.immune_ids, vec![200]);
        // Omitted flags take their defaults
        assert!(definition.property.keep_on_enter_pvp_zone);
        assert!(!definition.property.keep_on_death);
    }
}
