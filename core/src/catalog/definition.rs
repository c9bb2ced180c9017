//! Effect definition types
//!
//! Definitions are immutable metadata templates loaded from TOML files
//! that describe what an effect does: duration, stacking, exclusivity,
//! stat modifiers, and the reflect/shield/invoke/compulsion behaviors it
//! grants. Many runtime instances may share one definition; instances
//! never mutate it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use aura_types::{
    BasicAttribute, CompulsionEventType, EffectCategory, EffectEventKind, InvokeType,
};

// ═══════════════════════════════════════════════════════════════════════════
// Effect Definitions
// ═══════════════════════════════════════════════════════════════════════════

/// Definition of one effect at one level.
///
/// Identity is the (id, level) pair: the catalog stores a separate
/// definition per level of the same effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectDefinition {
    /// Effect id (shared across levels)
    pub id: i32,

    /// Effect level this definition describes
    #[serde(default = "crate::serde_defaults::default_level")]
    pub level: i16,

    /// Display/debug name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Duration, stacking, exclusivity, and removal flags
    #[serde(default)]
    pub property: EffectProperty,

    /// Activation condition re-evaluated while the instance is held
    #[serde(default)]
    pub condition: EffectCondition,

    /// Stat modifiers, resistances, and the optional compulsion record
    #[serde(default)]
    pub status: EffectStatus,

    /// Damage-reflection behavior granted while active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflect: Option<ReflectDefinition>,

    /// Absorb-shield behavior granted on apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield: Option<ShieldDefinition>,

    /// Trigger-keyed value/rate records consulted by combat logic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoke: Option<InvokeDefinition>,

    /// Side effects applied to other held effects when this one lands
    #[serde(default)]
    pub update: EffectUpdate,
}

impl EffectDefinition {
    /// Whether applying or removing this effect requires a stat refresh
    pub fn affects_stats(&self) -> bool {
        self.status.affects_stats()
    }
}

/// Duration, stacking, exclusivity, and removal flags for an effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectProperty {
    /// Broad category, used by immunity and cancel matching
    #[serde(default)]
    pub category: EffectCategory,

    /// Behavior tag for kind queries (invincible, untargetable, ...)
    #[serde(default)]
    pub event_kind: EffectEventKind,

    /// Mutual-exclusivity group; 0 = no exclusivity
    #[serde(default)]
    pub group: i32,

    /// Default duration in ms when the caller supplies no override
    #[serde(default)]
    pub duration_ms: i64,

    /// Maximum stack count; 0 = uncapped
    #[serde(default)]
    pub max_stacks: i32,

    // ─── Removal flags ──────────────────────────────────────────────────────
    /// Survives owner death (everything else is stripped on death)
    #[serde(default)]
    pub keep_on_death: bool,

    /// Excluded from the logout snapshot
    #[serde(default)]
    pub remove_on_logout: bool,

    /// Stripped when the owner leaves the field
    #[serde(default)]
    pub remove_on_leave_field: bool,

    /// Stripped when the owner enters a PvP zone
    #[serde(default)]
    pub remove_on_pvp_zone: bool,

    /// Allowed to persist into a PvP zone
    #[serde(default = "crate::serde_defaults::default_true")]
    pub keep_on_enter_pvp_zone: bool,

    /// Duration keeps counting while logged out; restored from a snapshot
    /// even when no time remains
    #[serde(default)]
    pub use_in_game_time: bool,
}

impl Default for EffectProperty {
    fn default() -> Self {
        Self {
            category: EffectCategory::default(),
            event_kind: EffectEventKind::default(),
            group: 0,
            duration_ms: 0,
            max_stacks: 0,
            keep_on_death: false,
            remove_on_logout: false,
            remove_on_leave_field: false,
            remove_on_pvp_zone: false,
            keep_on_enter_pvp_zone: true,
            use_in_game_time: false,
        }
    }
}

/// Activation predicate evaluated against (caster, owner, registry).
///
/// A failed condition disables the instance without destroying it: the
/// slot stays occupied and the duration keeps running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCondition {
    #[default]
    Always,
    /// Owner must be alive
    OwnerAlive,
    /// Owner must be a player actor
    OwnerPlayer,
    /// Owner must currently hold the named effect
    RequiresEffect { effect_id: i32 },
    /// Owner must not hold the named effect
    WithoutEffect { effect_id: i32 },
}

/// Stat modifiers and resistances contributed while the instance is enabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectStatus {
    /// Flat attribute bonuses
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub values: HashMap<BasicAttribute, i64>,

    /// Multiplicative attribute bonuses, applied in the aggregator's rate pass
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub rates: HashMap<BasicAttribute, f32>,

    /// Resistance contributions accumulated on the registry
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub resistances: HashMap<BasicAttribute, f32>,

    /// Forced-behavior override registered while held
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compulsion: Option<CompulsionDefinition>,
}

impl EffectStatus {
    pub fn affects_stats(&self) -> bool {
        !self.values.is_empty() || !self.rates.is_empty()
    }
}

/// Forced-behavior record: `rate` is summed across holders per event type,
/// optionally restricted to specific skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompulsionDefinition {
    pub event_type: CompulsionEventType,
    pub rate: f32,
    /// Empty = applies to any skill
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skill_ids: Vec<i32>,
}

/// Damage-reflection behavior. At most one reflect record is active per
/// actor; a newer one displaces the current slot holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectDefinition {
    /// Effect applied to the attacker on reflect; 0 disables the record
    pub effect_id: i32,
    #[serde(default = "crate::serde_defaults::default_level")]
    pub effect_level: i16,
    /// Chance of reflecting, 0.0..=1.0
    #[serde(default)]
    pub rate: f32,
    /// Flat damage returned
    #[serde(default)]
    pub value: i64,
}

/// Absorb-shield sizing. Exactly one of the two fields is meaningful:
/// a flat pool, or a fraction of the owner's max health at apply time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShieldDefinition {
    #[serde(default)]
    pub hp_value: i64,
    #[serde(default)]
    pub hp_by_target_max_hp: f32,
}

/// Trigger-keyed contributions consulted by combat logic. `types`,
/// `values`, and `rates` are parallel arrays; all records from one
/// definition share the same skill scoping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvokeDefinition {
    pub types: Vec<InvokeType>,
    #[serde(default)]
    pub values: Vec<f32>,
    #[serde(default)]
    pub rates: Vec<f32>,
    /// Skill the records apply to; matched exactly
    #[serde(default)]
    pub skill_id: i32,
    /// Skill group the records apply to; matched against the caller's set
    #[serde(default)]
    pub skill_group_id: i32,
}

/// Side effects applied to the rest of the registry when this effect lands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectUpdate {
    /// Effects removed when this one is applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel: Option<CancelEffect>,

    /// While held, these effect ids cannot be applied to the owner
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub immune_ids: Vec<i32>,

    /// While held, effects of these categories cannot be applied
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub immune_categories: Vec<EffectCategory>,

    /// Skill cooldowns reset on apply (player owners only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reset_cooldowns: Vec<i32>,
}

/// Cancel-on-apply rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelEffect {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<EffectCategory>,

    /// Only cancel listed ids when they were applied by the same caster
    #[serde(default)]
    pub check_same_caster: bool,
}

// ═══════════════════════════════════════════════════════════════════════════
// Config File Structure
// ═══════════════════════════════════════════════════════════════════════════

/// Root structure for effect catalog files (TOML)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Effect definitions in this file
    #[serde(default, rename = "effect")]
    pub effects: Vec<EffectDefinition>,
}
