//! Field (map) profile consumed by the registry's field lifecycle hooks
//!
//! A field supplies the effects every actor receives on entry, plus the
//! zone/region classification that drives PvP stripping and static region
//! bonuses.

use serde::{Deserialize, Serialize};

/// Effect granted to every actor entering a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntranceEffect {
    pub id: i32,
    #[serde(default = "crate::serde_defaults::default_level")]
    pub level: i16,
}

/// PvP classification of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    #[default]
    Normal,
    Pvp,
}

/// World region a field belongs to. Regions with standing bonuses are
/// listed in [`crate::game_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FieldRegion {
    #[default]
    Default = 0,
    ShadowRealm = 1,
    Arena = 2,
}

/// Static per-field metadata the registry consults on enter/leave.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldProfile {
    #[serde(default)]
    pub entrance_effects: Vec<EntranceEffect>,
    #[serde(default)]
    pub zone: ZoneKind,
    #[serde(default)]
    pub region: FieldRegion,
}
