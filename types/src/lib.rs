//! Shared plain types for the aura status-effect engine
//!
//! This crate contains serializable types that are shared between the
//! engine core (aura-core) and the server layers that embed it: actor
//! handles, attribute enums, effect classification enums, the events the
//! engine emits, and the snapshot format the persistence layer consumes.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Actor Handles
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque handle identifying an actor (player or NPC) in the hosting world.
///
/// The engine never owns actors; it stores these handles and leaves
/// resolution to the external actor table. A handle may refer to an actor
/// that has since disconnected - holders must tolerate that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub i64);

impl ActorId {
    /// Sentinel for "no actor" (system-applied effects).
    pub const NONE: ActorId = ActorId(0);

    pub fn get(&self) -> i64 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Attributes
// ─────────────────────────────────────────────────────────────────────────────

/// Numeric combat attribute tracked by the stat aggregator.
///
/// Flat values, rate bonuses, and resistance contributions are all keyed
/// by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicAttribute {
    Strength,
    Dexterity,
    Intelligence,
    Luck,
    Health,
    HpRegen,
    Spirit,
    SpRegen,
    Stamina,
    StaminaRegen,
    AttackSpeed,
    MovementSpeed,
    Accuracy,
    Evasion,
    CriticalRate,
    CriticalDamage,
    CriticalEvasion,
    Defense,
    JumpHeight,
    PhysicalAtk,
    MagicalAtk,
    PhysicalRes,
    MagicalRes,
    MountSpeed,
}

impl BasicAttribute {
    /// Attributes whose `current` value is spent/restored during play
    /// rather than derived purely from gear and effects.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Health | Self::Spirit | Self::Stamina)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Effect Classification
// ─────────────────────────────────────────────────────────────────────────────

/// Broad effect category, used by immunity and cancel-on-apply matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    #[default]
    Standard,
    Stun,
    Slow,
    Poison,
    Burning,
    Freeze,
    Shield,
    Stealth,
}

/// Behavior tag queried by combat logic via `has_effect_kind`.
///
/// Orthogonal to [`EffectCategory`]: the category describes what an effect
/// *is* for conflict resolution, the kind describes a behavior the combat
/// layer asks about ("is this actor currently invincible?").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectEventKind {
    #[default]
    None,
    Invincible,
    Untargetable,
    SafeZone,
    Exhausted,
}

/// Trigger on which an invoke record is consulted by combat logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvokeType {
    IncreaseSkillDamage,
    IncreaseSkillRate,
    IncreaseEffectDuration,
    IncreaseEffectValue,
    ReduceCooldown,
}

/// Game-event category a compulsion (forced-behavior) record overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompulsionEventType {
    ForceCritical,
    ForceEvade,
    BlockSkillUse,
    ForceMiss,
}

// ─────────────────────────────────────────────────────────────────────────────
// Emitted Events
// ─────────────────────────────────────────────────────────────────────────────

/// Notification emitted by the effect registry to the owning actor's
/// observers whenever visible effect state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectEvent {
    /// A new effect instance was created.
    Added {
        instance_id: i32,
        effect_id: i32,
        level: i16,
    },
    /// An existing instance stacked or otherwise changed in place.
    Updated { instance_id: i32, stacks: i32 },
    /// An instance was removed or evicted.
    Removed { instance_id: i32 },
}

impl EffectEvent {
    /// The local instance id this event refers to.
    pub fn instance_id(&self) -> i32 {
        match self {
            Self::Added { instance_id, .. }
            | Self::Updated { instance_id, .. }
            | Self::Removed { instance_id } => *instance_id,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Persistence Snapshots
// ─────────────────────────────────────────────────────────────────────────────

/// Saveable state of one effect instance, produced at logout and fed back
/// through `restore_effects` at login.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    pub effect_id: i32,
    pub level: i16,
    pub stacks: i32,
    /// Remaining duration at snapshot time. Zero or negative means the
    /// effect had already run out; it is only restored when its definition
    /// tracks in-game time.
    pub ms_remaining: i64,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_id_none_sentinel() {
        assert!(ActorId::NONE.is_none());
        assert!(!ActorId(7).is_none());
    }

    #[test]
    fn effect_event_instance_id() {
        let added = EffectEvent::Added {
            instance_id: 3,
            effect_id: 100,
            level: 1,
        };
        let removed = EffectEvent::Removed { instance_id: 9 };
        assert_eq!(added.instance_id(), 3);
        assert_eq!(removed.instance_id(), 9);
    }

    #[test]
    fn resource_attributes() {
        assert!(BasicAttribute::Health.is_resource());
        assert!(!BasicAttribute::CriticalRate.is_resource());
    }
}
