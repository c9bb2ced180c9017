//! Actor capability surface
//!
//! The effect registry is owned by its actor but never reaches into the
//! actor type directly; everything it needs is expressed here. Callers
//! pass the surface into each mutating entry point so the actor can
//! split-borrow itself (registry and stats are sibling fields).
//!
//! Optional capabilities (cooldown resets, progression hooks) are default
//! no-op methods: non-player actors simply don't override them.

use aura_types::{ActorId, EffectEvent};

use crate::stats::StatAggregator;

/// What the registry consumes from its owning actor.
pub trait ActorSurface {
    /// Stable handle for this actor in the external actor table.
    fn actor_id(&self) -> ActorId;

    /// Monotonic simulation tick for this actor's field.
    fn current_tick(&self) -> i64;

    /// Player vs. non-player. Progression hooks and cooldown resets only
    /// fire for players.
    fn is_player(&self) -> bool;

    fn is_dead(&self) -> bool;

    /// Max health at this instant, for percentage-sized shields.
    fn max_health(&self) -> i64;

    /// The actor's stat aggregator. Refreshed by the registry whenever a
    /// status-affecting effect is added or removed.
    fn stats(&mut self) -> &mut StatAggregator;

    /// Deliver an effect event to this actor's observers.
    fn emit(&mut self, event: EffectEvent);

    /// Reset a skill cooldown (update-rule side effect). No-op by default.
    fn reset_skill_cooldown(&mut self, _skill_id: i32) {}

    /// Progression/quest hook fired when an effect lands on a player.
    /// No-op by default.
    fn on_effect_recorded(&mut self, _effect_id: i32) {}
}
