//! Effect instances (runtime state)
//!
//! An `EffectInstance` is one applied occurrence of an effect on an actor.
//! It owns the mutable runtime state (stacks, timers, enabled flag, shield
//! pool) and shares its immutable definition behind `Arc`.
//!
//! # Lifecycle
//!
//! Created on first successful apply; restacked on reapplication;
//! disabled without destruction when its activation condition fails
//! (the slot stays occupied and the duration keeps running); destroyed
//! by removal, either explicit or tick-expiry.

use std::sync::Arc;

use aura_types::{ActorId, EffectSnapshot};

use crate::catalog::EffectDefinition;

/// One applied effect on one actor.
#[derive(Debug, Clone)]
pub struct EffectInstance {
    /// Shared immutable definition
    metadata: Arc<EffectDefinition>,

    /// Registry-local monotonic id, referenced by emitted events
    pub object_id: i32,

    /// Who applied the effect (non-owning handle)
    pub caster: ActorId,

    /// Who holds the effect (non-owning handle)
    pub owner: ActorId,

    pub level: i16,

    // ─── Timing (monotonic field ticks, ms) ─────────────────────────────────
    pub start_tick: i64,
    pub end_tick: i64,

    /// Effective duration, including any caller override
    pub duration_ms: i64,

    // ─── State ──────────────────────────────────────────────────────────────
    pub stacks: i32,

    /// False while the activation condition fails; a disabled instance
    /// contributes no stats but still occupies its slot
    pub enabled: bool,

    /// Absorb pool remaining; 0 for non-shield effects
    pub shield_remaining: i64,
}

impl EffectInstance {
    pub fn new(
        metadata: Arc<EffectDefinition>,
        object_id: i32,
        caster: ActorId,
        owner: ActorId,
        level: i16,
        start_tick: i64,
        duration_ms: i64,
    ) -> Self {
        let duration_ms = duration_ms.max(0);
        Self {
            metadata,
            object_id,
            caster,
            owner,
            level,
            start_tick,
            end_tick: start_tick + duration_ms,
            duration_ms,
            stacks: 1,
            enabled: true,
            shield_remaining: 0,
        }
    }

    pub fn metadata(&self) -> &EffectDefinition {
        &self.metadata
    }

    /// Reapplication: refresh the timer window and add a stack.
    /// Fails without mutating anything once the stack limit is reached.
    pub fn stack(&mut self, current_tick: i64) -> bool {
        let max_stacks = self.metadata.property.max_stacks;
        if max_stacks > 0 && self.stacks >= max_stacks {
            return false;
        }

        self.stacks += 1;
        self.start_tick = current_tick;
        self.end_tick = current_tick + self.duration_ms;
        true
    }

    pub fn is_expired(&self, current_tick: i64) -> bool {
        self.end_tick <= current_tick
    }

    pub fn remaining_ms(&self, current_tick: i64) -> i64 {
        (self.end_tick - current_tick).max(0)
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Idempotent enabled-state update from a condition re-evaluation.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Repoint to a replacement owning actor without touching effect state.
    pub fn rebind(&mut self, owner: ActorId) {
        self.owner = owner;
    }

    /// Consume incoming damage from the shield pool; returns the remainder
    /// that got through.
    pub fn absorb(&mut self, amount: i64) -> i64 {
        let consumed = amount.min(self.shield_remaining).max(0);
        self.shield_remaining -= consumed;
        amount - consumed
    }

    /// Saveable state for the logout snapshot.
    pub fn snapshot(&self, current_tick: i64) -> EffectSnapshot {
        EffectSnapshot {
            effect_id: self.metadata.id,
            level: self.level,
            stacks: self.stacks,
            ms_remaining: self.remaining_ms(current_tick),
            enabled: self.enabled,
        }
    }
}
