//! Per-actor effect registry
//!
//! Owns every [`EffectInstance`] on one actor plus the derived indices
//! that combat logic queries: invoke records by trigger, compulsion
//! records by event type, summed resistances, and the single reflect
//! slot. All mutation happens inside one `apply`/`remove`/`tick` call;
//! each entry point runs to completion without suspension, so the
//! registry is driven single-writer by its owning actor's consumer.

use std::sync::Arc;

use hashbrown::HashMap;

use aura_types::{
    ActorId, BasicAttribute, CompulsionEventType, EffectCategory, EffectEvent, EffectEventKind,
    EffectSnapshot, InvokeType,
};

use crate::actor::ActorSurface;
use crate::catalog::{CompulsionDefinition, EffectCatalog, EffectCondition, EffectDefinition};
use crate::field::FieldProfile;
use crate::game_data;
use crate::stats::StatContribution;

use super::EffectInstance;

/// Trigger-keyed contribution derived from one held effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvokeRecord {
    /// Effect id the record came from; purged when that effect is removed
    pub source_effect_id: i32,
    pub value: f32,
    pub rate: f32,
    pub skill_id: i32,
    pub skill_group_id: i32,
}

/// The actor's single damage-reflection slot. A newer reflect-granting
/// effect displaces the current holder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectRecord {
    /// Effect id the record came from; the slot clears when it is removed
    pub source_effect_id: i32,
    /// Effect applied to the attacker on reflect
    pub effect_id: i32,
    pub effect_level: i16,
    pub rate: f32,
    pub value: i64,
}

/// All effect state for one actor.
#[derive(Debug)]
pub struct EffectRegistry {
    catalog: Arc<EffectCatalog>,

    /// Handle of the owning actor; every instance is stamped with it
    owner: ActorId,

    /// Active instances, one per effect id
    effects: HashMap<i32, EffectInstance>,

    // ─── Derived indices ────────────────────────────────────────────────────
    invokes: HashMap<InvokeType, HashMap<i32, InvokeRecord>>,
    compulsions: HashMap<CompulsionEventType, HashMap<i32, CompulsionDefinition>>,
    resistances: HashMap<BasicAttribute, f32>,
    reflect: Option<ReflectRecord>,

    /// Monotonic local id source for instances on this actor
    next_object_id: i32,
}

impl EffectRegistry {
    pub fn new(catalog: Arc<EffectCatalog>, owner: ActorId) -> Self {
        Self {
            catalog,
            owner,
            effects: HashMap::new(),
            invokes: HashMap::new(),
            compulsions: HashMap::new(),
            resistances: HashMap::new(),
            reflect: None,
            next_object_id: 0,
        }
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Apply / Remove / Tick
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply an effect to this actor.
    ///
    /// `duration_override_ms < 0` means "use the definition default".
    /// Unknown (id, level) pairs log and no-op. An immunity hit is a
    /// complete no-op: nothing mutates and nothing is emitted. Reapplying
    /// a held effect restacks it instead of creating a second instance.
    pub fn apply(
        &mut self,
        owner: &mut dyn ActorSurface,
        caster: ActorId,
        effect_id: i32,
        level: i16,
        current_tick: i64,
        duration_override_ms: i64,
        notify: bool,
    ) {
        let Some(metadata) = self.catalog.try_get(effect_id, level) else {
            tracing::error!(effect_id, level, "unknown effect definition");
            return;
        };

        let duration_ms = if duration_override_ms >= 0 {
            duration_override_ms
        } else {
            metadata.property.duration_ms
        };

        if self.is_immune(effect_id, metadata.property.category) {
            return;
        }

        if let Some(existing) = self.effects.get_mut(&effect_id) {
            if !existing.stack(current_tick) {
                return;
            }
            let event = EffectEvent::Updated {
                instance_id: existing.object_id,
                stacks: existing.stacks,
            };
            if notify {
                owner.emit(event);
            }
            return;
        }

        // Evict the active occupant of this exclusivity group, if any
        if metadata.property.group > 0 {
            self.evict_group(owner, metadata.property.group);
        }

        self.next_object_id += 1;
        let object_id = self.next_object_id;
        let instance = EffectInstance::new(
            Arc::clone(&metadata),
            object_id,
            caster,
            self.owner,
            level,
            current_tick,
            duration_ms,
        );
        self.effects.insert(effect_id, instance);

        self.set_reflect(effect_id, &metadata);
        self.set_invokes(effect_id, &metadata);
        self.set_compulsion(effect_id, &metadata);
        self.set_shield(&*owner, effect_id);
        self.apply_update_rules(owner, caster, &metadata);

        if metadata.affects_stats() {
            self.refresh_stats(owner);
        }

        for (&attribute, &value) in &metadata.status.resistances {
            *self.resistances.entry(attribute).or_insert(0.0) += value;
        }

        if !self.check_condition(&metadata.condition, &*owner)
            && let Some(instance) = self.effects.get_mut(&effect_id)
        {
            instance.disable();
        }

        tracing::debug!(
            object_id,
            owner = %self.owner,
            effect_id,
            level,
            duration_ms,
            "effect applied"
        );

        if owner.is_player() {
            owner.on_effect_recorded(effect_id);
        }
        if notify {
            owner.emit(EffectEvent::Added {
                instance_id: object_id,
                effect_id,
                level,
            });
        }
        self.debug_assert_consistent();
    }

    /// Remove an effect by id. Returns false when it is not held; removal
    /// of an absent id leaves every index untouched.
    pub fn remove(&mut self, owner: &mut dyn ActorSurface, effect_id: i32) -> bool {
        let Some(instance) = self.effects.remove(&effect_id) else {
            return false;
        };

        if self
            .reflect
            .as_ref()
            .is_some_and(|r| r.source_effect_id == effect_id)
        {
            self.reflect = None;
        }

        let metadata = instance.metadata();
        for (&attribute, &value) in &metadata.status.resistances {
            let entry = self.resistances.entry(attribute).or_insert(0.0);
            // Clamped toward zero rather than restored to the
            // pre-application total: removing one contributor zeroes the
            // whole bucket when the remainder is positive.
            *entry = (*entry - value).min(0.0);
        }

        for records in self.invokes.values_mut() {
            records.remove(&effect_id);
        }
        self.invokes.retain(|_, records| !records.is_empty());
        for records in self.compulsions.values_mut() {
            records.remove(&effect_id);
        }
        self.compulsions.retain(|_, records| !records.is_empty());

        if metadata.affects_stats() {
            self.refresh_stats(owner);
        }

        tracing::debug!(
            object_id = instance.object_id,
            owner = %self.owner,
            effect_id,
            "effect removed"
        );
        owner.emit(EffectEvent::Removed {
            instance_id: instance.object_id,
        });
        self.debug_assert_consistent();
        true
    }

    /// Expire every instance whose window has closed, through the normal
    /// removal path so the derived indices stay consistent.
    pub fn tick(&mut self, owner: &mut dyn ActorSurface, current_tick: i64) {
        let expired: Vec<i32> = self
            .effects
            .iter()
            .filter(|(_, instance)| instance.is_expired(current_tick))
            .map(|(&effect_id, _)| effect_id)
            .collect();

        for effect_id in expired {
            self.remove(owner, effect_id);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether the actor holds an effect. `min_level == 0` accepts any
    /// level; `min_stacks == 0` accepts any stack count.
    pub fn has_effect(&self, effect_id: i32, min_level: i16, min_stacks: i32) -> bool {
        let Some(instance) = self.effects.get(&effect_id) else {
            return false;
        };
        if min_stacks != 0 && instance.stacks < min_stacks {
            return false;
        }
        min_level == 0 || instance.level >= min_level
    }

    /// Whether any held effect carries the given behavior tag.
    pub fn has_effect_kind(&self, kind: EffectEventKind) -> bool {
        self.effects
            .values()
            .any(|instance| instance.metadata().property.event_kind == kind)
    }

    /// Summed resistance for an attribute; 0 when nothing contributes.
    pub fn resistance(&self, attribute: BasicAttribute) -> f32 {
        self.resistances.get(&attribute).copied().unwrap_or(0.0)
    }

    /// Summed (value, rate) over invoke records matching the skill or one
    /// of its groups. The value sum is truncated to an integer.
    pub fn invoke_aggregate(
        &self,
        invoke_type: InvokeType,
        skill_id: i32,
        skill_group_ids: &[i32],
    ) -> (i32, f32) {
        let mut value = 0.0f32;
        let mut rate = 0.0f32;
        if let Some(records) = self.invokes.get(&invoke_type) {
            for record in records.values() {
                if record.skill_id == skill_id || skill_group_ids.contains(&record.skill_group_id) {
                    value += record.value;
                    rate += record.rate;
                }
            }
        }
        (value as i32, rate)
    }

    /// Summed compulsion rate for an event type. `skill_id == 0` sums every
    /// record; otherwise only records scoped to that skill count.
    pub fn compulsion_rate(&self, event_type: CompulsionEventType, skill_id: i32) -> f32 {
        let Some(records) = self.compulsions.get(&event_type) else {
            return 0.0;
        };
        records
            .values()
            .filter(|compulsion| skill_id == 0 || compulsion.skill_ids.contains(&skill_id))
            .map(|compulsion| compulsion.rate)
            .sum()
    }

    /// The active reflect record, if any.
    pub fn reflect(&self) -> Option<&ReflectRecord> {
        self.reflect.as_ref()
    }

    pub fn get(&self, effect_id: i32) -> Option<&EffectInstance> {
        self.effects.get(&effect_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.effects.values()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Effects worth persisting at logout.
    pub fn saveable_effects(&self, current_tick: i64) -> Vec<EffectSnapshot> {
        self.effects
            .values()
            .filter(|instance| !instance.metadata().property.remove_on_logout)
            .map(|instance| instance.snapshot(current_tick))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle Hooks
    // ─────────────────────────────────────────────────────────────────────────

    /// Re-apply persisted effects at login. A snapshot is honored when its
    /// definition tracks in-game time or it still has time remaining; the
    /// remaining window becomes the duration override.
    pub fn restore_effects(
        &mut self,
        owner: &mut dyn ActorSurface,
        snapshots: &[EffectSnapshot],
        current_tick: i64,
    ) {
        if !owner.is_player() {
            return;
        }

        let owner_id = self.owner;
        for snapshot in snapshots {
            let Some(metadata) = self.catalog.try_get(snapshot.effect_id, snapshot.level) else {
                tracing::error!(
                    effect_id = snapshot.effect_id,
                    level = snapshot.level,
                    "unknown effect definition in saved state"
                );
                continue;
            };

            if metadata.property.use_in_game_time || snapshot.ms_remaining > 0 {
                self.apply(
                    owner,
                    owner_id,
                    snapshot.effect_id,
                    snapshot.level,
                    current_tick,
                    snapshot.ms_remaining,
                    true,
                );
            }
        }
    }

    /// Field entry: grant the field's entrance effects, strip what cannot
    /// enter a PvP zone, then grant the region's standing bonuses.
    pub fn on_field_enter(&mut self, owner: &mut dyn ActorSurface, field: &FieldProfile) {
        let current_tick = owner.current_tick();
        let owner_id = self.owner;

        for entrance in &field.entrance_effects {
            self.apply(
                owner,
                owner_id,
                entrance.id,
                entrance.level,
                current_tick,
                -1,
                true,
            );
        }

        if field.zone == crate::field::ZoneKind::Pvp {
            let stripped: Vec<i32> = self
                .effects
                .values()
                .filter(|instance| {
                    let property = &instance.metadata().property;
                    property.remove_on_pvp_zone || !property.keep_on_enter_pvp_zone
                })
                .map(|instance| instance.metadata().id)
                .collect();
            for effect_id in stripped {
                self.remove(owner, effect_id);
            }
        }

        for bonus in game_data::region_bonus_effects(field.region) {
            self.apply(
                owner,
                owner_id,
                bonus.id,
                bonus.level,
                current_tick,
                -1,
                true,
            );
        }
    }

    /// Field exit: strip the field's entrance effects and anything flagged
    /// remove-on-leave.
    pub fn on_field_leave(&mut self, owner: &mut dyn ActorSurface, field: &FieldProfile) {
        for entrance in &field.entrance_effects {
            self.remove(owner, entrance.id);
        }

        let flagged: Vec<i32> = self
            .effects
            .values()
            .filter(|instance| instance.metadata().property.remove_on_leave_field)
            .map(|instance| instance.metadata().id)
            .collect();
        for effect_id in flagged {
            self.remove(owner, effect_id);
        }
    }

    /// Owner death: strip everything not flagged keep-on-death, then
    /// re-evaluate the survivors' activation conditions.
    pub fn on_death(&mut self, owner: &mut dyn ActorSurface) {
        let held: Vec<i32> = self.effects.keys().copied().collect();
        for effect_id in held {
            let keep = self
                .effects
                .get(&effect_id)
                .is_some_and(|instance| instance.metadata().property.keep_on_death);
            if !keep {
                self.remove(owner, effect_id);
            }
        }
        self.update_enabled(&*owner);
    }

    /// Repoint every instance to a replacement owning actor without
    /// altering effect state.
    pub fn rebind_actor(&mut self, owner: ActorId) {
        self.owner = owner;
        for instance in self.effects.values_mut() {
            instance.rebind(owner);
        }
    }

    /// Re-evaluate every instance's activation condition. Idempotent.
    pub fn update_enabled(&mut self, owner: &dyn ActorSurface) {
        let held: Vec<i32> = self.effects.keys().copied().collect();
        for effect_id in held {
            let Some(condition) = self
                .effects
                .get(&effect_id)
                .map(|instance| instance.metadata().condition.clone())
            else {
                continue;
            };
            let enabled = self.check_condition(&condition, owner);
            if let Some(instance) = self.effects.get_mut(&effect_id) {
                instance.set_enabled(enabled);
            }
        }
    }

    /// Route incoming damage through the active shields, strongest pool
    /// first, removing any shield that depletes. Returns the unabsorbed
    /// remainder.
    pub fn absorb(&mut self, owner: &mut dyn ActorSurface, amount: i64) -> i64 {
        let mut remaining = amount;
        while remaining > 0 {
            let target = self
                .effects
                .values()
                .filter(|instance| instance.enabled && instance.shield_remaining > 0)
                .max_by_key(|instance| instance.shield_remaining)
                .map(|instance| instance.metadata().id);
            let Some(effect_id) = target else {
                break;
            };

            let mut depleted = false;
            if let Some(instance) = self.effects.get_mut(&effect_id) {
                remaining = instance.absorb(remaining);
                depleted = instance.shield_remaining == 0;
            }
            if depleted {
                self.remove(owner, effect_id);
            }
        }
        remaining
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived-Index Maintenance
    // ─────────────────────────────────────────────────────────────────────────

    fn is_immune(&self, effect_id: i32, category: EffectCategory) -> bool {
        self.effects.values().any(|instance| {
            let update = &instance.metadata().update;
            update.immune_ids.contains(&effect_id) || update.immune_categories.contains(&category)
        })
    }

    /// Disable the active holders of an exclusivity group and announce
    /// their removal. The evicted instances keep their slots until expiry.
    fn evict_group(&mut self, owner: &mut dyn ActorSurface, group: i32) {
        for instance in self.effects.values_mut() {
            if instance.enabled && instance.metadata().property.group == group {
                instance.disable();
                owner.emit(EffectEvent::Removed {
                    instance_id: instance.object_id,
                });
            }
        }
    }

    fn set_reflect(&mut self, source_effect_id: i32, metadata: &EffectDefinition) {
        let Some(reflect) = &metadata.reflect else {
            return;
        };
        if reflect.effect_id == 0
            || self
                .catalog
                .try_get(reflect.effect_id, reflect.effect_level)
                .is_none()
        {
            return;
        }

        self.reflect = Some(ReflectRecord {
            source_effect_id,
            effect_id: reflect.effect_id,
            effect_level: reflect.effect_level,
            rate: reflect.rate,
            value: reflect.value,
        });
    }

    fn set_invokes(&mut self, source_effect_id: i32, metadata: &EffectDefinition) {
        let Some(invoke) = &metadata.invoke else {
            return;
        };

        // Replace, never duplicate, records from a previous application
        for records in self.invokes.values_mut() {
            records.remove(&source_effect_id);
        }

        for (i, &invoke_type) in invoke.types.iter().enumerate() {
            let record = InvokeRecord {
                source_effect_id,
                value: invoke.values.get(i).copied().unwrap_or(0.0),
                rate: invoke.rates.get(i).copied().unwrap_or(0.0),
                skill_id: invoke.skill_id,
                skill_group_id: invoke.skill_group_id,
            };
            self.invokes
                .entry(invoke_type)
                .or_default()
                .insert(source_effect_id, record);
        }
    }

    fn set_compulsion(&mut self, source_effect_id: i32, metadata: &EffectDefinition) {
        let Some(compulsion) = &metadata.status.compulsion else {
            return;
        };

        for records in self.compulsions.values_mut() {
            records.remove(&source_effect_id);
        }

        self.compulsions
            .entry(compulsion.event_type)
            .or_default()
            .insert(source_effect_id, compulsion.clone());
    }

    fn set_shield(&mut self, owner: &dyn ActorSurface, effect_id: i32) {
        let Some(instance) = self.effects.get_mut(&effect_id) else {
            return;
        };
        let Some(shield) = instance.metadata().shield.clone() else {
            return;
        };

        if shield.hp_value > 0 {
            instance.shield_remaining = shield.hp_value;
        } else if shield.hp_by_target_max_hp > 0.0 {
            instance.shield_remaining =
                (owner.max_health() as f64 * shield.hp_by_target_max_hp as f64) as i64;
        }
    }

    fn apply_update_rules(
        &mut self,
        owner: &mut dyn ActorSurface,
        caster: ActorId,
        metadata: &EffectDefinition,
    ) {
        if let Some(cancel) = &metadata.update.cancel {
            for &cancel_id in &cancel.ids {
                let matches = self.effects.get(&cancel_id).is_some_and(|instance| {
                    !cancel.check_same_caster || instance.caster == caster
                });
                if matches {
                    self.remove(owner, cancel_id);
                }
            }

            if !cancel.categories.is_empty() {
                let cancelled: Vec<i32> = self
                    .effects
                    .values()
                    .filter(|instance| {
                        cancel
                            .categories
                            .contains(&instance.metadata().property.category)
                    })
                    .map(|instance| instance.metadata().id)
                    .collect();
                for effect_id in cancelled {
                    self.remove(owner, effect_id);
                }
            }
        }

        if !metadata.update.reset_cooldowns.is_empty() && owner.is_player() {
            for &skill_id in &metadata.update.reset_cooldowns {
                owner.reset_skill_cooldown(skill_id);
            }
        }
    }

    fn check_condition(&self, condition: &EffectCondition, owner: &dyn ActorSurface) -> bool {
        match condition {
            EffectCondition::Always => true,
            EffectCondition::OwnerAlive => !owner.is_dead(),
            EffectCondition::OwnerPlayer => owner.is_player(),
            EffectCondition::RequiresEffect { effect_id } => self.effects.contains_key(effect_id),
            EffectCondition::WithoutEffect { effect_id } => !self.effects.contains_key(effect_id),
        }
    }

    /// Recollect the enabled instances' stat contributions and hand them to
    /// the owner's aggregator. Runs at most once per apply/remove.
    fn refresh_stats(&self, owner: &mut dyn ActorSurface) {
        let contributions: Vec<StatContribution> = self
            .effects
            .values()
            .filter(|instance| instance.enabled)
            .map(|instance| {
                let status = &instance.metadata().status;
                StatContribution {
                    values: status.values.iter().map(|(&a, &v)| (a, v)).collect(),
                    rates: status.rates.iter().map(|(&a, &r)| (a, r)).collect(),
                }
            })
            .filter(|contribution| !contribution.is_empty())
            .collect();
        owner.stats().refresh(&contributions);
    }

    /// Structural invariant: an instance is represented in every derived
    /// index its definition implies, and no index entry outlives its
    /// instance. Violations are programmer errors, checked in debug builds.
    fn debug_assert_consistent(&self) {
        #[cfg(debug_assertions)]
        {
            for (invoke_type, records) in &self.invokes {
                for source_id in records.keys() {
                    debug_assert!(
                        self.effects.contains_key(source_id),
                        "invoke index {invoke_type:?} references missing effect {source_id}"
                    );
                }
            }
            for (event_type, records) in &self.compulsions {
                for source_id in records.keys() {
                    debug_assert!(
                        self.effects.contains_key(source_id),
                        "compulsion index {event_type:?} references missing effect {source_id}"
                    );
                }
            }
            if let Some(reflect) = &self.reflect {
                debug_assert!(
                    self.effects.contains_key(&reflect.source_effect_id),
                    "reflect slot references missing effect {}",
                    reflect.source_effect_id
                );
            }
            for (effect_id, instance) in &self.effects {
                debug_assert_eq!(
                    *effect_id,
                    instance.metadata().id,
                    "instance keyed under the wrong effect id"
                );
                if let Some(invoke) = &instance.metadata().invoke {
                    for invoke_type in &invoke.types {
                        debug_assert!(
                            self.invokes
                                .get(invoke_type)
                                .is_some_and(|records| records.contains_key(effect_id)),
                            "effect {effect_id} missing from invoke index {invoke_type:?}"
                        );
                    }
                }
                if let Some(compulsion) = &instance.metadata().status.compulsion {
                    debug_assert!(
                        self.compulsions
                            .get(&compulsion.event_type)
                            .is_some_and(|records| records.contains_key(effect_id)),
                        "effect {effect_id} missing from compulsion index"
                    );
                }
            }
        }
    }
}
