pub mod actor;
pub mod catalog;
pub mod effects;
pub mod field;
pub mod game_data;
pub mod serde_defaults;
pub mod stats;

// Re-exports for convenience
pub use actor::ActorSurface;
pub use catalog::{
    CancelEffect, CatalogConfig, CatalogError, CompulsionDefinition, EffectCatalog,
    EffectCondition, EffectDefinition, EffectProperty, EffectStatus, EffectUpdate,
    InvokeDefinition, ReflectDefinition, ShieldDefinition, load_definitions_from_file,
};
pub use effects::{EffectInstance, EffectRegistry, InvokeRecord, ReflectRecord};
pub use field::{EntranceEffect, FieldProfile, FieldRegion, ZoneKind};
pub use stats::{Stat, StatAggregator, StatContribution};

pub use aura_types::{
    ActorId, BasicAttribute, CompulsionEventType, EffectCategory, EffectEvent, EffectEventKind,
    EffectSnapshot, InvokeType,
};
