//! Effect tracking system
//!
//! This module provides:
//! - **Instances**: runtime state of one applied effect on one actor
//! - **Registry**: the per-actor container that resolves stacking,
//!   exclusivity, and immunity conflicts, keeps the derived indices
//!   consistent, and drives stat recomputation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                EffectDefinition (catalog, immutable)             │
//! │    "effect 100 lv1: group 3, 5s, +50 defense, 30% hp shield"    │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                    EffectRegistry::apply
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 EffectInstance (runtime state)                   │
//! │   "actor 42 holds effect 100, 2 stacks, 3.1s left, enabled"     │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!          derived indices + stat refresh + emitted events
//! ```

mod instance;
mod registry;


pub use instance::EffectInstance;
pub use registry::{EffectRegistry, InvokeRecord, ReflectRecord};
