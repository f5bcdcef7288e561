//! # shunt-nn
//!
//! The routing layer surface for shunt.
//!
//! Provides:
//!
//! 1. **Layer trait** — validate / reshape / forward / backward lifecycle
//! 2. **Switch** — the selector-driven routing layer, in two modes:
//!    [`SwitchMode::SelectOne`] (merge one of many inputs) and
//!    [`SwitchMode::PartitionMany`] (scatter one input across many outputs)
//! 3. **LayerRegistry** — explicit name → factory construction
//!
//! Layers are generic over [`Element`](shunt_core::Element) (the numeric
//! type of the buffers) and the switch additionally over
//! [`CopyBackend`](shunt_core::CopyBackend) (how block copies execute).

pub mod config;
pub mod layer;
pub mod registry;
pub mod switch;

pub use config::{LayerConfig, SwitchConfig, SwitchMode};
pub use layer::Layer;
pub use registry::{register_builtin, LayerFactory, LayerRegistry};
pub use switch::Switch;
