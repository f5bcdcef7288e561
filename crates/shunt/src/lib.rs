//! # shunt
//!
//! Selector-driven sample routing for 4-D tensor batches.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust
//! use shunt::prelude::*;
//!
//! # fn main() -> shunt::Result<()> {
//! // Route each of 4 scalar samples to one of 2 destinations.
//! let input = Tensor::<f64>::from_slice(&[100.0, 200.0, 300.0, 400.0], (4, 1, 1, 1))?;
//! let selector = Tensor::<f64>::from_slice(&[0.0, 1.0, 0.0, 1.0], (4, 1, 1, 1))?;
//! let outputs = [Tensor::<f64>::zeros((1, 1, 1, 1)), Tensor::<f64>::zeros((1, 1, 1, 1))];
//! let inputs = [input, selector];
//!
//! let switch = Switch::new(SwitchMode::PartitionMany);
//! switch.validate(&inputs, &outputs)?;
//! switch.reshape(&inputs, &outputs)?;
//! switch.forward(&inputs, &outputs)?;
//! assert_eq!(outputs[0].to_f64_vec(), vec![100.0, 300.0]);
//! assert_eq!(outputs[1].to_f64_vec(), vec![200.0, 400.0]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|----------|
//! | `shunt-core` | Tensor buffer, Shape, Element, copy backends, errors |
//! | `shunt-nn` | Layer trait, Switch routing layer, layer registry |

/// Re-export core types.
pub use shunt_core::{
    backend::{CopyBackend, RayonBackend, SerialBackend},
    Element, Error, Result, Shape, Tensor,
};

/// Re-export the layer surface.
pub mod nn {
    pub use shunt_nn::*;
}

/// Prelude: import this for the most common types.
pub mod prelude {
    pub use crate::nn::{
        register_builtin, Layer, LayerConfig, LayerRegistry, Switch, SwitchConfig, SwitchMode,
    };
    pub use crate::{CopyBackend, Element, RayonBackend, SerialBackend, Shape, Tensor};
}
