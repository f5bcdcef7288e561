// Layer trait — The interface a routing layer presents to the host
//
// The host drives every layer through the same four-step cycle:
//
//   1. validate()  — check buffer wiring once, before repeated cycles
//   2. reshape()   — compute output shapes (may depend on input *values*)
//   3. forward()   — move data from inputs to outputs
//   4. backward()  — move gradients from outputs back to inputs
//
// Buffers are host-owned for the duration of each call; layers keep no
// tensor state between calls. A layer that needs per-call bookkeeping
// (cursors, plans) builds it locally inside each invocation.
//
// By convention the last input buffer is the selector when a layer takes
// one; min_inputs()/min_outputs() let the host's factory check wiring
// arity before construction.

use shunt_core::element::Element;
use shunt_core::error::Result;
use shunt_core::tensor::Tensor;

/// The interface every data-routing layer implements.
///
/// Object-safe, so hosts can hold `Box<dyn Layer<T>>` handed out by the
/// registry and drive any layer through the same cycle.
pub trait Layer<T: Element> {
    /// The type name the registry knows this layer under.
    fn type_name(&self) -> &'static str;

    /// Minimum number of input buffers (data inputs plus the selector).
    fn min_inputs(&self) -> usize {
        2
    }

    /// Minimum number of output buffers.
    fn min_outputs(&self) -> usize {
        1
    }

    /// Check buffer wiring: counts, shapes, and aliasing. Runs once per
    /// configuration, before any shape computation or data movement.
    fn validate(&self, inputs: &[Tensor<T>], outputs: &[Tensor<T>]) -> Result<()>;

    /// Compute and apply output shapes from the inputs. May inspect input
    /// values (data-dependent shapes), and must fail before resizing
    /// anything when it does and the values are invalid.
    fn reshape(&self, inputs: &[Tensor<T>], outputs: &[Tensor<T>]) -> Result<()>;

    /// Move data from input value buffers to output value buffers.
    fn forward(&self, inputs: &[Tensor<T>], outputs: &[Tensor<T>]) -> Result<()>;

    /// Move gradients from output gradient buffers back to input gradient
    /// buffers. `propagate[i]` is the host's request for gradient flow into
    /// `inputs[i]`; a layer rejects requests its semantics cannot honor.
    fn backward(
        &self,
        outputs: &[Tensor<T>],
        propagate: &[bool],
        inputs: &[Tensor<T>],
    ) -> Result<()>;
}
