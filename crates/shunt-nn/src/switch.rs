// Switch — Selector-driven sample routing
//
// The switch copies whole sample blocks between buffers, with the routing
// decided per sample by an integer selector (the last input, one value per
// sample). Two directions:
//
//   SelectOne:     candidate[selector[n]].sample(n) → output.sample(n)
//   PartitionMany: input.sample(n) → destination[selector[n]], packed in
//                  encounter order (stable partition)
//
// Forward is a pure permutation, so backward is the same permutation run
// in reverse — gradients are copied, never summed, because every sample
// block has exactly one source and one destination.
//
// Selector values are decoded through a single checked path: a fractional,
// negative, or out-of-range value is always an error, in every build and
// in every operation that reads the selector.

use tracing::{debug, trace};

use shunt_core::backend::{CopyBackend, SerialBackend};
use shunt_core::element::Element;
use shunt_core::error::{Error, Result};
use shunt_core::tensor::Tensor;

use crate::config::{SwitchConfig, SwitchMode};
use crate::layer::Layer;

/// Routes sample blocks between inputs and outputs according to a
/// per-sample selector.
///
/// Generic over the [`CopyBackend`] that executes the block copies; the
/// default [`SerialBackend`] is the portable reference implementation.
/// The switch holds no tensor state — cursors and routing plans are
/// rebuilt inside every call.
#[derive(Debug, Clone)]
pub struct Switch<B: CopyBackend = SerialBackend> {
    mode: SwitchMode,
    backend: B,
}

impl Switch<SerialBackend> {
    /// Create a switch with the reference serial backend.
    pub fn new(mode: SwitchMode) -> Self {
        Switch {
            mode,
            backend: SerialBackend,
        }
    }

    /// Create a switch from its configuration.
    pub fn from_config(config: &SwitchConfig) -> Self {
        Self::new(config.mode)
    }
}

impl<B: CopyBackend> Switch<B> {
    /// Create a switch that executes its copies on the given backend.
    pub fn with_backend(mode: SwitchMode, backend: B) -> Self {
        Switch { mode, backend }
    }

    /// The configured routing direction.
    pub fn mode(&self) -> SwitchMode {
        self.mode
    }
}

// Selector decoding

/// Decode one selector value. `limit` is the candidate/destination count.
fn selector_index(value: f64, sample: usize, limit: usize) -> Result<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(Error::NonIntegerSelector { sample, value });
    }
    let index = value as usize;
    if index >= limit {
        return Err(Error::IndexOutOfRange {
            sample,
            value: index,
            limit,
        });
    }
    Ok(index)
}

/// Decode the whole selector buffer, failing before the caller has
/// allocated or moved anything.
fn decode_selector<T: Element>(selector: &Tensor<T>, limit: usize) -> Result<Vec<usize>> {
    selector
        .values()
        .iter()
        .enumerate()
        .map(|(n, v)| selector_index(Element::to_f64(*v), n, limit))
        .collect()
}

// Routing plans
//
// A plan is one pair list per buffer: (source sample, destination sample).
// Plans materialize absolute destination offsets up front, so the backend's
// copies are order-independent and the packing order is fixed here, in the
// single ascending scan over samples.

/// SelectOne: candidate k copies samples it was selected for, in place.
fn select_plan(indices: &[usize], candidates: usize) -> Vec<Vec<(usize, usize)>> {
    let mut plan = vec![Vec::new(); candidates];
    for (n, &k) in indices.iter().enumerate() {
        plan[k].push((n, n));
    }
    plan
}

/// PartitionMany: sample n lands at the next free slot of its destination.
/// The slot is the number of earlier samples routed to the same place, so
/// scanning in ascending n gives each destination its samples in original
/// relative order.
fn partition_plan(indices: &[usize], destinations: usize) -> Vec<Vec<(usize, usize)>> {
    let mut plan = vec![Vec::new(); destinations];
    for (n, &d) in indices.iter().enumerate() {
        let slot = plan[d].len();
        plan[d].push((n, slot));
    }
    plan
}

impl<B: CopyBackend> Switch<B> {
    fn selector_of<'a, T: Element>(&self, inputs: &'a [Tensor<T>]) -> &'a Tensor<T> {
        &inputs[inputs.len() - 1]
    }

    /// Reject any output that shares storage with a data input.
    fn check_aliasing<T: Element>(
        &self,
        inputs: &[Tensor<T>],
        outputs: &[Tensor<T>],
    ) -> Result<()> {
        for (i, out) in outputs.iter().enumerate() {
            for input in &inputs[..inputs.len() - 1] {
                if out.same_buffer(input) {
                    return Err(Error::AliasingViolation { output: i });
                }
            }
        }
        Ok(())
    }
}

impl<T: Element, B: CopyBackend> Layer<T> for Switch<B> {
    fn type_name(&self) -> &'static str {
        "Switch"
    }

    fn validate(&self, inputs: &[Tensor<T>], outputs: &[Tensor<T>]) -> Result<()> {
        let (min_in, min_out) = (
            <Self as Layer<T>>::min_inputs(self),
            <Self as Layer<T>>::min_outputs(self),
        );
        if inputs.len() < min_in {
            shunt_core::bail!(
                "switch needs at least {} inputs (data plus selector), got {}",
                min_in,
                inputs.len()
            );
        }
        if outputs.len() < min_out {
            shunt_core::bail!(
                "switch needs at least {} output, got {}",
                min_out,
                outputs.len()
            );
        }

        match self.mode {
            SwitchMode::SelectOne => {
                if outputs.len() != 1 {
                    shunt_core::bail!(
                        "select-one switch routes into exactly 1 output, got {}",
                        outputs.len()
                    );
                }
                // Every candidate must agree with candidate 0.
                let expected = inputs[0].shape();
                for (i, candidate) in inputs[1..inputs.len() - 1].iter().enumerate() {
                    let got = candidate.shape();
                    if got != expected {
                        return Err(Error::ShapeMismatch {
                            index: i + 1,
                            expected,
                            got,
                        });
                    }
                }
            }
            SwitchMode::PartitionMany => {
                if inputs.len() != 2 {
                    shunt_core::bail!(
                        "partition switch takes exactly one shared input plus the selector, got {} inputs",
                        inputs.len()
                    );
                }
            }
        }

        // One selector value per sample: shape (N, 1, 1, 1).
        let n = inputs[0].samples();
        let selector = self.selector_of(inputs);
        let got = selector.shape();
        if !got.is_selector_for(n) {
            return Err(Error::ShapeMismatch {
                index: inputs.len() - 1,
                expected: shunt_core::Shape::new(n, 1, 1, 1),
                got,
            });
        }

        self.check_aliasing(inputs, outputs)?;

        debug!(
            mode = ?self.mode,
            inputs = inputs.len(),
            outputs = outputs.len(),
            samples = n,
            "validated switch wiring"
        );
        Ok(())
    }

    fn reshape(&self, inputs: &[Tensor<T>], outputs: &[Tensor<T>]) -> Result<()> {
        // The host may re-wire buffers between cycles; re-assert aliasing.
        self.check_aliasing(inputs, outputs)?;

        match self.mode {
            SwitchMode::SelectOne => {
                let shape = inputs[0].shape();
                outputs[0].reshape(shape);
                trace!(%shape, "select output takes the candidate shape");
            }
            SwitchMode::PartitionMany => {
                // Scan the selector before any buffer changes shape: a bad
                // value must fail with every destination untouched.
                let selector = self.selector_of(inputs);
                let indices = decode_selector(selector, outputs.len())?;
                let mut counts = vec![0usize; outputs.len()];
                for &d in &indices {
                    counts[d] += 1;
                }

                let input_shape = inputs[0].shape();
                let block = input_shape.sample_elems();
                for (d, out) in outputs.iter().enumerate() {
                    if counts[d] > 0 {
                        out.reshape(input_shape.with_samples(counts[d]));
                        let expected = block * counts[d];
                        let got = out.elem_count();
                        if got != expected {
                            return Err(Error::ReshapeInvariantViolation {
                                output: d,
                                expected,
                                got,
                            });
                        }
                    } else {
                        // Placeholder for an empty destination: allocated,
                        // never written, never to be read downstream.
                        out.reshape(input_shape.with_samples(1));
                    }
                }
                debug!(?counts, "partitioned selector histogram");
            }
        }
        Ok(())
    }

    fn forward(&self, inputs: &[Tensor<T>], outputs: &[Tensor<T>]) -> Result<()> {
        let selector = self.selector_of(inputs);
        match self.mode {
            SwitchMode::SelectOne => {
                let candidates = inputs.len() - 1;
                let indices = decode_selector(selector, candidates)?;
                let block = outputs[0].sample_elems();
                let plan = select_plan(&indices, candidates);

                let mut dst = outputs[0].values_mut();
                for (k, pairs) in plan.iter().enumerate() {
                    if pairs.is_empty() {
                        continue;
                    }
                    let src = inputs[k].values();
                    self.backend.copy_blocks(&src, &mut dst, block, pairs);
                }
            }
            SwitchMode::PartitionMany => {
                let indices = decode_selector(selector, outputs.len())?;
                let block = inputs[0].sample_elems();
                let plan = partition_plan(&indices, outputs.len());

                let src = inputs[0].values();
                for (d, pairs) in plan.iter().enumerate() {
                    if pairs.is_empty() {
                        continue;
                    }
                    let mut dst = outputs[d].values_mut();
                    self.backend.copy_blocks(&src, &mut dst, block, pairs);
                }
            }
        }
        Ok(())
    }

    fn backward(
        &self,
        outputs: &[Tensor<T>],
        propagate: &[bool],
        inputs: &[Tensor<T>],
    ) -> Result<()> {
        if propagate.len() != inputs.len() {
            shunt_core::bail!(
                "propagate flags cover {} inputs, layer has {}",
                propagate.len(),
                inputs.len()
            );
        }
        let selector_ix = inputs.len() - 1;
        if propagate[selector_ix] {
            return Err(Error::NonDifferentiableInput {
                input: selector_ix,
                reason: "gradient cannot flow through the selector",
            });
        }
        let selector = self.selector_of(inputs);

        match self.mode {
            SwitchMode::SelectOne => {
                let candidates = inputs.len() - 1;
                let indices = decode_selector(selector, candidates)?;
                let block = outputs[0].sample_elems();
                // The same index map forward used: output sample n flows
                // back to candidate[selector[n]] at sample n. Unselected
                // slots receive no write and keep the host's zeros.
                let plan = select_plan(&indices, candidates);

                let src = outputs[0].grad();
                for (k, pairs) in plan.iter().enumerate() {
                    if pairs.is_empty() {
                        continue;
                    }
                    let mut dst = inputs[k].grad_mut();
                    self.backend.copy_blocks(&src, &mut dst, block, pairs);
                }
            }
            SwitchMode::PartitionMany => {
                if !propagate[0] {
                    return Err(Error::NonDifferentiableInput {
                        input: 0,
                        reason: "the shared input is the gradient target; \
                                 propagation into it cannot be disabled",
                    });
                }
                let indices = decode_selector(selector, outputs.len())?;
                let block = inputs[0].sample_elems();
                // Replaying forward's ascending scan rebuilds the identical
                // slot assignment, so each destination's gradient is
                // consumed in exactly the order it was produced.
                let plan = partition_plan(&indices, outputs.len());

                let mut dst = inputs[0].grad_mut();
                for (d, pairs) in plan.iter().enumerate() {
                    if pairs.is_empty() {
                        continue;
                    }
                    let src = outputs[d].grad();
                    let inverse: Vec<(usize, usize)> =
                        pairs.iter().map(|&(n, slot)| (slot, n)).collect();
                    self.backend.copy_blocks(&src, &mut dst, block, &inverse);
                }
            }
        }
        Ok(())
    }
}
