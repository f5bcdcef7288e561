// Route Batch Demo — Dispatch a batch across two experts and back
//
// A mixture-of-experts dispatcher is the textbook use of the partition
// switch: a gating decision (here just a precomputed selector) sends each
// sample of a batch to one of two expert buffers, the experts run, and the
// gradients flow back through the exact inverse routing.
//
// This demo shows:
//   1. Building the layer through the registry, as a host would
//   2. The data-dependent reshape (destination sizes come from the selector)
//   3. Forward routing with stable per-destination packing
//   4. Backward routing reproducing the forward permutation in reverse

use shunt::prelude::*;

fn main() -> shunt::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== shunt — batch routing demo ===");
    println!();

    // 1. Host-side registry setup
    let mut registry = LayerRegistry::<f64>::new();
    register_builtin(&mut registry);
    let router = registry.create(&LayerConfig::switch("dispatch", SwitchMode::PartitionMany))?;

    // 2. A batch of 6 samples, each a 2x2 block, and a gating selector
    let batch = Tensor::<f64>::rand_uniform((6, 1, 2, 2));
    let gate = Tensor::<f64>::from_slice(&[0.0, 1.0, 1.0, 0.0, 1.0, 0.0], (6, 1, 1, 1))?;
    let inputs = [batch, gate];
    let experts = [
        Tensor::<f64>::zeros((1, 1, 1, 1)),
        Tensor::<f64>::zeros((1, 1, 1, 1)),
    ];

    router.validate(&inputs, &experts)?;
    router.reshape(&inputs, &experts)?;
    println!("expert 0 receives shape {}", experts[0].shape());
    println!("expert 1 receives shape {}", experts[1].shape());
    println!();

    // 3. Forward: samples 0, 3, 5 pack into expert 0; 1, 2, 4 into expert 1
    router.forward(&inputs, &experts)?;
    for (i, expert) in experts.iter().enumerate() {
        println!("expert {} batch: {:?}", i, expert.to_f64_vec());
    }
    println!();

    // 4. Backward: seed each expert's gradient with its expert index + slot
    for (i, expert) in experts.iter().enumerate() {
        let block = expert.sample_elems();
        let grad: Vec<f64> = (0..expert.elem_count())
            .map(|e| (i + 1) as f64 * 100.0 + (e / block) as f64)
            .collect();
        expert.set_grad(&grad)?;
    }
    inputs[0].zero_grad();
    router.backward(&experts, &[true, false], &inputs)?;

    println!("routed gradient per sample (expert*100 + slot):");
    let grad = inputs[0].grad_to_f64_vec();
    let block = inputs[0].sample_elems();
    for n in 0..inputs[0].samples() {
        println!("  sample {} ← {:?}", n, &grad[n * block..(n + 1) * block]);
    }

    Ok(())
}
