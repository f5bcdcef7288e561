use std::fmt;

use rayon::prelude::*;

use crate::element::Element;

// CopyBackend — Abstraction over block-copy execution
//
// Routing reduces every forward and backward pass to one primitive: copy a
// contiguous sample-sized block from a source buffer to a destination
// buffer, for a list of (source sample, destination sample) pairs. The
// backend trait captures exactly that primitive, so an accelerated
// implementation only has to provide one operation.
//
// The caller materializes the full pair list before invoking the backend
// (absolute destination offsets, not running cursors). That makes the
// copies data-independent: within one call no destination index repeats,
// so any execution order — including a fully parallel one — produces the
// same result, and packing order is decided by the caller alone.

/// Executes batches of contiguous block copies between flat buffers.
///
/// Contract: `pairs` holds `(src_sample, dst_sample)` block indices, every
/// `dst_sample` distinct within one call, and both buffers hold whole
/// blocks of `block_elems` elements.
pub trait CopyBackend: Clone + Send + Sync + fmt::Debug + 'static {
    /// Copy `block_elems`-length blocks `src[s] → dst[d]` for each pair.
    fn copy_blocks<T: Element>(
        &self,
        src: &[T],
        dst: &mut [T],
        block_elems: usize,
        pairs: &[(usize, usize)],
    );
}

/// Reference backend: copies blocks one after another in pair order.
///
/// This is the default, portable implementation; everything else must
/// match its results exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialBackend;

impl CopyBackend for SerialBackend {
    fn copy_blocks<T: Element>(
        &self,
        src: &[T],
        dst: &mut [T],
        block_elems: usize,
        pairs: &[(usize, usize)],
    ) {
        if block_elems == 0 {
            return;
        }
        for &(s, d) in pairs {
            let (src_block, dst_block) = (s * block_elems, d * block_elems);
            dst[dst_block..dst_block + block_elems]
                .copy_from_slice(&src[src_block..src_block + block_elems]);
        }
    }
}

/// Parallel backend: executes the copies across a rayon thread pool.
///
/// The pair list is first inverted into a per-destination source map, then
/// each destination block is filled independently. Destination blocks not
/// named by any pair are left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayonBackend;

impl CopyBackend for RayonBackend {
    fn copy_blocks<T: Element>(
        &self,
        src: &[T],
        dst: &mut [T],
        block_elems: usize,
        pairs: &[(usize, usize)],
    ) {
        if block_elems == 0 || pairs.is_empty() {
            return;
        }
        let mut src_of: Vec<Option<usize>> = vec![None; dst.len() / block_elems];
        for &(s, d) in pairs {
            debug_assert!(src_of[d].is_none(), "destination block {d} named twice");
            src_of[d] = Some(s);
        }
        dst.par_chunks_mut(block_elems)
            .zip(src_of.par_iter())
            .for_each(|(chunk, &s)| {
                if let Some(s) = s {
                    chunk.copy_from_slice(&src[s * block_elems..(s + 1) * block_elems]);
                }
            });
    }
}
