use std::ops::Range;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;

use crate::element::Element;
use crate::error::Result;
use crate::shape::Shape;

// Tensor — Dense 4-D sample batch with a value and a gradient buffer
//
// A Tensor owns two flat buffers of identical length: the values and the
// gradient. Both are stored row-major over (N, C, H, W), so each sample's
// C×H×W block occupies one contiguous range — the unit of all routing.
//
// MEMORY MODEL:
//
//   The inner data sits behind Arc, so cloning a Tensor is cheap and the
//   clones share storage. Sharing is intentional: the host wires the same
//   buffer into several layers, and two handles alias exactly when their
//   Arcs point at the same inner (see same_buffer). The buffers themselves
//   are behind RwLock so that readers (a layer's source buffers) and the
//   single writer (its destination buffer) can be borrowed independently.
//
//   The shape is behind the same lock discipline because data-dependent
//   reshaping mutates it through &self between forward cycles.

struct TensorInner<T: Element> {
    shape: RwLock<Shape>,
    values: RwLock<Vec<T>>,
    grad: RwLock<Vec<T>>,
}

/// A 4-D sample batch on host memory, with separate value and gradient
/// views of identical shape.
///
/// Cloning shares storage (the clone aliases the original). Layers never
/// retain tensors; the host owns every buffer for the duration of a call.
pub struct Tensor<T: Element> {
    inner: Arc<TensorInner<T>>,
}

impl<T: Element> Clone for Tensor<T> {
    fn clone(&self) -> Self {
        Tensor {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Element> std::fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tensor<{}>(shape={})", T::NAME, self.shape())
    }
}

impl<T: Element> Tensor<T> {
    fn from_buffers(shape: Shape, values: Vec<T>, grad: Vec<T>) -> Self {
        Tensor {
            inner: Arc::new(TensorInner {
                shape: RwLock::new(shape),
                values: RwLock::new(values),
                grad: RwLock::new(grad),
            }),
        }
    }

    /// Create a zero-filled tensor (values and gradient).
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        let count = shape.elem_count();
        Self::from_buffers(shape, vec![T::zero(); count], vec![T::zero(); count])
    }

    /// Create a tensor from a flat value slice. The gradient starts zeroed.
    pub fn from_slice(values: &[T], shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if values.len() != shape.elem_count() {
            crate::bail!(
                "element count mismatch: shape {} requires {} elements, got {}",
                shape,
                shape.elem_count(),
                values.len()
            );
        }
        Ok(Self::from_buffers(
            shape,
            values.to_vec(),
            vec![T::zero(); values.len()],
        ))
    }

    /// Create a tensor with values drawn uniformly from [0, 1).
    pub fn rand_uniform(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        let mut rng = rand::thread_rng();
        let values = (0..shape.elem_count())
            .map(|_| T::from_f64(rng.gen::<f64>()))
            .collect();
        let count = shape.elem_count();
        Self::from_buffers(shape, values, vec![T::zero(); count])
    }

    // Accessors

    /// The current shape. Copied out of the lock; shapes are four words.
    pub fn shape(&self) -> Shape {
        *self.inner.shape.read().expect("shape lock poisoned")
    }

    /// Number of samples (the outer dimension).
    pub fn samples(&self) -> usize {
        self.shape().samples()
    }

    /// Elements in one sample's contiguous block.
    pub fn sample_elems(&self) -> usize {
        self.shape().sample_elems()
    }

    /// Total number of elements.
    pub fn elem_count(&self) -> usize {
        self.shape().elem_count()
    }

    /// Flat range of sample `n` within the value/gradient buffers.
    pub fn sample_range(&self, n: usize) -> Range<usize> {
        let block = self.sample_elems();
        n * block..(n + 1) * block
    }

    /// Whether two handles share the same underlying storage.
    ///
    /// This is the aliasing test: a clone of a tensor aliases it, a fresh
    /// tensor of equal shape and contents does not.
    pub fn same_buffer(&self, other: &Tensor<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // Views

    /// Read view of the value buffer.
    pub fn values(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.inner.values.read().expect("value lock poisoned")
    }

    /// Write view of the value buffer.
    pub fn values_mut(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.inner.values.write().expect("value lock poisoned")
    }

    /// Read view of the gradient buffer.
    pub fn grad(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.inner.grad.read().expect("grad lock poisoned")
    }

    /// Write view of the gradient buffer.
    pub fn grad_mut(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.inner.grad.write().expect("grad lock poisoned")
    }

    // Mutation

    /// Change the shape, reallocating both buffers zero-filled when the
    /// element count changes. Contents are not preserved across a
    /// count-changing reshape; routed outputs are always fully rewritten.
    pub fn reshape(&self, shape: impl Into<Shape>) {
        let shape = shape.into();
        let count = shape.elem_count();
        let mut cur = self.inner.shape.write().expect("shape lock poisoned");
        if cur.elem_count() != count {
            *self.inner.values.write().expect("value lock poisoned") = vec![T::zero(); count];
            *self.inner.grad.write().expect("grad lock poisoned") = vec![T::zero(); count];
        }
        *cur = shape;
    }

    /// Overwrite the value buffer from a flat slice.
    pub fn set_values(&self, values: &[T]) -> Result<()> {
        let shape = self.shape();
        if values.len() != shape.elem_count() {
            crate::bail!(
                "element count mismatch: shape {} requires {} elements, got {}",
                shape,
                shape.elem_count(),
                values.len()
            );
        }
        self.values_mut().copy_from_slice(values);
        Ok(())
    }

    /// Overwrite the gradient buffer from a flat slice.
    pub fn set_grad(&self, grad: &[T]) -> Result<()> {
        let shape = self.shape();
        if grad.len() != shape.elem_count() {
            crate::bail!(
                "element count mismatch: shape {} requires {} elements, got {}",
                shape,
                shape.elem_count(),
                grad.len()
            );
        }
        self.grad_mut().copy_from_slice(grad);
        Ok(())
    }

    /// Zero the gradient buffer. Hosts call this before each accumulation
    /// pass; routing only ever writes the slots the selector names.
    pub fn zero_grad(&self) {
        self.grad_mut().fill(T::zero());
    }

    // Host-side inspection

    /// Copy the values out as a flat Vec.
    pub fn to_vec(&self) -> Vec<T> {
        self.values().clone()
    }

    /// Copy the gradient out as a flat Vec.
    pub fn grad_to_vec(&self) -> Vec<T> {
        self.grad().clone()
    }

    /// Copy the values out as f64 (for inspection and tests).
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.values().iter().map(|v| Element::to_f64(*v)).collect()
    }

    /// Copy the gradient out as f64 (for inspection and tests).
    pub fn grad_to_f64_vec(&self) -> Vec<f64> {
        self.grad().iter().map(|v| Element::to_f64(*v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let t = Tensor::<f32>::zeros((2, 3, 1, 1));
        assert_eq!(t.elem_count(), 6);
        assert_eq!(t.to_f64_vec(), vec![0.0; 6]);
        assert_eq!(t.grad_to_f64_vec(), vec![0.0; 6]);
    }

    #[test]
    fn test_from_slice_count_checked() {
        assert!(Tensor::<f64>::from_slice(&[1.0, 2.0, 3.0], (2, 1, 1, 1)).is_err());
        let t = Tensor::<f64>::from_slice(&[1.0, 2.0], (2, 1, 1, 1)).unwrap();
        assert_eq!(t.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_sample_range() {
        let t = Tensor::<f32>::zeros((3, 2, 2, 1));
        assert_eq!(t.sample_range(0), 0..4);
        assert_eq!(t.sample_range(2), 8..12);
    }

    #[test]
    fn test_clone_aliases() {
        let a = Tensor::<f32>::zeros((1, 1, 1, 1));
        let b = a.clone();
        let c = Tensor::<f32>::zeros((1, 1, 1, 1));
        assert!(a.same_buffer(&b));
        assert!(!a.same_buffer(&c));

        // Writes through one handle are visible through the other.
        b.set_values(&[7.0]).unwrap();
        assert_eq!(a.to_f64_vec(), vec![7.0]);
    }

    #[test]
    fn test_reshape_reallocates_on_count_change() {
        let t = Tensor::<f64>::from_slice(&[1.0, 2.0], (2, 1, 1, 1)).unwrap();
        t.reshape((3, 1, 1, 1));
        assert_eq!(t.samples(), 3);
        assert_eq!(t.to_vec(), vec![0.0; 3]);

        // Same element count: contents survive, only the shape changes.
        let u = Tensor::<f64>::from_slice(&[1.0, 2.0, 3.0, 4.0], (2, 2, 1, 1)).unwrap();
        u.reshape((4, 1, 1, 1));
        assert_eq!(u.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_zero_grad() {
        let t = Tensor::<f32>::zeros((1, 2, 1, 1));
        t.set_grad(&[1.0, 2.0]).unwrap();
        t.zero_grad();
        assert_eq!(t.grad_to_f64_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_rand_uniform_in_range() {
        let t = Tensor::<f64>::rand_uniform((4, 2, 1, 1));
        assert!(t.to_vec().iter().all(|&v| (0.0..1.0).contains(&v)));
    }
}
