use anyhow::{anyhow, ensure, Context, Result};
use rand::{Rng, RngCore};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// Defines the core `PairedTransform` trait for composable image/label
/// augmentation pipelines.
///
/// A `PairedTransform<I, O>` converts a paired input of type `I` (typically an
/// `(image, label)` tuple) to an output of type `O`, keeping image and label
/// spatially aligned. Random decisions are not hidden inside the transform:
/// each invocation first draws an explicit [`Params`](PairedTransform::Params)
/// value via [`sample`](PairedTransform::sample), then applies it
/// deterministically via [`apply_with`](PairedTransform::apply_with). Reusing
/// one `Params` value replays the identical augmentation, which is what makes
/// clip-level (video) application possible: draw once, apply to every frame.
///
/// Deterministic transforms use `Params = ()`.
///
/// Multiple steps can be chained via `.then(...)` to form a single, inlined
/// pipeline, including steps that change the pair type (raster pairs become
/// tensor pairs after conversion). Same-typed steps can also be collected
/// into a [`Compose`] list.
pub trait PairedTransform<I, O>: Send + Sync {
    /// Random decisions drawn once per invocation.
    type Params: Send;

    /// Draws the random parameters for one invocation.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Params;

    /// Applies the transformation deterministically with previously drawn
    /// parameters.
    fn apply_with(&self, params: &Self::Params, input: I) -> Result<O>;

    /// Draws parameters and applies them to a single pair.
    fn apply<R: Rng + ?Sized>(&self, rng: &mut R, input: I) -> Result<O> {
        let params = self.sample(rng);
        self.apply_with(&params, input)
    }

    #[inline]
    fn then<T, M>(self, next: T) -> Chain<Self, T, O>
    where
        Self: Sized,
        T: PairedTransform<O, M>,
        O: Send,
        M: Send,
    {
        Chain {
            first: self,
            second: next,
            _marker: PhantomData,
        }
    }
}

/// A chain of two paired transforms (`A` -> `B`).
/// - `PhantomData<M>` enforces intermediate type alignment.
#[derive(Debug)]
pub struct Chain<A, B, M> {
    first: A,
    second: B,
    _marker: PhantomData<fn() -> M>,
}

impl<A, B, M> Chain<A, B, M> {
    /// Creates a new transform chain.
    /// Use [`PairedTransform::then`] for better ergonomics. `Chain::new` is
    /// useful when building pipelines dynamically.
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            _marker: PhantomData,
        }
    }
}

impl<I, M, O, A, B> PairedTransform<I, O> for Chain<A, B, M>
where
    A: PairedTransform<I, M>,
    B: PairedTransform<M, O>,
    M: Send,
{
    type Params = (A::Params, B::Params);

    /// One draw for the whole chain: sampling a chained pipeline yields the
    /// full parameter tree for the invocation.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Params {
        (self.first.sample(rng), self.second.sample(rng))
    }

    fn apply_with(&self, params: &Self::Params, input: I) -> Result<O> {
        self.first
            .apply_with(&params.0, input)
            .and_then(|mid| self.second.apply_with(&params.1, mid))
            .with_context(|| {
                format!(
                    "Transform chain failed: {} -> {}",
                    std::any::type_name::<A>(),
                    std::any::type_name::<B>(),
                )
            })
    }
}

/// Clip-level application for any paired transform.
///
/// A clip is an equal-length list of images and labels, paired by index.
/// `apply_clip` draws the transform's parameters exactly once and applies
/// them to every frame, so a whole clip receives the identical flip decision,
/// crop offset, or rotation angle (temporal consistency of augmentation).
pub trait ClipTransform<A, B, C, D>: PairedTransform<(A, B), (C, D)> {
    fn apply_clip<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        images: Vec<A>,
        labels: Vec<B>,
    ) -> Result<(Vec<C>, Vec<D>)> {
        ensure!(
            images.len() == labels.len(),
            "Clip image and label lists must have equal length (got {} images, {} labels)",
            images.len(),
            labels.len()
        );

        let params = self.sample(rng);
        let mut out_images = Vec::with_capacity(images.len());
        let mut out_labels = Vec::with_capacity(labels.len());
        for (frame, (image, label)) in images.into_iter().zip(labels).enumerate() {
            let (image, label) = self
                .apply_with(&params, (image, label))
                .with_context(|| format!("Failed to transform clip frame {}", frame))?;
            out_images.push(image);
            out_labels.push(label);
        }
        Ok((out_images, out_labels))
    }
}

impl<T, A, B, C, D> ClipTransform<A, B, C, D> for T where T: PairedTransform<(A, B), (C, D)> {}

// ============================================================================
// Compose
// ============================================================================

/// Object-safe form of a same-typed step, used by [`Compose`] to hold
/// heterogeneous transforms behind `Box<dyn ...>`. Sampled parameters are
/// erased to `Box<dyn Any>` and downcast back by the step that drew them.
trait ErasedStep<A, B>: Send + Sync {
    fn sample_erased(&self, rng: &mut dyn RngCore) -> Box<dyn Any + Send>;

    fn apply_erased(&self, params: &(dyn Any + Send), image: A, label: B) -> Result<(A, B)>;
}

impl<T, A, B> ErasedStep<A, B> for T
where
    T: PairedTransform<(A, B), (A, B)>,
    T::Params: Any,
{
    fn sample_erased(&self, rng: &mut dyn RngCore) -> Box<dyn Any + Send> {
        Box::new(self.sample(rng))
    }

    fn apply_erased(&self, params: &(dyn Any + Send), image: A, label: B) -> Result<(A, B)> {
        let params = params
            .downcast_ref::<T::Params>()
            .ok_or_else(|| anyhow!("Sampled parameters do not match the step that drew them"))?;
        self.apply_with(params, (image, label))
    }
}

/// An ordered list of same-typed transform steps, applied left-to-right.
///
/// Each contained step draws its own parameters once per invocation; an empty
/// `Compose` is the identity. `Compose` implements [`PairedTransform`]
/// itself, so a composed augmentation stage can be chained with `.then(...)`
/// into a larger pipeline and applied to clips via
/// [`ClipTransform::apply_clip`] with one draw per step per clip.
///
/// # Example
/// ```ignore
/// let augment = Compose::new()
///     .with(RandomHorizontalFlip::new(0.5)?)
///     .with(RandomVerticalFlip::new(0.5)?)
///     .with(RandomCropResize::new(10));
/// let (image, label) = augment.apply(&mut rng, (image, label))?;
/// ```
pub struct Compose<A: 'static, B: 'static> {
    steps: Vec<Box<dyn ErasedStep<A, B>>>,
}

impl<A, B> Compose<A, B> {
    /// Creates an empty composition.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step to the end of the pipeline.
    pub fn with<T>(mut self, step: T) -> Self
    where
        T: PairedTransform<(A, B), (A, B)> + 'static,
        T::Params: Any,
    {
        self.steps.push(Box::new(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<A, B> Default for Compose<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, B> fmt::Debug for Compose<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compose")
            .field("steps", &self.steps.len())
            .finish()
    }
}

impl<A, B> PairedTransform<(A, B), (A, B)> for Compose<A, B>
where
    A: Send,
    B: Send,
{
    type Params = Vec<Box<dyn Any + Send>>;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Params {
        let mut rng = rng;
        let rng: &mut dyn RngCore = &mut rng;
        self.steps
            .iter()
            .map(|step| step.sample_erased(&mut *rng))
            .collect()
    }

    fn apply_with(&self, params: &Self::Params, (image, label): (A, B)) -> Result<(A, B)> {
        ensure!(
            params.len() == self.steps.len(),
            "Composed pipeline was given {} parameter sets for {} steps",
            params.len(),
            self.steps.len()
        );

        let mut pair = (image, label);
        for (index, (step, params)) in self.steps.iter().zip(params).enumerate() {
            pair = step
                .apply_erased(params.as_ref(), pair.0, pair.1)
                .with_context(|| format!("Composed transform step {} failed", index))?;
        }
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct AddOffset(i32);
    impl PairedTransform<(i32, i32), (i32, i32)> for AddOffset {
        type Params = ();
        fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self::Params {}
        fn apply_with(&self, _params: &(), (a, b): (i32, i32)) -> Result<(i32, i32)> {
            Ok((a + self.0, b + self.0))
        }
    }

    struct Double;
    impl PairedTransform<(i32, i32), (i32, i32)> for Double {
        type Params = ();
        fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self::Params {}
        fn apply_with(&self, _params: &(), (a, b): (i32, i32)) -> Result<(i32, i32)> {
            Ok((a * 2, b * 2))
        }
    }

    struct RandomShift;
    impl PairedTransform<(i32, i32), (i32, i32)> for RandomShift {
        type Params = i32;
        fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
            rng.random_range(0..1000)
        }
        fn apply_with(&self, shift: &i32, (a, b): (i32, i32)) -> Result<(i32, i32)> {
            Ok((a + shift, b + shift))
        }
    }

    #[test]
    fn test_chain_applies_in_order() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let chain = AddOffset(1).then(Double);
        assert_eq!(chain.apply(&mut rng, (1, 2))?, (4, 6));

        let reversed = Double.then(AddOffset(1));
        assert_eq!(reversed.apply(&mut rng, (1, 2))?, (3, 5));
        Ok(())
    }

    #[test]
    fn test_chain_error_context() {
        struct Fail;
        impl PairedTransform<(i32, i32), (i32, i32)> for Fail {
            type Params = ();
            fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self::Params {}
            fn apply_with(&self, _params: &(), _pair: (i32, i32)) -> Result<(i32, i32)> {
                Err(anyhow!("Test error"))
            }
        }

        let mut rng = StdRng::seed_from_u64(42);
        let chain = Chain::new(AddOffset(1), Fail);
        let err = chain.apply(&mut rng, (0, 0)).unwrap_err();
        let msg = format!("{:#}", err);

        assert!(msg.contains("Transform chain failed"));
        assert!(msg.contains("AddOffset"));
        assert!(msg.contains("Fail"));
    }

    #[test]
    fn test_sampled_params_replay_identically() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let transform = RandomShift;

        let params = transform.sample(&mut rng);
        let first = transform.apply_with(&params, (0, 100))?;
        let second = transform.apply_with(&params, (0, 100))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_compose_applies_in_order() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let pipeline = Compose::new().with(AddOffset(1)).with(Double);
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.apply(&mut rng, (1, 2))?, (4, 6));
        Ok(())
    }

    #[test]
    fn test_empty_compose_is_identity() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let pipeline: Compose<i32, i32> = Compose::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply(&mut rng, (5, 9))?, (5, 9));
        Ok(())
    }

    #[test]
    fn test_clip_shares_one_draw_across_frames() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let transform = RandomShift;

        let images = vec![0, 0, 0, 0];
        let labels = vec![10, 10, 10, 10];
        let (out_images, out_labels) = transform.apply_clip(&mut rng, images, labels)?;

        assert_eq!(out_images.len(), 4);
        assert_eq!(out_labels.len(), 4);
        // Identical inputs plus a single shared draw means identical outputs.
        assert!(out_images.windows(2).all(|w| w[0] == w[1]));
        assert!(out_labels.windows(2).all(|w| w[0] == w[1]));
        Ok(())
    }

    #[test]
    fn test_clip_rejects_mismatched_lengths() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = RandomShift
            .apply_clip(&mut rng, vec![1, 2, 3], vec![1, 2])
            .unwrap_err();
        assert!(err.to_string().contains("equal length"));
    }

    #[test]
    fn test_empty_clip() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let (images, labels) = RandomShift.apply_clip(&mut rng, vec![], vec![])?;
        assert!(images.is_empty());
        assert!(labels.is_empty());
        Ok(())
    }
}
