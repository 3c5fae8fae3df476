//! Fixed-size batch submission over a lazily consumed sequence.
//!
//! Store adapters cap the number of writes a single request may carry. The
//! helper here pulls items from any iterator, groups them into chunks of at
//! most [`BatchSize`] and awaits a caller-supplied submit function per chunk.
//! It knows nothing about the store, so the chunking contract is tested
//! without one.

use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;

/// Maximum number of write requests the relationship store accepts per batch.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

/// Validation error for [`BatchSize::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BatchSizeError {
    /// Zero-sized batches would never make progress.
    #[error("batch size must be at least 1")]
    Zero,
    /// The requested size exceeds the store's batch-write limit.
    #[error("batch size {requested} exceeds the store limit of {MAX_BATCH_WRITE_ITEMS}")]
    AboveStoreLimit {
        /// Size that was asked for.
        requested: usize,
    },
}

/// Upper bound on the number of items submitted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(NonZeroUsize);

impl BatchSize {
    /// Validate a batch size against the store limit.
    pub fn new(size: usize) -> Result<Self, BatchSizeError> {
        if size > MAX_BATCH_WRITE_ITEMS {
            return Err(BatchSizeError::AboveStoreLimit { requested: size });
        }
        NonZeroUsize::new(size)
            .map(Self)
            .ok_or(BatchSizeError::Zero)
    }

    /// Largest batch the store accepts.
    pub fn store_limit() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(MAX_BATCH_WRITE_ITEMS - 1))
    }

    /// Size as a plain integer.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self::store_limit()
    }
}

/// Totals for batches that were accepted by the submit function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Items contained in accepted batches.
    pub items: usize,
    /// Number of accepted batches.
    pub batches: usize,
}

/// A batch submission failed part-way through the sequence.
///
/// Batches accepted before the failure stay committed; `committed` records
/// how far the sequence got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSubmitError<E> {
    /// Work accepted before the failing batch.
    pub committed: BatchReport,
    /// Error returned for the failing batch.
    pub source: E,
}

impl<E: fmt::Display> fmt::Display for BatchSubmitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batch {} failed after {} item(s) were committed: {}",
            self.committed.batches + 1,
            self.committed.items,
            self.source
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for BatchSubmitError<E> {}

/// Submit `items` in chunks of at most `size`, stopping at the first failure.
///
/// An empty sequence submits nothing and reports zero batches.
///
/// # Examples
/// ```
/// use user_causes::domain::batching::{BatchSize, submit_in_batches};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut sizes = Vec::new();
/// let report = submit_in_batches(0..30, BatchSize::store_limit(), |batch| {
///     sizes.push(batch.len());
///     async { Ok::<(), std::convert::Infallible>(()) }
/// })
/// .await
/// .expect("infallible");
/// assert_eq!(sizes, vec![25, 5]);
/// assert_eq!(report.batches, 2);
/// # });
/// ```
pub async fn submit_in_batches<T, I, F, Fut, E>(
    items: I,
    size: BatchSize,
    mut submit: F,
) -> Result<BatchReport, BatchSubmitError<E>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut iter = items.into_iter();
    let mut report = BatchReport::default();
    loop {
        let batch: Vec<T> = iter.by_ref().take(size.get()).collect();
        if batch.is_empty() {
            return Ok(report);
        }
        let len = batch.len();
        if let Err(source) = submit(batch).await {
            return Err(BatchSubmitError {
                committed: report,
                source,
            });
        }
        report.items += len;
        report.batches += 1;
    }
}
