pub mod memory;
pub mod record;

pub use memory::MemoryDataset;
pub use record::{Record, RecordRelation};

use crate::core::{OrderDirection, Result};
use crate::render::Resource;

/// Bounded, ordered window requested from a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceRequest<'a> {
    pub offset: u64,
    pub limit: u32,
    pub order_by: &'a str,
    pub direction: OrderDirection,
}

/// Lazily evaluated, ordered view over domain entities.
///
/// Implementations must not materialize rows outside the requested slice.
/// The renderer only ever reads through this trait.
pub trait Dataset {
    type Item: Resource;

    /// Number of rows in the full view, before paging.
    fn count(&self) -> Result<u64>;

    fn fetch(&self, slice: &SliceRequest<'_>) -> Result<Vec<Self::Item>>;
}

impl<D: Dataset + ?Sized> Dataset for &D {
    type Item = D::Item;

    fn count(&self) -> Result<u64> {
        (**self).count()
    }

    fn fetch(&self, slice: &SliceRequest<'_>) -> Result<Vec<Self::Item>> {
        (**self).fetch(slice)
    }
}
