use crate::core::{RenderError, Result};
use crate::query::RenderOptions;
use crate::storage::{Dataset, SliceRequest};

/// One materialized page plus the facts needed for navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub resources: Vec<T>,
    /// Rows in the whole dataset, independent of any `max_total_results`.
    pub total_count: u64,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Checks the `max_total_results` ceiling without touching the dataset.
pub fn check_total_results(options: &RenderOptions) -> Result<()> {
    if let Some(max) = options.max_total_results {
        let highest = options.offset() + u64::from(options.results_per_page);
        if highest > u64::from(max) {
            return Err(RenderError::invalid(
                "total_results",
                format!("must be less than {max}"),
            ));
        }
    }
    Ok(())
}

/// Counts the dataset and fetches exactly the requested page.
///
/// `order_by` is the resolved sort key; callers pass the descriptor default
/// when the request did not name one.
pub fn select<D: Dataset>(
    dataset: &D,
    options: &RenderOptions,
    order_by: &str,
) -> Result<PageResult<D::Item>> {
    check_total_results(options)?;

    let offset = options.offset();
    let total_count = dataset.count()?;
    let resources = dataset.fetch(&SliceRequest {
        offset,
        limit: options.results_per_page,
        order_by,
        direction: options.order_direction,
    })?;

    Ok(PageResult {
        resources,
        total_count,
        has_prev: options.page > 1,
        has_next: offset + u64::from(options.results_per_page) < total_count,
    })
}
