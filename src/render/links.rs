use crate::query::options::{
    PARAM_EXCLUDE_RELATIONS, PARAM_INCLUDE_RELATIONS, PARAM_INLINE_RELATIONS_DEPTH,
    PARAM_ORDER_BY, PARAM_ORDER_DIRECTION, PARAM_ORPHAN_RELATIONS, PARAM_PAGE,
    PARAM_RESULTS_PER_PAGE,
};
use crate::query::{QueryParams, RenderOptions};
use crate::render::PageResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

/// Builds `prev`/`next` URLs that replay the caller's query.
///
/// Every caller parameter is echoed verbatim; only `page` changes between
/// the two links. `results-per-page` and `order-direction` are always
/// emitted, the remaining option keys only when the caller supplied them.
pub fn build_links<T>(
    base_path: &str,
    options: &RenderOptions,
    params: &QueryParams,
    page: &PageResult<T>,
) -> PageLinks {
    let template = link_params(options, params);
    let url_for = |number: u32| {
        let mut query = template.clone();
        query.set(PARAM_PAGE, number.to_string());
        format!("{base_path}?{}", query.to_query_string())
    };

    PageLinks {
        prev_url: page.has_prev.then(|| url_for(options.page - 1)),
        next_url: page.has_next.then(|| url_for(options.page + 1)),
    }
}

fn link_params(options: &RenderOptions, params: &QueryParams) -> QueryParams {
    let mut query = params.clone();
    // Reserve the slot so `page` keeps the caller's position when present.
    query.set(PARAM_PAGE, options.page.to_string());
    query.set(PARAM_RESULTS_PER_PAGE, options.results_per_page.to_string());
    query.set(PARAM_ORDER_DIRECTION, options.order_direction.as_str());

    if let Some(order_by) = &options.order_by {
        query.set(PARAM_ORDER_BY, order_by.as_str());
    }
    if let Some(depth) = options.inline_relations_depth {
        query.set(PARAM_INLINE_RELATIONS_DEPTH, depth.to_string());
    }
    if let Some(orphans) = &options.orphan_relations {
        query.set(PARAM_ORPHAN_RELATIONS, orphans.as_str());
    }
    if let Some(names) = &options.exclude_relations {
        query.set(PARAM_EXCLUDE_RELATIONS, names.join(","));
    }
    if let Some(names) = &options.include_relations {
        query.set(PARAM_INCLUDE_RELATIONS, names.join(","));
    }
    query
}
