//! Render options: parsing from query parameters and validation against
//! the server limits.
//!
//! Parsing only rejects values that are not integers at all. Range checks
//! live in [`validate`], which runs before any dataset access.

use crate::config::ServerLimits;
use crate::core::{OrderDirection, RenderError, Result};
use crate::query::QueryParams;

pub const PARAM_PAGE: &str = "page";
pub const PARAM_RESULTS_PER_PAGE: &str = "results-per-page";
pub const PARAM_INLINE_RELATIONS_DEPTH: &str = "inline-relations-depth";
pub const PARAM_ORPHAN_RELATIONS: &str = "orphan-relations";
pub const PARAM_EXCLUDE_RELATIONS: &str = "exclude-relations";
pub const PARAM_INCLUDE_RELATIONS: &str = "include-relations";
pub const PARAM_ORDER_BY: &str = "order-by";
pub const PARAM_ORDER_DIRECTION: &str = "order-direction";

/// Options exactly as the caller supplied them, before bounds checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRenderOptions {
    pub page: Option<i64>,
    pub results_per_page: Option<i64>,
    pub inline_relations_depth: Option<i64>,
    /// Raw value of `orphan-relations`; presence alone enables extraction.
    pub orphan_relations: Option<String>,
    pub exclude_relations: Option<Vec<String>>,
    pub include_relations: Option<Vec<String>>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
    /// Ceiling on `page * results_per_page`. Never read from the query string.
    pub max_total_results: Option<u32>,
}

impl RawRenderOptions {
    /// Extracts the recognized pagination and relation keys.
    ///
    /// Unknown keys are left for link reconstruction and never inspected.
    pub fn from_params(params: &QueryParams) -> Result<Self> {
        Ok(Self {
            page: parse_integer(params, PARAM_PAGE, "page")?,
            results_per_page: parse_integer(params, PARAM_RESULTS_PER_PAGE, "results_per_page")?,
            inline_relations_depth: parse_integer(
                params,
                PARAM_INLINE_RELATIONS_DEPTH,
                "inline_relations_depth",
            )?,
            orphan_relations: params.get(PARAM_ORPHAN_RELATIONS).map(str::to_string),
            exclude_relations: params.get(PARAM_EXCLUDE_RELATIONS).map(split_relation_list),
            include_relations: params.get(PARAM_INCLUDE_RELATIONS).map(split_relation_list),
            order_by: params
                .get(PARAM_ORDER_BY)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            order_direction: params.get(PARAM_ORDER_DIRECTION).map(str::to_string),
            max_total_results: None,
        })
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn results_per_page(mut self, results_per_page: i64) -> Self {
        self.results_per_page = Some(results_per_page);
        self
    }

    pub fn inline_relations_depth(mut self, depth: i64) -> Self {
        self.inline_relations_depth = Some(depth);
        self
    }

    pub fn orphan_relations(mut self, raw: impl Into<String>) -> Self {
        self.orphan_relations = Some(raw.into());
        self
    }

    pub fn exclude_relations<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_relations = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn include_relations<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_relations = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn order_direction(mut self, direction: impl Into<String>) -> Self {
        self.order_direction = Some(direction.into());
        self
    }

    pub fn max_total_results(mut self, max: u32) -> Self {
        self.max_total_results = Some(max);
        self
    }
}

/// Validated, immutable options for one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub page: u32,
    pub results_per_page: u32,
    /// `None` when the caller did not ask for inlining; depth is then 0.
    pub inline_relations_depth: Option<u32>,
    pub orphan_relations: Option<String>,
    pub exclude_relations: Option<Vec<String>>,
    pub include_relations: Option<Vec<String>>,
    pub order_by: Option<String>,
    pub order_direction: OrderDirection,
    pub max_total_results: Option<u32>,
}

impl RenderOptions {
    pub fn depth(&self) -> u32 {
        self.inline_relations_depth.unwrap_or(0)
    }

    pub fn orphans_enabled(&self) -> bool {
        self.orphan_relations.is_some()
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.results_per_page)
    }

    pub fn is_excluded(&self, relation: &str) -> bool {
        contains_name(self.exclude_relations.as_deref(), relation)
    }

    pub fn is_included(&self, relation: &str) -> bool {
        contains_name(self.include_relations.as_deref(), relation)
    }
}

/// Checks caller-supplied options against the server limits.
///
/// The `max_total_results` ceiling is carried through untouched; it is
/// enforced by the page selector once page and size are both resolved.
pub fn validate(raw: RawRenderOptions, limits: &ServerLimits) -> Result<RenderOptions> {
    let results_per_page = match raw.results_per_page {
        None => limits.default_results_per_page,
        Some(value) => {
            let value = positive(value, "results_per_page")?;
            if value > limits.max_results_per_page {
                return Err(RenderError::invalid(
                    "results_per_page",
                    format!("must be <= {}", limits.max_results_per_page),
                ));
            }
            value
        }
    };

    let inline_relations_depth = match raw.inline_relations_depth {
        None => None,
        Some(value) => {
            let depth = u32::try_from(value).map_err(|_| {
                RenderError::invalid("inline_relations_depth", "must be a non-negative integer")
            })?;
            if depth > limits.max_inline_relations_depth {
                return Err(RenderError::invalid(
                    "inline_relations_depth",
                    format!("must be <= {}", limits.max_inline_relations_depth),
                ));
            }
            Some(depth)
        }
    };

    let page = match raw.page {
        None => 1,
        Some(value) => positive(value, "page")?,
    };

    let order_direction = match raw.order_direction.as_deref() {
        None => OrderDirection::Asc,
        Some(value) => OrderDirection::parse(value).ok_or_else(|| {
            RenderError::invalid("order_direction", "must be one of: asc, desc")
        })?,
    };

    Ok(RenderOptions {
        page,
        results_per_page,
        inline_relations_depth,
        orphan_relations: raw.orphan_relations,
        exclude_relations: raw.exclude_relations,
        include_relations: raw.include_relations,
        order_by: raw.order_by,
        order_direction,
        max_total_results: raw.max_total_results,
    })
}

fn positive(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| RenderError::invalid(field, "must be a positive integer"))
}

fn parse_integer(params: &QueryParams, key: &str, field: &str) -> Result<Option<i64>> {
    params
        .get(key)
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| RenderError::invalid(field, "must be an integer"))
        })
        .transpose()
}

fn split_relation_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_name(names: Option<&[String]>, relation: &str) -> bool {
    names.is_some_and(|names| names.iter().any(|name| name == relation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ServerLimits {
        ServerLimits::new()
            .default_results_per_page(25)
            .max_results_per_page(100)
            .max_inline_relations_depth(2)
    }

    #[test]
    fn test_defaults_when_nothing_supplied() {
        let options = validate(RawRenderOptions::default(), &limits()).unwrap();
        assert_eq!(options.page, 1);
        assert_eq!(options.results_per_page, 25);
        assert_eq!(options.depth(), 0);
        assert_eq!(options.order_direction, OrderDirection::Asc);
        assert!(!options.orphans_enabled());
        assert_eq!(options.offset(), 0);
    }

    #[test]
    fn test_results_per_page_at_max_is_accepted() {
        let raw = RawRenderOptions::default().results_per_page(100);
        assert_eq!(validate(raw, &limits()).unwrap().results_per_page, 100);
    }

    #[test]
    fn test_results_per_page_above_max_is_rejected() {
        let raw = RawRenderOptions::default().results_per_page(101);
        let err = validate(raw, &limits()).unwrap_err();
        assert_eq!(err.field(), Some("results_per_page"));
        assert!(err.to_string().contains("must be <= 100"));
    }

    #[test]
    fn test_non_positive_results_per_page_is_rejected() {
        for value in [0, -5] {
            let raw = RawRenderOptions::default().results_per_page(value);
            let err = validate(raw, &limits()).unwrap_err();
            assert_eq!(err.field(), Some("results_per_page"));
        }
    }

    #[test]
    fn test_inline_depth_bounds() {
        let ok = RawRenderOptions::default().inline_relations_depth(2);
        assert_eq!(validate(ok, &limits()).unwrap().depth(), 2);

        let too_deep = RawRenderOptions::default().inline_relations_depth(3);
        let err = validate(too_deep, &limits()).unwrap_err();
        assert_eq!(err.field(), Some("inline_relations_depth"));

        let negative = RawRenderOptions::default().inline_relations_depth(-1);
        let err = validate(negative, &limits()).unwrap_err();
        assert_eq!(err.field(), Some("inline_relations_depth"));
    }

    #[test]
    fn test_order_direction_is_case_sensitive() {
        let desc = RawRenderOptions::default().order_direction("desc");
        assert_eq!(
            validate(desc, &limits()).unwrap().order_direction,
            OrderDirection::Desc
        );

        let upper = RawRenderOptions::default().order_direction("ASC");
        let err = validate(upper, &limits()).unwrap_err();
        assert_eq!(err.field(), Some("order_direction"));
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let err = validate(RawRenderOptions::default().page(0), &limits()).unwrap_err();
        assert_eq!(err.field(), Some("page"));
    }

    #[test]
    fn test_max_total_results_is_not_checked_here() {
        let raw = RawRenderOptions::default()
            .page(50)
            .results_per_page(100)
            .max_total_results(10);
        let options = validate(raw, &limits()).unwrap();
        assert_eq!(options.max_total_results, Some(10));
    }

    #[test]
    fn test_from_params_extracts_recognized_keys() {
        let params = QueryParams::parse(
            "q=name:foo&page=3&results-per-page=10&inline-relations-depth=1\
             &orphan-relations=0&exclude-relations=spaces,%20routes,&include-relations=owner\
             &order-by=name&order-direction=desc",
        );
        let raw = RawRenderOptions::from_params(&params).unwrap();

        assert_eq!(raw.page, Some(3));
        assert_eq!(raw.results_per_page, Some(10));
        assert_eq!(raw.inline_relations_depth, Some(1));
        assert_eq!(raw.orphan_relations.as_deref(), Some("0"));
        assert_eq!(
            raw.exclude_relations,
            Some(vec!["spaces".to_string(), "routes".to_string()])
        );
        assert_eq!(raw.include_relations, Some(vec!["owner".to_string()]));
        assert_eq!(raw.order_by.as_deref(), Some("name"));
        assert_eq!(raw.order_direction.as_deref(), Some("desc"));
        assert_eq!(raw.max_total_results, None);
    }

    #[test]
    fn test_from_params_rejects_non_integers() {
        let params = QueryParams::parse("results-per-page=ten");
        let err = RawRenderOptions::from_params(&params).unwrap_err();
        assert_eq!(err.field(), Some("results_per_page"));
    }

    #[test]
    fn test_zero_orphan_relations_still_enables_extraction() {
        let raw = RawRenderOptions::default().orphan_relations("0");
        assert!(validate(raw, &limits()).unwrap().orphans_enabled());
    }

    #[test]
    fn test_relation_name_lookup() {
        let raw = RawRenderOptions::default()
            .exclude_relations(["spaces"])
            .include_relations(["owner"]);
        let options = validate(raw, &limits()).unwrap();
        assert!(options.is_excluded("spaces"));
        assert!(!options.is_excluded("owner"));
        assert!(options.is_included("owner"));
        assert!(!options.is_included("spaces"));
    }
}
