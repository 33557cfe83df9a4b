use crate::config::ServerLimits;
use crate::core::{RenderError, Result};
use crate::query::{QueryParams, RawRenderOptions, RenderOptions, validate};
use crate::render::{
    AttributeExporter, CollectionTransformer, Exporter, RelationSerializer, RenderedDocument,
    Resource, build_links, check_total_results, select,
};
use crate::storage::Dataset;
use std::sync::Arc;
use tracing::{Level, event, info_span};

pub const DEFAULT_API_PREFIX: &str = "/v2";
pub const DEFAULT_ORDER_BY: &str = "id";

/// Static description of one collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDescriptor {
    pub resource_type: String,
    pub api_prefix: String,
    pub default_order_by: String,
    /// Fields accepted in `order-by` besides the default.
    pub sortable_fields: Vec<String>,
    /// Fields accepted in `q=field:value` filters.
    pub queryable_fields: Vec<String>,
    /// Ceiling applied when the caller does not supply one.
    pub max_total_results: Option<u32>,
}

impl CollectionDescriptor {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            default_order_by: DEFAULT_ORDER_BY.to_string(),
            sortable_fields: Vec::new(),
            queryable_fields: Vec::new(),
            max_total_results: None,
        }
    }

    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    pub fn default_order_by(mut self, field: impl Into<String>) -> Self {
        self.default_order_by = field.into();
        self
    }

    pub fn sortable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sortable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn queryable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queryable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_total_results(mut self, max: u32) -> Self {
        self.max_total_results = Some(max);
        self
    }

    /// Collection path, e.g. `/v2/service_plans`.
    pub fn base_path(&self) -> String {
        format!("{}/{}", self.api_prefix, self.resource_type)
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        field == self.default_order_by || self.sortable_fields.iter().any(|f| f == field)
    }

    pub fn is_queryable(&self, field: &str) -> bool {
        self.queryable_fields.iter().any(|f| f == field)
    }
}

/// Renders bounded pages of a collection into response documents.
///
/// One renderer is built at startup per item type and shared across
/// requests; it holds no per-request state.
pub struct PaginatedCollectionRenderer<R> {
    limits: ServerLimits,
    exporter: Arc<dyn Exporter>,
    transformer: Option<Arc<dyn CollectionTransformer<R>>>,
}

impl<R> Clone for PaginatedCollectionRenderer<R> {
    fn clone(&self) -> Self {
        Self {
            limits: self.limits,
            exporter: Arc::clone(&self.exporter),
            transformer: self.transformer.clone(),
        }
    }
}

impl<R: Resource> PaginatedCollectionRenderer<R> {
    pub fn new(limits: ServerLimits) -> Self {
        Self {
            limits,
            exporter: Arc::new(AttributeExporter),
            transformer: None,
        }
    }

    pub fn with_exporter(mut self, exporter: impl Exporter + 'static) -> Self {
        self.exporter = Arc::new(exporter);
        self
    }

    pub fn with_transformer(mut self, transformer: impl CollectionTransformer<R> + 'static) -> Self {
        self.transformer = Some(Arc::new(transformer));
        self
    }

    pub fn limits(&self) -> &ServerLimits {
        &self.limits
    }

    /// Parses the recognized options out of `params` and renders.
    pub fn render_query<D>(
        &self,
        descriptor: &CollectionDescriptor,
        dataset: &D,
        base_path: &str,
        params: &QueryParams,
    ) -> Result<RenderedDocument>
    where
        D: Dataset<Item = R>,
    {
        let raw = RawRenderOptions::from_params(params)?;
        self.render(descriptor, dataset, base_path, raw, params)
    }

    /// Renders one page of `dataset`.
    ///
    /// Every option is validated before the dataset is read. Rows the
    /// exporter skips are left out of `resources`; `total_results` still
    /// reflects the dataset count.
    pub fn render<D>(
        &self,
        descriptor: &CollectionDescriptor,
        dataset: &D,
        base_path: &str,
        mut raw: RawRenderOptions,
        params: &QueryParams,
    ) -> Result<RenderedDocument>
    where
        D: Dataset<Item = R>,
    {
        let span = info_span!(
            "render.collection",
            resource_type = %descriptor.resource_type,
            base_path = %base_path
        );
        let _enter = span.enter();

        if raw.max_total_results.is_none() {
            raw.max_total_results = descriptor.max_total_results;
        }
        let options = self.prepare(descriptor, raw)?;
        let order_by = options
            .order_by
            .as_deref()
            .unwrap_or(&descriptor.default_order_by);

        let mut page = select(dataset, &options, order_by)?;
        event!(
            Level::DEBUG,
            page = options.page,
            results_per_page = options.results_per_page,
            total_count = page.total_count,
            loaded = page.resources.len(),
            "collection page selected"
        );

        if let Some(transformer) = &self.transformer {
            transformer.transform(&mut page.resources);
        }

        let mut serializer = RelationSerializer::new(
            self.exporter.as_ref(),
            &options,
            &descriptor.api_prefix,
            self.limits.max_inline_relations_depth,
        );
        let resources: Vec<_> = page
            .resources
            .iter()
            .filter_map(|resource| serializer.serialize(resource))
            .collect();
        let skipped = page.resources.len() - resources.len();
        if skipped > 0 {
            event!(Level::DEBUG, skipped, "resources dropped during export");
        }
        let orphans = serializer.into_orphans();

        let links = build_links(base_path, &options, params, &page);
        Ok(RenderedDocument::assemble(
            page.total_count,
            options.results_per_page,
            resources,
            orphans,
            links,
        ))
    }

    /// Runs every check that does not need the dataset.
    fn prepare(
        &self,
        descriptor: &CollectionDescriptor,
        raw: RawRenderOptions,
    ) -> Result<RenderOptions> {
        let options = validate(raw, &self.limits)?;

        if let Some(order_by) = options.order_by.as_deref()
            && !descriptor.is_sortable(order_by)
        {
            return Err(RenderError::invalid(
                "order_by",
                format!("cannot order by '{order_by}'"),
            ));
        }

        check_total_results(&options)?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryDataset, Record};

    #[test]
    fn test_descriptor_paths_and_fields() {
        let descriptor = CollectionDescriptor::new("service_plans")
            .sortable(["name"])
            .queryable(["service_guid"]);

        assert_eq!(descriptor.base_path(), "/v2/service_plans");
        assert!(descriptor.is_sortable("id"));
        assert!(descriptor.is_sortable("name"));
        assert!(!descriptor.is_sortable("price"));
        assert!(descriptor.is_queryable("service_guid"));
        assert!(!descriptor.is_queryable("name"));
    }

    #[test]
    fn test_unsortable_field_is_rejected() {
        let renderer = PaginatedCollectionRenderer::<Record>::new(ServerLimits::new());
        let descriptor = CollectionDescriptor::new("services");
        let dataset = MemoryDataset::<Record>::new();

        let err = renderer
            .render(
                &descriptor,
                &dataset,
                "/v2/services",
                RawRenderOptions::default().order_by("price"),
                &QueryParams::new(),
            )
            .unwrap_err();
        assert_eq!(err.field(), Some("order_by"));
    }

    #[test]
    fn test_descriptor_ceiling_applies_when_caller_omits_it() {
        let renderer = PaginatedCollectionRenderer::<Record>::new(ServerLimits::new());
        let descriptor = CollectionDescriptor::new("service_usage_events").max_total_results(20);
        let dataset = MemoryDataset::<Record>::new();

        let err = renderer
            .render(
                &descriptor,
                &dataset,
                "/v2/service_usage_events",
                RawRenderOptions::default().page(3).results_per_page(10),
                &QueryParams::new(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("must be less than 20"));
    }
}
