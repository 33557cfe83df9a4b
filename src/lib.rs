// ============================================================================
// Collection Renderer Library
// ============================================================================

//! Paginated collection rendering for control-plane list endpoints.
//!
//! A request's query options are validated against [`ServerLimits`], one
//! bounded page is read from a [`storage::Dataset`], related entities are
//! inlined (or hoisted into `orphans`), and prev/next links are built so
//! that walking them visits the whole collection.
//!
//! ```
//! use collection_renderer::{
//!     CollectionDescriptor, MemoryDataset, PaginatedCollectionRenderer, QueryParams, Record,
//!     ServerLimits,
//! };
//!
//! # fn main() -> collection_renderer::Result<()> {
//! let services = MemoryDataset::from_rows(vec![
//!     Record::new("services", "svc-1").attr("label", "mysql"),
//!     Record::new("services", "svc-2").attr("label", "redis"),
//! ]);
//! let renderer = PaginatedCollectionRenderer::new(ServerLimits::new());
//! let descriptor = CollectionDescriptor::new("services");
//! let params = QueryParams::parse("results-per-page=1");
//!
//! let document =
//!     renderer.render_query(&descriptor, &services, &descriptor.base_path(), &params)?;
//! assert_eq!(document.total_results, 2);
//! assert_eq!(document.total_pages, 2);
//! assert!(document.prev_url.is_none());
//! assert!(document.next_url.is_some());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod query;
pub mod render;
pub mod storage;
pub mod web;

// Re-export main types for convenience
pub use config::ServerLimits;
pub use crate::core::{OrderDirection, RenderError, ResourceKey, Result, Timestamps, Value};
pub use query::{QueryFilter, QueryParams, RawRenderOptions, RenderOptions};
pub use render::{
    AttributeExporter, CollectionDescriptor, CollectionTransformer, Export, Exporter,
    PaginatedCollectionRenderer, Related, Relation, RenderedDocument, Resource,
};
pub use storage::{Dataset, MemoryDataset, Record};
