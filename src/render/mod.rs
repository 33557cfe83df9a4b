pub mod collection;
pub mod document;
pub mod links;
pub mod page;
pub mod relations;
pub mod resource;

pub use collection::{
    CollectionDescriptor, DEFAULT_API_PREFIX, DEFAULT_ORDER_BY, PaginatedCollectionRenderer,
};
pub use document::{RenderedDocument, total_pages};
pub use links::{PageLinks, build_links};
pub use page::{PageResult, check_total_results, select};
pub use relations::{OrphanMap, RelationSerializer, resource_url};
pub use resource::{
    AttributeExporter, CollectionTransformer, Export, Exporter, Related, Relation, Resource,
    metadata_field,
};
