use crate::render::{CollectionDescriptor, PaginatedCollectionRenderer};
use crate::storage::{MemoryDataset, Record};
use std::collections::HashMap;
use std::sync::Arc;

/// One listable collection: how it is described and where its rows live.
#[derive(Clone)]
pub struct MemoryCollection {
    pub descriptor: CollectionDescriptor,
    pub dataset: MemoryDataset<Record>,
}

#[derive(Clone)]
pub struct ApiState {
    renderer: PaginatedCollectionRenderer<Record>,
    collections: Arc<HashMap<String, MemoryCollection>>,
}

impl ApiState {
    pub fn new(renderer: PaginatedCollectionRenderer<Record>) -> Self {
        Self {
            renderer,
            collections: Arc::new(HashMap::new()),
        }
    }

    /// Registers a collection under its resource type, replacing any
    /// previous one.
    pub fn register(mut self, descriptor: CollectionDescriptor, dataset: MemoryDataset<Record>) -> Self {
        let name = descriptor.resource_type.clone();
        Arc::make_mut(&mut self.collections).insert(
            name,
            MemoryCollection {
                descriptor,
                dataset,
            },
        );
        self
    }

    pub fn collection(&self, name: &str) -> Option<&MemoryCollection> {
        self.collections.get(name)
    }

    pub fn collection_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.collections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn renderer(&self) -> &PaginatedCollectionRenderer<Record> {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerLimits;

    #[test]
    fn test_register_and_lookup() {
        let state = ApiState::new(PaginatedCollectionRenderer::new(ServerLimits::new()))
            .register(CollectionDescriptor::new("services"), MemoryDataset::new())
            .register(CollectionDescriptor::new("organizations"), MemoryDataset::new());

        assert_eq!(state.collection_names(), vec!["organizations", "services"]);
        assert!(state.collection("services").is_some());
        assert!(state.collection("apps").is_none());
        assert_eq!(state.renderer().limits().max_results_per_page, 100);
    }
}
