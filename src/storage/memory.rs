use super::{Dataset, SliceRequest};
use crate::core::{OrderDirection, Result, Value};
use crate::render::Resource;
use std::sync::{Arc, RwLock};

pub type RowFilter<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Shared in-memory rows with an optional filtered view.
///
/// Clones and filtered views share the same rows, so writes through one
/// handle are visible to every view on the next read.
pub struct MemoryDataset<T> {
    rows: Arc<RwLock<Vec<T>>>,
    filter: Option<RowFilter<T>>,
}

impl<T> Clone for MemoryDataset<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            filter: self.filter.clone(),
        }
    }
}

impl<T> Default for MemoryDataset<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            filter: None,
        }
    }
}

impl<T> MemoryDataset<T>
where
    T: Resource + Clone + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<T>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            filter: None,
        }
    }

    pub fn insert(&self, row: T) -> Result<()> {
        self.rows.write()?.push(row);
        Ok(())
    }

    /// Deletes every row with this guid, regardless of the view's filter.
    pub fn remove(&self, guid: &str) -> Result<bool> {
        let mut rows = self.rows.write()?;
        let before = rows.len();
        rows.retain(|row| row.key().guid != guid);
        Ok(rows.len() != before)
    }

    pub fn update<F>(&self, guid: &str, mutator: F) -> Result<bool>
    where
        F: FnOnce(&mut T),
    {
        let mut rows = self.rows.write()?;
        match rows.iter_mut().find(|row| row.key().guid == guid) {
            Some(row) => {
                mutator(row);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn contains(&self, guid: &str) -> Result<bool> {
        Ok(self.rows.read()?.iter().any(|row| row.key().guid == guid))
    }

    /// Returns a view that also requires `predicate`, sharing the same rows.
    pub fn filtered<F>(&self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let filter: RowFilter<T> = match self.filter.clone() {
            Some(existing) => Arc::new(move |row: &T| existing(row) && predicate(row)),
            None => Arc::new(predicate),
        };
        Self {
            rows: Arc::clone(&self.rows),
            filter: Some(filter),
        }
    }

    fn matches(&self, row: &T) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(row))
    }
}

impl<T> Dataset for MemoryDataset<T>
where
    T: Resource + Clone + 'static,
{
    type Item = T;

    fn count(&self) -> Result<u64> {
        let rows = self.rows.read()?;
        let count = rows.iter().filter(|row| self.matches(row)).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    fn fetch(&self, slice: &SliceRequest<'_>) -> Result<Vec<T>> {
        let rows = self.rows.read()?;

        // Sort keys are computed once per row; only the slice is cloned.
        let mut keyed: Vec<(Value, String, &T)> = rows
            .iter()
            .filter(|row| self.matches(row))
            .map(|row| {
                let sort_key = row.field(slice.order_by).unwrap_or(Value::Null);
                (sort_key, row.key().guid, row)
            })
            .collect();

        keyed.sort_by(|(a_key, a_guid, _), (b_key, b_guid, _)| {
            let ordering = a_key.compare(b_key).then_with(|| a_guid.cmp(b_guid));
            match slice.direction {
                OrderDirection::Asc => ordering,
                OrderDirection::Desc => ordering.reverse(),
            }
        });

        let offset = usize::try_from(slice.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(slice.limit).unwrap_or(usize::MAX);
        Ok(keyed
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, _, row)| row.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Record;

    fn dataset() -> MemoryDataset<Record> {
        MemoryDataset::from_rows(vec![
            Record::new("services", "c").attr("label", "redis"),
            Record::new("services", "a").attr("label", "mysql"),
            Record::new("services", "b").attr("label", "postgres"),
        ])
    }

    fn slice(
        offset: u64,
        limit: u32,
        order_by: &str,
        direction: OrderDirection,
    ) -> SliceRequest<'_> {
        SliceRequest {
            offset,
            limit,
            order_by,
            direction,
        }
    }

    fn guids(rows: &[Record]) -> Vec<&str> {
        rows.iter().map(|row| row.guid.as_str()).collect()
    }

    #[test]
    fn test_fetch_orders_and_slices() {
        let ds = dataset();
        let rows = ds.fetch(&slice(0, 2, "id", OrderDirection::Asc)).unwrap();
        assert_eq!(guids(&rows), vec!["a", "b"]);

        let rows = ds.fetch(&slice(2, 2, "id", OrderDirection::Asc)).unwrap();
        assert_eq!(guids(&rows), vec!["c"]);
    }

    #[test]
    fn test_fetch_by_attribute_descending() {
        let ds = dataset();
        let rows = ds.fetch(&slice(0, 3, "label", OrderDirection::Desc)).unwrap();
        assert_eq!(guids(&rows), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let ds = dataset();
        let rows = ds.fetch(&slice(10, 5, "id", OrderDirection::Asc)).unwrap();
        assert!(rows.is_empty());
        assert_eq!(ds.count().unwrap(), 3);
    }

    #[test]
    fn test_filtered_view_shares_rows() {
        let ds = dataset();
        let view = ds.filtered(|row: &Record| row.guid != "a");
        assert_eq!(view.count().unwrap(), 2);

        ds.insert(Record::new("services", "d")).unwrap();
        assert_eq!(view.count().unwrap(), 3);

        assert!(ds.remove("b").unwrap());
        assert!(!ds.contains("b").unwrap());
        assert_eq!(view.count().unwrap(), 2);
    }

    #[test]
    fn test_update_mutates_in_place() {
        let ds = dataset();
        assert!(ds.update("a", |row| row.set_attr("label", "mariadb")).unwrap());
        assert!(!ds.update("zzz", |_| {}).unwrap());

        let rows = ds.fetch(&slice(0, 1, "id", OrderDirection::Asc)).unwrap();
        assert_eq!(rows[0].attributes["label"], "mariadb");
    }
}
