use crate::domain::{Dataset, Store};
use crate::utils::error::{RecommenderError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory [`Store`] keeping rows as JSON values. Datasets that were never
/// seeded behave like missing files.
#[derive(Clone, Default)]
pub struct MockStore {
    tables: Arc<Mutex<HashMap<Dataset, Vec<serde_json::Value>>>>,
}

impl MockStore {
    pub fn new() -> Self {
        let store = Self::default();
        for dataset in Dataset::ALL {
            store.tables.lock().unwrap().insert(dataset, Vec::new());
        }
        store
    }

    pub fn seed<T: Serialize>(&self, dataset: Dataset, rows: &[T]) {
        let values = rows
            .iter()
            .map(|row| serde_json::to_value(row).unwrap())
            .collect();
        self.tables.lock().unwrap().insert(dataset, values);
    }

    pub fn remove(&self, dataset: Dataset) {
        self.tables.lock().unwrap().remove(&dataset);
    }

    pub fn len(&self, dataset: Dataset) -> usize {
        self.tables
            .lock()
            .unwrap()
            .get(&dataset)
            .map_or(0, Vec::len)
    }
}

impl Store for MockStore {
    async fn load<T>(&self, dataset: Dataset) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let tables = self.tables.lock().unwrap();
        let rows = tables
            .get(&dataset)
            .ok_or_else(|| RecommenderError::StoreUnavailable {
                path: dataset.file_name().to_string(),
            })?;
        Ok(rows
            .iter()
            .map(|row| serde_json::from_value(row.clone()).unwrap())
            .collect())
    }

    async fn append<T>(&self, dataset: Dataset, record: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let mut tables = self.tables.lock().unwrap();
        let rows = tables
            .get_mut(&dataset)
            .ok_or_else(|| RecommenderError::StoreUnavailable {
                path: dataset.file_name().to_string(),
            })?;
        rows.push(serde_json::to_value(record).unwrap());
        Ok(())
    }
}
