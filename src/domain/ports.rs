use crate::domain::model::Dataset;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Row-oriented access to the flat-file datasets.
pub trait Store: Send + Sync {
    /// Load every row of `dataset` in file order.
    fn load<T>(&self, dataset: Dataset) -> impl std::future::Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned + Send;

    /// Append one row to `dataset`, persisting immediately.
    fn append<T>(
        &self,
        dataset: Dataset,
        record: &T,
    ) -> impl std::future::Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync;
}
