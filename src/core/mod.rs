pub mod geo;
pub mod recommender;
pub mod records;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::{RecommendOptions, ScoredSupplier, Store};
pub use crate::utils::error::Result;
pub use recommender::Recommender;
pub use records::RecordService;
