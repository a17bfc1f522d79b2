// Domain layer: records, ranking options and the storage port.

pub mod model;
pub mod ports;

pub use model::{
    Charity, CharityId, Dataset, RankingPolicy, Rating, RatingFilter, RecommendOptions,
    ScoredSupplier, Supplier, SupplierId,
};
pub use ports::Store;
