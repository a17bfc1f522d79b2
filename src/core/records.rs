use crate::domain::{Charity, Dataset, Rating, RatingFilter, Store, Supplier};
use crate::utils::error::{RecommenderError, Result};
use crate::utils::validation::{
    validate_latitude, validate_longitude, validate_non_empty_string, validate_range, Validate,
};
use tokio::sync::Mutex;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

impl Validate for Charity {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_latitude("lat", self.lat)?;
        validate_longitude("lng", self.lng)
    }
}

impl Validate for Supplier {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_latitude("lat", self.lat)?;
        validate_longitude("lng", self.lng)
    }
}

impl Validate for Rating {
    fn validate(&self) -> Result<()> {
        validate_range("rating", self.rating, MIN_RATING, MAX_RATING)
    }
}

/// Listing and append-only creation of charities, suppliers and ratings.
///
/// Creation holds `write_lock` across the duplicate scan and the append, so
/// two requests in this process cannot both pass the check for the same key.
pub struct RecordService<S: Store> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: Store> RecordService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list_charities(&self) -> Result<Vec<Charity>> {
        self.store.load(Dataset::Charities).await
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        self.store.load(Dataset::Suppliers).await
    }

    pub async fn list_ratings(&self, filter: RatingFilter) -> Result<Vec<Rating>> {
        let ratings: Vec<Rating> = self.store.load(Dataset::Ratings).await?;
        Ok(ratings.into_iter().filter(|r| filter.matches(r)).collect())
    }

    pub async fn create_charity(&self, charity: Charity) -> Result<Charity> {
        charity.validate()?;

        let _guard = self.write_lock.lock().await;
        let existing: Vec<Charity> = self.store.load(Dataset::Charities).await?;
        if existing.iter().any(|c| c.charity_id == charity.charity_id) {
            return Err(RecommenderError::DuplicateKey {
                entity: "Charity",
                key: charity.charity_id.to_string(),
            });
        }

        self.store.append(Dataset::Charities, &charity).await?;
        tracing::info!(charity_id = charity.charity_id, "Created charity");
        Ok(charity)
    }

    pub async fn create_supplier(&self, supplier: Supplier) -> Result<Supplier> {
        supplier.validate()?;

        let _guard = self.write_lock.lock().await;
        let existing: Vec<Supplier> = self.store.load(Dataset::Suppliers).await?;
        if existing.iter().any(|s| s.supplier_id == supplier.supplier_id) {
            return Err(RecommenderError::DuplicateKey {
                entity: "Supplier",
                key: supplier.supplier_id.to_string(),
            });
        }

        self.store.append(Dataset::Suppliers, &supplier).await?;
        tracing::info!(supplier_id = supplier.supplier_id, "Created supplier");
        Ok(supplier)
    }

    /// Ratings referencing unknown charities or suppliers are stored anyway;
    /// the scoring engine tolerates them.
    pub async fn create_rating(&self, rating: Rating) -> Result<Rating> {
        rating.validate()?;

        let _guard = self.write_lock.lock().await;
        let existing: Vec<Rating> = self.store.load(Dataset::Ratings).await?;
        if existing
            .iter()
            .any(|r| r.charity_id == rating.charity_id && r.supplier_id == rating.supplier_id)
        {
            return Err(RecommenderError::DuplicateKey {
                entity: "Rating",
                key: format!("({}, {})", rating.charity_id, rating.supplier_id),
            });
        }

        self.warn_on_dangling_references(&rating).await;

        self.store.append(Dataset::Ratings, &rating).await?;
        tracing::info!(
            charity_id = rating.charity_id,
            supplier_id = rating.supplier_id,
            rating = rating.rating,
            "Created rating"
        );
        Ok(rating)
    }

    async fn warn_on_dangling_references(&self, rating: &Rating) {
        if let Ok(charities) = self.list_charities().await {
            if !charities.iter().any(|c| c.charity_id == rating.charity_id) {
                tracing::warn!(
                    charity_id = rating.charity_id,
                    "Rating references an unknown charity"
                );
            }
        }
        if let Ok(suppliers) = self.list_suppliers().await {
            if !suppliers.iter().any(|s| s.supplier_id == rating.supplier_id) {
                tracing::warn!(
                    supplier_id = rating.supplier_id,
                    "Rating references an unknown supplier"
                );
            }
        }
    }
}
