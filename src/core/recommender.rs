use crate::core::geo::haversine_km;
use crate::domain::{
    Charity, CharityId, Dataset, RankingPolicy, Rating, RecommendOptions, ScoredSupplier, Store,
    Supplier, SupplierId,
};
use crate::utils::error::{RecommenderError, Result};
use crate::utils::validation::validate_non_negative_distance;
use std::collections::HashMap;

/// Keeps the composite score finite for a supplier at the charity's location.
pub const SCORE_EPSILON: f64 = 1e-5;

/// Mean rating per supplier across all charities.
pub fn average_ratings(ratings: &[Rating]) -> HashMap<SupplierId, f64> {
    // Summed as f64: rows loaded from disk are not range-checked.
    let mut totals: HashMap<SupplierId, (f64, u32)> = HashMap::new();
    for rating in ratings {
        let entry = totals.entry(rating.supplier_id).or_insert((0.0, 0));
        entry.0 += rating.rating as f64;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(supplier_id, (sum, count))| (supplier_id, sum / f64::from(count)))
        .collect()
}

pub fn composite_score(avg_rating: f64, distance_km: f64) -> f64 {
    avg_rating / (distance_km + SCORE_EPSILON)
}

/// Rank every supplier for `charity` under `options.policy`.
///
/// Suppliers without ratings take part with an average of zero, so they
/// always end up behind rated ones.
pub fn rank_suppliers(
    charity: &Charity,
    suppliers: &[Supplier],
    ratings: &[Rating],
    options: &RecommendOptions,
) -> Vec<ScoredSupplier> {
    let averages = average_ratings(ratings);

    let mut candidates: Vec<ScoredSupplier> = suppliers
        .iter()
        .map(|supplier| ScoredSupplier {
            supplier_id: supplier.supplier_id,
            name: supplier.name.clone(),
            avg_rating: averages.get(&supplier.supplier_id).copied().unwrap_or(0.0),
            distance_km: haversine_km(charity.lat, charity.lng, supplier.lat, supplier.lng),
            score: None,
        })
        .collect();

    match options.policy {
        RankingPolicy::Lexicographic => {
            candidates.retain(|c| c.distance_km <= options.max_distance_km);
            candidates.sort_by(|a, b| {
                b.avg_rating
                    .total_cmp(&a.avg_rating)
                    .then_with(|| a.distance_km.total_cmp(&b.distance_km))
            });
        }
        RankingPolicy::Composite => {
            for candidate in &mut candidates {
                candidate.score = Some(composite_score(candidate.avg_rating, candidate.distance_km));
            }
            candidates.sort_by(|a, b| {
                let a_score = a.score.unwrap_or_default();
                let b_score = b.score.unwrap_or_default();
                b_score.total_cmp(&a_score)
            });
        }
    }

    candidates.truncate(options.top_n);
    candidates
}

/// Scoring engine over a [`Store`]. Every call re-reads the datasets.
pub struct Recommender<S: Store> {
    store: S,
    defaults: RecommendOptions,
}

impl<S: Store> Recommender<S> {
    pub fn new(store: S, defaults: RecommendOptions) -> Self {
        Self { store, defaults }
    }

    pub async fn recommend(
        &self,
        charity_id: CharityId,
        max_distance_km: Option<f64>,
        top_n: Option<usize>,
    ) -> Result<Vec<ScoredSupplier>> {
        if let Some(distance) = max_distance_km {
            validate_non_negative_distance("max_distance_km", distance)?;
        }
        let options = RecommendOptions {
            max_distance_km: max_distance_km.unwrap_or(self.defaults.max_distance_km),
            top_n: top_n.unwrap_or(self.defaults.top_n),
            policy: self.defaults.policy,
        };

        let charities: Vec<Charity> = self.store.load(Dataset::Charities).await?;
        let charity = charities
            .iter()
            .find(|c| c.charity_id == charity_id)
            .ok_or(RecommenderError::NotFound {
                entity: "Charity",
                id: charity_id,
            })?;

        let suppliers: Vec<Supplier> = self.store.load(Dataset::Suppliers).await?;
        let ratings: Vec<Rating> = self.store.load(Dataset::Ratings).await?;

        let ranked = rank_suppliers(charity, &suppliers, &ratings, &options);
        tracing::debug!(
            charity_id,
            policy = ?options.policy,
            candidates = suppliers.len(),
            returned = ranked.len(),
            "Ranked suppliers"
        );
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::MockStore;

    fn charity(id: CharityId, lat: f64, lng: f64) -> Charity {
        Charity {
            charity_id: id,
            name: format!("Charity {}", id),
            lat,
            lng,
        }
    }

    fn supplier(id: SupplierId, name: &str, lat: f64, lng: f64) -> Supplier {
        Supplier {
            supplier_id: id,
            name: name.to_string(),
            lat,
            lng,
        }
    }

    fn rating(charity_id: CharityId, supplier_id: SupplierId, value: i64) -> Rating {
        Rating {
            charity_id,
            supplier_id,
            rating: value,
        }
    }

    fn lexicographic(max_distance_km: f64, top_n: usize) -> RecommendOptions {
        RecommendOptions {
            max_distance_km,
            top_n,
            policy: RankingPolicy::Lexicographic,
        }
    }

    #[test]
    fn test_average_ratings_groups_by_supplier() {
        let ratings = vec![
            rating(1, 10, 4),
            rating(2, 10, 5),
            rating(3, 10, 3),
            rating(1, 20, 2),
            rating(99, 30, 5), // unknown charity still counts
        ];

        let averages = average_ratings(&ratings);

        assert_eq!(averages.len(), 3);
        assert_eq!(averages[&10], 4.0);
        assert_eq!(averages[&20], 2.0);
        assert_eq!(averages[&30], 5.0);
    }

    #[test]
    fn test_average_ratings_tolerates_huge_values() {
        let ratings = vec![rating(1, 10, i64::MAX), rating(2, 10, i64::MAX)];

        let averages = average_ratings(&ratings);

        assert!(averages[&10].is_finite());
        assert!((averages[&10] - i64::MAX as f64).abs() < 1e6);
    }

    #[test]
    fn test_antipodal_supplier_kept_under_both_policies() {
        let home = charity(1, -87.843, -176.673);
        let suppliers = vec![
            supplier(1, "Antipode", 87.843, 3.327),
            supplier(2, "Nearby", -87.8, -176.6),
        ];
        let ratings = vec![rating(1, 1, 5), rating(1, 2, 4)];

        let ranked = rank_suppliers(&home, &suppliers, &ratings, &lexicographic(25000.0, 5));
        let ids: Vec<SupplierId> = ranked.iter().map(|s| s.supplier_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(ranked[0].distance_km.is_finite());

        let composite = RecommendOptions {
            policy: RankingPolicy::Composite,
            ..RecommendOptions::default()
        };
        let ranked = rank_suppliers(&home, &suppliers, &ratings, &composite);
        assert!(ranked
            .iter()
            .all(|s| s.distance_km.is_finite() && s.score.is_some_and(f64::is_finite)));
    }

    #[test]
    fn test_closer_supplier_wins_rating_tie() {
        let home = charity(1, 0.0, 0.0);
        let suppliers = vec![
            supplier(2, "B", 0.0, 0.3), // ~33 km
            supplier(1, "A", 0.0, 0.0),
        ];
        let ratings = vec![rating(1, 1, 5), rating(1, 2, 5)];

        let ranked = rank_suppliers(&home, &suppliers, &ratings, &lexicographic(200.0, 5));

        let ids: Vec<SupplierId> = ranked.iter().map(|s| s.supplier_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(ranked[0].distance_km, 0.0);
        assert!((ranked[1].distance_km - 33.358).abs() < 0.01);
        assert!(ranked.iter().all(|s| s.score.is_none()));
    }

    #[test]
    fn test_equator_example_within_wider_cap() {
        let home = charity(1, 0.0, 0.0);
        let suppliers = vec![supplier(2, "B", 0.0, 1.0), supplier(1, "A", 0.0, 0.0)];
        let ratings = vec![rating(1, 1, 5), rating(1, 2, 5)];

        let ranked = rank_suppliers(&home, &suppliers, &ratings, &lexicographic(150.0, 5));
        assert_eq!(ranked[0].supplier_id, 1);
        assert_eq!(ranked[1].supplier_id, 2);

        // With the default 50 km cap, B (~111 km) is dropped.
        let ranked = rank_suppliers(&home, &suppliers, &ratings, &RecommendOptions::default());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].supplier_id, 1);
    }

    #[test]
    fn test_lexicographic_order_and_bounds() {
        let home = charity(1, 10.0, 10.0);
        let suppliers: Vec<Supplier> = (1..=8)
            .map(|i| supplier(i, &format!("S{}", i), 10.0, 10.0 + i as f64 * 0.03))
            .collect();
        let ratings = vec![
            rating(1, 1, 2),
            rating(1, 2, 5),
            rating(2, 2, 4),
            rating(1, 3, 5),
            rating(1, 4, 4),
            rating(2, 4, 5),
            rating(1, 6, 1),
            rating(1, 7, 3),
        ];

        let ranked = rank_suppliers(&home, &suppliers, &ratings, &lexicographic(50.0, 5));

        assert_eq!(ranked.len(), 5);
        for pair in ranked.windows(2) {
            let (x, y) = (&pair[0], &pair[1]);
            assert!(
                x.avg_rating > y.avg_rating
                    || (x.avg_rating == y.avg_rating && x.distance_km <= y.distance_km)
            );
        }
        assert_eq!(ranked[0].supplier_id, 3);
        assert_eq!(ranked[1].supplier_id, 2);
        assert_eq!(ranked[2].supplier_id, 4);
    }

    #[test]
    fn test_unrated_suppliers_sort_last() {
        let home = charity(1, 0.0, 0.0);
        let suppliers = vec![
            supplier(1, "Unrated next door", 0.0, 0.0),
            supplier(2, "Rated further", 0.0, 0.2),
        ];
        let ratings = vec![rating(1, 2, 1)];

        let ranked = rank_suppliers(&home, &suppliers, &ratings, &lexicographic(50.0, 5));
        assert_eq!(ranked[0].supplier_id, 2);
        assert_eq!(ranked[1].avg_rating, 0.0);

        let composite = RecommendOptions {
            policy: RankingPolicy::Composite,
            ..RecommendOptions::default()
        };
        let ranked = rank_suppliers(&home, &suppliers, &ratings, &composite);
        assert_eq!(ranked[0].supplier_id, 2);
        assert_eq!(ranked[1].score, Some(0.0));
    }

    #[test]
    fn test_composite_ignores_distance_cap() {
        let home = charity(1, 0.0, 0.0);
        let suppliers = vec![
            supplier(1, "Far but perfect", 0.0, 2.0),   // ~222 km
            supplier(2, "Near and average", 0.2, 0.2), // ~31 km
        ];
        let ratings = vec![rating(1, 1, 5), rating(1, 2, 3)];
        let options = RecommendOptions {
            max_distance_km: 10.0,
            top_n: 5,
            policy: RankingPolicy::Composite,
        };

        let ranked = rank_suppliers(&home, &suppliers, &ratings, &options);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].supplier_id, 2);
        let expected = composite_score(3.0, ranked[0].distance_km);
        assert_eq!(ranked[0].score, Some(expected));
    }

    #[test]
    fn test_zero_top_n_and_empty_range() {
        let home = charity(1, 0.0, 0.0);
        let suppliers = vec![supplier(1, "Far", 45.0, 45.0)];
        let ratings = vec![rating(1, 1, 5)];

        assert!(rank_suppliers(&home, &suppliers, &ratings, &lexicographic(50.0, 5)).is_empty());
        assert!(rank_suppliers(&home, &suppliers, &ratings, &lexicographic(1e6, 0)).is_empty());
    }

    fn seeded_store() -> MockStore {
        let store = MockStore::new();
        store.seed(Dataset::Charities, &[charity(1, 0.0, 0.0)]);
        store.seed(
            Dataset::Suppliers,
            &[
                supplier(1, "A", 0.0, 0.0),
                supplier(2, "B", 0.0, 0.1),
                supplier(3, "C", 0.0, 0.2),
            ],
        );
        store.seed(
            Dataset::Ratings,
            &[rating(1, 1, 3), rating(1, 2, 4), rating(1, 3, 5)],
        );
        store
    }

    #[tokio::test]
    async fn test_recommend_uses_defaults_and_overrides() {
        let recommender = Recommender::new(seeded_store(), RecommendOptions::default());

        let result = recommender.recommend(1, None, None).await.unwrap();
        let ids: Vec<SupplierId> = result.iter().map(|s| s.supplier_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let result = recommender.recommend(1, Some(15.0), Some(1)).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].supplier_id, 2);
    }

    #[tokio::test]
    async fn test_recommend_unknown_charity_is_not_found() {
        let recommender = Recommender::new(seeded_store(), RecommendOptions::default());

        let result = recommender.recommend(9999, None, None).await;
        assert!(matches!(
            result,
            Err(RecommenderError::NotFound { id: 9999, .. })
        ));
    }

    #[tokio::test]
    async fn test_recommend_rejects_negative_distance() {
        let recommender = Recommender::new(seeded_store(), RecommendOptions::default());

        let result = recommender.recommend(1, Some(-5.0), None).await;
        assert!(matches!(result, Err(RecommenderError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_recommend_missing_dataset() {
        let store = seeded_store();
        store.remove(Dataset::Ratings);
        let recommender = Recommender::new(store, RecommendOptions::default());

        let result = recommender.recommend(1, None, None).await;
        assert!(matches!(
            result,
            Err(RecommenderError::StoreUnavailable { .. })
        ));
    }
}
