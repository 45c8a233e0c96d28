use rand::Rng;
use serde::Serialize;
use storefront_core::{AppError, ProductWithStock};
use storefront_db::CatalogStore;
use storefront_infra::SubscriptionFilter;

/// Prices of the sample catalogue, in insertion order.
pub const SAMPLE_PRICES: [f64; 5] = [30.0, 10.0, 20.0, 40.0, 50.0];

/// Builds the sample catalogue with random stock counts in `1..=5`.
pub fn sample_products<R: Rng + ?Sized>(rng: &mut R) -> Vec<ProductWithStock> {
    SAMPLE_PRICES
        .iter()
        .enumerate()
        .map(|(i, price)| {
            let n = i + 1;
            storefront_core::NewProduct {
                title: format!("Product {}", n),
                description: format!("Short description of product {}", n),
                price: *price,
                count: rng.random_range(1..=5),
            }
            .into_product()
        })
        .collect()
}

/// Writes the sample catalogue, optionally wiping existing rows first.
pub async fn seed<R: Rng + ?Sized>(
    store: &dyn CatalogStore,
    rng: &mut R,
    clear_first: bool,
) -> Result<Vec<ProductWithStock>, AppError> {
    if clear_first {
        store.clear().await?;
    }

    let products = sample_products(rng);
    for product in &products {
        store.create_product_with_stock(product).await?;
        tracing::info!(id = %product.id, title = %product.title, count = product.count, "Seeded product");
    }
    Ok(products)
}

#[derive(Debug, Serialize)]
pub struct FilterPolicy {
    pub subscription: String,
    pub policy: serde_json::Value,
}

pub fn filter_policies(rules: &[SubscriptionFilter]) -> Vec<FilterPolicy> {
    rules
        .iter()
        .map(|rule| FilterPolicy {
            subscription: rule.name.clone(),
            policy: rule.to_policy_json(),
        })
        .collect()
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use storefront_db::InMemoryCatalogStore;
    use storefront_infra::default_subscriptions;

    #[test]
    fn sample_products_titles_prices_and_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        let products = sample_products(&mut rng);

        let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Product 1", "Product 2", "Product 3", "Product 4", "Product 5"]
        );
        let prices: Vec<_> = products.iter().map(|p| p.price).collect();
        assert_eq!(prices, SAMPLE_PRICES);
        assert!(products.iter().all(|p| (1..=5).contains(&p.count)));
    }

    #[test]
    fn sample_products_get_distinct_ids() {
        let mut rng = StdRng::seed_from_u64(1);
        let products = sample_products(&mut rng);
        let mut ids: Vec<_> = products.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn seed_appends_unless_cleared() {
        let store = InMemoryCatalogStore::new();
        let mut rng = StdRng::seed_from_u64(3);

        seed(&store, &mut rng, false).await.unwrap();
        seed(&store, &mut rng, false).await.unwrap();
        assert_eq!(store.product_count(), 10);
        assert_eq!(store.stock_count(), 10);

        seed(&store, &mut rng, true).await.unwrap();
        assert_eq!(store.product_count(), 5);
        assert_eq!(store.stock_count(), 5);
    }

    #[test]
    fn filter_policies_cover_both_subscriptions() {
        let policies = filter_policies(&default_subscriptions());

        assert_eq!(policies.len(), 2);
        assert_eq!(policies[0].subscription, "high-price");
        assert_eq!(
            policies[0].policy,
            json!({"price": [{"numeric": [">=", 50.0]}]})
        );
        assert_eq!(policies[1].subscription, "low-price");
        assert_eq!(
            policies[1].policy,
            json!({"price": [{"numeric": ["<", 50.0]}]})
        );
    }
}
