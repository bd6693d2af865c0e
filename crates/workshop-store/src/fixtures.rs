use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use workshop_core::error::Error;
use workshop_core::types::{AnalyticsData, SalesData};

/// Fixture files read for the analytics server, relative to the data directory.
pub const ANALYTICS_FIXTURES: [&str; 3] =
    ["sessions.json", "cart-events.json", "abandoned-carts.json"];

/// Fixture files read for the sales server, relative to the data directory.
pub const SALES_FIXTURES: [&str; 3] = ["customers.json", "orders.json", "products.json"];

/// Read-only loader for the JSON fixture directory.
///
/// Each fixture is a top-level JSON array of camelCase records.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    /// Create a store reading fixtures below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load sessions, cart events and abandoned carts.
    ///
    /// # Errors
    ///
    /// Returns an error if any fixture is missing or malformed.
    pub fn load_analytics(&self) -> Result<AnalyticsData, Error> {
        let [sessions, cart_events, abandoned_carts] = ANALYTICS_FIXTURES;
        let data = AnalyticsData {
            sessions: self.load(sessions)?,
            cart_events: self.load(cart_events)?,
            abandoned_carts: self.load(abandoned_carts)?,
        };

        tracing::info!(
            sessions = data.sessions.len(),
            cart_events = data.cart_events.len(),
            abandoned_carts = data.abandoned_carts.len(),
            "loaded analytics fixtures"
        );
        Ok(data)
    }

    /// Load customers, orders and products.
    ///
    /// # Errors
    ///
    /// Returns an error if any fixture is missing or malformed.
    pub fn load_sales(&self) -> Result<SalesData, Error> {
        let [customers, orders, products] = SALES_FIXTURES;
        let data = SalesData {
            customers: self.load(customers)?,
            orders: self.load(orders)?,
            products: self.load(products)?,
        };

        tracing::info!(
            customers = data.customers.len(),
            orders = data.orders.len(),
            products = data.products.len(),
            "loaded sales fixtures"
        );
        Ok(data)
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, Error> {
        let path = self.root.join(file);
        tracing::debug!(path = %path.display(), "reading fixture");

        let raw = std::fs::read_to_string(&path).map_err(|source| Error::FixtureIo {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| Error::FixtureParse { path, source })
    }
}
