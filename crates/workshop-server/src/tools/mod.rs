//! Tool implementations for the three server variants.

pub mod analytics;
pub mod inventory;
pub mod sales;

pub use analytics::{AnalyzeUserBehavior, GetAbandonedCarts};
pub use inventory::{CheckInventory, GetShippingStatus, GetTopProducts, SimulatedLatency};
pub use sales::{GetOrderDetails, GetSalesSummary, QueryCustomersByCountry};

/// Round a monetary amount to cents.
pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Case-insensitive text comparison, Unicode aware.
pub(crate) fn same_text(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
