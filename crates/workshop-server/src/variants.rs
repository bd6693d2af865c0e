//! Wiring of the three server variants onto the shared dispatcher.

use std::sync::Arc;

use serde::Serialize;

use workshop_core::types::{AnalyticsData, SalesData};
use workshop_mcp::{
    Dispatcher, RegistryError, ResourceCatalog, ResourceDescriptor, ServerInfo, ToolRegistry,
};
use workshop_store::FixtureStore;

use crate::config::Config;
use crate::tools::{
    AnalyzeUserBehavior, CheckInventory, GetAbandonedCarts, GetOrderDetails, GetSalesSummary,
    GetShippingStatus, GetTopProducts, QueryCustomersByCountry, SimulatedLatency,
};

/// Which tool server to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ServerVariant {
    Sales,
    Analytics,
    Inventory,
}

impl ServerVariant {
    pub fn default_port(self) -> u16 {
        match self {
            Self::Sales => 5010,
            Self::Analytics => 5011,
            Self::Inventory => 5012,
        }
    }

    pub fn server_info(self) -> ServerInfo {
        let (name, description) = match self {
            Self::Sales => (
                "sales-mcp-server",
                "Customers, orders and sales figures of the workshop store",
            ),
            Self::Analytics => (
                "analytics-mcp-server",
                "User sessions, cart events and abandoned carts",
            ),
            Self::Inventory => (
                "inventory-mcp-server",
                "Stock levels, shipping status and best sellers",
            ),
        };

        ServerInfo {
            name: name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Fixtures(#[from] workshop_core::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Build the dispatcher described by `config`, loading fixtures as needed.
///
/// # Errors
///
/// Fails if the fixtures of a data-backed variant cannot be loaded.
pub fn build_dispatcher(config: &Config) -> Result<Dispatcher, StartupError> {
    let store = FixtureStore::new(&config.data_dir);

    let dispatcher = match config.variant {
        ServerVariant::Sales => sales_dispatcher(Arc::new(store.load_sales()?))?,
        ServerVariant::Analytics => analytics_dispatcher(Arc::new(store.load_analytics()?))?,
        ServerVariant::Inventory => inventory_dispatcher(config.latency())?,
    };

    Ok(match config.tool_timeout() {
        Some(timeout) => dispatcher.with_tool_timeout(timeout),
        None => dispatcher,
    })
}

/// Register a resource whose snapshot serializes one field of a shared dataset.
fn register_snapshot<D, T, F>(
    catalog: &mut ResourceCatalog,
    descriptor: ResourceDescriptor,
    data: &Arc<D>,
    select: F,
) -> Result<(), RegistryError>
where
    D: Send + Sync + 'static,
    T: Serialize + ?Sized,
    F: Fn(&D) -> &T + Send + Sync + 'static,
{
    let data = Arc::clone(data);
    catalog.register(descriptor, move || serde_json::to_string(select(&*data)))
}

/// # Errors
///
/// Fails only if the tool or resource set is inconsistent.
pub fn sales_dispatcher(data: Arc<SalesData>) -> Result<Dispatcher, RegistryError> {
    let tools = ToolRegistry::new()
        .with(QueryCustomersByCountry::new(Arc::clone(&data)))?
        .with(GetOrderDetails::new(Arc::clone(&data)))?
        .with(GetSalesSummary::new(Arc::clone(&data)))?;

    let mut catalog = ResourceCatalog::new();
    register_snapshot(
        &mut catalog,
        ResourceDescriptor::json("sql://workshop/customers", "Customers", "All registered customers"),
        &data,
        |d| &d.customers,
    )?;
    register_snapshot(
        &mut catalog,
        ResourceDescriptor::json("sql://workshop/orders", "Orders", "All orders with their status"),
        &data,
        |d| &d.orders,
    )?;
    register_snapshot(
        &mut catalog,
        ResourceDescriptor::json("sql://workshop/products", "Products", "Product catalog"),
        &data,
        |d| &d.products,
    )?;

    Ok(Dispatcher::new(ServerVariant::Sales.server_info(), tools).with_resources(catalog))
}

/// # Errors
///
/// Fails only if the tool or resource set is inconsistent.
pub fn analytics_dispatcher(data: Arc<AnalyticsData>) -> Result<Dispatcher, RegistryError> {
    let tools = ToolRegistry::new()
        .with(GetAbandonedCarts::new(Arc::clone(&data)))?
        .with(AnalyzeUserBehavior::new(Arc::clone(&data)))?;

    let mut catalog = ResourceCatalog::new();
    register_snapshot(
        &mut catalog,
        ResourceDescriptor::json(
            "cosmos://analytics/user-sessions",
            "User Sessions",
            "Browsing sessions with pages viewed and actions",
        ),
        &data,
        |d| &d.sessions,
    )?;
    register_snapshot(
        &mut catalog,
        ResourceDescriptor::json(
            "cosmos://analytics/cart-events",
            "Cart Events",
            "Add, remove and checkout events",
        ),
        &data,
        |d| &d.cart_events,
    )?;
    register_snapshot(
        &mut catalog,
        ResourceDescriptor::json(
            "cosmos://analytics/abandoned-carts",
            "Abandoned Carts",
            "Carts left without checkout",
        ),
        &data,
        |d| &d.abandoned_carts,
    )?;

    Ok(Dispatcher::new(ServerVariant::Analytics.server_info(), tools).with_resources(catalog))
}

/// # Errors
///
/// Fails only if the tool set is inconsistent.
pub fn inventory_dispatcher(latency: SimulatedLatency) -> Result<Dispatcher, RegistryError> {
    let tools = ToolRegistry::new()
        .with(CheckInventory::new(latency.inventory))?
        .with(GetShippingStatus::new(latency.shipping))?
        .with(GetTopProducts::new(latency.top_products))?;

    Ok(Dispatcher::new(ServerVariant::Inventory.server_info(), tools))
}
