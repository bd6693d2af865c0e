//! Simulated inventory, shipping and best-seller tools.
//!
//! Results are derived from a generator seeded with the requested id, so the
//! same id always yields the same answer within a build.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use workshop_mcp::{
    Arguments, InputSchema, PropertySchema, Tool, ToolDefinition, ToolError, ToolOutput,
};

use super::round_cents;

const WAREHOUSES: [&str; 3] = ["Madrid", "Barcelona", "Valencia"];
const SHIPPING_STATUSES: [&str; 4] = ["pending", "shipped", "in_transit", "delivered"];
const CARRIERS: [&str; 4] = ["DHL", "UPS", "Correos", "SEUR"];

/// (id, name, units sold, revenue)
const BEST_SELLERS: [(i64, &str, u32, f64); 10] = [
    (101, "Portátil HP ProBook", 245, 220_497.55),
    (105, "Silla Herman Miller", 189, 245_698.11),
    (102, "Monitor Dell UltraSharp", 178, 62_298.22),
    (103, "Teclado Logitech MX", 156, 18_718.44),
    (104, "Ratón Logitech MX Master", 134, 12_058.66),
    (106, "Webcam Logitech Brio", 98, 19_502.00),
    (107, "Auriculares Sony WH-1000XM5", 87, 30_189.00),
    (108, "Dock USB-C Dell", 76, 15_124.00),
    (109, "SSD Samsung 2TB", 65, 12_935.00),
    (110, "Router Asus RT-AX88U", 54, 13_446.00),
];

fn seeded(id: i64) -> StdRng {
    StdRng::seed_from_u64(u64::from_le_bytes(id.to_le_bytes()))
}

fn pick<'a>(rng: &mut StdRng, choices: &[&'a str]) -> &'a str {
    choices[rng.gen_range(0..choices.len())]
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// Artificial delay of each simulated backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub inventory: Duration,
    pub shipping: Duration,
    pub top_products: Duration,
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self {
            inventory: Duration::from_millis(100),
            shipping: Duration::from_millis(150),
            top_products: Duration::from_millis(120),
        }
    }
}

impl SimulatedLatency {
    /// The same delay for every tool.
    pub fn uniform(latency: Duration) -> Self {
        Self {
            inventory: latency,
            shipping: latency,
            top_products: latency,
        }
    }

    pub fn none() -> Self {
        Self::uniform(Duration::ZERO)
    }
}

/// Stock of one product in one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub product_id: i64,
    pub in_stock: bool,
    pub quantity: u32,
    pub warehouse: &'static str,
}

impl StockLevel {
    pub fn simulate(product_id: i64) -> Self {
        let mut rng = seeded(product_id);
        let in_stock = rng.gen_range(0..100) > 20;
        let quantity = if in_stock { rng.gen_range(5..50) } else { 0 };

        Self {
            product_id,
            in_stock,
            quantity,
            warehouse: pick(&mut rng, &WAREHOUSES),
        }
    }
}

/// `check_inventory`: stock availability of a product.
pub struct CheckInventory {
    latency: Duration,
}

impl CheckInventory {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Tool for CheckInventory {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "check_inventory",
            "Checks real-time stock availability of a product.",
            InputSchema::object()
                .property("productId", PropertySchema::number("ID of the product to check"))
                .required("productId"),
        )
    }

    async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError> {
        let mut v = args.validator();
        let product_id = v.required_int("productId");
        v.finish()?;

        simulate_latency(self.latency).await;
        let stock = StockLevel::simulate(product_id);

        let summary = if stock.in_stock {
            format!(
                "Product {product_id}: {} unit(s) available in {}",
                stock.quantity, stock.warehouse
            )
        } else {
            format!("Product {product_id}: out of stock")
        };

        Ok(ToolOutput::Value(serde_json::json!({
            "productId": stock.product_id,
            "inStock": stock.in_stock,
            "quantity": stock.quantity,
            "warehouse": stock.warehouse,
            "summary": summary,
            "checkedAt": Utc::now(),
        })))
    }
}

/// Tracking state of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub order_id: i64,
    pub status: &'static str,
    pub tracking_number: String,
    pub carrier: &'static str,
    pub estimated_delivery: NaiveDate,
}

impl Shipment {
    /// Shipment for `order_id`, with delivery estimated relative to `today`.
    pub fn simulate(order_id: i64, today: NaiveDate) -> Self {
        let mut rng = seeded(order_id);
        let status = pick(&mut rng, &SHIPPING_STATUSES);
        let tracking_number = format!("ES{order_id:06}{}", rng.gen_range(1000..9999));
        let carrier = pick(&mut rng, &CARRIERS);
        let days = rng.gen_range(1..7);

        Self {
            order_id,
            status,
            tracking_number,
            carrier,
            estimated_delivery: today + chrono::Days::new(days),
        }
    }
}

/// `get_shipping_status`: carrier and tracking of an order.
pub struct GetShippingStatus {
    latency: Duration,
}

impl GetShippingStatus {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Tool for GetShippingStatus {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_shipping_status",
            "Returns the shipping status and tracking number of an order.",
            InputSchema::object()
                .property("orderId", PropertySchema::number("ID of the order"))
                .required("orderId"),
        )
    }

    async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError> {
        let mut v = args.validator();
        let order_id = v.required_int("orderId");
        v.finish()?;

        simulate_latency(self.latency).await;
        let shipment = Shipment::simulate(order_id, Utc::now().date_naive());
        Ok(ToolOutput::json(&shipment)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("day") => Self::Day,
            Some("month") => Self::Month,
            _ => Self::Week,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Day => "today",
            Self::Week => "this week",
            Self::Month => "this month",
        }
    }
}

#[derive(Debug, Serialize)]
struct RankedProduct {
    rank: usize,
    id: i64,
    name: &'static str,
    sales: u32,
    revenue: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TopProductsReport {
    period: &'static str,
    label: &'static str,
    total_sales: u32,
    total_revenue: f64,
    products: Vec<RankedProduct>,
    summary: String,
}

/// `get_top_products`: best sellers of a period.
pub struct GetTopProducts {
    latency: Duration,
}

impl GetTopProducts {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Tool for GetTopProducts {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_top_products",
            "Lists the best-selling products of a period.",
            InputSchema::object()
                .property(
                    "limit",
                    PropertySchema::number("How many products to return (max 10)").default_value(10),
                )
                .property(
                    "period",
                    PropertySchema::string("Analysis period")
                        .one_of(&["day", "week", "month"])
                        .default_value("week"),
                ),
        )
    }

    async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError> {
        let limit = args
            .optional_int("limit")
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(BEST_SELLERS.len())
            .min(BEST_SELLERS.len());
        let period = Period::parse(args.optional_str("period"));

        simulate_latency(self.latency).await;

        let products: Vec<_> = BEST_SELLERS
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, &(id, name, sales, revenue))| RankedProduct {
                rank: i + 1,
                id,
                name,
                sales,
                revenue,
            })
            .collect();
        let total_sales = products.iter().map(|p| p.sales).sum::<u32>();
        let total_revenue = round_cents(products.iter().map(|p| p.revenue).sum());

        let report = TopProductsReport {
            period: period.as_str(),
            label: period.label(),
            summary: format!(
                "Top {} products {}: {total_sales} units, €{total_revenue:.2} revenue",
                products.len(),
                period.label()
            ),
            total_sales,
            total_revenue,
            products,
        };
        Ok(ToolOutput::json(&report)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn value(output: ToolOutput) -> Value {
        match output {
            ToolOutput::Value(value) => value,
            ToolOutput::Content(_) => panic!("expected a raw value"),
        }
    }

    async fn run(tool: &dyn Tool, args: Value) -> Value {
        value(tool.execute(&Arguments::from_params(Some(&args))).await.unwrap())
    }

    #[test]
    fn stock_is_deterministic_per_product() {
        assert_eq!(StockLevel::simulate(101), StockLevel::simulate(101));

        for id in 0..200 {
            let stock = StockLevel::simulate(id);
            if stock.in_stock {
                assert!((5..50).contains(&stock.quantity));
            } else {
                assert_eq!(stock.quantity, 0);
            }
            assert!(WAREHOUSES.contains(&stock.warehouse));
        }
    }

    #[test]
    fn shipment_is_deterministic_per_order() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let first = Shipment::simulate(1001, today);
        assert_eq!(first, Shipment::simulate(1001, today));

        assert!(first.tracking_number.starts_with("ES001001"));
        assert_eq!(first.tracking_number.len(), 12);
        assert!(SHIPPING_STATUSES.contains(&first.status));
        assert!(CARRIERS.contains(&first.carrier));

        let days = (first.estimated_delivery - today).num_days();
        assert!((1..=6).contains(&days));
    }

    #[tokio::test]
    async fn check_inventory_repeats_for_same_product() {
        let tool = CheckInventory::new(Duration::ZERO);
        let first = run(&tool, json!({"productId": 101})).await;
        let second = run(&tool, json!({"productId": 101})).await;

        for field in ["productId", "inStock", "quantity", "warehouse", "summary"] {
            assert_eq!(first[field], second[field], "{field} differs");
        }
        assert!(first.get("checkedAt").is_some());
    }

    #[tokio::test]
    async fn check_inventory_requires_product_id() {
        let tool = CheckInventory::new(Duration::ZERO);
        let err = tool.execute(&Arguments::new()).await.unwrap_err();
        assert!(err.to_string().contains("'productId'"));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated() {
        let tool = GetShippingStatus::new(Duration::from_millis(150));
        let started = tokio::time::Instant::now();

        run(&tool, json!({"orderId": 7})).await;
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn id_and_limit_schemas_are_numbers() {
        for (definition, property) in [
            (CheckInventory::new(Duration::ZERO).definition(), "productId"),
            (GetShippingStatus::new(Duration::ZERO).definition(), "orderId"),
            (GetTopProducts::new(Duration::ZERO).definition(), "limit"),
        ] {
            let schema = serde_json::to_value(&definition.input_schema).unwrap();
            assert_eq!(schema["properties"][property]["type"], "number", "{property}");
        }
    }

    #[tokio::test]
    async fn top_products_defaults() {
        let tool = GetTopProducts::new(Duration::ZERO);
        let report = run(&tool, json!({})).await;

        assert_eq!(report["period"], "week");
        assert_eq!(report["products"].as_array().unwrap().len(), 10);
        assert_eq!(report["products"][0]["id"], 101);
        assert_eq!(report["products"][1]["name"], "Silla Herman Miller");
        assert_eq!(report["totalSales"], 1282);
    }

    #[tokio::test]
    async fn top_products_limit_and_period() {
        let tool = GetTopProducts::new(Duration::ZERO);
        let report = run(&tool, json!({"limit": 3, "period": "month"})).await;

        let ranks: Vec<u64> = report["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["rank"].as_u64().unwrap())
            .collect();
        assert_eq!(ranks, [1, 2, 3]);
        assert_eq!(report["label"], "this month");
        assert!(report["summary"].as_str().unwrap().starts_with("Top 3 products this month"));

        let clamped = run(&tool, json!({"limit": 50})).await;
        assert_eq!(clamped["products"].as_array().unwrap().len(), 10);
        let negative = run(&tool, json!({"limit": -1})).await;
        assert_eq!(negative["products"].as_array().unwrap().len(), 10);
    }
}
