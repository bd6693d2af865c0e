//! Relational sales tools: customers, orders and aggregated revenue.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;

use workshop_core::types::{Order, SalesData};
use workshop_mcp::content::resource_uri;
use workshop_mcp::{
    Arguments, ContentBlock, InputSchema, PropertySchema, Tool, ToolDefinition, ToolError,
    ToolOutput,
};

use super::{round_cents, same_text};

const UNKNOWN: &str = "Unknown";

/// Optional string argument, with empty strings treated as absent.
fn non_empty<'a>(args: &'a Arguments, name: &str) -> Option<&'a str> {
    args.optional_str(name).filter(|s| !s.trim().is_empty())
}

/// `query_customers_by_country`: customers located in a country, optionally a city.
pub struct QueryCustomersByCountry {
    data: Arc<SalesData>,
}

impl QueryCustomersByCountry {
    pub fn new(data: Arc<SalesData>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Tool for QueryCustomersByCountry {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "query_customers_by_country",
            "Searches customers by country and, optionally, by city.",
            InputSchema::object()
                .property(
                    "country",
                    PropertySchema::string("Country to search (e.g. España, México)"),
                )
                .property("city", PropertySchema::string("Optional city to narrow the search"))
                .required("country"),
        )
    }

    async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError> {
        let mut v = args.validator();
        let country = v.required_str("country");
        v.finish()?;
        let city = non_empty(args, "city");

        let customers: Vec<_> = self
            .data
            .customers
            .iter()
            .filter(|c| same_text(&c.country, &country))
            .filter(|c| city.map_or(true, |city| same_text(&c.city, city)))
            .collect();

        let place = match city {
            Some(city) => format!("{city}, {country}"),
            None => country.clone(),
        };
        let mut summary = format!("Found {} customer(s) in {place}", customers.len());
        if !customers.is_empty() {
            summary.push_str("\n\nCustomers:");
            for customer in &customers {
                let _ = write!(
                    summary,
                    "\n- {} ({}), registered {}",
                    customer.name,
                    customer.city,
                    customer.registered_at.format("%Y-%m-%d")
                );
            }
        }

        let uri = resource_uri(
            "sql://workshop/customers",
            &[("country", Some(country.as_str())), ("city", city)],
        );
        Ok(ToolOutput::summary_with_resource(
            summary,
            ContentBlock::json_resource(uri, &customers)?,
        ))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderDetails<'a> {
    id: i64,
    customer_id: i64,
    customer_name: &'a str,
    customer_email: Option<&'a str>,
    product_id: i64,
    product_name: &'a str,
    quantity: u32,
    total_amount: f64,
    order_date: DateTime<Utc>,
    status: &'a str,
}

/// `get_order_details`: one order joined with its customer and product.
pub struct GetOrderDetails {
    data: Arc<SalesData>,
}

impl GetOrderDetails {
    pub fn new(data: Arc<SalesData>) -> Self {
        Self { data }
    }

    fn details<'a>(&'a self, order: &'a Order) -> OrderDetails<'a> {
        let customer = self.data.customer(order.customer_id);
        let product = self.data.product(order.product_id);

        OrderDetails {
            id: order.id,
            customer_id: order.customer_id,
            customer_name: customer.map_or(UNKNOWN, |c| c.name.as_str()),
            customer_email: customer.map(|c| c.email.as_str()),
            product_id: order.product_id,
            product_name: product.map_or(UNKNOWN, |p| p.name.as_str()),
            quantity: order.quantity,
            total_amount: order.total_amount,
            order_date: order.order_date,
            status: &order.status,
        }
    }
}

#[async_trait]
impl Tool for GetOrderDetails {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_order_details",
            "Returns an order together with its customer and product.",
            InputSchema::object()
                .property("orderId", PropertySchema::integer("ID of the order"))
                .required("orderId"),
        )
    }

    async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError> {
        let mut v = args.validator();
        let order_id = v.required_int("orderId");
        v.finish()?;

        let output = match self.data.order(order_id) {
            Some(order) => json!({ "found": true, "order": self.details(order) }),
            None => json!({
                "found": false,
                "message": format!("No order found with ID {order_id}"),
            }),
        };
        Ok(ToolOutput::Value(output))
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
}

struct SalesFilter {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    status: Option<String>,
}

impl SalesFilter {
    fn from_arguments(args: &Arguments) -> Self {
        Self {
            start: args.optional_str("startDate").and_then(parse_date),
            end: args.optional_str("endDate").and_then(parse_date),
            status: non_empty(args, "status").map(ToString::to_string),
        }
    }

    /// Both bounds are inclusive whole days.
    fn matches(&self, order: &Order) -> bool {
        let day = order.order_date.date_naive();
        self.start.map_or(true, |start| day >= start)
            && self.end.map_or(true, |end| day <= end)
            && self
                .status
                .as_deref()
                .map_or(true, |status| same_text(&order.status, status))
    }

    fn period(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) => format!("from {start} to {end}"),
            (Some(start), None) => format!("since {start}"),
            (None, Some(end)) => format!("until {end}"),
            (None, None) => "all time".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusBreakdown {
    status: String,
    count: usize,
    total: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SalesTotals {
    total_sales: f64,
    total_orders: usize,
    average_order_value: f64,
    period: String,
}

#[derive(Debug, Serialize)]
struct SalesReport {
    summary: SalesTotals,
    breakdown: Vec<StatusBreakdown>,
}

/// `get_sales_summary`: revenue totals with a per-status breakdown.
pub struct GetSalesSummary {
    data: Arc<SalesData>,
}

impl GetSalesSummary {
    pub fn new(data: Arc<SalesData>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Tool for GetSalesSummary {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_sales_summary",
            "Summarizes sales in a date range, optionally filtered by order status.",
            InputSchema::object()
                .property("startDate", PropertySchema::string("Start date (YYYY-MM-DD)"))
                .property("endDate", PropertySchema::string("End date (YYYY-MM-DD), inclusive"))
                .property(
                    "status",
                    PropertySchema::string("Order status (e.g. Completed, Pending, Cancelled)"),
                ),
        )
    }

    async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError> {
        let filter = SalesFilter::from_arguments(args);
        let orders: Vec<_> = self.data.orders.iter().filter(|o| filter.matches(o)).collect();

        let mut groups: IndexMap<&str, (usize, f64)> = IndexMap::new();
        for order in &orders {
            let entry = groups.entry(order.status.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += order.total_amount;
        }

        let total_sales = round_cents(orders.iter().map(|o| o.total_amount).sum());
        #[allow(clippy::cast_precision_loss)]
        let average_order_value = if orders.is_empty() {
            0.0
        } else {
            round_cents(total_sales / orders.len() as f64)
        };

        let report = SalesReport {
            summary: SalesTotals {
                total_sales,
                total_orders: orders.len(),
                average_order_value,
                period: filter.period(),
            },
            breakdown: groups
                .into_iter()
                .map(|(status, (count, total))| StatusBreakdown {
                    status: status.to_string(),
                    count,
                    total: round_cents(total),
                })
                .collect(),
        };

        let mut summary = format!(
            "SALES SUMMARY ({})\n\n\
             Total sales: €{total_sales:.2}\n\
             Total orders: {}\n\
             Average order value: €{average_order_value:.2}",
            report.summary.period,
            report.summary.total_orders,
        );
        if !report.breakdown.is_empty() {
            summary.push_str("\n\nBy status:");
            for group in &report.breakdown {
                let _ = write!(
                    summary,
                    "\n- {}: {} order(s), €{:.2}",
                    group.status, group.count, group.total
                );
            }
        }

        Ok(ToolOutput::summary_with_resource(
            summary,
            ContentBlock::json_resource("sql://workshop/sales-summary", &report)?,
        ))
    }
}
