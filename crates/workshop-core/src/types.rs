use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A browsing session of a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub pages_viewed: u32,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl UserSession {
    /// Session length in fractional minutes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_minutes(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 60_000.0
    }
}

/// What a user did to their cart.
///
/// Values outside the known set are kept verbatim so records serialize back
/// exactly as they were loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CartAction {
    AddToCart,
    RemoveFromCart,
    Checkout,
    Other(String),
}

impl CartAction {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AddToCart => "addToCart",
            Self::RemoveFromCart => "removeFromCart",
            Self::Checkout => "checkout",
            Self::Other(action) => action,
        }
    }
}

impl From<String> for CartAction {
    fn from(action: String) -> Self {
        match action.as_str() {
            "addToCart" => Self::AddToCart,
            "removeFromCart" => Self::RemoveFromCart,
            "checkout" => Self::Checkout,
            _ => Self::Other(action),
        }
    }
}

impl From<CartAction> for String {
    fn from(action: CartAction) -> Self {
        match action {
            CartAction::Other(action) => action,
            known => known.as_str().to_string(),
        }
    }
}

/// A single cart interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEvent {
    pub user_id: String,
    pub product_id: i64,
    pub action: CartAction,
    pub timestamp: DateTime<Utc>,
    pub quantity: u32,
}

/// One line of an abandoned cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: i64,
    pub price: f64,
    pub quantity: u32,
}

/// A cart the user left without checking out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbandonedCart {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub total_value: f64,
    pub hours_ago: i64,
    pub abandoned_at: DateTime<Utc>,
}

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    pub country: String,
    pub registered_at: DateTime<Utc>,
}

/// A placed order. Orders carry a single product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub quantity: u32,
    pub total_amount: f64,
    pub order_date: DateTime<Utc>,
    #[serde(default = "Order::default_status")]
    pub status: String,
}

impl Order {
    fn default_status() -> String {
        "Confirmed".to_string()
    }
}

/// A catalogue product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
}

/// Behavioural analytics records backing the analytics server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub sessions: Vec<UserSession>,
    pub cart_events: Vec<CartEvent>,
    pub abandoned_carts: Vec<AbandonedCart>,
}

/// Relational sales records backing the sales server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesData {
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
}

impl SalesData {
    #[must_use]
    pub fn customer(&self, id: i64) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn product(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn order(&self, id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }
}
