pub mod error;
pub mod types;

pub use error::Error;
pub use types::{
    AbandonedCart, AnalyticsData, CartAction, CartEvent, CartItem, Customer, Order, Product,
    SalesData, UserSession,
};
