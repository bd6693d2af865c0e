use chrono::{DateTime, TimeZone, Utc};

use workshop_core::types::{
    AbandonedCart, AnalyticsData, CartAction, CartEvent, CartItem, Customer, Order, Product,
    SalesData, UserSession,
};

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
}

fn customer(id: i64, name: &str, city: &str, country: &str) -> Customer {
    Customer {
        id,
        name: name.to_string(),
        email: format!("customer{id}@example.com"),
        phone: format!("+34 600 000 00{id}"),
        city: city.to_string(),
        country: country.to_string(),
        registered_at: at(1, 9, 0),
    }
}

/// Three customers, two of them in España.
pub fn sales_data() -> SalesData {
    SalesData {
        customers: vec![
            customer(1, "Ana García", "Madrid", "España"),
            customer(2, "Jorge Ruiz", "Guadalajara", "México"),
            customer(3, "Luis Pérez", "Barcelona", "España"),
        ],
        orders: vec![
            Order {
                id: 1001,
                customer_id: 1,
                product_id: 101,
                quantity: 1,
                total_amount: 899.0,
                order_date: at(2, 10, 0),
                status: "Completed".to_string(),
            },
            Order {
                id: 1002,
                customer_id: 3,
                product_id: 102,
                quantity: 2,
                total_amount: 640.5,
                order_date: at(4, 18, 30),
                status: "Pending".to_string(),
            },
        ],
        products: vec![
            Product {
                id: 101,
                name: "Portátil HP ProBook".to_string(),
                category: "Portátiles".to_string(),
                price: 899.0,
            },
            Product {
                id: 102,
                name: "Monitor Dell UltraSharp".to_string(),
                category: "Monitores".to_string(),
                price: 320.25,
            },
        ],
    }
}

fn abandoned(id: &str, user: &str, total_value: f64, hours_ago: i64) -> AbandonedCart {
    AbandonedCart {
        id: id.to_string(),
        user_id: user.to_string(),
        items: vec![CartItem {
            product_id: 101,
            price: total_value,
            quantity: 1,
        }],
        total_value,
        hours_ago,
        abandoned_at: at(5, 12, 0),
    }
}

pub fn analytics_data() -> AnalyticsData {
    AnalyticsData {
        sessions: vec![UserSession {
            id: "sess-1".to_string(),
            user_id: "user-001".to_string(),
            start_time: at(5, 10, 0),
            end_time: at(5, 10, 30),
            pages_viewed: 7,
            actions: vec!["view".to_string(), "addToCart".to_string()],
        }],
        cart_events: vec![
            CartEvent {
                user_id: "user-001".to_string(),
                product_id: 101,
                action: CartAction::AddToCart,
                timestamp: at(5, 10, 15),
                quantity: 1,
            },
            CartEvent {
                user_id: "user-002".to_string(),
                product_id: 105,
                action: CartAction::Other("wishlist".to_string()),
                timestamp: at(5, 11, 0),
                quantity: 1,
            },
        ],
        abandoned_carts: vec![
            abandoned("cart-1", "user-002", 150.0, 3),
            abandoned("cart-2", "user-003", 899.0, 20),
            abandoned("cart-3", "user-004", 75.0, 40),
        ],
    }
}
