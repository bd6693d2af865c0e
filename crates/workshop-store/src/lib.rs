mod fixtures;

pub use fixtures::{FixtureStore, ANALYTICS_FIXTURES, SALES_FIXTURES};
