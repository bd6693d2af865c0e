//! Behavioural analytics tools over sessions, cart events and abandoned carts.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use workshop_core::types::{AnalyticsData, CartAction, CartEvent, CartItem, UserSession};
use workshop_mcp::content::resource_uri;
use workshop_mcp::{
    Arguments, ContentBlock, InputSchema, PropertySchema, Tool, ToolDefinition, ToolError,
    ToolOutput,
};

use super::round_cents;

const DEFAULT_HOURS: i64 = 24;

/// `get_abandoned_carts`: carts abandoned within the last N hours.
pub struct GetAbandonedCarts {
    data: Arc<AnalyticsData>,
}

impl GetAbandonedCarts {
    pub fn new(data: Arc<AnalyticsData>) -> Self {
        Self { data }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AbandonedCartsReport<'a> {
    summary: String,
    total_carts: usize,
    total_value: f64,
    total_items: usize,
    carts: Vec<CartSummary<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartSummary<'a> {
    id: &'a str,
    user_id: &'a str,
    total_value: f64,
    hours_ago: i64,
    abandoned_at: DateTime<Utc>,
    item_count: usize,
    items: &'a [CartItem],
}

#[async_trait]
impl Tool for GetAbandonedCarts {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_abandoned_carts",
            "Lists shopping carts abandoned in the last N hours, highest value first. \
             Optional 'hours' (number, default 24). Use it for questions about abandoned carts \
             or users who did not complete a purchase.",
            InputSchema::object().property(
                "hours",
                PropertySchema::number(
                    "How many hours back to look for abandoned carts (e.g. 24, 48, 72). Default: 24",
                )
                .default_value(DEFAULT_HOURS),
            ),
        )
    }

    async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError> {
        let hours = args.optional_int("hours").unwrap_or(DEFAULT_HOURS);

        let mut carts: Vec<_> = self
            .data
            .abandoned_carts
            .iter()
            .filter(|cart| cart.hours_ago <= hours)
            .collect();
        // Stable: equal values keep fixture order.
        carts.sort_by(|a, b| b.total_value.total_cmp(&a.total_value));

        let total_value = round_cents(carts.iter().map(|c| c.total_value).sum());
        let total_items = carts.iter().map(|c| c.items.len()).sum::<usize>();
        #[allow(clippy::cast_precision_loss)]
        let average = if carts.is_empty() {
            0.0
        } else {
            total_value / carts.len() as f64
        };

        let mut summary = format!(
            "ABANDONED CARTS (last {hours} hours)\n\n\
             Total carts: {}\n\
             Total items: {total_items}\n\
             Total value: €{total_value:.2}\n\
             Average value: €{average:.2}\n\n\
             Details:",
            carts.len()
        );
        for cart in &carts {
            let _ = write!(
                summary,
                "\n- {}: {} item(s), €{:.2}, abandoned {}h ago",
                cart.user_id,
                cart.items.len(),
                cart.total_value,
                cart.hours_ago
            );
        }

        tracing::debug!(hours, found = carts.len(), "abandoned carts filtered");

        let report = AbandonedCartsReport {
            summary,
            total_carts: carts.len(),
            total_value,
            total_items,
            carts: carts
                .iter()
                .map(|cart| CartSummary {
                    id: &cart.id,
                    user_id: &cart.user_id,
                    total_value: cart.total_value,
                    hours_ago: cart.hours_ago,
                    abandoned_at: cart.abandoned_at,
                    item_count: cart.items.len(),
                    items: &cart.items,
                })
                .collect(),
        };
        Ok(ToolOutput::json(&report)?)
    }
}

/// Metric a caller is most interested in. Only labels the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
enum MetricType {
    Sessions,
    PageViews,
    Conversions,
}

impl MetricType {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("pageViews") => Self::PageViews,
            Some("conversions") => Self::Conversions,
            _ => Self::Sessions,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Sessions => "sessions",
            Self::PageViews => "pageViews",
            Self::Conversions => "conversions",
        }
    }
}

struct BehaviorQuery {
    user_id: String,
    metric: MetricType,
}

impl BehaviorQuery {
    fn from_arguments(args: &Arguments) -> Result<Self, ToolError> {
        let mut v = args.validator();
        let user_id = v.required_str("userId");
        v.finish()?;

        Ok(Self {
            user_id,
            metric: MetricType::parse(args.optional_str("metricType")),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BehaviorMetrics {
    total_sessions: usize,
    total_page_views: u64,
    total_actions: usize,
    avg_session_duration: f64,
    add_to_cart_count: usize,
    has_checkout: bool,
}

impl BehaviorMetrics {
    fn compute(sessions: &[&UserSession], events: &[&CartEvent]) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let avg_session_duration = if sessions.is_empty() {
            0.0
        } else {
            sessions.iter().map(|s| s.duration_minutes()).sum::<f64>() / sessions.len() as f64
        };

        Self {
            total_sessions: sessions.len(),
            total_page_views: sessions.iter().map(|s| u64::from(s.pages_viewed)).sum(),
            total_actions: sessions.iter().map(|s| s.actions.len()).sum(),
            avg_session_duration,
            add_to_cart_count: events
                .iter()
                .filter(|e| e.action == CartAction::AddToCart)
                .count(),
            has_checkout: events.iter().any(|e| e.action == CartAction::Checkout),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BehaviorReport<'a> {
    user_id: &'a str,
    metric_type: MetricType,
    metrics: &'a BehaviorMetrics,
    sessions: Vec<&'a UserSession>,
    cart_events: Vec<&'a CartEvent>,
}

/// `analyze_user_behavior`: session and cart metrics of one user.
pub struct AnalyzeUserBehavior {
    data: Arc<AnalyticsData>,
}

impl AnalyzeUserBehavior {
    pub fn new(data: Arc<AnalyticsData>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Tool for AnalyzeUserBehavior {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "analyze_user_behavior",
            "Analyzes the browsing and cart behavior of a specific user.",
            InputSchema::object()
                .property("userId", PropertySchema::string("ID of the user to analyze"))
                .property(
                    "metricType",
                    PropertySchema::string("Metric of interest (sessions, pageViews, conversions)")
                        .one_of(&["sessions", "pageViews", "conversions"])
                        .default_value("sessions"),
                )
                .required("userId"),
        )
    }

    async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError> {
        let query = BehaviorQuery::from_arguments(args)?;

        let sessions: Vec<_> = self
            .data
            .sessions
            .iter()
            .filter(|s| s.user_id == query.user_id)
            .collect();
        let events: Vec<_> = self
            .data
            .cart_events
            .iter()
            .filter(|e| e.user_id == query.user_id)
            .collect();
        let metrics = BehaviorMetrics::compute(&sessions, &events);

        let summary = format!(
            "USER BEHAVIOR: {}\n\n\
             Sessions: {}\n\
             Page views: {}\n\
             Actions: {}\n\
             Average session: {:.1} minutes\n\
             Items added to cart: {}\n\
             Checked out: {}\n\n\
             Requested metric: {}",
            query.user_id,
            metrics.total_sessions,
            metrics.total_page_views,
            metrics.total_actions,
            metrics.avg_session_duration,
            metrics.add_to_cart_count,
            if metrics.has_checkout { "yes" } else { "no" },
            query.metric.as_str(),
        );

        let uri = resource_uri(
            "cosmos://analytics/user-behavior",
            &[("userId", Some(query.user_id.as_str()))],
        );
        let report = BehaviorReport {
            user_id: &query.user_id,
            metric_type: query.metric,
            metrics: &metrics,
            sessions,
            cart_events: events,
        };

        Ok(ToolOutput::summary_with_resource(
            summary,
            ContentBlock::json_resource(uri, &report)?,
        ))
    }
}
