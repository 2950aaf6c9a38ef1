//! Read models for the admin dashboard.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use feastflow_core::{AuditEntryId, UserId};

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_customers: i64,
    pub active_restaurants: i64,
    pub total_orders: i64,
    pub today_orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub today_revenue: Decimal,
    /// Carts holding at least one item.
    pub active_carts: i64,
}

/// Health state shown for a service row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// One row of the service health table.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub id: u8,
    pub name: &'static str,
    pub status: ServiceStatus,
    /// Formatted as `"<n>ms"`.
    pub latency: String,
    pub uptime: &'static str,
}

/// An audit log entry joined with the acting user, if any.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActivityEntry {
    pub id: AuditEntryId,
    pub user_id: Option<UserId>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}
