//! Read-only aggregate queries for the admin dashboard.

use sqlx::PgPool;

use feastflow_core::OrderStatus;

use super::RepositoryError;
use crate::models::{ActivityEntry, DashboardMetrics};

/// Repository for dashboard queries.
pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    /// Create a new dashboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Compute the headline counters in a single round trip.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn metrics(&self) -> Result<DashboardMetrics, RepositoryError> {
        let revenue_statuses: Vec<&'static str> = OrderStatus::REVENUE
            .iter()
            .map(|status| status.as_str())
            .collect();

        let metrics = sqlx::query_as::<_, DashboardMetrics>(
            r"
            SELECT
                (SELECT COUNT(*) FROM users WHERE role = 'customer') AS total_customers,
                (SELECT COUNT(*) FROM restaurants WHERE is_active) AS active_restaurants,
                (SELECT COUNT(*) FROM orders) AS total_orders,
                (SELECT COUNT(*) FROM orders
                    WHERE created_at::date = CURRENT_DATE) AS today_orders,
                (SELECT COALESCE(SUM(total_amount), 0) FROM orders
                    WHERE created_at::date = CURRENT_DATE
                      AND status = ANY($1)) AS today_revenue,
                (SELECT COUNT(DISTINCT cart_id) FROM cart_items) AS active_carts
            ",
        )
        .bind(revenue_statuses)
        .fetch_one(self.pool)
        .await?;

        Ok(metrics)
    }

    /// Most recent audit log entries with the acting user's name and email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_activity(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, ActivityEntry>(
            r"
            SELECT al.id, al.user_id, al.action, al.entity_type, al.entity_id,
                   al.details, al.created_at,
                   u.first_name, u.last_name, u.email
            FROM audit_log al
            LEFT JOIN users u ON al.user_id = u.id
            ORDER BY al.created_at DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}
