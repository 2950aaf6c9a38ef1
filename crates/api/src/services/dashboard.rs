//! Dashboard aggregation.

use std::time::Duration;

use serde::Deserialize;
use sqlx::PgPool;

use crate::db::{self, DashboardRepository, RepositoryError};
use crate::models::{ActivityEntry, DashboardMetrics, ServiceHealth, ServiceStatus};

/// Default page size for the activity feed.
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 50;

/// Largest page the activity feed will return.
pub const MAX_ACTIVITY_LIMIT: i64 = 200;

/// The store round trip above which the database row is `DEGRADED`.
const HEALTHY_DB_LATENCY: Duration = Duration::from_millis(50);

/// Activity feed query string. Kept as raw strings so bad input falls back
/// to defaults instead of being rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ActivityQuery {
    /// Resolve `(limit, offset)`.
    #[must_use]
    pub fn page(&self) -> (i64, i64) {
        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l > 0)
            .map_or(DEFAULT_ACTIVITY_LIMIT, |l| l.min(MAX_ACTIVITY_LIMIT));
        let offset = self
            .offset
            .as_deref()
            .and_then(|o| o.trim().parse::<i64>().ok())
            .filter(|o| *o > 0)
            .unwrap_or(0);
        (limit, offset)
    }
}

/// Read-only dashboard queries.
pub struct DashboardService<'a> {
    pool: &'a PgPool,
    repo: DashboardRepository<'a>,
}

impl<'a> DashboardService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            repo: DashboardRepository::new(pool),
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn metrics(&self) -> Result<DashboardMetrics, RepositoryError> {
        self.repo.metrics().await
    }

    /// Service health rows with a live database latency measurement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store cannot be reached.
    pub async fn health(&self) -> Result<Vec<ServiceHealth>, RepositoryError> {
        let latency = db::ping(self.pool).await?;
        Ok(service_health(latency))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn activity(&self, query: &ActivityQuery) -> Result<Vec<ActivityEntry>, RepositoryError> {
        let (limit, offset) = query.page();
        self.repo.recent_activity(limit, offset).await
    }
}

/// Build the service table around a measured database latency.
///
/// Only the database row is measured; the others are fixed.
#[must_use]
pub fn service_health(db_latency: Duration) -> Vec<ServiceHealth> {
    let fixed = |id, name, latency: &str, uptime| ServiceHealth {
        id,
        name,
        status: ServiceStatus::Healthy,
        latency: latency.to_owned(),
        uptime,
    };

    let db_status = if db_latency < HEALTHY_DB_LATENCY {
        ServiceStatus::Healthy
    } else {
        ServiceStatus::Degraded
    };

    vec![
        fixed(1, "API Gateway", "10ms", "99.99%"),
        fixed(2, "Order Service", "26ms", "99.97%"),
        fixed(3, "Payment Service", "49ms", "99.95%"),
        ServiceHealth {
            id: 4,
            name: "Database Cluster",
            status: db_status,
            latency: format!("{}ms", db_latency.as_millis()),
            uptime: "99.99%",
        },
        fixed(5, "Redis Cache", "6ms", "99.99%"),
        fixed(6, "CDN / Assets", "1ms", "100%"),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, offset: Option<&str>) -> ActivityQuery {
        ActivityQuery {
            limit: limit.map(str::to_owned),
            offset: offset.map(str::to_owned),
        }
    }

    #[test]
    fn test_activity_page_defaults() {
        assert_eq!(query(None, None).page(), (50, 0));
        assert_eq!(query(Some("abc"), Some("xyz")).page(), (50, 0));
        assert_eq!(query(Some("0"), Some("-4")).page(), (50, 0));
        assert_eq!(query(Some("-10"), None).page(), (50, 0));
    }

    #[test]
    fn test_activity_page_explicit_and_capped() {
        assert_eq!(query(Some("10"), Some("20")).page(), (10, 20));
        assert_eq!(query(Some("5000"), None).page(), (200, 0));
    }

    #[test]
    fn test_service_health_fast_database() {
        let rows = service_health(Duration::from_millis(3));
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[3].name, "Database Cluster");
        assert_eq!(rows[3].status, ServiceStatus::Healthy);
        assert_eq!(rows[3].latency, "3ms");
        assert!(rows.iter().all(|r| r.status == ServiceStatus::Healthy));
    }

    #[test]
    fn test_service_health_slow_database() {
        let rows = service_health(Duration::from_millis(50));
        assert_eq!(rows[3].status, ServiceStatus::Degraded);
        assert_eq!(rows[3].latency, "50ms");
        assert_eq!(rows[0].status, ServiceStatus::Healthy);
    }
}
