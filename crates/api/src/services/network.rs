//! Kubernetes network diagnostics.
//!
//! Resolves the cluster DNS names of the FeastFlow services and probes each
//! one that resolves. Probe failures are recorded in the report; they never
//! fail the request.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::config::{ApiConfig, NetworkConfig};

const CLUSTER_DOMAIN: &str = "cluster.local";
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const POSTGRES_SERVICE: &str = "postgres";
const BACKEND_SERVICE: &str = "feastflow-backend";
const FRONTEND_SERVICE: &str = "feastflow-frontend";
const BACKEND_PORT: u16 = 5000;
const FRONTEND_PORT: u16 = 3000;
const POSTGRES_PORT: u16 = 5432;

/// Outcome of resolving and probing one service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTest {
    pub service: String,
    pub dns_name: String,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reachable: Option<bool>,
    /// Milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDiscoveryNote {
    pub explanation: &'static str,
    pub dns_format: &'static str,
    pub cluster_domain: &'static str,
}

/// Full diagnostics report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub timestamp: DateTime<Utc>,
    pub pod_name: String,
    pub namespace: String,
    pub tests: Vec<ServiceTest>,
    pub kubernetes_service_discovery: ServiceDiscoveryNote,
}

/// Result of an HTTP probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProbe {
    pub reachable: bool,
    pub response_time: Duration,
    pub error: Option<String>,
}

/// Fully qualified cluster DNS name of a service.
#[must_use]
pub fn cluster_dns_name(service: &str, namespace: &str) -> String {
    format!("{service}.{namespace}.svc.{CLUSTER_DOMAIN}")
}

/// Resolve `host` to its first address.
///
/// # Errors
///
/// Returns the resolver's error message if the name does not resolve.
pub async fn resolve(host: &str) -> Result<IpAddr, String> {
    let mut addrs = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|e| e.to_string())?;
    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| format!("no addresses found for {host}"))
}

/// Issue a GET and report whether any HTTP response came back.
///
/// Any status code counts as reachable.
pub async fn probe_http(client: &reqwest::Client, url: &str) -> HttpProbe {
    let started = Instant::now();
    let result = client.get(url).timeout(PROBE_TIMEOUT).send().await;
    let response_time = started.elapsed();

    match result {
        Ok(_) => HttpProbe {
            reachable: true,
            response_time,
            error: None,
        },
        Err(e) => HttpProbe {
            reachable: false,
            response_time,
            error: Some(if e.is_timeout() {
                "Request timeout".to_owned()
            } else {
                e.to_string()
            }),
        },
    }
}

/// Resolve a service's cluster DNS name without probing it.
async fn dns_test(service: &str, namespace: &str) -> ServiceTest {
    let dns_name = cluster_dns_name(service, namespace);
    let resolved = resolve(&dns_name).await;

    match resolved {
        Ok(ip) => {
            tracing::info!(%dns_name, %ip, "DNS resolution succeeded");
            ServiceTest {
                service: service.to_owned(),
                dns_name,
                resolved: true,
                ip_address: Some(ip),
                reachable: None,
                response_time: None,
                error: None,
            }
        }
        Err(error) => {
            tracing::warn!(%dns_name, %error, "DNS resolution failed");
            ServiceTest {
                service: service.to_owned(),
                dns_name,
                resolved: false,
                ip_address: None,
                reachable: None,
                response_time: None,
                error: Some(error),
            }
        }
    }
}

/// Resolve a service and, if it resolves, probe it over HTTP.
async fn http_service_test(
    client: &reqwest::Client,
    service: &str,
    namespace: &str,
    port: u16,
    path: &str,
) -> ServiceTest {
    let mut test = dns_test(service, namespace).await;
    if test.resolved {
        let url = format!("http://{}:{port}{path}", test.dns_name);
        let probe = probe_http(client, &url).await;
        tracing::info!(
            service,
            reachable = probe.reachable,
            response_ms = u64::try_from(probe.response_time.as_millis()).unwrap_or(u64::MAX),
            "HTTP probe finished"
        );
        test.reachable = Some(probe.reachable);
        test.response_time = u64::try_from(probe.response_time.as_millis()).ok();
        test.error = probe.error;
    }
    test
}

/// Run every diagnostic in order.
pub async fn run_diagnostics(
    config: &NetworkConfig,
    pool: &PgPool,
    client: &reqwest::Client,
) -> Diagnostics {
    let namespace = config.namespace.as_str();
    tracing::info!(pod = %config.pod_name, namespace, "running network diagnostics");

    let mut postgres = dns_test(POSTGRES_SERVICE, namespace).await;
    if postgres.resolved {
        match crate::db::ping(pool).await {
            Ok(_) => postgres.reachable = Some(true),
            Err(e) => {
                tracing::warn!(error = %e, "database resolved but unreachable");
                postgres.reachable = Some(false);
                postgres.error = Some("DNS resolved but connection failed".to_owned());
            }
        }
    }

    let backend =
        http_service_test(client, BACKEND_SERVICE, namespace, BACKEND_PORT, "/api/health").await;
    let frontend = http_service_test(client, FRONTEND_SERVICE, namespace, FRONTEND_PORT, "/").await;

    let short_form = match resolve(POSTGRES_SERVICE).await {
        Ok(ip) => ServiceTest {
            service: format!("{POSTGRES_SERVICE} (short form)"),
            dns_name: POSTGRES_SERVICE.to_owned(),
            resolved: true,
            ip_address: Some(ip),
            reachable: None,
            response_time: None,
            error: None,
        },
        Err(error) => ServiceTest {
            service: format!("{POSTGRES_SERVICE} (short form)"),
            dns_name: POSTGRES_SERVICE.to_owned(),
            resolved: false,
            ip_address: None,
            reachable: None,
            response_time: None,
            error: Some(error),
        },
    };

    Diagnostics {
        timestamp: Utc::now(),
        pod_name: config.pod_name.clone(),
        namespace: namespace.to_owned(),
        tests: vec![postgres, backend, frontend, short_form],
        kubernetes_service_discovery: ServiceDiscoveryNote {
            explanation: "Kubernetes provides automatic DNS-based service discovery. \
                          Services are accessible via DNS names instead of hardcoded IPs.",
            dns_format: "<service-name>.<namespace>.svc.cluster.local",
            cluster_domain: CLUSTER_DOMAIN,
        },
    }
}

// =============================================================================
// Service discovery description
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDns {
    pub short_form: &'static str,
    pub fqdn: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub port: u16,
    pub dns: ServiceDns,
    pub purpose: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConnection {
    pub method: &'static str,
    pub host: String,
    pub port: String,
    pub configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrontendConnection {
    pub method: &'static str,
    pub url: String,
    pub configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfiguredConnections {
    #[serde(rename = "backend → postgres")]
    pub backend_to_postgres: DatabaseConnection,
    #[serde(rename = "frontend → backend")]
    pub frontend_to_backend: FrontendConnection,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesNetworking {
    pub cluster_domain: &'static str,
    pub dns_service: &'static str,
    pub dns_automation: &'static str,
    pub benefits: [&'static str; 4],
}

/// Static description of how the services find each other.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDiscovery {
    pub namespace: String,
    pub services: Vec<ServiceInfo>,
    pub configured_connections: ConfiguredConnections,
    pub kubernetes_networking: KubernetesNetworking,
}

/// Describe the cluster services from configuration alone.
#[must_use]
pub fn service_discovery(config: &ApiConfig) -> ServiceDiscovery {
    let namespace = config.network.namespace.clone();
    let service = |name: &'static str, port, purpose| ServiceInfo {
        name,
        kind: "ClusterIP",
        port,
        dns: ServiceDns {
            short_form: name,
            fqdn: cluster_dns_name(name, &namespace),
        },
        purpose,
    };

    ServiceDiscovery {
        services: vec![
            service(
                POSTGRES_SERVICE,
                POSTGRES_PORT,
                "PostgreSQL database service - provides persistent data storage",
            ),
            service(
                BACKEND_SERVICE,
                BACKEND_PORT,
                "Backend API service - handles business logic and data operations",
            ),
            service(
                FRONTEND_SERVICE,
                FRONTEND_PORT,
                "Frontend web service - serves the user interface",
            ),
        ],
        configured_connections: ConfiguredConnections {
            backend_to_postgres: DatabaseConnection {
                method: "DNS-based service discovery",
                host: config.network.db_host.clone(),
                port: config.network.db_port.clone(),
                configured: true,
            },
            frontend_to_backend: FrontendConnection {
                method: "DNS-based service discovery",
                url: config.frontend_url.clone(),
                configured: true,
            },
        },
        kubernetes_networking: KubernetesNetworking {
            cluster_domain: CLUSTER_DOMAIN,
            dns_service: "kube-dns / CoreDNS",
            dns_automation: "Kubernetes automatically creates DNS entries for each Service",
            benefits: [
                "No manual IP management required",
                "Services are discoverable by name",
                "Load balancing across multiple pods",
                "Automatic failover and self-healing",
            ],
        },
        namespace,
    }
}
