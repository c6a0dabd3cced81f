use serde_json::{Map, Value};
use tracing::warn;

use super::repository::ItemRepository;
use crate::errors::ServiceError;

pub const STATUS_CONNECTED: &str = "CONNECTED";
pub const STATUS_ERROR: &str = "ERROR";

/// `INFO server` fields reported back, with their fallback when absent.
const SERVER_FIELDS: [(&str, &str); 6] = [
    ("redis_version", "unknown"),
    ("redis_mode", "unknown"),
    ("os", "unknown"),
    ("tcp_port", "unknown"),
    ("uptime_in_seconds", "unknown"),
    ("server_name", "redis"),
];

/// Report which backing store the service talks to, plus the item count.
///
/// Never fails: any store error is folded into `status = "ERROR"` with the
/// message under `error`, and whatever was gathered before the failure is dropped.
pub async fn connection_info(repo: &ItemRepository) -> Map<String, Value> {
    match gather(repo).await {
        Ok(info) => info,
        Err(e) => {
            warn!(error = %e, "connection info unavailable");
            let mut info = Map::new();
            info.insert("status".into(), Value::from(STATUS_ERROR));
            info.insert("error".into(), Value::from(e.to_string()));
            info
        }
    }
}

async fn gather(repo: &ItemRepository) -> Result<Map<String, Value>, ServiceError> {
    let store = repo.server_info().await?;

    let mut info = Map::new();
    info.insert("status".into(), Value::from(STATUS_CONNECTED));
    info.insert("endpoint".into(), Value::from(store.endpoint));
    for (field, fallback) in SERVER_FIELDS {
        let value = store.server.get(field).map(String::as_str).unwrap_or(fallback);
        info.insert(field.into(), Value::from(value));
    }
    info.insert("item_count".into(), Value::from(repo.count().await?));
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{failing_repository, memory_repository};
    use models::{item::now, Item};

    #[tokio::test]
    async fn connected_report_fills_fallbacks() -> Result<(), anyhow::Error> {
        let (repo, _) = memory_repository();
        repo.save(Item::new("", "a", "", now())).await?;
        repo.save(Item::new("", "b", "", now())).await?;

        let info = connection_info(&repo).await;
        assert_eq!(info["status"], "CONNECTED");
        assert_eq!(info["endpoint"], "memory");
        assert_eq!(info["redis_mode"], "standalone");
        assert_eq!(info["redis_version"], "unknown");
        assert_eq!(info["server_name"], "memory");
        assert_eq!(info["item_count"], 2);
        assert!(info.get("error").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn store_failure_becomes_error_status() {
        let info = connection_info(&failing_repository()).await;
        assert_eq!(info["status"], "ERROR");
        assert!(info["error"].as_str().unwrap_or_default().contains("unavailable"));
        assert!(info.get("item_count").is_none());
    }
}
