/// Redis caching layer with graceful degradation.
///
/// All operations behave as cache misses on any Redis failure: they log a
/// warning and return `None`, and callers fall through to compute from the
/// engine. The server is fully functional without Redis.
///
/// Key schema (namespaced to avoid collisions):
/// - `rws:v1:suggest:{sha256(query|road_type|environment|top_k)}` —
///   JSON-serialized `SuggestResponse` (TTL: 3600s)
use redis::AsyncCommands;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::api::SuggestResponse;

const KEY_PREFIX: &str = "rws:v1:";
const SUGGEST_TTL_SECS: u64 = 3600;

pub struct SuggestionCache {
    client: Option<redis::Client>,
}

impl SuggestionCache {
    /// Attempt to create a client. If the URL is `None` or invalid, returns a
    /// cache that always degrades gracefully (no-ops).
    pub fn connect(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(
                    |e| warn!(error = %e, url = u, "failed to create redis client, cache disabled"),
                )
                .ok()
        });
        Self { client }
    }

    /// Test the connection by sending a PING.
    pub async fn is_available(&self) -> bool {
        let Some(client) = &self.client else {
            return false;
        };
        match client.get_multiplexed_async_connection().await {
            Ok(mut conn) => {
                let result: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
                result.is_ok()
            }
            Err(_) => false,
        }
    }

    async fn connection(&self) -> Option<redis::aio::MultiplexedConnection> {
        let client = self.client.as_ref()?;
        client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()
    }

    pub async fn get_suggestions(
        &self,
        query: &str,
        road_type: Option<&str>,
        environment: Option<&str>,
        top_k: usize,
    ) -> Option<SuggestResponse> {
        let key = suggest_key(query, road_type, environment, top_k);
        let mut conn = self.connection().await?;
        let json: Option<String> = conn
            .get(&key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis GET failed"))
            .ok()?;
        serde_json::from_str(&json?)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
            .ok()
    }

    pub async fn set_suggestions(
        &self,
        query: &str,
        road_type: Option<&str>,
        environment: Option<&str>,
        top_k: usize,
        response: &SuggestResponse,
    ) {
        let key = suggest_key(query, road_type, environment, top_k);
        let Some(mut conn) = self.connection().await else {
            return;
        };
        if let Ok(json) = serde_json::to_string(response) {
            if let Err(e) = conn
                .set_ex::<_, _, ()>(&key, json, SUGGEST_TTL_SECS)
                .await
            {
                warn!(error = %e, key, "redis SETEX failed");
            }
        }
    }

    /// Delete all cached data under the namespace. Used after a knowledge-base
    /// reload. SCAN-based (KEYS would block the server).
    pub async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = format!("{KEY_PREFIX}*");
        let mut cursor: u64 = 0;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = match redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, pattern, "redis SCAN failed");
                    return;
                }
            };

            if !keys.is_empty() {
                if let Err(e) = conn.del::<_, ()>(&keys).await {
                    warn!(error = %e, "redis batch DEL failed during invalidation");
                    return;
                }
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
    }
}

/// Deterministic cache key over all parameters that shape a suggestion
/// response.
fn suggest_key(
    query: &str,
    road_type: Option<&str>,
    environment: Option<&str>,
    top_k: usize,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update(b"|");
    hasher.update(road_type.unwrap_or("").as_bytes());
    hasher.update(b"|");
    hasher.update(environment.unwrap_or("").as_bytes());
    hasher.update(b"|");
    hasher.update(top_k.to_string().as_bytes());
    format!("{KEY_PREFIX}suggest:{:x}", hasher.finalize())
}
