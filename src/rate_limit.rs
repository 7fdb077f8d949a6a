use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Per-client sliding window limiter guarding the credential endpoints.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<Windows>>,
    max_requests: usize,
    window: Duration,
}

struct Windows {
    hits: HashMap<String, VecDeque<Instant>>,
    last_cleanup: Instant,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(Windows {
                hits: HashMap::new(),
                last_cleanup: Instant::now(),
            })),
            max_requests: max_requests as usize,
            window,
        }
    }

    /// Records a hit for `key`. When the window is full, returns how long
    /// until the oldest hit expires.
    pub async fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut windows = self.state.lock().await;

        if now.duration_since(windows.last_cleanup) > CLEANUP_INTERVAL {
            let window = self.window;
            windows
                .hits
                .retain(|_, hits| hits.back().is_some_and(|t| now.duration_since(*t) < window));
            windows.last_cleanup = now;
        }

        let hits = windows.hits.entry(key.to_string()).or_default();
        while hits
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            hits.pop_front();
        }

        if hits.len() >= self.max_requests {
            let oldest = hits.front().copied().unwrap_or(now);
            return Err(self.window.saturating_sub(now.duration_since(oldest)));
        }

        hits.push_back(now);
        Ok(())
    }
}

/// First X-Forwarded-For hop, then X-Real-IP, else one shared bucket.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "global".to_string())
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(req.headers());

    if let Err(retry_after) = limiter.check(&key).await {
        tracing::warn!(client = %key, "rate limit exceeded");
        let secs = retry_after.as_secs().max(1);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, secs.to_string())],
            axum::Json(serde_json::json!({
                "error": "rate_limited",
                "message": "Too many requests. Please try again later."
            })),
        )
            .into_response();
    }

    next.run(req).await
}
