use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied request id that is echoed back.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request id attached to every request as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer-token check for the dashboard routes.
#[derive(Debug, Clone)]
pub enum BearerAuth {
    /// Every request passes. Only allowed in development.
    Open,
    Keys(Arc<HashSet<String>>),
}

impl BearerAuth {
    /// Build from the configured tokens. Blank entries are ignored.
    ///
    /// With no usable token the routes stay open in development and startup
    /// fails anywhere else.
    pub fn from_keys(keys: &[String], is_development: bool) -> anyhow::Result<Self> {
        let keys: HashSet<String> = keys
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        match (keys.is_empty(), is_development) {
            (false, _) => Ok(Self::Keys(Arc::new(keys))),
            (true, true) => {
                tracing::warn!("no SALESDASH_API_KEYS configured; dashboard routes are open");
                Ok(Self::Open)
            }
            (true, false) => anyhow::bail!(
                "SALESDASH_API_KEYS must list at least one bearer token outside development"
            ),
        }
    }

    /// Check the `Authorization` header, returning the rejection message.
    fn check(&self, headers: &HeaderMap) -> Result<(), &'static str> {
        let Self::Keys(keys) = self else {
            return Ok(());
        };
        match bearer_token(headers) {
            None => Err("missing bearer token"),
            Some(token) if keys.contains(token) => Ok(()),
            Some(_) => Err("invalid bearer token"),
        }
    }
}

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    used: usize,
}

/// Fixed-window request budget shared by every protected route.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    budget: usize,
    length: Duration,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(budget: usize, length: Duration) -> Self {
        Self {
            budget,
            length,
            window: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(budget: usize) -> Self {
        Self::new(budget, Duration::from_secs(60))
    }

    /// Spend one request from the window open at `now`. A spent budget
    /// returns how long until the next window opens.
    async fn admit(&self, now: Instant) -> Result<(), Duration> {
        let mut window = self.window.lock().await;
        let elapsed = now.saturating_duration_since(window.opened_at);
        if elapsed >= self.length {
            window.opened_at = now;
            window.used = 0;
        }
        if window.used >= self.budget {
            return Err(self.length.saturating_sub(elapsed));
        }
        window.used += 1;
        Ok(())
    }
}

/// Take the caller's `x-request-id` or mint a UUID, expose it to handlers and
/// echo it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

pub async fn require_bearer_auth(
    State(auth): State<BearerAuth>,
    req: Request,
    next: Next,
) -> Response {
    match auth.check(req.headers()) {
        Ok(()) => next.run(req).await,
        Err(message) => reject(&req, "unauthorized", message),
    }
}

pub async fn enforce_rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    match limiter.admit(Instant::now()).await {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(
                path = %req.uri().path(),
                retry_after_secs = retry_after.as_secs(),
                "rate limit exceeded"
            );
            let mut res = reject(&req, "rate_limited", "rate limit exceeded");
            res.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs(retry_after)));
            res
        }
    }
}

/// Error response carrying the request id already assigned to `req`.
fn reject(req: &Request, code: &str, message: &str) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    ApiError::new(request_id, code, message).into_response()
}

/// Whole seconds, rounded up so clients never retry early.
fn retry_after_secs(wait: Duration) -> u64 {
    wait.as_secs() + u64::from(wait.subsec_nanos() > 0)
}

/// Token from an `Authorization: Bearer <token>` header; the scheme is
/// case-insensitive.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_header(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_token_ignores_scheme_case() {
        assert_eq!(bearer_token(&auth_header("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&auth_header("bearer  abc ")), Some("abc"));
        assert_eq!(bearer_token(&auth_header("Basic abc")), None);
        assert_eq!(bearer_token(&auth_header("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn open_auth_in_development_without_keys() {
        let auth = BearerAuth::from_keys(&[], true).expect("dev allows no keys");
        assert!(matches!(auth, BearerAuth::Open));
        assert_eq!(auth.check(&HeaderMap::new()), Ok(()));
    }

    #[test]
    fn blank_keys_fail_outside_development() {
        assert!(BearerAuth::from_keys(&[" ".to_string()], false).is_err());
    }

    #[test]
    fn check_tells_missing_from_invalid() {
        let auth = BearerAuth::from_keys(&[" key-1 ".to_string()], false).expect("valid keys");
        assert_eq!(auth.check(&auth_header("Bearer key-1")), Ok(()));
        assert_eq!(
            auth.check(&auth_header("Bearer key-2")),
            Err("invalid bearer token")
        );
        assert_eq!(auth.check(&HeaderMap::new()), Err("missing bearer token"));
    }

    #[tokio::test]
    async fn limiter_resets_when_the_window_closes() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = limiter.window.lock().await.opened_at;

        assert_eq!(limiter.admit(start).await, Ok(()));
        assert_eq!(limiter.admit(start + Duration::from_secs(1)).await, Ok(()));
        assert_eq!(
            limiter.admit(start + Duration::from_secs(20)).await,
            Err(Duration::from_secs(40))
        );
        assert_eq!(limiter.admit(start + Duration::from_secs(60)).await, Ok(()));
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_secs(40)), 40);
        assert_eq!(retry_after_secs(Duration::from_millis(40_001)), 41);
        assert_eq!(retry_after_secs(Duration::ZERO), 0);
    }
}
