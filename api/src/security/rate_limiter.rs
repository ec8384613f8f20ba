use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error, Error,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    task::{Context, Poll},
    time::{Duration, Instant},
};
use tracing::warn;

// Public routes that accept credentials
const THROTTLED_PATHS: [&str; 2] = ["/login", "/register"];

struct Window {
    started: Instant,
    hits: usize,
}

/// Fixed-window limiter keyed by the peer IP of the connection, applied to
/// the credential endpoints only. Forwarding headers are client-controlled
/// and are not consulted.
#[derive(Clone)]
pub struct AuthThrottle {
    limit: usize,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl AuthThrottle {
    pub fn new(requests_per_minute: usize) -> Self {
        Self::with_window(requests_per_minute, Duration::from_secs(60))
    }

    pub fn with_window(limit: usize, window: Duration) -> Self {
        AuthThrottle {
            limit,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts a hit for `key` and reports whether it is within the limit.
    fn admit(&self, key: &str, now: Instant) -> bool {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        windows.retain(|_, w| now.duration_since(w.started) < self.window);

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.hits = 0;
        }
        if entry.hits >= self.limit {
            return false;
        }
        entry.hits += 1;
        true
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.windows.lock().map(|w| w.len()).unwrap_or(0)
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthThrottle
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthThrottleMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthThrottleMiddleware {
            service,
            throttle: self.clone(),
        })
    }
}

pub struct AuthThrottleMiddleware<S> {
    service: S,
    throttle: AuthThrottle,
}

impl<S, B> Service<ServiceRequest> for AuthThrottleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if THROTTLED_PATHS.contains(&req.path()) {
            let ip = req
                .peer_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            if !self.throttle.admit(&ip, Instant::now()) {
                warn!(%ip, path = req.path(), "auth rate limit exceeded");
                return Box::pin(async move {
                    Err(error::ErrorTooManyRequests(
                        "Rate limit exceeded. Try again later.",
                    ))
                });
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}
