//! Per-IP rate limiting for the public API routes.
//!
//! Fixed-window counting: each key gets `rate` admissions per `window`, and
//! the counter resets once a full window has passed since the key was last
//! seen. Bursts of up to `2 * rate` are possible across a window boundary;
//! that is the price of O(1) memory and work per key.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{header, Method};
use actix_web::{Error, HttpResponse};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::debug;
use serde_json::json;
use tokio::sync::watch;

struct Visitor {
    last_seen: Instant,
    count: u32,
}

/// In-memory rate limiter tracking one window counter per key.
///
/// All counter state lives behind a single mutex; the background sweep task
/// shares it, so `allow` and the sweep cannot race. Counters are process-local
/// and reset on restart.
pub struct RateLimiter {
    visitors: Arc<Mutex<HashMap<String, Visitor>>>,
    rate: u32,
    window: Duration,
    stop_tx: watch::Sender<bool>,
}

// A poisoned lock still holds a valid map, so recover instead of panicking.
fn lock_visitors<'a>(
    visitors: &'a Mutex<HashMap<String, Visitor>>,
) -> MutexGuard<'a, HashMap<String, Visitor>> {
    visitors
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RateLimiter {
    /// Creates a rate limiter that allows `rate` requests per `window` per
    /// key, and spawns the background sweep task.
    /// Example: `RateLimiter::new(10, Duration::from_secs(60), Duration::from_secs(60))`
    /// allows 10 requests per minute per IP.
    pub fn new(rate: u32, window: Duration, sweep_interval: Duration) -> Self {
        let visitors: Arc<Mutex<HashMap<String, Visitor>>> = Arc::new(Mutex::new(HashMap::new()));
        let (stop_tx, mut stop_rx) = watch::channel(false);

        // Periodically drop keys idle for more than two windows so the map
        // cannot grow without bound.
        let sweep_map = Arc::clone(&visitors);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_interval);
            // interval fires immediately once; skip that
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let cutoff = window * 2;
                        let mut visitors = lock_visitors(&sweep_map);
                        visitors.retain(|_, v| v.last_seen.elapsed() <= cutoff);
                    }
                    changed = stop_rx.changed() => {
                        // Stopped explicitly, or the limiter itself was dropped
                        if changed.is_err() || *stop_rx.borrow() {
                            return;
                        }
                    }
                }
            }
        });

        Self {
            visitors,
            rate,
            window,
            stop_tx,
        }
    }

    /// Checks if a request from the given key should be allowed, creating or
    /// updating the key's window counter.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut visitors = lock_visitors(&self.visitors);

        if let Some(v) = visitors.get_mut(key) {
            // Window expired - reset the count
            if now.duration_since(v.last_seen) > self.window {
                v.count = 1;
                v.last_seen = now;
                return true;
            }

            // Over the limit; rejected requests do not extend the window
            if v.count >= self.rate {
                return false;
            }

            v.count += 1;
            v.last_seen = now;
            return true;
        }

        // New visitor
        visitors.insert(
            key.to_string(),
            Visitor {
                last_seen: now,
                count: 1,
            },
        );
        true
    }

    /// Stops the background sweep task. Idempotent; `allow` keeps working
    /// after the sweeper is gone.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    #[cfg(test)]
    fn is_tracking(&self, key: &str) -> bool {
        lock_visitors(&self.visitors).contains_key(key)
    }
}

/// Extracts the key a request is limited by: the first `X-Forwarded-For`
/// entry when present (proxies put the original client there), otherwise the
/// peer address without its port.
pub fn client_ip(req: &ServiceRequest) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
    {
        // May contain multiple hops: "client, proxy1, proxy2"
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware applying a shared [`RateLimiter`] to every non-preflight
/// request passing through it.
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: Arc::clone(&self.limiter),
        })
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflights are never rate limited
        if req.method() != Method::OPTIONS {
            let key = client_ip(&req);
            if !self.limiter.allow(&key) {
                debug!("Rate limit exceeded for {}", key);
                let retry_after = self.limiter.window().as_secs().to_string();
                let response = HttpResponse::TooManyRequests()
                    .insert_header((header::RETRY_AFTER, retry_after))
                    .json(json!({
                        "success": false,
                        "message": "Too many requests. Please try again later.",
                    }))
                    .map_into_right_body();
                let (request, _) = req.into_parts();
                return Box::pin(async move { Ok(ServiceResponse::new(request, response)) });
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
