//! REST pipeline for the Binance USDT-M futures API (C3, §4.3).
//!
//! [`RestClient`] wraps a pooled [`reqwest::Client`], layering the
//! additional invariants §4.3 demands on top: a FIFO of pending requests
//! with **at most one in flight at a time**, a per-request 15-second
//! deadline, a local sliding-window rate-limit gate, and an idle
//! keep-alive ping. `reqwest`'s own connection pool already gives us
//! keep-alive reuse, cached DNS resolution and transparent reconnect after
//! a `Connection: close` response, so those pieces of §4.3 are delegated to
//! it rather than re-implemented by hand (see `DESIGN.md`).
//!
//! Single-in-flight FIFO ordering is achieved with a dedicated dispatcher
//! task reading off one `mpsc` channel: because the channel has exactly one
//! consumer, jobs are necessarily served in send order and necessarily one
//! at a time — the channel itself is the queue described in §3.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, Notify, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::args::ArgList;
use crate::constants::{self, REST_BASE_URL};
use crate::credentials::Credentials;
use crate::error::{ApiErrorBody, Error, Result};
use crate::security::SecurityClass;
use crate::signing::sign;
use crate::types::user::ListenKeyResponse;

/// Whether a request's canonical arguments travel in the URL query string
/// or in a form-encoded request body (§4.1 "Body vs URL").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyShape {
    Query,
    Form,
}

struct DispatchJob {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<String>,
    reply: oneshot::Sender<Result<bytes::Bytes>>,
}

/// Local sliding-window rate-limit gate (§4.3 "Rate limit"). Advisory only —
/// it does not consult exchange-returned `Retry-After` or weight headers
/// (§9 open question; see `DESIGN.md`).
struct RateLimiter {
    limit: usize,
    count: Mutex<usize>,
    notify: Notify,
}

impl RateLimiter {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            count: Mutex::new(0),
            notify: Notify::new(),
        }
    }

    async fn acquire(&self) {
        if self.limit == 0 {
            return;
        }
        loop {
            {
                let mut count = self.count.lock().await;
                if *count < self.limit {
                    *count += 1;
                    return;
                }
            }
            self.notify.notified().await;
        }
    }

    async fn reset(&self) {
        *self.count.lock().await = 0;
        self.notify.notify_waiters();
    }
}

/// REST pipeline over the USDT-M futures API.
///
/// Cloning a `RestClient` is cheap: every clone shares the same dispatcher
/// task, rate limiter and credential set.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    dispatch_tx: mpsc::Sender<DispatchJob>,
    closed: Arc<AtomicBool>,
    last_activity: Arc<Mutex<Instant>>,
    background: Arc<BackgroundTasks>,
}

struct BackgroundTasks {
    dispatcher: JoinHandle<()>,
    keepalive: JoinHandle<()>,
    rate_resetter: JoinHandle<()>,
    listen_key_renewal: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for BackgroundTasks {
    fn drop(&mut self) {
        self.dispatcher.abort();
        self.keepalive.abort();
        self.rate_resetter.abort();
        if let Ok(mut guard) = self.listen_key_renewal.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

impl RestClient {
    /// Construct a client against the default USDT-M futures base URL, with
    /// no rate limit enforced locally (`limit = 0`).
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url_and_rate_limit(credentials, REST_BASE_URL, 0)
    }

    /// Construct a client with an explicit request-per-window rate limit
    /// (§4.3, §8 scenario 5). `limit = 0` disables the gate.
    pub fn with_rate_limit(credentials: Credentials, limit: usize) -> Self {
        Self::with_base_url_and_rate_limit(credentials, REST_BASE_URL, limit)
    }

    /// Construct a client pointing at a custom base URL (e.g. the testnet),
    /// useful for integration tests.
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Self {
        Self::with_base_url_and_rate_limit(credentials, base_url, 0)
    }

    fn with_base_url_and_rate_limit(credentials: Credentials, base_url: impl Into<String>, limit: usize) -> Self {
        let http = reqwest::Client::builder()
            .build()
            .expect("failed to build reqwest client");

        let (dispatch_tx, dispatch_rx) = mpsc::channel(256);
        let rate_limiter = Arc::new(RateLimiter::new(limit));
        let closed = Arc::new(AtomicBool::new(false));
        let last_activity = Arc::new(Mutex::new(Instant::now()));

        let dispatcher = tokio::spawn(dispatcher_loop(
            http.clone(),
            dispatch_rx,
            rate_limiter.clone(),
            closed.clone(),
            last_activity.clone(),
        ));

        let rate_resetter = tokio::spawn({
            let rate_limiter = rate_limiter.clone();
            let window = Duration::from_secs(constants::DEFAULT_RATE_WINDOW_SECS);
            async move {
                let mut interval = tokio::time::interval(window);
                loop {
                    interval.tick().await;
                    rate_limiter.reset().await;
                }
            }
        });

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            credentials,
            dispatch_tx: dispatch_tx.clone(),
            closed: closed.clone(),
            last_activity: last_activity.clone(),
            background: Arc::new(BackgroundTasks {
                dispatcher,
                keepalive: tokio::spawn(keepalive_loop(dispatch_tx, last_activity, closed)),
                rate_resetter,
                listen_key_renewal: Mutex::new(None),
            }),
        }
    }

    /// `true` once the pipeline has transitioned to "closed" after an
    /// unrecoverable transport error or a per-request timeout (§3, §4.3).
    /// The caller must construct a new `RestClient` to resume.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // -----------------------------------------------------------------------
    // Generic typed dispatch (§4.3 "Typed dispatch")
    // -----------------------------------------------------------------------

    /// `GET`, with arguments canonicalised into the URL query string.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, args: ArgList, class: SecurityClass) -> Result<T> {
        let bytes = self.dispatch(Method::GET, path, args, class, BodyShape::Query).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `DELETE`, with arguments canonicalised into the URL query string.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, args: ArgList, class: SecurityClass) -> Result<T> {
        let bytes = self.dispatch(Method::DELETE, path, args, class, BodyShape::Query).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `POST`, with arguments canonicalised into a form-encoded request body.
    pub async fn post<T: DeserializeOwned>(&self, path: &str, args: ArgList, class: SecurityClass) -> Result<T> {
        let bytes = self.dispatch(Method::POST, path, args, class, BodyShape::Form).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `PUT`, with arguments canonicalised into a form-encoded request body.
    pub async fn put<T: DeserializeOwned>(&self, path: &str, args: ArgList, class: SecurityClass) -> Result<T> {
        let bytes = self.dispatch(Method::PUT, path, args, class, BodyShape::Form).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    // -----------------------------------------------------------------------
    // Listen-key lifecycle (C5, §3, §4.3)
    // -----------------------------------------------------------------------

    /// `POST /fapi/v1/listenKey` (USER_STREAM, no signature — §6.1).
    pub async fn create_listen_key(&self) -> Result<String> {
        let resp: ListenKeyResponse = self
            .post(constants::PATH_LISTEN_KEY, ArgList::new(), SecurityClass::UserStream)
            .await?;
        Ok(resp.listen_key)
    }

    /// `PUT /fapi/v1/listenKey` (USER_DATA-signed, empty args besides
    /// `timestamp` — §4.3 "Listen-key renewal"). Returns once, callers drive
    /// the 59-minute cadence themselves or via [`RestClient::spawn_listen_key_renewal`].
    pub async fn renew_listen_key(&self) -> Result<()> {
        let mut args = ArgList::new();
        args.insert("timestamp", now_millis());
        let _: serde_json::Value = self.put(constants::PATH_LISTEN_KEY, args, SecurityClass::UserData).await?;
        Ok(())
    }

    /// Install a self-rescheduling timer that renews the listen key every
    /// [`constants::LISTEN_KEY_RENEW_SECS`] (§3, §4.3, §8 "Listen-key
    /// renewal"). Replaces any previously installed renewal timer; the timer
    /// is cancelled when `self` (and every clone sharing its background
    /// tasks) is dropped.
    pub async fn spawn_listen_key_renewal(&self) {
        let client = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(constants::LISTEN_KEY_RENEW_SECS));
            interval.tick().await; // first tick fires immediately; skip it
            loop {
                interval.tick().await;
                if let Err(err) = client.renew_listen_key().await {
                    tracing::warn!(?err, "listen key renewal failed");
                }
            }
        });
        let mut guard = self.background.listen_key_renewal.lock().await;
        if let Some(old) = guard.replace(handle) {
            old.abort();
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        mut args: ArgList,
        class: SecurityClass,
        body_shape: BodyShape,
    ) -> Result<bytes::Bytes> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::Closed);
        }

        if class.needs_api_key() && !self.credentials.is_present() {
            return Err(Error::MissingCredentials);
        }

        // Path-vs-query split (§4.1): pull out empty-keyed path-segment args.
        let mut full_path = path.to_owned();
        let segments: Vec<String> = args
            .path_segments()
            .map(|v| match v {
                crate::args::ArgValue::Str(s) => s.clone(),
                other => format!("{other:?}"),
            })
            .collect();
        for segment in &segments {
            full_path.push('/');
            full_path.push_str(segment);
        }
        let mut query_only = ArgList::new();
        for (k, v) in args.query_pairs() {
            query_only.insert(k.to_owned(), v.clone());
        }
        args = query_only;

        let mut canonical = args.canonical();
        if class.needs_signature() {
            let signature = sign(self.credentials.secret(), &canonical);
            if canonical.is_empty() {
                canonical = format!("signature={signature}");
            } else {
                canonical.push_str("&signature=");
                canonical.push_str(&signature);
            }
        }

        let mut headers = HeaderMap::new();
        if class.needs_api_key() {
            headers.insert(
                "X-MBX-APIKEY",
                HeaderValue::from_str(self.credentials.key()).map_err(|_| {
                    Error::InvalidArgument("API key contains invalid header characters".into())
                })?,
            );
        }

        let (url, body) = match body_shape {
            BodyShape::Query => {
                let url = if canonical.is_empty() {
                    format!("{}{}", self.base_url, full_path)
                } else {
                    format!("{}{}?{}", self.base_url, full_path, canonical)
                };
                (url, None)
            }
            BodyShape::Form => {
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                );
                (format!("{}{}", self.base_url, full_path), Some(canonical))
            }
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        let job = DispatchJob {
            method,
            url,
            headers,
            body,
            reply: reply_tx,
        };

        *self.last_activity.lock().await = Instant::now();

        self.dispatch_tx.send(job).await.map_err(|_| Error::Closed)?;
        reply_rx.await.map_err(|_| Error::Closed)?
    }
}

async fn dispatcher_loop(
    http: reqwest::Client,
    mut rx: mpsc::Receiver<DispatchJob>,
    rate_limiter: Arc<RateLimiter>,
    closed: Arc<AtomicBool>,
    last_activity: Arc<Mutex<Instant>>,
) {
    while let Some(job) = rx.recv().await {
        if closed.load(Ordering::SeqCst) {
            // Pipeline already closed; the caller observes this as a dropped
            // reply (§3 "head's callback is not invoked").
            continue;
        }

        rate_limiter.acquire().await;
        *last_activity.lock().await = Instant::now();

        let mut builder = http.request(job.method, &job.url).headers(job.headers);
        if let Some(body) = job.body {
            builder = builder.body(body);
        }

        let timeout = Duration::from_secs(constants::REQUEST_TIMEOUT_SECS);
        match tokio::time::timeout(timeout, builder.send()).await {
            Err(_elapsed) => {
                // §4.3 "Dispatch": timeout cancels the in-flight request and
                // closes the pipeline; the callback is not invoked.
                closed.store(true, Ordering::SeqCst);
                drop(job.reply);
            }
            Ok(Err(transport_err)) => {
                // §7(a): transport errors are always fatal to the connection.
                closed.store(true, Ordering::SeqCst);
                let _ = job.reply.send(Err(Error::Http(transport_err)));
            }
            Ok(Ok(response)) => {
                let result = read_response(response).await;
                let _ = job.reply.send(result);
            }
        }
    }
}

async fn read_response(response: reqwest::Response) -> Result<bytes::Bytes> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        // §7(b): protocol errors abort the in-flight request but do not
        // close the pipeline.
        let body_text = String::from_utf8_lossy(&bytes).into_owned();
        if let Ok(api_err) = serde_json::from_str::<ApiErrorBody>(&body_text) {
            if api_err.code != 0 {
                return Err(Error::Api(api_err));
            }
        }
        return Err(Error::HttpStatus { status, body: body_text });
    }

    // A 200 response whose JSON body carries a non-zero `code` field is
    // still a protocol error (§4.3 "On read completion").
    if let Ok(probe) = serde_json::from_slice::<ApiErrorBody>(&bytes) {
        if probe.code != 0 {
            return Err(Error::Api(probe));
        }
    }

    Ok(bytes)
}

async fn keepalive_loop(tx: mpsc::Sender<DispatchJob>, last_activity: Arc<Mutex<Instant>>, closed: Arc<AtomicBool>) {
    let interval_dur = Duration::from_secs(constants::KEEPALIVE_PING_SECS);
    let mut interval = tokio::time::interval(interval_dur);
    loop {
        interval.tick().await;
        if closed.load(Ordering::SeqCst) {
            return;
        }
        let idle_for = last_activity.lock().await.elapsed();
        if idle_for < interval_dur {
            continue; // a write is effectively in progress; reschedule (§4.3).
        }
        let (reply_tx, _reply_rx) = oneshot::channel();
        let job = DispatchJob {
            method: Method::GET,
            url: format!("{REST_BASE_URL}{}", constants::PATH_PING),
            headers: HeaderMap::new(),
            body: None,
            reply: reply_tx,
        };
        let _ = tx.send(job).await;
    }
}

pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// §8 Scenario 5: R1/R2 dispatch immediately against a limit of 2; R3
    /// holds until a 1s window elapses and the limiter resets.
    #[tokio::test]
    async fn rate_limiter_admits_up_to_limit_then_blocks_until_reset() {
        tokio::time::pause();
        let limiter = Arc::new(RateLimiter::new(2));

        limiter.acquire().await;
        limiter.acquire().await;

        let blocked = {
            let limiter = limiter.clone();
            tokio::spawn(async move {
                limiter.acquire().await;
            })
        };

        // Advancing short of the window must leave R3 pending.
        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(!blocked.is_finished());

        // Advancing past the 1s window, then resetting (as the background
        // reset timer would), unblocks R3.
        tokio::time::advance(Duration::from_millis(600)).await;
        limiter.reset().await;
        tokio::time::timeout(Duration::from_secs(1), blocked)
            .await
            .expect("R3 should unblock once the window resets")
            .expect("acquire task panicked");
    }

    #[tokio::test]
    async fn rate_limiter_with_zero_limit_never_blocks() {
        let limiter = RateLimiter::new(0);
        for _ in 0..100 {
            limiter.acquire().await;
        }
    }
}
