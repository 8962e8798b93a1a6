//! Probe Scheduler
//!
//! Checks a username against every platform in a catalog:
//! - one task per platform, bounded by a global worker pool
//! - per-host request spacing (`rate_limit`)
//! - per-attempt timeout with exponential backoff on transient failures (`retry`)
//! - rule-driven verdicts, including soft-404 bodies (`classify`)
//! - one overall deadline; unfinished platforms are reported, never dropped

mod classify;
mod rate_limit;
mod retry;
mod transport;

pub use classify::classify;
pub use retry::BackoffPolicy;
pub use transport::{HttpResponse, ReqwestTransport, Transport};

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::catalog::{PlatformCatalog, PlatformDefinition};
use crate::errors::{PhoenixError, PhoenixResult, ProbeError};
use crate::models::{ProbeResult, Verdict};
use rate_limit::{HostGate, HostGates};

/// Longest username accepted, in bytes.
pub const MAX_USERNAME_LEN: usize = 256;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36 iPhoenix-OSINT/0.3";

/// Tuning for one scheduler.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Global bound on in-flight requests.
    pub workers: usize,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub max_body_bytes: usize,
    /// Deadline for the whole run.
    pub deadline: Duration,
    pub user_agent: String,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            workers: 10,
            request_timeout: Duration::from_secs(8),
            max_retries: 2,
            backoff_base: Duration::from_millis(500),
            max_body_bytes: 64 * 1024,
            deadline: Duration::from_secs(60),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProbeOptions {
    pub fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy {
            base: self.backoff_base,
            max_retries: self.max_retries,
        }
    }
}

/// Progress notifications for the terminal UI.
#[derive(Debug, Clone)]
pub enum ProbeEvent {
    Started(String),
    Finished { platform: String, verdict: Verdict },
}

/// Reject usernames no platform template can carry.
pub fn validate_username(username: &str) -> PhoenixResult<()> {
    if username.is_empty() {
        return Err(PhoenixError::validation("username is empty"));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(PhoenixError::validation(format!(
            "username is {} bytes, limit is {}",
            username.len(),
            MAX_USERNAME_LEN
        )));
    }
    // "." and ".." survive encoding and collapse the profile path
    if username.chars().all(|c| c == '.') {
        return Err(PhoenixError::validation(format!(
            "username {:?} would resolve to a parent path",
            username
        )));
    }
    if let Some(c) = username.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(PhoenixError::validation(format!(
            "username contains forbidden character {:?}",
            c
        )));
    }
    Ok(())
}

pub struct ProbeScheduler {
    transport: Arc<dyn Transport>,
    options: ProbeOptions,
    events: Option<mpsc::Sender<ProbeEvent>>,
}

impl ProbeScheduler {
    /// Scheduler over a real HTTP client.
    pub fn new(options: ProbeOptions) -> PhoenixResult<Self> {
        let transport = ReqwestTransport::new(&options.user_agent, options.request_timeout, options.max_body_bytes)?;
        Ok(Self::with_transport(Arc::new(transport), options))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, options: ProbeOptions) -> Self {
        Self {
            transport,
            options,
            events: None,
        }
    }

    pub fn with_events(mut self, events: mpsc::Sender<ProbeEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Probe `username` on every platform of `catalog`.
    ///
    /// Returns exactly one result per platform, in completion order. Only
    /// input validation and catalog problems are errors.
    pub async fn probe_username(&self, username: &str, catalog: &PlatformCatalog) -> PhoenixResult<Vec<ProbeResult>> {
        validate_username(username)?;
        let gates = HostGates::for_catalog(catalog)?;
        let run_started = Instant::now();
        let deadline = run_started.checked_add(self.options.deadline).ok_or_else(|| {
            PhoenixError::validation(format!("deadline of {:?} is out of range", self.options.deadline))
        })?;

        log::info!(
            "Probing '{}' on {} platforms ({} hosts, {} workers)",
            username,
            catalog.len(),
            gates.len(),
            self.options.workers
        );

        let pool = Arc::new(Semaphore::new(self.options.workers.max(1)));
        let (result_tx, mut result_rx) = mpsc::channel(catalog.len().max(1));
        let mut tasks = JoinSet::new();
        // catalog order, read back for platforms cut off by the deadline
        let mut attempt_counters = Vec::with_capacity(catalog.len());

        for platform in catalog.list_platforms() {
            let gate = gates
                .get(&platform.host()?)
                .ok_or_else(|| PhoenixError::catalog(format!("{}: no rate gate for host", platform.name)))?;
            let attempts = Arc::new(AtomicU32::new(0));
            attempt_counters.push(Arc::clone(&attempts));

            let probe = PlatformProbe {
                url: platform.render_url(username),
                platform: platform.clone(),
                gate,
                pool: Arc::clone(&pool),
                transport: Arc::clone(&self.transport),
                options: self.options.clone(),
                events: self.events.clone(),
                attempts,
            };
            let result_tx = result_tx.clone();
            tasks.spawn(async move {
                let result = probe.run().await;
                let _ = result_tx.send(result).await;
            });
        }
        drop(result_tx);

        let mut results = Vec::with_capacity(catalog.len());
        let mut deadline_hit = false;

        loop {
            match tokio::time::timeout_at(deadline, result_rx.recv()).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => break,
                Err(_) => {
                    log::warn!(
                        "Investigation deadline of {:?} elapsed with {} of {} platforms finished",
                        self.options.deadline,
                        results.len(),
                        catalog.len()
                    );
                    deadline_hit = true;
                    break;
                }
            }
        }

        tasks.abort_all();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    log::error!("Probe task panicked: {}", e);
                }
            }
        }
        while let Ok(result) = result_rx.try_recv() {
            results.push(result);
        }

        let finished: HashSet<String> = results.iter().map(|r| r.platform.clone()).collect();
        let cut_off_after = run_started.elapsed();
        for (platform, attempts) in catalog.list_platforms().iter().zip(&attempt_counters) {
            if finished.contains(&platform.name) {
                continue;
            }
            let error = if deadline_hit {
                ProbeError::DeadlineExceeded(self.options.deadline)
            } else {
                ProbeError::Missing
            };
            results.push(ProbeResult {
                elapsed: cut_off_after,
                attempts: attempts.load(Ordering::Relaxed),
                ..ProbeResult::unreachable(&platform.name, platform.render_url(username), error)
            });
        }

        log::info!("Probe run for '{}' finished with {} results", username, results.len());
        Ok(results)
    }
}

/// Everything one platform task needs; owns its clones, shares only the
/// pool, its host gate and the transport.
struct PlatformProbe {
    platform: PlatformDefinition,
    url: String,
    gate: Arc<HostGate>,
    pool: Arc<Semaphore>,
    transport: Arc<dyn Transport>,
    options: ProbeOptions,
    events: Option<mpsc::Sender<ProbeEvent>>,
    /// Attempts started so far, visible to the scheduler after an abort.
    attempts: Arc<AtomicU32>,
}

impl PlatformProbe {
    async fn run(self) -> ProbeResult {
        self.notify(ProbeEvent::Started(self.platform.name.clone()));

        let started = Instant::now();
        let backoff = self.options.backoff();
        let mut attempts = 0u32;

        let (verdict, http_status, error) = loop {
            attempts += 1;
            self.attempts.store(attempts, Ordering::Relaxed);

            let permit = match self.gate.acquire(&self.pool).await {
                Ok(permit) => permit,
                Err(e) => break (Verdict::Unreachable, None, Some(e)),
            };
            log::trace!("{}: attempt {} -> {}", self.platform.name, attempts, self.url);
            let outcome = match tokio::time::timeout(self.options.request_timeout, self.transport.get(&self.url)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ProbeError::Timeout(self.options.request_timeout)),
            };
            drop(permit);

            let (error, status) = match outcome {
                Ok(response) => match failure_status(response.status) {
                    None => {
                        let verdict = classify(&self.platform.detection_rule, &self.url, &response);
                        break (verdict, Some(response.status), None);
                    }
                    Some(error) => (error, Some(response.status)),
                },
                Err(error) => (error, None),
            };

            if !error.is_transient() || !backoff.allows_retry(attempts) {
                log::debug!("{}: giving up after {} attempt(s): {}", self.platform.name, attempts, error);
                break (Verdict::Unreachable, status, Some(error));
            }

            let delay = backoff.delay(attempts - 1);
            log::debug!(
                "{}: attempt {} failed ({}), retrying in {:?}",
                self.platform.name,
                attempts,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
        };

        self.notify(ProbeEvent::Finished {
            platform: self.platform.name.clone(),
            verdict,
        });

        ProbeResult {
            platform: self.platform.name,
            url: self.url,
            verdict,
            http_status,
            elapsed: started.elapsed(),
            attempts,
            error,
        }
    }

    fn notify(&self, event: ProbeEvent) {
        if let Some(events) = &self.events {
            let _ = events.try_send(event);
        }
    }
}

/// Statuses that mean "no usable answer yet" rather than a verdict.
fn failure_status(status: u16) -> Option<ProbeError> {
    match status {
        429 => Some(ProbeError::RateLimited(status)),
        500..=599 => Some(ProbeError::ServerStatus(status)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Aggregator;
    use crate::catalog::{DetectionRule, RateLimit};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[derive(Clone)]
    enum Step {
        Respond(u16, &'static str),
        Hang,
        Delay(Duration, u16),
    }

    /// Scripted transport: per-URL queue of steps, the last step repeats.
    #[derive(Default)]
    struct FakeTransport {
        scripts: Mutex<HashMap<String, VecDeque<Step>>>,
        calls: Mutex<Vec<(String, Instant)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeTransport {
        fn script(self, url: &str, steps: Vec<Step>) -> Self {
            self.scripts.lock().unwrap().insert(url.to_string(), steps.into());
            self
        }

        fn next_step(&self, url: &str) -> Step {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) => queue.front().cloned().unwrap(),
                None => Step::Respond(404, ""),
            }
        }

        fn calls_to(&self, url: &str) -> Vec<Instant> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(u, _)| u == url)
                .map(|(_, at)| *at)
                .collect()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse, ProbeError> {
            self.calls.lock().unwrap().push((url.to_string(), Instant::now()));
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            let step = self.next_step(url);
            let status = match step {
                Step::Respond(status, _) => status,
                Step::Hang => {
                    // Dropped by the scheduler's timeout; the counter is
                    // released by the guard below.
                    let _guard = InFlightGuard(&self.in_flight);
                    std::future::pending::<()>().await;
                    unreachable!()
                }
                Step::Delay(delay, status) => {
                    tokio::time::sleep(delay).await;
                    status
                }
            };
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let body = match step {
                Step::Respond(_, body) => body,
                _ => "",
            };
            Ok(HttpResponse {
                status,
                final_url: url.to_string(),
                body: Bytes::from_static(body.as_bytes()),
            })
        }
    }

    struct InFlightGuard<'a>(&'a AtomicUsize);

    impl Drop for InFlightGuard<'_> {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn status_platform(name: &str, template: &str) -> PlatformDefinition {
        PlatformDefinition {
            name: name.to_string(),
            url_template: template.to_string(),
            detection_rule: DetectionRule::StatusCode {
                found_status: 200,
                not_found_status: 404,
            },
            rate_limit: RateLimit::per_second(10),
        }
    }

    fn body_platform(name: &str, template: &str) -> PlatformDefinition {
        PlatformDefinition {
            name: name.to_string(),
            url_template: template.to_string(),
            detection_rule: DetectionRule::BodyPattern {
                not_found_markers: vec!["not found".to_string()],
                found_markers: vec![],
                found_status: 200,
                not_found_status: None,
                min_body_len: 0,
                not_found_url_markers: vec![],
            },
            rate_limit: RateLimit::per_second(10),
        }
    }

    fn scheduler(transport: Arc<FakeTransport>, options: ProbeOptions) -> ProbeScheduler {
        ProbeScheduler::with_transport(transport, options)
    }

    #[test]
    fn test_username_validation() {
        assert!(validate_username("testuser123").is_ok());
        assert!(validate_username("dot.and-dash_ok").is_ok());
        assert!(matches!(validate_username(""), Err(PhoenixError::Validation(_))));
        assert!(validate_username("two words").is_err());
        assert!(validate_username("tab\there").is_err());
        assert!(validate_username("bell\u{7}").is_err());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LEN + 1)).is_err());
        assert!(matches!(validate_username("."), Err(PhoenixError::Validation(_))));
        assert!(matches!(validate_username(".."), Err(PhoenixError::Validation(_))));
        assert!(validate_username("...").is_err());
        assert!(validate_username("a.").is_ok());
        assert!(validate_username(".hidden").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dot_username_never_reaches_site_root() {
        let transport = Arc::new(FakeTransport::default().script("https://github.example/", vec![Step::Respond(200, "")]));
        let catalog = PlatformCatalog::new(vec![status_platform("GitHub", "https://github.example/{username}")]).unwrap();

        for username in [".", ".."] {
            let err = scheduler(Arc::clone(&transport), ProbeOptions::default())
                .probe_username(username, &catalog)
                .await
                .unwrap_err();
            assert!(err.is_input_error());
        }
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failure_statuses() {
        assert_eq!(failure_status(429), Some(ProbeError::RateLimited(429)));
        assert_eq!(failure_status(502), Some(ProbeError::ServerStatus(502)));
        assert_eq!(failure_status(404), None);
        assert_eq!(failure_status(200), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_username_makes_no_requests() {
        let transport = Arc::new(FakeTransport::default());
        let catalog = PlatformCatalog::new(vec![status_platform("A", "https://a.example/{username}")]).unwrap();

        let err = scheduler(Arc::clone(&transport), ProbeOptions::default())
            .probe_username("bad user", &catalog)
            .await
            .unwrap_err();

        assert!(matches!(err, PhoenixError::Validation(_)));
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_platform_scenario() {
        let transport = Arc::new(
            FakeTransport::default()
                .script("https://a.example/testuser123", vec![Step::Respond(404, "")])
                .script(
                    "https://b.example/u/testuser123",
                    vec![Step::Respond(200, "<h1>Sorry, user Not Found</h1>")],
                )
                .script(
                    "https://c.example/testuser123",
                    vec![Step::Hang, Step::Hang, Step::Respond(200, "profile")],
                ),
        );
        let catalog = PlatformCatalog::new(vec![
            status_platform("A", "https://a.example/{username}"),
            body_platform("B", "https://b.example/u/{username}"),
            status_platform("C", "https://c.example/{username}"),
        ])
        .unwrap();

        let results = scheduler(Arc::clone(&transport), ProbeOptions::default())
            .probe_username("testuser123", &catalog)
            .await
            .unwrap();
        let report = Aggregator::new(&catalog).aggregate("testuser123", results).unwrap();

        let verdicts: Vec<_> = report.results.iter().map(|r| (r.platform.as_str(), r.verdict)).collect();
        assert_eq!(
            verdicts,
            vec![("A", Verdict::NotFound), ("B", Verdict::NotFound), ("C", Verdict::Found)]
        );
        assert_eq!(report.results[2].attempts, 3);
        assert!((report.overall_confidence - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_platform_is_unreachable_after_retries() {
        let transport = Arc::new(
            FakeTransport::default()
                .script("https://silent.example/someone", vec![Step::Hang])
                .script("https://alive.example/someone", vec![Step::Respond(200, "hi")]),
        );
        let catalog = PlatformCatalog::new(vec![
            status_platform("Silent", "https://silent.example/{username}"),
            status_platform("Alive", "https://alive.example/{username}"),
        ])
        .unwrap();

        let results = scheduler(Arc::clone(&transport), ProbeOptions::default())
            .probe_username("someone", &catalog)
            .await
            .unwrap();
        let report = Aggregator::new(&catalog).aggregate("someone", results).unwrap();

        let silent = &report.results[0];
        assert_eq!(silent.verdict, Verdict::Unreachable);
        assert_eq!(silent.attempts, 3);
        assert_eq!(silent.error, Some(ProbeError::Timeout(Duration::from_secs(8))));
        assert_eq!(transport.calls_to("https://silent.example/someone").len(), 3);
        assert_eq!(report.results[1].verdict, Verdict::Found);
        assert!((report.overall_confidence - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_errors_retry_then_unreachable() {
        let transport =
            Arc::new(FakeTransport::default().script("https://down.example/x", vec![Step::Respond(503, "")]));
        let catalog = PlatformCatalog::new(vec![status_platform("Down", "https://down.example/{username}")]).unwrap();

        let results = scheduler(Arc::clone(&transport), ProbeOptions::default())
            .probe_username("x", &catalog)
            .await
            .unwrap();

        assert_eq!(results[0].verdict, Verdict::Unreachable);
        assert_eq!(results[0].http_status, Some(503));
        assert_eq!(results[0].error, Some(ProbeError::ServerStatus(503)));
        assert_eq!(results[0].attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_errors_are_not_retried() {
        let transport =
            Arc::new(FakeTransport::default().script("https://strict.example/x", vec![Step::Respond(403, "")]));
        let catalog =
            PlatformCatalog::new(vec![status_platform("Strict", "https://strict.example/{username}")]).unwrap();

        let results = scheduler(Arc::clone(&transport), ProbeOptions::default())
            .probe_username("x", &catalog)
            .await
            .unwrap();

        assert_eq!(results[0].verdict, Verdict::Ambiguous);
        assert_eq!(results[0].attempts, 1);
        assert_eq!(transport.calls_to("https://strict.example/x").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_worker_bound() {
        let mut transport = FakeTransport::default();
        let mut platforms = Vec::new();
        for i in 0..25 {
            let template = format!("https://p{}.example/{{username}}", i);
            transport = transport.script(
                &format!("https://p{}.example/crowd", i),
                vec![Step::Delay(Duration::from_millis(100), 200)],
            );
            platforms.push(status_platform(&format!("P{}", i), &template));
        }
        let transport = Arc::new(transport);
        let catalog = PlatformCatalog::new(platforms).unwrap();
        let options = ProbeOptions {
            workers: 3,
            ..ProbeOptions::default()
        };

        let results = scheduler(Arc::clone(&transport), options)
            .probe_username("crowd", &catalog)
            .await
            .unwrap();

        assert_eq!(results.len(), 25);
        assert!(results.iter().all(|r| r.verdict == Verdict::Found));
        let peak = transport.max_in_flight.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency {} exceeded the pool", peak);
        assert!(peak >= 2, "requests never overlapped");
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_host_rate_limit() {
        let transport = Arc::new(FakeTransport::default());
        let mut platforms = Vec::new();
        for i in 0..4 {
            let mut platform = status_platform(&format!("S{}", i), &format!("https://shared.example/{}/{{username}}", i));
            platform.rate_limit = RateLimit {
                requests: 2,
                per: Duration::from_secs(1),
            };
            platforms.push(platform);
        }
        platforms.push(status_platform("Other", "https://other.example/{username}"));
        let catalog = PlatformCatalog::new(platforms).unwrap();

        let results = scheduler(Arc::clone(&transport), ProbeOptions::default())
            .probe_username("limited", &catalog)
            .await
            .unwrap();
        assert_eq!(results.len(), 5);

        let mut shared: Vec<Instant> = transport
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(url, _)| url.starts_with("https://shared.example/"))
            .map(|(_, at)| *at)
            .collect();
        shared.sort();
        assert_eq!(shared.len(), 4);
        for pair in shared.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(500));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_reports_unfinished_platforms() {
        let transport = Arc::new(
            FakeTransport::default()
                .script("https://slow.example/late", vec![Step::Hang])
                .script("https://fast.example/late", vec![Step::Respond(200, "")]),
        );
        let catalog = PlatformCatalog::new(vec![
            status_platform("Slow", "https://slow.example/{username}"),
            status_platform("Fast", "https://fast.example/{username}"),
        ])
        .unwrap();
        let options = ProbeOptions {
            deadline: Duration::from_secs(5),
            ..ProbeOptions::default()
        };

        let results = scheduler(Arc::clone(&transport), options)
            .probe_username("late", &catalog)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        let slow = results.iter().find(|r| r.platform == "Slow").unwrap();
        assert_eq!(slow.verdict, Verdict::Unreachable);
        assert_eq!(slow.error, Some(ProbeError::DeadlineExceeded(Duration::from_secs(5))));
        // the first 8 s attempt was still in flight when the run was cut off
        assert_eq!(slow.attempts, 1);
        assert!(slow.elapsed >= Duration::from_secs(5), "elapsed {:?}", slow.elapsed);
        let fast = results.iter().find(|r| r.platform == "Fast").unwrap();
        assert_eq!(fast.verdict, Verdict::Found);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_deadline_is_rejected() {
        let transport = Arc::new(FakeTransport::default());
        let catalog = PlatformCatalog::new(vec![status_platform("A", "https://a.example/{username}")]).unwrap();
        let options = ProbeOptions {
            deadline: Duration::MAX,
            ..ProbeOptions::default()
        };

        let err = scheduler(Arc::clone(&transport), options)
            .probe_username("someone", &catalog)
            .await
            .unwrap_err();

        assert!(matches!(err, PhoenixError::Validation(_)));
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_events() {
        let transport = Arc::new(FakeTransport::default());
        let catalog = PlatformCatalog::new(vec![status_platform("A", "https://a.example/{username}")]).unwrap();
        let (tx, mut rx) = mpsc::channel(8);

        scheduler(transport, ProbeOptions::default())
            .with_events(tx)
            .probe_username("someone", &catalog)
            .await
            .unwrap();

        assert!(matches!(rx.recv().await, Some(ProbeEvent::Started(name)) if name == "A"));
        assert!(matches!(
            rx.recv().await,
            Some(ProbeEvent::Finished { verdict: Verdict::NotFound, .. })
        ));
    }
}
