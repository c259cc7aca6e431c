// Polling service - Refreshes the remote status at the configured cadence
use crate::application::status_source::{ServerStatus, StatusSource};
use crate::domain::settings::Settings;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    pub last_status: Option<ServerStatus>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    pub polls: u64,
}

impl PollState {
    pub fn is_reachable(&self) -> bool {
        self.consecutive_failures == 0 && self.last_status.is_some()
    }
}

#[derive(Clone)]
pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    interval: Duration,
    state: Arc<RwLock<PollState>>,
}

impl StatusPoller {
    pub fn new(source: Arc<dyn StatusSource>, settings: &Settings) -> Self {
        Self {
            source,
            interval: settings.timing.update_interval(),
            state: Arc::new(RwLock::new(PollState::default())),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn state(&self) -> PollState {
        self.state.read().await.clone()
    }

    pub async fn poll_once(&self) -> PollState {
        let result = self.source.fetch_status().await;
        let mut state = self.state.write().await;
        state.polls += 1;

        match result {
            Ok(status) if status.is_success() => {
                tracing::debug!(
                    "Status poll ok: HTTP {} in {} ms",
                    status.http_status,
                    status.elapsed.as_millis()
                );
                state.consecutive_failures = 0;
                state.last_error = None;
                state.last_status = Some(status);
            }
            Ok(status) => {
                tracing::warn!("Status server answered HTTP {}", status.http_status);
                state.consecutive_failures += 1;
                state.last_error = Some(format!("HTTP {}", status.http_status));
                state.last_status = Some(status);
            }
            Err(e) => {
                tracing::warn!("Status poll failed: {:#}", e);
                state.consecutive_failures += 1;
                state.last_error = Some(e.to_string());
            }
        }

        state.clone()
    }

    /// Poll immediately, then once per interval until `shutdown` turns true
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Status poller stopping");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedSource {
        responses: Mutex<Vec<anyhow::Result<ServerStatus>>>,
    }

    impl ScriptedSource {
        fn new(mut responses: Vec<anyhow::Result<ServerStatus>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch_status(&self) -> anyhow::Result<ServerStatus> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
        }
    }

    fn status(code: u16) -> ServerStatus {
        ServerStatus {
            http_status: code,
            body_len: 42,
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_interval_comes_from_settings() {
        let mut settings = Settings::default();
        settings.timing.update_interval_secs = 7;
        let poller = StatusPoller::new(Arc::new(ScriptedSource::new(vec![])), &settings);
        assert_eq!(poller.interval(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_failures_are_counted_and_reset() {
        let source = ScriptedSource::new(vec![
            Err(anyhow::anyhow!("connection refused")),
            Ok(status(401)),
            Ok(status(200)),
        ]);
        let poller = StatusPoller::new(Arc::new(source), &Settings::default());

        let state = poller.poll_once().await;
        assert_eq!(state.consecutive_failures, 1);
        assert_eq!(state.last_error.as_deref(), Some("connection refused"));
        assert!(!state.is_reachable());

        let state = poller.poll_once().await;
        assert_eq!(state.consecutive_failures, 2);
        assert_eq!(state.last_error.as_deref(), Some("HTTP 401"));

        let state = poller.poll_once().await;
        assert_eq!(state.consecutive_failures, 0);
        assert_eq!(state.polls, 3);
        assert!(state.is_reachable());
        assert_eq!(poller.state().await, state);
    }

    #[tokio::test]
    async fn test_run_polls_immediately_and_stops_on_shutdown() {
        let source = ScriptedSource::new(vec![Ok(status(200))]);
        let poller = StatusPoller::new(Arc::new(source), &Settings::default());
        let (tx, rx) = watch::channel(false);

        let task = {
            let poller = poller.clone();
            tokio::spawn(async move { poller.run(rx).await })
        };

        // First tick fires at once, the next only after 30 s
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(poller.state().await.polls, 1);
    }
}
