use crate::error::Result;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Called from the aggregation loop with (completed, total) distinct links.
pub type ProbeProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub concurrency: usize,
    pub probe_timeout: Duration,
    pub deadline: Duration,
    pub user_agent: String,
}

impl ProbeConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            deadline: DEFAULT_DEADLINE,
            user_agent: format!(
                "Pagelens/{} (https://github.com/trapdoorsec/pagelens)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

/// Checks links concurrently and counts the ones that fail.
pub struct ReachabilityProber {
    client: Client,
    config: ProbeConfig,
    progress_callback: Option<ProbeProgressCallback>,
}

impl ReachabilityProber {
    pub fn new(config: ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.probe_timeout)
            .connect_timeout(config.probe_timeout / 2)
            .pool_max_idle_per_host(config.concurrency)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            config,
            progress_callback: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProbeProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Probe every link and return how many are unreachable.
    ///
    /// Each distinct URL is fetched once; a failing URL counts once per
    /// occurrence in `links`. Returns when every probe has reported or the
    /// deadline passes, whichever comes first. Probes still pending at the
    /// deadline are aborted and counted as unreachable.
    pub async fn probe(&self, links: &[String]) -> usize {
        if links.is_empty() {
            return 0;
        }

        let (targets, occurrences) = distinct_targets(links);
        let total = targets.len();
        info!(
            "Probing {} distinct links ({} total) with {} workers",
            total,
            links.len(),
            self.config.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let (tx, mut rx) = mpsc::channel::<(usize, bool)>(total);
        let mut tasks = JoinSet::new();

        for (idx, url) in targets.into_iter().enumerate() {
            let client = self.client.clone();
            let semaphore = semaphore.clone();
            let tx = tx.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let reachable = probe_link(&client, &url).await;
                let _ = tx.send((idx, reachable)).await;
            });
        }
        // Channel closes once the last task finishes
        drop(tx);

        // An unrepresentable deadline means wait for every probe
        let deadline = Instant::now().checked_add(self.config.deadline);
        let mut reported = vec![false; total];
        let mut completed = 0;
        let mut inaccessible = 0;

        loop {
            let next = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, rx.recv()).await,
                None => Ok(rx.recv().await),
            };
            match next {
                Ok(Some((idx, reachable))) => {
                    reported[idx] = true;
                    completed += 1;
                    if !reachable {
                        inaccessible += occurrences[idx];
                    }
                    if let Some(ref callback) = self.progress_callback {
                        callback(completed, total);
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Probe deadline of {:?} reached with {} of {} links pending",
                        self.config.deadline,
                        total - completed,
                        total
                    );
                    break;
                }
            }
        }

        tasks.abort_all();

        // Aborted, timed out or crashed probes never reported
        let unreported: usize = reported
            .iter()
            .zip(&occurrences)
            .filter(|(done, _)| !**done)
            .map(|(_, count)| *count)
            .sum();
        inaccessible += unreported;

        info!(
            "Probing complete: {} of {} links inaccessible",
            inaccessible,
            links.len()
        );
        inaccessible
    }
}

/// Distinct URLs in first-seen order, with how often each occurs.
fn distinct_targets(links: &[String]) -> (Vec<String>, Vec<usize>) {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut targets = Vec::new();
    let mut occurrences = Vec::new();

    for link in links {
        match index.get(link.as_str()) {
            Some(&idx) => occurrences[idx] += 1,
            None => {
                index.insert(link.as_str(), targets.len());
                targets.push(link.clone());
                occurrences.push(1);
            }
        }
    }

    (targets, occurrences)
}

async fn probe_link(client: &Client, url: &str) -> bool {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                debug!("{} -> HTTP {}", url, status.as_u16());
            }
            status.is_success()
        }
        Err(e) => {
            debug!("{} -> {}", url, e);
            false
        }
    }
}
