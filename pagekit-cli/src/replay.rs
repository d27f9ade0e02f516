//! Session replay loop
//!
//! Steps run in order on one task. Submissions go out as soon as a step
//! produces them and complete concurrently; the page's virtual clock follows
//! wall time so feedback and redirect timers fire when a real visitor would
//! see them.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use pagekit_core::{EventResponse, NodeSpec, Page, PageSnapshot, SubmissionOutcome};
use pagekit_transport::{FormTransport, SubmissionReply};
use serde::Serialize;
use tokio::time::Instant;
use uuid::Uuid;

use crate::host::ConsoleHost;
use crate::script::Step;

type InFlight = BoxFuture<'static, (Uuid, pagekit_transport::Result<SubmissionReply>)>;

pub struct Session {
    page: Page,
    host: ConsoleHost,
    transport: Arc<dyn FormTransport>,
    in_flight: FuturesUnordered<InFlight>,
    outcomes: Vec<SubmissionOutcome>,
    blocked_submits: usize,
    steps: usize,
    /// Sleep through idle waits instead of only moving the virtual clock
    realtime: bool,
    /// Last instant the virtual clock was synced to
    clock: Instant,
}

/// Final state printed after a replay
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub finished_at: DateTime<Utc>,
    pub steps: usize,
    pub blocked_submits: usize,
    pub outcomes: Vec<SubmissionOutcome>,
    pub host: ConsoleHost,
    pub snapshot: PageSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<NodeSpec>,
}

impl Session {
    pub fn new(page: Page, transport: Arc<dyn FormTransport>, realtime: bool) -> Self {
        Self {
            page,
            host: ConsoleHost::default(),
            transport,
            in_flight: FuturesUnordered::new(),
            outcomes: Vec::new(),
            blocked_submits: 0,
            steps: 0,
            realtime,
            clock: Instant::now(),
        }
    }

    pub async fn run(&mut self, steps: &[Step]) -> Result<()> {
        for (index, step) in steps.iter().enumerate() {
            tracing::info!("[step {}] {}", index + 1, step.label());
            self.step(step)
                .await
                .with_context(|| format!("step {} ({}) failed", index + 1, step.label()))?;
            self.steps += 1;
        }
        Ok(())
    }

    async fn step(&mut self, step: &Step) -> Result<()> {
        self.sync_clock(Instant::now());
        match step {
            Step::Wait { ms } => self.wait(Duration::from_millis(*ms)).await?,
            Step::OpenModal { name } => {
                if !self.page.open_modal(name)? {
                    tracing::debug!("[replay] {name} already visible");
                }
            }
            Step::CloseModal { name } => {
                self.page.close_modal(name)?;
            }
            Step::CloseAll => self.page.close_all_modals(),
            _ => {
                if let Some(event) = step.to_event(&self.page)? {
                    let response = self.page.handle(event);
                    self.dispatch(response);
                }
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, response: EventResponse) {
        if response.invalid_fields > 0 {
            tracing::warn!("[replay] submit blocked, {} invalid field(s)", response.invalid_fields);
            self.blocked_submits += 1;
        }
        let Some(submission) = response.submission else {
            return;
        };
        tracing::info!(
            "[replay] sending {} to {} via {}",
            submission.id,
            submission.action,
            self.transport.id()
        );
        let transport = Arc::clone(&self.transport);
        self.in_flight.push(Box::pin(async move {
            let result = transport.submit(&submission).await;
            (submission.id, result)
        }));
    }

    /// Let `duration` pass, completing submissions as their replies arrive
    async fn wait(&mut self, duration: Duration) -> Result<()> {
        let deadline = self.clock + duration;
        loop {
            if self.in_flight.is_empty() {
                if self.realtime {
                    tokio::time::sleep_until(deadline).await;
                }
                self.sync_clock(deadline);
                return Ok(());
            }
            tokio::select! {
                Some((id, result)) = self.in_flight.next() => {
                    self.sync_clock(Instant::now().min(deadline));
                    self.complete(id, result);
                }
                () = tokio::time::sleep_until(deadline) => {
                    self.sync_clock(deadline);
                    return Ok(());
                }
            }
        }
    }

    /// Await every outstanding reply, then optionally run the remaining timers
    pub async fn finish(&mut self, settle: bool) {
        while let Some((id, result)) = self.in_flight.next().await {
            self.sync_clock(Instant::now());
            self.complete(id, result);
        }
        if !settle {
            return;
        }
        while let Some(due) = self.page.next_timer_in() {
            if self.realtime {
                tokio::time::sleep(due).await;
            }
            let ran = self.page.advance(due, &mut self.host);
            self.clock += due;
            tracing::debug!("[replay] settled {ran} timer(s)");
        }
    }

    fn complete(&mut self, id: Uuid, result: pagekit_transport::Result<SubmissionReply>) {
        match self.page.complete_submission(id, result, &mut self.host) {
            Ok(outcome) => {
                tracing::info!("[replay] {id} finished: success={}", outcome.is_success());
                self.outcomes.push(outcome);
            }
            Err(e) => tracing::warn!("[replay] {id} dropped: {e}"),
        }
    }

    /// Move the virtual clock up to `now`
    fn sync_clock(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.clock);
        if elapsed.is_zero() {
            return;
        }
        let ran = self.page.advance(elapsed, &mut self.host);
        if ran > 0 {
            tracing::debug!("[replay] {ran} timer(s) fired at {}ms", self.page.now_ms());
        }
        self.clock = now;
    }

    pub fn into_report(self, with_document: bool) -> Report {
        let document = with_document.then(|| {
            let doc = self.page.document();
            doc.to_spec(doc.body())
        });
        Report {
            finished_at: Utc::now(),
            steps: self.steps,
            blocked_submits: self.blocked_submits,
            outcomes: self.outcomes,
            host: self.host,
            snapshot: self.page.snapshot(),
            document,
        }
    }
}
