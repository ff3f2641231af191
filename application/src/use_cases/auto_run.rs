//! Auto Run use case
//!
//! Drives a self-sustaining automatic conversation:
//!
//! ```text
//! Idle ─▶ AwaitingDecision ─▶ Generating ─▶ Pacing ─┐
//!              ▲                                    │
//!              └────────────────────────────────────┘
//!   any state ─▶ Stopped (end, cancel, ceiling, budget, failure)
//! ```
//!
//! One loop runs per conversation at most. Every pass re-reads the
//! conversation through the [`ConversationSource`], so mode, speed or roster
//! changes take effect on the next turn. Cancellation is cooperative: it is
//! observed before and during the pacing delay and before every decision,
//! but an in-flight generation is never interrupted.

use crate::config::AutoRunParams;
use crate::ports::auto_run_observer::{AutoRunObserver, NoAutoRunObserver};
use crate::ports::budget_oracle::BudgetOracle;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::conversation_source::ConversationSource;
use crate::ports::response_generator::{ResponseGenerator, StreamChunk};
use crate::use_cases::determine_speaker::{OrchestrationService, TurnRequest};
use chorus_domain::{ConversationId, PacingSpeed, StopReason, TurnDecision};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// States of one auto-run loop.
#[derive(Debug)]
enum AutoRunState {
    Idle,
    AwaitingDecision,
    Generating {
        decision: TurnDecision,
        speed: PacingSpeed,
    },
    Pacing(Duration),
    Stopped(StopReason),
}

/// Terminal report of an auto-run loop.
#[derive(Debug, Clone)]
pub struct AutoRunReport {
    pub conversation_id: ConversationId,
    pub messages_generated: usize,
    /// Every decision taken, in order.
    pub decisions: Vec<TurnDecision>,
    pub stop_reason: StopReason,
}

impl AutoRunReport {
    fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            messages_generated: 0,
            decisions: Vec::new(),
            stop_reason: StopReason::Aborted,
        }
    }
}

type RunRegistry = Arc<Mutex<HashMap<ConversationId, RunEntry>>>;

/// Handle to a running loop.
pub struct AutoRunHandle {
    conversation_id: ConversationId,
    token: CancellationToken,
    join: JoinHandle<AutoRunReport>,
}

impl AutoRunHandle {
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Request cancellation. The loop stops at its next checkpoint.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the loop to stop.
    ///
    /// A loop task that panicked reports [`StopReason::Aborted`].
    pub async fn wait(self) -> AutoRunReport {
        match self.join.await {
            Ok(report) => report,
            Err(e) => {
                warn!("Auto-run task for {} ended abnormally: {}", self.conversation_id, e);
                AutoRunReport::new(self.conversation_id)
            }
        }
    }
}

struct RunEntry {
    run_id: u64,
    token: CancellationToken,
}

/// Registration of one loop, removed from the registry when the loop task
/// ends, however it ends. Dropping the [`AutoRunHandle`] does not matter.
struct RunGuard {
    runs: RunRegistry,
    conversation_id: ConversationId,
    run_id: u64,
}

impl RunGuard {
    /// Remove the entry if it is still ours. Idempotent.
    fn release(&self) {
        let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        if runs
            .get(&self.conversation_id)
            .is_some_and(|entry| entry.run_id == self.run_id)
        {
            runs.remove(&self.conversation_id);
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Use case owning every automatic loop of an engine instance
#[derive(Clone)]
pub struct AutoRunner {
    orchestrator: Arc<OrchestrationService>,
    source: Arc<dyn ConversationSource>,
    generator: Arc<dyn ResponseGenerator>,
    budget: Arc<dyn BudgetOracle>,
    observer: Arc<dyn AutoRunObserver>,
    logger: Arc<dyn ConversationLogger>,
    params: AutoRunParams,
    runs: RunRegistry,
    next_run_id: Arc<AtomicU64>,
}

impl AutoRunner {
    pub fn new(
        orchestrator: Arc<OrchestrationService>,
        source: Arc<dyn ConversationSource>,
        generator: Arc<dyn ResponseGenerator>,
        budget: Arc<dyn BudgetOracle>,
    ) -> Self {
        Self {
            orchestrator,
            source,
            generator,
            budget,
            observer: Arc::new(NoAutoRunObserver),
            logger: Arc::new(NoConversationLogger),
            params: AutoRunParams::default(),
            runs: Arc::new(Mutex::new(HashMap::new())),
            next_run_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn with_params(mut self, params: AutoRunParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn AutoRunObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    fn runs(&self) -> std::sync::MutexGuard<'_, HashMap<ConversationId, RunEntry>> {
        self.runs.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ==================== Control ====================

    /// Start the loop for a conversation.
    ///
    /// Returns `None` when a loop is already running for it. Must be called
    /// from within a tokio runtime.
    pub fn start_auto_run(
        &self,
        conversation_id: &ConversationId,
        sink: Option<mpsc::Sender<StreamChunk>>,
    ) -> Option<AutoRunHandle> {
        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        {
            let mut runs = self.runs();
            if runs.contains_key(conversation_id) {
                debug!("Auto-run already active for {}", conversation_id);
                return None;
            }
            runs.insert(
                conversation_id.clone(),
                RunEntry {
                    run_id,
                    token: token.clone(),
                },
            );
        }

        info!("Starting auto-run {} for {}", run_id, conversation_id);
        self.logger
            .log(ConversationEvent::auto_run_started(conversation_id, run_id));

        let guard = RunGuard {
            runs: self.runs.clone(),
            conversation_id: conversation_id.clone(),
            run_id,
        };
        let runner = self.clone();
        let id = conversation_id.clone();
        let loop_token = token.clone();
        let join =
            tokio::spawn(async move { runner.run(id, run_id, loop_token, sink, guard).await });

        Some(AutoRunHandle {
            conversation_id: conversation_id.clone(),
            token,
            join,
        })
    }

    /// Cancel a running loop. Returns `false` if none was running.
    pub fn cancel_auto_run(&self, conversation_id: &ConversationId) -> bool {
        match self.runs().get(conversation_id) {
            Some(entry) => {
                info!("Cancelling auto-run {} for {}", entry.run_id, conversation_id);
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every running loop, returning how many were signalled.
    pub fn cancel_all(&self) -> usize {
        let runs = self.runs();
        for entry in runs.values() {
            entry.token.cancel();
        }
        runs.len()
    }

    pub fn is_running(&self, conversation_id: &ConversationId) -> bool {
        self.runs().contains_key(conversation_id)
    }

    // ==================== Loop ====================

    async fn run(
        self,
        conversation_id: ConversationId,
        run_id: u64,
        token: CancellationToken,
        sink: Option<mpsc::Sender<StreamChunk>>,
        guard: RunGuard,
    ) -> AutoRunReport {
        let mut report = AutoRunReport::new(conversation_id.clone());
        let mut state = AutoRunState::Idle;

        let reason = loop {
            state = match state {
                AutoRunState::Idle => AutoRunState::AwaitingDecision,
                AutoRunState::AwaitingDecision => {
                    self.await_decision(&conversation_id, &token, &mut report)
                        .await
                }
                AutoRunState::Generating { decision, speed } => {
                    self.generate(&conversation_id, decision, speed, &sink, &mut report)
                        .await
                }
                AutoRunState::Pacing(delay) => pace(delay, &token).await,
                AutoRunState::Stopped(reason) => break reason,
            };
        };

        self.finish(&conversation_id, &guard, &reason);
        info!(
            "Auto-run {} for {} stopped after {} message(s): {}",
            run_id, conversation_id, report.messages_generated, reason
        );
        self.logger.log(ConversationEvent::auto_run_stopped(
            &conversation_id,
            run_id,
            report.messages_generated,
            &reason,
        ));
        self.observer.on_stopped(&conversation_id, &reason);

        report.stop_reason = reason;
        report
    }

    async fn await_decision(
        &self,
        conversation_id: &ConversationId,
        token: &CancellationToken,
        report: &mut AutoRunReport,
    ) -> AutoRunState {
        if token.is_cancelled() {
            return AutoRunState::Stopped(StopReason::Cancelled);
        }

        let snapshot = match self.source.snapshot(conversation_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Loading conversation {} failed: {}", conversation_id, e);
                return AutoRunState::Stopped(StopReason::SourceFailed(e.to_string()));
            }
        };

        if !snapshot.is_active {
            return AutoRunState::Stopped(StopReason::ConversationEnded);
        }
        if !snapshot.mode.is_auto() {
            return AutoRunState::Stopped(StopReason::NotAutoMode);
        }
        let ceiling = self.params.message_ceiling;
        if snapshot.messages.len() >= ceiling || report.messages_generated >= ceiling {
            return AutoRunState::Stopped(StopReason::CeilingReached);
        }

        match self
            .budget
            .check_budget(&snapshot.user_id, self.params.estimated_turn_cost)
            .await
        {
            Ok(verdict) if verdict.allowed => {}
            Ok(verdict) => {
                info!(
                    "Budget denied next turn of {}: {}",
                    conversation_id,
                    verdict.reason.as_deref().unwrap_or("no reason given")
                );
                return AutoRunState::Stopped(StopReason::BudgetDenied(verdict.reason));
            }
            Err(e) => {
                warn!("Budget check for {} failed: {}", conversation_id, e);
                return AutoRunState::Stopped(StopReason::BudgetCheckFailed(e.to_string()));
            }
        }

        let speed = snapshot.speed.unwrap_or(self.params.default_speed);
        let request = TurnRequest::from_snapshot(
            conversation_id.clone(),
            snapshot,
            self.params.default_strategy,
        );

        match self.orchestrator.determine_speaker(&request).await {
            Ok(Some(decision)) => {
                self.observer.on_decision(conversation_id, &decision);
                report.decisions.push(decision.clone());
                AutoRunState::Generating { decision, speed }
            }
            Ok(None) => AutoRunState::Stopped(StopReason::NoDecision),
            Err(e) => AutoRunState::Stopped(StopReason::DecisionFailed(e.to_string())),
        }
    }

    async fn generate(
        &self,
        conversation_id: &ConversationId,
        decision: TurnDecision,
        speed: PacingSpeed,
        sink: &Option<mpsc::Sender<StreamChunk>>,
        report: &mut AutoRunReport,
    ) -> AutoRunState {
        match self
            .generator
            .generate(conversation_id, &decision.persona_id, sink.clone())
            .await
        {
            Ok(message) => {
                report.messages_generated += 1;
                self.observer.on_message(conversation_id, &message);
                AutoRunState::Pacing(speed.delay())
            }
            Err(e) => {
                warn!(
                    "Generating a message for {} in {} failed: {}",
                    decision.persona_id, conversation_id, e
                );
                AutoRunState::Stopped(StopReason::GenerationFailed(e.to_string()))
            }
        }
    }

    /// Remove the run entry (if it is still ours) and clean up after an
    /// ended conversation.
    fn finish(&self, conversation_id: &ConversationId, guard: &RunGuard, reason: &StopReason) {
        guard.release();
        if *reason == StopReason::ConversationEnded {
            self.orchestrator.reset(conversation_id);
        }
    }
}

async fn pace(delay: Duration, token: &CancellationToken) -> AutoRunState {
    if token.is_cancelled() {
        return AutoRunState::Stopped(StopReason::Cancelled);
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => AutoRunState::Stopped(StopReason::Cancelled),
        _ = tokio::time::sleep(delay) => {
            if token.is_cancelled() {
                AutoRunState::Stopped(StopReason::Cancelled)
            } else {
                AutoRunState::AwaitingDecision
            }
        }
    }
}
