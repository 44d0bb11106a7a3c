use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::application::QuestionRelay;
use crate::domain::{
    parse_response, ConversationState, DomainError, HistoryEntry, Question, StructuredResponse,
};

pub const DEFAULT_REVEAL_TICK: Duration = Duration::from_millis(10);
pub const DEFAULT_REVEAL_STEP: usize = 5;

/// Pace of the typing reveal: every `tick`, `step` more characters of the
/// answer's content become visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealConfig {
    tick: Duration,
    step: usize,
}

impl RevealConfig {
    pub fn new(tick: Duration, step: usize) -> Self {
        Self {
            // tokio intervals panic on a zero period
            tick: tick.max(Duration::from_millis(1)),
            step: step.max(1),
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn step(&self) -> usize {
        self.step
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_TICK, DEFAULT_REVEAL_STEP)
    }
}

/// What a call to [`ConversationController::submit`] did.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The query was blank; nothing was sent.
    Ignored,
    /// The answer arrived and is being revealed.
    Revealing(RevealHandle),
    /// The request failed; the error text is shown as the response content.
    Failed(String),
    /// A newer submission started while this one was in flight. The answer
    /// went straight into history without being displayed.
    Superseded,
}

/// Handle to a running reveal task.
#[derive(Debug)]
pub struct RevealHandle {
    join: JoinHandle<()>,
    cancel: CancellationToken,
}

impl RevealHandle {
    /// Wait until the answer is fully revealed (or the reveal was cancelled)
    /// and its history entry has been recorded.
    pub async fn finished(self) {
        if let Err(e) = self.join.await {
            warn!("Reveal task ended abnormally: {}", e);
        }
    }

    /// Stop typing. The full answer is shown at once (unless a newer
    /// submission owns the display) and recorded in history.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Owns the state of one conversation session: the input text, the answer on
/// display, the loading and typing flags, and the history of answered
/// questions.
///
/// State changes are published through a [`watch`] channel so renderers can
/// follow the typing reveal frame by frame.
///
/// Submissions are numbered. Starting a submission cancels the reveal of any
/// earlier one, and an answer that arrives after a newer submission started is
/// recorded in history without replacing what is on display. The most recent
/// submission therefore always owns `response`, `loading` and `is_typing`.
pub struct ConversationController {
    relay: Arc<dyn QuestionRelay>,
    reveal: RevealConfig,
    state: Arc<watch::Sender<ConversationState>>,
    latest_submission: Arc<AtomicU64>,
    active_reveal: Mutex<Option<CancellationToken>>,
}

impl ConversationController {
    pub fn new(relay: Arc<dyn QuestionRelay>) -> Self {
        let (state, _) = watch::channel(ConversationState::default());
        Self {
            relay,
            reveal: RevealConfig::default(),
            state: Arc::new(state),
            latest_submission: Arc::new(AtomicU64::new(0)),
            active_reveal: Mutex::new(None),
        }
    }

    pub fn with_reveal_config(mut self, reveal: RevealConfig) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn state(&self) -> ConversationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state.subscribe()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.state.send_if_modified(|state| {
            if state.query == query {
                return false;
            }
            state.query = query;
            true
        });
    }

    /// Submit whatever is currently in the input box.
    pub async fn submit_query(&self) -> SubmitOutcome {
        let query = self.state.borrow().query.clone();
        self.submit(&query).await
    }

    /// Ask the relay `current_query` and start revealing the answer.
    ///
    /// Returns once the network phase has settled; at that point `loading` is
    /// false and `query` is empty even though the reveal may still be running.
    /// Failures never escape: they become the content of the displayed
    /// response.
    pub async fn submit(&self, current_query: &str) -> SubmitOutcome {
        let Some(question) = Question::new(current_query) else {
            debug!("Ignoring blank query");
            return SubmitOutcome::Ignored;
        };

        let submission = self.latest_submission.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_active_reveal();
        self.state.send_modify(|state| {
            state.loading = true;
            state.is_typing = false;
            state.response = None;
        });

        info!("Submitting question #{}", submission);
        let result = self.fetch_answer(&question).await;

        let outcome = match result {
            Ok(answer) => match self.start_reveal(submission, question, answer) {
                Some(handle) => SubmitOutcome::Revealing(handle),
                None => SubmitOutcome::Superseded,
            },
            Err(e) => {
                error!("Question #{} failed: {:?}", submission, e);
                let message = e.to_string();
                let response = StructuredResponse::error(Some(&message));
                let latest = &self.latest_submission;
                self.state.send_if_modified(|state| {
                    if !is_current(latest, submission) {
                        return false;
                    }
                    state.response = Some(response);
                    true
                });
                SubmitOutcome::Failed(message)
            }
        };

        let latest = &self.latest_submission;
        self.state.send_if_modified(|state| {
            if !is_current(latest, submission) {
                return false;
            }
            state.loading = false;
            state.query.clear();
            true
        });

        outcome
    }

    /// Mark the entry with `id` as the only selected one.
    ///
    /// An unknown id changes nothing and returns `false`; the current
    /// selection is kept.
    pub fn select_history_item(&self, id: &str) -> bool {
        self.state.send_if_modified(|state| {
            if state.find_entry(id).is_none() {
                return false;
            }
            for entry in &mut state.history {
                entry.set_selected(entry.id() == id);
            }
            true
        })
    }

    /// The selected history entry together with its decoded answer.
    pub fn selected_entry(&self) -> Option<(HistoryEntry, StructuredResponse)> {
        let state = self.state.borrow();
        let entry = state.selected_entry()?;
        match entry.decoded_answer() {
            Ok(answer) => Some((entry.clone(), answer)),
            Err(e) => {
                warn!("History entry {} has an unreadable answer: {}", entry.id(), e);
                None
            }
        }
    }

    pub fn clear_history(&self) {
        self.state.send_modify(|state| state.history.clear());
    }

    /// Stop any running reveal. The answer being revealed is shown in full
    /// and recorded in history.
    pub fn shutdown(&self) {
        self.cancel_active_reveal();
        self.state.send_if_modified(|state| {
            let was_typing = state.is_typing;
            state.is_typing = false;
            was_typing
        });
    }

    async fn fetch_answer(&self, question: &Question) -> Result<StructuredResponse, DomainError> {
        let raw = self.relay.ask(question).await?;
        Ok(parse_response(&raw))
    }

    /// Start revealing `answer` if `submission` is still the latest one;
    /// otherwise record it in history only and return `None`.
    fn start_reveal(
        &self,
        submission: u64,
        question: Question,
        answer: StructuredResponse,
    ) -> Option<RevealHandle> {
        // A newer submission bumps the counter before it takes this lock to
        // cancel the active reveal, so the check and the registration below
        // cannot interleave with it.
        let mut active = self
            .active_reveal
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !is_current(&self.latest_submission, submission) {
            drop(active);
            debug!(
                "Question #{} was superseded; recording its answer without display",
                submission
            );
            self.state
                .send_modify(|state| record_history(state, question.as_str(), &answer));
            return None;
        }

        let cancel = CancellationToken::new();
        if let Some(previous) = active.replace(cancel.clone()) {
            previous.cancel();
        }
        self.state.send_modify(|state| state.is_typing = true);

        let join = tokio::spawn(run_reveal(
            Arc::clone(&self.state),
            self.reveal,
            RevealTarget {
                latest: Arc::clone(&self.latest_submission),
                submission,
                question,
                answer,
            },
            cancel.clone(),
        ));

        Some(RevealHandle { join, cancel })
    }

    fn cancel_active_reveal(&self) {
        let mut active = self
            .active_reveal
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = active.take() {
            token.cancel();
        }
    }
}

impl Drop for ConversationController {
    fn drop(&mut self) {
        self.cancel_active_reveal();
    }
}

/// The answer a reveal task types out, and the submission it belongs to.
struct RevealTarget {
    latest: Arc<AtomicU64>,
    submission: u64,
    question: Question,
    answer: StructuredResponse,
}

impl RevealTarget {
    /// Record the answer in history and, while its submission still owns the
    /// display, show it in full and stop typing.
    fn settle(&self, state: &mut ConversationState) {
        if is_current(&self.latest, self.submission) {
            state.is_typing = false;
            state.response = Some(self.answer.clone());
        }
        record_history(state, self.question.as_str(), &self.answer);
    }
}

async fn run_reveal(
    state: Arc<watch::Sender<ConversationState>>,
    config: RevealConfig,
    target: RevealTarget,
    cancel: CancellationToken,
) {
    let total = target.answer.content_char_count();
    let mut ticker = tokio::time::interval(config.tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut revealed = 0;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Reveal cancelled after {} of {} chars", revealed, total);
                state.send_modify(|state| target.settle(state));
                return;
            }
            _ = ticker.tick() => {}
        }

        let frame = target.answer.with_revealed_content(revealed);
        // The cancellation check runs under the channel's lock so a frame can
        // never land after a newer submission cleared the response.
        state.send_if_modified(|state| {
            if cancel.is_cancelled() {
                return false;
            }
            state.response = Some(frame);
            true
        });

        revealed += config.step();
        if revealed > total {
            break;
        }
    }

    state.send_modify(|state| target.settle(state));
}

fn is_current(latest: &AtomicU64, submission: u64) -> bool {
    latest.load(Ordering::SeqCst) == submission
}

fn record_history(state: &mut ConversationState, question: &str, answer: &StructuredResponse) {
    match HistoryEntry::new(question, answer) {
        Ok(entry) => state.history.push(entry),
        Err(e) => error!("Failed to record history entry: {}", e),
    }
}
