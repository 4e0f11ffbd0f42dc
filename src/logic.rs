//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - creating / ending player sessions, evicting idle ones
//!   - starting a challenge (random draw) and re-evaluating the clock
//!   - judging submissions
//!   - running hint requests against the collaborator with a timeout

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::Phase;
use crate::error::AppError;
use crate::protocol::{ProblemOut, SessionView};
use crate::session::{HintOutcome, HintStart, SessionState, Submission, Tick};
use crate::state::AppState;
use crate::util::trunc_for_log;

/// What became of a hint request, from the caller's point of view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HintResult {
  TimeUp,
  NotActive(Phase),
  Resolved { tier: u32, outcome: HintOutcome },
}

#[instrument(level = "info", skip(state))]
pub async fn create_session(state: &AppState) -> SessionView {
  let id = Uuid::new_v4();
  let now = state.clock.now();
  let mut session = SessionState::new();
  session.touch(now);
  let view = build_view(state, id, &session, now);

  let mut sessions = state.sessions.write().await;
  let evicted = evict_idle(&mut sessions, now, state.settings.session_idle_ttl());
  sessions.insert(id, session);
  info!(target: "challenge", session = %id, evicted, live = sessions.len(), "Session created");
  view
}

/// Drop every session nobody has touched within the idle TTL.
#[instrument(level = "debug", skip(state))]
pub async fn purge_idle_sessions(state: &AppState) -> usize {
  let now = state.clock.now();
  let mut sessions = state.sessions.write().await;
  let evicted = evict_idle(&mut sessions, now, state.settings.session_idle_ttl());
  if evicted > 0 {
    info!(target: "challenge", evicted, live = sessions.len(), "Idle sessions evicted");
  }
  evicted
}

/// Background sweep so abandoned sessions go away even when nobody creates new ones.
pub async fn run_idle_sweeper(state: Arc<AppState>, every: std::time::Duration) {
  let mut interval = tokio::time::interval(every);
  interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
  loop {
    interval.tick().await;
    purge_idle_sessions(&state).await;
  }
}

fn evict_idle(sessions: &mut HashMap<Uuid, SessionState>, now: DateTime<Utc>, ttl: Duration) -> usize {
  let before = sessions.len();
  sessions.retain(|_, s| !s.is_idle(now, ttl));
  before - sessions.len()
}

#[instrument(level = "info", skip(state))]
pub async fn end_session(state: &AppState, id: Uuid) -> Result<(), AppError> {
  match state.sessions.write().await.remove(&id) {
    Some(s) => {
      info!(target: "challenge", session = %id, phase = %s.phase, rounds = s.round, "Session ended");
      Ok(())
    }
    None => Err(AppError::UnknownSession(id)),
  }
}

/// Start the first challenge or a new one. Any in-flight hint for the previous
/// challenge will be discarded when it returns.
#[instrument(level = "info", skip(state))]
pub async fn start_challenge(state: &AppState, id: Uuid) -> Result<SessionView, AppError> {
  let problem = state.draw_problem().await;
  let now = state.clock.now();

  let mut sessions = state.sessions.write().await;
  let session = sessions.get_mut(&id).ok_or(AppError::UnknownSession(id))?;
  let previous = session.phase;
  *session = session.start_challenge(&problem, now, state.settings.challenge_duration());

  info!(target: "challenge", session = %id, problem = %problem.id, round = session.round, from = %previous, "Challenge started");
  Ok(build_view(state, id, session, now))
}

#[instrument(level = "debug", skip(state))]
pub async fn tick(state: &AppState, id: Uuid) -> Result<(Tick, Phase), AppError> {
  let now = state.clock.now();
  let mut sessions = state.sessions.write().await;
  let session = sessions.get_mut(&id).ok_or(AppError::UnknownSession(id))?;
  session.touch(now);
  let tick = session.tick(now);
  if tick == Tick::TimeUp {
    info!(target: "challenge", session = %id, problem = ?session.problem_id, attempts = session.attempt_count, "Time's up");
  }
  Ok((tick, session.phase))
}

#[instrument(level = "info", skip(state, code), fields(code_len = code.len()))]
pub async fn submit_solution(state: &AppState, id: Uuid, code: &str) -> Result<(Submission, Phase), AppError> {
  let now = state.clock.now();
  let mut sessions = state.sessions.write().await;
  let session = sessions.get_mut(&id).ok_or(AppError::UnknownSession(id))?;
  session.touch(now);

  let outcome = session.submit(&state.bank, code, now).map_err(|e| {
    error!(target: "challenge", session = %id, error = %e, "Submission against a missing problem");
    e
  })?;

  match outcome {
    Submission::Solved => info!(target: "challenge", session = %id, problem = ?session.problem_id, attempts = session.attempt_count, "Challenge solved"),
    Submission::Mismatch => debug!(target: "challenge", session = %id, problem = ?session.problem_id, "Submission rejected"),
    Submission::TimeUp => info!(target: "challenge", session = %id, "Submission after deadline; challenge expired"),
    Submission::NotActive(phase) => debug!(target: "challenge", session = %id, %phase, "Submission outside a running challenge"),
  }
  Ok((outcome, session.phase))
}

/// Record the question, ask the collaborator (bounded by the configured
/// timeout) and apply the reply if the session still matches the request.
#[instrument(level = "info", skip(state, message), fields(message_len = message.len()))]
pub async fn request_hint(state: &AppState, id: Uuid, message: &str) -> Result<(HintResult, Phase), AppError> {
  let ticket = {
    let now = state.clock.now();
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(AppError::UnknownSession(id))?;
    session.touch(now);
    match session.begin_hint(&state.bank, message, now)? {
      HintStart::Pending(ticket) => ticket,
      HintStart::TimeUp => return Ok((HintResult::TimeUp, session.phase)),
      HintStart::NotActive(phase) => return Ok((HintResult::NotActive(phase), phase)),
    }
  };
  debug!(target: "challenge", session = %id, tier = ticket.request.tier, problem = %ticket.request.problem_id, question = %trunc_for_log(message, 80), "Hint requested");

  let timeout = state.settings.hint_timeout();
  let reply = match tokio::time::timeout(timeout, state.hints.generate_hint(&state.prompts, &ticket.request)).await {
    Ok(reply) => reply,
    Err(_) => Err(AppError::CollaboratorUnavailable(format!("no reply within {}s", timeout.as_secs()))),
  };
  if let Err(e) = &reply {
    warn!(target: "challenge", session = %id, assistant = state.hints.name(), error = %e, "Hint collaborator failed");
  }

  let mut sessions = state.sessions.write().await;
  let session = sessions.get_mut(&id).ok_or(AppError::UnknownSession(id))?;
  let outcome = session.finish_hint(&ticket, reply, &state.prompts.unavailable_notice);
  if outcome == HintOutcome::Discarded {
    info!(target: "challenge", session = %id, round = ticket.round, attempt = ticket.attempt, "Stale hint reply discarded");
  }
  Ok((HintResult::Resolved { tier: ticket.request.tier, outcome }, session.phase))
}

/// Current view of a session; evaluates the clock first so an overdue
/// challenge is reported as expired.
#[instrument(level = "debug", skip(state))]
pub async fn session_view(state: &AppState, id: Uuid) -> Result<SessionView, AppError> {
  let now = state.clock.now();
  let mut sessions = state.sessions.write().await;
  let session = sessions.get_mut(&id).ok_or(AppError::UnknownSession(id))?;
  session.touch(now);
  if session.tick(now) == Tick::TimeUp {
    info!(target: "challenge", session = %id, "Time's up");
  }
  Ok(build_view(state, id, session, now))
}

fn build_view(state: &AppState, id: Uuid, session: &SessionState, now: DateTime<Utc>) -> SessionView {
  let problem = session.problem_id.as_deref().and_then(|pid| match state.bank.get(pid) {
    Ok(p) => Some(ProblemOut::from(p)),
    Err(e) => {
      error!(target: "challenge", session = %id, error = %e, "Session references a missing problem");
      None
    }
  });
  let remaining = session.remaining_at(now);
  let greeting = (session.phase == Phase::Active && session.transcript.is_empty())
    .then(|| state.prompts.greeting.clone());

  SessionView {
    session_id: id,
    phase: session.phase,
    round: session.round,
    problem,
    remaining: remaining.map(|r| r.to_string()),
    remaining_secs: remaining.map(|r| r.secs),
    attempt_count: session.attempt_count,
    transcript: session.transcript.clone(),
    code: session.submitted_code.clone(),
    greeting,
  }
}
