//! Per-player session state and the controller operations that move it.
//!
//! Lifecycle:
//! ```text
//! NotStarted --start--> Active
//! Active --deadline elapsed--> Expired
//! Active --matching submission--> Solved
//! Solved | Expired --new challenge--> Active (fresh problem, clock, attempts, transcript)
//! ```
//! Nothing here reads the wall clock or a random source directly; callers pass
//! `now` and the drawn problem in, so every transition is reproducible.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::bank::ProblemBank;
use crate::domain::{ChatEntry, Phase, Problem};
use crate::error::AppError;
use crate::hints::HintRequest;
use crate::util::{fill_template, format_clock};

#[derive(Clone, Debug, Default, Serialize)]
pub struct SessionState {
  pub phase: Phase,
  pub problem_id: Option<String>,
  pub started_at: Option<DateTime<Utc>>,
  pub deadline: Option<DateTime<Utc>>,
  /// Hint requests made in this challenge. Never limits submissions.
  pub attempt_count: u32,
  pub transcript: Vec<ChatEntry>,
  /// The player's editable buffer; starts as the buggy code.
  pub submitted_code: String,
  /// Challenge counter within the session, bumped on every start.
  pub round: u64,
  /// Last time the player touched this session; drives idle eviction.
  pub last_seen: Option<DateTime<Utc>>,
}

/// Result of a clock check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
  Remaining(Remaining),
  /// The deadline passed on this check; reported once per challenge.
  TimeUp,
  /// No running challenge (not started, solved, or already expired).
  Idle(Phase),
}

/// Whole seconds left, floored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Remaining {
  pub secs: i64,
}

impl std::fmt::Display for Remaining {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&format_clock(self.secs))
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
  Solved,
  /// Normal negative outcome; the challenge keeps running.
  Mismatch,
  TimeUp,
  NotActive(Phase),
}

/// Tag carried by an in-flight hint request. A reply is applied only while
/// the session is still on the same round, problem and attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintTicket {
  pub round: u64,
  pub attempt: u32,
  pub request: HintRequest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HintStart {
  Pending(HintTicket),
  TimeUp,
  NotActive(Phase),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HintOutcome {
  Replied(String),
  /// The collaborator failed; the notice was appended in place of the reply.
  Failed(String),
  /// The session moved on while the request was in flight.
  Discarded,
}

impl SessionState {
  /// A fresh session sitting on the landing page.
  pub fn new() -> Self {
    Self::default()
  }

  /// Return the state of a new challenge on `problem`, starting at `now`.
  /// Clock, attempts and transcript are reset; the round counter carries on.
  pub fn start_challenge(&self, problem: &Problem, now: DateTime<Utc>, duration: Duration) -> SessionState {
    SessionState {
      phase: Phase::Active,
      problem_id: Some(problem.id.clone()),
      started_at: Some(now),
      deadline: Some(now + duration),
      attempt_count: 0,
      transcript: Vec::new(),
      submitted_code: problem.buggy_code.clone(),
      round: self.round + 1,
      last_seen: Some(now),
    }
  }

  pub fn touch(&mut self, now: DateTime<Utc>) {
    self.last_seen = Some(now);
  }

  /// True once `ttl` has passed since the last touch.
  pub fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
    self.last_seen.map_or(false, |seen| now - seen >= ttl)
  }

  /// Time left at `now` without changing anything.
  pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Remaining> {
    if self.phase != Phase::Active {
      return None;
    }
    let left = self.deadline? - now;
    Some(Remaining { secs: left.num_seconds().max(0) })
  }

  /// Compare `now` with the deadline. Idempotent for a fixed `now`; the only
  /// side effect is the single Active -> Expired transition.
  pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
    if self.phase != Phase::Active {
      return Tick::Idle(self.phase);
    }
    let Some(deadline) = self.deadline else {
      return Tick::Idle(self.phase);
    };

    let left = deadline - now;
    if left <= Duration::zero() {
      self.phase = Phase::Expired;
      Tick::TimeUp
    } else {
      Tick::Remaining(Remaining { secs: left.num_seconds() })
    }
  }

  pub fn current_problem<'b>(&self, bank: &'b ProblemBank) -> Result<&'b Problem, AppError> {
    let id = self
      .problem_id
      .as_deref()
      .ok_or_else(|| AppError::InvalidProblemReference("<no problem drawn>".into()))?;
    bank.get(id)
  }

  /// Judge `candidate` against the reference solution (trim-only equality).
  /// A mismatch leaves phase, attempts and transcript untouched.
  pub fn submit(&mut self, bank: &ProblemBank, candidate: &str, now: DateTime<Utc>) -> Result<Submission, AppError> {
    match self.tick(now) {
      Tick::Remaining(_) => {}
      Tick::TimeUp => return Ok(Submission::TimeUp),
      Tick::Idle(phase) => return Ok(Submission::NotActive(phase)),
    }

    let problem = self.current_problem(bank)?;
    let solved = problem.is_solved_by(candidate);
    self.submitted_code = candidate.to_string();
    if solved {
      self.phase = Phase::Solved;
      Ok(Submission::Solved)
    } else {
      Ok(Submission::Mismatch)
    }
  }

  /// Record the player's question, bump the attempt counter and build the
  /// collaborator request for the new tier.
  pub fn begin_hint(&mut self, bank: &ProblemBank, message: &str, now: DateTime<Utc>) -> Result<HintStart, AppError> {
    match self.tick(now) {
      Tick::Remaining(_) => {}
      Tick::TimeUp => return Ok(HintStart::TimeUp),
      Tick::Idle(phase) => return Ok(HintStart::NotActive(phase)),
    }

    let problem = self.current_problem(bank)?;
    let request = HintRequest {
      tier: self.attempt_count + 1,
      problem_id: problem.id.clone(),
      buggy_code: problem.buggy_code.clone(),
      user_message: message.to_string(),
    };

    self.transcript.push(ChatEntry::user(message));
    self.attempt_count += 1;

    Ok(HintStart::Pending(HintTicket { round: self.round, attempt: self.attempt_count, request }))
  }

  pub fn accepts(&self, ticket: &HintTicket) -> bool {
    self.round == ticket.round
      && self.attempt_count == ticket.attempt
      && self.problem_id.as_deref() == Some(ticket.request.problem_id.as_str())
  }

  /// Apply the collaborator's answer. Failures become a visible error entry
  /// built from `notice_tpl` (`{reason}` placeholder); stale tickets are dropped.
  pub fn finish_hint(
    &mut self,
    ticket: &HintTicket,
    reply: Result<String, AppError>,
    notice_tpl: &str,
  ) -> HintOutcome {
    if !self.accepts(ticket) {
      return HintOutcome::Discarded;
    }
    match reply {
      Ok(text) => {
        self.transcript.push(ChatEntry::assistant(text.clone()));
        HintOutcome::Replied(text)
      }
      Err(e) => {
        let reason = e.to_string();
        let notice = fill_template(notice_tpl, &[("reason", reason.as_str())]);
        self.transcript.push(ChatEntry::assistant_error(notice.clone()));
        HintOutcome::Failed(notice)
      }
    }
  }
}
