//! Domain models used by the backend: problems, session phases and chat transcript entries.

use serde::{Deserialize, Serialize};

/// Number of human-authored hints every problem carries.
/// The tier after the last stored hint is the solution reveal itself.
pub const HINTS_PER_PROBLEM: usize = 3;

/// A buggy snippet, its graduated hints and the text considered "correct".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Problem {
  pub id: String,
  pub buggy_code: String,
  pub hints: Vec<String>,
  pub solution: String,
}

impl Problem {
  /// Strict-equality oracle: only leading/trailing whitespace is ignored.
  /// Formatting, comment and naming differences all count as mismatches.
  pub fn is_solved_by(&self, candidate: &str) -> bool {
    candidate.trim() == self.solution.trim()
  }
}

/// Where a player's session currently stands.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  /// Landing page; no challenge drawn yet.
  #[default]
  NotStarted,
  Active,
  Expired,
  Solved,
}

impl Phase {
  pub fn as_str(&self) -> &'static str {
    match self {
      Phase::NotStarted => "not_started",
      Phase::Active => "active",
      Phase::Expired => "expired",
      Phase::Solved => "solved",
    }
  }
}

impl std::fmt::Display for Phase {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
  User,
  Assistant,
}

/// One turn of the hint chat.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatEntry {
  pub role: ChatRole,
  pub text: String,
  /// Set when the assistant turn is an error notice instead of a real reply.
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub failed: bool,
}

impl ChatEntry {
  pub fn user(text: impl Into<String>) -> Self {
    Self { role: ChatRole::User, text: text.into(), failed: false }
  }

  pub fn assistant(text: impl Into<String>) -> Self {
    Self { role: ChatRole::Assistant, text: text.into(), failed: false }
  }

  pub fn assistant_error(text: impl Into<String>) -> Self {
    Self { role: ChatRole::Assistant, text: text.into(), failed: true }
  }
}
