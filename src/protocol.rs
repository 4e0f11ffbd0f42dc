//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ChatEntry, Phase, Problem};
use crate::logic::HintResult;
use crate::session::{HintOutcome, Submission, Tick};

pub const SOLVED_MESSAGE: &str = "Correct! You've fixed all the bugs!";
pub const MISMATCH_MESSAGE: &str = "Some bugs still remain. Keep trying!";
pub const TIME_UP_MESSAGE: &str = "Time's up!";

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Start the first challenge or move on to another one.
    Start,
    Tick,
    Submit {
        code: String,
    },
    Hint {
        message: String,
    },
    State,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Challenge {
        session: SessionView,
    },
    Timer {
        remaining: String,
        #[serde(rename = "remainingSecs")]
        remaining_secs: i64,
    },
    TimeUp {
        message: String,
    },
    SubmitResult(SubmitOut),
    HintReply(HintOut),
    State {
        session: SessionView,
    },
    Error {
        message: String,
    },
}

/// The public face of a problem; the reference solution stays server-side.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemOut {
    pub id: String,
    pub buggy_code: String,
}

impl From<&Problem> for ProblemOut {
    fn from(p: &Problem) -> Self {
        Self { id: p.id.clone(), buggy_code: p.buggy_code.clone() }
    }
}

/// Everything a frontend needs to render one session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub phase: Phase,
    pub round: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<ProblemOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<i64>,
    pub attempt_count: u32,
    pub transcript: Vec<ChatEntry>,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TickOut {
    pub phase: Phase,
    pub time_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<i64>,
}

impl TickOut {
    pub fn new(tick: Tick, phase: Phase) -> Self {
        match tick {
            Tick::Remaining(r) => Self { phase, time_up: false, remaining: Some(r.to_string()), remaining_secs: Some(r.secs) },
            Tick::TimeUp => Self { phase, time_up: true, remaining: None, remaining_secs: None },
            Tick::Idle(_) => Self { phase, time_up: false, remaining: None, remaining_secs: None },
        }
    }
}

#[derive(Deserialize)]
pub struct SubmitIn {
    pub code: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    Solved,
    Mismatch,
    TimeUp,
    NotActive,
}

#[derive(Debug, Serialize)]
pub struct SubmitOut {
    pub status: SubmitStatus,
    pub correct: bool,
    pub phase: Phase,
    pub message: String,
}

impl SubmitOut {
    pub fn new(submission: Submission, phase: Phase) -> Self {
        let (status, message) = match submission {
            Submission::Solved => (SubmitStatus::Solved, SOLVED_MESSAGE.to_string()),
            Submission::Mismatch => (SubmitStatus::Mismatch, MISMATCH_MESSAGE.to_string()),
            Submission::TimeUp => (SubmitStatus::TimeUp, TIME_UP_MESSAGE.to_string()),
            Submission::NotActive(p) => (SubmitStatus::NotActive, format!("No running challenge (phase: {}).", p)),
        };
        Self { status, correct: status == SubmitStatus::Solved, phase, message }
    }
}

#[derive(Deserialize)]
pub struct HintIn {
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HintStatus {
    Replied,
    Failed,
    Discarded,
    TimeUp,
    NotActive,
}

#[derive(Debug, Serialize)]
pub struct HintOut {
    pub status: HintStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub phase: Phase,
}

impl HintOut {
    pub fn new(result: HintResult, phase: Phase) -> Self {
        let (status, tier, text) = match result {
            HintResult::TimeUp => (HintStatus::TimeUp, None, Some(TIME_UP_MESSAGE.to_string())),
            HintResult::NotActive(p) => (HintStatus::NotActive, None, Some(format!("No running challenge (phase: {}).", p))),
            HintResult::Resolved { tier, outcome } => match outcome {
                HintOutcome::Replied(t) => (HintStatus::Replied, Some(tier), Some(t)),
                HintOutcome::Failed(t) => (HintStatus::Failed, Some(tier), Some(t)),
                HintOutcome::Discarded => (HintStatus::Discarded, Some(tier), None),
            },
        };
        Self { status, tier, text, phase }
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub problems: usize,
    pub assistant: &'static str,
}
