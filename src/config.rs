//! Loading agent configuration (prompts, game settings, optional extra problems) from TOML.
//!
//! See `AgentConfig`, `Prompts` and `GameSettings` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub game: GameSettings,
  #[serde(default)]
  pub problems: Vec<ProblemCfg>,
}

/// Problem entry accepted in TOML configuration.
/// Entries with an id already present in the built-in seeds replace the seed.
#[derive(Clone, Debug, Deserialize)]
pub struct ProblemCfg {
  pub id: String,
  pub buggy_code: String,
  #[serde(default)]
  pub hints: Vec<String>,
  pub solution: String,
}

/// Prompts used by the hint assistant.
/// `hint_system` understands `{try_number}`, `{problem}` and `{code}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub hint_system: String,
  /// Shown by the frontend before the first question of a challenge.
  pub greeting: String,
  /// Replaces the assistant turn when the hint call fails; `{reason}` is filled in.
  pub unavailable_notice: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      hint_system: "You are the debugging assistant of a timed programming game. \
Help the player find the bugs in the code below without handing out the answer too early.\n\n\
Scale how specific you are with the try number:\n\
1. First try: a vague pointer to the general area of the bug.\n\
2. Second try: name the concept that is being misused.\n\
3. Third try: a detailed hint that almost gives the fix away.\n\
4. Fourth try and later: reveal the corrected code.\n\n\
Current try number: {try_number}\n\
Problem: {problem}\n\
Buggy code:\n{code}\n\n\
Answer the player's message with a hint appropriate for the try number."
        .into(),
      greeting: "Hi! I'm your debugging assistant. I already know the code you're working on, \
so just ask me anything about it."
        .into(),
      unavailable_notice: "The assistant could not answer right now ({reason}). Please ask again.".into(),
    }
  }
}

/// Timer and collaborator limits.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameSettings {
  pub challenge_seconds: u64,
  pub hint_timeout_secs: u64,
  /// Sessions not touched for this long are dropped from the store.
  pub session_idle_secs: u64,
  /// Fixed seed for problem draws; random when absent.
  pub seed: Option<u64>,
}

const DEFAULT_CHALLENGE_SECONDS: u64 = 180;
const MAX_CHALLENGE_SECONDS: u64 = 24 * 60 * 60;
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
const MAX_SESSION_IDLE_SECS: u64 = 7 * 24 * 60 * 60;

impl Default for GameSettings {
  fn default() -> Self {
    Self {
      challenge_seconds: DEFAULT_CHALLENGE_SECONDS,
      hint_timeout_secs: 8,
      session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
      seed: None,
    }
  }
}

impl GameSettings {
  /// Challenge window. Zero or more than a day falls back to 180s.
  pub fn challenge_duration(&self) -> chrono::Duration {
    bounded_seconds("challenge_seconds", self.challenge_seconds, MAX_CHALLENGE_SECONDS, DEFAULT_CHALLENGE_SECONDS)
  }

  pub fn hint_timeout(&self) -> std::time::Duration {
    std::time::Duration::from_secs(self.hint_timeout_secs)
  }

  /// Idle lifetime of a session. Zero or more than a week falls back to 30 minutes.
  pub fn session_idle_ttl(&self) -> chrono::Duration {
    bounded_seconds("session_idle_secs", self.session_idle_secs, MAX_SESSION_IDLE_SECS, DEFAULT_SESSION_IDLE_SECS)
  }
}

fn bounded_seconds(setting: &str, secs: u64, max: u64, default: u64) -> chrono::Duration {
  let secs = if secs == 0 || secs > max {
    error!(target: "debug_challenge", setting, value = secs, max, fallback = default, "Duration setting out of range; using default");
    default
  } else {
    secs
  };
  chrono::Duration::seconds(secs as i64)
}

pub fn parse_agent_config(s: &str) -> Result<AgentConfig, toml::de::Error> {
  toml::from_str::<AgentConfig>(s)
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_agent_config(&s) {
      Ok(cfg) => {
        info!(target: "debug_challenge", %path, problems = cfg.problems.len(), "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "debug_challenge", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "debug_challenge", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
