//! Application state: problem bank, per-session store, hint collaborator, clock and RNG.
//!
//! This module owns:
//!   - the validated problem bank (built-in seeds + optional TOML problems)
//!   - one `SessionState` per connected player, keyed by session id
//!   - the prompts and game settings (from TOML or defaults)
//!   - the hint collaborator (OpenAI when configured, local hints otherwise)
//!
//! Sessions never share mutable state; the map lock is only held for the
//! short synchronous transitions, never across a collaborator call.

use std::{collections::HashMap, sync::Arc};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::bank::ProblemBank;
use crate::clock::{Clock, SystemClock};
use crate::config::{load_agent_config_from_env, AgentConfig, GameSettings, Prompts};
use crate::domain::{Problem, HINTS_PER_PROBLEM};
use crate::error::AppError;
use crate::hints::{HintGenerator, LocalHints};
use crate::openai::OpenAI;
use crate::seeds::seed_problems;
use crate::session::SessionState;

#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<ProblemBank>,
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionState>>>,
    pub hints: Arc<dyn HintGenerator>,
    pub clock: Arc<dyn Clock>,
    pub rng: Arc<Mutex<StdRng>>,
    pub prompts: Prompts,
    pub settings: GameSettings,
}

impl AppState {
    /// Build state from env: load config, assemble the bank, pick the hint collaborator.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, AppError> {
        let cfg = load_agent_config_from_env().unwrap_or_default();
        let bank = Arc::new(build_bank(&cfg)?);
        info!(target: "challenge", problems = bank.len(), ids = ?bank.ids().collect::<Vec<_>>(), "Startup problem inventory");

        let hints: Arc<dyn HintGenerator> = match OpenAI::from_env(cfg.game.hint_timeout()) {
            Some(oa) => {
                info!(target: "debug_challenge", base_url = %oa.base_url, hint_model = %oa.hint_model, "OpenAI enabled.");
                Arc::new(oa)
            }
            None => {
                info!(target: "debug_challenge", "OpenAI disabled (no OPENAI_API_KEY). Serving stored hints.");
                Arc::new(LocalHints::new(bank.clone()))
            }
        };

        Ok(Self::with_parts(bank, hints, Arc::new(SystemClock), cfg.prompts, cfg.game))
    }

    /// Assemble state from explicit collaborators. Tests use this with fakes.
    pub fn with_parts(
        bank: Arc<ProblemBank>,
        hints: Arc<dyn HintGenerator>,
        clock: Arc<dyn Clock>,
        prompts: Prompts,
        settings: GameSettings,
    ) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            bank,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            hints,
            clock,
            rng: Arc::new(Mutex::new(rng)),
            prompts,
            settings,
        }
    }

    /// Draw a problem uniformly at random from the bank.
    pub async fn draw_problem(&self) -> Problem {
        let mut rng = self.rng.lock().await;
        self.bank.draw(&mut *rng).clone()
    }
}

/// Config problems first (skipping malformed entries), then built-in seeds
/// whose ids are not taken yet.
fn build_bank(cfg: &AgentConfig) -> Result<ProblemBank, AppError> {
    let mut problems: Vec<Problem> = Vec::new();

    for pc in &cfg.problems {
        let id = pc.id.trim().to_string();
        if id.is_empty() {
            error!(target: "challenge", "Skipping bank item: empty id.");
            continue;
        }
        if pc.hints.len() != HINTS_PER_PROBLEM {
            error!(target: "challenge", %id, hints = pc.hints.len(), "Skipping bank item: expected {} hints.", HINTS_PER_PROBLEM);
            continue;
        }
        if problems.iter().any(|p| p.id == id) {
            warn!(target: "challenge", %id, "Skipping bank item: duplicate id in config.");
            continue;
        }
        problems.push(Problem {
            id,
            buggy_code: pc.buggy_code.clone(),
            hints: pc.hints.clone(),
            solution: pc.solution.clone(),
        });
    }

    for seed in seed_problems() {
        if problems.iter().any(|p| p.id == seed.id) {
            info!(target: "challenge", id = %seed.id, "Config problem overrides built-in seed");
            continue;
        }
        problems.push(seed);
    }

    ProblemBank::new(problems)
}
