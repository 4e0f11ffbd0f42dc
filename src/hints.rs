//! Hint requests and the text-generation collaborator seam.
//!
//! The controller only sees `HintGenerator`; the OpenAI client and the
//! offline `LocalHints` both implement it, and tests plug in fakes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::bank::ProblemBank;
use crate::config::Prompts;
use crate::error::AppError;
use crate::util::fill_template;

/// How explicit a hint should be, derived from the attempt number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HintTier {
  Vague,
  Conceptual,
  NearReveal,
  Reveal,
}

impl HintTier {
  pub fn for_attempt(attempt: u32) -> Self {
    match attempt {
      0 | 1 => HintTier::Vague,
      2 => HintTier::Conceptual,
      3 => HintTier::NearReveal,
      _ => HintTier::Reveal,
    }
  }
}

/// Payload handed to the collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HintRequest {
  /// 1-based attempt ordinal; 4 and above asks for the full solution.
  pub tier: u32,
  pub problem_id: String,
  pub buggy_code: String,
  pub user_message: String,
}

impl HintRequest {
  pub fn level(&self) -> HintTier {
    HintTier::for_attempt(self.tier)
  }
}

/// Build the system prompt for a request from the configured template.
pub fn hint_prompt(prompts: &Prompts, req: &HintRequest) -> String {
  let try_number = req.tier.to_string();
  fill_template(
    &prompts.hint_system,
    &[
      ("try_number", try_number.as_str()),
      ("problem", req.problem_id.as_str()),
      ("code", req.buggy_code.as_str()),
    ],
  )
}

#[async_trait]
pub trait HintGenerator: Send + Sync {
  fn name(&self) -> &'static str;

  /// Produce the assistant's reply. Any failure is reported as
  /// `AppError::CollaboratorUnavailable`.
  async fn generate_hint(&self, prompts: &Prompts, req: &HintRequest) -> Result<String, AppError>;
}

/// Offline collaborator serving the bank's human-authored hints,
/// then the reference solution once the tiers run out.
pub struct LocalHints {
  bank: Arc<ProblemBank>,
}

impl LocalHints {
  pub fn new(bank: Arc<ProblemBank>) -> Self {
    Self { bank }
  }
}

#[async_trait]
impl HintGenerator for LocalHints {
  fn name(&self) -> &'static str {
    "local"
  }

  async fn generate_hint(&self, _prompts: &Prompts, req: &HintRequest) -> Result<String, AppError> {
    let problem = self.bank.get(&req.problem_id)?;
    let idx = req.tier.max(1) as usize - 1;
    match (req.level(), problem.hints.get(idx)) {
      (HintTier::Reveal, _) | (_, None) => Ok(format!(
        "Here is the corrected code:\n\n```python\n{}\n```",
        problem.solution.trim()
      )),
      (_, Some(hint)) => Ok(format!("Hint {}: {}", idx + 1, hint)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::seed_problems;

  fn request(tier: u32) -> HintRequest {
    HintRequest {
      tier,
      problem_id: "Binary Search".into(),
      buggy_code: "right = len(arr)".into(),
      user_message: "where is the bug?".into(),
    }
  }

  #[test]
  fn tiers_scale_with_attempts() {
    assert_eq!(HintTier::for_attempt(1), HintTier::Vague);
    assert_eq!(HintTier::for_attempt(2), HintTier::Conceptual);
    assert_eq!(HintTier::for_attempt(3), HintTier::NearReveal);
    assert_eq!(HintTier::for_attempt(4), HintTier::Reveal);
    assert_eq!(HintTier::for_attempt(9), HintTier::Reveal);
  }

  #[test]
  fn prompt_carries_tier_problem_and_code() {
    let prompt = hint_prompt(&Prompts::default(), &request(3));
    assert!(prompt.contains("Current try number: 3"));
    assert!(prompt.contains("Problem: Binary Search"));
    assert!(prompt.contains("right = len(arr)"));
    assert!(!prompt.contains("{code}"));
  }

  #[tokio::test]
  async fn local_hints_walk_the_stored_tiers_then_reveal() {
    let bank = Arc::new(ProblemBank::new(seed_problems()).unwrap());
    let local = LocalHints::new(bank);
    let prompts = Prompts::default();

    let first = local.generate_hint(&prompts, &request(1)).await.unwrap();
    assert_eq!(first, "Hint 1: Check the right pointer initialization");
    let third = local.generate_hint(&prompts, &request(3)).await.unwrap();
    assert_eq!(third, "Hint 3: Array index out of bounds possible");

    let reveal = local.generate_hint(&prompts, &request(4)).await.unwrap();
    assert!(reveal.contains("right = len(arr) - 1"));
    assert!(reveal.contains("mid = (left + right) // 2"));
  }

  #[tokio::test]
  async fn local_hints_reject_unknown_problem() {
    let bank = Arc::new(ProblemBank::new(seed_problems()).unwrap());
    let mut req = request(1);
    req.problem_id = "Nope".into();
    let err = LocalHints::new(bank).generate_hint(&Prompts::default(), &req).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidProblemReference(_)));
  }
}
