//! The read-only problem bank: ordered, id-unique, drawn from uniformly at random.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Problem, HINTS_PER_PROBLEM};
use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct ProblemBank {
  problems: Vec<Problem>,
  by_id: HashMap<String, usize>,
}

impl ProblemBank {
  /// Build a bank, rejecting duplicate ids, wrong hint counts and an empty set.
  pub fn new(problems: Vec<Problem>) -> Result<Self, AppError> {
    if problems.is_empty() {
      return Err(AppError::InvalidBank("no problems configured".into()));
    }

    let mut by_id = HashMap::with_capacity(problems.len());
    for (idx, p) in problems.iter().enumerate() {
      if p.id.trim().is_empty() {
        return Err(AppError::InvalidBank(format!("problem #{} has an empty id", idx)));
      }
      if p.hints.len() != HINTS_PER_PROBLEM {
        return Err(AppError::InvalidBank(format!(
          "problem '{}' has {} hints, expected {}",
          p.id,
          p.hints.len(),
          HINTS_PER_PROBLEM
        )));
      }
      if by_id.insert(p.id.clone(), idx).is_some() {
        return Err(AppError::InvalidBank(format!("duplicate problem id '{}'", p.id)));
      }
    }

    Ok(Self { problems, by_id })
  }

  pub fn len(&self) -> usize {
    self.problems.len()
  }

  pub fn is_empty(&self) -> bool {
    self.problems.is_empty()
  }

  pub fn ids(&self) -> impl Iterator<Item = &str> {
    self.problems.iter().map(|p| p.id.as_str())
  }

  /// Look up a problem; a miss means a session holds an id the bank never had.
  pub fn get(&self, id: &str) -> Result<&Problem, AppError> {
    self
      .by_id
      .get(id)
      .map(|&idx| &self.problems[idx])
      .ok_or_else(|| AppError::InvalidProblemReference(id.to_string()))
  }

  /// Uniform draw over all problems.
  pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &Problem {
    // `new` guarantees at least one problem.
    self.problems.choose(rng).unwrap_or(&self.problems[0])
  }
}
