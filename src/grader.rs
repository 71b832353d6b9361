use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::questions::CodingQuestion;

/// Produces one pass/fail verdict per test case of a coding question.
///
/// Nothing here executes code. `RandomGrader` stands in for a sandboxed
/// executor; the session controller only depends on this trait.
///
/// Verdicts are positional. Extra verdicts are dropped and missing ones are
/// recorded as failures.
pub trait Grader: Send {
    fn evaluate(&mut self, question: &CodingQuestion, code: &str) -> Vec<bool>;
}

/// Coin flip per test case
#[derive(Debug)]
pub struct RandomGrader {
    rng: StdRng,
}

impl RandomGrader {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomGrader {
    fn default() -> Self {
        Self::new()
    }
}

impl Grader for RandomGrader {
    fn evaluate(&mut self, question: &CodingQuestion, _code: &str) -> Vec<bool> {
        question
            .test_cases
            .iter()
            .map(|_| self.rng.gen_bool(0.5))
            .collect()
    }
}

/// Returns the same verdict for every test case
#[derive(Debug, Clone, Copy)]
pub struct ConstGrader(pub bool);

impl Grader for ConstGrader {
    fn evaluate(&mut self, question: &CodingQuestion, _code: &str) -> Vec<bool> {
        vec![self.0; question.test_cases.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GraderKind {
    #[default]
    Random,
    AcceptAll,
    RejectAll,
}

impl GraderKind {
    pub fn build(self, seed: Option<u64>) -> Box<dyn Grader> {
        match self {
            GraderKind::Random => match seed {
                Some(seed) => Box::new(RandomGrader::seeded(seed)),
                None => Box::new(RandomGrader::new()),
            },
            GraderKind::AcceptAll => Box::new(ConstGrader(true)),
            GraderKind::RejectAll => Box::new(ConstGrader(false)),
        }
    }
}
