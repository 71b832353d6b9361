use std::collections::HashSet;
use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::TestType;

static QUESTIONS_DIR: Dir = include_dir!("src/questions");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqQuestion {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingQuestion {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub test_cases: Vec<TestCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_solution: Option<String>,
    /// Editor contents at session start; falls back to the bank's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starter_code: Option<String>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank `{0}` not found")]
    NotFound(String),
    #[error("question bank `{0}` is not valid utf-8")]
    Encoding(String),
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question bank has no {0} questions")]
    Empty(TestType),
    #[error("duplicate {kind} question id {id}")]
    DuplicateId { kind: TestType, id: u32 },
    #[error("mcq question {0} has no options")]
    NoOptions(u32),
    #[error("mcq question {id} marks option {answer} correct but has {options} options")]
    CorrectAnswerOutOfRange { id: u32, answer: usize, options: usize },
}

/// Read-only reference data for both question sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub name: String,
    pub default_code: String,
    pub mcq: Vec<McqQuestion>,
    pub coding: Vec<CodingQuestion>,
}

impl QuestionBank {
    /// The bank compiled into the binary
    pub fn builtin() -> Result<Self, QuestionBankError> {
        Self::embedded("default")
    }

    pub fn embedded(name: &str) -> Result<Self, QuestionBankError> {
        let file_name = format!("{}.json", name);
        let file = QUESTIONS_DIR
            .get_file(&file_name)
            .ok_or_else(|| QuestionBankError::NotFound(file_name.clone()))?;
        let contents = file
            .contents_utf8()
            .ok_or(QuestionBankError::Encoding(file_name))?;
        Self::from_json(contents)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, QuestionBankError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, QuestionBankError> {
        let bank: QuestionBank = serde_json::from_str(json)?;
        bank.validate()?;
        Ok(bank)
    }

    pub fn validate(&self) -> Result<(), QuestionBankError> {
        if self.mcq.is_empty() {
            return Err(QuestionBankError::Empty(TestType::Mcq));
        }
        if self.coding.is_empty() {
            return Err(QuestionBankError::Empty(TestType::Coding));
        }

        let mut seen = HashSet::new();
        for q in &self.mcq {
            if !seen.insert(q.id) {
                return Err(QuestionBankError::DuplicateId {
                    kind: TestType::Mcq,
                    id: q.id,
                });
            }
            if q.options.is_empty() {
                return Err(QuestionBankError::NoOptions(q.id));
            }
            if let Some(answer) = q.correct_answer {
                if answer >= q.options.len() {
                    return Err(QuestionBankError::CorrectAnswerOutOfRange {
                        id: q.id,
                        answer,
                        options: q.options.len(),
                    });
                }
            }
        }

        seen.clear();
        for q in &self.coding {
            if !seen.insert(q.id) {
                return Err(QuestionBankError::DuplicateId {
                    kind: TestType::Coding,
                    id: q.id,
                });
            }
        }

        Ok(())
    }

    pub fn question_count(&self, test_type: TestType) -> usize {
        match test_type {
            TestType::Mcq => self.mcq.len(),
            TestType::Coding => self.coding.len(),
        }
    }

    pub fn mcq_by_id(&self, id: u32) -> Option<&McqQuestion> {
        self.mcq.iter().find(|q| q.id == id)
    }

    pub fn starter_code(&self, index: usize) -> &str {
        self.coding
            .get(index)
            .and_then(|q| q.starter_code.as_deref())
            .unwrap_or(&self.default_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn minimal_json(mcq: &str, coding: &str) -> String {
        format!(
            r#"{{"name":"t","default_code":"// code","mcq":[{}],"coding":[{}]}}"#,
            mcq, coding
        )
    }

    const CODING: &str = r#"{"id":1,"title":"T","description":"D","test_cases":[{"input":"1","output":"1"}]}"#;

    #[test]
    fn builtin_bank_loads() {
        let bank = QuestionBank::builtin().unwrap();

        assert_eq!(bank.name, "default");
        assert_eq!(bank.mcq.len(), 5);
        assert_eq!(bank.coding.len(), 1);
        assert_eq!(bank.coding[0].title, "Two Sum");
        assert_eq!(bank.coding[0].test_cases.len(), 3);
        assert!(bank.default_code.starts_with("function twoSum"));
    }

    #[test]
    fn builtin_mcq_fixture_contents() {
        let bank = QuestionBank::builtin().unwrap();
        let q = bank.mcq_by_id(1).unwrap();

        assert_eq!(q.text, "What is the capital of France?");
        assert_eq!(q.options[2], "Paris");
        assert_eq!(q.correct_answer, None);
    }

    #[test]
    fn unknown_embedded_bank() {
        assert_matches!(
            QuestionBank::embedded("nope"),
            Err(QuestionBankError::NotFound(name)) if name == "nope.json"
        );
    }

    #[test]
    fn rejects_empty_sets() {
        let json = minimal_json("", CODING);
        assert_matches!(
            QuestionBank::from_json(&json),
            Err(QuestionBankError::Empty(TestType::Mcq))
        );

        let json = minimal_json(r#"{"id":1,"text":"q","options":["a"]}"#, "");
        assert_matches!(
            QuestionBank::from_json(&json),
            Err(QuestionBankError::Empty(TestType::Coding))
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = minimal_json(
            r#"{"id":1,"text":"q","options":["a"]},{"id":1,"text":"r","options":["b"]}"#,
            CODING,
        );
        assert_matches!(
            QuestionBank::from_json(&json),
            Err(QuestionBankError::DuplicateId {
                kind: TestType::Mcq,
                id: 1
            })
        );
    }

    #[test]
    fn rejects_question_without_options() {
        let json = minimal_json(r#"{"id":7,"text":"q","options":[]}"#, CODING);
        assert_matches!(
            QuestionBank::from_json(&json),
            Err(QuestionBankError::NoOptions(7))
        );
    }

    #[test]
    fn rejects_correct_answer_out_of_range() {
        let json = minimal_json(
            r#"{"id":3,"text":"q","options":["a","b"],"correct_answer":2}"#,
            CODING,
        );
        assert_matches!(
            QuestionBank::from_json(&json),
            Err(QuestionBankError::CorrectAnswerOutOfRange {
                id: 3,
                answer: 2,
                options: 2
            })
        );
    }

    #[test]
    fn rejects_malformed_json() {
        assert_matches!(
            QuestionBank::from_json("{not json"),
            Err(QuestionBankError::Parse(_))
        );
    }

    #[test]
    fn loads_bank_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.json");
        let json = minimal_json(r#"{"id":9,"text":"q","options":["a","b"]}"#, CODING);
        fs::write(&path, json).unwrap();

        let bank = QuestionBank::from_path(&path).unwrap();
        assert_eq!(bank.mcq[0].id, 9);
        assert_eq!(bank.question_count(TestType::Mcq), 1);
        assert_eq!(bank.question_count(TestType::Coding), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert_matches!(
            QuestionBank::from_path("/definitely/not/here.json"),
            Err(QuestionBankError::Io(_))
        );
    }

    #[test]
    fn starter_code_prefers_question_template() {
        let mut bank = QuestionBank::builtin().unwrap();
        assert_eq!(bank.starter_code(0), bank.default_code);

        bank.coding[0].starter_code = Some("def two_sum(): pass".into());
        assert_eq!(bank.starter_code(0), "def two_sum(): pass");
        assert_eq!(bank.starter_code(42), bank.default_code);
    }
}
