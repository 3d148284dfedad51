use anyhow::Context;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bank compiled into the binary, used when no path is configured.
pub const DEFAULT_QUESTION_BANK: &str = include_str!("../../data/questions.json");

/// One multiple-choice question. The correct answer never leaves the server:
/// it is skipped on serialization so views can embed the question directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer", skip_serializing)]
    pub correct_answer: String,
}

#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Loads the bank from `path`, or the embedded default when `path` is None.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let raw = match path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read question bank at {}", path))?,
            None => DEFAULT_QUESTION_BANK.to_string(),
        };
        let questions: Vec<Question> =
            serde_json::from_str(&raw).context("failed to parse question bank JSON")?;
        Self::from_questions(questions)
    }

    pub fn from_questions(questions: Vec<Question>) -> anyhow::Result<Self> {
        if questions.is_empty() {
            anyhow::bail!("question bank is empty");
        }
        for (i, q) in questions.iter().enumerate() {
            if q.prompt.trim().is_empty() {
                anyhow::bail!("question {} has an empty prompt", i);
            }
            if q.options.len() < 2 {
                anyhow::bail!("question {} needs at least two options", i);
            }
            if !q.options.contains(&q.correct_answer) {
                anyhow::bail!(
                    "question {} lists a correct answer that is not among its options",
                    i
                );
            }
        }
        Ok(QuestionBank { questions })
    }

    /// Picks a question uniformly at random.
    pub fn pick(&self, rng: &mut impl Rng) -> &Question {
        &self.questions[rng.random_range(0..self.questions.len())]
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
