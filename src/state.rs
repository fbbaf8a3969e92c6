//! Application state: session stores, the progression engine, prompts and the
//! optional model client.
//!
//! Content generation always yields something usable: the model when it is
//! configured and answers with valid content, otherwise a built-in fallback.

use std::path::Path;

use tracing::{debug, error, info, instrument, warn};

use crate::config::{load_agent_config_from_env, Prompts};
use crate::domain::{ChallengeDifficulty, ChallengeVerdict, CodeChallenge, QuestLine, Quiz};
use crate::openai::OpenAI;
use crate::progression::Progression;
use crate::seeds::{fallback_challenge, fallback_quest_line, fallback_quiz};
use crate::sessions::SessionStore;
use crate::store::ProgressStore;

/// Where a piece of content came from; logged with every generation.
pub const ORIGIN_MODEL: &str = "model_generated";
pub const ORIGIN_FALLBACK: &str = "fallback";

pub struct AppState {
    pub quizzes: SessionStore<Quiz>,
    pub quest_lines: SessionStore<QuestLine>,
    pub challenges: SessionStore<CodeChallenge>,
    pub progress: Progression,
    pub openai: Option<OpenAI>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load prompt overrides, open the progress store, init the model client.
    #[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display()))]
    pub fn from_env(data_dir: &Path) -> Self {
        let prompts = load_agent_config_from_env().map(|c| c.prompts).unwrap_or_default();

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "gamify", base_url = %oa.base_url, fast_model = %oa.fast_model, strong_model = %oa.strong_model, "Content generation enabled.");
        } else {
            info!(target: "gamify", "Content generation disabled (no OPENAI_API_KEY). Serving fallback content.");
        }

        Self::new(data_dir, openai, prompts)
    }

    pub fn new(data_dir: &Path, openai: Option<OpenAI>, prompts: Prompts) -> Self {
        let store = ProgressStore::in_dir(data_dir);
        debug!(target: "progress", path = %store.path().display(), "Progress document location");
        Self {
            quizzes: SessionStore::new("quiz"),
            quest_lines: SessionStore::new("quest line"),
            challenges: SessionStore::new("challenge"),
            progress: Progression::new(store),
            openai,
            prompts,
        }
    }

    #[instrument(level = "info", skip(self, content), fields(content_len = content.len()))]
    pub async fn generate_quiz(&self, content: &str, question_count: usize) -> (Quiz, &'static str) {
        if let Some(oa) = &self.openai {
            match oa.generate_quiz(&self.prompts, content, question_count).await {
                Ok(quiz) => return (quiz, ORIGIN_MODEL),
                Err(e) => error!(target: "content", error = %e, "Quiz generation failed; using fallback"),
            }
        }
        warn!(target: "content", "Serving fallback quiz");
        (fallback_quiz(), ORIGIN_FALLBACK)
    }

    #[instrument(level = "info", skip(self, goal, context), fields(goal_len = goal.len()))]
    pub async fn generate_quest_line(&self, goal: &str, context: &str) -> (QuestLine, &'static str) {
        if let Some(oa) = &self.openai {
            match oa.generate_quest_line(&self.prompts, goal, context).await {
                Ok(line) => return (line, ORIGIN_MODEL),
                Err(e) => error!(target: "content", error = %e, "Quest generation failed; using fallback"),
            }
        }
        warn!(target: "content", "Serving fallback quest line");
        (fallback_quest_line(goal), ORIGIN_FALLBACK)
    }

    #[instrument(level = "info", skip(self), fields(difficulty = difficulty.as_str()))]
    pub async fn generate_challenge(&self, difficulty: ChallengeDifficulty, topic: &str) -> (CodeChallenge, &'static str) {
        if let Some(oa) = &self.openai {
            match oa.generate_challenge(&self.prompts, difficulty, topic).await {
                Ok(ch) => return (ch, ORIGIN_MODEL),
                Err(e) => error!(target: "content", error = %e, "Challenge generation failed; using fallback"),
            }
        }
        warn!(target: "content", "Serving fallback challenge");
        (fallback_challenge(), ORIGIN_FALLBACK)
    }

    /// Judge a submission. Any evaluator failure becomes a failed verdict whose
    /// feedback describes the error.
    #[instrument(level = "info", skip(self, challenge, code), fields(challenge_id = %challenge.id, code_len = code.len()))]
    pub async fn evaluate_challenge(&self, challenge: &CodeChallenge, code: &str) -> ChallengeVerdict {
        let failure = match &self.openai {
            Some(oa) => match oa.evaluate_challenge(&self.prompts, challenge, code).await {
                Ok(verdict) => return verdict,
                Err(e) => {
                    error!(target: "content", error = %e, "Solution evaluation failed");
                    format!("Error evaluating solution: {e}")
                }
            },
            None => "Error evaluating solution: no evaluator is configured.".to_string(),
        };
        ChallengeVerdict {
            passed: false,
            feedback: failure,
            tests_passed: 0,
            total_tests: challenge.test_cases.len() as u32,
            is_optimal: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSettings;
    use std::time::Duration;

    fn unreachable_model() -> OpenAI {
        OpenAI::new(ModelSettings {
            api_key: "test-key".into(),
            // Nothing listens on the discard port.
            base_url: "http://127.0.0.1:9/v1".into(),
            fast_model: "m".into(),
            strong_model: "m".into(),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn falls_back_without_a_model() {
        let tmp = tempfile::tempdir().unwrap();
        let state = AppState::new(tmp.path(), None, Prompts::default());

        let (quiz, origin) = state.generate_quiz("Rust has ownership.", 5).await;
        assert_eq!(origin, ORIGIN_FALLBACK);
        assert_eq!(quiz.total_xp, 10);

        let (line, _) = state.generate_quest_line("Learn Rust", "").await;
        assert_eq!(line.total_xp, 180);

        let (ch, _) = state.generate_challenge(ChallengeDifficulty::Hard, "math").await;
        assert_eq!(ch.xp_reward, 20);
        assert!(!ch.test_cases.is_empty());

        let verdict = state.evaluate_challenge(&ch, "def solution(a, b): return a + b").await;
        assert!(!verdict.passed);
        assert!(verdict.feedback.starts_with("Error evaluating solution"));
    }

    #[tokio::test]
    async fn falls_back_when_the_model_is_unreachable() {
        let tmp = tempfile::tempdir().unwrap();
        let state = AppState::new(tmp.path(), Some(unreachable_model()), Prompts::default());

        let (quiz, origin) = state.generate_quiz("text", 3).await;
        assert_eq!(origin, ORIGIN_FALLBACK);
        assert!(!quiz.questions.is_empty());

        let (line, origin) = state.generate_quest_line("Write a book", "weekends only").await;
        assert_eq!(origin, ORIGIN_FALLBACK);
        assert!(line.boss_quest.is_some());

        let (ch, origin) = state.generate_challenge(ChallengeDifficulty::Medium, "strings").await;
        assert_eq!(origin, ORIGIN_FALLBACK);
        assert_eq!(ch.title, "Sum Two Numbers");

        let verdict = state.evaluate_challenge(&ch, "pass").await;
        assert!(!verdict.passed);
        assert!(!verdict.is_optimal);
    }
}
