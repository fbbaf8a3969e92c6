//! Minimal chat-completions client for content generation and solution review.
//!
//! Works against any OpenAI-compatible endpoint (OpenRouter by default). Every
//! model reply is parsed and schema-validated here; callers only ever see a
//! well-formed `Quiz`/`QuestLine`/`CodeChallenge`/`ChallengeVerdict` or a
//! `GenerationError`.
//!
//! NOTE: We never log the API key or full payloads.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::{ModelSettings, Prompts};
use crate::domain::{
  ChallengeDifficulty, ChallengeVerdict, CodeChallenge, Quest, QuestDifficulty, QuestLine, Quiz, QuizQuestion,
};
use crate::scoring::quiz_total_xp;
use crate::util::{fill_template, preview, strip_code_fences};

/// Longest slice of source text sent with a quiz request.
const MAX_SOURCE_CHARS: usize = 4000;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("model endpoint returned HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("model output is not valid JSON: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("model output failed validation: {0}")]
  Invalid(String),
}

fn invalid(msg: impl Into<String>) -> GenerationError {
  GenerationError::Invalid(msg.into())
}

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub fast_model: String,
  pub strong_model: String,
}

impl OpenAI {
  /// Construct the client if OPENAI_API_KEY is set; otherwise return None.
  pub fn from_env() -> Option<Self> {
    Self::new(ModelSettings::from_env()?)
  }

  pub fn new(settings: ModelSettings) -> Option<Self> {
    let client = reqwest::Client::builder().timeout(settings.timeout).build().ok()?;
    Some(Self {
      client,
      api_key: settings.api_key,
      base_url: settings.base_url.trim_end_matches('/').to_string(),
      fast_model: settings.fast_model,
      strong_model: settings.strong_model,
    })
  }

  /// JSON-object chat completion; returns the raw message content.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  async fn chat_json(&self, model: &str, system: &str, user: &str, temperature: f32) -> Result<String, GenerationError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };

    let start = std::time::Instant::now();
    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "gamify-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req)
      .send()
      .await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or_else(|| preview(&body, 200));
      error!(status, elapsed = ?start.elapsed(), "Model endpoint returned an error");
      return Err(GenerationError::Status { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "Model usage");
    }
    let text = body.choices.into_iter().next().and_then(|c| c.message.content).unwrap_or_default();
    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Model response received");
    Ok(text)
  }

  #[instrument(level = "info", skip(self, prompts, content), fields(content_len = content.len()))]
  pub async fn generate_quiz(&self, prompts: &Prompts, content: &str, question_count: usize) -> Result<Quiz, GenerationError> {
    let source = preview(content, MAX_SOURCE_CHARS);
    let count = question_count.to_string();
    let user = fill_template(&prompts.quiz_user_template, &[("question_count", &count), ("content", &source)]);
    let text = self.chat_json(&self.fast_model, &prompts.quiz_system, &user, 0.7).await?;
    parse_quiz(&text)
  }

  #[instrument(level = "info", skip(self, prompts, goal, context), fields(goal_len = goal.len(), context_len = context.len()))]
  pub async fn generate_quest_line(&self, prompts: &Prompts, goal: &str, context: &str) -> Result<QuestLine, GenerationError> {
    let context = if context.trim().is_empty() { "None provided" } else { context };
    let user = fill_template(&prompts.quest_user_template, &[("goal", goal), ("context", context)]);
    let text = self.chat_json(&self.fast_model, &prompts.quest_system, &user, 0.8).await?;
    parse_quest_line(&text)
  }

  #[instrument(level = "info", skip(self, prompts), fields(difficulty = difficulty.as_str()))]
  pub async fn generate_challenge(
    &self,
    prompts: &Prompts,
    difficulty: ChallengeDifficulty,
    topic: &str,
  ) -> Result<CodeChallenge, GenerationError> {
    let user = fill_template(&prompts.challenge_user_template, &[("difficulty", difficulty.as_str()), ("topic", topic)]);
    let text = self.chat_json(&self.fast_model, &prompts.challenge_system, &user, 0.8).await?;
    parse_challenge(&text, difficulty)
  }

  #[instrument(level = "info", skip(self, prompts, challenge, code), fields(challenge_id = %challenge.id, code_len = code.len()))]
  pub async fn evaluate_challenge(
    &self,
    prompts: &Prompts,
    challenge: &CodeChallenge,
    code: &str,
  ) -> Result<ChallengeVerdict, GenerationError> {
    let test_cases = challenge.test_cases.join("\n");
    let user = fill_template(
      &prompts.evaluation_user_template,
      &[
        ("title", &challenge.title),
        ("description", &challenge.description),
        ("test_cases", &test_cases),
        ("code", code),
      ],
    );
    let text = self.chat_json(&self.strong_model, &prompts.evaluation_system, &user, 0.2).await?;
    parse_verdict(&text)
  }
}

// --- Model payloads and validation ---

fn decode<T: for<'a> Deserialize<'a>>(text: &str) -> Result<T, GenerationError> {
  Ok(serde_json::from_str::<T>(strip_code_fences(text))?)
}

#[derive(Deserialize)]
struct QuizPayload {
  title: String,
  questions: Vec<QuizQuestion>,
}

pub fn parse_quiz(text: &str) -> Result<Quiz, GenerationError> {
  let p: QuizPayload = decode(text)?;
  if p.title.trim().is_empty() {
    return Err(invalid("quiz title is empty"));
  }
  if p.questions.is_empty() {
    return Err(invalid("quiz has no questions"));
  }
  for (i, q) in p.questions.iter().enumerate() {
    if q.options.len() < 2 {
      return Err(invalid(format!("question {i} has fewer than two options")));
    }
    if q.correct_index >= q.options.len() {
      return Err(invalid(format!("question {i} correct_index {} out of range", q.correct_index)));
    }
  }
  let total_xp = quiz_total_xp(p.questions.len());
  Ok(Quiz { title: p.title, questions: p.questions, total_xp })
}

#[derive(Deserialize)]
struct QuestPayload {
  id: i64,
  title: String,
  #[serde(default)]
  description: String,
  xp_reward: u64,
  #[serde(default)]
  difficulty: QuestDifficulty,
}

impl From<QuestPayload> for Quest {
  fn from(p: QuestPayload) -> Self {
    Quest {
      id: p.id,
      title: p.title,
      description: p.description,
      xp_reward: p.xp_reward,
      completed: false,
      difficulty: p.difficulty,
    }
  }
}

#[derive(Deserialize)]
struct QuestLinePayload {
  goal: String,
  quests: Vec<QuestPayload>,
  #[serde(default)]
  boss_quest: Option<QuestPayload>,
}

pub fn parse_quest_line(text: &str) -> Result<QuestLine, GenerationError> {
  let p: QuestLinePayload = decode(text)?;
  if p.goal.trim().is_empty() {
    return Err(invalid("quest line goal is empty"));
  }
  if p.quests.is_empty() {
    return Err(invalid("quest line has no quests"));
  }
  let quests: Vec<Quest> = p.quests.into_iter().map(Quest::from).collect();
  let boss_quest = p.boss_quest.map(Quest::from);
  let total_xp = quests
    .iter()
    .chain(boss_quest.as_ref())
    .try_fold(0u64, |acc, q| acc.checked_add(q.xp_reward))
    .ok_or_else(|| invalid("quest xp overflows"))?;
  Ok(QuestLine { goal: p.goal, quests, total_xp, boss_quest })
}

#[derive(Deserialize)]
struct ChallengePayload {
  title: String,
  description: String,
  #[serde(default)]
  starter_code: String,
  test_cases: Vec<String>,
  #[serde(default)]
  hints: Vec<String>,
}

pub fn parse_challenge(text: &str, difficulty: ChallengeDifficulty) -> Result<CodeChallenge, GenerationError> {
  let p: ChallengePayload = decode(text)?;
  if p.title.trim().is_empty() {
    return Err(invalid("challenge title is empty"));
  }
  if p.test_cases.iter().all(|t| t.trim().is_empty()) {
    return Err(invalid("challenge has no test cases"));
  }
  Ok(CodeChallenge {
    id: Uuid::new_v4().to_string(),
    title: p.title,
    description: p.description,
    difficulty,
    starter_code: p.starter_code,
    test_cases: p.test_cases,
    hints: p.hints,
    xp_reward: difficulty.xp_reward(),
  })
}

pub fn parse_verdict(text: &str) -> Result<ChallengeVerdict, GenerationError> {
  decode(text)
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an OpenAI-style error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_fenced_quiz_and_prices_it() {
    let text = r#"```json
{"title": "Ownership", "questions": [
  {"question": "Who frees a Box?", "options": ["the owner", "GC"], "correct_index": 0, "explanation": "Drop"},
  {"question": "Is &mut aliasable?", "options": ["yes", "no"], "correct_index": 1}
]}
```"#;
    let quiz = parse_quiz(text).unwrap();
    assert_eq!(quiz.title, "Ownership");
    assert_eq!(quiz.questions.len(), 2);
    assert_eq!(quiz.questions[1].explanation, "");
    assert_eq!(quiz.total_xp, 40);
  }

  #[test]
  fn rejects_quiz_with_out_of_range_answer() {
    let text = r#"{"title": "T", "questions": [{"question": "q", "options": ["a", "b"], "correct_index": 2}]}"#;
    assert!(matches!(parse_quiz(text), Err(GenerationError::Invalid(_))));
  }

  #[test]
  fn rejects_non_json_and_empty_quizzes() {
    assert!(matches!(parse_quiz("Sure! Here is your quiz."), Err(GenerationError::Parse(_))));
    assert!(matches!(parse_quiz(r#"{"title": "T", "questions": []}"#), Err(GenerationError::Invalid(_))));
  }

  #[test]
  fn quest_line_total_includes_boss() {
    let text = r#"{"goal": "Run a marathon", "quests": [
      {"id": 1, "title": "Buy shoes", "description": "d", "xp_reward": 15, "difficulty": "Easy"},
      {"id": 2, "title": "Run 10k", "description": "d", "xp_reward": 40, "difficulty": "Hard"}
    ], "boss_quest": {"id": 99, "title": "Race day", "description": "d", "xp_reward": 100, "difficulty": "Epic"}}"#;
    let line = parse_quest_line(text).unwrap();
    assert_eq!(line.total_xp, 155);
    assert_eq!(line.quests[1].difficulty, QuestDifficulty::Hard);
    assert!(line.quests.iter().all(|q| !q.completed));
    assert_eq!(line.boss_quest.unwrap().id, 99);
  }

  #[test]
  fn quest_line_without_boss_is_accepted() {
    let text = r#"{"goal": "g", "quests": [{"id": 1, "title": "t", "xp_reward": 25}]}"#;
    let line = parse_quest_line(text).unwrap();
    assert!(line.boss_quest.is_none());
    assert_eq!(line.total_xp, 25);
  }

  #[test]
  fn quest_line_with_overflowing_xp_is_rejected() {
    let text = r#"{"goal": "g", "quests": [{"id": 1, "title": "t", "xp_reward": 18446744073709551615}],
      "boss_quest": {"id": 99, "title": "b", "xp_reward": 1}}"#;
    assert!(matches!(parse_quest_line(text), Err(GenerationError::Invalid(_))));
  }

  #[test]
  fn challenge_reward_follows_difficulty() {
    let text = r#"{"title": "Reverse", "description": "Reverse a string", "starter_code": "def solution(s):\n    pass",
      "test_cases": ["assert solution('ab') == 'ba'"], "hints": ["slicing"]}"#;
    let ch = parse_challenge(text, ChallengeDifficulty::Hard).unwrap();
    assert_eq!(ch.xp_reward, 70);
    assert_eq!(ch.difficulty, ChallengeDifficulty::Hard);
    assert!(!ch.id.is_empty());
  }

  #[test]
  fn challenge_without_tests_is_rejected() {
    let text = r#"{"title": "T", "description": "d", "test_cases": []}"#;
    assert!(parse_challenge(text, ChallengeDifficulty::Easy).is_err());
  }

  #[test]
  fn verdict_defaults_optional_fields() {
    let v = parse_verdict(r#"{"passed": true, "feedback": "Nice"}"#).unwrap();
    assert!(v.passed);
    assert!(!v.is_optimal);
    assert_eq!(v.total_tests, 0);
  }

  #[test]
  fn extracts_error_message() {
    let body = r#"{"error": {"message": "rate limited", "code": 429}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("rate limited"));
    assert!(extract_openai_error("<html>").is_none());
  }
}
