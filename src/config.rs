//! Runtime configuration: environment settings plus prompt templates that can be
//! overridden from TOML.
//!
//! See `AgentConfig` and `Prompts` for expected schema.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

/// Settings read from the process environment (after `.env` is applied).
#[derive(Clone, Debug)]
pub struct Settings {
  pub port: u16,
  pub data_dir: PathBuf,
}

impl Settings {
  pub fn from_env() -> Self {
    let port = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()).unwrap_or(3000);
    let data_dir = std::env::var("DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("./data"));
    Self { port, data_dir }
  }
}

/// Connection settings for the chat-completions endpoint.
#[derive(Clone, Debug)]
pub struct ModelSettings {
  pub api_key: String,
  pub base_url: String,
  pub fast_model: String,
  pub strong_model: String,
  pub timeout: Duration,
}

impl ModelSettings {
  /// `None` when OPENAI_API_KEY is unset: content generation then always uses fallbacks.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url = std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://openrouter.ai/api/v1".into());
    let fast_model =
      std::env::var("OPENAI_FAST_MODEL").unwrap_or_else(|_| "meta-llama/llama-3.2-3b-instruct:free".into());
    let strong_model = std::env::var("OPENAI_STRONG_MODEL").unwrap_or_else(|_| fast_model.clone());
    let timeout_secs = std::env::var("OPENAI_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(20);
    Some(Self { api_key, base_url, fast_model, strong_model, timeout: Duration::from_secs(timeout_secs) })
  }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts used by the content generator. Any field left out of the TOML keeps
/// its default.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  // Quiz from source text: {question_count}, {content}
  pub quiz_system: String,
  pub quiz_user_template: String,
  // Quest line from a goal: {goal}, {context}
  pub quest_system: String,
  pub quest_user_template: String,
  // Coding challenge: {difficulty}, {topic}
  pub challenge_system: String,
  pub challenge_user_template: String,
  // Solution judgment: {title}, {description}, {test_cases}, {code}
  pub evaluation_system: String,
  pub evaluation_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      quiz_system: "You write multiple-choice quizzes for learners. Respond ONLY with strict JSON.".into(),
      quiz_user_template: "Write {question_count} multiple-choice questions about the content below, getting harder as they go.\n\nCONTENT:\n{content}\n\nReturn JSON: {\"title\": string, \"questions\": [{\"question\": string, \"options\": [4 strings], \"correct_index\": 0-3, \"explanation\": string}]}".into(),
      quest_system: "You are an RPG quest master who turns real goals into quest lines. Respond ONLY with strict JSON.".into(),
      quest_user_template: "GOAL: {goal}\nCONTEXT: {context}\n\nSplit the goal into 4-6 achievable quests with RPG flavour, plus one final boss quest.\nReturn JSON: {\"goal\": string, \"quests\": [{\"id\": int, \"title\": string, \"description\": string, \"xp_reward\": int, \"difficulty\": \"Easy\"|\"Normal\"|\"Hard\"|\"Epic\"}], \"boss_quest\": {same fields, \"difficulty\": \"Epic\"}}\nXP by difficulty: Easy=15, Normal=25, Hard=40, Epic=100.".into(),
      challenge_system: "You design short Python coding challenges. Respond ONLY with strict JSON.".into(),
      challenge_user_template: "Create one {difficulty} Python challenge about {topic}.\nEasy: loops, conditionals, simple math. Medium: data structures, strings, basic algorithms. Hard: recursion, dynamic programming.\nReturn JSON: {\"title\": string, \"description\": string, \"starter_code\": string, \"test_cases\": [Python assert statements], \"hints\": [strings]}".into(),
      evaluation_system: "You review Python solutions against test cases. Be strict and concise. Respond ONLY with strict JSON.".into(),
      evaluation_user_template: "CHALLENGE: {title}\nDESCRIPTION: {description}\nTEST CASES:\n{test_cases}\n\nSUBMITTED CODE:\n{code}\n\nJudge whether the code passes every test case, handles edge cases, and is reasonably efficient.\nReturn JSON: {\"passed\": bool, \"feedback\": string, \"tests_passed\": int, \"total_tests\": int, \"is_optimal\": bool}".into(),
    }
  }
}

pub fn parse_agent_config(raw: &str) -> Result<AgentConfig, toml::de::Error> {
  toml::from_str::<AgentConfig>(raw)
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_agent_config(&s) {
      Ok(cfg) => {
        info!(target: "gamify", %path, "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "gamify", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "gamify", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_prompt_override_keeps_defaults() {
    let cfg = parse_agent_config("[prompts]\nquiz_system = \"Be brief.\"\n").unwrap();
    assert_eq!(cfg.prompts.quiz_system, "Be brief.");
    assert_eq!(cfg.prompts.quest_system, Prompts::default().quest_system);
  }

  #[test]
  fn empty_config_is_valid() {
    let cfg = parse_agent_config("").unwrap();
    assert!(cfg.prompts.evaluation_user_template.contains("{code}"));
  }

  #[test]
  fn malformed_config_is_an_error() {
    assert!(parse_agent_config("[prompts\nquiz_system = 1").is_err());
  }
}
