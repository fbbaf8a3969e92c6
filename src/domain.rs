//! Domain models used by the backend: the persisted progress record, activity
//! kinds, and the generated content kinds (quiz, quest-line, code challenge).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single user's progression record, persisted as one JSON document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProgress {
  pub xp: u64,
  pub level: u64,
  pub streak_days: u32,
  /// Serialized as `YYYY-MM-DD`.
  pub last_active: Option<NaiveDate>,
  /// Unlocked achievement ids in unlock order, no duplicates.
  pub achievements: Vec<String>,
  pub stories_completed: u32,
  pub quizzes_passed: u32,
  pub masters_completed: u32,
  pub cases_solved: u32,
}

impl Default for UserProgress {
  fn default() -> Self {
    Self {
      xp: 0,
      level: 1,
      streak_days: 0,
      last_active: None,
      achievements: Vec::new(),
      stories_completed: 0,
      quizzes_passed: 0,
      masters_completed: 0,
      cases_solved: 0,
    }
  }
}

impl UserProgress {
  pub fn has_achievement(&self, id: &str) -> bool {
    self.achievements.iter().any(|a| a == id)
  }

  pub fn counter_mut(&mut self, kind: StatKind) -> &mut u32 {
    match kind {
      StatKind::Stories => &mut self.stories_completed,
      StatKind::Quizzes => &mut self.quizzes_passed,
      StatKind::Masters => &mut self.masters_completed,
      StatKind::Cases => &mut self.cases_solved,
    }
  }
}

/// Activity counters tracked on `UserProgress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
  Stories,
  Quizzes,
  Masters,
  Cases,
}

impl StatKind {
  pub fn as_str(self) -> &'static str {
    match self {
      StatKind::Stories => "stories",
      StatKind::Quizzes => "quizzes",
      StatKind::Masters => "masters",
      StatKind::Cases => "cases",
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub question: String,
  pub options: Vec<String>,
  pub correct_index: usize,
  #[serde(default)]
  pub explanation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quiz {
  pub title: String,
  pub questions: Vec<QuizQuestion>,
  pub total_xp: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestDifficulty {
  Easy,
  #[default]
  Normal,
  Hard,
  Epic,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quest {
  pub id: i64,
  pub title: String,
  pub description: String,
  pub xp_reward: u64,
  #[serde(default)]
  pub completed: bool,
  #[serde(default)]
  pub difficulty: QuestDifficulty,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestLine {
  pub goal: String,
  pub quests: Vec<Quest>,
  pub total_xp: u64,
  #[serde(default)]
  pub boss_quest: Option<Quest>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeDifficulty {
  #[default]
  Easy,
  Medium,
  Hard,
}

impl ChallengeDifficulty {
  /// Base XP for solving a challenge of this tier.
  pub fn xp_reward(self) -> u64 {
    match self {
      ChallengeDifficulty::Easy => 20,
      ChallengeDifficulty::Medium => 40,
      ChallengeDifficulty::Hard => 70,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      ChallengeDifficulty::Easy => "Easy",
      ChallengeDifficulty::Medium => "Medium",
      ChallengeDifficulty::Hard => "Hard",
    }
  }
}

/// Core challenge structure held in the challenge session store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CodeChallenge {
  /// Same id the challenge is stored under.
  pub id: String,
  pub title: String,
  pub description: String,
  pub difficulty: ChallengeDifficulty,
  pub starter_code: String,
  pub test_cases: Vec<String>,
  pub hints: Vec<String>,
  pub xp_reward: u64,
}

/// Judgment returned by the evaluator for a submitted solution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChallengeVerdict {
  pub passed: bool,
  pub feedback: String,
  #[serde(default)]
  pub tests_passed: u32,
  #[serde(default)]
  pub total_tests: u32,
  #[serde(default)]
  pub is_optimal: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn progress_document_round_trips_with_iso_dates() {
    let mut p = UserProgress::default();
    p.last_active = NaiveDate::from_ymd_opt(2024, 3, 9);
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["last_active"], "2024-03-09");
    assert_eq!(json["level"], 1);
  }

  #[test]
  fn partial_progress_document_fills_defaults() {
    let p: UserProgress = serde_json::from_str(r#"{"xp": 250, "achievements": ["level_5"]}"#).unwrap();
    assert_eq!(p.xp, 250);
    assert_eq!(p.streak_days, 0);
    assert!(p.last_active.is_none());
    assert!(p.has_achievement("level_5"));
  }

  #[test]
  fn stat_kind_parses_lowercase_names() {
    let k: StatKind = serde_json::from_str("\"cases\"").unwrap();
    assert_eq!(k, StatKind::Cases);
    assert!(serde_json::from_str::<StatKind>("\"quests\"").is_err());
  }

  #[test]
  fn quest_difficulty_defaults_to_normal() {
    let q: Quest = serde_json::from_str(r#"{"id":1,"title":"t","description":"d","xp_reward":25}"#).unwrap();
    assert_eq!(q.difficulty, QuestDifficulty::Normal);
    assert!(!q.completed);
  }
}
