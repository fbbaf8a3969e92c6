//! Static achievement catalog.

use serde::Serialize;

pub const FIRST_STORY: &str = "first_story";
pub const STORYTELLER: &str = "storyteller";
pub const QUIZ_NOVICE: &str = "quiz_novice";
pub const QUIZ_MASTER: &str = "quiz_master";
pub const MASTER_STUDENT: &str = "master_student";
pub const DETECTIVE: &str = "detective";
pub const SHERLOCK: &str = "sherlock";
pub const STREAK_3: &str = "streak_3";
pub const STREAK_7: &str = "streak_7";
pub const LEVEL_5: &str = "level_5";
pub const LEVEL_10: &str = "level_10";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AchievementDefinition {
  pub id: &'static str,
  pub name: &'static str,
  #[serde(rename = "desc")]
  pub description: &'static str,
  pub icon: &'static str,
}

const fn def(id: &'static str, name: &'static str, description: &'static str, icon: &'static str) -> AchievementDefinition {
  AchievementDefinition { id, name, description, icon }
}

pub const CATALOG: &[AchievementDefinition] = &[
  def(FIRST_STORY, "Story Seeker", "Complete your first story", "📖"),
  def(STORYTELLER, "Storyteller", "Complete 10 stories", "📚"),
  def(QUIZ_NOVICE, "Quiz Novice", "Pass your first quiz", "❓"),
  def(QUIZ_MASTER, "Quiz Master", "Get 100% on a quiz", "🎓"),
  def(MASTER_STUDENT, "Master Student", "Complete master practice", "🏆"),
  def(DETECTIVE, "Detective", "Solve your first case", "🔍"),
  def(SHERLOCK, "Sherlock", "Solve 5 cases", "🕵️"),
  def(STREAK_3, "On Fire", "3 day streak", "🔥"),
  def(STREAK_7, "Unstoppable", "7 day streak", "⚡"),
  def(LEVEL_5, "Rising Star", "Reach level 5", "⭐"),
  def(LEVEL_10, "Champion", "Reach level 10", "👑"),
];

pub fn lookup(id: &str) -> Option<&'static AchievementDefinition> {
  CATALOG.iter().find(|a| a.id == id)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn catalog_ids_are_unique() {
    let ids: HashSet<_> = CATALOG.iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), CATALOG.len());
    assert_eq!(CATALOG.len(), 11);
  }

  #[test]
  fn lookup_finds_known_ids_only() {
    assert_eq!(lookup(SHERLOCK).map(|a| a.name), Some("Sherlock"));
    assert!(lookup("speedrunner").is_none());
  }
}
