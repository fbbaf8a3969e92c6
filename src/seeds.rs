//! Built-in content: deterministic fallbacks used whenever generation fails,
//! and the fixed list of challenge topics.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{ChallengeDifficulty, CodeChallenge, Quest, QuestDifficulty, QuestLine, Quiz, QuizQuestion};

/// One-question quiz worth 10 XP.
pub fn fallback_quiz() -> Quiz {
  Quiz {
    title: "Quick Knowledge Check".into(),
    questions: vec![QuizQuestion {
      question: "We couldn't build a quiz from that text. What was its main topic?".into(),
      options: vec!["Topic A".into(), "Topic B".into(), "Topic C".into(), "I need to review more".into()],
      correct_index: 3,
      explanation: "Keep learning!".into(),
    }],
    total_xp: 10,
  }
}

/// Three quests plus a boss, 180 XP in total.
pub fn fallback_quest_line(goal: &str) -> QuestLine {
  let quest = |id, title: &str, description: &str, xp_reward, difficulty| Quest {
    id,
    title: title.into(),
    description: description.into(),
    xp_reward,
    completed: false,
    difficulty,
  };
  QuestLine {
    goal: format!("⚔️ {}", goal.trim()),
    quests: vec![
      quest(1, "Begin the Journey", "Take the first step", 15, QuestDifficulty::Easy),
      quest(2, "Gather Resources", "Prepare what you need", 25, QuestDifficulty::Normal),
      quest(3, "Face the Challenge", "Execute your plan", 40, QuestDifficulty::Hard),
    ],
    total_xp: 180,
    boss_quest: Some(quest(99, "FINAL: Victory!", "Complete your goal", 100, QuestDifficulty::Epic)),
  }
}

/// "Sum Two Numbers", Easy, 20 XP. Gets a fresh id like any generated challenge.
pub fn fallback_challenge() -> CodeChallenge {
  CodeChallenge {
    id: Uuid::new_v4().to_string(),
    title: "Sum Two Numbers".into(),
    description: "Write a function that takes two numbers and returns their sum.".into(),
    difficulty: ChallengeDifficulty::Easy,
    starter_code: "def solution(a, b):\n    # Your code here\n    pass".into(),
    test_cases: vec![
      "assert solution(1, 2) == 3".into(),
      "assert solution(0, 0) == 0".into(),
      "assert solution(-1, 1) == 0".into(),
    ],
    hints: vec!["Use the + operator".into(), "Return the result".into()],
    xp_reward: ChallengeDifficulty::Easy.xp_reward(),
  }
}

#[derive(Clone, Debug, Serialize)]
pub struct Topic {
  pub id: &'static str,
  pub name: &'static str,
  pub icon: &'static str,
}

pub fn challenge_topics() -> Vec<Topic> {
  vec![
    Topic { id: "general", name: "General Programming", icon: "🎯" },
    Topic { id: "strings", name: "String Manipulation", icon: "📝" },
    Topic { id: "arrays", name: "Arrays & Lists", icon: "📊" },
    Topic { id: "math", name: "Math & Numbers", icon: "🔢" },
    Topic { id: "algorithms", name: "Algorithms", icon: "⚡" },
    Topic { id: "data_structures", name: "Data Structures", icon: "🏗️" },
  ]
}
