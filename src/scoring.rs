//! Reward rules for the three content kinds: quiz scoring, quest-line
//! completion, and code challenge rewards. Pure functions over the stored content.

use serde::Serialize;

use crate::domain::{ChallengeVerdict, CodeChallenge, QuestLine, Quiz};
use crate::util::round1;

pub const XP_PER_CORRECT_ANSWER: u64 = 10;
pub const PERFECT_QUIZ_BONUS: u64 = 30;
pub const HIGH_SCORE_BONUS: u64 = 15;
/// Percentage at or above which `HIGH_SCORE_BONUS` applies.
pub const HIGH_SCORE_PERCENT: usize = 80;
pub const OPTIMAL_SOLUTION_BONUS: u64 = 20;

/// Advertised XP for a quiz of `questions` questions.
pub fn quiz_total_xp(questions: usize) -> u64 {
  questions as u64 * XP_PER_CORRECT_ANSWER + 20
}

/// Label shown for unanswered or out-of-range answers.
pub const NO_ANSWER: &str = "No answer";

#[derive(Clone, Debug, Serialize)]
pub struct QuestionOutcome {
  pub question: String,
  pub your_answer: String,
  pub correct_answer: String,
  pub is_correct: bool,
  pub explanation: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct QuizScore {
  pub correct: usize,
  pub total: usize,
  pub percentage: f64,
  pub xp_earned: u64,
  pub bonus_xp: u64,
  pub perfect: bool,
  pub results: Vec<QuestionOutcome>,
}

/// Score `answers` (one option index per question, in order) against `quiz`.
/// Missing entries and `None` count as incorrect.
pub fn score_quiz(quiz: &Quiz, answers: &[Option<usize>]) -> QuizScore {
  let mut correct = 0usize;
  let mut results = Vec::with_capacity(quiz.questions.len());

  for (i, q) in quiz.questions.iter().enumerate() {
    let chosen = answers.get(i).copied().flatten();
    let is_correct = chosen == Some(q.correct_index);
    if is_correct {
      correct += 1;
    }
    let your_answer = chosen
      .and_then(|idx| q.options.get(idx))
      .cloned()
      .unwrap_or_else(|| NO_ANSWER.to_string());
    results.push(QuestionOutcome {
      question: q.question.clone(),
      your_answer,
      correct_answer: q.options.get(q.correct_index).cloned().unwrap_or_default(),
      is_correct,
      explanation: q.explanation.clone(),
    });
  }

  let total = quiz.questions.len();
  let perfect = total > 0 && correct == total;
  let percentage = if total > 0 { round1(correct as f64 * 100.0 / total as f64) } else { 0.0 };

  let base = correct as u64 * XP_PER_CORRECT_ANSWER;
  let bonus_xp = if perfect {
    PERFECT_QUIZ_BONUS
  } else if total > 0 && correct * 100 >= total * HIGH_SCORE_PERCENT {
    HIGH_SCORE_BONUS
  } else {
    0
  };

  QuizScore { correct, total, percentage, xp_earned: base + bonus_xp, bonus_xp, perfect, results }
}

#[derive(Clone, Debug, Serialize)]
pub struct QuestCompletion {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub quest: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub xp_earned: Option<u64>,
  pub completed: bool,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub is_boss: bool,
  pub message: String,
}

/// Mark quest `quest_id` done. Ordinary quests are searched before the boss;
/// an unknown or already completed id completes nothing.
pub fn complete_quest(line: &mut QuestLine, quest_id: i64) -> QuestCompletion {
  if let Some(q) = line.quests.iter_mut().find(|q| q.id == quest_id && !q.completed) {
    q.completed = true;
    return QuestCompletion {
      quest: Some(q.title.clone()),
      xp_earned: Some(q.xp_reward),
      completed: true,
      is_boss: false,
      message: format!("🎉 Quest Complete: {}! +{} XP", q.title, q.xp_reward),
    };
  }

  if let Some(boss) = line.boss_quest.as_mut().filter(|b| b.id == quest_id && !b.completed) {
    boss.completed = true;
    return QuestCompletion {
      quest: Some(boss.title.clone()),
      xp_earned: Some(boss.xp_reward),
      completed: true,
      is_boss: true,
      message: format!("🏆 BOSS DEFEATED: {}! +{} XP", boss.title, boss.xp_reward),
    };
  }

  QuestCompletion {
    quest: None,
    xp_earned: None,
    completed: false,
    is_boss: false,
    message: "Quest not found or already completed".into(),
  }
}

/// Undo a completion made by `complete_quest`.
pub fn reopen_quest(line: &mut QuestLine, quest_id: i64, is_boss: bool) {
  let quest = if is_boss {
    line.boss_quest.as_mut().filter(|b| b.id == quest_id)
  } else {
    line.quests.iter_mut().find(|q| q.id == quest_id && q.completed)
  };
  if let Some(q) = quest {
    q.completed = false;
  }
}

#[derive(Clone, Debug, Serialize)]
pub struct QuestProgress {
  pub completed: usize,
  pub total: usize,
  pub percentage: f64,
  pub boss_completed: bool,
  pub xp_earned: u64,
  pub xp_remaining: u64,
  pub all_done: bool,
}

pub fn quest_progress(line: &QuestLine) -> QuestProgress {
  let completed = line.quests.iter().filter(|q| q.completed).count();
  let total = line.quests.len();
  let boss_completed = line.boss_quest.as_ref().is_some_and(|b| b.completed);

  let mut xp_earned: u64 = line.quests.iter().filter(|q| q.completed).map(|q| q.xp_reward).sum();
  if let Some(boss) = line.boss_quest.as_ref().filter(|b| b.completed) {
    xp_earned += boss.xp_reward;
  }

  let percentage = if total > 0 { round1(completed as f64 * 100.0 / total as f64) } else { 0.0 };
  // A line without a boss is done once its ordinary quests are.
  let boss_done = line.boss_quest.as_ref().map_or(true, |b| b.completed);

  QuestProgress {
    completed,
    total,
    percentage,
    boss_completed,
    xp_earned,
    xp_remaining: line.total_xp.saturating_sub(xp_earned),
    all_done: completed == total && boss_done,
  }
}

#[derive(Clone, Debug, Serialize)]
pub struct ChallengeResult {
  pub passed: bool,
  pub feedback: String,
  pub xp_earned: u64,
  pub bonus_xp: u64,
  pub tests_passed: u32,
  pub total_tests: u32,
}

impl ChallengeResult {
  pub fn total_xp(&self) -> u64 {
    self.xp_earned + self.bonus_xp
  }
}

pub fn challenge_reward(challenge: &CodeChallenge, verdict: ChallengeVerdict) -> ChallengeResult {
  let (xp_earned, bonus_xp) = match (verdict.passed, verdict.is_optimal) {
    (true, true) => (challenge.xp_reward, OPTIMAL_SOLUTION_BONUS),
    (true, false) => (challenge.xp_reward, 0),
    (false, _) => (0, 0),
  };
  ChallengeResult {
    passed: verdict.passed,
    feedback: verdict.feedback,
    xp_earned,
    bonus_xp,
    tests_passed: verdict.tests_passed,
    total_tests: verdict.total_tests,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{ChallengeDifficulty, Quest, QuestDifficulty, QuizQuestion};

  fn quiz(n: usize) -> Quiz {
    Quiz {
      title: "Rust basics".into(),
      questions: (0..n)
        .map(|i| QuizQuestion {
          question: format!("Q{i}"),
          options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
          correct_index: i % 4,
          explanation: format!("because {i}"),
        })
        .collect(),
      total_xp: n as u64 * 10 + 20,
    }
  }

  fn quest(id: i64, xp: u64) -> Quest {
    Quest {
      id,
      title: format!("Quest {id}"),
      description: String::new(),
      xp_reward: xp,
      completed: false,
      difficulty: QuestDifficulty::Normal,
    }
  }

  fn line(with_boss: bool) -> QuestLine {
    let quests = vec![quest(1, 15), quest(2, 25), quest(3, 40)];
    let boss = with_boss.then(|| Quest { difficulty: QuestDifficulty::Epic, ..quest(99, 100) });
    QuestLine { goal: "Ship it".into(), quests, total_xp: if with_boss { 180 } else { 80 }, boss_quest: boss }
  }

  #[test]
  fn reopened_quests_can_be_completed_again() {
    let mut l = line(true);
    assert!(complete_quest(&mut l, 2).completed);
    assert!(complete_quest(&mut l, 99).is_boss);

    reopen_quest(&mut l, 2, false);
    reopen_quest(&mut l, 99, true);
    let p = quest_progress(&l);
    assert_eq!(p.completed, 0);
    assert!(!p.boss_completed);
    assert_eq!(p.xp_earned, 0);

    assert_eq!(complete_quest(&mut l, 2).xp_earned, Some(25));
  }

  #[test]
  fn perfect_quiz_earns_full_bonus() {
    let q = quiz(5);
    let answers: Vec<_> = (0..5).map(|i| Some(i % 4)).collect();
    let s = score_quiz(&q, &answers);
    assert_eq!(s.correct, 5);
    assert_eq!(s.percentage, 100.0);
    assert_eq!(s.bonus_xp, 30);
    assert_eq!(s.xp_earned, 80);
    assert!(s.perfect);
  }

  #[test]
  fn four_of_five_earns_high_score_bonus() {
    let q = quiz(5);
    let answers = vec![Some(0), Some(1), Some(2), Some(3), Some(3)];
    let s = score_quiz(&q, &answers);
    assert_eq!(s.correct, 4);
    assert_eq!(s.percentage, 80.0);
    assert_eq!(s.xp_earned, 55);
    assert!(!s.perfect);
  }

  #[test]
  fn low_scores_get_no_bonus_and_round_percentage() {
    let q = quiz(3);
    let s = score_quiz(&q, &[Some(0), Some(0), Some(0)]);
    assert_eq!(s.correct, 1);
    assert_eq!(s.percentage, 33.3);
    assert_eq!(s.bonus_xp, 0);
    assert_eq!(s.xp_earned, 10);
  }

  #[test]
  fn missing_and_out_of_range_answers_are_no_answer() {
    let q = quiz(3);
    let s = score_quiz(&q, &[Some(0), Some(17)]);
    assert_eq!(s.results.len(), 3);
    assert_eq!(s.results[0].your_answer, "a");
    assert!(s.results[0].is_correct);
    assert_eq!(s.results[1].your_answer, NO_ANSWER);
    assert_eq!(s.results[1].correct_answer, "b");
    assert!(!s.results[1].is_correct);
    assert_eq!(s.results[2].your_answer, NO_ANSWER);
    assert_eq!(s.results[2].explanation, "because 2");
  }

  #[test]
  fn empty_quiz_scores_zero() {
    let s = score_quiz(&quiz(0), &[]);
    assert_eq!(s.percentage, 0.0);
    assert!(!s.perfect);
    assert_eq!(s.xp_earned, 0);
  }

  #[test]
  fn quest_completes_once() {
    let mut l = line(true);
    let first = complete_quest(&mut l, 2);
    assert!(first.completed);
    assert_eq!(first.xp_earned, Some(25));
    assert_eq!(first.quest.as_deref(), Some("Quest 2"));
    assert!(!first.is_boss);

    let again = complete_quest(&mut l, 2);
    assert!(!again.completed);
    assert_eq!(again.xp_earned, None);

    assert!(!complete_quest(&mut l, 42).completed);
  }

  #[test]
  fn boss_completion_is_flagged() {
    let mut l = line(true);
    let r = complete_quest(&mut l, 99);
    assert!(r.completed);
    assert!(r.is_boss);
    assert_eq!(r.xp_earned, Some(100));
    assert!(r.message.contains("BOSS"));
  }

  #[test]
  fn progress_tracks_quests_and_boss() {
    let mut l = line(true);
    complete_quest(&mut l, 1);
    let p = quest_progress(&l);
    assert_eq!((p.completed, p.total), (1, 3));
    assert_eq!(p.percentage, 33.3);
    assert_eq!(p.xp_earned, 15);
    assert_eq!(p.xp_remaining, 165);
    assert!(!p.all_done);

    for id in [2, 3] {
      complete_quest(&mut l, id);
    }
    assert!(!quest_progress(&l).all_done);
    complete_quest(&mut l, 99);
    let p = quest_progress(&l);
    assert!(p.boss_completed);
    assert!(p.all_done);
    assert_eq!(p.xp_remaining, 0);
    assert_eq!(p.percentage, 100.0);
  }

  #[test]
  fn bossless_line_is_done_after_ordinary_quests() {
    let mut l = line(false);
    for id in [1, 2, 3] {
      complete_quest(&mut l, id);
    }
    let p = quest_progress(&l);
    assert!(!p.boss_completed);
    assert!(p.all_done);
  }

  #[test]
  fn empty_line_reports_zero_percent() {
    let l = QuestLine { goal: "g".into(), quests: vec![], total_xp: 0, boss_quest: None };
    assert_eq!(quest_progress(&l).percentage, 0.0);
  }

  #[test]
  fn challenge_rewards() {
    let ch = CodeChallenge {
      id: "c".into(),
      title: "t".into(),
      description: "d".into(),
      difficulty: ChallengeDifficulty::Medium,
      starter_code: String::new(),
      test_cases: vec!["assert True".into()],
      hints: vec![],
      xp_reward: ChallengeDifficulty::Medium.xp_reward(),
    };
    let verdict = |passed, is_optimal| ChallengeVerdict {
      passed,
      feedback: "ok".into(),
      tests_passed: 1,
      total_tests: 1,
      is_optimal,
    };

    let r = challenge_reward(&ch, verdict(true, true));
    assert_eq!((r.xp_earned, r.bonus_xp, r.total_xp()), (40, 20, 60));
    let r = challenge_reward(&ch, verdict(true, false));
    assert_eq!((r.xp_earned, r.bonus_xp), (40, 0));
    let r = challenge_reward(&ch, verdict(false, true));
    assert_eq!((r.xp_earned, r.bonus_xp), (0, 0));
  }
}
