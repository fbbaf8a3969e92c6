//! Generate → submit/complete → reward flows used by the HTTP handlers.
//!
//! Generation stores the full content in its session store and hands back a
//! sanitized view. Submission re-reads the stored copy, scores it, and forwards
//! the XP award to the progression engine.

use tracing::{info, instrument, warn};

use crate::domain::{ChallengeDifficulty, StatKind};
use crate::error::AppError;
use crate::featured;
use crate::protocol::{
  ActivityOut, ChallengeOut, ChallengeSubmitOut, QuestCompleteOut, QuestLineOut, QuizOut, QuizSubmitOut,
};
use crate::scoring::{challenge_reward, complete_quest, quest_progress, reopen_quest, score_quiz, QuestProgress};
use crate::state::AppState;

#[instrument(level = "info", skip(state, content), fields(content_len = content.len()))]
pub async fn start_quiz(state: &AppState, content: &str, question_count: usize) -> Result<QuizOut, AppError> {
  if content.trim().is_empty() {
    return Err(AppError::BadRequest("content must not be empty".into()));
  }
  let (quiz, origin) = state.generate_quiz(content, question_count).await;
  let out_quiz = QuizOut::new(String::new(), &quiz);
  let quiz_id = state.quizzes.put(quiz).await;
  info!(target: "content", %quiz_id, %origin, questions = out_quiz.questions.len(), "Quiz served");
  Ok(QuizOut { quiz_id, ..out_quiz })
}

/// Serve a featured quiz by id or topic phrase. Scored like any generated quiz.
#[instrument(level = "info", skip(state))]
pub async fn start_featured_quiz(state: &AppState, topic: &str) -> Result<QuizOut, AppError> {
  let featured = featured::lookup(topic).ok_or_else(|| AppError::not_found("featured topic", topic))?;
  let quiz = featured.quiz();
  let out_quiz = QuizOut::new(String::new(), &quiz);
  let quiz_id = state.quizzes.put(quiz).await;
  info!(target: "content", %quiz_id, featured = featured.id, "Featured quiz served");
  Ok(QuizOut { quiz_id, ..out_quiz })
}

#[instrument(level = "info", skip(state, answers), fields(%quiz_id, answers = answers.len()))]
pub async fn submit_quiz(state: &AppState, quiz_id: &str, answers: &[Option<usize>]) -> Result<QuizSubmitOut, AppError> {
  let quiz = state
    .quizzes
    .get(quiz_id)
    .await
    .ok_or_else(|| AppError::not_found(state.quizzes.kind(), quiz_id))?;

  let score = score_quiz(&quiz, answers);
  let award = state.progress.complete_quiz(score.xp_earned, score.perfect).await?;

  info!(target: "content", %quiz_id, correct = score.correct, total = score.total, xp = score.xp_earned, perfect = score.perfect, "Quiz scored");
  Ok(QuizSubmitOut { score, award })
}

#[instrument(level = "info", skip(state, goal, context), fields(goal_len = goal.len()))]
pub async fn start_quest_line(state: &AppState, goal: &str, context: &str) -> Result<QuestLineOut, AppError> {
  if goal.trim().is_empty() {
    return Err(AppError::BadRequest("goal must not be empty".into()));
  }
  let (line, origin) = state.generate_quest_line(goal, context).await;
  let out = QuestLineOut::new(String::new(), &line);
  let quest_line_id = state.quest_lines.put(line).await;
  info!(target: "content", %quest_line_id, %origin, quests = out.quests.len(), "Quest line served");
  Ok(QuestLineOut { quest_line_id, ..out })
}

/// Complete one quest of a stored line. XP is only awarded when something was
/// actually completed; if the award cannot be saved the quest is reopened.
#[instrument(level = "info", skip(state), fields(%quest_line_id))]
pub async fn finish_quest(state: &AppState, quest_line_id: &str, quest_id: i64) -> Result<QuestCompleteOut, AppError> {
  let (completion, progress) = state
    .quest_lines
    .update(quest_line_id, |line| {
      let completion = complete_quest(line, quest_id);
      (completion, quest_progress(line))
    })
    .await
    .ok_or_else(|| AppError::not_found(state.quest_lines.kind(), quest_line_id))?;

  let Some(xp) = completion.xp_earned.filter(|_| completion.completed) else {
    info!(target: "content", %quest_line_id, quest_id, "Quest not completed");
    return Ok(QuestCompleteOut { completion, award: None, progress: None });
  };

  let reason = if completion.is_boss { "Boss quest completed" } else { "Quest completed" };
  let award = match state.progress.award_xp(xp, reason).await {
    Ok(award) => award,
    Err(e) => {
      let is_boss = completion.is_boss;
      state.quest_lines.update(quest_line_id, |line| reopen_quest(line, quest_id, is_boss)).await;
      warn!(target: "content", %quest_line_id, quest_id, error = %e, "Quest reward not saved; quest reopened");
      return Err(e);
    }
  };
  Ok(QuestCompleteOut { completion, award: Some(award), progress: Some(progress) })
}

pub async fn quest_line_progress(state: &AppState, quest_line_id: &str) -> Result<QuestProgress, AppError> {
  state
    .quest_lines
    .get(quest_line_id)
    .await
    .map(|line| quest_progress(&line))
    .ok_or_else(|| AppError::not_found(state.quest_lines.kind(), quest_line_id))
}

#[instrument(level = "info", skip(state), fields(difficulty = difficulty.as_str()))]
pub async fn start_challenge(state: &AppState, difficulty: ChallengeDifficulty, topic: &str) -> ChallengeOut {
  let (challenge, origin) = state.generate_challenge(difficulty, topic).await;
  let out = ChallengeOut::from(&challenge);
  info!(target: "content", challenge_id = %challenge.id, %origin, title = %challenge.title, "Challenge served");
  state.challenges.insert(challenge.id.clone(), challenge).await;
  out
}

#[instrument(level = "info", skip(state, code), fields(%challenge_id, code_len = code.len()))]
pub async fn submit_challenge(state: &AppState, challenge_id: &str, code: &str) -> Result<ChallengeSubmitOut, AppError> {
  let challenge = state
    .challenges
    .get(challenge_id)
    .await
    .ok_or_else(|| AppError::not_found(state.challenges.kind(), challenge_id))?;

  let verdict = state.evaluate_challenge(&challenge, code).await;
  let result = challenge_reward(&challenge, verdict);
  info!(target: "content", %challenge_id, passed = result.passed, xp = result.total_xp(), "Challenge evaluated");

  let award = if result.passed {
    Some(state.progress.award_xp(result.total_xp(), "Challenge solved").await?)
  } else {
    None
  };
  Ok(ChallengeSubmitOut { result, award })
}

/// Count one completed activity of `kind` and report any milestone it unlocked.
#[instrument(level = "info", skip(state), fields(kind = kind.as_str()))]
pub async fn record_activity(state: &AppState, kind: StatKind) -> Result<ActivityOut, AppError> {
  let new_achievements = state.progress.increment_stat(kind).await?;
  let stats = state.progress.stats().await?;
  Ok(ActivityOut { new_achievements, stats })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Prompts;
  use tempfile::TempDir;

  fn offline_state() -> (TempDir, AppState) {
    let tmp = tempfile::tempdir().unwrap();
    let state = AppState::new(tmp.path(), None, Prompts::default());
    (tmp, state)
  }

  #[tokio::test]
  async fn quiz_round_trip_awards_and_unlocks() {
    let (_tmp, state) = offline_state();
    let quiz = start_quiz(&state, "Photosynthesis turns light into sugar.", 5).await.unwrap();
    assert_eq!(quiz.questions.len(), 1);

    let out = submit_quiz(&state, &quiz.quiz_id, &[Some(3)]).await.unwrap();
    assert!(out.score.perfect);
    assert_eq!(out.score.xp_earned, 40);
    assert_eq!(out.award.total_xp, 40);
    let ids: Vec<_> = out.award.new_achievements.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["quiz_novice", "quiz_master"]);

    let again = submit_quiz(&state, &quiz.quiz_id, &[Some(0)]).await.unwrap();
    assert_eq!(again.score.xp_earned, 0);
    assert!(again.award.new_achievements.is_empty());
    assert_eq!(state.progress.stats().await.unwrap().quizzes_passed, 2);
  }

  #[tokio::test]
  async fn featured_quiz_is_scored_like_a_generated_one() {
    let (_tmp, state) = offline_state();
    let quiz = start_featured_quiz(&state, "Explore Black Holes").await.unwrap();
    assert_eq!(quiz.title, "Black Holes");
    assert_eq!(quiz.total_xp, 70);

    let out = submit_quiz(&state, &quiz.quiz_id, &[Some(0); 5]).await.unwrap();
    assert!(out.score.perfect);
    assert_eq!(out.award.total_xp, 80);

    assert!(matches!(start_featured_quiz(&state, "pottery").await, Err(AppError::NotFound { .. })));
  }

  #[tokio::test]
  async fn empty_quiz_content_is_rejected() {
    let (_tmp, state) = offline_state();
    assert!(matches!(start_quiz(&state, "   ", 5).await, Err(AppError::BadRequest(_))));
  }

  #[tokio::test]
  async fn unknown_ids_are_not_found() {
    let (_tmp, state) = offline_state();
    assert!(matches!(submit_quiz(&state, "nope", &[]).await, Err(AppError::NotFound { .. })));
    assert!(matches!(finish_quest(&state, "nope", 1).await, Err(AppError::NotFound { .. })));
    assert!(matches!(quest_line_progress(&state, "nope").await, Err(AppError::NotFound { .. })));
    assert!(matches!(submit_challenge(&state, "nope", "").await, Err(AppError::NotFound { .. })));
  }

  #[tokio::test]
  async fn quest_completion_awards_once() {
    let (_tmp, state) = offline_state();
    let line = start_quest_line(&state, "Learn to cook", "").await.unwrap();

    let first = finish_quest(&state, &line.quest_line_id, 2).await.unwrap();
    assert!(first.completion.completed);
    assert_eq!(first.award.as_ref().unwrap().xp_gained, 25);
    assert_eq!(first.progress.as_ref().unwrap().completed, 1);

    let second = finish_quest(&state, &line.quest_line_id, 2).await.unwrap();
    assert!(!second.completion.completed);
    assert!(second.award.is_none());

    let boss = finish_quest(&state, &line.quest_line_id, 99).await.unwrap();
    assert!(boss.completion.is_boss);
    assert_eq!(boss.award.unwrap().total_xp, 125);

    let progress = quest_line_progress(&state, &line.quest_line_id).await.unwrap();
    assert!(progress.boss_completed);
    assert_eq!(progress.xp_remaining, 55);
  }

  #[tokio::test]
  async fn unsaved_quest_reward_leaves_quest_open() {
    let (tmp, state) = offline_state();
    let line = start_quest_line(&state, "Plant a garden", "").await.unwrap();
    let doc = tmp.path().join(crate::store::PROGRESS_FILE);
    std::fs::create_dir_all(&doc).unwrap();

    assert!(matches!(finish_quest(&state, &line.quest_line_id, 1).await, Err(AppError::Storage(_))));
    assert!(matches!(finish_quest(&state, &line.quest_line_id, 99).await, Err(AppError::Storage(_))));
    let progress = quest_line_progress(&state, &line.quest_line_id).await.unwrap();
    assert_eq!(progress.completed, 0);
    assert!(!progress.boss_completed);
    assert_eq!(progress.xp_earned, 0);

    std::fs::remove_dir(&doc).unwrap();
    let retry = finish_quest(&state, &line.quest_line_id, 1).await.unwrap();
    assert!(retry.completion.completed);
    assert_eq!(retry.award.unwrap().total_xp, 15);
    assert_eq!(retry.progress.unwrap().xp_earned, 15);
  }

  #[tokio::test]
  async fn failed_challenge_awards_nothing() {
    let (_tmp, state) = offline_state();
    let ch = start_challenge(&state, ChallengeDifficulty::Easy, "math").await;
    let out = submit_challenge(&state, &ch.challenge_id, "def solution(a, b): return a + b").await.unwrap();
    assert!(!out.result.passed);
    assert!(out.award.is_none());
    assert_eq!(state.progress.stats().await.unwrap().xp, 0);
  }

  #[tokio::test]
  async fn recording_activity_reports_milestones() {
    let (_tmp, state) = offline_state();
    let out = record_activity(&state, StatKind::Masters).await.unwrap();
    assert_eq!(out.new_achievements[0].id, "master_student");
    assert_eq!(out.stats.masters_completed, 1);
    assert!(record_activity(&state, StatKind::Masters).await.unwrap().new_achievements.is_empty());
  }
}
