//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.

use std::sync::Arc;
use axum::{extract::{Path, State}, Json, response::IntoResponse};
use tracing::instrument;

use crate::achievements::{AchievementDefinition, CATALOG};
use crate::domain::StatKind;
use crate::error::AppError;
use crate::featured::{FeaturedTopic, FEATURED};
use crate::logic::*;
use crate::progression::StatsView;
use crate::protocol::*;
use crate::scoring::QuestProgress;
use crate::seeds::{challenge_topics, Topic};
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, AppError>;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_stats(State(state): State<Arc<AppState>>) -> ApiResult<StatsView> {
  Ok(Json(state.progress.stats().await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_activity(
  State(state): State<Arc<AppState>>,
  Path(kind): Path<StatKind>,
) -> ApiResult<ActivityOut> {
  Ok(Json(record_activity(&state, kind).await?))
}

pub async fn http_get_achievements() -> Json<&'static [AchievementDefinition]> {
  Json(CATALOG)
}

// --- Quizzes ---

#[instrument(level = "info", skip(state, body), fields(content_len = body.content.len()))]
pub async fn http_post_quiz_generate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizGenerateIn>,
) -> ApiResult<QuizOut> {
  Ok(Json(start_quiz(&state, &body.content, body.question_count()).await?))
}

pub async fn http_get_featured() -> Json<&'static [FeaturedTopic]> {
  Json(FEATURED)
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_featured_quiz(
  State(state): State<Arc<AppState>>,
  Path(topic): Path<String>,
) -> ApiResult<QuizOut> {
  Ok(Json(start_featured_quiz(&state, &topic).await?))
}

#[instrument(level = "info", skip(state, body), fields(answers = body.answers.len()))]
pub async fn http_post_quiz_submit(
  State(state): State<Arc<AppState>>,
  Path(quiz_id): Path<String>,
  Json(body): Json<QuizAnswersIn>,
) -> ApiResult<QuizSubmitOut> {
  Ok(Json(submit_quiz(&state, &quiz_id, &body.indices()).await?))
}

// --- Quests ---

#[instrument(level = "info", skip(state, body), fields(goal_len = body.goal.len()))]
pub async fn http_post_quests_generate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GoalIn>,
) -> ApiResult<QuestLineOut> {
  Ok(Json(start_quest_line(&state, &body.goal, &body.context).await?))
}

#[instrument(level = "info", skip(state, body), fields(quest_id = body.quest_id))]
pub async fn http_post_quest_complete(
  State(state): State<Arc<AppState>>,
  Path(quest_line_id): Path<String>,
  Json(body): Json<QuestCompleteIn>,
) -> ApiResult<QuestCompleteOut> {
  Ok(Json(finish_quest(&state, &quest_line_id, body.quest_id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_quest_progress(
  State(state): State<Arc<AppState>>,
  Path(quest_line_id): Path<String>,
) -> ApiResult<QuestProgress> {
  Ok(Json(quest_line_progress(&state, &quest_line_id).await?))
}

// --- Code arena ---

pub async fn http_get_challenge_topics() -> Json<Vec<Topic>> {
  Json(challenge_topics())
}

#[instrument(level = "info", skip(state, body), fields(difficulty = body.difficulty.as_str(), topic = %body.topic))]
pub async fn http_post_challenge_generate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChallengeIn>,
) -> Json<ChallengeOut> {
  Json(start_challenge(&state, body.difficulty, &body.topic).await)
}

#[instrument(level = "info", skip(state, body), fields(code_len = body.code.len()))]
pub async fn http_post_challenge_submit(
  State(state): State<Arc<AppState>>,
  Path(challenge_id): Path<String>,
  Json(body): Json<CodeSubmissionIn>,
) -> ApiResult<ChallengeSubmitOut> {
  Ok(Json(submit_challenge(&state, &challenge_id, &body.code).await?))
}
