//! Public HTTP request/response DTOs (serde ready).
//! Client-facing views never carry correct answers or test cases.

use serde::{Deserialize, Serialize};

use crate::domain::{ChallengeDifficulty, CodeChallenge, Quest, QuestLine, Quiz};
use crate::progression::{AwardResult, StatsView};
use crate::achievements::AchievementDefinition;
use crate::scoring::{ChallengeResult, QuestCompletion, QuestProgress, QuizScore};

pub const DEFAULT_QUESTION_COUNT: usize = 5;
pub const MAX_QUESTION_COUNT: usize = 20;

//
// Quiz
//

#[derive(Debug, Deserialize)]
pub struct QuizGenerateIn {
    pub content: String,
    #[serde(default)]
    pub question_count: Option<usize>,
}

impl QuizGenerateIn {
    pub fn question_count(&self) -> usize {
        self.question_count.unwrap_or(DEFAULT_QUESTION_COUNT).clamp(1, MAX_QUESTION_COUNT)
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QuizOut {
    pub quiz_id: String,
    pub title: String,
    pub questions: Vec<QuestionOut>,
    pub total_xp: u64,
}

impl QuizOut {
    pub fn new(quiz_id: String, quiz: &Quiz) -> Self {
        Self {
            quiz_id,
            title: quiz.title.clone(),
            questions: quiz
                .questions
                .iter()
                .map(|q| QuestionOut { question: q.question.clone(), options: q.options.clone() })
                .collect(),
            total_xp: quiz.total_xp,
        }
    }
}

/// Answers are taken loosely: anything that is not a non-negative integer
/// counts as "no answer" for that question.
#[derive(Debug, Deserialize)]
pub struct QuizAnswersIn {
    pub answers: Vec<serde_json::Value>,
}

impl QuizAnswersIn {
    pub fn indices(&self) -> Vec<Option<usize>> {
        self.answers
            .iter()
            .map(|v| v.as_u64().and_then(|n| usize::try_from(n).ok()))
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct QuizSubmitOut {
    #[serde(flatten)]
    pub score: QuizScore,
    #[serde(flatten)]
    pub award: AwardResult,
}

//
// Quests
//

#[derive(Debug, Deserialize)]
pub struct GoalIn {
    pub goal: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Serialize)]
pub struct QuestLineOut {
    pub quest_line_id: String,
    pub goal: String,
    pub quests: Vec<Quest>,
    pub boss_quest: Option<Quest>,
    pub total_xp: u64,
}

impl QuestLineOut {
    pub fn new(quest_line_id: String, line: &QuestLine) -> Self {
        Self {
            quest_line_id,
            goal: line.goal.clone(),
            quests: line.quests.clone(),
            boss_quest: line.boss_quest.clone(),
            total_xp: line.total_xp,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestCompleteIn {
    pub quest_id: i64,
}

#[derive(Debug, Serialize)]
pub struct QuestCompleteOut {
    #[serde(flatten)]
    pub completion: QuestCompletion,
    #[serde(flatten)]
    pub award: Option<AwardResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<QuestProgress>,
}

//
// Code arena
//

fn default_topic() -> String {
    "general".into()
}

#[derive(Debug, Deserialize)]
pub struct ChallengeIn {
    #[serde(default)]
    pub difficulty: ChallengeDifficulty,
    #[serde(default = "default_topic")]
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct ChallengeOut {
    pub challenge_id: String,
    pub title: String,
    pub description: String,
    pub difficulty: ChallengeDifficulty,
    pub starter_code: String,
    pub hints: Vec<String>,
    pub xp_reward: u64,
}

impl From<&CodeChallenge> for ChallengeOut {
    fn from(c: &CodeChallenge) -> Self {
        Self {
            challenge_id: c.id.clone(),
            title: c.title.clone(),
            description: c.description.clone(),
            difficulty: c.difficulty,
            starter_code: c.starter_code.clone(),
            hints: c.hints.clone(),
            xp_reward: c.xp_reward,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CodeSubmissionIn {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ChallengeSubmitOut {
    #[serde(flatten)]
    pub result: ChallengeResult,
    #[serde(flatten)]
    pub award: Option<AwardResult>,
}

//
// Stats
//

#[derive(Debug, Serialize)]
pub struct ActivityOut {
    pub new_achievements: Vec<AchievementDefinition>,
    pub stats: StatsView,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
