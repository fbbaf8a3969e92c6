//! XP, levels, streaks and achievement unlocks.
//!
//! Every mutating call takes the single writer lock, loads the document once,
//! applies its changes in memory and saves once. Concurrent requests therefore
//! never overwrite each other's updates.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::achievements::{self, AchievementDefinition, CATALOG};
use crate::domain::{StatKind, UserProgress};
use crate::error::AppError;
use crate::store::ProgressStore;

pub const XP_PER_LEVEL: u64 = 100;

/// `floor(xp / 100) + 1`.
pub fn level_for(xp: u64) -> u64 {
  xp / XP_PER_LEVEL + 1
}

/// XP still needed to reach `level_for(xp) + 1`; always in `1..=100`.
pub fn xp_to_next_level(xp: u64) -> u64 {
  level_for(xp) * XP_PER_LEVEL - xp
}

/// Streak and level thresholds checked after every XP award.
const THRESHOLDS: &[(Threshold, &str)] = &[
  (Threshold::Streak(3), achievements::STREAK_3),
  (Threshold::Streak(7), achievements::STREAK_7),
  (Threshold::Level(5), achievements::LEVEL_5),
  (Threshold::Level(10), achievements::LEVEL_10),
];

#[derive(Clone, Copy)]
enum Threshold {
  Streak(u32),
  Level(u64),
}

impl Threshold {
  fn reached(self, p: &UserProgress) -> bool {
    match self {
      Threshold::Streak(days) => p.streak_days >= days,
      Threshold::Level(level) => p.level >= level,
    }
  }
}

/// Achievement for the first completion of a kind, plus an optional
/// `(count, id)` milestone.
fn milestones(kind: StatKind) -> (&'static str, Option<(u32, &'static str)>) {
  match kind {
    StatKind::Stories => (achievements::FIRST_STORY, Some((10, achievements::STORYTELLER))),
    StatKind::Quizzes => (achievements::QUIZ_NOVICE, None),
    StatKind::Masters => (achievements::MASTER_STUDENT, None),
    StatKind::Cases => (achievements::DETECTIVE, Some((5, achievements::SHERLOCK))),
  }
}

/// Update `streak_days`/`last_active` for activity on `today`.
pub fn advance_streak(p: &mut UserProgress, today: NaiveDate) {
  match p.last_active {
    None => p.streak_days = 1,
    Some(last) => match (today - last).num_days() {
      1 => p.streak_days += 1,
      gap if gap > 1 => p.streak_days = 1,
      _ => {}
    },
  }
  p.last_active = Some(today);
}

/// In-memory unlock; `None` for unknown or already held ids.
fn grant(p: &mut UserProgress, id: &str) -> Option<AchievementDefinition> {
  let def = achievements::lookup(id)?;
  if p.has_achievement(id) {
    return None;
  }
  p.achievements.push(def.id.to_string());
  info!(target: "progress", achievement = def.id, "Achievement unlocked");
  Some(*def)
}

/// XP, level, streak and threshold unlocks applied to an in-memory record.
fn apply_award(p: &mut UserProgress, amount: u64, today: NaiveDate) -> AwardResult {
  let old_level = p.level;

  p.xp = p.xp.saturating_add(amount);
  p.level = level_for(p.xp);
  advance_streak(p, today);

  let mut new_achievements = Vec::new();
  for (threshold, id) in THRESHOLDS {
    if threshold.reached(p) {
      new_achievements.extend(grant(p, id));
    }
  }

  AwardResult {
    xp_gained: amount,
    total_xp: p.xp,
    level: p.level,
    leveled_up: p.level > old_level,
    xp_to_next: xp_to_next_level(p.xp),
    streak: p.streak_days,
    new_achievements,
  }
}

/// Bump the `kind` counter and grant whichever milestone the new count reaches.
fn apply_stat(p: &mut UserProgress, kind: StatKind) -> Vec<AchievementDefinition> {
  let counter = p.counter_mut(kind);
  *counter += 1;
  let count = *counter;

  let (first, advanced) = milestones(kind);
  let mut unlocked = Vec::new();
  if count == 1 {
    unlocked.extend(grant(p, first));
  }
  if let Some((threshold, id)) = advanced {
    if count >= threshold {
      unlocked.extend(grant(p, id));
    }
  }
  debug!(target: "progress", kind = kind.as_str(), count, unlocked = unlocked.len(), "Stat incremented");
  unlocked
}

fn log_award(reason: &str, award: &AwardResult) {
  info!(
    target: "progress",
    %reason, xp_gained = award.xp_gained, total_xp = award.total_xp, level = award.level,
    leveled_up = award.leveled_up, streak = award.streak, unlocked = award.new_achievements.len(),
    "XP awarded"
  );
}

#[derive(Clone, Debug, Serialize)]
pub struct AwardResult {
  pub xp_gained: u64,
  pub total_xp: u64,
  pub level: u64,
  pub leveled_up: bool,
  pub xp_to_next: u64,
  pub streak: u32,
  pub new_achievements: Vec<AchievementDefinition>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StatsView {
  pub xp: u64,
  pub level: u64,
  pub xp_to_next: u64,
  pub xp_progress_percent: f64,
  pub streak: u32,
  pub achievements: Vec<AchievementDefinition>,
  pub total_achievements: usize,
  pub stories_completed: u32,
  pub quizzes_passed: u32,
  pub masters_completed: u32,
  pub cases_solved: u32,
}

impl StatsView {
  fn from_progress(p: &UserProgress) -> Self {
    Self {
      xp: p.xp,
      level: p.level,
      xp_to_next: xp_to_next_level(p.xp),
      xp_progress_percent: (p.xp % XP_PER_LEVEL) as f64,
      streak: p.streak_days,
      achievements: p.achievements.iter().filter_map(|id| achievements::lookup(id).copied()).collect(),
      total_achievements: CATALOG.len(),
      stories_completed: p.stories_completed,
      quizzes_passed: p.quizzes_passed,
      masters_completed: p.masters_completed,
      cases_solved: p.cases_solved,
    }
  }
}

/// Serializing access point to the progress document.
pub struct Progression {
  store: Mutex<ProgressStore>,
}

impl Progression {
  pub fn new(store: ProgressStore) -> Self {
    Self { store: Mutex::new(store) }
  }

  /// Award XP for activity happening now (local calendar date).
  pub async fn award_xp(&self, amount: u64, reason: &str) -> Result<AwardResult, AppError> {
    self.award_xp_on(amount, reason, Local::now().date_naive()).await
  }

  #[instrument(level = "info", skip(self), fields(%today))]
  pub async fn award_xp_on(&self, amount: u64, reason: &str, today: NaiveDate) -> Result<AwardResult, AppError> {
    let store = self.store.lock().await;
    let mut p = store.load().await?;
    let award = apply_award(&mut p, amount, today);
    store.save(&p).await?;
    log_award(reason, &award);
    Ok(award)
  }

  /// Quiz reward in one write: XP, the quiz counter and its milestone, and the
  /// mastery badge for a perfect score.
  pub async fn complete_quiz(&self, xp: u64, perfect: bool) -> Result<AwardResult, AppError> {
    self.complete_quiz_on(xp, perfect, Local::now().date_naive()).await
  }

  #[instrument(level = "info", skip(self), fields(%today))]
  pub async fn complete_quiz_on(&self, xp: u64, perfect: bool, today: NaiveDate) -> Result<AwardResult, AppError> {
    let store = self.store.lock().await;
    let mut p = store.load().await?;
    let mut award = apply_award(&mut p, xp, today);
    award.new_achievements.extend(apply_stat(&mut p, StatKind::Quizzes));
    if perfect {
      award.new_achievements.extend(grant(&mut p, achievements::QUIZ_MASTER));
    }
    store.save(&p).await?;
    log_award("Quiz completed", &award);
    Ok(award)
  }

  /// Unlock a catalog achievement. `None` when the id is unknown or already held;
  /// nothing is written in either case.
  #[allow(dead_code)]
  #[instrument(level = "info", skip(self))]
  pub async fn unlock_achievement(&self, id: &str) -> Result<Option<AchievementDefinition>, AppError> {
    if achievements::lookup(id).is_none() {
      debug!(target: "progress", %id, "Ignoring unknown achievement id");
      return Ok(None);
    }
    let store = self.store.lock().await;
    let mut p = store.load().await?;
    let Some(def) = grant(&mut p, id) else {
      return Ok(None);
    };
    store.save(&p).await?;
    Ok(Some(def))
  }

  /// Bump an activity counter and unlock any milestone it reaches.
  /// Returns the achievements unlocked by this call.
  #[instrument(level = "info", skip(self), fields(kind = kind.as_str()))]
  pub async fn increment_stat(&self, kind: StatKind) -> Result<Vec<AchievementDefinition>, AppError> {
    let store = self.store.lock().await;
    let mut p = store.load().await?;

    let unlocked = apply_stat(&mut p, kind);
    store.save(&p).await?;
    Ok(unlocked)
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn stats(&self) -> Result<StatsView, AppError> {
    let store = self.store.lock().await;
    let p = store.load().await?;
    Ok(StatsView::from_progress(&p))
  }
}
