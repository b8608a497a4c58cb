//! Document store for profiles, plans, and completion events
//!
//! Plans are stored as whole JSON documents (one row per plan) with a few
//! extracted columns for querying; the user record carries a pointer to the
//! currently-active plan. Writes to a plan are pushed to any live
//! subscribers through a watch channel, so a subscriber always observes the
//! latest written state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::watch;

use crate::chat::UserContext;
use crate::models::plan::{FocusPlan, TaskKind};
use crate::models::profile::{
  AdhdHurdle, DietaryRestriction, DopamineWin, UserPreferences, UserProfile, WinType,
};

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Document serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Not found: {0}")]
  NotFound(String),
}

/// ---------------------------------------------------------------------------
/// Plan Store
/// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PlanStore {
  pool: SqlitePool,
  plan_watchers: Arc<Mutex<HashMap<String, watch::Sender<Option<FocusPlan>>>>>,
  win_watchers: Arc<Mutex<HashMap<String, watch::Sender<Vec<DopamineWin>>>>>,
}

impl PlanStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self {
      pool,
      plan_watchers: Arc::new(Mutex::new(HashMap::new())),
      win_watchers: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  /// -------------------------------------------------------------------------
  /// User Profiles
  /// -------------------------------------------------------------------------

  /// Create (or replace) a user profile at the end of onboarding
  pub async fn create_user_profile(
    &self,
    user_id: &str,
    email: &str,
    adhd_hurdles: Vec<AdhdHurdle>,
    dietary_restrictions: Vec<DietaryRestriction>,
  ) -> Result<UserProfile, StoreError> {
    let now = Utc::now();
    let profile = UserProfile {
      id: user_id.to_string(),
      email: email.to_string(),
      adhd_hurdles,
      dietary_restrictions,
      current_plan_id: None,
      preferences: UserPreferences::default(),
      created_at: now,
      updated_at: now,
    };

    sqlx::query(
      r#"
      INSERT OR REPLACE INTO users (
        id, email, adhd_hurdles, dietary_restrictions,
        current_plan_id, preferences, created_at, updated_at
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
      "#,
    )
    .bind(&profile.id)
    .bind(&profile.email)
    .bind(serde_json::to_string(&profile.adhd_hurdles)?)
    .bind(serde_json::to_string(&profile.dietary_restrictions)?)
    .bind(&profile.current_plan_id)
    .bind(serde_json::to_string(&profile.preferences)?)
    .bind(profile.created_at)
    .bind(profile.updated_at)
    .execute(&self.pool)
    .await?;

    Ok(profile)
  }

  pub async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
    let row: Option<(
      String,
      String,
      String,
      Option<String>,
      String,
      chrono::DateTime<Utc>,
      chrono::DateTime<Utc>,
    )> = sqlx::query_as(
      r#"
      SELECT email, adhd_hurdles, dietary_restrictions,
             current_plan_id, preferences, created_at, updated_at
      FROM users WHERE id = ?1
      "#,
    )
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    let Some((email, hurdles, dietary, current_plan_id, preferences, created_at, updated_at)) =
      row
    else {
      return Ok(None);
    };

    Ok(Some(UserProfile {
      id: user_id.to_string(),
      email,
      adhd_hurdles: serde_json::from_str(&hurdles)?,
      dietary_restrictions: serde_json::from_str(&dietary)?,
      current_plan_id,
      preferences: serde_json::from_str(&preferences)?,
      created_at,
      updated_at,
    }))
  }

  /// -------------------------------------------------------------------------
  /// Plans
  /// -------------------------------------------------------------------------

  /// Persist a normalized plan document and make it the user's current plan.
  /// Returns the stored plan id.
  pub async fn save_plan(&self, user_id: &str, plan: &FocusPlan) -> Result<String, StoreError> {
    let document = serde_json::to_string(plan)?;

    sqlx::query(
      r#"
      INSERT OR REPLACE INTO focus_plans (
        id, user_id, week_number, source, document, created_at
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      "#,
    )
    .bind(&plan.id)
    .bind(user_id)
    .bind(plan.week_number as i64)
    .bind(plan.source.as_str())
    .bind(&document)
    .bind(plan.created_at)
    .execute(&self.pool)
    .await?;

    sqlx::query("UPDATE users SET current_plan_id = ?1, updated_at = ?2 WHERE id = ?3")
      .bind(&plan.id)
      .bind(Utc::now())
      .bind(user_id)
      .execute(&self.pool)
      .await?;

    self.notify_plan_update(&plan.id, plan.clone());
    tracing::debug!(plan_id = %plan.id, user_id, "plan saved");

    Ok(plan.id.clone())
  }

  pub async fn get_plan(&self, plan_id: &str) -> Result<Option<FocusPlan>, StoreError> {
    let row: Option<(String,)> =
      sqlx::query_as("SELECT document FROM focus_plans WHERE id = ?1")
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?;

    match row {
      Some((document,)) => Ok(Some(serde_json::from_str(&document)?)),
      None => Ok(None),
    }
  }

  /// The plan the user's record currently points at, if any
  pub async fn get_current_plan(&self, user_id: &str) -> Result<Option<FocusPlan>, StoreError> {
    let Some(profile) = self.get_user_profile(user_id).await? else {
      return Ok(None);
    };
    let Some(plan_id) = profile.current_plan_id else {
      return Ok(None);
    };
    self.get_plan(&plan_id).await
  }

  /// Subscribe to updates of one plan. The receiver is seeded with the
  /// current stored state and pushed on every subsequent write.
  pub async fn subscribe_to_plan(
    &self,
    plan_id: &str,
  ) -> Result<watch::Receiver<Option<FocusPlan>>, StoreError> {
    let current = self.get_plan(plan_id).await?;

    let mut watchers = self.plan_watchers.lock().expect("watcher lock poisoned");
    if let Some(sender) = watchers.get(plan_id) {
      if !sender.is_closed() {
        return Ok(sender.subscribe());
      }
      // All receivers dropped: re-seed with fresh state instead
      watchers.remove(plan_id);
    }
    let (sender, receiver) = watch::channel(current);
    watchers.insert(plan_id.to_string(), sender);
    Ok(receiver)
  }

  fn notify_plan_update(&self, plan_id: &str, plan: FocusPlan) {
    let mut watchers = self.plan_watchers.lock().expect("watcher lock poisoned");
    if let Some(sender) = watchers.get(plan_id) {
      if sender.is_closed() {
        watchers.remove(plan_id);
      } else {
        sender.send_replace(Some(plan));
      }
    }
  }

  #[cfg(test)]
  fn plan_watcher_count(&self) -> usize {
    self.plan_watchers.lock().expect("watcher lock poisoned").len()
  }

  #[cfg(test)]
  fn win_watcher_count(&self) -> usize {
    self.win_watchers.lock().expect("watcher lock poisoned").len()
  }

  /// -------------------------------------------------------------------------
  /// Task Completion
  /// -------------------------------------------------------------------------

  /// Flip one task's completion flag inside a stored plan. Completing a task
  /// records a dopamine win. Returns the updated plan.
  pub async fn update_task_status(
    &self,
    user_id: &str,
    plan_id: &str,
    task_id: &str,
    kind: TaskKind,
    is_completed: bool,
  ) -> Result<FocusPlan, StoreError> {
    let mut plan = self
      .get_plan(plan_id)
      .await?
      .ok_or_else(|| StoreError::NotFound(format!("plan {}", plan_id)))?;

    let title = match kind {
      TaskKind::Workout => {
        let task = plan
          .workouts
          .iter_mut()
          .find(|t| t.id == task_id)
          .ok_or_else(|| StoreError::NotFound(format!("task {}", task_id)))?;
        task.is_completed = is_completed;
        task.title.clone()
      }
      TaskKind::Meal => {
        let task = plan
          .meals
          .iter_mut()
          .find(|t| t.id == task_id)
          .ok_or_else(|| StoreError::NotFound(format!("task {}", task_id)))?;
        task.is_completed = is_completed;
        task.title.clone()
      }
    };

    // Document write and win record land together or not at all
    let document = serde_json::to_string(&plan)?;
    let mut tx = self.pool.begin().await?;

    sqlx::query("UPDATE focus_plans SET document = ?1 WHERE id = ?2")
      .bind(&document)
      .bind(plan_id)
      .execute(&mut *tx)
      .await?;

    if is_completed {
      let (win_type, what) = match kind {
        TaskKind::Workout => (WinType::Workout, "workout"),
        TaskKind::Meal => (WinType::Meal, "meal prep"),
      };
      insert_win(
        &mut tx,
        user_id,
        win_type,
        &title,
        &format!("Completed {}: {}", what, title),
        Utc::now(),
      )
      .await?;
    }

    tx.commit().await?;

    if is_completed {
      self.refresh_win_watch(user_id).await?;
    }
    self.notify_plan_update(plan_id, plan.clone());

    Ok(plan)
  }

  /// -------------------------------------------------------------------------
  /// Dopamine Wins
  /// -------------------------------------------------------------------------

  pub async fn add_dopamine_win(
    &self,
    user_id: &str,
    win_type: WinType,
    title: &str,
    description: &str,
  ) -> Result<DopamineWin, StoreError> {
    let created_at = Utc::now();
    let mut conn = self.pool.acquire().await?;
    let id = insert_win(&mut conn, user_id, win_type, title, description, created_at).await?;
    drop(conn);

    self.refresh_win_watch(user_id).await?;

    Ok(DopamineWin {
      id,
      user_id: user_id.to_string(),
      win_type,
      title: title.to_string(),
      description: description.to_string(),
      created_at,
    })
  }

  /// Subscribe to one user's win list. The receiver is seeded with the
  /// current list (newest first) and pushed after every recorded win.
  pub async fn subscribe_to_dopamine_wins(
    &self,
    user_id: &str,
  ) -> Result<watch::Receiver<Vec<DopamineWin>>, StoreError> {
    let current = self.get_dopamine_wins(user_id).await?;

    let mut watchers = self.win_watchers.lock().expect("watcher lock poisoned");
    if let Some(sender) = watchers.get(user_id) {
      if !sender.is_closed() {
        return Ok(sender.subscribe());
      }
      watchers.remove(user_id);
    }
    let (sender, receiver) = watch::channel(current);
    watchers.insert(user_id.to_string(), sender);
    Ok(receiver)
  }

  /// Push the user's current win list to live subscribers, if any
  async fn refresh_win_watch(&self, user_id: &str) -> Result<(), StoreError> {
    let has_watcher = {
      let mut watchers = self.win_watchers.lock().expect("watcher lock poisoned");
      match watchers.get(user_id) {
        Some(sender) if sender.is_closed() => {
          watchers.remove(user_id);
          false
        }
        Some(_) => true,
        None => false,
      }
    };
    if !has_watcher {
      return Ok(());
    }

    let wins = self.get_dopamine_wins(user_id).await?;
    let watchers = self.win_watchers.lock().expect("watcher lock poisoned");
    if let Some(sender) = watchers.get(user_id) {
      sender.send_replace(wins);
    }
    Ok(())
  }

  /// All wins for a user, newest first
  pub async fn get_dopamine_wins(&self, user_id: &str) -> Result<Vec<DopamineWin>, StoreError> {
    let rows: Vec<(i64, String, String, String, chrono::DateTime<Utc>)> = sqlx::query_as(
      r#"
      SELECT id, win_type, title, description, created_at
      FROM dopamine_wins
      WHERE user_id = ?1
      ORDER BY created_at DESC, id DESC
      "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    rows
      .into_iter()
      .map(|(id, win_type, title, description, created_at)| {
        let win_type: WinType = serde_json::from_value(serde_json::Value::String(win_type))?;
        Ok(DopamineWin {
          id,
          user_id: user_id.to_string(),
          win_type,
          title,
          description,
          created_at,
        })
      })
      .collect()
  }

  /// -------------------------------------------------------------------------
  /// AI Context
  /// -------------------------------------------------------------------------

  /// Profile summary handed to the body double so replies can reference the
  /// user's hurdles and momentum
  pub async fn user_context_for_ai(&self, user_id: &str) -> Result<UserContext, StoreError> {
    let profile = self.get_user_profile(user_id).await?;
    let wins = self.get_dopamine_wins(user_id).await?;

    let week_ago = Utc::now() - Duration::days(7);
    let recent_wins = wins.iter().filter(|w| w.created_at > week_ago).count();

    let (name, hurdles, restrictions) = match profile {
      Some(p) => {
        let name = p
          .email
          .split('@')
          .next()
          .filter(|s| !s.is_empty())
          .unwrap_or("there")
          .to_string();
        (name, p.adhd_hurdles, p.dietary_restrictions)
      }
      None => ("there".to_string(), Vec::new(), Vec::new()),
    };

    Ok(UserContext {
      name,
      adhd_hurdles: hurdles,
      dietary_restrictions: restrictions,
      recent_wins,
    })
  }
}

/// Insert one win row on the given connection (plain or transactional)
async fn insert_win(
  conn: &mut sqlx::SqliteConnection,
  user_id: &str,
  win_type: WinType,
  title: &str,
  description: &str,
  created_at: chrono::DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
  let result = sqlx::query(
    r#"
    INSERT INTO dopamine_wins (user_id, win_type, title, description, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(user_id)
  .bind(win_type.as_str())
  .bind(title)
  .bind(description)
  .bind(created_at)
  .execute(conn)
  .await?;

  Ok(result.last_insert_rowid())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
