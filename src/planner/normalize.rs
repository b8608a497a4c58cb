//! Schema validation and normalization of parsed generator output
//!
//! Turns the loosely-shaped JSON object from the parser into a fully-typed
//! `FocusPlan`: validates required fields, assigns stable ids, fills
//! defaults, and forces completion flags off. Pure transform, no I/O.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::models::plan::{
  FocusPlan, MealDifficulty, MealTask, PlanSource, SimplifiedVersion, WorkoutCategory,
  WorkoutTask,
};
use crate::models::profile::DietaryRestriction;
use crate::planner::{PlanError, DEFAULT_USER_ID, MEALS_PER_WEEK, WORKOUTS_PER_WEEK};

/// ---------------------------------------------------------------------------
/// Raw Shapes
/// ---------------------------------------------------------------------------

// Required fields are non-Option so a missing one fails deserialization;
// everything else defaults. Source ids and completion flags are ignored
// outright since normalization overrides both.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkout {
  title: String,
  duration: u32,
  #[serde(rename = "type")]
  category: WorkoutCategory,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  simplified_version: Option<RawSimplified>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSimplified {
  title: String,
  duration: u32,
  #[serde(default)]
  description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMeal {
  title: String,
  prep_time: u32,
  difficulty: MealDifficulty,
  #[serde(default)]
  servings: Option<u32>,
  #[serde(default)]
  ingredients: Option<Vec<String>>,
  #[serde(default)]
  dietary_tags: Option<Vec<DietaryRestriction>>,
}

/// ---------------------------------------------------------------------------
/// Normalization
/// ---------------------------------------------------------------------------

/// Build a typed weekly plan from a parsed generator response.
///
/// Fails with `SchemaViolation` when `workouts` or `meals` is missing, not a
/// list, holds an element missing a required field, or doesn't contain
/// exactly the contracted number of tasks. Callers must substitute the
/// fallback plan on failure; partial plans never leave this function.
pub fn normalize_plan(value: &Value, user_id: Option<&str>) -> Result<FocusPlan, PlanError> {
  let workouts = expect_task_array(value, "workouts", WORKOUTS_PER_WEEK)?;
  let meals = expect_task_array(value, "meals", MEALS_PER_WEEK)?;

  let workouts = workouts
    .iter()
    .enumerate()
    .map(|(index, raw)| normalize_workout(raw, index))
    .collect::<Result<Vec<_>, _>>()?;

  let meals = meals
    .iter()
    .enumerate()
    .map(|(index, raw)| normalize_meal(raw, index))
    .collect::<Result<Vec<_>, _>>()?;

  let created_at = Utc::now();
  Ok(FocusPlan {
    id: created_at.timestamp_millis().to_string(),
    user_id: user_id.unwrap_or(DEFAULT_USER_ID).to_string(),
    week_number: 1,
    workouts,
    meals,
    created_at,
    source: PlanSource::Generated,
  })
}

fn expect_task_array<'a>(
  value: &'a Value,
  field: &str,
  expected: usize,
) -> Result<&'a Vec<Value>, PlanError> {
  let array = value
    .get(field)
    .and_then(Value::as_array)
    .ok_or_else(|| PlanError::SchemaViolation(format!("{} is missing or not a list", field)))?;

  if array.len() != expected {
    return Err(PlanError::SchemaViolation(format!(
      "expected {} {}, got {}",
      expected,
      field,
      array.len()
    )));
  }

  Ok(array)
}

fn normalize_workout(raw: &Value, index: usize) -> Result<WorkoutTask, PlanError> {
  let raw: RawWorkout = serde_json::from_value(raw.clone())
    .map_err(|e| PlanError::SchemaViolation(format!("workout {}: {}", index, e)))?;

  Ok(WorkoutTask {
    id: format!("workout-{}", index),
    title: raw.title,
    duration: raw.duration,
    category: raw.category,
    description: raw.description.unwrap_or_default(),
    is_completed: false,
    simplified_version: raw.simplified_version.map(|s| SimplifiedVersion {
      title: s.title,
      duration: s.duration,
      description: s.description.unwrap_or_default(),
    }),
  })
}

fn normalize_meal(raw: &Value, index: usize) -> Result<MealTask, PlanError> {
  let raw: RawMeal = serde_json::from_value(raw.clone())
    .map_err(|e| PlanError::SchemaViolation(format!("meal {}: {}", index, e)))?;

  Ok(MealTask {
    id: format!("meal-{}", index),
    title: raw.title,
    prep_time: raw.prep_time,
    servings: raw.servings.unwrap_or(1),
    difficulty: raw.difficulty,
    is_completed: false,
    steps: Vec::new(),
    ingredients: raw.ingredients.unwrap_or_default(),
    dietary_tags: raw.dietary_tags.unwrap_or_default(),
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
