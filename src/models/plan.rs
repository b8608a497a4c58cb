//! Weekly plan document types
//!
//! These structs mirror the plan documents stored in the document store and
//! echoed by the generator, so the wire format uses camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::profile::DietaryRestriction;

/// ---------------------------------------------------------------------------
/// Enumerations
/// ---------------------------------------------------------------------------

/// Workout modality requested from the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutCategory {
  Cardio,
  Strength,
  Flexibility,
  Mindfulness,
}

impl WorkoutCategory {
  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutCategory::Cardio => "cardio",
      WorkoutCategory::Strength => "strength",
      WorkoutCategory::Flexibility => "flexibility",
      WorkoutCategory::Mindfulness => "mindfulness",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealDifficulty {
  Easy,
  Medium,
  Hard,
}

impl MealDifficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      MealDifficulty::Easy => "easy",
      MealDifficulty::Medium => "medium",
      MealDifficulty::Hard => "hard",
    }
  }
}

/// Where a plan came from: the generation pipeline or the fixed fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
  Generated,
  Fallback,
}

impl PlanSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      PlanSource::Generated => "generated",
      PlanSource::Fallback => "fallback",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tasks
/// ---------------------------------------------------------------------------

/// Reduced version of a task offered when the full version feels like too much
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedVersion {
  pub title: String,
  /// Minutes
  pub duration: u32,
  pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTask {
  pub id: String,
  pub title: String,
  /// Minutes
  pub duration: u32,
  #[serde(rename = "type")]
  pub category: WorkoutCategory,
  pub description: String,
  pub is_completed: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub simplified_version: Option<SimplifiedVersion>,
}

/// One step of a meal recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
  pub step_number: u32,
  pub instruction: String,
  /// Minutes
  pub estimated_time: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealTask {
  pub id: String,
  pub title: String,
  /// Minutes
  pub prep_time: u32,
  pub servings: u32,
  pub difficulty: MealDifficulty,
  pub is_completed: bool,
  #[serde(default)]
  pub steps: Vec<RecipeStep>,
  #[serde(default)]
  pub ingredients: Vec<String>,
  #[serde(default)]
  pub dietary_tags: Vec<DietaryRestriction>,
}

/// ---------------------------------------------------------------------------
/// Weekly Plan
/// ---------------------------------------------------------------------------

/// One week of workouts and meal preps for a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusPlan {
  pub id: String,
  pub user_id: String,
  pub week_number: u32,
  pub workouts: Vec<WorkoutTask>,
  pub meals: Vec<MealTask>,
  pub created_at: DateTime<Utc>,
  pub source: PlanSource,
}

impl FocusPlan {
  pub fn is_fallback(&self) -> bool {
    self.source == PlanSource::Fallback
  }
}

/// Which task array of a plan an update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
  Workout,
  Meal,
}

impl TaskKind {
  /// Id prefix for tasks of this kind (`workout-0`, `meal-2`, ...)
  pub fn id_prefix(&self) -> &'static str {
    match self {
      TaskKind::Workout => "workout",
      TaskKind::Meal => "meal",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_workout_task_wire_format_is_camel_case() {
    let task = WorkoutTask {
      id: "workout-0".to_string(),
      title: "5-Minute Morning Stretch".to_string(),
      duration: 5,
      category: WorkoutCategory::Flexibility,
      description: "Gentle stretches".to_string(),
      is_completed: false,
      simplified_version: None,
    };

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["type"], "flexibility");
    assert_eq!(json["isCompleted"], false);
    assert!(json.get("is_completed").is_none());
  }

  #[test]
  fn test_meal_task_optional_lists_default_empty() {
    let json = r#"{
      "id": "meal-0",
      "title": "Quick Protein Bowl",
      "prepTime": 5,
      "servings": 2,
      "difficulty": "easy",
      "isCompleted": false
    }"#;

    let meal: MealTask = serde_json::from_str(json).unwrap();
    assert!(meal.steps.is_empty());
    assert!(meal.ingredients.is_empty());
    assert!(meal.dietary_tags.is_empty());
  }

  #[test]
  fn test_plan_source_round_trip() {
    let json = serde_json::to_string(&PlanSource::Fallback).unwrap();
    assert_eq!(json, "\"fallback\"");
    let back: PlanSource = serde_json::from_str(&json).unwrap();
    assert_eq!(back, PlanSource::Fallback);
  }
}
