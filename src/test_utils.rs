//! Test utilities and helpers for integration and unit testing
//!
//! Provides common test infrastructure:
//! - In-memory database setup/teardown
//! - Seed helpers
//! - Canned generator responses

use sqlx::SqlitePool;

use crate::models::profile::{AdhdHurdle, DietaryRestriction};
use crate::store::PlanStore;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed a user profile with one hurdle and one restriction
pub async fn seed_test_profile(store: &PlanStore, user_id: &str) {
  store
    .create_user_profile(
      user_id,
      "sam@focusfit.app",
      vec![AdhdHurdle::StartingIsHard],
      vec![DietaryRestriction::None],
    )
    .await
    .expect("Failed to seed user profile");
}

/// ---------------------------------------------------------------------------
/// Canned Generator Responses
/// ---------------------------------------------------------------------------

/// Wrap `text` in a Claude messages-API response body
pub fn completion_envelope(text: &str) -> String {
  serde_json::json!({
    "content": [{"type": "text", "text": text}],
    "model": "test-model",
    "stop_reason": "end_turn",
    "usage": {"input_tokens": 50, "output_tokens": 200}
  })
  .to_string()
}

/// A well-formed plan response: 3 workouts, 3 meals, vegan + gluten-free tags
pub fn valid_plan_json() -> String {
  serde_json::json!({
    "workouts": [
      {
        "title": "5-Minute Morning Stretch",
        "duration": 5,
        "type": "flexibility",
        "description": "Gentle stretches to wake up your body",
        "simplifiedVersion": {
          "title": "2-Minute Quick Stretch",
          "duration": 2,
          "description": "Just stretch your arms overhead"
        }
      },
      {
        "title": "10-Minute Walk",
        "duration": 10,
        "type": "cardio",
        "description": "Easy neighborhood walk"
      },
      {
        "title": "7-Minute Bodyweight Circuit",
        "duration": 7,
        "type": "strength",
        "description": "Simple exercises at home"
      }
    ],
    "meals": [
      {
        "title": "Quick Protein Bowl",
        "prepTime": 5,
        "servings": 2,
        "difficulty": "easy",
        "ingredients": ["1 cup cooked quinoa", "1 can chickpeas"],
        "dietaryTags": ["vegan", "gluten_free"]
      },
      {
        "title": "Green Smoothie",
        "prepTime": 3,
        "servings": 1,
        "difficulty": "easy",
        "dietaryTags": ["vegan", "gluten_free"]
      },
      {
        "title": "Rice Paper Rolls",
        "prepTime": 8,
        "servings": 2,
        "difficulty": "medium",
        "dietaryTags": ["vegan", "gluten_free"]
      }
    ]
  })
  .to_string()
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('users', 'focus_plans', 'dopamine_wins')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3, "Expected 3 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_valid_plan_json_parses() {
    let value: serde_json::Value = serde_json::from_str(&valid_plan_json()).unwrap();
    assert_eq!(value["workouts"].as_array().unwrap().len(), 3);
    assert_eq!(value["meals"].as_array().unwrap().len(), 3);
  }

  #[test]
  fn test_completion_envelope_matches_api_shape() {
    let value: serde_json::Value =
      serde_json::from_str(&completion_envelope("hello")).unwrap();
    assert_eq!(value["content"][0]["text"], "hello");
    assert_eq!(value["content"][0]["type"], "text");
  }
}
