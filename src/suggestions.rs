//! Smart workout suggestions
//!
//! Analyzes a user's completed-workout history (what they did and at what
//! hour) and asks the generator for optimal exercise times, preferred
//! workout types, and a short insight. Same degraded-output policy as the
//! planner: any failure yields sensible fixed suggestions, never an error.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{GeneratorClient, GeneratorError};
use crate::models::profile::{UserProfile, WinType};
use crate::planner::parse_plan_response;
use crate::store::{PlanStore, StoreError};

pub const ANALYST_SYSTEM_PROMPT: &str = include_str!("prompts/analyst_system.txt");

const SUGGESTIONS_MAX_TOKENS: u32 = 512;

/// ---------------------------------------------------------------------------
/// Suggestion Types
/// ---------------------------------------------------------------------------

/// Personalized workout guidance derived from completion history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSuggestions {
  pub optimal_times: Vec<String>,
  pub preferred_workout_types: Vec<String>,
  pub insights: String,
}

impl WorkoutSuggestions {
  /// Fixed suggestions for new users or when analysis fails
  pub fn defaults() -> Self {
    Self {
      optimal_times: vec![
        "Morning (7-9 AM)".to_string(),
        "Evening (5-7 PM)".to_string(),
      ],
      preferred_workout_types: vec![
        "Short workouts".to_string(),
        "Low-pressure exercises".to_string(),
      ],
      insights: "Start with short, manageable workouts. The best time to exercise is \
                 whenever you can show up!"
        .to_string(),
    }
  }
}

#[derive(Debug, Error)]
enum SuggestionError {
  #[error("user profile not found")]
  MissingProfile,
  #[error("analysis response was not valid JSON")]
  MalformedResponse,
  #[error("generator error: {0}")]
  Generator(#[from] GeneratorError),
  #[error("store error: {0}")]
  Store(#[from] StoreError),
}

/// ---------------------------------------------------------------------------
/// Suggestion Generation
/// ---------------------------------------------------------------------------

/// Analyze the user's workout wins and suggest optimal times, preferred
/// types, and an insight. Never fails: missing profiles, transport
/// problems, and unparseable responses all produce the fixed defaults.
pub async fn smart_workout_suggestions(
  client: &GeneratorClient,
  store: &PlanStore,
  user_id: &str,
) -> WorkoutSuggestions {
  match try_suggestions(client, store, user_id).await {
    Ok(suggestions) => suggestions,
    Err(error) => {
      tracing::warn!(%error, user_id, "workout analysis failed, using default suggestions");
      WorkoutSuggestions::defaults()
    }
  }
}

async fn try_suggestions(
  client: &GeneratorClient,
  store: &PlanStore,
  user_id: &str,
) -> Result<WorkoutSuggestions, SuggestionError> {
  let profile = store
    .get_user_profile(user_id)
    .await?
    .ok_or(SuggestionError::MissingProfile)?;
  let wins = store.get_dopamine_wins(user_id).await?;

  let workout_wins: Vec<_> = wins
    .iter()
    .filter(|w| w.win_type == WinType::Workout)
    .collect();
  let completion_hours: Vec<u32> = workout_wins.iter().map(|w| w.created_at.hour()).collect();
  let workout_titles: Vec<&str> = workout_wins.iter().map(|w| w.title.as_str()).collect();

  let prompt = build_analysis_prompt(&profile, &completion_hours, &workout_titles);

  let (text, _usage) = client
    .complete(ANALYST_SYSTEM_PROMPT, &prompt, SUGGESTIONS_MAX_TOKENS)
    .await?;

  let value = parse_plan_response(&text).map_err(|_| SuggestionError::MalformedResponse)?;

  // Any individual field the model leaves out falls back on its own
  let optimal_times = string_list(&value["optimalTimes"])
    .unwrap_or_else(|| vec!["Morning".to_string(), "Evening".to_string()]);
  let preferred_workout_types = string_list(&value["preferredWorkoutTypes"])
    .unwrap_or_else(|| vec!["Quick exercises".to_string()]);
  let insights = value["insights"]
    .as_str()
    .map(str::to_string)
    .unwrap_or_else(|| {
      "Keep building your workout habit! Consistency matters more than perfection.".to_string()
    });

  Ok(WorkoutSuggestions {
    optimal_times,
    preferred_workout_types,
    insights,
  })
}

fn build_analysis_prompt(
  profile: &UserProfile,
  completion_hours: &[u32],
  workout_titles: &[&str],
) -> String {
  let hurdles = profile
    .adhd_hurdles
    .iter()
    .map(|h| h.prompt_label())
    .collect::<Vec<_>>()
    .join(", ");
  let hours = completion_hours
    .iter()
    .map(|h| h.to_string())
    .collect::<Vec<_>>()
    .join(", ");

  format!(
    r#"Analyze this user's workout history and provide smart insights.

User's ADHD hurdles: {hurdles}
Total workouts completed: {count}
Completion times (hours of day): {hours}
Workout types completed: {titles}

Based on this data, suggest:
1. The 2-3 optimal times of day for this user to exercise (considering their ADHD hurdles)
2. Their preferred workout types
3. Personalized insights about their workout patterns

Format as JSON:
{{
  "optimalTimes": ["7:00 AM", "5:30 PM"],
  "preferredWorkoutTypes": ["short cardio", "bodyweight exercises"],
  "insights": "You tend to complete workouts in the morning. Consider scheduling your most important workout then."
}}"#,
    hurdles = hurdles,
    count = workout_titles.len(),
    hours = hours,
    titles = workout_titles.join(", "),
  )
}

/// A JSON array of strings as a Vec, None for anything else or an empty array
fn string_list(value: &serde_json::Value) -> Option<Vec<String>> {
  let items = value.as_array()?;
  let strings: Vec<String> = items
    .iter()
    .filter_map(|v| v.as_str().map(str::to_string))
    .collect();
  if strings.is_empty() {
    None
  } else {
    Some(strings)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};
  use sqlx::SqlitePool;

  use crate::llm::GeneratorConfig;
  use crate::models::profile::{AdhdHurdle, DietaryRestriction, UserPreferences, WinType};
  use crate::test_utils::{completion_envelope, seed_test_profile, setup_test_db, teardown_test_db};

  fn client_for(server: &mockito::Server) -> GeneratorClient {
    let mut config = GeneratorConfig::new("test-key");
    config.base_url = server.url();
    GeneratorClient::new(config)
  }

  async fn store_with_profile(pool: &SqlitePool) -> PlanStore {
    let store = PlanStore::new(pool.clone());
    seed_test_profile(&store, "user-1").await;
    store
  }

  #[tokio::test]
  async fn test_suggestions_come_from_analysis_response() {
    let pool = setup_test_db().await;
    let store = store_with_profile(&pool).await;
    store
      .add_dopamine_win("user-1", WinType::Workout, "10-Minute Walk", "done")
      .await
      .unwrap();

    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/")
      .with_status(200)
      .with_body(completion_envelope(
        r#"{"optimalTimes": ["8:00 AM"], "preferredWorkoutTypes": ["walking"], "insights": "Mornings work for you."}"#,
      ))
      .create_async()
      .await;

    let suggestions = smart_workout_suggestions(&client_for(&server), &store, "user-1").await;
    assert_eq!(suggestions.optimal_times, vec!["8:00 AM"]);
    assert_eq!(suggestions.preferred_workout_types, vec!["walking"]);
    assert_eq!(suggestions.insights, "Mornings work for you.");

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_missing_fields_fall_back_individually() {
    let pool = setup_test_db().await;
    let store = store_with_profile(&pool).await;

    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/")
      .with_status(200)
      .with_body(completion_envelope(r#"{"insights": "Just keep going."}"#))
      .create_async()
      .await;

    let suggestions = smart_workout_suggestions(&client_for(&server), &store, "user-1").await;
    assert_eq!(suggestions.optimal_times, vec!["Morning", "Evening"]);
    assert_eq!(suggestions.preferred_workout_types, vec!["Quick exercises"]);
    assert_eq!(suggestions.insights, "Just keep going.");

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_transport_failure_yields_defaults() {
    let pool = setup_test_db().await;
    let store = store_with_profile(&pool).await;

    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/")
      .with_status(503)
      .create_async()
      .await;

    let suggestions = smart_workout_suggestions(&client_for(&server), &store, "user-1").await;
    assert_eq!(suggestions, WorkoutSuggestions::defaults());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_non_json_response_yields_defaults() {
    let pool = setup_test_db().await;
    let store = store_with_profile(&pool).await;

    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/")
      .with_status(200)
      .with_body(completion_envelope("I'd rather chat about your week."))
      .create_async()
      .await;

    let suggestions = smart_workout_suggestions(&client_for(&server), &store, "user-1").await;
    assert_eq!(suggestions, WorkoutSuggestions::defaults());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_unknown_user_yields_defaults_without_calling_generator() {
    let pool = setup_test_db().await;
    let store = PlanStore::new(pool.clone());

    let server = mockito::Server::new_async().await;
    // No mock registered; a request would fail loudly

    let suggestions = smart_workout_suggestions(&client_for(&server), &store, "nobody").await;
    assert_eq!(suggestions, WorkoutSuggestions::defaults());

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_analysis_prompt_includes_history() {
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 7, 30, 0).unwrap();
    let profile = UserProfile {
      id: "user-1".to_string(),
      email: "sam@focusfit.app".to_string(),
      adhd_hurdles: vec![AdhdHurdle::StartingIsHard, AdhdHurdle::TimeBlindness],
      dietary_restrictions: vec![DietaryRestriction::None],
      current_plan_id: None,
      preferences: UserPreferences::default(),
      created_at: now,
      updated_at: now,
    };

    let prompt = build_analysis_prompt(&profile, &[7, 18], &["10-Minute Walk", "Quick Stretch"]);
    assert!(prompt.contains("starting is hard, time blindness"));
    assert!(prompt.contains("Total workouts completed: 2"));
    assert!(prompt.contains("7, 18"));
    assert!(prompt.contains("10-Minute Walk, Quick Stretch"));
    assert!(prompt.contains("optimalTimes"));
  }

  #[test]
  fn test_string_list_rejects_non_arrays_and_empties() {
    assert_eq!(string_list(&serde_json::json!(["a", "b"])), Some(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(string_list(&serde_json::json!([])), None);
    assert_eq!(string_list(&serde_json::json!("a")), None);
    assert_eq!(string_list(&serde_json::json!([1, 2])), None);
  }
}
