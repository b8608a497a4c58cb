//! Fixed fallback plan used when generation fails anywhere in the chain

use chrono::Utc;

use crate::models::plan::{
  FocusPlan, MealDifficulty, MealTask, PlanSource, SimplifiedVersion, WorkoutCategory,
  WorkoutTask,
};
use crate::planner::DEFAULT_USER_ID;

/// A valid, hard-coded weekly plan. Never fails.
pub fn fallback_plan() -> FocusPlan {
  let created_at = Utc::now();

  FocusPlan {
    id: created_at.timestamp_millis().to_string(),
    user_id: DEFAULT_USER_ID.to_string(),
    week_number: 1,
    workouts: vec![
      WorkoutTask {
        id: "workout-0".to_string(),
        title: "5-Minute Morning Stretch".to_string(),
        duration: 5,
        category: WorkoutCategory::Flexibility,
        description: "Gentle stretches to start your day".to_string(),
        is_completed: false,
        simplified_version: Some(SimplifiedVersion {
          title: "2-Minute Quick Stretch".to_string(),
          duration: 2,
          description: "Just stretch your arms overhead".to_string(),
        }),
      },
      WorkoutTask {
        id: "workout-1".to_string(),
        title: "10-Minute Walk".to_string(),
        duration: 10,
        category: WorkoutCategory::Cardio,
        description: "Easy neighborhood walk".to_string(),
        is_completed: false,
        simplified_version: Some(SimplifiedVersion {
          title: "5-Minute Walk".to_string(),
          duration: 5,
          description: "Walk around your block".to_string(),
        }),
      },
      WorkoutTask {
        id: "workout-2".to_string(),
        title: "7-Minute Bodyweight Circuit".to_string(),
        duration: 7,
        category: WorkoutCategory::Strength,
        description: "Simple exercises at home".to_string(),
        is_completed: false,
        simplified_version: Some(SimplifiedVersion {
          title: "3-Minute Movement".to_string(),
          duration: 3,
          description: "Just do 10 squats".to_string(),
        }),
      },
    ],
    meals: vec![
      MealTask {
        id: "meal-0".to_string(),
        title: "Quick Chicken & Veggie Stir-Fry".to_string(),
        prep_time: 5,
        servings: 2,
        difficulty: MealDifficulty::Easy,
        is_completed: false,
        steps: Vec::new(),
        ingredients: Vec::new(),
        dietary_tags: Vec::new(),
      },
      MealTask {
        id: "meal-1".to_string(),
        title: "Protein Smoothie Bowl".to_string(),
        prep_time: 3,
        servings: 1,
        difficulty: MealDifficulty::Easy,
        is_completed: false,
        steps: Vec::new(),
        ingredients: Vec::new(),
        dietary_tags: Vec::new(),
      },
      MealTask {
        id: "meal-2".to_string(),
        title: "Simple Avocado Toast".to_string(),
        prep_time: 5,
        servings: 1,
        difficulty: MealDifficulty::Easy,
        is_completed: false,
        steps: Vec::new(),
        ingredients: Vec::new(),
        dietary_tags: Vec::new(),
      },
    ],
    created_at,
    source: PlanSource::Fallback,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::planner::{MEALS_PER_WEEK, WORKOUTS_PER_WEEK};

  #[test]
  fn test_fallback_plan_meets_contract() {
    let plan = fallback_plan();

    assert_eq!(plan.workouts.len(), WORKOUTS_PER_WEEK);
    assert_eq!(plan.meals.len(), MEALS_PER_WEEK);
    assert_eq!(plan.source, PlanSource::Fallback);
    assert!(plan.is_fallback());
  }

  #[test]
  fn test_fallback_durations_within_prompt_bounds() {
    let plan = fallback_plan();

    for workout in &plan.workouts {
      assert!((5..=15).contains(&workout.duration), "{}", workout.title);
      assert!(workout.simplified_version.is_some());
    }
    for meal in &plan.meals {
      assert!(meal.prep_time <= 10, "{}", meal.title);
      assert!(meal.servings >= 1);
    }
  }

  #[test]
  fn test_fallback_tasks_are_fresh() {
    let plan = fallback_plan();

    assert!(plan.workouts.iter().all(|w| !w.is_completed));
    assert!(plan.meals.iter().all(|m| !m.is_completed));
    assert_eq!(plan.workouts[0].id, "workout-0");
    assert_eq!(plan.meals[2].id, "meal-2");
  }
}
