//! Prompt construction for weekly plan generation

use crate::models::profile::{AdhdHurdle, DietaryRestriction};
use crate::planner::{PlanError, MEALS_PER_WEEK, WORKOUTS_PER_WEEK};

/// System prompt shared by every plan-generation request
pub const PLANNER_SYSTEM_PROMPT: &str = include_str!("../prompts/planner_system.txt");

/// Build the user instruction for one plan-generation request.
///
/// Fails only when `hurdles` is empty; the caller decides whether to
/// substitute a default hurdle or fall back entirely.
pub fn build_plan_prompt(
  hurdles: &[AdhdHurdle],
  dietary: Option<&[DietaryRestriction]>,
  user_context: Option<&str>,
) -> Result<String, PlanError> {
  if hurdles.is_empty() {
    return Err(PlanError::InvalidInput(
      "at least one ADHD hurdle is required".to_string(),
    ));
  }

  let hurdle_list = hurdles
    .iter()
    .map(|h| h.prompt_label())
    .collect::<Vec<_>>()
    .join(", ");

  // The "none" sentinel means unrestricted, same as no list at all
  let restrictions: Vec<&DietaryRestriction> = dietary
    .unwrap_or_default()
    .iter()
    .filter(|r| **r != DietaryRestriction::None)
    .collect();

  let mut prompt = format!(
    "Create a simple, low-friction 1-week plan for someone with these challenges: {}.\n\n\
     Requirements:\n\
     - {} short workouts per week (5-15 minutes each)\n\
     - {} simple meal prep recipes (5-10 minutes prep time)\n\
     - Each task should have a simplified version for overwhelm\n\
     - Focus on building sustainable habits, not perfection\n",
    hurdle_list, WORKOUTS_PER_WEEK, MEALS_PER_WEEK
  );

  if !restrictions.is_empty() {
    let restriction_list = restrictions
      .iter()
      .map(|r| r.prompt_label())
      .collect::<Vec<_>>()
      .join(", ");
    prompt.push_str(&format!(
      "- Every meal's ingredient list MUST honor these dietary restrictions: {}\n\
       - Each meal must carry a \"dietaryTags\" array naming the restrictions it satisfies\n",
      restriction_list
    ));
  }

  if let Some(context) = user_context {
    prompt.push_str(&format!("\nAbout this user: {}\n", context));
  }

  prompt.push_str(
    r#"
Format your response as JSON with this structure:
{
  "workouts": [
    {
      "title": "5-Minute Morning Stretch",
      "duration": 5,
      "type": "flexibility",
      "description": "Gentle stretches to wake up your body",
      "simplifiedVersion": {
        "title": "2-Minute Quick Stretch",
        "duration": 2,
        "description": "Just stretch your arms overhead and touch your toes"
      }
    }
  ],
  "meals": [
    {
      "title": "Quick Protein Bowl",
      "prepTime": 5,
      "servings": 2,
      "difficulty": "easy",
      "description": "Simple protein-rich meal",
      "ingredients": ["1 cup cooked rice", "1 can chickpeas"],
      "dietaryTags": []
    }
  ]
}

"type" must be one of: cardio, strength, flexibility, mindfulness.
"difficulty" must be one of: easy, medium, hard.
"duration", "prepTime", and "servings" are positive integers."#,
  );

  Ok(prompt)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
