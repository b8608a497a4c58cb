//! User profile types: hurdles, dietary restrictions, completion wins

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// ADHD Hurdles
/// ---------------------------------------------------------------------------

/// Behavioral friction point selected during onboarding, used to steer
/// plan generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdhdHurdle {
  ForgettingToEat,
  StartingIsHard,
  StayingFocused,
  DecisionParalysis,
  TimeBlindness,
}

impl AdhdHurdle {
  pub fn as_str(&self) -> &'static str {
    match self {
      AdhdHurdle::ForgettingToEat => "forgetting_to_eat",
      AdhdHurdle::StartingIsHard => "starting_is_hard",
      AdhdHurdle::StayingFocused => "staying_focused",
      AdhdHurdle::DecisionParalysis => "decision_paralysis",
      AdhdHurdle::TimeBlindness => "time_blindness",
    }
  }

  /// Human-readable form used inside generator prompts
  pub fn prompt_label(&self) -> &'static str {
    match self {
      AdhdHurdle::ForgettingToEat => "forgetting to eat",
      AdhdHurdle::StartingIsHard => "starting is hard",
      AdhdHurdle::StayingFocused => "staying focused",
      AdhdHurdle::DecisionParalysis => "decision paralysis",
      AdhdHurdle::TimeBlindness => "time blindness",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Dietary Restrictions
/// ---------------------------------------------------------------------------

/// Dietary restriction category, or the "none" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
  LactoseFree,
  GlutenFree,
  NutFree,
  Vegetarian,
  Vegan,
  None,
}

impl DietaryRestriction {
  pub fn as_str(&self) -> &'static str {
    match self {
      DietaryRestriction::LactoseFree => "lactose_free",
      DietaryRestriction::GlutenFree => "gluten_free",
      DietaryRestriction::NutFree => "nut_free",
      DietaryRestriction::Vegetarian => "vegetarian",
      DietaryRestriction::Vegan => "vegan",
      DietaryRestriction::None => "none",
    }
  }

  /// Short badge label shown on meal cards
  pub fn short_label(&self) -> &'static str {
    match self {
      DietaryRestriction::LactoseFree => "LF",
      DietaryRestriction::GlutenFree => "GF",
      DietaryRestriction::NutFree => "NF",
      DietaryRestriction::Vegetarian => "VG",
      DietaryRestriction::Vegan => "VE",
      DietaryRestriction::None => "",
    }
  }

  /// Human-readable form used inside generator prompts
  pub fn prompt_label(&self) -> &'static str {
    match self {
      DietaryRestriction::LactoseFree => "lactose-free",
      DietaryRestriction::GlutenFree => "gluten-free",
      DietaryRestriction::NutFree => "nut-free",
      DietaryRestriction::Vegetarian => "vegetarian",
      DietaryRestriction::Vegan => "vegan",
      DietaryRestriction::None => "no restrictions",
    }
  }
}

/// Tracks the set of restrictions a user is picking during onboarding.
///
/// Invariant: `None` and any other restriction are mutually exclusive.
/// Selecting `None` clears everything else; selecting anything else
/// clears `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietarySelection {
  restrictions: Vec<DietaryRestriction>,
}

impl DietarySelection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Flip the given restriction on or off, maintaining the exclusion rule
  pub fn toggle(&mut self, restriction: DietaryRestriction) {
    if restriction == DietaryRestriction::None {
      if self.restrictions.contains(&DietaryRestriction::None) {
        self.restrictions.clear();
      } else {
        self.restrictions = vec![DietaryRestriction::None];
      }
      return;
    }

    self.restrictions.retain(|r| *r != DietaryRestriction::None);

    if let Some(pos) = self.restrictions.iter().position(|r| *r == restriction) {
      self.restrictions.remove(pos);
    } else {
      self.restrictions.push(restriction);
    }
  }

  pub fn restrictions(&self) -> &[DietaryRestriction] {
    &self.restrictions
  }

  /// True when nothing is selected or only the "none" sentinel is
  pub fn is_unrestricted(&self) -> bool {
    self.restrictions.is_empty() || self.restrictions == [DietaryRestriction::None]
  }

  /// The restriction list to store on the profile: "none" when empty
  pub fn into_profile_restrictions(self) -> Vec<DietaryRestriction> {
    if self.restrictions.is_empty() {
      vec![DietaryRestriction::None]
    } else {
      self.restrictions
    }
  }
}

/// ---------------------------------------------------------------------------
/// User Profile
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
  pub enable_haptics: bool,
  pub enable_confetti: bool,
  pub enable_voice_logging: bool,
}

impl Default for UserPreferences {
  fn default() -> Self {
    Self {
      enable_haptics: true,
      enable_confetti: true,
      enable_voice_logging: true,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub id: String,
  pub email: String,
  pub adhd_hurdles: Vec<AdhdHurdle>,
  pub dietary_restrictions: Vec<DietaryRestriction>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub current_plan_id: Option<String>,
  pub preferences: UserPreferences,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// ---------------------------------------------------------------------------
/// Dopamine Wins
/// ---------------------------------------------------------------------------

/// What kind of completion produced a win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinType {
  Workout,
  Meal,
  Focus,
  Milestone,
}

impl WinType {
  pub fn as_str(&self) -> &'static str {
    match self {
      WinType::Workout => "workout",
      WinType::Meal => "meal",
      WinType::Focus => "focus",
      WinType::Milestone => "milestone",
    }
  }
}

/// Record of a completed task, kept for streaks and AI context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DopamineWin {
  pub id: i64,
  pub user_id: String,
  pub win_type: WinType,
  pub title: String,
  pub description: String,
  pub created_at: DateTime<Utc>,
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_toggle_none_clears_others() {
    let mut selection = DietarySelection::new();
    selection.toggle(DietaryRestriction::Vegan);
    selection.toggle(DietaryRestriction::GlutenFree);
    assert_eq!(selection.restrictions().len(), 2);

    selection.toggle(DietaryRestriction::None);
    assert_eq!(selection.restrictions(), [DietaryRestriction::None]);
  }

  #[test]
  fn test_toggle_restriction_clears_none() {
    let mut selection = DietarySelection::new();
    selection.toggle(DietaryRestriction::None);
    selection.toggle(DietaryRestriction::Vegetarian);
    assert_eq!(selection.restrictions(), [DietaryRestriction::Vegetarian]);
  }

  #[test]
  fn test_toggle_twice_removes() {
    let mut selection = DietarySelection::new();
    selection.toggle(DietaryRestriction::NutFree);
    selection.toggle(DietaryRestriction::NutFree);
    assert!(selection.restrictions().is_empty());
    assert!(selection.is_unrestricted());
  }

  #[test]
  fn test_toggle_none_twice_clears() {
    let mut selection = DietarySelection::new();
    selection.toggle(DietaryRestriction::None);
    selection.toggle(DietaryRestriction::None);
    assert!(selection.restrictions().is_empty());
  }

  #[test]
  fn test_empty_selection_stores_none_sentinel() {
    let selection = DietarySelection::new();
    assert_eq!(
      selection.into_profile_restrictions(),
      vec![DietaryRestriction::None]
    );
  }

  #[test]
  fn test_hurdle_serde_names_are_snake_case() {
    let json = serde_json::to_string(&AdhdHurdle::StartingIsHard).unwrap();
    assert_eq!(json, "\"starting_is_hard\"");
    let back: AdhdHurdle = serde_json::from_str("\"time_blindness\"").unwrap();
    assert_eq!(back, AdhdHurdle::TimeBlindness);
  }

  #[test]
  fn test_restriction_labels() {
    assert_eq!(DietaryRestriction::GlutenFree.short_label(), "GF");
    assert_eq!(DietaryRestriction::Vegan.prompt_label(), "vegan");
    assert_eq!(DietaryRestriction::None.short_label(), "");
  }
}
