//! focusfit-core: headless core of an ADHD-friendly fitness and meal prep
//! assistant.
//!
//! The main entry points are [`planner::PlanService`] for AI weekly plan
//! generation (with a fixed fallback when anything fails),
//! [`chat::body_double_reply`] for supportive chat,
//! [`suggestions::smart_workout_suggestions`] for history-based workout
//! guidance, and [`store::PlanStore`] for profiles, plan documents,
//! completion events, and plan/win subscriptions.

pub mod chat;
pub mod db;
pub mod llm;
pub mod models;
pub mod planner;
pub mod store;
pub mod suggestions;

#[cfg(test)]
pub mod test_utils;

pub use chat::{body_double_reply, UserContext};
pub use db::{init_db, DbPool};
pub use llm::{GeneratorClient, GeneratorConfig, GeneratorError};
pub use models::{AdhdHurdle, DietaryRestriction, FocusPlan, MealTask, TaskKind, WorkoutTask};
pub use planner::{fallback_plan, PlanError, PlanObserver, PlanService};
pub use store::{PlanStore, StoreError};
pub use suggestions::{smart_workout_suggestions, WorkoutSuggestions};
