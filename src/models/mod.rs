pub mod plan;
pub mod profile;

pub use plan::{FocusPlan, MealTask, PlanSource, TaskKind, WorkoutTask};
pub use profile::{AdhdHurdle, DietaryRestriction, UserProfile};
