//! Weekly plan generation pipeline
//!
//! Linear chain: build prompt -> call generator -> parse response ->
//! normalize -> optionally persist. Any failure along the chain
//! short-circuits to the fixed fallback plan; `generate_plan` never returns
//! an error to its caller. There are no retries and no coordination between
//! concurrent requests - this is a low-frequency, user-initiated action and
//! a silently degraded plan is the accepted worst case.

pub mod fallback;
pub mod normalize;
pub mod parse;
pub mod prompt;

pub use fallback::fallback_plan;
pub use normalize::normalize_plan;
pub use parse::parse_plan_response;
pub use prompt::{build_plan_prompt, PLANNER_SYSTEM_PROMPT};

use thiserror::Error;

use crate::llm::{GeneratorClient, GeneratorError};
use crate::models::plan::FocusPlan;
use crate::models::profile::{AdhdHurdle, DietaryRestriction};
use crate::store::{PlanStore, StoreError};

/// Prompt contract: task counts every generated plan must satisfy
pub const WORKOUTS_PER_WEEK: usize = 3;
pub const MEALS_PER_WEEK: usize = 3;

/// User id recorded on plans generated before sign-in
pub const DEFAULT_USER_ID: &str = "current-user";

const PLAN_MAX_TOKENS: u32 = 1500;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

/// Everything that can go wrong between a generation request and a stored
/// plan. All variants are swallowed at the `generate_plan` boundary.
#[derive(Error, Debug)]
pub enum PlanError {
  #[error("Invalid input: {0}")]
  InvalidInput(String),

  #[error("Transport failure: {0}")]
  Transport(String),

  #[error("No JSON object found in generator response")]
  MalformedResponse,

  #[error("Response violates plan schema: {0}")]
  SchemaViolation(String),
}

impl PlanError {
  /// Stable kind tag for observability
  pub fn kind(&self) -> &'static str {
    match self {
      PlanError::InvalidInput(_) => "invalid_input",
      PlanError::Transport(_) => "transport",
      PlanError::MalformedResponse => "malformed_response",
      PlanError::SchemaViolation(_) => "schema_violation",
    }
  }
}

impl From<GeneratorError> for PlanError {
  fn from(err: GeneratorError) -> Self {
    PlanError::Transport(err.to_string())
  }
}

impl From<StoreError> for PlanError {
  fn from(err: StoreError) -> Self {
    PlanError::Transport(err.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Observability Hook
/// ---------------------------------------------------------------------------

/// Boundary event emitted once per `generate_plan` call
#[derive(Debug)]
pub enum PlanEvent<'a> {
  Generated { plan: &'a FocusPlan },
  FellBack { error: &'a PlanError },
}

/// Injected observer invoked only at the `generate_plan` boundary
pub trait PlanObserver: Send + Sync {
  fn observe(&self, event: PlanEvent<'_>);
}

/// Default observer that ignores everything
pub struct NoopObserver;

impl PlanObserver for NoopObserver {
  fn observe(&self, _event: PlanEvent<'_>) {}
}

/// ---------------------------------------------------------------------------
/// Plan Service
/// ---------------------------------------------------------------------------

pub struct PlanService {
  generator: GeneratorClient,
  store: Option<PlanStore>,
  observer: Box<dyn PlanObserver>,
}

impl PlanService {
  pub fn new(generator: GeneratorClient) -> Self {
    Self {
      generator,
      store: None,
      observer: Box::new(NoopObserver),
    }
  }

  /// Persist generated plans (and the user's current-plan link) to `store`
  pub fn with_store(mut self, store: PlanStore) -> Self {
    self.store = Some(store);
    self
  }

  pub fn with_observer(mut self, observer: Box<dyn PlanObserver>) -> Self {
    self.observer = observer;
    self
  }

  /// Generate a weekly plan. Always returns a valid plan: any internal
  /// failure yields the fallback plan instead of an error.
  pub async fn generate_plan(
    &self,
    hurdles: &[AdhdHurdle],
    dietary: Option<&[DietaryRestriction]>,
    user_id: Option<&str>,
  ) -> FocusPlan {
    self
      .generate_plan_with_context(hurdles, dietary, user_id, None)
      .await
  }

  /// Same as `generate_plan`, with optional free-text user context woven
  /// into the prompt (recent wins, preferred times, ...)
  pub async fn generate_plan_with_context(
    &self,
    hurdles: &[AdhdHurdle],
    dietary: Option<&[DietaryRestriction]>,
    user_id: Option<&str>,
    user_context: Option<&str>,
  ) -> FocusPlan {
    match self
      .try_generate(hurdles, dietary, user_id, user_context)
      .await
    {
      Ok(plan) => {
        tracing::info!(plan_id = %plan.id, "generated weekly plan");
        self.observer.observe(PlanEvent::Generated { plan: &plan });
        plan
      }
      Err(error) => {
        tracing::warn!(kind = error.kind(), %error, "plan generation failed, using fallback");
        self.observer.observe(PlanEvent::FellBack { error: &error });
        let mut plan = fallback_plan();
        if let Some(user_id) = user_id {
          plan.user_id = user_id.to_string();
        }
        plan
      }
    }
  }

  async fn try_generate(
    &self,
    hurdles: &[AdhdHurdle],
    dietary: Option<&[DietaryRestriction]>,
    user_id: Option<&str>,
    user_context: Option<&str>,
  ) -> Result<FocusPlan, PlanError> {
    let prompt = build_plan_prompt(hurdles, dietary, user_context)?;

    let (response_text, _usage) = self
      .generator
      .complete(PLANNER_SYSTEM_PROMPT, &prompt, PLAN_MAX_TOKENS)
      .await?;

    let parsed = parse_plan_response(&response_text)?;
    let plan = normalize_plan(&parsed, user_id)?;

    // Persist only complete, normalized plans; fallback plans stay local
    if let (Some(user_id), Some(store)) = (user_id, &self.store) {
      store.save_plan(user_id, &plan).await?;
    }

    Ok(plan)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
