//! AI Body Double chat
//!
//! Short, supportive replies that keep the user company while they work
//! through a task. Same degraded-output policy as the planner: if the
//! generation call fails for any reason, the user gets a canned
//! encouragement instead of an error.

use crate::llm::{GeneratorClient, GeneratorError};
use crate::models::profile::{AdhdHurdle, DietaryRestriction};

pub const BODY_DOUBLE_SYSTEM_PROMPT: &str = include_str!("prompts/body_double_system.txt");

const CHAT_MAX_TOKENS: u32 = 256;
const FALLBACK_REPLY: &str = "I'm here with you! Let's take this one small step at a time.";

/// ---------------------------------------------------------------------------
/// User Context
/// ---------------------------------------------------------------------------

/// Profile summary woven into chat prompts so replies feel personal
#[derive(Debug, Clone, Default)]
pub struct UserContext {
  pub name: String,
  pub adhd_hurdles: Vec<AdhdHurdle>,
  pub dietary_restrictions: Vec<DietaryRestriction>,
  pub recent_wins: usize,
}

impl UserContext {
  fn prompt_summary(&self) -> String {
    let mut parts = vec![format!("The user's name is {}.", self.name)];

    if !self.adhd_hurdles.is_empty() {
      let hurdles = self
        .adhd_hurdles
        .iter()
        .map(|h| h.prompt_label())
        .collect::<Vec<_>>()
        .join(", ");
      parts.push(format!("Their ADHD hurdles: {}.", hurdles));
    }

    if self.recent_wins > 0 {
      parts.push(format!(
        "They completed {} task(s) in the last week.",
        self.recent_wins
      ));
    }

    parts.join(" ")
  }
}

/// ---------------------------------------------------------------------------
/// Body Double Reply
/// ---------------------------------------------------------------------------

/// Generate a supportive reply to a user message. Never fails: transport or
/// parse problems produce a fixed encouragement instead.
pub async fn body_double_reply(
  client: &GeneratorClient,
  user_message: &str,
  context: Option<&UserContext>,
) -> String {
  match try_reply(client, user_message, context).await {
    Ok(reply) => reply,
    Err(error) => {
      tracing::warn!(%error, "body double reply failed, using canned response");
      FALLBACK_REPLY.to_string()
    }
  }
}

async fn try_reply(
  client: &GeneratorClient,
  user_message: &str,
  context: Option<&UserContext>,
) -> Result<String, GeneratorError> {
  let mut prompt = String::new();
  if let Some(context) = context {
    prompt.push_str(&format!("Context: {}\n\n", context.prompt_summary()));
  }
  prompt.push_str(&format!("User says: \"{}\"\n\nResponse:", user_message));

  let (text, _usage) = client
    .complete(BODY_DOUBLE_SYSTEM_PROMPT, &prompt, CHAT_MAX_TOKENS)
    .await?;

  Ok(text.trim().to_string())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
