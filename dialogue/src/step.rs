//! Step: a re-invocable generator of [`Prompt`]s.

use std::fmt;
use std::sync::Arc;

use formbot_core::{InboundEvent, Result, User};

use crate::context::DialogueContext;
use crate::prompt::Prompt;

type Generator = dyn Fn(&InboundEvent, &User, &DialogueContext) -> Result<Prompt> + Send + Sync;

/// One question of a step-driven dialogue. Holds no state; may be evaluated any number of times.
#[derive(Clone)]
pub struct Step {
    generator: Arc<Generator>,
}

impl Step {
    pub fn new<F>(generator: F) -> Self
    where
        F: Fn(&InboundEvent, &User, &DialogueContext) -> Result<Prompt> + Send + Sync + 'static,
    {
        Self {
            generator: Arc::new(generator),
        }
    }

    /// Step that always shows the same prompt.
    pub fn fixed(prompt: Prompt) -> Self {
        Self::new(move |_, _, _| Ok(prompt.clone()))
    }

    pub fn render(
        &self,
        event: &InboundEvent,
        user: &User,
        context: &DialogueContext,
    ) -> Result<Prompt> {
        (self.generator)(event, user, context)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").finish_non_exhaustive()
    }
}
