//! Magic ball request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A question for the magic ball.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AskQuestionRequest {
    /// Question text, stored verbatim.
    #[validate(length(min = 1, max = 255))]
    pub text: String,
}
