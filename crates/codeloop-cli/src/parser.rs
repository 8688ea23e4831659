//! Parsing of model responses against the delimiter protocol
//!
//! The system prompt instructs the model to fence executable code in
//! `<execute>` tags and to mark a final answer with `<final_answer>` tags.
//! Parsing is a pure function over that grammar so it can be tested without
//! a model on the other end.

/// Opens an executable code region.
pub const EXECUTE_OPEN: &str = "<execute>";
/// Closes an executable code region.
pub const EXECUTE_CLOSE: &str = "</execute>";
/// Opens the final-answer region.
pub const ANSWER_OPEN: &str = "<final_answer>";
/// Closes the final-answer region.
pub const ANSWER_CLOSE: &str = "</final_answer>";

/// Structured view over one assistant response.
///
/// Recomputed every cycle; never stored beyond the cycle that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Prose outside any recognized region.
    pub reasoning: String,
    /// The cycle's executable fragment, if any.
    pub code: Option<String>,
    /// The final answer, if the model signalled one.
    pub final_answer: Option<String>,
}

impl ParsedResponse {
    /// Whether the model considers the problem solved.
    pub fn is_final(&self) -> bool {
        self.final_answer.is_some()
    }
}

/// Parse one raw model response.
///
/// Termination takes precedence over execution: if a final-answer sentinel is
/// present, any code in the same response is ignored. Otherwise only the
/// first well-formed execute region becomes the cycle's fragment; one
/// fragment per cycle keeps the think/execute/observe cadence 1:1.
/// Malformed or unterminated execute fences fail soft, yielding no fragment
/// and the raw text as reasoning.
pub fn parse(raw: &str) -> ParsedResponse {
    if let Some(start) = raw.find(ANSWER_OPEN) {
        let body = &raw[start + ANSWER_OPEN.len()..];
        // An unterminated sentinel still terminates; take the rest of the text.
        let answer = match body.find(ANSWER_CLOSE) {
            Some(end) => &body[..end],
            None => body,
        };

        return ParsedResponse {
            reasoning: raw[..start].trim().to_string(),
            code: None,
            final_answer: Some(answer.trim().to_string()),
        };
    }

    if let Some(start) = raw.find(EXECUTE_OPEN) {
        let body_start = start + EXECUTE_OPEN.len();
        if let Some(end) = raw[body_start..].find(EXECUTE_CLOSE) {
            let code = raw[body_start..body_start + end].trim();
            let after = &raw[body_start + end + EXECUTE_CLOSE.len()..];

            let mut reasoning = raw[..start].trim().to_string();
            if !after.trim().is_empty() {
                if !reasoning.is_empty() {
                    reasoning.push('\n');
                }
                reasoning.push_str(after.trim());
            }

            if !code.is_empty() {
                return ParsedResponse {
                    reasoning,
                    code: Some(code.to_string()),
                    final_answer: None,
                };
            }
        }
    }

    ParsedResponse {
        reasoning: raw.trim().to_string(),
        code: None,
        final_answer: None,
    }
}
