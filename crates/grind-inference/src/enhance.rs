//! AI enhancement of problem content.
//!
//! Builds the enhancement prompt for a problem title, drives a generation
//! backend, and extracts the structured `{description, solution}` object
//! from the model reply.

use tracing::{debug, instrument};

use grind_core::{EnhancedProblem, Error, GenerationBackend, Result};

/// System context sent with every enhancement request.
pub const ENHANCE_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant that provides LeetCode solutions in JSON format.";

/// Build the enhancement prompt for a problem title.
///
/// The prompt pins down the output contract: a raw JSON object with a
/// Markdown `description` and a commented JavaScript `solution`.
pub fn build_enhance_prompt(title: &str) -> String {
    format!(
        r#"Provide a detailed solution for the LeetCode problem: "{title}".

Format the response as a JSON object with two fields:
- "description": The problem description in professional Markdown format.
  - Use headers (##) for sections like "Example 1", "Constraints".
  - Use **bold** for key terms and "Example" labels.
  - Use code blocks ( ``` ) for example inputs, outputs, and explanations.
  - Ensure the description is clear, concise, and well-formatted.
- "solution": One clean, optimized JavaScript solution with comments explaining the important lines.

Ensure the "solution" field ONLY contains the JavaScript code, and the "description" field ONLY contains the Markdown description. Do not include triple backticks for JSON formatting in the response, just the raw JSON object."#
    )
}

/// Pull the outermost JSON object out of a model reply.
///
/// Models occasionally wrap the object in prose or code fences despite
/// instructions; everything from the first `{` to the last `}` is taken.
pub fn extract_json_object(text: &str) -> Result<&str> {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start <= end => Ok(&text[start..=end]),
        _ => Err(Error::Inference(
            "Failed to parse AI response as JSON".to_string(),
        )),
    }
}

/// Parse a model reply into an [`EnhancedProblem`].
pub fn parse_enhanced(text: &str) -> Result<EnhancedProblem> {
    let raw = extract_json_object(text)?;
    serde_json::from_str(raw)
        .map_err(|e| Error::Inference(format!("Failed to parse AI response as JSON: {}", e)))
}

/// Generate enhanced content for a problem title.
#[instrument(skip(backend, title), fields(subsystem = "inference", op = "enhance", title = %title, model = %backend.model_name()))]
pub async fn enhance_problem(
    backend: &dyn GenerationBackend,
    title: &str,
) -> Result<EnhancedProblem> {
    let prompt = build_enhance_prompt(title);
    let text = backend
        .generate_json_with_system(ENHANCE_SYSTEM_PROMPT, &prompt)
        .await?;
    let enhanced = parse_enhanced(&text)?;

    debug!(
        description_len = enhanced.description.len(),
        solution_len = enhanced.solution.len(),
        "Enhancement complete"
    );
    Ok(enhanced)
}
