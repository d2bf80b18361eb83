//! Prompts for the enhancement call.
//!
//! The system prompt fixes the persona and the JSON-only output contract;
//! the user prompt carries the note body in a `{note_content}` slot. Keeping
//! both here (rather than in the provider crates) means every provider sends
//! the identical instruction set and the response validator can rely on one
//! contract.

/// Fixed system prompt sent with every enhancement request.
pub const SYSTEM_PROMPT: &str = "\
You are an editorial assistant that organizes and enhances rough notes.
Clean up raw notes, add relevant hashtags, and create summaries.

Always respond with a single JSON object and nothing else, containing:
- content: the enhanced note content
- metadata: an object with summary, tags, para_suggestion, and confidence_score";

/// User prompt template. [`build_user_prompt`] fills the `{note_content}`
/// slot; the literal braces in the JSON example are part of the prompt.
pub const USER_PROMPT_TEMPLATE: &str = "\
Please process this note:
1. Clean up formatting and grammar
2. Convert to clear bullet points where appropriate
3. Generate 3-5 relevant hashtags
4. Create a one-line summary
5. Suggest a PARA category (Projects, Areas, Resources, or Archive)

Note content:
{note_content}

Respond with JSON in this format:
{
  \"content\": \"enhanced note content here\",
  \"metadata\": {
    \"summary\": \"one line summary\",
    \"tags\": [\"#tag1\", \"#tag2\"],
    \"para_suggestion\": \"Projects\",
    \"confidence_score\": 0.8
  }
}";

/// Substitute the note body into the user prompt template.
pub fn build_user_prompt(body: &str) -> String {
    USER_PROMPT_TEMPLATE.replace("{note_content}", body)
}
