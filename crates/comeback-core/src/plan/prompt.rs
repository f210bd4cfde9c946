//! Prompt construction for plan generation.
//!
//! Pure string assembly; no I/O. The user prompt spells out the exact JSON
//! shape the validator expects so that the model's output and
//! [`super::validate`] agree on field names.

use super::types::PlanRequest;

/// System-level instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "Comeback coach. JSON only, no trailing commas, be concise.";

/// Sampling temperature for plan generation.
pub const TEMPERATURE: f32 = 0.7;

/// Build the user prompt embedding the confession, goals and day count.
pub fn build_user_prompt(request: &PlanRequest) -> String {
    let days = request.days;
    let mut prompt = String::with_capacity(768 + request.confession.len() + request.goals.len());

    prompt.push_str(&format!(
        "As a comeback coach, create a JSON response for someone who: \"{}\" \
         and wants: \"{}\" in {days} days.\n\n",
        request.confession, request.goals
    ));

    prompt.push_str("JSON format:\n");
    prompt.push_str("{\n");
    prompt.push_str("  \"roast\": \"Brief tough-love comment (1-2 sentences)\",\n");
    prompt.push_str("  \"realityCheck\": \"Reality check about their timeline (1-2 sentences)\",\n");
    prompt.push_str(&format!(
        "  \"dailyPlan\": [exactly {days} objects: {{\"day\": number, \"task\": \"specific action\", \
         \"resource\": \"url/tool\", \"motivation\": \"short quote\"}}],\n"
    ));
    prompt.push_str("  \"finalQuote\": \"Motivational quote\"\n");
    prompt.push_str("}\n\n");

    prompt.push_str(&format!(
        "Number the days 1 to {days} in order. Keep responses concise. \
         Valid JSON only, no trailing commas, no text outside the JSON object."
    ));

    prompt
}
