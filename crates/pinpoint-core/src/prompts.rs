//! Prompt text sent to the model.
//!
//! Every prompt is plain text. Generated descriptions are embedded into the
//! judge prompt exactly as the model returned them, without escaping.

use crate::types::Description;

/// Task instructions for the three independent description calls.
pub const DESCRIPTION_PROMPTS: [&str; 3] = [
    "Describe, in one concise sentence, the bounded individual. ",
    "In one sentence, specify the bounded person’s distinctive clothing/accessories and relative location (e.g., front-left, near X) so a bystander can pick them out instantly. ",
    "Describe the bounded person as briefly as possible, while still identifying only them in the picture. ",
];

/// Brevity and identifiability framing appended to every description task.
pub const SHARED_CONTEXT: &str = "Make the sentence such that you could say 'Hey you, ...' and they'd know it's them. \
Make the description as brief as possible without any descriptors that aren't necessary. ";

const JUDGE_INSTRUCTIONS: &str = r#"You are a harsh evaluator. Given the IMAGE and THREE DESCRIPTIONS, evaluate and rank them
relatively (1=best, 3=worst). Break ties by (a) discriminative power, (b) brevity, then (c) clarity.

Goal: Would an average bystander clearly identify the bounded individual from this *single* sentence?
Is it as brief as possible with no extra words?

Scoring (0–10 for each description):
- 9–10: Unambiguous, concrete, highly specific (distinctive clothing, relative position, salient accessories), no speculation, no extra words.
- 6–8: Mostly clear but with some vagueness or unnecessary language.
- 3–5: Vague or generic; could match multiple people.
- 0–2: Unusable, speculative (age/identity), or contradicts the image.

Return ONLY valid compact JSON with this exact structure:
{
  "items": [
    {"idx": 1, "rating": <int 0-10>, "rank": <1|2|3>, "justification": "<short reason>", "issues": ["<bullet>", ...]},
    {"idx": 2, "rating": <int 0-10>, "rank": <1|2|3>, "justification": "<short reason>", "issues": ["<bullet>", ...]},
    {"idx": 3, "rating": <int 0-10>, "rank": <1|2|3>, "justification": "<short reason>", "issues": ["<bullet>", ...]}
  ],
  "overall_notes": "<one- or two-sentence comparison across all three>"
}"#;

const SINGLE_CALL_SYSTEM: &str = "You describe and evaluate people in images. \
Use ONLY the provided image. Ignore any other context, prior conversation, or assumptions about identity. \
Respond with a single JSON object that follows the requested structure exactly, with no extra keys and no prose outside the JSON.";

const SINGLE_CALL_TASK: &str = r#"The image contains one bounded (highlighted) individual.

Step 1. Write THREE different one-sentence descriptions of the bounded individual:
  1. A concise sentence describing the bounded individual.
  2. A sentence naming their distinctive clothing/accessories and relative location (e.g., front-left, near X) so a bystander can pick them out instantly.
  3. The briefest sentence that still identifies only them in the picture.
Each sentence should work after "Hey you, ..." and contain no unnecessary descriptors.

Step 2. Act as a harsh evaluator of your own three descriptions. Would an average bystander clearly identify the bounded individual from each *single* sentence? Is it as brief as possible?
Rate each 0–10 (9–10 unambiguous and specific; 6–8 mostly clear; 3–5 vague or generic; 0–2 unusable, speculative, or contradicting the image).
Rank them relatively (1=best, 3=worst), breaking ties by (a) discriminative power, (b) brevity, then (c) clarity.

Return JSON with this exact structure:
{
  "descriptions": [
    {"idx": 1, "text": "<sentence>"},
    {"idx": 2, "text": "<sentence>"},
    {"idx": 3, "text": "<sentence>"}
  ],
  "items": [
    {"idx": 1, "rating": <int 0-10>, "rank": <1|2|3>, "justification": "<short reason>", "issues": ["<bullet>", ...]},
    {"idx": 2, "rating": <int 0-10>, "rank": <1|2|3>, "justification": "<short reason>", "issues": ["<bullet>", ...]},
    {"idx": 3, "rating": <int 0-10>, "rank": <1|2|3>, "justification": "<short reason>", "issues": ["<bullet>", ...]}
  ],
  "overall_notes": "<one- or two-sentence comparison across all three>"
}"#;

/// Full prompt for one description call: task instruction plus shared context.
pub fn description_prompt(task: &str) -> String {
    format!("{task}{SHARED_CONTEXT}")
}

/// Comparative judge prompt with each description listed as `[i] text`.
pub fn judge_prompt(descriptions: &[Description]) -> String {
    let mut prompt = String::from(JUDGE_INSTRUCTIONS);
    prompt.push_str("\n\nDESCRIPTIONS:");
    for d in descriptions {
        prompt.push_str(&format!("\n[{}] {}", d.index, d.text));
    }
    prompt.trim().to_string()
}

/// System-level framing for the single-call workflow.
pub fn single_call_system_instruction() -> &'static str {
    SINGLE_CALL_SYSTEM
}

/// User prompt asking for three descriptions and their judgment in one response.
pub fn single_call_prompt() -> &'static str {
    SINGLE_CALL_TASK
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptions() -> Vec<Description> {
        vec![
            Description::new(1, "The woman in the red scarf."),
            Description::new(2, r#"Front-left, holding a "Happy {30}" balloon."#),
            Description::new(3, "Red scarf, front-left."),
        ]
    }

    #[test]
    fn test_description_prompt_appends_context() {
        let prompt = description_prompt(DESCRIPTION_PROMPTS[0]);
        assert!(prompt.starts_with("Describe, in one concise sentence"));
        assert!(prompt.ends_with(SHARED_CONTEXT));
        assert!(prompt.contains("'Hey you, ...'"));
    }

    #[test]
    fn test_description_prompts_are_distinct() {
        let prompts: Vec<String> = DESCRIPTION_PROMPTS
            .iter()
            .map(|t| description_prompt(t))
            .collect();
        assert_ne!(prompts[0], prompts[1]);
        assert_ne!(prompts[1], prompts[2]);
        assert_ne!(prompts[0], prompts[2]);
    }

    #[test]
    fn test_judge_prompt_embeds_descriptions_verbatim() {
        let prompt = judge_prompt(&descriptions());
        assert!(prompt.contains("[1] The woman in the red scarf."));
        assert!(prompt.contains(r#"[2] Front-left, holding a "Happy {30}" balloon."#));
        assert!(prompt.contains("[3] Red scarf, front-left."));
        assert!(prompt.ends_with("[3] Red scarf, front-left."));
    }

    #[test]
    fn test_judge_prompt_structure() {
        let prompt = judge_prompt(&descriptions());
        assert!(prompt.starts_with("You are a harsh evaluator."));
        assert!(prompt.contains("\"overall_notes\""));
        assert!(prompt.contains("(a) discriminative power, (b) brevity, then (c) clarity"));
        let schema_end = prompt.find("\"overall_notes\"").unwrap();
        let list_start = prompt.find("DESCRIPTIONS:\n[1]").unwrap();
        assert!(schema_end < list_start);
    }

    #[test]
    fn test_judge_prompt_empty_description_kept() {
        let prompt = judge_prompt(&[
            Description::new(1, ""),
            Description::new(2, "b"),
            Description::new(3, "c"),
        ]);
        assert!(prompt.contains("DESCRIPTIONS:\n[1] \n[2] b\n[3] c"));
    }

    #[test]
    fn test_single_call_prompts() {
        assert!(single_call_system_instruction().contains("ONLY the provided image"));
        let prompt = single_call_prompt();
        assert!(prompt.contains("\"descriptions\""));
        assert!(prompt.contains("\"items\""));
        assert!(prompt.contains("\"overall_notes\""));
    }
}
