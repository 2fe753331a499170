//! Strict validation of judgment JSON.
//!
//! Only used when the caller asks for it (`--strict`). By default judgment
//! text is written out exactly as the model returned it and never parsed.

use crate::error::JudgmentError;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Number of descriptions every judgment covers.
pub const DESCRIPTION_COUNT: usize = 3;

/// Highest allowed rating.
pub const MAX_RATING: u8 = 10;

/// Rating and rank the judge assigned to one description.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JudgedItem {
    pub idx: u8,
    pub rating: u8,
    pub rank: u8,
    pub justification: String,
    #[serde(default)]
    pub issues: Vec<String>,
}

/// The judge's comparative verdict on the three descriptions.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Judgment {
    pub items: Vec<JudgedItem>,
    pub overall_notes: String,
}

/// A description the model wrote itself (single-call output).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GeneratedDescription {
    pub idx: u8,
    pub text: String,
}

/// Single-call output: descriptions plus their judgment.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SingleCallOutput {
    pub descriptions: Vec<GeneratedDescription>,
    #[serde(flatten)]
    pub judgment: Judgment,
}

/// Drop a surrounding Markdown code fence, if the model added one.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn schema(message: impl Into<String>) -> JudgmentError {
    JudgmentError::Schema(message.into())
}

/// Check that `indices` is exactly {1, 2, 3}.
fn check_indices(field: &str, indices: impl Iterator<Item = u8>) -> Result<(), JudgmentError> {
    let seen: Vec<u8> = indices.collect();
    let unique: BTreeSet<u8> = seen.iter().copied().collect();
    let expected: BTreeSet<u8> = (1..=DESCRIPTION_COUNT as u8).collect();
    if seen.len() != DESCRIPTION_COUNT || unique != expected {
        return Err(schema(format!(
            "{field} must be 1, 2 and 3 exactly once each, got {seen:?}"
        )));
    }
    Ok(())
}

impl Judgment {
    /// Check the schema rules the judge prompt asks for.
    pub fn validate(&self) -> Result<(), JudgmentError> {
        if self.items.len() != DESCRIPTION_COUNT {
            return Err(schema(format!(
                "expected {DESCRIPTION_COUNT} items, got {}",
                self.items.len()
            )));
        }
        check_indices("items[].idx", self.items.iter().map(|i| i.idx))?;
        if let Some(item) = self.items.iter().find(|i| i.rating > MAX_RATING) {
            return Err(schema(format!(
                "item {} rating {} is outside 0-{MAX_RATING}",
                item.idx, item.rating
            )));
        }
        check_indices("items[].rank", self.items.iter().map(|i| i.rank))?;
        Ok(())
    }

    /// Item ranked first, if any.
    pub fn best(&self) -> Option<&JudgedItem> {
        self.items.iter().find(|i| i.rank == 1)
    }
}

/// Parse and validate a multi-call judge response.
pub fn parse_judgment(text: &str) -> Result<Judgment, JudgmentError> {
    let judgment: Judgment = serde_json::from_str(strip_code_fence(text))?;
    judgment.validate()?;
    Ok(judgment)
}

/// Parse and validate a single-call response.
pub fn parse_single_call_output(text: &str) -> Result<SingleCallOutput, JudgmentError> {
    let output: SingleCallOutput = serde_json::from_str(strip_code_fence(text))?;
    if output.descriptions.len() != DESCRIPTION_COUNT {
        return Err(schema(format!(
            "expected {DESCRIPTION_COUNT} descriptions, got {}",
            output.descriptions.len()
        )));
    }
    check_indices(
        "descriptions[].idx",
        output.descriptions.iter().map(|d| d.idx),
    )?;
    output.judgment.validate()?;
    Ok(output)
}
