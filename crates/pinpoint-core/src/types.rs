//! Records produced by the two workflows.

use std::path::PathBuf;

/// One generated description, numbered from 1 in generation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub index: usize,
    pub text: String,
}

impl Description {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Result of the multi-call workflow: three descriptions and the raw judgment.
#[derive(Debug, Clone)]
pub struct MultiCallReport {
    /// Image path as given on the command line
    pub image_path: PathBuf,

    pub descriptions: Vec<Description>,

    /// Judge response, unparsed
    pub judgment: String,
}

/// Result of the single-call workflow: the model's raw output.
#[derive(Debug, Clone)]
pub struct SingleCallReport {
    /// Image path as given on the command line
    pub image_path: PathBuf,

    /// Model response, unparsed
    pub output: String,
}
