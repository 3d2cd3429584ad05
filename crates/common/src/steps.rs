//! The page-step vocabulary the form flow is written in
//!
//! A scenario is a linear `Vec<PageStep>` program. Executors interpret
//! it against a page: the real-browser driver compiles the whole program
//! into one script (the form is stateful across steps), the fixture page
//! model interprets it step by step. Either way execution stops at the
//! first failing step and the failure is recorded in its [`StepResult`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;

/// A single page interaction or assertion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PageStep {
    /// Click an element
    Click { selector: String },

    /// Fill an input field
    Fill {
        selector: String,
        value: String,
        #[serde(default)]
        clear_first: bool,
    },

    /// Assert something about an element
    Assert {
        selector: String,
        expect: Expectation,
    },
}

/// What an assert step expects of its element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expectation {
    /// Element is present (`true`) or absent (`false`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,

    /// Element (or one of the matches) contains this text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_contains: Option<String>,

    /// Exactly this many elements match the selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Element's class attribute contains this class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_contains: Option<String>,

    /// Element's class attribute does not contain this class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_absent: Option<String>,
}

impl PageStep {
    pub fn click(selector: impl Into<String>) -> Self {
        Self::Click {
            selector: selector.into(),
        }
    }

    pub fn fill(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Fill {
            selector: selector.into(),
            value: value.into(),
            clear_first: false,
        }
    }

    /// Fill after clearing whatever the field already holds.
    pub fn fill_clearing(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Fill {
            selector: selector.into(),
            value: value.into(),
            clear_first: true,
        }
    }

    pub fn assert_exists(selector: impl Into<String>, exists: bool) -> Self {
        Self::Assert {
            selector: selector.into(),
            expect: Expectation {
                exists: Some(exists),
                ..Default::default()
            },
        }
    }

    pub fn assert_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Assert {
            selector: selector.into(),
            expect: Expectation {
                text_contains: Some(text.into()),
                ..Default::default()
            },
        }
    }

    pub fn assert_count(selector: impl Into<String>, count: usize) -> Self {
        Self::Assert {
            selector: selector.into(),
            expect: Expectation {
                count: Some(count),
                ..Default::default()
            },
        }
    }

    pub fn assert_class(selector: impl Into<String>, class: impl Into<String>) -> Self {
        Self::Assert {
            selector: selector.into(),
            expect: Expectation {
                class_contains: Some(class.into()),
                ..Default::default()
            },
        }
    }

    pub fn assert_class_absent(selector: impl Into<String>, class: impl Into<String>) -> Self {
        Self::Assert {
            selector: selector.into(),
            expect: Expectation {
                class_absent: Some(class.into()),
                ..Default::default()
            },
        }
    }

    /// Short display name, used in step results and logs.
    pub fn name(&self) -> String {
        match self {
            PageStep::Click { selector } => format!("click:{selector}"),
            PageStep::Fill { selector, .. } => format!("fill:{selector}"),
            PageStep::Assert { selector, .. } => format!("assert:{selector}"),
        }
    }
}

/// Result of executing a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

impl StepResult {
    pub fn ok(step_name: impl Into<String>, duration: Duration) -> Self {
        Self {
            success: true,
            step_name: step_name.into(),
            duration_ms: duration.as_millis() as u64,
            error: None,
        }
    }

    pub fn failed(
        step_name: impl Into<String>,
        duration: Duration,
        error: impl std::fmt::Display,
    ) -> Self {
        Self {
            success: false,
            step_name: step_name.into(),
            duration_ms: duration.as_millis() as u64,
            error: Some(error.to_string()),
        }
    }
}

/// A page a step program can run against.
///
/// Implementations load the page fresh for every call, so scenarios stay
/// isolated from one another. Execution stops at the first failing step;
/// the failure is reported in the returned results, not as an `Err`
/// (errors are reserved for the executor itself breaking).
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn run(&self, steps: &[PageStep]) -> Result<Vec<StepResult>>;

    /// Executor name for logs
    fn name(&self) -> &'static str;
}
