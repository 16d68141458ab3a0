use std::collections::BTreeSet;

use serde::Deserialize;

/// Statuses the grading worker writes once it stops touching a job.
pub const DEFAULT_TERMINAL_STATUSES: [&str; 2] = ["done", "failed"];

/// How many of the most recent jobs the inline-rubric panel polls per pass.
pub const INLINE_REFRESH_LIMIT: usize = 10;

/// Where a newly accepted job lands in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertionOrder {
    Append,
    #[default]
    Prepend,
}

/// Which rubric fields the grading form carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    /// Free-text JSON rubric sent as `assignmentrubric`.
    #[default]
    #[serde(alias = "inline_rubric")]
    Inline,
    /// Rubric referenced by `rubric_key`, plus an assignment intro.
    #[serde(alias = "rubric_key")]
    Keyed,
}

/// Behaviour knobs for the job panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelPolicy {
    pub insertion_order: InsertionOrder,
    /// Maximum number of jobs polled per refresh pass; `None` polls all.
    pub refresh_limit: Option<usize>,
    /// Show a blocking alert when a submit is rejected or fails.
    pub surface_submit_errors: bool,
    /// Jobs in one of these statuses are no longer polled. Empty polls forever.
    pub terminal_statuses: BTreeSet<String>,
}

impl PanelPolicy {
    /// Newest first, ten most recent polled, submit errors alerted.
    pub fn inline_rubric() -> Self {
        Self {
            insertion_order: InsertionOrder::Prepend,
            refresh_limit: Some(INLINE_REFRESH_LIMIT),
            surface_submit_errors: true,
            terminal_statuses: default_terminal_statuses(),
        }
    }

    /// Oldest first, every job polled, submit errors ignored.
    pub fn rubric_key() -> Self {
        Self {
            insertion_order: InsertionOrder::Append,
            refresh_limit: None,
            surface_submit_errors: false,
            terminal_statuses: default_terminal_statuses(),
        }
    }

    pub fn for_variant(variant: FormVariant) -> Self {
        match variant {
            FormVariant::Inline => Self::inline_rubric(),
            FormVariant::Keyed => Self::rubric_key(),
        }
    }

    pub fn is_terminal(&self, status: &str) -> bool {
        self.terminal_statuses.contains(status)
    }
}

impl Default for PanelPolicy {
    fn default() -> Self {
        Self::inline_rubric()
    }
}

fn default_terminal_statuses() -> BTreeSet<String> {
    DEFAULT_TERMINAL_STATUSES
        .iter()
        .map(|status| (*status).to_string())
        .collect()
}
