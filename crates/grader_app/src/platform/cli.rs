use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use grader_core::{FormVariant, GradeForm, RubricField};

/// Top-level CLI for the grading job panel.
#[derive(Debug, Parser)]
#[command(name = "grader")]
#[command(about = "Submit grading jobs and watch their status", long_about = None)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/grader/config.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base url of the grading service.
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Milliseconds between refresh passes.
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    /// Which rubric fields the form carries.
    #[arg(long, global = true, value_enum)]
    pub variant: Option<VariantArg>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Inline,
    Keyed,
}

impl From<VariantArg> for FormVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Inline => FormVariant::Inline,
            VariantArg::Keyed => FormVariant::Keyed,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Submit one grading job, then watch until nothing is left to poll.
    Submit(FormArgs),

    /// Read one JSON form per line from stdin and watch every job until Ctrl-C.
    Session,
}

/// Grading form fields. Nothing is validated; omitted fields are sent empty.
#[derive(Debug, Clone, Default, Args)]
pub struct FormArgs {
    #[arg(long, default_value = "")]
    pub userid: String,

    #[arg(long, default_value = "")]
    pub assignmentid: String,

    #[arg(long, default_value = "")]
    pub github_link: String,

    #[arg(long, default_value = "")]
    pub assignmentname: String,

    #[arg(long, default_value = "")]
    pub assignmentactivity: String,

    /// Inline JSON rubric (inline variant).
    #[arg(long, default_value = "")]
    pub rubric: String,

    /// Assignment introduction (keyed variant).
    #[arg(long, default_value = "")]
    pub assignmentintro: String,

    /// Rubric key (keyed variant).
    #[arg(long, default_value = "")]
    pub rubric_key: String,
}

impl FormArgs {
    pub fn into_form(self, variant: FormVariant) -> GradeForm {
        let rubric = match variant {
            FormVariant::Inline => RubricField::Inline(self.rubric),
            FormVariant::Keyed => RubricField::Keyed {
                assignmentintro: self.assignmentintro,
                rubric_key: self.rubric_key,
            },
        };
        GradeForm {
            userid: self.userid,
            assignmentid: self.assignmentid,
            github_link: self.github_link,
            assignmentname: self.assignmentname,
            assignmentactivity: self.assignmentactivity,
            rubric,
        }
    }
}
