//! Command-line surface.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use forkdiff_core::logging::Profile;
use forkdiff_core::snapshot::{DiffSettings, ListingMode};

#[derive(Debug, Parser)]
#[command(
    name = "forkdiff",
    version,
    about = "Render how a fork diverges from its base branch, grouped into documented sections",
    long_about = "Diffs the target revision against the base revision, assigns every changed \
    file to the sections of the page definition whose globs match it, and writes a report \
    listing each section's diffs followed by the changed files no section documents."
)]
pub struct Cli {
    #[arg(long, default_value = ".", help = "Path to the local git repository")]
    pub repo: PathBuf,

    #[arg(long, default_value = "HEAD", help = "Revision of the fork to describe")]
    pub target: String,

    #[arg(long, default_value = "master", help = "Revision the fork is compared against")]
    pub base: String,

    #[arg(long, default_value = "fork.yaml", help = "Page definition (YAML or TOML)")]
    pub fork: PathBuf,

    #[arg(long, default_value = "index.html", help = "Output file, or - for stdout")]
    pub out: PathBuf,

    #[arg(
        long,
        value_enum,
        help = "Output format [default: from the --out extension, html unless .md]"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, default_value_t = 3, help = "Context lines around each change")]
    pub context: u32,

    #[arg(long, help = "Report renames as a deletion plus an addition")]
    pub no_renames: bool,

    #[arg(
        long,
        help = "Match globs against full file paths instead of top-level entry names"
    )]
    pub recursive_globs: bool,

    #[arg(long, help = "Exit with status 3 when any changed file is unclaimed")]
    pub fail_on_unclaimed: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Human, help = "Log line format")]
    pub log_format: LogFormat,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Html,
}

impl OutputFormat {
    /// `.md` and `.markdown` select Markdown; everything else is HTML.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown") => {
                OutputFormat::Markdown
            }
            _ => OutputFormat::Html,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Human,
    Json,
}

impl From<LogFormat> for Profile {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Human => Profile::Human,
            LogFormat::Json => Profile::Json,
        }
    }
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| OutputFormat::for_path(&self.out))
    }

    pub fn diff_settings(&self) -> DiffSettings {
        DiffSettings { context_lines: self.context, find_renames: !self.no_renames }
    }

    pub fn listing_mode(&self) -> ListingMode {
        if self.recursive_globs {
            ListingMode::Recursive
        } else {
            ListingMode::TopLevel
        }
    }

    /// `-` writes the report to stdout.
    pub fn writes_to_stdout(&self) -> bool {
        self.out.as_os_str() == "-"
    }
}
