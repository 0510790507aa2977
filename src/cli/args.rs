//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the subcommand enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use encyc_engine::catalog::CatalogFormat;
use encyc_utils::types::{Edition, EditionSelection, EntryType};

/// encyc - faculty assignment and generation pipeline for The Encyclopædia
#[derive(Parser, Debug)]
#[command(name = "encyc")]
#[command(about = "Assign, generate, review and publish Encyclopædia entries")]
#[command(long_about = r#"
encyc turns the faculty registry into AsciiDoc entry files and fills them with
canonical text written in the voice of each entry's assigned faculty member.

EXAMPLES:
  # Create or update every entry stub from the registry
  encyc assign

  # Preview the changes for volume 2 only
  encyc assign --volume 2 --dry-run

  # Print the site's entry table for volume 1 as TypeScript literals
  encyc catalog --volume 1 --format ts

  # Draft one entry without review
  encyc generate --entry attention --faculty a.james --volume 1

  # Generate with peer review and marginalia, plus a second perspective
  encyc review --entry attention --faculty a.james --volume 1 --type major \
      --multi-perspective --additional-authors a.simon

  # Review every pending entry of volume 3, both editions, without pushing
  encyc batch --volume 3 --no-push

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .encyclopaedia/config.toml
  Credentials come from the environment only:
    SUPABASE_URL / NEXT_PUBLIC_SUPABASE_URL                    ask-faculty endpoint
    SUPABASE_SERVICE_ROLE_KEY / NEXT_PUBLIC_SUPABASE_ANON_KEY  ask-faculty key
    OPENROUTER_API_KEY                                         fidelity evaluator (optional)
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding `editions/` (default: the project root)
    #[arg(long, global = true)]
    pub content_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update entry files from the registry's topic assignments
    Assign {
        /// Only this volume number
        #[arg(long)]
        volume: Option<u32>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the site's entry table rows
    Catalog {
        /// Only this volume number
        #[arg(long)]
        volume: Option<u32>,

        /// Output format: json or ts
        #[arg(long, default_value = "json")]
        format: CatalogFormat,
    },

    /// Draft one entry without review
    Generate {
        /// Entry slug, e.g. `attention` or `attention-simon`
        #[arg(long)]
        entry: String,

        /// Faculty id of the author, e.g. `a.james`
        #[arg(long)]
        faculty: String,

        /// adult or children
        #[arg(long, default_value = "adult")]
        edition: Edition,

        /// Volume number
        #[arg(long, default_value_t = 1)]
        volume: u32,

        /// Entry type (major, standard, boundary, closing); default from the entry file
        #[arg(long = "type")]
        entry_type: Option<EntryType>,
    },

    /// Draft every assigned entry of a volume without review
    GenerateVolume {
        /// Volume number
        #[arg(long)]
        volume: u32,

        /// adult, children or both
        #[arg(long, default_value = "both")]
        edition: EditionSelection,

        /// Only this entry slug
        #[arg(long)]
        entry: Option<String>,
    },

    /// Generate one entry with peer review, revision and marginalia
    Review {
        /// Entry slug, e.g. `attention`
        #[arg(long)]
        entry: String,

        /// Faculty id of the author, e.g. `a.james`
        #[arg(long)]
        faculty: String,

        /// adult or children
        #[arg(long, default_value = "adult")]
        edition: Edition,

        /// Volume number
        #[arg(long, default_value_t = 1)]
        volume: u32,

        /// Entry type (major, standard, boundary, closing); default from the entry file
        #[arg(long = "type")]
        entry_type: Option<EntryType>,

        /// Comma-separated reviewer ids, e.g. `a.simon,a.weil`
        #[arg(long, value_delimiter = ',')]
        reviewers: Vec<String>,

        /// Also generate the topic's other perspectives
        #[arg(long)]
        multi_perspective: bool,

        /// Comma-separated authors for the extra perspectives (default: the registry's)
        #[arg(long, value_delimiter = ',', requires = "multi_perspective")]
        additional_authors: Vec<String>,
    },

    /// Review every pending entry across volumes and editions, publishing as it goes
    Batch {
        /// Only this volume number
        #[arg(long)]
        volume: Option<u32>,

        /// adult, children or both
        #[arg(long, default_value = "both")]
        edition: EditionSelection,

        /// Do not commit or push
        #[arg(long)]
        no_push: bool,
    },
}

impl Commands {
    /// Subcommand name, for error reporting.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "assign",
            Self::Catalog { .. } => "catalog",
            Self::Generate { .. } => "generate",
            Self::GenerateVolume { .. } => "generate-volume",
            Self::Review { .. } => "review",
            Self::Batch { .. } => "batch",
        }
    }
}
