//! CLI argument definitions for rowsync.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rowsync",
    version,
    about = "Sync tabular source data into a remote record store",
    long_about = "Sync rows from a CSV export into a PocketBase-style record store.\n\n\
                  Existing records are found by code (or name as a fallback) and\n\
                  relation links are merged, never overwritten; re-running a sync\n\
                  against an already-synced store issues zero writes."
)]
pub struct Cli {
    /// Path to the source CSV file.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Base URL of the record store.
    #[arg(long = "base-url", env = "PB_BASE_URL", value_name = "URL")]
    pub base_url: String,

    /// Target collection name (overrides the layout's collection).
    #[arg(long)]
    pub collection: Option<String>,

    /// Collection layout file (JSON). The built-in item layout is used
    /// when omitted.
    #[arg(long = "layout", value_name = "PATH")]
    pub layout: Option<PathBuf>,

    /// Auth mode against the store.
    #[arg(long, value_enum, env = "PB_AUTH", default_value = "public")]
    pub auth: AuthModeArg,

    /// Admin email for --auth admin.
    #[arg(long, env = "PB_ADMIN_EMAIL")]
    pub email: Option<String>,

    /// Admin password for --auth admin.
    #[arg(long, env = "PB_ADMIN_PASSWORD")]
    pub password: Option<String>,

    /// Relation record id merged into each item's relation field.
    #[arg(long = "relation-id", value_name = "ID")]
    pub relation_id: Option<String>,

    /// Compute and log intended mutations without issuing them.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Address enrichment mode.
    #[arg(long, value_enum, default_value = "off")]
    pub geocode: GeocodeArg,

    /// Geocoding API key (required unless --geocode off).
    #[arg(long = "api-key", env = "GOOGLE_MAPS_API_KEY")]
    pub api_key: Option<String>,

    /// Region hint appended to every address before geocoding.
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// How name-based lookups match against the store.
    #[arg(long = "name-match", value_enum, default_value = "exact")]
    pub name_match: NameMatchArg,

    /// Column whose marker value excludes a row from the sync.
    #[arg(long = "exclude-column", value_name = "LABEL")]
    pub exclude_column: Option<String>,

    /// Marker value flagging an excluded row (with --exclude-column).
    #[arg(long = "exclude-value", value_name = "VALUE", default_value = "yes")]
    pub exclude_value: String,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI auth mode choices.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthModeArg {
    Public,
    Admin,
}

/// CLI geocoding mode choices.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeocodeArg {
    Off,
    Coordinates,
    District,
}

/// CLI name lookup match choices.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NameMatchArg {
    Exact,
    Contains,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
