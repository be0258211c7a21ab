//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Rewrite site links to the visitor's locale and region
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: regionlink.toml)
    #[arg(short = 'C', long, global = true, default_value = "regionlink.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the site URL from the config
    #[arg(short = 'U', long = "site-url", global = true, value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// Override the sitemap source (file path or http(s) URL)
    #[arg(long, global = true)]
    pub sitemap: Option<String>,

    /// Override the content directory (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Detect the visitor's locale, then rewrite links in HTML files
    #[command(visible_alias = "l")]
    Localize {
        /// Files or directories to localize. If omitted, localizes all content.
        #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        visit: VisitArgs,

        /// Report what would change without writing files
        #[arg(short, long)]
        dry: bool,
    },

    /// Run locale detection and print the resolved preference
    #[command(visible_alias = "d")]
    Detect {
        #[command(flatten)]
        visit: VisitArgs,
    },

    /// Load the site index and print a summary
    #[command(visible_alias = "i")]
    Index {
        /// Ignore a fresh cached index and fetch the sitemap again
        #[arg(short, long)]
        refresh: bool,
    },

    /// Print the regionalized form of a single href
    Href {
        /// The href as written in the document
        href: String,

        #[command(flatten)]
        visit: VisitArgs,
    },

    /// Localize once, then re-localize documents as they change
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        visit: VisitArgs,
    },
}

/// The visit whose preference drives rewriting.
#[derive(clap::Args, Debug, Clone)]
pub struct VisitArgs {
    /// Page URL being viewed; path and query carry locale signals
    #[arg(short, long, default_value = "/")]
    pub page: String,

    /// Browser-reported language (e.g., fr-CA)
    #[arg(short, long)]
    pub lang: Option<String>,
}
