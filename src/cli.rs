//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// Export your Kindle library and notebook annotations as JSON.
///
/// Requests are authenticated with an existing signed-in session: either a
/// Netscape cookie file plus the device session token, or a JSON session file.
#[derive(Parser, Debug)]
#[command(name = "kindle-notebook")]
#[command(author, version, about)]
#[command(group(ArgGroup::new("credentials").args(["cookies", "session"]).multiple(false)))]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON client config file (default: $XDG_CONFIG_HOME/kindle-notebook/config.json)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Netscape-format cookie file exported from a signed-in browser
    #[arg(long, value_name = "FILE", requires = "device_token")]
    pub cookies: Option<PathBuf>,

    /// Device session token sent with --cookies
    #[arg(long, value_name = "TOKEN", requires = "cookies")]
    pub device_token: Option<String>,

    /// JSON session file with `cookies` and `deviceSessionToken`
    #[arg(long, value_name = "FILE")]
    pub session: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations exposed by the binary. Each prints pretty JSON to stdout.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List owned books from the library search
    Library {
        /// Also fetch details and metadata for every book (two requests per book)
        #[arg(long)]
        with_details: bool,
    },

    /// Show reading details and publication metadata for a book
    Details {
        /// Book identifier
        asin: String,
    },

    /// List a book's annotations from the service API
    Annotations {
        /// Book identifier
        asin: String,

        /// Reference id from the book metadata (`refEmId`)
        #[arg(long)]
        ref_em_id: String,

        /// Format version from the book details (`YJFormatVersion`)
        #[arg(long)]
        yj_format_version: String,
    },

    /// List every annotated book from the notebook pages
    NotebookLibrary,

    /// List a book's highlights and notes from its notebook page
    NotebookAnnotations {
        /// Book identifier
        asin: String,
    },
}
