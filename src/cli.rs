use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hlsclip")]
#[command(author, version, about = "Clip time ranges out of segmented HLS assets")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the playlist and job server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the combined media playlist for some ranges
    Media {
        /// Ranges as KEY#t=START,END
        #[arg(required = true)]
        ranges: Vec<String>,
    },

    /// Print the master playlist for some ranges
    Master {
        /// Ranges as KEY#t=START,END
        #[arg(required = true)]
        ranges: Vec<String>,
    },

    /// Derive the transcode jobs for some ranges
    Jobs {
        /// Ranges as KEY#t=START,END
        #[arg(required = true)]
        ranges: Vec<String>,

        /// Run the jobs on the worker instead of printing them
        #[arg(long)]
        dispatch: bool,
    },

    /// Print combined thumbnail URLs for some ranges
    Thumbs {
        /// Ranges as KEY#t=START,END
        #[arg(required = true)]
        ranges: Vec<String>,

        /// Print thumbnail jobs instead of URLs
        #[arg(long)]
        jobs: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
