use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use chiforest::render::ImageFormat;
use chiforest::writer::ForestLayout;

mod demo;
mod info;
mod run;

/// chiforest - chi_c / chi_b candidate selection over muon and conversion forests
#[derive(Parser)]
#[command(name = "chiforest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Image format of the plots.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    /// Rasterized PNG
    Png,
    /// Plain SVG
    Svg,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Svg => ImageFormat::Svg,
        }
    }
}

/// Forest layout written by `demo`.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LayoutArg {
    /// Single ZIP container
    #[default]
    Container,
    /// Directory bundle
    Directory,
}

impl From<LayoutArg> for ForestLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Container => ForestLayout::Container,
            LayoutArg::Directory => ForestLayout::Directory,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the chi selection described by a TOML config file
    Run {
        /// Analysis config file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Render mode: separate, together, a category tag, or "" to skip
        #[arg(long, value_name = "MODE")]
        render: Option<String>,

        /// Output directory for the plots (overrides the config)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Image format (overrides the config)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Write the run counters as JSON
        #[arg(long, value_name = "FILE")]
        summary: Option<PathBuf>,
    },

    /// Display the directories, tables and columns of a forest
    Info {
        /// Forest path (ZIP container or directory)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate a synthetic forest for testing
    Demo {
        /// Output forest path
        #[arg(value_name = "OUTPUT", default_value = "demo_forest.zip")]
        output: PathBuf,

        /// Number of events
        #[arg(short = 'n', long, default_value = "10000")]
        events: usize,

        /// Forest layout
        #[arg(long, default_value = "container", value_enum)]
        layout: LayoutArg,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            config,
            render,
            output_dir,
            format,
            summary,
        } => run::run(run::RunArgs {
            config,
            render,
            output_dir,
            format: format.map(ImageFormat::from),
            summary,
        }),
        Commands::Info { file } => info::run(file),
        Commands::Demo {
            output,
            events,
            layout,
        } => demo::run(output, events, layout.into()),
    }
}
