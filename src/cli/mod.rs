//! CLI module for folio
//!
//! Command-line interface for the portfolio tracker. Uses clap for argument
//! parsing with a structured command pattern: each subcommand lives in its
//! own module under `commands/` with a dedicated Args struct and Command
//! struct.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod args;
pub mod commands;
pub mod display;

use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::logging::{init_logging, LogMode, LoggingConfig};

use commands::add::{AddArgs, AddCommand};
use commands::apply_bonus::{ApplyBonusArgs, ApplyBonusCommand};
use commands::delete::{DeleteArgs, DeleteCommand};
use commands::event::{EventArgs, EventCommand};
use commands::init::{InitArgs, InitCommand};
use commands::instrument::{InstrumentArgs, InstrumentCommand};
use commands::portfolio::{PortfolioArgs, PortfolioCommand};
use commands::position::{PositionArgs, PositionCommand};
use commands::price::{PriceArgs, PriceCommand};
use commands::report::{ReportArgs, ReportCommand};
use commands::statement::{StatementArgs, StatementCommand};
use commands::timeline::{TimelineArgs, TimelineCommand};
use commands::transfer::{TransferArgs, TransferCommand};
use commands::version::{VersionArgs, VersionCommand};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "CLI portfolio tracker: positions and cost basis with corporate-action time travel", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log to file only, keep the console clean
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the data directory with an empty book
    Init(InitArgs),

    /// Register an instrument
    Instrument(InstrumentArgs),

    /// Register a portfolio
    Portfolio(PortfolioArgs),

    /// Record a transaction (buy, sell, bonus, subscription, ...)
    Add(AddArgs),

    /// Move a position between portfolios, preserving cost basis
    Transfer(TransferArgs),

    /// Record a corporate action (split, reverse split, bonus, rename)
    Event(EventArgs),

    /// Materialize a bonus action into BONUS transactions
    ApplyBonus(ApplyBonusArgs),

    /// Record a closing price
    Price(PriceArgs),

    /// Show the split-adjusted position for one instrument and portfolio
    Position(PositionArgs),

    /// Portfolio position report with unrealized P&L
    Report(ReportArgs),

    /// Per-transaction cost-basis audit trail
    Timeline(TimelineArgs),

    /// Transaction statement with split-adjusted quantities
    Statement(StatementArgs),

    /// Soft-delete a transaction or corporate action
    Delete(DeleteArgs),

    /// Show version information
    Version(VersionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let data_paths = DataPaths::new(&self.data_dir);
        data_paths.ensure_directories()?;

        let mode = if self.quiet {
            LogMode::FileOnly
        } else {
            LogMode::ConsoleAndFile
        };
        if self.verbose > 0 && std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", if self.verbose > 1 { "trace" } else { "debug" });
        }
        init_logging(LoggingConfig::new(mode, data_paths.clone()))?;

        match self.command {
            Commands::Init(args) => InitCommand::new(args).execute(data_paths).await,
            Commands::Instrument(args) => InstrumentCommand::new(args).execute(data_paths).await,
            Commands::Portfolio(args) => PortfolioCommand::new(args).execute(data_paths).await,
            Commands::Add(args) => AddCommand::new(args).execute(data_paths).await,
            Commands::Transfer(args) => TransferCommand::new(args).execute(data_paths).await,
            Commands::Event(args) => EventCommand::new(args).execute(data_paths).await,
            Commands::ApplyBonus(args) => ApplyBonusCommand::new(args).execute(data_paths).await,
            Commands::Price(args) => PriceCommand::new(args).execute(data_paths).await,
            Commands::Position(args) => PositionCommand::new(args).execute(data_paths).await,
            Commands::Report(args) => ReportCommand::new(args).execute(data_paths).await,
            Commands::Timeline(args) => TimelineCommand::new(args).execute(data_paths).await,
            Commands::Statement(args) => StatementCommand::new(args).execute(data_paths).await,
            Commands::Delete(args) => DeleteCommand::new(args).execute(data_paths).await,
            Commands::Version(args) => VersionCommand::new(args).execute(data_paths).await,
        }
    }
}
