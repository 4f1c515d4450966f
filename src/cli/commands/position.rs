//! Show the split-adjusted position for one instrument and portfolio

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use owo_colors::OwoColorize;

use crate::book::Book;
use crate::cli::args::{resolve_instrument, resolve_portfolio};
use crate::data_paths::DataPaths;
use crate::decimal::Quantizer;
use crate::engine::{display_ticker, position_as_of};

#[derive(Args, Clone)]
pub struct PositionArgs {
    /// Instrument ticker
    #[arg(long)]
    pub ticker: String,

    /// Portfolio name
    #[arg(long)]
    pub portfolio: String,

    /// Cut-off date (YYYY-MM-DD); defaults to the full ledger
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub struct PositionCommand {
    args: PositionArgs,
}

impl PositionCommand {
    pub fn new(args: PositionArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let book = Book::load(&data_paths).await?;
        let qz = Quantizer::default();
        let instrument = resolve_instrument(&book, &self.args.ticker)?;
        let portfolio = resolve_portfolio(&book, &self.args.portfolio)?;

        let pos = position_as_of(&book, instrument, portfolio, self.args.as_of, &qz)?;
        let ticker = display_ticker(&book, instrument, self.args.as_of)?;

        if pos.is_closed() {
            println!("{ticker} in '{}': {}", self.args.portfolio, "no open position".dimmed());
            return Ok(());
        }
        println!(
            "{ticker} in '{}': {} units at avg cost {:.4} (cost value {:.4})",
            self.args.portfolio,
            pos.quantity.normalize().bold(),
            pos.average_cost,
            pos.cost_value()
        );
        Ok(())
    }
}
