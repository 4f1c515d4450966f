//! Per-transaction cost-basis audit trail

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use crate::book::Book;
use crate::cli::args::{resolve_instrument, resolve_portfolio};
use crate::cli::display::timeline_table;
use crate::data_paths::DataPaths;
use crate::decimal::Quantizer;
use crate::engine::{cost_basis_timeline, display_ticker};

#[derive(Args, Clone)]
pub struct TimelineArgs {
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

pub struct TimelineCommand {
    args: TimelineArgs,
}

impl TimelineCommand {
    pub fn new(args: TimelineArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let book = Book::load(&data_paths).await?;
        let qz = Quantizer::default();
        let instrument = resolve_instrument(&book, &self.args.ticker)?;
        let portfolio = resolve_portfolio(&book, &self.args.portfolio)?;

        let rows = cost_basis_timeline(&book, instrument, portfolio, self.args.as_of, &qz)?;
        let ticker = display_ticker(&book, instrument, self.args.as_of)?;
        if rows.is_empty() {
            println!("No transactions for {ticker} in '{}'.", self.args.portfolio);
            return Ok(());
        }
        println!("Cost-basis timeline for {ticker} in '{}':", self.args.portfolio);
        println!("{}", timeline_table(&rows));
        Ok(())
    }
}
