//! Portfolio position report with unrealized P&L

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::book::Book;
use crate::cli::args::resolve_portfolio;
use crate::cli::display::report_table;
use crate::data_paths::DataPaths;
use crate::decimal::Quantizer;
use crate::engine::portfolio_position;

#[derive(Args, Clone)]
pub struct ReportArgs {
    /// Portfolio name
    #[arg(long)]
    pub portfolio: String,

    /// Cut-off date (YYYY-MM-DD); defaults to the full ledger
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub struct ReportCommand {
    args: ReportArgs,
}

impl ReportCommand {
    pub fn new(args: ReportArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let book = Book::load(&data_paths).await?;
        let qz = Quantizer::default();
        let portfolio = resolve_portfolio(&book, &self.args.portfolio)?;

        let rows = portfolio_position(&book, portfolio, self.args.as_of, &qz)?;
        if rows.is_empty() {
            println!("Portfolio '{}' holds no open positions.", self.args.portfolio);
            return Ok(());
        }
        println!("{}", report_table(&rows));

        let cost: Decimal = rows.iter().map(|r| r.cost_value).sum();
        let market: Option<Decimal> = rows.iter().map(|r| r.market_value).sum();
        match market {
            Some(market) => {
                let pnl = market - cost;
                println!(
                    "Total cost {:.4}, market {:.4}, unrealized {}",
                    cost,
                    market,
                    if pnl >= Decimal::ZERO {
                        format!("{pnl:.4}").green().to_string()
                    } else {
                        format!("{pnl:.4}").red().to_string()
                    }
                );
            }
            None => println!("Total cost {cost:.4} (some instruments have no quote)"),
        }
        Ok(())
    }
}
