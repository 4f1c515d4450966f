//! Transaction statement with split-adjusted quantities

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use owo_colors::OwoColorize;

use crate::book::Book;
use crate::cli::args::{resolve_instrument, resolve_portfolio};
use crate::cli::display::statement_table;
use crate::data_paths::DataPaths;
use crate::decimal::Quantizer;
use crate::engine::{statement, StatementRow};
use crate::sources::TxQuery;

#[derive(Args, Clone)]
pub struct StatementArgs {
    /// Restrict to one instrument ticker
    #[arg(long)]
    pub ticker: Option<String>,

    /// Restrict to one portfolio
    #[arg(long)]
    pub portfolio: Option<String>,

    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Inclusive end date (YYYY-MM-DD); also the adjustment cut-off
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Write the statement as CSV into the exports directory
    #[arg(long)]
    pub csv: bool,
}

pub struct StatementCommand {
    args: StatementArgs,
}

impl StatementCommand {
    pub fn new(args: StatementArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let book = Book::load(&data_paths).await?;
        let qz = Quantizer::default();

        let instrument = self
            .args
            .ticker
            .as_deref()
            .map(|t| resolve_instrument(&book, t))
            .transpose()?;
        let portfolio = self
            .args
            .portfolio
            .as_deref()
            .map(|p| resolve_portfolio(&book, p))
            .transpose()?;

        let query = TxQuery {
            instrument,
            portfolio,
            from: self.args.from,
            until: self.args.until,
        };
        let rows = statement(&book, &query, &qz)?;
        if rows.is_empty() {
            println!("No transactions match.");
            return Ok(());
        }

        println!("{}", statement_table(&book, &rows));
        if self.args.csv {
            let path = self.export_csv(&book, &rows, &data_paths)?;
            println!("{} {}", "Exported:".green().bold(), path.display());
        }
        Ok(())
    }

    fn export_csv(
        &self,
        book: &Book,
        rows: &[StatementRow],
        data_paths: &DataPaths,
    ) -> Result<std::path::PathBuf> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = data_paths.exports().join(format!("statement-{stamp}.csv"));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        writer.write_record([
            "id", "date", "kind", "ticker", "portfolio", "quantity", "unit_price", "fees",
            "adjusted_quantity", "note",
        ])?;
        for row in rows {
            let t = &row.transaction;
            let ticker = book
                .instrument_by_id(t.instrument)
                .map(|i| i.ticker.clone())
                .unwrap_or_else(|| format!("#{}", t.instrument));
            let portfolio = book
                .portfolio_by_id(t.portfolio)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("#{}", t.portfolio));
            writer.write_record([
                t.id.to_string(),
                t.date.to_string(),
                t.kind.as_str().to_string(),
                ticker,
                portfolio,
                t.quantity.to_string(),
                t.unit_price.to_string(),
                t.fees.to_string(),
                row.adjusted_quantity
                    .map(|q| q.to_string())
                    .unwrap_or_default(),
                t.note.clone(),
            ])?;
        }
        writer.flush()?;
        Ok(path)
    }
}
