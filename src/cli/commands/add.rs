//! Record a single transaction

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::book::service::{record_transaction, TransactionDraft};
use crate::book::Book;
use crate::cli::args::{decimal_arg, resolve_instrument, resolve_portfolio, KindArg};
use crate::data_paths::DataPaths;
use crate::decimal::Quantizer;

#[derive(Args, Clone)]
pub struct AddArgs {
    /// Trade date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Transaction kind
    #[arg(long, value_enum)]
    pub kind: KindArg,

    /// Instrument ticker
    #[arg(long)]
    pub ticker: String,

    /// Portfolio name
    #[arg(long)]
    pub portfolio: String,

    /// Quantity in units
    #[arg(long, value_parser = decimal_arg)]
    pub quantity: Decimal,

    /// Unit price
    #[arg(long, default_value = "0", value_parser = decimal_arg)]
    pub price: Decimal,

    /// Fees and other costs rolled into the basis
    #[arg(long, default_value = "0", value_parser = decimal_arg)]
    pub fees: Decimal,

    /// Free-form note
    #[arg(long, default_value = "")]
    pub note: String,
}

pub struct AddCommand {
    args: AddArgs,
}

impl AddCommand {
    pub fn new(args: AddArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let mut book = Book::load(&data_paths).await?;
        let qz = Quantizer::default();
        let instrument = resolve_instrument(&book, &self.args.ticker)?;
        let portfolio = resolve_portfolio(&book, &self.args.portfolio)?;

        let id = record_transaction(
            &mut book,
            TransactionDraft {
                date: self.args.date,
                kind: self.args.kind.into(),
                instrument,
                portfolio,
                quantity: self.args.quantity,
                unit_price: self.args.price,
                fees: self.args.fees,
                note: self.args.note.clone(),
            },
            &qz,
        )?;
        book.save(&data_paths).await?;
        println!(
            "{} transaction #{} ({} {} {})",
            "Recorded:".green().bold(),
            id,
            self.args.date,
            self.args.ticker.to_uppercase(),
            self.args.quantity.normalize()
        );
        Ok(())
    }
}
