//! Record a closing price

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::book::Book;
use crate::cli::args::{decimal_arg, resolve_instrument};
use crate::data_paths::DataPaths;
use crate::decimal::Quantizer;
use crate::domain::ClosingPrice;

#[derive(Args, Clone)]
pub struct PriceArgs {
    /// Instrument ticker
    #[arg(long)]
    pub ticker: String,

    /// Quote date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Closing price
    #[arg(long, value_parser = decimal_arg)]
    pub close: Decimal,
}

pub struct PriceCommand {
    args: PriceArgs,
}

impl PriceCommand {
    pub fn new(args: PriceArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let mut book = Book::load(&data_paths).await?;
        let qz = Quantizer::default();
        let instrument = resolve_instrument(&book, &self.args.ticker)?;
        book.record_price(ClosingPrice {
            instrument,
            date: self.args.date,
            price: qz.money(self.args.close),
        });
        book.save(&data_paths).await?;
        println!(
            "{} {} closed at {:.4} on {}",
            "Recorded:".green().bold(),
            self.args.ticker.to_uppercase(),
            self.args.close,
            self.args.date
        );
        Ok(())
    }
}
