//! Move a position between portfolios

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::book::service::transfer_between;
use crate::book::Book;
use crate::cli::args::{decimal_arg, resolve_instrument, resolve_portfolio};
use crate::data_paths::DataPaths;
use crate::decimal::Quantizer;

#[derive(Args, Clone)]
pub struct TransferArgs {
    /// Transfer date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Instrument ticker
    #[arg(long)]
    pub ticker: String,

    /// Origin portfolio name
    #[arg(long)]
    pub from: String,

    /// Destination portfolio name
    #[arg(long)]
    pub to: String,

    /// Quantity in units
    #[arg(long, value_parser = decimal_arg)]
    pub quantity: Decimal,
}

pub struct TransferCommand {
    args: TransferArgs,
}

impl TransferCommand {
    pub fn new(args: TransferArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let mut book = Book::load(&data_paths).await?;
        let qz = Quantizer::default();
        let instrument = resolve_instrument(&book, &self.args.ticker)?;
        let origin = resolve_portfolio(&book, &self.args.from)?;
        let destination = resolve_portfolio(&book, &self.args.to)?;

        let (out_id, in_id) = transfer_between(
            &mut book,
            self.args.date,
            instrument,
            origin,
            destination,
            self.args.quantity,
            &qz,
        )?;
        book.save(&data_paths).await?;
        println!(
            "{} {} {} from '{}' to '{}' (transactions #{} / #{})",
            "Transferred:".green().bold(),
            self.args.quantity.normalize(),
            self.args.ticker.to_uppercase(),
            self.args.from,
            self.args.to,
            out_id,
            in_id
        );
        Ok(())
    }
}
