//! Register an instrument

use anyhow::{anyhow, Result};
use clap::Args;
use owo_colors::OwoColorize;

use crate::book::Book;
use crate::data_paths::DataPaths;

#[derive(Args, Clone)]
pub struct InstrumentArgs {
    /// Display ticker, e.g. ABCD3
    pub ticker: String,

    /// Company or fund name
    #[arg(long)]
    pub name: Option<String>,
}

pub struct InstrumentCommand {
    args: InstrumentArgs,
}

impl InstrumentCommand {
    pub fn new(args: InstrumentArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let mut book = Book::load(&data_paths).await?;
        if book.instrument_by_ticker(&self.args.ticker).is_some() {
            return Err(anyhow!(
                "instrument '{}' is already registered",
                self.args.ticker
            ));
        }
        let id = book.add_instrument(self.args.ticker.clone(), self.args.name.clone());
        book.save(&data_paths).await?;
        println!(
            "{} instrument #{} {}",
            "Registered:".green().bold(),
            id,
            self.args.ticker
        );
        Ok(())
    }
}
