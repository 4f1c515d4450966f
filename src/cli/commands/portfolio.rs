//! Register a portfolio

use anyhow::{anyhow, Result};
use clap::Args;
use owo_colors::OwoColorize;

use crate::book::Book;
use crate::data_paths::DataPaths;

#[derive(Args, Clone)]
pub struct PortfolioArgs {
    /// Portfolio name, e.g. "main" or "retirement"
    pub name: String,
}

pub struct PortfolioCommand {
    args: PortfolioArgs,
}

impl PortfolioCommand {
    pub fn new(args: PortfolioArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let mut book = Book::load(&data_paths).await?;
        if book.portfolio_by_name(&self.args.name).is_some() {
            return Err(anyhow!("portfolio '{}' is already registered", self.args.name));
        }
        let id = book.add_portfolio(self.args.name.clone());
        book.save(&data_paths).await?;
        println!(
            "{} portfolio #{} {}",
            "Registered:".green().bold(),
            id,
            self.args.name
        );
        Ok(())
    }
}
