//! Materialize a bonus action into BONUS transactions

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use crate::book::service::apply_bonus;
use crate::book::Book;
use crate::data_paths::DataPaths;
use crate::decimal::Quantizer;

#[derive(Args, Clone)]
pub struct ApplyBonusArgs {
    /// Corporate-action id, as printed by `folio event`
    pub action: u64,
}

pub struct ApplyBonusCommand {
    args: ApplyBonusArgs,
}

impl ApplyBonusCommand {
    pub fn new(args: ApplyBonusArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let mut book = Book::load(&data_paths).await?;
        let qz = Quantizer::default();
        let created = apply_bonus(&mut book, self.args.action, &qz)?;
        book.save(&data_paths).await?;
        if created == 0 {
            println!("No portfolio held the instrument at the effective date.");
        } else {
            println!(
                "{} {} bonus transaction(s) from action #{}",
                "Created:".green().bold(),
                created,
                self.args.action
            );
        }
        Ok(())
    }
}
