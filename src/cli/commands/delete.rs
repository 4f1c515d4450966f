//! Soft-delete a transaction or corporate action

use anyhow::{anyhow, Result};
use clap::Args;
use owo_colors::OwoColorize;

use crate::book::service::{delete_action, delete_transaction};
use crate::book::Book;
use crate::data_paths::DataPaths;

#[derive(Args, Clone)]
pub struct DeleteArgs {
    /// Transaction id to soft-delete
    #[arg(long, conflicts_with = "action")]
    pub transaction: Option<u64>,

    /// Corporate-action id to soft-delete
    #[arg(long)]
    pub action: Option<u64>,
}

pub struct DeleteCommand {
    args: DeleteArgs,
}

impl DeleteCommand {
    pub fn new(args: DeleteArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let mut book = Book::load(&data_paths).await?;
        match (self.args.transaction, self.args.action) {
            (Some(id), None) => {
                delete_transaction(&mut book, id)?;
                book.save(&data_paths).await?;
                println!("{} transaction #{}", "Deleted:".yellow().bold(), id);
            }
            (None, Some(id)) => {
                delete_action(&mut book, id)?;
                book.save(&data_paths).await?;
                println!("{} corporate action #{}", "Deleted:".yellow().bold(), id);
            }
            _ => return Err(anyhow!("pass exactly one of --transaction or --action")),
        }
        Ok(())
    }
}
