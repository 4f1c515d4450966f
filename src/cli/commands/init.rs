//! Init command: create the data directory layout and an empty book

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use crate::book::{Book, BookError};
use crate::data_paths::DataPaths;

#[derive(Args, Clone)]
pub struct InitArgs {}

pub struct InitCommand {
    _args: InitArgs,
}

impl InitCommand {
    pub fn new(args: InitArgs) -> Self {
        Self { _args: args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        data_paths.ensure_directories()?;
        // Only a genuinely absent book gets created. An unreadable or
        // corrupt book is surfaced as an error, never overwritten.
        match Book::load(&data_paths).await {
            Ok(_) => {
                println!(
                    "Book already exists under {}",
                    data_paths.root().display().bold()
                );
                return Ok(());
            }
            Err(BookError::Missing(_)) => {}
            Err(e) => return Err(e.into()),
        }
        Book::new().save(&data_paths).await?;
        println!(
            "{} empty book created under {}",
            "Initialized:".green().bold(),
            data_paths.root().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::book::store::BOOK_FILE;

    #[tokio::test]
    async fn init_creates_an_empty_book_when_none_exists() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        InitCommand::new(InitArgs {})
            .execute(paths.clone())
            .await
            .unwrap();
        let book = Book::load(&paths).await.unwrap();
        assert!(book.transactions.is_empty());
        assert!(book.instruments.is_empty());
    }

    #[tokio::test]
    async fn init_is_a_no_op_on_an_existing_book() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        let mut book = Book::new();
        book.add_instrument("ABCD3".into(), None);
        book.save(&paths).await.unwrap();

        InitCommand::new(InitArgs {})
            .execute(paths.clone())
            .await
            .unwrap();
        let loaded = Book::load(&paths).await.unwrap();
        assert_eq!(loaded.instruments.len(), 1);
    }

    #[tokio::test]
    async fn init_refuses_to_replace_an_unreadable_book() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        paths.ensure_directories().unwrap();
        let path = paths.book().join(BOOK_FILE);
        let damaged = "{ \"transactions\": [";
        std::fs::write(&path, damaged).unwrap();

        let result = InitCommand::new(InitArgs {}).execute(paths).await;
        assert!(result.is_err());
        // The damaged file is left in place for manual recovery.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), damaged);
    }
}
