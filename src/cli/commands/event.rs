//! Record a corporate action

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::book::service::{record_action, ActionDraft};
use crate::book::Book;
use crate::cli::args::{decimal_arg, resolve_instrument, ActionKindArg};
use crate::data_paths::DataPaths;
use crate::domain::ActionKind;

#[derive(Args, Clone)]
pub struct EventArgs {
    /// Instrument ticker the action applies to
    #[arg(long)]
    pub ticker: String,

    /// Action kind
    #[arg(long, value_enum)]
    pub kind: ActionKindArg,

    /// Effective date (YYYY-MM-DD); holdings strictly before it are adjusted
    #[arg(long)]
    pub date: NaiveDate,

    /// Ratio numerator, e.g. 2 for a 2:1 split
    #[arg(long, default_value = "1", value_parser = decimal_arg)]
    pub numerator: Decimal,

    /// Ratio denominator, e.g. 1 for a 2:1 split
    #[arg(long, default_value = "1", value_parser = decimal_arg)]
    pub denominator: Decimal,

    /// New ticker for renames (must already be registered)
    #[arg(long)]
    pub renamed_to: Option<String>,

    /// Free-form note
    #[arg(long, default_value = "")]
    pub note: String,
}

pub struct EventCommand {
    args: EventArgs,
}

impl EventCommand {
    pub fn new(args: EventArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        let mut book = Book::load(&data_paths).await?;
        let instrument = resolve_instrument(&book, &self.args.ticker)?;
        let kind: ActionKind = self.args.kind.into();

        let renamed_to = match (&kind, &self.args.renamed_to) {
            (ActionKind::TickerRename, Some(ticker)) => {
                Some(resolve_instrument(&book, ticker)?)
            }
            (ActionKind::TickerRename, None) => {
                return Err(anyhow!("--renamed-to is required for rename actions"));
            }
            _ => None,
        };

        let id = record_action(
            &mut book,
            ActionDraft {
                instrument,
                kind,
                effective_date: self.args.date,
                numerator: self.args.numerator,
                denominator: self.args.denominator,
                renamed_to,
                note: self.args.note.clone(),
            },
        )?;
        book.save(&data_paths).await?;
        println!(
            "{} corporate action #{} ({} {} effective {})",
            "Recorded:".green().bold(),
            id,
            kind.as_str(),
            self.args.ticker.to_uppercase(),
            self.args.date
        );
        Ok(())
    }
}
