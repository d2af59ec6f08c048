//! Interactive form loop: line commands in, rendered snapshots out.

use std::str::FromStr;

use anyhow::Result;
use client_core::{DraftField, UnknownDraftField, ViewController, ViewError};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::ui::{render, render_draft, RenderOptions};

pub const HELP: &str = "\
commands:
  list                 reload the property list
  set <field> <value>  fill a form field (address, city, zip, location_code, size_sqft, base_price_usd)
  show                 print the current form values
  submit               create a property from the form, then reload
  clear                discard the form values
  help                 show this text
  quit                 leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Set { field: DraftField, value: String },
    Show,
    Submit,
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'; type 'help' for the list")]
    Unknown(String),
    #[error("usage: set <field> <value>")]
    SetUsage,
    #[error(transparent)]
    Field(#[from] UnknownDraftField),
}

impl FromStr for ShellCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        let command = match verb.to_ascii_lowercase().as_str() {
            "list" | "refresh" => ShellCommand::List,
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(field, value)| (field, value.trim()))
                    .unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(CommandError::SetUsage);
                }
                ShellCommand::Set {
                    field: field.parse()?,
                    value: value.to_string(),
                }
            }
            "show" => ShellCommand::Show,
            "submit" | "save" => ShellCommand::Submit,
            "clear" => ShellCommand::Clear,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };
        Ok(command)
    }
}

/// Runs until `quit` or end of input. Loads the list once before the first prompt.
pub async fn run<R, W>(
    controller: &ViewController,
    options: RenderOptions,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let _ = controller.refresh().await;
    output
        .write_all(render(&controller.snapshot().await, options).as_bytes())
        .await?;

    let mut lines = input.lines();
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(err) => {
                output.write_all(format!("{err}\n").as_bytes()).await?;
                continue;
            }
        };
        debug!(?command, "shell command");

        let text = match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Show => render_draft(&controller.snapshot().await.draft),
            ShellCommand::Set { field, value } => match controller.edit_draft(field, value).await
            {
                Ok(()) => String::new(),
                Err(err) => busy_text(&err),
            },
            ShellCommand::Clear => match controller.clear_draft().await {
                Ok(()) => String::new(),
                Err(err) => busy_text(&err),
            },
            ShellCommand::List => {
                let _ = controller.refresh().await;
                render(&controller.snapshot().await, options)
            }
            ShellCommand::Submit => {
                let draft = controller.snapshot().await.draft;
                let _ = controller.submit(draft).await;
                render(&controller.snapshot().await, options)
            }
        };
        output.write_all(text.as_bytes()).await?;
    }

    output.flush().await?;
    Ok(())
}

fn busy_text(err: &ViewError) -> String {
    format!("{err}\n")
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
