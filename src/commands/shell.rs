//! Interactive shell.
//!
//! Keeps one engine alive across commands, so the local list and an open
//! edit survive between lines, the way the list behaves in a browser tab.

use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::{connect, flush_notifications, Engine};
use crate::config::Config;
use crate::render::format_items;

const HELP: &str = "\
Commands:
  list                          show the list
  refresh                       reload the list from the server
  add <name> [qty] [price]      add an item
  edit <name>                   select an item for editing
  commit [name] [qty] [price]   save the selected item (blank keeps current)
  cancel                        drop the selection
  delete [name]                 remove the named or selected item
  help                          show this help
  quit                          leave the shell
Quote names that contain spaces: add \"oat milk\" 2 3.50";

#[derive(Args)]
pub struct ShellCommand {}

/// A parsed shell line.
#[derive(Debug, PartialEq)]
enum Action {
    List,
    Refresh,
    Add {
        name: String,
        qty: Option<String>,
        price: Option<String>,
    },
    Edit(String),
    Commit {
        name: Option<String>,
        qty: Option<String>,
        price: Option<String>,
    },
    Cancel,
    Delete(Option<String>),
    Help,
    Quit,
    Nothing,
}

impl ShellCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (mut engine, mut rx) = connect(config)?;
        engine.load().await;
        println!("{}", format_items(engine.snapshot()));
        println!("Type 'help' for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            let prompt = match engine.edit_target() {
                Some(target) => format!("shoplist [{}]> ", target),
                None => "shoplist> ".to_string(),
            };
            stdout.write_all(prompt.as_bytes()).await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let action = match parse_line(&line) {
                Ok(action) => action,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };
            if action == Action::Quit {
                break;
            }

            if let Err(e) = execute(&mut engine, action).await {
                println!("{}", e);
            }
            flush_notifications(&mut rx, config);
        }

        Ok(())
    }
}

async fn execute(engine: &mut Engine, action: Action) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        Action::List => println!("{}", format_items(engine.snapshot())),
        Action::Refresh => {
            engine.load().await;
            println!("{}", format_items(engine.snapshot()));
        }
        Action::Add { name, qty, price } => {
            engine
                .add(
                    &name,
                    qty.as_deref().unwrap_or("1"),
                    price.as_deref().unwrap_or("0"),
                )
                .await?;
            println!("{}", format_items(engine.snapshot()));
        }
        Action::Edit(name) => {
            let item = engine.begin_edit(&name)?;
            println!("Editing {}", item);
        }
        Action::Commit { name, qty, price } => {
            let current = engine.editing().cloned();
            let new_name = name
                .or_else(|| current.as_ref().map(|i| i.name.clone()))
                .unwrap_or_default();
            let quantity = match (qty, &current) {
                (Some(q), _) => q.as_str().into(),
                (None, Some(item)) => item.quantity,
                (None, None) => Default::default(),
            };
            let unit_price = match (price, &current) {
                (Some(p), _) => p.as_str().into(),
                (None, Some(item)) => item.price,
                (None, None) => Default::default(),
            };
            engine.commit_edit(&new_name, quantity, unit_price).await?;
            println!("{}", format_items(engine.snapshot()));
        }
        Action::Cancel => engine.cancel_edit(),
        Action::Delete(Some(name)) => {
            engine.delete(&name).await?;
            println!("{}", format_items(engine.snapshot()));
        }
        Action::Delete(None) => {
            engine.delete_selected().await?;
            println!("{}", format_items(engine.snapshot()));
        }
        Action::Help => println!("{}", HELP),
        Action::Quit | Action::Nothing => {}
    }
    Ok(())
}

fn parse_line(line: &str) -> Result<Action, String> {
    let mut words = split_words(line)?.into_iter();
    let Some(command) = words.next() else {
        return Ok(Action::Nothing);
    };
    let mut rest = words.fuse();

    let action = match command.to_lowercase().as_str() {
        "list" | "ls" => Action::List,
        "refresh" => Action::Refresh,
        "add" => Action::Add {
            name: rest.next().ok_or("usage: add <name> [qty] [price]")?,
            qty: rest.next(),
            price: rest.next(),
        },
        "edit" => Action::Edit(rest.next().ok_or("usage: edit <name>")?),
        "commit" | "save" => Action::Commit {
            name: rest.next().filter(|s| !s.is_empty()),
            qty: rest.next().filter(|s| !s.is_empty()),
            price: rest.next().filter(|s| !s.is_empty()),
        },
        "cancel" => Action::Cancel,
        "delete" | "rm" => Action::Delete(rest.next()),
        "help" | "?" => Action::Help,
        "quit" | "exit" => Action::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(action)
}

/// Split on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_word = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }

    if in_quotes {
        return Err("Unterminated quote".to_string());
    }
    if has_word {
        words.push(current);
    }
    Ok(words)
}
