use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use filedb_core::{Database, Definition, OpContext, Record, RecordKey};
use filedb_store::{ChangeKind, EntryKind, LocalFileStore};
use serde_json::Value;
use tracing::debug;

use crate::cli::*;
use crate::config::{CliConfig, Settings};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let settings = CliConfig::load_or_default(&cli.config)?.merge(&cli);
    debug!(root = %settings.root.display(), "settings loaded");

    let store = LocalFileStore::open(&settings.root)
        .with_context(|| format!("opening record tree {}", settings.root.display()))?;
    let format = cli.format;

    if let Command::History(args) = &cli.command {
        return cmd_history(&store, args, format);
    }

    let path = settings.definition()?;
    let definition = Definition::load(path)
        .with_context(|| format!("loading definition {}", path.display()))?;
    debug!(collections = definition.len(), "definition loaded");
    let db = Database::new(definition, Arc::new(store));
    let ctx = context(&settings);

    match cli.command {
        Command::Get(args) => cmd_get(&db, &ctx, args, format).await,
        Command::Set(args) => cmd_write(&db, &ctx, args, false).await,
        Command::Insert(args) => cmd_write(&db, &ctx, args, true).await,
        Command::Delete(args) => cmd_delete(&db, &ctx, args).await,
        Command::Ls(args) => cmd_ls(&db, &ctx, args, format).await,
        Command::History(_) => Ok(()),
    }
}

/// Operation context cancelled on Ctrl-C.
fn context(settings: &Settings) -> OpContext {
    let mut ctx = OpContext::new();
    if let Some(author) = &settings.author {
        ctx = ctx.with_author(author.clone());
    }
    let on_signal = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });
    ctx
}

fn parse_fields(json: &str) -> anyhow::Result<Value> {
    serde_json::from_str(json).context("record fields must be valid JSON")
}

async fn cmd_get(db: &Database, ctx: &OpContext, args: KeyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let key = RecordKey::new(args.collection, args.key);
    let mut record = Record::empty(key.clone());
    db.read_transaction().get(ctx, &mut record).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Text if !record.exists() => {
            println!("{} {}", "not found:".yellow(), key);
        }
        OutputFormat::Text => {
            println!("{}", key.to_string().bold());
            if let Some(fields) = record.field_map() {
                for (name, value) in fields {
                    println!("  {}: {}", name.cyan(), value);
                }
            }
        }
    }
    Ok(())
}

async fn cmd_write(db: &Database, ctx: &OpContext, args: WriteArgs, insert: bool) -> anyhow::Result<()> {
    let key = RecordKey::new(args.collection, args.key);
    let record = Record::new(key.clone(), parse_fields(&args.json)?);
    let tx = db.readwrite_transaction();
    if insert {
        tx.insert(ctx, &record).await?;
        println!("{} Inserted {}", "✓".green().bold(), key.to_string().yellow());
    } else {
        tx.set(ctx, &record).await?;
        println!("{} Saved {}", "✓".green().bold(), key.to_string().yellow());
    }
    Ok(())
}

async fn cmd_delete(db: &Database, ctx: &OpContext, args: KeyArgs) -> anyhow::Result<()> {
    let key = RecordKey::new(args.collection, args.key);
    db.readwrite_transaction().delete(ctx, &key).await?;
    println!("{} Deleted {}", "✓".green().bold(), key.to_string().yellow());
    Ok(())
}

async fn cmd_ls(db: &Database, ctx: &OpContext, args: LsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let entries = db.read_transaction().list_files(ctx, &args.collection).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text if entries.is_empty() => println!("No files."),
        OutputFormat::Text => {
            for entry in &entries {
                match entry.kind {
                    EntryKind::Dir => println!("{}/", entry.path.blue().bold()),
                    EntryKind::File => println!("{}", entry.path),
                }
            }
        }
    }
    Ok(())
}

fn cmd_history(store: &LocalFileStore, args: &HistoryArgs, format: OutputFormat) -> anyhow::Result<()> {
    let history = store.history()?;
    let recent: Vec<_> = history.iter().rev().take(args.limit).collect();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recent)?),
        OutputFormat::Text if recent.is_empty() => println!("No changes recorded."),
        OutputFormat::Text => {
            for entry in recent {
                let kind = match entry.kind {
                    ChangeKind::Write => "write".green(),
                    ChangeKind::Delete => "delete".red(),
                };
                let summary = entry.message.lines().next().unwrap_or_default();
                println!(
                    "{} {} {} {}",
                    entry.revision.short().yellow(),
                    entry.at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
                    kind,
                    entry.path.bold()
                );
                println!("    {summary}");
            }
        }
    }
    Ok(())
}
