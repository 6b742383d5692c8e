//! `crimes` - CLI for criminal-intent
//!
//! This binary records, lists and edits crimes stored in the local database
//! and manages the selected theme.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use criminal_intent::cli::{
    self, Cli, Command, ConfigCommand, EditCommand, ListCommand, ShowCommand, ThemeCommand,
};
use criminal_intent::crime::sort_newest_first;
use criminal_intent::storage::{load_form, submit_form};
use criminal_intent::{
    init_logging, Config, CrimeStorage, KeyValueStore, SqliteStore, ThemeProvider,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("Failed to load configuration")?;

    // Configuration commands don't need the database
    let command = match cli.command {
        Command::Config(config_cmd) => return handle_config(&config, config_cmd),
        command => command,
    };

    let store = open_store(&config)?;
    let storage = CrimeStorage::new(store.clone())
        .with_serialized_writes(config.storage.serialize_writes);

    match command {
        Command::List(cmd) => handle_list(&config, &storage, &cmd).await,
        Command::Show(cmd) => handle_show(&config, &storage, &cmd).await,
        Command::Add(cmd) => {
            let form = cmd.to_form(storage.now())?;
            let crime = submit_form(&storage, None, form)
                .await
                .context("Failed to save crime")?;
            println!("Crime created successfully: {}", crime.id);
            Ok(())
        }
        Command::Edit(cmd) => handle_edit(&storage, &cmd).await,
        Command::Delete(cmd) => {
            if storage
                .delete_crime(&cmd.id)
                .await
                .context("Failed to delete crime")?
            {
                println!("Deleted crime {}", cmd.id);
            } else {
                println!("No crime with id '{}'", cmd.id);
            }
            Ok(())
        }
        Command::Clear(cmd) => {
            if cmd.yes {
                storage
                    .clear_all_crimes()
                    .await
                    .context("Failed to clear crimes")?;
                println!("All crimes deleted.");
            } else {
                println!("This will permanently delete every recorded crime.");
                println!("Use --yes to confirm.");
            }
            Ok(())
        }
        Command::Stats(cmd) => {
            let stats = storage.stats().await.context("Failed to load crimes")?;
            if cmd.json {
                let summary = serde_json::json!({
                    "total": stats.total,
                    "solved": stats.solved,
                    "open": stats.open(),
                    "with_photo": stats.with_photo,
                    "oldest": stats.oldest,
                    "newest": stats.newest,
                    "database_path": config.database_path(),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", cli::render_stats(&stats, &config.display));
                println!("Database:    {}", config.database_path().display());
            }
            Ok(())
        }
        Command::Theme(theme_cmd) => handle_theme(store, theme_cmd).await,
        Command::Config(_) => unreachable!("configuration commands are handled above"),
    }
}

fn open_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let path = config.database_path();
    let store = SqliteStore::open(&path, config.busy_timeout())
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    Ok(Arc::new(store))
}

async fn handle_list(
    config: &Config,
    storage: &CrimeStorage,
    cmd: &ListCommand,
) -> anyhow::Result<()> {
    let mut crimes = storage
        .get_all_crimes()
        .await
        .context("Failed to load crimes")?;
    if cmd.open {
        crimes.retain(|crime| !crime.is_solved);
    }
    if config.display.newest_first {
        sort_newest_first(&mut crimes);
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&crimes)?);
    } else {
        print!("{}", cli::render_list(&crimes, &config.display));
    }
    Ok(())
}

async fn handle_show(
    config: &Config,
    storage: &CrimeStorage,
    cmd: &ShowCommand,
) -> anyhow::Result<()> {
    let Some(crime) = storage
        .get_crime_by_id(&cmd.id)
        .await
        .context("Failed to load crime details")?
    else {
        bail!("No crime with id '{}'", cmd.id);
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&crime)?);
    } else {
        print!("{}", cli::render_crime(&crime, &config.display));
    }
    Ok(())
}

async fn handle_edit(storage: &CrimeStorage, cmd: &EditCommand) -> anyhow::Result<()> {
    let Some(mut form) = load_form(storage, &cmd.id)
        .await
        .context("Failed to load crime details")?
    else {
        bail!("No crime with id '{}'", cmd.id);
    };

    cmd.apply(&mut form)?;
    let crime = submit_form(storage, Some(&cmd.id), form)
        .await
        .context("Failed to save crime")?;
    println!("Crime updated successfully: {}", crime.id);
    Ok(())
}

async fn handle_theme(store: Arc<dyn KeyValueStore>, cmd: ThemeCommand) -> anyhow::Result<()> {
    let mut provider = ThemeProvider::load(store).await;
    match cmd {
        ThemeCommand::Show { json } => {
            let theme = provider.current();
            if json {
                println!("{}", serde_json::to_string_pretty(theme)?);
            } else {
                println!("{} ({})", theme.name, theme.id);
            }
        }
        ThemeCommand::List => {
            print!(
                "{}",
                cli::render_themes(provider.available(), provider.current())
            );
        }
        ThemeCommand::Set { id } => {
            if provider.current().id == id {
                println!("{} is already selected", provider.current().name);
            } else {
                let theme = provider
                    .set_theme(&id)
                    .await
                    .context("Failed to save theme")?;
                println!("Successfully switched to {} theme", theme.name);
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Serialize writes:   {}", config.storage.serialize_writes);
                println!("  Busy timeout (ms):  {}", config.storage.busy_timeout_ms);
                println!();
                println!("[Display]");
                println!("  Date format:        {}", config.display.date_format);
                println!("  Newest first:       {}", config.display.newest_first);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
