// gloss - a glossary bot you can talk to from the terminal
//
// Parses CLI args, wires config, store and dispatcher together, and prints
// whatever the bot says.

use anyhow::Context;
use gloss_lib::{
    config::Config,
    core::{Dispatcher, Request, Responder, Response, Visibility},
    db::Snapshot,
    Database,
};
use std::env;
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Where `json` posts channel replies
const DEFAULT_CHANNEL: &str = "#general";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "ask" => handle_ask(&args[2..], false).await,
        "json" => handle_ask(&args[2..], true).await,
        "export" => handle_export().await,
        "import" => handle_import().await,
        "version" | "-v" | "--version" => {
            println!("gloss v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

// Logs go to stderr so stdout only ever carries replies
fn init_logging() {
    let filter = EnvFilter::try_from_env("GLOSS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints replies, either as text or as a webhook payload
struct StdoutResponder {
    as_json: bool,
    user_name: String,
    bot_name: String,
}

impl Responder for StdoutResponder {
    fn respond(&mut self, response: &Response) -> gloss_lib::Result<()> {
        if !self.as_json {
            println!("{}", response.reply.text());
            return Ok(());
        }

        let channel = match response.visibility {
            Visibility::Channel => DEFAULT_CHANNEL.to_string(),
            Visibility::Private => format!("@{}", self.user_name),
        };
        let payload = response.reply.to_webhook_payload(&channel, &self.bot_name);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        Ok(())
    }
}

async fn handle_ask(args: &[String], as_json: bool) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let db = open_database(&config).await?;
    let dispatcher = Dispatcher::from_config(Arc::new(db), &config)?;

    let request = Request::new(
        args.join(" "),
        config.user_name.clone(),
        config.command_prefix.clone(),
    );
    let mut responder = StdoutResponder {
        as_json,
        user_name: config.user_name.clone(),
        bot_name: config.bot_name.clone(),
    };

    // The apology has already been printed; exit non-zero all the same
    dispatcher
        .handle_and_respond(&request, &mut responder)
        .await
        .context("request failed")?;

    dispatcher.store().close().await;
    Ok(())
}

async fn handle_export() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let db = open_database(&config).await?;

    let snapshot = db.export_snapshot().await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    db.close().await;
    Ok(())
}

async fn handle_import() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("could not read snapshot from stdin")?;
    let snapshot: Snapshot =
        serde_json::from_str(&input).context("stdin is not a valid snapshot")?;

    let db = open_database(&config).await?;
    if let Err(e) = db.import_snapshot(&snapshot).await {
        eprintln!("{}", e.user_message());
        db.close().await;
        return Err(e.into());
    }

    eprintln!(
        "Imported {} definitions and {} interactions into {}",
        snapshot.definitions.len(),
        snapshot.interactions.len(),
        config.database_path.display()
    );

    db.close().await;
    Ok(())
}

async fn open_database(config: &Config) -> anyhow::Result<Database> {
    Database::new(&config.database_path)
        .await
        .with_context(|| format!("could not open {}", config.database_path.display()))
}

fn print_usage() {
    println!(
        r#"gloss v{} - A glossary bot for your team's jargon

USAGE:
    gloss <COMMAND> [ARGS]

COMMANDS:
    ask <text>             Talk to the bot and print the reply
    json <text>            Same as ask, but print the chat webhook payload
    export                 Write every definition and interaction as JSON
    import                 Replace the glossary with a JSON snapshot from stdin
    version                Show version
    help                   Show this help

EXAMPLES:
    gloss ask EW = Eligibility Worker
    gloss ask EW
    gloss ask search worker
    gloss ask recent alpha 20
    gloss export > glossary.json

ENVIRONMENT:
    GLOSS_DATABASE_URL     SQLite database (default: ~/.gloss/glossary.db)
    GLOSS_BOT_NAME         Name the bot calls itself (default: Glossary Bot)
    GLOSS_COMMAND          Command shown in help text (default: /gloss)
    GLOSS_BROADCAST        Reply to the whole channel, "shh" for private
    GLOSS_USER             Who requests are attributed to (default: $USER)
    GLOSS_LOG              Log filter, e.g. debug (default: warn)
"#,
        env!("CARGO_PKG_VERSION")
    );
}
