// helpdesk-learning - the learning mode of the helpdesk assistant, from a terminal
//
// Hosts a LearningManager the same way the desktop app does: build it from
// config, initialize once, dispatch calls, done.

use anyhow::Context;
use helpdesk_learning::{
    intelligence::DEFAULT_SUGGESTION_LIMIT, ActionType, LearningConfig, LearningManager,
};
use serde_json::{Map, Value};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for `data`
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = args[1].as_str();

    match command {
        "version" | "-v" | "--version" => {
            println!("helpdesk-learning v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "help" | "-h" | "--help" => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }

    let mut manager = open_manager().await?;
    let rest = &args[2..];

    match command {
        "track" => handle_track(&mut manager, rest).await,
        "topics" => handle_topics(&mut manager, rest).await,
        "suggest" => handle_suggest(&manager, rest),
        "next" => handle_next(&manager, rest),
        "when" => handle_when(&manager),
        "stats" => handle_stats(&manager),
        "data" => {
            println!("{}", serde_json::to_string_pretty(&manager.learning_data())?);
            Ok(())
        }
        "enable" => {
            manager.set_enabled(true).await?;
            println!("Learning mode enabled");
            Ok(())
        }
        "disable" => {
            manager.set_enabled(false).await?;
            println!("Learning mode disabled (history kept)");
            Ok(())
        }
        "reset" => {
            manager.reset().await?;
            println!("Learning data cleared");
            Ok(())
        }
        "prune" => handle_prune(&mut manager, rest).await,
        "export" => handle_export(&manager, rest).await,
        "import" => handle_import(&mut manager, rest).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

async fn open_manager() -> anyhow::Result<LearningManager> {
    let config = LearningConfig::from_env()?;
    let path = config.snapshot_path();

    LearningManager::open(config)
        .await
        .with_context(|| format!("could not load learning data from {}", path.display()))
}

async fn handle_track(manager: &mut LearningManager, args: &[String]) -> anyhow::Result<()> {
    let Some(kind) = args.first() else {
        eprintln!("Error: No action type provided");
        return Ok(());
    };

    let kind: ActionType = kind.parse()?;

    // Anything after the type is the topic
    let context = if args.len() > 1 {
        let mut ctx = Map::new();
        ctx.insert("topic".to_string(), Value::from(args[1..].join(" ")));
        Some(ctx)
    } else {
        None
    };

    if !manager.is_enabled() {
        eprintln!("Learning mode is disabled; nothing recorded");
        return Ok(());
    }

    manager.track_action(kind, context).await?;
    Ok(())
}

async fn handle_topics(manager: &mut LearningManager, args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        eprintln!("Error: No topics provided");
        return Ok(());
    }

    manager.update_topics(args).await?;
    Ok(())
}

fn handle_suggest(manager: &LearningManager, args: &[String]) -> anyhow::Result<()> {
    let limit = args
        .first()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_SUGGESTION_LIMIT);

    let suggestions = manager.generate_suggestions(limit);

    if suggestions.is_empty() {
        println!("No suggestions available yet.");
        return Ok(());
    }

    println!("{}", "=".repeat(60));
    println!("Suggestions");
    println!("{}", "=".repeat(60));

    for (i, suggestion) in suggestions.iter().enumerate() {
        println!(
            "\n{}. [{}] {} (confidence: {:.0}%)",
            i + 1,
            suggestion.kind.to_string().to_uppercase(),
            suggestion.content,
            suggestion.confidence * 100.0
        );
        println!("   {}", suggestion.reasoning);
    }

    println!("\n{}", "=".repeat(60));
    Ok(())
}

fn handle_next(manager: &LearningManager, args: &[String]) -> anyhow::Result<()> {
    let Some(current) = args.first() else {
        eprintln!("Error: No current action provided");
        return Ok(());
    };

    let current: ActionType = current.parse()?;
    let predictions = manager.suggest_next_actions(current);

    if predictions.is_empty() {
        println!("Nothing usually follows {} yet.", current);
    }

    for (i, prediction) in predictions.iter().enumerate() {
        println!(
            "{:3}. {} (score {}) - {}",
            i + 1,
            prediction.action,
            prediction.score,
            prediction.reason
        );
    }

    Ok(())
}

fn handle_when(manager: &LearningManager) -> anyhow::Result<()> {
    let suggestions = manager.time_based_actions();

    if suggestions.is_empty() {
        println!("No time-of-day habits yet.");
    }

    for (i, suggestion) in suggestions.iter().enumerate() {
        println!(
            "{:3}. {} (score {}) - {}",
            i + 1,
            suggestion.action,
            suggestion.score,
            suggestion.reason
        );
    }

    Ok(())
}

fn handle_stats(manager: &LearningManager) -> anyhow::Result<()> {
    let stats = manager.statistics();
    let last_analyzed = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(stats.last_analyzed)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| stats.last_analyzed.to_string());

    println!("\nLearning Status");
    println!("{}", "=".repeat(60));
    println!("  Enabled:      {}", stats.enabled);
    println!("  Actions:      {}", stats.total_actions);
    println!("  Tools:        {}", stats.tools_tracked);
    println!("  Workflows:    {}", stats.workflows_detected);
    println!("  Topics:       {}", stats.topics_tracked);
    println!("  Last analyzed: {}", last_analyzed);
    println!("  Data file:    {}", manager.config().snapshot_path().display());
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_prune(manager: &mut LearningManager, args: &[String]) -> anyhow::Result<()> {
    let days = args
        .first()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(30);

    let removed = manager.clear_old_actions(days).await?;
    println!("Removed {} actions older than {} days", removed, days);
    Ok(())
}

async fn handle_export(manager: &LearningManager, args: &[String]) -> anyhow::Result<()> {
    let Some(path) = args.first() else {
        eprintln!("Error: No file provided");
        return Ok(());
    };

    let json = manager.export_data()?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("could not write {}", path))?;

    println!("Exported learning data to {}", path);
    Ok(())
}

async fn handle_import(manager: &mut LearningManager, args: &[String]) -> anyhow::Result<()> {
    let Some(path) = args.first() else {
        eprintln!("Error: No file provided");
        return Ok(());
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("could not read {}", path))?;
    manager.import_data(&json).await?;

    println!("Imported learning data from {}", path);
    Ok(())
}

fn print_usage() {
    println!(
        r#"helpdesk-learning v{} - what the assistant has learned about you

USAGE:
    helpdesk-learning <COMMAND> [OPTIONS]

COMMANDS:
    track <type> [topic]   Record an action (message, search, filter,
                           view_analytics, conversation_start,
                           conversation_continue)
    topics <tag>...        Count conversation tags
    suggest [limit]        Show suggestions (default: 5)
    next <type>            What usually follows an action
    when                   Tools you tend to use at this hour / weekday
    stats                  Show learning statistics
    data                   Dump learned data as JSON
    enable | disable       Toggle learning mode
    reset                  Forget everything learned
    prune [days]           Drop actions older than N days (default: 30)
    export <file>          Export learning data
    import <file>          Import learning data
    version                Show version
    help                   Show this help

ENVIRONMENT:
    HELPDESK_LEARNING_DIR  Data directory (default: ~/.helpdesk-assistant)
    HELPDESK_MAX_ACTIONS   Actions kept (default: 1000)
    RUST_LOG               Log filter (default: info)
"#,
        env!("CARGO_PKG_VERSION")
    );
}
