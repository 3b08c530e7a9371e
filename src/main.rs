//! Voice Navigator - Entry Point
//!
//! Builds the demo menu scene, wires the navigator to a resolver and reads
//! utterances from stdin as if they came from speech recognition.

use clap::Parser;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use voice_navigator::core::config::NavigatorConfig;
use voice_navigator::core::error::Result;
use voice_navigator::demo::DemoScene;
use voice_navigator::llm::{IntentResolver, KeywordResolver, LlmClient, LlmIntentResolver};
use voice_navigator::navigation::Navigator;
use voice_navigator::ui::NavigationUI;

/// Voice Navigator - type what you would say, watch the menus move
#[derive(Parser, Debug)]
#[command(name = "voice-navigator")]
#[command(about = "Resolve free-form commands to UI controls and activate them")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Match words locally instead of calling the language model
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Log debug output
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

// Controls are pressed from one thread, as a UI event loop would
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "voice_navigator=debug"
    } else {
        "voice_navigator=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = match &args.config {
        Some(path) => NavigatorConfig::load(path)?,
        None => NavigatorConfig::from_env(),
    };

    let resolver: Arc<dyn IntentResolver> = if args.offline {
        Arc::new(KeywordResolver)
    } else {
        match LlmClient::from_config(&config.llm) {
            Ok(client) => Arc::new(LlmIntentResolver::new(client, config.llm.strict_json)),
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to offline keyword matching");
                Arc::new(KeywordResolver)
            }
        }
    };

    let demo = DemoScene::build_with(config.navigation.parent_resolution);
    let navigator = Navigator::new(demo.graph.clone(), resolver, config.navigation.clone());

    println!("\n=== VOICE NAVIGATOR ===");
    println!("Say (type) what you want, e.g. \"change my gun to the laser\".");
    println!();
    println!("Commands:");
    println!("  :pulse   - Simulate speech activity");
    println!("  :status  - Show navigator status and recent changes");
    println!("  :tree    - Show the menu hierarchy");
    println!("  :cancel  - Cancel the running command");
    println!("  :quit    - Exit");
    println!();

    let ui = Arc::new(Mutex::new(NavigationUI::new()));
    let status_task = tokio::spawn(watch_status(navigator.clone(), ui.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => continue,
            ":quit" | ":q" => break,
            ":pulse" => navigator.recording_pulse(),
            ":cancel" => navigator.cancel(),
            ":status" => {
                println!("{:?}", navigator.status());
                println!("{:?}", demo.state());
                for entry in ui.lock().recent(10) {
                    println!("  {}", entry);
                }
            }
            ":tree" => print!("{}", demo.scene.read().outline()),
            utterance => {
                navigator.submit(utterance);
            }
        }
    }

    navigator.shutdown();
    // Let the last status change print before exiting
    tokio::time::sleep(Duration::from_millis(50)).await;
    status_task.abort();

    let state = demo.state();
    println!(
        "\nGoodbye! {} click(s), selected item: {}.",
        state.clicks.len(),
        state.selected_item.as_deref().unwrap_or("none")
    );
    Ok(())
}

/// Print the overlay line whenever the navigator status changes
async fn watch_status(navigator: Navigator, ui: Arc<Mutex<NavigationUI>>) {
    let mut rx = navigator.subscribe();
    while rx.changed().await.is_ok() {
        let status = rx.borrow_and_update().clone();
        let view = ui.lock().observe(&status);
        println!("{}", view.render());
    }
}
