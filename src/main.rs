//! Hiddengrove - Entry Point
//!
//! A minimal interactive driver standing in for the excluded presentation
//! layer: lists levels, starts them, and reports finds over stdin/stdout.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;

use hiddengrove::content::LevelCatalog;
use hiddengrove::game::SessionController;
use hiddengrove::progress::{FindOutcome, LevelProgressStore, ProgressEngine, ProgressEvent};
use hiddengrove::save::FilePrefs;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Hiddengrove v{}", env!("CARGO_PKG_VERSION"));

    let catalog = LevelCatalog::load(Path::new("assets"));
    let store = LevelProgressStore::new(Box::new(FilePrefs::open_default()));
    let mut controller = SessionController::new(catalog, ProgressEngine::new(store));

    if let Some(level_id) = controller.bootstrap() {
        println!("Welcome! Starting your first level: {}", level_id);
        print_goals(&controller);
    } else {
        print_levels(&controller);
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(c) => c,
            None => continue,
        };
        let arg = parts.next();

        match (command, arg) {
            ("levels", _) => print_levels(&controller),
            ("play", Some(id)) => match controller.start_level(id) {
                Ok(()) => {
                    println!("Now playing '{}'", id);
                    print_goals(&controller);
                }
                Err(e) => println!("Cannot play: {}", e),
            },
            ("find", Some(item)) => match controller.record_find(item) {
                Ok(FindOutcome::AlreadyFound) => println!("Already found that one."),
                Ok(FindOutcome::Found { .. }) => print_events(&mut controller),
                Err(e) => println!("No luck: {}", e),
            },
            ("goals", _) => print_goals(&controller),
            ("resume", _) => match controller.resume() {
                Some(id) => {
                    println!("Resumed '{}'", id);
                    print_goals(&controller);
                }
                None => println!("Nothing to resume."),
            },
            ("menu", _) => {
                controller.return_to_menu();
                print_levels(&controller);
            }
            ("quit", _) | ("exit", _) => break,
            _ => {
                println!("Commands: levels, play <id>, find <item>, goals, resume, menu, quit")
            }
        }
    }

    log::info!("Hiddengrove shut down cleanly");
    Ok(())
}

fn print_levels(controller: &SessionController) {
    println!("Levels:");
    for overview in controller.overviews() {
        let state = if overview.completed {
            format!("completed, {} stars", overview.stars)
        } else if overview.unlocked {
            format!("{}/{} found", overview.found, overview.total)
        } else {
            "locked".to_string()
        };
        println!("  {:<12} {}", overview.level_id, state);
    }
}

fn print_goals(controller: &SessionController) {
    let session = match controller.active() {
        Some(s) => s,
        None => {
            println!("No level in play.");
            return;
        }
    };
    println!("Goals for '{}':", session.level().level_id);
    for group in &session.level().groups {
        println!(
            "  {:<12} {}/{}",
            group.group_id,
            session.group_found(&group.group_id),
            group.total_items()
        );
        for item in &group.items {
            let mark = if session.found_items().contains(&item.item_id) {
                "x"
            } else {
                " "
            };
            println!("    [{}] {}", mark, item.item_id);
        }
    }
}

fn print_events(controller: &mut SessionController) {
    for event in controller.drain_events() {
        match event {
            ProgressEvent::ItemFound {
                group_id,
                item_id,
                group_found,
                group_total,
                ..
            } => println!(
                "Found {}! ({} {}/{})",
                item_id, group_id, group_found, group_total
            ),
            ProgressEvent::LevelCompleted {
                level_id,
                stars,
                coins_awarded,
                elapsed_secs,
            } => println!(
                "Level '{}' complete in {:.0}s! {} stars, +{} coins",
                level_id, elapsed_secs, stars, coins_awarded
            ),
        }
    }
}
