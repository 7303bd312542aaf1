//! Plays one round in the terminal, passing "the device" by pressing Enter.
//!
//! ```text
//! pass-and-play [PLAYERS] [SPIES] [MINUTES] [--word WORD] [CATEGORY...]
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to watch timers and transitions.

use spyglass::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

const WORDS: &str = include_str!("../words.json");

type Input = Lines<BufReader<Stdin>>;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<GameSettings, String> {
    let mut settings = GameSettings::default();
    let mut numbers = Vec::new();
    let mut categories = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--word" {
            let word = args.next().ok_or("--word needs a value")?;
            settings.custom_word = Some(word);
        } else if let Ok(n) = arg.parse::<u32>() {
            numbers.push(n);
        } else {
            categories.push(arg);
        }
    }

    match numbers.as_slice() {
        [] => {}
        [players] => settings.player_count = *players as usize,
        [players, spies] => {
            settings.player_count = *players as usize;
            settings.spy_count = *spies as usize;
        }
        [players, spies, minutes] => {
            settings.player_count = *players as usize;
            settings.spy_count = *spies as usize;
            if !DISCUSSION_TIMER_PRESETS_MINUTES.contains(minutes) {
                tracing::warn!(minutes, "not one of the usual timer presets");
            }
            settings.timer_seconds = minutes.checked_mul(60).ok_or("MINUTES is too large")?;
        }
        _ => return Err("expected at most three numbers: players, spies, minutes".into()),
    }

    if !categories.is_empty() {
        settings.categories = CategorySelection::from_keys(categories);
    }
    Ok(settings)
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

/// Waits for Enter. Returns `false` on end of input.
async fn wait_enter(input: &mut Input) -> std::io::Result<bool> {
    Ok(input.next_line().await?.is_some())
}

fn show_card(card: &RoleCard) {
    match card {
        RoleCard::Civilian { word, category } => {
            println!("  You are a CIVILIAN. The word is \"{word}\" ({category}).");
        }
        RoleCard::Spy {
            category: Some(category),
        } => println!("  You are the SPY. The category is {category}."),
        RoleCard::Spy { category: None } => println!("  You are the SPY."),
    }
}

fn show_result(session: &Session) {
    println!(
        "\nThe word was \"{}\" ({}).",
        session.secret_word(),
        session.category()
    );
    let spies: Vec<&str> = session.spies().map(|p| p.display_name.as_str()).collect();
    println!("Spies: {}", spies.join(", "));
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

async fn play(game: &GameHandle, input: &mut Input) -> Result<(), Box<dyn std::error::Error>> {
    let mut snapshots = game.subscribe();

    loop {
        let snap = game.latest();
        match snap.phase {
            Phase::Setup => return Ok(()),
            Phase::PlayerTransition => {
                if let Some(player) = &snap.current_player {
                    println!(
                        "\nPass the device to {}. Press Enter when they have it.",
                        player.display_name
                    );
                }
                if !wait_enter(input).await? {
                    break;
                }
                game.ready().await?;
            }
            Phase::Reveal => {
                if let Some(card) = &snap.role_card {
                    show_card(card);
                }
                snapshots.wait_for(|s| s.reveal_gate.is_finished).await?;
                println!("  Press Enter to hide your role and pass on.");
                if !wait_enter(input).await? {
                    break;
                }
                // Scroll the card off screen before the next player looks.
                println!("{}", "\n".repeat(40));
                game.hide_and_pass().await?;
            }
            Phase::DiscussionTimer => {
                println!("Everyone has seen their role. Discuss!");
                let mut last_shown = None;
                snapshots
                    .wait_for(|s| {
                        let remaining = s.discussion.remaining_seconds;
                        if last_shown != Some(remaining) && (remaining % 10 == 0 || remaining <= 5) {
                            println!("  {}", s.discussion.clock());
                            last_shown = Some(remaining);
                        }
                        s.discussion_stage == Some(DiscussionStage::TimesUp)
                    })
                    .await?;

                println!("Time's up! Press Enter to reveal the spies.");
                wait_enter(input).await?;
                if let Some(session) = &game.latest().session {
                    show_result(session);
                }
                game.acknowledge_times_up().await?;
            }
        }
    }

    // Input closed mid-round.
    game.abandon_session().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = parse_args(std::env::args().skip(1))?;
    let game = SpyglassBuilder::new().catalog_json(WORDS)?.spawn()?;

    game.start_game(settings).await?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    play(&game, &mut input).await?;

    game.shutdown().await?;
    Ok(())
}
