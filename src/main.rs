//! animal-guess shell
//!
//! Terminal front end for the guessing engine.
//!
//! Run with: cargo run -- [path/to/animals.pl]

use animal_guess::{
    load_knowledge, DirectoryImageResolver, Engine, ImageResolver, KnowledgeBase, Outcome,
    ShellConfig,
};
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args: Vec<String> = std::env::args().collect();
    let config = ShellConfig::from_args(&args);

    let kb = load_knowledge(&config.facts_path)
        .with_context(|| format!("Failed to load knowledge from {:?}", config.facts_path))?;
    tracing::info!(
        animals = kb.len(),
        images = %config.images_dir.display(),
        "knowledge ready"
    );

    run_cli_mode(&kb, &config).await
}

async fn run_cli_mode(kb: &KnowledgeBase, config: &ShellConfig) -> Result<()> {
    let engine = Engine::with_config(kb, config.engine.clone());
    let resolver = DirectoryImageResolver::new(&config.images_dir);

    println!("Animal Guess");
    println!("============");
    println!(
        "{} animals loaded from {}. Type 'help' for commands.\n",
        kb.len(),
        config.facts_path.display()
    );

    loop {
        let Some(line) = read_line("> ")? else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        let (cmd, arg) = match line.split_once(' ') {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line.as_str(), ""),
        };

        match cmd {
            _ if is_quit(cmd) => break,
            "list" => {
                for name in kb.animals_sorted() {
                    println!("  {}", name);
                }
            }
            "info" => {
                if arg.is_empty() {
                    println!("Usage: info <animal>");
                    continue;
                }
                match kb.profile(arg) {
                    Ok(profile) => println!("{}", profile),
                    Err(e) => println!("{}", e),
                }
            }
            "play" => {
                let chosen = (!arg.is_empty()).then_some(arg);
                play(&engine, &resolver, config, chosen).await?;
            }
            "dump" => {
                println!("{}", serde_json::to_string_pretty(kb)?);
            }
            "help" => {
                println!("Commands:");
                println!("  list              List known animals");
                println!("  info <animal>     Show what is known about an animal");
                println!("  play [animal]     Start a game (optionally showing an animal's info)");
                println!("  dump              Print the knowledge base as JSON");
                println!("  help              Show this help");
                println!("  quit              Exit");
            }
            _ => {
                println!("Unknown command: {}. Try help", cmd);
            }
        }
    }

    Ok(())
}

async fn play(
    engine: &Engine<'_>,
    resolver: &impl ImageResolver,
    config: &ShellConfig,
    chosen: Option<&str>,
) -> Result<()> {
    let mut session = match engine.start_session(chosen) {
        Ok(session) => session,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };

    if let Some(subject) = session.subject() {
        println!("{}\n", engine.knowledge().profile(subject)?);
    }

    while !session.is_finished() {
        let prompt = engine.current_prompt(&session);
        if !prompt.expects_answer() {
            break;
        }
        let Some(line) = read_line(&format!("{} [y/n] ", prompt.text))? else {
            return Ok(());
        };

        match parse_answer(&line) {
            Some(yes) => session = engine.answer(session, yes),
            None if is_quit(&line) => {
                println!("Game abandoned.");
                return Ok(());
            }
            None => {
                println!("Please answer yes or no.");
                continue;
            }
        }

        if !session.is_finished() {
            tokio::time::sleep(config.question_delay).await;
        }
    }

    println!("{}", engine.current_prompt(&session).text);
    if let Some(Outcome::Success { animal }) = session.outcome() {
        if let Some(path) = resolver.resolve(animal) {
            println!("Picture: {}", path.display());
        }
    }
    println!();

    Ok(())
}

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn read_line(prompt: &str) -> Result<Option<String>> {
    let mut stdout = io::stdout();
    print!("{}", prompt);
    stdout.flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_quit(input: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit")
}

fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "s" | "si" | "sí" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
