use bunki::prelude::*;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Plays a branching scenario in the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the scenario JSON file
    scenario_path: Option<String>,

    /// Choice ids to take in order, e.g. `-c agree -c accept_offer`
    #[arg(short, long = "choice")]
    choices: Vec<String>,

    /// Pause before logic gates transition, in milliseconds
    #[arg(long)]
    gate_delay: Option<u64>,

    /// Wait out action and gate delays in real time instead of skipping them
    #[arg(long)]
    realtime: bool,

    /// Print every scenario event as JSON
    #[arg(long)]
    events: bool,

    /// Run in interactive mode to be prompted for choices
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bunki=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let scenario_path = match (&cli.scenario_path, cli.human) {
        (Some(path), _) => path.clone(),
        (None, true) => prompt_for_input("Enter scenario path", Some("demos/trust.json"))
            .unwrap_or_else(|| exit_with_error("No more input")),
        (None, false) => exit_with_error("Scenario path is required in non-interactive mode."),
    };

    let load_start = Instant::now();
    let graph = ScenarioLoader::new()
        .load_file(&scenario_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load scenario: {}", e)));
    let load_duration = load_start.elapsed();

    for dangling in graph.dangling_targets() {
        eprintln!(
            "Warning: node '{}' targets '{}', which is not declared",
            dangling.source_node_id, dangling.target_node_id
        );
    }

    let mut sinks: Vec<Box<dyn EventSink>> = vec![Box::new(TracingSink)];
    if cli.events {
        sinks.push(Box::new(FnSink(|event: &ScenarioEvent| {
            match serde_json::to_string(event) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Could not serialize event: {}", e),
            }
        })));
    }
    let mut builder = PlaybackController::builder(graph).with_sink(sinks);
    if let Some(delay) = cli.gate_delay {
        builder = builder.with_logic_gate_delay(delay);
    }
    let mut controller = builder.build();

    println!("Loaded '{}' in {:?}", scenario_path, load_duration);
    let status = controller
        .start()
        .unwrap_or_else(|e| exit_with_error(&format!("Could not start scenario: {}", e)));
    print_intro(&controller);
    let mut status = settle(&mut controller, status, cli.realtime);

    let mut scripted = cli.choices.into_iter();
    loop {
        match status {
            PlaybackStatus::AwaitingChoice { .. } => {
                print_dialogue(&controller);
                let choice_id = if cli.human {
                    match prompt_for_choice(&controller) {
                        Some(choice_id) => choice_id,
                        None => {
                            println!("\nNo choice to take; stopping here.");
                            controller.stop();
                            break;
                        }
                    }
                } else {
                    match scripted.next() {
                        Some(choice_id) => choice_id,
                        None => {
                            println!("\nNo more scripted choices; stopping here.");
                            controller.stop();
                            break;
                        }
                    }
                };
                status = match controller.make_choice(&choice_id) {
                    Ok(next) => settle(&mut controller, next, cli.realtime),
                    Err(PlaybackError::InvalidChoice(e)) => {
                        println!("  !! {}", e);
                        if !cli.human {
                            exit_with_error("Scripted choice was rejected.");
                        }
                        controller.status()
                    }
                    Err(e) => {
                        println!("  !! {}", e);
                        controller.status()
                    }
                };
            }
            PlaybackStatus::Completed(outcome) => {
                println!("\n{}", TraceFormatter::format_outcome(&outcome));
                break;
            }
            PlaybackStatus::Halted { node_id } => {
                let reason = controller
                    .halt_reason()
                    .map_or("unknown".to_string(), |e| e.to_string());
                println!("\nScenario halted at '{}': {}", node_id, reason);
                println!(
                    "Path: {}",
                    TraceFormatter::format_path(controller.history().as_slice())
                );
                break;
            }
            PlaybackStatus::Pending { .. } => {
                status = settle(&mut controller, status, cli.realtime);
            }
            PlaybackStatus::Idle | PlaybackStatus::Stopped { .. } => break,
        }
    }
}

/// Lets armed transitions fire, either instantly or after the real delay.
fn settle(
    controller: &mut PlaybackController,
    status: PlaybackStatus,
    realtime: bool,
) -> PlaybackStatus {
    let mut status = status;
    while let PlaybackStatus::Pending { due_in_ms, .. } = status {
        if realtime {
            std::thread::sleep(Duration::from_millis(due_in_ms));
        }
        status = match controller.advance(due_in_ms) {
            Ok(next) => next,
            Err(e) => {
                println!("  !! {}", e);
                controller.status()
            }
        };
    }
    status
}

fn print_intro(controller: &PlaybackController) {
    let start = controller.graph().node(controller.graph().start_node_id());
    if let Some(NodeData::Start(data)) = start.map(|node| &node.data) {
        if !data.intro_text.is_empty() {
            println!("\n{}", data.intro_text);
        }
    }
}

fn print_dialogue(controller: &PlaybackController) {
    if let Some(NodeData::Dialogue(dialogue)) = controller.current_node().map(|node| &node.data) {
        println!("\n{}: {}", dialogue.character_name, dialogue.text);
        for (index, choice) in controller.available_choices().iter().enumerate() {
            println!("  {}: {} [{}]", index + 1, choice.label, choice.id);
        }
    }
}

/// Prompts until the player names a choice by number or id.
///
/// Returns `None` when the dialogue offers no choices or input runs out.
fn prompt_for_choice(controller: &PlaybackController) -> Option<String> {
    let choices = controller.available_choices();
    if choices.is_empty() {
        return None;
    }
    loop {
        let input = prompt_for_input("Your choice", None)?;
        if let Some(choice_id) = resolve_choice(&input, choices) {
            return Some(choice_id);
        }
        println!("Invalid choice. Enter a number between 1 and {}.", choices.len());
    }
}

/// Matches player input against a 1-based choice number or a choice id.
fn resolve_choice(input: &str, choices: &[Choice]) -> Option<String> {
    if let Ok(number) = input.parse::<usize>() {
        if let Some(choice) = number.checked_sub(1).and_then(|i| choices.get(i)) {
            return Some(choice.id.clone());
        }
    }
    choices
        .iter()
        .find(|choice| choice.id == input)
        .map(|choice| choice.id.clone())
}

/// A helper function to prompt the user and read a line of input.
///
/// Returns `None` once stdin is closed.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> Option<String> {
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to write prompt: {}", e));
    }
    let trimmed = read_input(&mut io::stdin().lock())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read line: {}", e)))?;

    if trimmed.is_empty() {
        Some(default.unwrap_or("").to_string())
    } else {
        Some(trimmed)
    }
}

/// Reads one trimmed line, or `None` at end of input.
fn read_input(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    match reader.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line.trim().to_string())),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
