use heart_maze::{format_elapsed, Difficulty, Direction, GameSession, MoveOutcome, SessionSnapshot};
use serde::Deserialize;
use heart_maze_core::path_to_moves;
use std::env;
use std::fs;
use std::time::Instant;

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "generate" => {
            if args.len() < 3 {
                eprintln!("Usage: {} generate <difficulty> [--seed <seed>] [output_file]", args[0]);
                std::process::exit(1);
            }

            let difficulty = parse_difficulty(&args[2]);
            let (seed, output_file_idx) = parse_seed_flag(&args, 3);
            let output_file = args.get(output_file_idx).map(|s| s.as_str());

            generate_command(difficulty, seed, output_file);
        }

        "solve" => {
            if args.len() < 5 || args[3] != "--seed" {
                eprintln!("Usage: {} solve <difficulty> --seed <seed>", args[0]);
                std::process::exit(1);
            }

            let difficulty = parse_difficulty(&args[2]);
            let seed = parse_seed(&args[4]);

            solve_command(difficulty, seed);
        }

        "verify-moves" => {
            if args.len() < 5 {
                eprintln!("Usage: {} verify-moves <difficulty> <seed> <moves_file>", args[0]);
                eprintln!("Error: Missing required arguments");
                std::process::exit(1);
            }

            let difficulty = parse_difficulty(&args[2]);
            let seed = parse_seed(&args[3]);

            verify_moves_command(difficulty, seed, &args[4]);
        }

        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  generate <difficulty> [--seed <seed>] [output_file]");
    eprintln!("      Generate a heart maze and save its snapshot");
    eprintln!("      - difficulty: easy (20x20) | medium (30x30) | hard (40x40)");
    eprintln!("      - --seed: Optional seed, random when omitted");
    eprintln!("      - output_file: Optional file to save the snapshot (JSON)");
    eprintln!("                     Defaults to: <seed>_heart_maze.json");
    eprintln!();
    eprintln!("  solve <difficulty> --seed <seed>");
    eprintln!("      Print the shortest route from the start to the heart");
    eprintln!();
    eprintln!("  verify-moves <difficulty> <seed> <moves_file>");
    eprintln!("      Replay a JSON array of moves and report whether it reaches the heart");
    eprintln!("      - moves: codes (0=north, 1=east, 2=south, 3=west) or names");
    eprintln!("               (\"north\", \"up\", \"w\", ...)");
    eprintln!();
    eprintln!("Example workflow:");
    eprintln!("  1. Generate maze: {} generate easy --seed 2918957128", program);
    eprintln!("     (saves to 2918957128_heart_maze.json)");
    eprintln!("  2. Solve it:      {} solve easy --seed 2918957128", program);
    eprintln!("  3. Check a run:   {} verify-moves easy 2918957128 moves.json", program);
}

fn parse_difficulty(arg: &str) -> Difficulty {
    arg.parse().unwrap_or_else(|e| {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    })
}

fn parse_seed(arg: &str) -> u32 {
    arg.parse().unwrap_or_else(|_| {
        eprintln!("❌ Error: Invalid seed '{}'. Must be a non-negative 32-bit integer.", arg);
        std::process::exit(1);
    })
}

/// Optional `--seed <n>` at `idx`; returns the seed and the index of the next argument
fn parse_seed_flag(args: &[String], idx: usize) -> (Option<u32>, usize) {
    if args.len() > idx && args[idx] == "--seed" {
        if args.len() < idx + 2 {
            eprintln!("❌ Error: --seed requires a value");
            std::process::exit(1);
        }
        (Some(parse_seed(&args[idx + 1])), idx + 2)
    } else {
        (None, idx)
    }
}

fn new_session(difficulty: Difficulty, seed: Option<u32>) -> GameSession {
    let result = match seed {
        Some(seed) => GameSession::new(difficulty, seed),
        None => GameSession::new_random(difficulty),
    };
    result.unwrap_or_else(|e| {
        eprintln!("❌ Error creating maze: {}", e);
        std::process::exit(1);
    })
}

fn generate_command(difficulty: Difficulty, seed: Option<u32>, output_file: Option<&str>) {
    println!("📋 Generating heart maze");
    println!("  Difficulty: {}", difficulty);
    println!();

    let start = Instant::now();
    let session = new_session(difficulty, seed);
    let duration = start.elapsed();

    println!("✅ Maze generated in {:.2}ms", duration.as_secs_f64() * 1000.0);
    println!("  Seed: {}", session.seed());
    println!("  Grid: {}x{} cells ({} px each)", session.size(), session.size(), session.cell_size());
    println!("  Start: ({}, {})", session.player().x, session.player().y);
    println!("  Goal: ({}, {})", session.goal().x, session.goal().y);
    println!("  Shortest route: {} moves", session.solution().len());
    println!();

    let default_filename = format!("{}_heart_maze.json", session.seed());
    let file_to_save = output_file.unwrap_or(&default_filename);

    match save_snapshot(&session.snapshot(), file_to_save) {
        Ok(_) => println!("💾 Maze saved to: {}", file_to_save),
        Err(e) => {
            eprintln!("❌ Error saving maze: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_command(difficulty: Difficulty, seed: u32) {
    let session = new_session(difficulty, Some(seed));
    let solution = session.solution();

    if solution.is_empty() {
        eprintln!("❌ The heart cannot be reached from the start in this maze");
        std::process::exit(1);
    }

    let moves = path_to_moves(session.player(), solution);
    let codes: Vec<u8> = moves.iter().map(|&dir| dir.into()).collect();

    println!("🧭 Route from ({}, {}) to ({}, {}): {} moves",
             session.player().x,
             session.player().y,
             session.goal().x,
             session.goal().y,
             moves.len());
    println!("  Directions: {}", moves.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(" "));
    println!("  Codes: {:?}", codes);
}

fn verify_moves_command(difficulty: Difficulty, seed: u32, moves_file: &str) {
    let moves = match load_moves(moves_file) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ Error loading moves: {}", e);
            std::process::exit(1);
        }
    };

    println!("📦 Loaded {} moves", moves.len());

    let mut session = new_session(difficulty, Some(seed));

    match session.replay(&moves) {
        MoveOutcome::Won => {
            println!("✅ The heart was reached in {} moves ({})", session.moves(), format_elapsed(session.elapsed()));
        }
        MoveOutcome::Rejected => {
            println!("✗ Move {} is blocked at ({}, {})",
                     session.moves() + 1,
                     session.player().x,
                     session.player().y);
            std::process::exit(1);
        }
        _ => {
            println!("✗ The moves do not reach the heart (stopped at ({}, {}))", session.player().x, session.player().y);
            std::process::exit(1);
        }
    }
}

fn save_snapshot(snapshot: &SessionSnapshot, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

fn load_moves(path: &str) -> Result<Vec<Direction>, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;

    // Validate file size (prevent loading gigabytes into memory)
    if json.len() > 10_000_000 {  // 10MB limit
        return Err("Moves file is too large (max 10MB)".into());
    }

    let entries: Vec<MoveEntry> = serde_json::from_str(&json)?;

    if entries.is_empty() {
        return Err("Moves array is empty".into());
    }

    entries
        .into_iter()
        .map(|entry| -> Result<Direction, Box<dyn std::error::Error>> {
            let dir = match entry {
                MoveEntry::Code(code) => Direction::try_from(code)
                    .map_err(|bad| format!("Invalid move code {} (expected 0-3)", bad))?,
                MoveEntry::Name(name) => name.parse::<Direction>()?,
            };
            Ok(dir)
        })
        .collect()
}

/// One element of a moves file: a wire code or a direction/key name
#[derive(Deserialize)]
#[serde(untagged)]
enum MoveEntry {
    Code(u8),
    Name(String),
}
