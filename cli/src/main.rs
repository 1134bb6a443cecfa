use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use minelayer_core::{CellCount, Coord, GameConfig, Session, StepEvent};

mod command;
mod render;
mod settings;
mod storage;

use command::Command;
use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "minelayer", version, about = "Lay the mines, watch the enemy sweep", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML settings file with [board] and [enemy] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the board and the enemy
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board width
    #[arg(long)]
    width: Option<Coord>,

    /// Board height
    #[arg(long)]
    height: Option<Coord>,

    /// Mines laid before the first turn
    #[arg(long)]
    mines: Option<CellCount>,

    /// Cap on the total number of mines
    #[arg(long)]
    target: Option<CellCount>,

    /// Enemy starting health
    #[arg(long)]
    health: Option<i32>,

    /// Health the enemy loses per mine
    #[arg(long)]
    damage: Option<i32>,

    /// Continue a saved game instead of starting a new one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Where `s` writes the game
    #[arg(long, default_value = storage::DEFAULT_SAVE_PATH)]
    save_path: PathBuf,

    /// Show where the mines are
    #[arg(long)]
    show_mines: bool,
}

impl Args {
    /// Built-in defaults, then the settings file, then command line flags.
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = GameConfig::default();
        if let Some(path) = &self.config {
            Settings::load(path)?.apply(&mut config);
        }

        let overrides = Settings {
            seed: self.seed,
            board: settings::BoardSettings {
                width: self.width,
                height: self.height,
                mines: self.mines,
                target: self.target,
            },
            enemy: settings::EnemySettings {
                health: self.health,
                damage: self.damage,
            },
        };
        overrides.apply(&mut config);

        config.validate().context("invalid game settings")?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.game_config()?;
    log::debug!("config: {:?}", config);

    let mut session = match &args.load {
        Some(path) => Session::resume(storage::load(path)?, config.rules()),
        None => Session::new(&config).context("could not create a board")?,
    };

    println!(
        "Minelayer {}x{}, seed {}. Type 'h' for help.",
        session.state().width(),
        session.state().height(),
        session.state().seed()
    );
    println!("{}", command::help_text());

    // a loaded game may stop mid-turn
    for event in session.run_until_input() {
        print_event(&event);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("\n{}", render::hud(session.state()));
        println!("{}", render::board(session.state(), args.show_mines));
        if session.state().is_over() {
            println!("{}", render::outcome_line(session.state().outcome()));
            println!("Final board:\n{}", render::board(session.state(), true));
            break;
        }

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("could not read input")?;

        let command = match command::parse(&line) {
            Ok(command) => command,
            Err(command::CommandError::Empty) => continue,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        match command {
            Command::Help => println!("{}", command::help_text()),
            Command::Save => match storage::save(&args.save_path, session.state()) {
                Ok(()) => println!("Saved to {}", args.save_path.display()),
                Err(err) => {
                    log::error!("Could not save game: {:?}", err);
                    println!("Could not save: {:#}", err);
                }
            },
            Command::Quit => {
                session.step(command.intent());
                break;
            }
            Command::Place(pos) => {
                for event in session.play_round(pos) {
                    print_event(&event);
                }
            }
        }
    }

    Ok(())
}

fn print_event(event: &StepEvent) {
    log::trace!("{:?}", event);
    if let Some(line) = render::event(event) {
        println!("{}", line);
    }
}
