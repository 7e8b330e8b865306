use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use crossterm::terminal;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

use trip_board::events::{self, input, keyboard};
use trip_board::{
    dom, logging, markup, mount_page, BoardConfig, BoardMounts, ContentPresenter, KeyboardEvent,
    PointMode, PointsModel, Result,
};

#[derive(Parser, Debug)]
#[command(name = "trip-board", version, about = "Travel itinerary board with inline waypoint editing")]
struct Cli {
    /// Board configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of mock waypoints to generate
    #[arg(long, default_value_t = 8)]
    points: usize,

    /// Seed for the mock generator
    #[arg(long)]
    seed: Option<u64>,

    /// Run whitespace-separated commands instead of reading the keyboard,
    /// e.g. "0 s 2 esc m", then print the document
    #[arg(long)]
    script: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Open the editor of the n-th revealed point
    Edit(usize),
    /// Submit every open form
    Submit,
    /// Press the cancel key
    Cancel,
    /// Reveal more points
    More,
    Quit,
}

impl Command {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "s" => Some(Self::Submit),
            "esc" | "Esc" | "Escape" => Some(Self::Cancel),
            "m" => Some(Self::More),
            "q" => Some(Self::Quit),
            _ => token.parse().ok().map(Self::Edit),
        }
    }
}

struct Board {
    presenter: ContentPresenter,
    mounts: BoardMounts,
    model: Rc<PointsModel>,
    cancel_key: String,
}

impl Board {
    /// Apply one command. Returns false on quit.
    fn apply(&self, command: Command) -> bool {
        debug!(?command, "command");
        match command {
            Command::Edit(index) => self.edit(index),
            Command::Submit => self.submit_open_forms(),
            Command::Cancel => {
                keyboard::dispatch(KeyboardEvent::new(self.cancel_key.clone()));
            }
            Command::More => {
                events::click(self.mounts.new_event_button);
            }
            Command::Quit => return false,
        }
        true
    }

    fn edit(&self, index: usize) {
        let ids = self.presenter.revealed_ids();
        let Some(id) = ids.get(index) else {
            warn!(index, revealed = ids.len(), "no such point");
            return;
        };
        let button = self
            .presenter
            .point_node(id)
            .and_then(|node| dom::query_class(node, "event__rollup-btn"));
        if let Some(button) = button {
            events::click(button);
        }
    }

    fn submit_open_forms(&self) {
        let forms: Vec<_> = self
            .presenter
            .revealed_ids()
            .iter()
            .filter(|id| self.presenter.point_mode(id) == Some(PointMode::Editing))
            .filter_map(|id| self.presenter.point_node(id))
            .filter_map(|node| dom::query_tag(node, "form"))
            .collect();
        for form in forms {
            events::submit(form);
        }
    }

    fn outline(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{}/{} points, {} open editor(s)",
            self.presenter.revealed_count(),
            self.presenter.total(),
            self.presenter.open_editors()
        )];

        for (index, id) in self.presenter.revealed_ids().iter().enumerate() {
            let marker = match self.presenter.point_mode(id) {
                Some(PointMode::Editing) => "edit",
                _ => "    ",
            };
            let title = self
                .model
                .points()
                .iter()
                .find(|point| &point.id == id)
                .map(|point| format!("{} {}", point.event_type.label(), point.destination.name))
                .unwrap_or_default();
            lines.push(format!("[{index}] {marker} {title}"));
        }
        lines
    }
}

fn run_script(board: &Board, script: &str) -> Result<()> {
    for token in script.split_whitespace() {
        match Command::parse(token) {
            Some(command) => {
                if !board.apply(command) {
                    break;
                }
            }
            None => warn!(token, "unknown command"),
        }
    }

    for line in board.outline() {
        info!("{line}");
    }
    println!("{}", markup::serialize(dom::root()));
    Ok(())
}

/// Restores the terminal when dropped.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn print_outline(board: &Board) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "\r\n")?;
    for line in board.outline() {
        write!(stdout, "{line}\r\n")?;
    }
    write!(stdout, "digits: edit  s: submit  esc: cancel  m: more  q: quit\r\n")?;
    stdout.flush()
}

fn run_interactive(board: &Board) -> Result<()> {
    let _raw = RawMode::enable()?;
    print_outline(board)?;

    loop {
        let Some(event) = input::poll_key(Duration::from_millis(250))? else {
            continue;
        };
        if !event.is_press() {
            continue;
        }

        // Cancel keys reach the edit sessions through the keyboard registry
        let consumed = keyboard::dispatch(event.clone());
        let command = match event.key.as_str() {
            key if key == board.cancel_key => None,
            key => Command::parse(key),
        };

        if let Some(command) = command {
            if !board.apply(command) {
                break;
            }
        } else if !consumed && !event.is_escape() {
            continue;
        }
        print_outline(board)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => BoardConfig::load(path)?,
        None => BoardConfig::default(),
    };
    let cancel_key = config
        .cancel_keys
        .first()
        .cloned()
        .unwrap_or_else(|| "Escape".to_string());

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let model = Rc::new(PointsModel::with_mock(cli.points, &mut rng, Utc::now()));

    let mounts = mount_page()?;
    let presenter = ContentPresenter::new(mounts, model.clone(), config);
    presenter.init()?;

    let board = Board {
        presenter,
        mounts,
        model,
        cancel_key,
    };

    match cli.script.as_deref() {
        Some(script) => run_script(&board, script),
        None => run_interactive(&board),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    info!("Starting trip-board");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "trip-board failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
