mod app;
mod commands;
mod domain;
mod focus;
mod input;
mod notifications;
mod persistence;
mod provider;
mod ticker;
mod ui;

use anyhow::Result;
use app::AppState;
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::TaskDraft;
use focus::FocusPanel;
use input::FocusCommand;
use persistence::{
    ensure_data_dir, init_local_data_dir, load_settings, log_file, save_settings, settings_file, store_file,
    Settings, TaskStore,
};
use provider::{JsonFileProvider, TaskProvider};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use ticker::{poll_duration, Periodic};

#[derive(Parser)]
#[command(name = "dayfocus")]
#[command(about = "A terminal day planner with a focus timer for the task at hand", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .dayfocus directory in the current directory
    Init,
    /// Add a task
    Add {
        title: String,
        /// Start time (HH:MM)
        start: String,
        /// End time (HH:MM); earlier than start means it ends the next day
        end: String,
        /// Day of the task (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(short, long, default_value_t = 0)]
        priority: u8,
    },
    /// List the tasks of a day
    List {
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Toggle the done flag of a task (position as shown by `list`)
    Done {
        position: usize,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Remove a task (position as shown by `list`)
    Remove {
        position: usize,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Drop days older than the configured history
    Prune {
        /// Days to keep. Defaults to the `days_to_keep` setting.
        #[arg(long)]
        days: Option<i64>,
    },
    /// Print the active task and its remaining time
    Now {
        /// Read tasks from this file instead of the store
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
    /// Overwrite days of the store with tasks produced elsewhere
    Import {
        /// JSON file holding a task array or a date-keyed object
        file: PathBuf,
        /// Day a task array belongs to (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Run the focus timer on its own
    Focus {
        /// Task file to follow. Defaults to `synced_file`, then the store.
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        return init();
    }

    let dir = ensure_data_dir()?;
    init_logging(&dir);
    let settings = load_settings(settings_file(&dir))?;

    match cli.command {
        Some(command) => run_command(command, &dir, &settings),
        None => run_tui(&dir, settings),
    }
}

fn init() -> Result<()> {
    let dir = init_local_data_dir()?;
    save_settings(settings_file(&dir), &Settings::default())?;
    println!("Initialized dayfocus directory: {}", dir.display());
    println!();
    println!("dayfocus will now use this local directory for task storage.");
    println!("Run 'dayfocus' to start planning.");
    Ok(())
}

fn run_command(command: Commands, dir: &Path, settings: &Settings) -> Result<()> {
    let today = Local::now().date_naive();

    match command {
        Commands::Init => init(),
        Commands::Add {
            title,
            start,
            end,
            date,
            description,
            priority,
        } => {
            let date = commands::parse_date_arg(date.as_deref(), today)?;
            let draft = TaskDraft {
                title,
                time: start,
                to: end,
                description,
                priority,
            };
            let mut store = TaskStore::load(store_file(dir));
            println!("{}", commands::add(&mut store, date, &draft)?);
            Ok(())
        }
        Commands::List { date } => {
            let date = commands::parse_date_arg(date.as_deref(), today)?;
            print!("{}", commands::list(&TaskStore::load(store_file(dir)), date));
            Ok(())
        }
        Commands::Done { position, date } => {
            let date = commands::parse_date_arg(date.as_deref(), today)?;
            let mut store = TaskStore::load(store_file(dir));
            println!("{}", commands::toggle_done(&mut store, date, position)?);
            Ok(())
        }
        Commands::Remove { position, date } => {
            let date = commands::parse_date_arg(date.as_deref(), today)?;
            let mut store = TaskStore::load(store_file(dir));
            println!("{}", commands::remove(&mut store, date, position)?);
            Ok(())
        }
        Commands::Prune { days } => {
            let mut store = TaskStore::load(store_file(dir));
            let days = days.unwrap_or(settings.days_to_keep);
            println!("{}", commands::prune(&mut store, today, days)?);
            Ok(())
        }
        Commands::Now { source } => {
            let provider = JsonFileProvider::open(source.unwrap_or_else(|| store_file(dir)));
            println!("{}", commands::now(&provider, Local::now().naive_local()));
            Ok(())
        }
        Commands::Import { file, date } => {
            let date = commands::parse_date_arg(date.as_deref(), today)?;
            let content = persistence::read_file(&file)?;
            let mut store = TaskStore::load(store_file(dir));
            println!("{}", commands::import(&mut store, &content, date)?);
            Ok(())
        }
        Commands::Focus { source } => {
            let source = source
                .or_else(|| settings.synced_file.clone())
                .unwrap_or_else(|| store_file(dir));
            let mut provider = JsonFileProvider::open(source);
            run_focus(&mut provider, settings)
        }
    }
}

/// Send log records to the data directory's log file; RUST_LOG overrides the default level
fn init_logging(dir: &Path) {
    let path = log_file(dir);
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: logging disabled, cannot open {}: {}", path.display(), err);
            return;
        }
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

type Term = Terminal<CrosstermBackend<io::Stdout>>;

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_tui(dir: &Path, settings: Settings) -> Result<()> {
    let store = TaskStore::load(store_file(dir));
    let mut app = AppState::new(store, settings, Instant::now(), Local::now().naive_local());
    log::info!("Started with data directory {}", dir.display());

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    // Save on exit
    if let Err(e) = app.save() {
        eprintln!("Error saving tasks: {}", e);
    }

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Term, app: &mut AppState) -> Result<()> {
    let poll = poll_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout so timers keep running
        if event::poll(poll)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        let events = app.on_timers(Instant::now(), Local::now().naive_local());
        if let Some(title) = events.started {
            app.status = Some(format!(" Started: {}", title));
        }
        if let Some(title) = events.finished {
            app.status = Some(format!(" Time's up: {}", title));
        }

        // Autosave if needed
        if app.needs_save {
            app.save()?;
        }
    }
}

/// Standalone focus timer following a task file
fn run_focus(provider: &mut dyn TaskProvider, settings: &Settings) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = focus_loop(&mut terminal, provider, settings.recheck_interval_secs);
    restore_terminal(&mut terminal)?;
    result
}

fn focus_loop(terminal: &mut Term, provider: &mut dyn TaskProvider, recheck_secs: u64) -> Result<()> {
    let poll = poll_duration();
    let now = Instant::now();
    let mut panel = FocusPanel::open(&*provider, recheck_secs, now, Local::now().naive_local());
    // Reload the file just before each re-check
    let mut reload = Periodic::every_secs(recheck_secs, now);
    let source = provider.describe();
    match provider.todays_tasks() {
        Ok(tasks) => log::info!("Following {} ({} task(s) today)", source, tasks.len()),
        Err(err) => log::warn!("Could not read today's tasks from {}: {:#}", source, err),
    }

    loop {
        terminal.draw(|f| ui::render_focus_screen(f, &panel, &source))?;

        if event::poll(poll)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                        return Ok(());
                    }
                    match input::focus_command(key) {
                        Some(FocusCommand::Close) => return Ok(()),
                        Some(FocusCommand::TogglePause) => panel.toggle_pause(Instant::now()),
                        Some(FocusCommand::Refresh) => {
                            refresh_provider(provider);
                            panel.recheck(&*provider, Instant::now(), Local::now().naive_local());
                        }
                        None => {}
                    }
                }
            }
        }

        let now = Instant::now();
        if reload.fire(now) {
            refresh_provider(provider);
        }
        panel.on_timers(&*provider, now, Local::now().naive_local());
    }
}

fn refresh_provider(provider: &mut dyn TaskProvider) {
    if let Err(err) = provider.refresh() {
        log::warn!("Could not refresh tasks: {:#}", err);
    }
}
