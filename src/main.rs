use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    self as term, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use keywordchain::app::{App, StatusLevel};
use keywordchain::config::{self, EndpointArgs};
use keywordchain::infrastructure::logging;
use keywordchain::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, WorkerConfig};
use keywordchain::modules::BackdropLoader;
use keywordchain::ui;

const HEALTH_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(
    name = "keywordchain",
    version,
    about = "KeywordChain: read and extend an on-chain keyword chain from the terminal"
)]
struct Args {
    /// HTTP JSON-RPC endpoint (e.g. http://localhost:8545)
    #[arg(long)]
    rpc: Option<String>,

    /// WebSocket endpoint (e.g. ws://localhost:8546)
    #[arg(long)]
    ws: Option<String>,

    /// IPC path (e.g. ~/.ethereum/geth.ipc). Unix only.
    #[arg(long)]
    ipc: Option<PathBuf>,

    /// KeywordChain contract address
    #[arg(long)]
    contract: Option<String>,

    /// Config file (defaults to $KEYWORDCHAIN_CONFIG or the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (mut config, config_error) = config::load(args.config.as_deref());
    if let Some(contract) = args.contract.clone() {
        config.contract = Some(contract);
    }

    let log_dir = args.log_dir.clone().unwrap_or_else(|| config.log_dir());
    let _log_guard = logging::init(&log_dir, &config.log_filter())?;
    if let Some(err) = config_error.as_ref() {
        tracing::warn!(error = %err, "config ignored, using defaults");
    }

    let endpoints = config.endpoints(&EndpointArgs {
        rpc: args.rpc.clone(),
        ws: args.ws.clone(),
        ipc: args.ipc.clone(),
    })?;
    let contract = config.contract_address()?;
    if contract.is_none() {
        tracing::warn!("no contract address configured, connect will fail");
    }

    let runtime = RuntimeBridge::new(WorkerConfig {
        endpoints: endpoints.iter().map(|e| e.provider.clone()).collect(),
        contract,
        private_key: config.private_key()?,
        health_interval: HEALTH_INTERVAL,
    })?;

    let (cols, rows) = term::size().unwrap_or((0, 0));
    let backdrop = BackdropLoader::spawn(config.particles.clone(), cols, rows);

    let mut app = App::new(
        endpoints.into_iter().map(|e| e.label).collect(),
        config.chain.max_entries,
        config::export_dir(),
    );
    if let Some(err) = config_error {
        app.set_status(format!("Config ignored: {err}"), StatusLevel::Warn);
    }
    tracing::info!("starting keywordchain");

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime, backdrop);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %format!("{err:#}"), "exited with error");
        eprintln!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
    mut backdrop: BackdropLoader,
) -> Result<()> {
    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime, &mut backdrop)?;
        app.sync_context();
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Resize(cols, rows) => app.resize(cols, rows),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_background(
    app: &mut App,
    runtime: &RuntimeBridge,
    backdrop: &mut BackdropLoader,
) -> Result<()> {
    for event in runtime.poll_events() {
        app.apply_runtime_event(event);
    }

    if let Some(outcome) = backdrop.poll() {
        app.apply_backdrop(outcome);
    }

    app.sync_context();
    for cmd in app.take_runtime_commands() {
        tracing::debug!(?cmd, "runtime command");
        runtime.send(cmd).context("RPC worker stopped")?;
    }
    Ok(())
}
