use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use grader_core::{update, Effect, FormVariant, GradeForm, Msg, PanelPolicy, PanelState};
use grader_engine::{GradingClient, RefreshTimer, ReqwestGradingClient};
use grader_logging::{grader_info, grader_warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::cli::{Cli, CliCommand};
use super::config::{self, GraderConfig};
use super::effects::EffectRunner;
use super::form_input::FormLine;
use super::logging;
use super::ui::render::render;
use super::ui::terminal::{Surface, TerminalSurface};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = config::resolve_path(cli.config.clone());
    let mut config = GraderConfig::load(config_path.as_deref())?;
    config.apply_overrides(
        cli.server.clone(),
        cli.interval_ms,
        cli.variant.map(FormVariant::from),
    )?;

    if let Some(destination) = config.log_destination() {
        logging::initialize(destination, config.level());
    }
    match &config_path {
        Some(path) => grader_info!("Loaded config from {:?}", path),
        None => grader_info!("No config file; using defaults"),
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(run_command(cli.command, config))
}

async fn run_command(command: CliCommand, config: GraderConfig) -> anyhow::Result<()> {
    let client = ReqwestGradingClient::new(&config.client_settings())
        .with_context(|| format!("cannot use server url {:?}", config.server_url))?;
    let variant = config.form_variant;
    let (form_tx, form_rx) = mpsc::unbounded_channel();

    let exit_when_idle = match command {
        CliCommand::Submit(args) => {
            let _ = form_tx.send(args.into_form(variant));
            drop(form_tx);
            true
        }
        CliCommand::Session => {
            spawn_stdin_reader(variant, form_tx);
            false
        }
    };

    let shutdown = CancellationToken::new();
    watch_interrupt(tokio::signal::ctrl_c(), shutdown.clone());

    let options = SessionOptions {
        poll_interval: config.poll_interval(),
        exit_when_idle,
    };
    let mut surface = TerminalSurface::new(config.clear_screen);
    let state = run_session(
        Arc::new(client),
        config.panel_policy(),
        options,
        form_rx,
        &mut surface,
        shutdown,
    )
    .await?;

    grader_info!(
        "Session ended with {} job(s), {} pending",
        state.jobs().len(),
        state.view().pending_count
    );
    Ok(())
}

/// Forwards each non-empty stdin line as a form until EOF.
/// Cancels `shutdown` once `signal` reports an interrupt. A listener that
/// cannot be installed is logged and leaves the session running.
fn watch_interrupt<F>(signal: F, shutdown: CancellationToken)
where
    F: Future<Output = io::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        match signal.await {
            Ok(()) => {
                grader_info!("Interrupted; shutting down");
                shutdown.cancel();
            }
            Err(err) => grader_warn!("Cannot listen for Ctrl-C: {}", err),
        }
    });
}

fn spawn_stdin_reader(variant: FormVariant, form_tx: mpsc::UnboundedSender<GradeForm>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match FormLine::parse(&line) {
                    Ok(form) => {
                        if form_tx.send(form.into_form(variant)).is_err() {
                            break;
                        }
                    }
                    Err(err) => grader_warn!("Ignoring unreadable form line: {}", err),
                },
                Ok(None) => {
                    grader_info!("Form input closed; still polling");
                    break;
                }
                Err(err) => {
                    grader_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
    });
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionOptions {
    pub poll_interval: Duration,
    /// Return once form intake is closed and nothing is left to poll.
    pub exit_when_idle: bool,
}

/// Drives the panel: forms and engine results in, renders and alerts out.
///
/// Messages are applied one at a time, so the state is never shared. The
/// refresh timer is torn down before returning.
pub(crate) async fn run_session<S: Surface>(
    client: Arc<dyn GradingClient>,
    policy: PanelPolicy,
    options: SessionOptions,
    mut forms: mpsc::UnboundedReceiver<GradeForm>,
    surface: &mut S,
    shutdown: CancellationToken,
) -> anyhow::Result<PanelState> {
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Msg>();
    let runner = EffectRunner::new(client, msg_tx.clone());

    let tick_tx = msg_tx;
    let timer = RefreshTimer::start(options.poll_interval, move || {
        tick_tx.send(Msg::RefreshTick).is_ok()
    });

    let mut session = Session {
        state: PanelState::new(policy),
        runner,
        surface,
    };
    let mut intake_open = true;

    let outcome = loop {
        tokio::select! {
            _ = shutdown.cancelled() => break Ok(()),
            form = forms.recv(), if intake_open => match form {
                Some(form) => {
                    if let Err(err) = session.dispatch(Msg::FormSubmitted(form)) {
                        break Err(err);
                    }
                }
                None => intake_open = false,
            },
            Some(msg) = msg_rx.recv() => {
                if let Err(err) = session.dispatch(msg) {
                    break Err(err);
                }
            }
        }
        if options.exit_when_idle && !intake_open && session.state.is_idle() {
            break Ok(());
        }
    };

    timer.stop().await;
    outcome.map(|()| session.state)
}

struct Session<'a, S: Surface> {
    state: PanelState,
    runner: EffectRunner,
    surface: &'a mut S,
}

impl<S: Surface> Session<'_, S> {
    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let (alerts, work): (Vec<Effect>, Vec<Effect>) = effects
            .into_iter()
            .partition(|effect| matches!(effect, Effect::Alert { .. }));
        for alert in alerts {
            if let Effect::Alert { message } = alert {
                self.surface
                    .alert(&message)
                    .context("failed to show alert")?;
            }
        }
        self.runner.enqueue(work);

        if self.state.consume_dirty() {
            let lines = render(&self.state.view());
            self.surface.draw(&lines).context("failed to draw job list")?;
        }
        Ok(())
    }
}
