use crate::config::Settings;
use crate::field::new_field;
use crate::input::input_loop;
use crate::render::{Renderer, TermGuard};
use crate::sim::{SimCommand, Simulation};
use anyhow::Context;
use crossterm::event::EventStream;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

const COMMAND_QUEUE: usize = 256;

/// Why the app is shutting down. The first one sent wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shutdown {
    Input,
    EventsClosed,
    Signal(&'static str),
    RenderFailed,
}

pub(crate) async fn run(settings: Settings) -> anyhow::Result<()> {
    let mut term = TermGuard::begin()?;
    let (cols, rows) = term.size();

    let field = new_field(settings.field, i32::from(cols / 2), i32::from(rows));
    let sim = Simulation::new(field, settings.spread_policy(), settings.rng());
    info!(
        cols,
        rows,
        field = ?settings.field,
        policy = ?sim.policy(),
        tick = ?settings.tick_period(),
        "starting"
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE);
    let (quit_tx, mut quit_rx) = mpsc::channel(4);

    let sim_task = tokio::spawn(sim_loop(
        sim,
        Renderer::new(io::stdout(), cols, rows),
        settings.tick_period(),
        cmd_rx,
        quit_tx.clone(),
        stop_rx.clone(),
    ));
    let input_task = tokio::spawn(input_loop(
        EventStream::new(),
        cmd_tx,
        quit_tx.clone(),
        stop_rx.clone(),
    ));
    let signal_task = tokio::spawn(signal_loop(quit_tx, stop_rx));

    let reason = quit_rx.recv().await;
    info!(?reason, "shutting down");
    let _ = stop_tx.send(true);

    let (sim, _) = sim_task.await.context("simulation task failed")?;
    input_task.await.context("input task failed")?;
    signal_task.await.context("signal task failed")?;

    term.end().context("failed to restore terminal")?;
    info!(
        ticks = sim.ticks(),
        live = sim.field().live_count(),
        "terminal released"
    );
    Ok(())
}

/// Single owner of the field and the screen. Runs propagate, age, render on
/// every tick and applies activations in between until shutdown is
/// broadcast. A due tick is served before queued activations.
pub(crate) async fn sim_loop<W: Write>(
    mut sim: Simulation,
    mut renderer: Renderer<W>,
    period: Duration,
    mut commands: mpsc::Receiver<SimCommand>,
    quit: mpsc::Sender<Shutdown>,
    mut stop: watch::Receiver<bool>,
) -> (Simulation, Renderer<W>) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut drawn = renderer.draw(sim.field());
    loop {
        if let Err(err) = drawn {
            error!(?err, "render failed");
            let _ = quit.send(Shutdown::RenderFailed).await;
            break;
        }

        drawn = tokio::select! {
            biased;
            _ = stop.changed() => break,
            _ = ticker.tick() => {
                sim.tick();
                renderer.draw(sim.field())
            }
            Some(cmd) = commands.recv() => {
                sim.apply(cmd);
                renderer.draw(sim.field())
            }
        };
    }
    (sim, renderer)
}

async fn signal_loop(quit: mpsc::Sender<Shutdown>, mut stop: watch::Receiver<bool>) {
    tokio::select! {
        _ = stop.changed() => {}
        received = next_signal() => match received {
            Ok(name) => {
                let _ = quit.send(Shutdown::Signal(name)).await;
            }
            Err(err) => warn!(?err, "could not listen for signals"),
        },
    }
}

#[cfg(unix)]
async fn next_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|_| "SIGINT"),
        _ = term.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn next_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "ctrl-c")
}
