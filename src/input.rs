use crate::app::Shutdown;
use crate::sim::SimCommand;
use crossterm::event::{Event, KeyEventKind, MouseEventKind};
use futures_util::{Stream, StreamExt};
use std::io;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputAction {
    Paint { x: i32, y: i32 },
    Ignore,
    Quit,
}

pub(crate) fn map_event(ev: &Event) -> InputAction {
    match ev {
        // any-motion tracking reports bare hover constantly
        Event::Mouse(m) if m.kind == MouseEventKind::Moved => InputAction::Ignore,
        Event::Mouse(m) => InputAction::Paint {
            // two terminal columns per field cell
            x: i32::from(m.column / 2),
            y: i32::from(m.row),
        },
        Event::Key(k) if k.kind != KeyEventKind::Press => InputAction::Ignore,
        // resize included: the frame is fixed at startup size
        _ => InputAction::Quit,
    }
}

/// Forward pointer input to the simulation until a non-pointer event arrives,
/// the event stream ends, or shutdown is broadcast.
pub(crate) async fn input_loop<S>(
    mut events: S,
    commands: mpsc::Sender<SimCommand>,
    quit: mpsc::Sender<Shutdown>,
    mut stop: watch::Receiver<bool>,
) where
    S: Stream<Item = io::Result<Event>> + Unpin,
{
    loop {
        let next = tokio::select! {
            biased;
            _ = stop.changed() => return,
            next = events.next() => next,
        };

        let reason = match next {
            Some(Ok(ev)) => match map_event(&ev) {
                InputAction::Paint { x, y } => {
                    debug!(x, y, "activate");
                    if commands.send(SimCommand::Activate { x, y }).await.is_err() {
                        return;
                    }
                    continue;
                }
                InputAction::Ignore => continue,
                InputAction::Quit => Shutdown::Input,
            },
            Some(Err(err)) => {
                warn!(?err, "terminal event stream failed");
                Shutdown::EventsClosed
            }
            None => Shutdown::EventsClosed,
        };

        let _ = quit.send(reason).await;
        return;
    }
}
