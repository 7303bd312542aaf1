//! Game actor: a Tokio task that owns one [`GameMachine`].
//!
//! The screen layer talks to it through a [`GameHandle`]. Commands travel
//! over a bounded mpsc channel and answer on a oneshot; timer ticks from
//! the [`TokioScheduler`] arrive on a second channel. Both are drained by
//! the same loop, so a tick and a button press can never interleave
//! inside one transition.
//!
//! After every command or tick the actor publishes a fresh
//! [`FlowSnapshot`] on a watch channel. The snapshot is published before
//! the command's reply is sent, so a caller that awaited a reply always
//! observes its effect.

use rand::SeedableRng;
use rand::rngs::StdRng;
use spyglass_catalog::WordCatalog;
use spyglass_session::GameSettings;
use spyglass_tick::TokioScheduler;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::{
    FlowConfig, FlowError, FlowNotice, FlowSnapshot, GameMachine, Page, Phase, TickReceiver,
};

type Reply<T> = oneshot::Sender<T>;

/// Commands sent to the game actor.
enum GameCommand {
    StartGame {
        settings: GameSettings,
        reply: Reply<Result<Phase, FlowError>>,
    },
    Ready {
        reply: Reply<Result<Phase, FlowError>>,
    },
    HideAndPass {
        reply: Reply<Result<Phase, FlowError>>,
    },
    AcknowledgeTimesUp {
        reply: Reply<Result<Phase, FlowError>>,
    },
    Navigate {
        page: Page,
        reply: Reply<Result<Phase, FlowError>>,
    },
    ReturnToGame {
        reply: Reply<Phase>,
    },
    AbandonSession {
        reply: Reply<Phase>,
    },
    Snapshot {
        reply: Reply<FlowSnapshot>,
    },
    Shutdown,
}

/// Handle to a running game actor.
///
/// Cheap to clone. Every method fails with [`FlowError::Unavailable`] once
/// the actor has stopped.
#[derive(Debug, Clone)]
pub struct GameHandle {
    sender: mpsc::Sender<GameCommand>,
    snapshots: watch::Receiver<FlowSnapshot>,
}

impl GameHandle {
    pub async fn start_game(&self, settings: GameSettings) -> Result<Phase, FlowError> {
        self.request(|reply| GameCommand::StartGame { settings, reply })
            .await?
    }

    pub async fn ready(&self) -> Result<Phase, FlowError> {
        self.request(|reply| GameCommand::Ready { reply }).await?
    }

    pub async fn hide_and_pass(&self) -> Result<Phase, FlowError> {
        self.request(|reply| GameCommand::HideAndPass { reply }).await?
    }

    pub async fn acknowledge_times_up(&self) -> Result<Phase, FlowError> {
        self.request(|reply| GameCommand::AcknowledgeTimesUp { reply })
            .await?
    }

    pub async fn navigate(&self, page: Page) -> Result<Phase, FlowError> {
        self.request(|reply| GameCommand::Navigate { page, reply })
            .await?
    }

    pub async fn return_to_game(&self) -> Result<Phase, FlowError> {
        self.request(|reply| GameCommand::ReturnToGame { reply }).await
    }

    pub async fn abandon_session(&self) -> Result<Phase, FlowError> {
        self.request(|reply| GameCommand::AbandonSession { reply }).await
    }

    /// Asks the actor for a snapshot taken right now.
    pub async fn snapshot(&self) -> Result<FlowSnapshot, FlowError> {
        self.request(|reply| GameCommand::Snapshot { reply }).await
    }

    /// The most recently published snapshot, without a round trip.
    pub fn latest(&self) -> FlowSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshots.clone()
    }

    /// Stops the actor. Running countdowns are cancelled with it.
    pub async fn shutdown(&self) -> Result<(), FlowError> {
        self.sender
            .send(GameCommand::Shutdown)
            .await
            .map_err(|_| FlowError::Unavailable)
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> GameCommand,
    ) -> Result<T, FlowError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| FlowError::Unavailable)?;
        reply_rx.await.map_err(|_| FlowError::Unavailable)
    }
}

/// The actor state. Runs inside a Tokio task.
struct GameActor<C> {
    machine: GameMachine<C, TokioScheduler, StdRng>,
    commands: mpsc::Receiver<GameCommand>,
    ticks: TickReceiver,
    snapshots: watch::Sender<FlowSnapshot>,
}

impl<C: WordCatalog> GameActor<C> {
    async fn run(mut self) {
        info!("game actor started");

        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(GameCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle(cmd),
                },
                Some(tick) = self.ticks.recv() => {
                    if let Some(notice) = self.machine.on_tick(tick) {
                        log_notice(notice);
                    }
                    self.publish();
                }
            }
        }

        // Drop any session so its countdown handles cancel their tasks.
        self.machine.abandon_session();
        info!("game actor stopped");
    }

    fn handle(&mut self, cmd: GameCommand) {
        match cmd {
            GameCommand::StartGame { settings, reply } => {
                let result = self.machine.start_game(settings);
                self.publish();
                let _ = reply.send(result);
            }
            GameCommand::Ready { reply } => {
                let result = self.machine.ready();
                self.publish();
                let _ = reply.send(result);
            }
            GameCommand::HideAndPass { reply } => {
                let result = self.machine.hide_and_pass();
                self.publish();
                let _ = reply.send(result);
            }
            GameCommand::AcknowledgeTimesUp { reply } => {
                let result = self.machine.acknowledge_times_up();
                self.publish();
                let _ = reply.send(result);
            }
            GameCommand::Navigate { page, reply } => {
                let result = self.machine.navigate(page);
                self.publish();
                let _ = reply.send(result);
            }
            GameCommand::ReturnToGame { reply } => {
                let phase = self.machine.return_to_game();
                self.publish();
                let _ = reply.send(phase);
            }
            GameCommand::AbandonSession { reply } => {
                let phase = self.machine.abandon_session();
                self.publish();
                let _ = reply.send(phase);
            }
            GameCommand::Snapshot { reply } => {
                let _ = reply.send(self.machine.snapshot());
            }
            GameCommand::Shutdown => {}
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.machine.snapshot());
    }
}

fn log_notice(notice: FlowNotice) {
    match notice {
        FlowNotice::RevealGateOpened => debug!("hide & pass unlocked"),
        FlowNotice::DiscussionEnded => info!("time's up"),
    }
}

/// Spawns a game actor in setup and returns a handle to it.
///
/// Must be called from inside a Tokio runtime. The random source is seeded
/// from `config.rng_seed` when set, otherwise from the OS.
pub fn spawn_game<C: WordCatalog>(catalog: C, config: FlowConfig) -> GameHandle {
    let config = config.validated();
    let rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let (tx, rx) = mpsc::channel(config.command_buffer);

    let (machine, ticks) = GameMachine::new(catalog, TokioScheduler, rng, config);
    let (snapshots, snapshot_rx) = watch::channel(machine.snapshot());

    let actor = GameActor {
        machine,
        commands: rx,
        ticks,
        snapshots,
    };
    tokio::spawn(actor.run());

    GameHandle {
        sender: tx,
        snapshots: snapshot_rx,
    }
}
