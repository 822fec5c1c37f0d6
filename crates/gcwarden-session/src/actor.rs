//! The session actor: an isolated tokio task that owns every piece of
//! mutable state and drives the coordinator handshake and block dispatch.
//!
//! One task, one `select!` loop, four inputs: link events, control
//! commands, the hello pulse, the dispatch pulse. Pausing and resuming
//! the pulses happens inline with each phase transition, in the same
//! task; from any other task's point of view the transition and the
//! timer change are a single atomic step.

use std::time::{Duration, SystemTime};

use gcwarden_link::{CoordinatorLink, LinkEvent, LinkEvents};
use gcwarden_protocol::{
    AccountId, AppId, ClientHello, ClientWelcome, Codec, ConnectionStatus,
    MatchmakingHello, MatchmakingStart, MsgType, MSG_CLIENT_HELLO,
    MSG_CLIENT_WELCOME, MSG_CONNECTION_STATUS, MSG_MATCHMAKING_START,
};
use gcwarden_registry::{RegistryConfig, TargetRegistry};
use gcwarden_tick::{Pulse, PulseConfig};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::handle::SessionCommand;
use crate::{SessionError, SessionHandle, SessionInfo, SessionPhase};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the session actor.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The application whose coordinator we speak to. Messages for any
    /// other application are dropped.
    pub app: AppId,

    /// Cadence of the hello handshake while unwelcomed.
    pub hello_period: Duration,

    /// Cadence of block dispatch while `Ready`.
    pub dispatch_period: Duration,

    /// Bounds for the target registry the actor owns.
    pub registry: RegistryConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            app: AppId::DEFAULT,
            hello_period: Duration::from_secs(1),
            dispatch_period: Duration::from_millis(2500),
            registry: RegistryConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// Spawns the session actor task.
///
/// Returns the cloneable control handle and the actor's join handle. The
/// join handle resolves to `Err(SessionError::LinkFatal)` if the link
/// reports an unrecoverable error; the caller is expected to let that
/// take the process down.
pub fn spawn<L, C>(
    link: L,
    codec: C,
    events: LinkEvents,
    config: SessionConfig,
) -> (SessionHandle, JoinHandle<Result<(), SessionError>>)
where
    L: CoordinatorLink,
    C: Codec,
{
    let (tx, rx) = mpsc::channel(32);

    // Both pulses start paused: nothing may fire before the link
    // authenticates.
    let hello = Pulse::paused(
        "hello",
        PulseConfig {
            period: config.hello_period,
            initial_jitter_us: 0,
        },
    );
    let dispatch = Pulse::paused(
        "dispatch",
        PulseConfig {
            period: config.dispatch_period,
            initial_jitter_us: 0,
        },
    );

    let actor = SessionActor {
        link,
        codec,
        events,
        commands: rx,
        app: config.app,
        phase: SessionPhase::Disconnected,
        required_version: None,
        self_account: None,
        registry: TargetRegistry::new(config.registry),
        hello,
        dispatch,
    };

    let join = tokio::spawn(actor.run());

    (SessionHandle::new(tx), join)
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The internal actor state. Runs inside a tokio task.
struct SessionActor<L: CoordinatorLink, C: Codec> {
    link: L,
    codec: C,
    events: LinkEvents,
    commands: mpsc::Receiver<SessionCommand>,
    app: AppId,
    phase: SessionPhase,
    /// Learned from the welcome; cleared on every exit from `Ready`.
    required_version: Option<u32>,
    /// Our own identity, set on link authentication.
    self_account: Option<AccountId>,
    registry: TargetRegistry,
    hello: Pulse,
    dispatch: Pulse,
}

impl<L: CoordinatorLink, C: Codec> SessionActor<L, C> {
    /// Runs the actor loop until the link fails fatally or goes away.
    async fn run(mut self) -> Result<(), SessionError> {
        tracing::info!(app = %self.app, "session actor started");

        loop {
            tokio::select! {
                maybe_event = self.events.recv() => {
                    match maybe_event {
                        Some(event) => self.handle_event(event).await?,
                        None => {
                            // The link dropped its sender: no event can
                            // ever arrive again, which breaks the link's
                            // contract as hard as a fatal error does.
                            self.hello.pause();
                            self.dispatch.pause();
                            tracing::error!("link event stream closed");
                            return Err(SessionError::LinkFatal(
                                gcwarden_link::LinkError::Unavailable(
                                    "event stream closed".into(),
                                ),
                            ));
                        }
                    }
                }
                Some(cmd) = self.commands.recv() => {
                    self.handle_command(cmd);
                }
                _ = self.hello.wait() => {
                    self.on_hello_tick().await;
                }
                _ = self.dispatch.wait() => {
                    self.on_dispatch_tick().await;
                }
            }
        }
    }

    // -- link events --------------------------------------------------------

    async fn handle_event(
        &mut self,
        event: LinkEvent,
    ) -> Result<(), SessionError> {
        match event {
            LinkEvent::Authenticated { account } => {
                self.on_authenticated(account).await;
            }
            LinkEvent::Message {
                app,
                msg_type,
                payload,
            } => {
                if app != self.app {
                    tracing::trace!(%app, %msg_type, "message for foreign app, ignoring");
                    return Ok(());
                }
                self.on_message(msg_type, &payload);
            }
            LinkEvent::Disconnected => {
                self.hello.pause();
                self.dispatch.pause();
                self.required_version = None;
                self.set_phase(SessionPhase::Disconnected);
                tracing::info!("link disconnected, pulses stopped, waiting for reconnect");
            }
            LinkEvent::Fatal(err) => {
                self.hello.pause();
                self.dispatch.pause();
                tracing::error!(error = %err, "fatal link error, shutting down");
                return Err(SessionError::LinkFatal(err));
            }
        }
        Ok(())
    }

    async fn on_authenticated(&mut self, account: AccountId) {
        tracing::info!(%account, "link authenticated");
        self.self_account = Some(account);

        // License acquisition is best-effort by contract.
        if let Err(err) = self.link.request_license(self.app).await {
            tracing::warn!(error = %err, "failed to request license, continuing anyway");
        }

        if let Err(err) = self.link.declare_playing(self.app).await {
            tracing::warn!(error = %err, "failed to declare app as playing");
        }

        self.dispatch.pause();
        self.hello.resume();
        self.required_version = None;
        self.set_phase(SessionPhase::Connected);
    }

    fn on_message(&mut self, msg_type: MsgType, payload: &[u8]) {
        match msg_type {
            MSG_CLIENT_WELCOME => self.on_welcome(payload),
            MSG_CONNECTION_STATUS => self.on_connection_status(payload),
            other => {
                tracing::trace!(msg_type = %other, "unhandled coordinator message");
            }
        }
    }

    fn on_welcome(&mut self, payload: &[u8]) {
        let welcome: ClientWelcome = match self.codec.decode(payload) {
            Ok(w) => w,
            Err(err) => {
                tracing::error!(error = %err, "undecodable client welcome");
                return;
            }
        };

        let Some(embedded) = welcome.game_data2 else {
            // Anomalous but survivable: the hello pulse is still running,
            // so the coordinator gets another chance to send a complete
            // welcome.
            tracing::error!("client welcome without embedded matchmaking payload");
            return;
        };

        let hello: MatchmakingHello = match self.codec.decode(&embedded) {
            Ok(h) => h,
            Err(err) => {
                tracing::error!(error = %err, "undecodable embedded matchmaking hello");
                return;
            }
        };

        let version = hello.global_stats.required_version;
        tracing::info!(version, "required version learned");
        self.required_version = Some(version);

        self.hello.pause();
        self.dispatch.resume();
        self.set_phase(SessionPhase::Ready);
    }

    fn on_connection_status(&mut self, payload: &[u8]) {
        let status: ConnectionStatus = match self.codec.decode(payload) {
            Ok(s) => s,
            Err(err) => {
                tracing::error!(error = %err, "undecodable connection status");
                return;
            }
        };

        tracing::info!(status = ?status.status, "connection status received");

        if status.status.has_session() {
            // Informational only.
            return;
        }

        // The coordinator lost our sub-session: back to the handshake.
        self.dispatch.pause();
        self.hello.resume();
        self.required_version = None;
        self.set_phase(SessionPhase::Connected);
    }

    // -- pulses -------------------------------------------------------------

    async fn on_hello_tick(&mut self) {
        tracing::debug!("sending client hello to coordinator");

        let payload = match self.codec.encode(&ClientHello {}) {
            Ok(p) => p,
            Err(err) => {
                tracing::error!(error = %err, "failed to encode client hello");
                return;
            }
        };

        if let Err(err) =
            self.link.send(self.app, MSG_CLIENT_HELLO, payload).await
        {
            tracing::warn!(error = %err, "client hello send failed");
        }

        // First hello out: we are now observably waiting for a welcome.
        if self.phase == SessionPhase::Connected {
            self.set_phase(SessionPhase::AwaitingWelcome);
        }
    }

    async fn on_dispatch_tick(&mut self) {
        self.registry.evict(SystemTime::now());

        let Some(own) = self.self_account else {
            tracing::debug!("dispatch tick before own identity established, skipping");
            return;
        };
        let Some(version) = self.required_version else {
            tracing::debug!("dispatch tick without a learned version, skipping");
            return;
        };

        let targets = self.registry.list().to_vec();
        if targets.is_empty() {
            tracing::debug!("dispatch tick with no live targets");
            return;
        }

        tracing::info!(count = targets.len(), "dispatching block messages");

        for target in targets {
            let msg = MatchmakingStart::block(version, own, target.account);
            let payload = match self.codec.encode(&msg) {
                Ok(p) => p,
                Err(err) => {
                    tracing::error!(
                        target = %target.account,
                        error = %err,
                        "failed to encode block message"
                    );
                    continue;
                }
            };

            // Best-effort: one target's failure must not starve the rest.
            if let Err(err) = self
                .link
                .send(self.app, MSG_MATCHMAKING_START, payload)
                .await
            {
                tracing::warn!(
                    target = %target.account,
                    error = %err,
                    "block dispatch failed"
                );
            }
        }
    }

    // -- control commands ---------------------------------------------------

    fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::AddTarget {
                account,
                ttl_secs,
                reply,
            } => {
                let _ = reply.send(self.registry.add(account, ttl_secs));
            }
            SessionCommand::RemoveTarget { account, reply } => {
                let _ = reply.send(self.registry.remove(account));
            }
            SessionCommand::ListTargets { reply } => {
                self.registry.evict(SystemTime::now());
                let _ = reply.send(self.registry.list().to_vec());
            }
            SessionCommand::Inspect { reply } => {
                self.registry.evict(SystemTime::now());
                let _ = reply.send(SessionInfo {
                    phase: self.phase,
                    required_version: self.required_version,
                    self_account: self.self_account,
                    target_count: self.registry.len(),
                });
            }
        }
    }

    // -- helpers ------------------------------------------------------------

    fn set_phase(&mut self, next: SessionPhase) {
        if self.phase != next {
            tracing::info!(from = %self.phase, to = %next, "session phase changed");
            self.phase = next;
        }
    }
}
