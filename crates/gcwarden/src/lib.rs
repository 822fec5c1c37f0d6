//! # Gcwarden
//!
//! A game-coordinator block bot: holds one persistent coordinator
//! session, learns the protocol version the coordinator demands, and
//! keeps dispatching block messages for every target on a bounded,
//! expiring list that operators manage over a small HTTP API.
//!
//! The meta-crate ties the layers together: link → protocol → session →
//! control API. Provide a [`CoordinatorLink`](gcwarden_link::CoordinatorLink)
//! implementation and its event stream, and [`Warden::run`] does the rest.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use gcwarden::{Warden, WardenConfig};
//!
//! let config = WardenConfig::load("config.json")?;
//! gcwarden::init_logging(config.logging);
//!
//! // `link` and `events` come from your CoordinatorLink implementation.
//! let (link, events) = my_link::logon(&config).await?;
//! Warden::new(link, events, config).run().await
//! ```

mod config;
mod error;
mod http;

pub use config::{Credentials, WardenConfig};
pub use error::WardenError;
pub use http::control_router;

// Re-export the sub-crates so binaries only need one dependency.
pub use gcwarden_link as link;
pub use gcwarden_protocol as protocol;
pub use gcwarden_registry as registry;
pub use gcwarden_session as session;

use std::net::Ipv4Addr;

use axum::Router;
use gcwarden_link::{CoordinatorLink, LinkEvents};
use gcwarden_protocol::JsonCodec;
use gcwarden_session::{SessionConfig, SessionError, SessionHandle};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// With `enabled: false` only errors get through, matching the config
/// file's `logging` toggle. `RUST_LOG` still overrides when logging is
/// on.
pub fn init_logging(enabled: bool) {
    let filter = if enabled {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("error")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// The assembled bot: session actor plus control API.
pub struct Warden {
    handle: SessionHandle,
    actor: JoinHandle<Result<(), SessionError>>,
    router: Router,
    port: u16,
}

impl Warden {
    /// Wires the session actor to the given link and builds the control
    /// router. Nothing runs until [`run`](Self::run).
    pub fn new<L: CoordinatorLink>(
        link: L,
        events: LinkEvents,
        config: WardenConfig,
    ) -> Self {
        let (handle, actor) = gcwarden_session::spawn(
            link,
            JsonCodec,
            events,
            SessionConfig {
                app: config.app,
                registry: config.registry.clone(),
                ..SessionConfig::default()
            },
        );

        let router = control_router(handle.clone(), config.key.clone());

        Self {
            handle,
            actor,
            router,
            port: config.port,
        }
    }

    /// A control handle to the session actor, for embedding scenarios
    /// and tests.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Serves the control API and supervises the session actor.
    ///
    /// Returns when the actor ends, which, per the link contract, only
    /// happens on a fatal link error. The caller should propagate the
    /// error to a non-zero exit so an external supervisor restarts the
    /// process.
    pub async fn run(self) -> Result<(), WardenError> {
        let listener = tokio::net::TcpListener::bind(
            (Ipv4Addr::UNSPECIFIED, self.port),
        )
        .await?;
        tracing::info!(port = self.port, "control API listening");

        let mut actor = self.actor;

        tokio::select! {
            result = axum::serve(listener, self.router) => {
                // axum::serve only returns on a listener-level failure.
                result?;
                Ok(())
            }
            result = &mut actor => match result {
                Ok(outcome) => Ok(outcome?),
                Err(join_err) => {
                    tracing::error!(error = %join_err, "session actor panicked");
                    Err(SessionError::Gone.into())
                }
            },
        }
    }
}
