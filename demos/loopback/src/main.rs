//! End-to-end demo with an in-process fake coordinator.
//!
//! The loopback link answers every client hello with a welcome carrying
//! a required version, and logs each block dispatch it receives. Run it,
//! then drive the control API:
//!
//! ```text
//! cargo run -p loopback-demo
//! curl 'http://127.0.0.1:8080/add?key=demo&id=111111111&length=60'
//! curl 'http://127.0.0.1:8080/list?key=demo'
//! ```
//!
//! Pass a JSON config path as the first argument to override the
//! defaults (port 8080, key "demo").

use std::time::Duration;

use gcwarden::link::{
    event_channel, CoordinatorLink, LinkError, LinkEvent, LinkEventSender,
};
use gcwarden::protocol::{
    AccountId, AppId, ClientWelcome, Codec, GlobalStats, JsonCodec,
    MatchmakingHello, MatchmakingStart, MsgType, MSG_CLIENT_HELLO,
    MSG_CLIENT_WELCOME, MSG_MATCHMAKING_START,
};
use gcwarden::{Warden, WardenConfig, WardenError};

/// The protocol version the fake coordinator demands.
const DEMO_VERSION: u32 = 13901;

/// The identity the fake logon hands out.
const DEMO_ACCOUNT: u64 = 900_000_001;

// ---------------------------------------------------------------------------
// Loopback link
// ---------------------------------------------------------------------------

/// A coordinator link whose remote side lives in this process.
#[derive(Clone)]
struct LoopbackLink {
    events: LinkEventSender,
    app: AppId,
}

impl LoopbackLink {
    /// Fakes the logon: emits `Authenticated` shortly after startup,
    /// the way a real link does once its transport settles.
    fn logon(&self, account: AccountId) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let _ = events.send(LinkEvent::Authenticated { account }).await;
        });
    }

    async fn reply(
        &self,
        msg_type: MsgType,
        payload: Vec<u8>,
    ) -> Result<(), LinkError> {
        self.events
            .send(LinkEvent::Message {
                app: self.app,
                msg_type,
                payload,
            })
            .await
            .map_err(|_| LinkError::Unavailable("session gone".into()))
    }
}

impl CoordinatorLink for LoopbackLink {
    async fn request_license(&self, app: AppId) -> Result<(), LinkError> {
        tracing::info!(%app, "license granted (loopback)");
        Ok(())
    }

    async fn declare_playing(&self, app: AppId) -> Result<(), LinkError> {
        tracing::info!(%app, "now playing (loopback)");
        Ok(())
    }

    async fn send(
        &self,
        _app: AppId,
        msg_type: MsgType,
        payload: Vec<u8>,
    ) -> Result<(), LinkError> {
        let codec = JsonCodec;
        match msg_type {
            MSG_CLIENT_HELLO => {
                let embedded = codec
                    .encode(&MatchmakingHello {
                        global_stats: GlobalStats {
                            required_version: DEMO_VERSION,
                        },
                    })
                    .map_err(|e| LinkError::Send(e.to_string()))?;
                let welcome = codec
                    .encode(&ClientWelcome {
                        version: 1,
                        game_data2: Some(embedded),
                    })
                    .map_err(|e| LinkError::Send(e.to_string()))?;
                self.reply(MSG_CLIENT_WELCOME, welcome).await
            }
            MSG_MATCHMAKING_START => {
                match codec.decode::<MatchmakingStart>(&payload) {
                    Ok(msg) => tracing::info!(
                        version = msg.client_version,
                        game_type = msg.game_type,
                        pair = ?msg.account_ids,
                        "coordinator received block dispatch"
                    ),
                    Err(err) => {
                        tracing::warn!(error = %err, "undecodable dispatch")
                    }
                }
                Ok(())
            }
            other => {
                tracing::debug!(msg_type = %other, "loopback ignoring message");
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), WardenError> {
    let config = match std::env::args().nth(1) {
        Some(path) => WardenConfig::load(path)?,
        None => WardenConfig {
            key: "demo".into(),
            ..WardenConfig::default()
        },
    };
    gcwarden::init_logging(config.logging);

    let (events_tx, events_rx) = event_channel();
    let link = LoopbackLink {
        events: events_tx,
        app: config.app,
    };

    let account = AccountId::from_individual(DEMO_ACCOUNT)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    link.logon(account);

    Warden::new(link, events_rx, config).run().await
}
