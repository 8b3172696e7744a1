//! D-Bus session connection and signal publishing.
//!
//! One connection, opened at startup and held for the process lifetime,
//! claims the well-known name (default `org.asus.dial`) and carries every
//! broadcast signal. Consumers match on the interface and member names
//! from [`BusConfig`]; no replies are expected or awaited.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use zbus::fdo::{RequestNameFlags, RequestNameReply};
use zbus::names::BusName;

use crate::config::BusConfig;
use crate::state::DialEvent;

/// Errors from the bus layer.
#[derive(Error, Debug)]
pub enum BusError {
    #[error("D-Bus session connection failed: {0}")]
    Connect(#[source] zbus::Error),

    #[error("failed to request bus name {name}: {source}")]
    RequestName { name: String, source: zbus::Error },

    #[error("bus name {0} is owned by another process")]
    NotPrimaryOwner(String),

    #[error("signal emission failed: {0}")]
    Emit(#[source] zbus::Error),
}

/// Outbound capability of the bus layer: publish one event as one
/// broadcast signal. The daemon core only ever sees this trait, so the
/// transport can be swapped without touching the state machine.
#[async_trait]
pub trait DialBus: Send + Sync {
    async fn publish(&self, event: DialEvent) -> Result<(), BusError>;
}

/// The live zbus-backed publisher.
pub struct DialPublisher {
    conn: zbus::Connection,
    config: BusConfig,
}

impl DialPublisher {
    /// Connect to the session bus and claim the well-known name.
    ///
    /// The claim uses replace-existing semantics in both directions:
    /// `ReplaceExisting` so this instance evicts a stale owner, and
    /// `AllowReplacement` so a later instance can evict this one in turn.
    /// `DoNotQueue` turns a lost race into an immediate error instead of
    /// a silent queue position. Anything but primary ownership is fatal:
    /// only one authoritative publisher may exist at a time.
    pub async fn connect(config: &BusConfig) -> Result<Self, BusError> {
        let conn = zbus::Connection::session()
            .await
            .map_err(BusError::Connect)?;

        let flags = RequestNameFlags::AllowReplacement
            | RequestNameFlags::ReplaceExisting
            | RequestNameFlags::DoNotQueue;
        let reply = conn
            .request_name_with_flags(config.service_name.as_str(), flags)
            .await
            .map_err(|source| BusError::RequestName {
                name: config.service_name.clone(),
                source,
            })?;

        match reply {
            RequestNameReply::PrimaryOwner | RequestNameReply::AlreadyOwner => Ok(Self {
                conn,
                config: config.clone(),
            }),
            _ => Err(BusError::NotPrimaryOwner(config.service_name.clone())),
        }
    }

    /// The underlying connection (shared with nothing else in-process).
    pub fn connection(&self) -> &zbus::Connection {
        &self.conn
    }
}

#[async_trait]
impl DialBus for DialPublisher {
    async fn publish(&self, event: DialEvent) -> Result<(), BusError> {
        let (member, value) = match event {
            DialEvent::Rotate(delta) => (self.config.rotate_member.as_str(), delta),
            DialEvent::Press(down) => (self.config.press_member.as_str(), i32::from(down)),
        };

        debug!(member, value, "emitting signal");
        self.conn
            .emit_signal(
                None::<BusName<'_>>,
                self.config.object_path.as_str(),
                self.config.interface.as_str(),
                member,
                &(value,),
            )
            .await
            .map_err(BusError::Emit)
    }
}
