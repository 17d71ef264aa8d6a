//! Per-server connection slots with deduplicated connects.
//!
//! Every server name owns one slot. A slot pairs an async mutex, held for the
//! whole of a connect or disconnect, with a synchronous state cell that
//! readers consult without waiting. A connect that fails, times out, or is
//! dropped mid-handshake leaves the slot `Disconnected` so a retry can start
//! from scratch.

use super::catalog::ToolCatalog;
use crate::deadline::{Deadline, Interrupted};
use crate::mcp_client::domain::{
    ConnectOutcome, ConnectedServer, ConnectionState, McpClientError, McpClientResult,
    ToolDescriptor,
};
use crate::mcp_client::ports::{McpConnector, McpSession, McpSessionError};
use crate::tool_registry::domain::ServerDescriptor;
use futures::future::join_all;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Outcome of one server's connect within [`ConnectionManager::connect_all`].
#[derive(Debug)]
pub struct ConnectAttempt {
    /// Server name.
    pub server: String,
    /// Result for this server alone.
    pub outcome: McpClientResult<ConnectOutcome>,
}

struct LiveConnection<S> {
    session: Arc<S>,
    categories: Vec<String>,
    tool_count: usize,
}

enum SlotState<S> {
    Disconnected,
    Connecting,
    Connected(LiveConnection<S>),
}

impl<S> SlotState<S> {
    const fn kind(&self) -> ConnectionState {
        match self {
            Self::Disconnected => ConnectionState::Disconnected,
            Self::Connecting => ConnectionState::Connecting,
            Self::Connected(_) => ConnectionState::Connected,
        }
    }
}

struct ConnectionSlot<S> {
    transition: Mutex<()>,
    state: RwLock<SlotState<S>>,
}

impl<S> ConnectionSlot<S> {
    fn new() -> Self {
        Self {
            transition: Mutex::new(()),
            state: RwLock::new(SlotState::Disconnected),
        }
    }

    fn current(&self) -> ConnectionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .kind()
    }

    fn replace(&self, next: SlotState<S>) -> SlotState<S> {
        std::mem::replace(
            &mut *self.state.write().unwrap_or_else(PoisonError::into_inner),
            next,
        )
    }

    fn session(&self) -> Option<Arc<S>> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            SlotState::Connected(live) => Some(Arc::clone(&live.session)),
            SlotState::Disconnected | SlotState::Connecting => None,
        }
    }
}

/// Reverts a slot to `Disconnected` unless the connect completed.
struct ConnectingGuard<'a, S> {
    slot: &'a ConnectionSlot<S>,
    armed: bool,
}

impl<S> Drop for ConnectingGuard<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            self.slot.replace(SlotState::Disconnected);
        }
    }
}

/// Owns zero or one live session per server name.
pub struct ConnectionManager<C>
where
    C: McpConnector,
{
    connector: Arc<C>,
    catalog: Arc<ToolCatalog>,
    slots: RwLock<BTreeMap<String, Arc<ConnectionSlot<C::Session>>>>,
}

impl<C> ConnectionManager<C>
where
    C: McpConnector,
{
    /// Creates a manager publishing discovered tools into `catalog`.
    #[must_use]
    pub fn new(connector: Arc<C>, catalog: Arc<ToolCatalog>) -> Self {
        Self {
            connector,
            catalog,
            slots: RwLock::new(BTreeMap::new()),
        }
    }

    fn slot(&self, server: &str) -> Arc<ConnectionSlot<C::Session>> {
        if let Some(existing) = self.existing_slot(server) {
            return existing;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            slots
                .entry(server.to_owned())
                .or_insert_with(|| Arc::new(ConnectionSlot::new())),
        )
    }

    fn existing_slot(&self, server: &str) -> Option<Arc<ConnectionSlot<C::Session>>> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(server)
            .cloned()
    }

    /// Opens a session with `descriptor`'s server and discovers its tools.
    ///
    /// Returns [`ConnectOutcome::AlreadyConnected`] without opening anything
    /// when a live session exists, including when it was established by a
    /// concurrent caller this call waited on.
    ///
    /// # Errors
    ///
    /// Returns [`McpClientError::ConnectionFailed`] when the transport or
    /// discovery fails, and [`McpClientError::Timeout`] or
    /// [`McpClientError::Cancelled`] when `deadline` interrupts the attempt.
    /// The slot is left `Disconnected` in every error case.
    pub async fn connect(
        &self,
        descriptor: &ServerDescriptor,
        deadline: &Deadline,
    ) -> McpClientResult<ConnectOutcome> {
        let server = descriptor.name().as_str();
        let slot = self.slot(server);
        if slot.current() == ConnectionState::Connected {
            debug!(server = %server, "MCP server already connected");
            return Ok(ConnectOutcome::AlreadyConnected);
        }

        match deadline.run(self.connect_exclusive(descriptor, &slot)).await {
            Ok(outcome) => outcome,
            Err(interruption) => {
                warn!(server = %server, %interruption, "MCP connect interrupted");
                Err(interrupted(server, interruption))
            }
        }
    }

    async fn connect_exclusive(
        &self,
        descriptor: &ServerDescriptor,
        slot: &ConnectionSlot<C::Session>,
    ) -> McpClientResult<ConnectOutcome> {
        let server = descriptor.name().as_str();
        let _transition = slot.transition.lock().await;
        if slot.current() == ConnectionState::Connected {
            return Ok(ConnectOutcome::AlreadyConnected);
        }

        slot.replace(SlotState::Connecting);
        let mut guard = ConnectingGuard { slot, armed: true };
        info!(server = %server, transport = descriptor.transport().kind(), "connecting to MCP server");

        let (session, tools) = self.open_session(descriptor).await.map_err(|cause| {
            warn!(server = %server, error = %cause, "MCP connect failed");
            McpClientError::ConnectionFailed {
                server: server.to_owned(),
                cause,
            }
        })?;

        let tool_count = tools.len();
        self.catalog.publish(server, tools);
        slot.replace(SlotState::Connected(LiveConnection {
            session: Arc::new(session),
            categories: descriptor.categories().to_vec(),
            tool_count,
        }));
        guard.armed = false;

        info!(server = %server, tool_count, "connected to MCP server");
        Ok(ConnectOutcome::Connected { tool_count })
    }

    async fn open_session(
        &self,
        descriptor: &ServerDescriptor,
    ) -> Result<(C::Session, Vec<ToolDescriptor>), McpSessionError> {
        let session = self.connector.connect(descriptor).await?;
        match session.list_tools().await {
            Ok(discovered) => {
                let tools = discovered
                    .into_iter()
                    .map(|tool| {
                        ToolDescriptor::new(descriptor, tool.name, tool.description, tool.input_schema)
                    })
                    .collect();
                Ok((session, tools))
            }
            Err(cause) => {
                if let Err(close_error) = session.close().await {
                    debug!(
                        server = %descriptor.name(),
                        error = %close_error,
                        "closing session after failed discovery also failed"
                    );
                }
                Err(cause)
            }
        }
    }

    /// Connects every descriptor independently and reports each outcome.
    pub async fn connect_all(
        &self,
        descriptors: &[ServerDescriptor],
        deadline: &Deadline,
    ) -> Vec<ConnectAttempt> {
        join_all(descriptors.iter().map(|descriptor| async move {
            ConnectAttempt {
                server: descriptor.name().as_str().to_owned(),
                outcome: self.connect(descriptor, deadline).await,
            }
        }))
        .await
    }

    /// Closes `server`'s session and discards its catalog entries.
    ///
    /// Returns whether a live session existed. A failure to close the
    /// transport cleanly is logged; the slot is disconnected regardless.
    pub async fn disconnect(&self, server: &str) -> bool {
        let Some(slot) = self.existing_slot(server) else {
            return false;
        };
        let _transition = slot.transition.lock().await;
        self.close_locked(server, &slot).await
    }

    /// Disconnects `slot`. Callers must hold its transition lock.
    async fn close_locked(&self, server: &str, slot: &ConnectionSlot<C::Session>) -> bool {
        let previous = slot.replace(SlotState::Disconnected);
        self.catalog.discard(server);

        match previous {
            SlotState::Connected(live) => {
                if let Err(err) = live.session.close().await {
                    warn!(server = %server, error = %err, "MCP session did not close cleanly");
                }
                info!(server = %server, "disconnected from MCP server");
                true
            }
            SlotState::Disconnected | SlotState::Connecting => false,
        }
    }

    /// Disconnects every server and returns the names that were connected.
    pub async fn disconnect_all(&self) -> Vec<String> {
        let servers: Vec<String> = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();

        let closed = join_all(servers.into_iter().map(|server| async move {
            let was_connected = self.disconnect(&server).await;
            was_connected.then_some(server)
        }))
        .await;
        closed.into_iter().flatten().collect()
    }

    /// Returns whether `server` has a live session.
    #[must_use]
    pub fn is_connected(&self, server: &str) -> bool {
        self.state(server) == ConnectionState::Connected
    }

    /// Returns the state of `server`'s slot.
    #[must_use]
    pub fn state(&self, server: &str) -> ConnectionState {
        self.existing_slot(server)
            .map_or(ConnectionState::Disconnected, |slot| slot.current())
    }

    /// Summarizes every connected server, ordered by name.
    #[must_use]
    pub fn connected_servers(&self) -> Vec<ConnectedServer> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .iter()
            .filter_map(|(name, slot)| {
                match &*slot.state.read().unwrap_or_else(PoisonError::into_inner) {
                    SlotState::Connected(live) => Some(ConnectedServer {
                        server_name: name.clone(),
                        categories: live.categories.clone(),
                        tool_count: live.tool_count,
                    }),
                    SlotState::Disconnected | SlotState::Connecting => None,
                }
            })
            .collect()
    }

    /// Invokes `tool` over `server`'s live session.
    ///
    /// `tool_id` labels errors and logs. A session that reports itself
    /// closed is evicted so the next connect starts fresh.
    ///
    /// # Errors
    ///
    /// Returns [`McpClientError::NotConnected`] when no session exists,
    /// [`McpClientError::RemoteError`] when the server or transport fails,
    /// and [`McpClientError::Timeout`] or [`McpClientError::Cancelled`] when
    /// `deadline` interrupts the call.
    pub async fn call(
        &self,
        server: &str,
        tool: &str,
        tool_id: &str,
        arguments: Map<String, Value>,
        deadline: &Deadline,
    ) -> McpClientResult<Value> {
        let session = self
            .existing_slot(server)
            .and_then(|slot| slot.session())
            .ok_or_else(|| McpClientError::NotConnected {
                server: server.to_owned(),
            })?;

        debug!(tool_id = %tool_id, "dispatching tool call");
        match deadline.run(session.call_tool(tool, arguments)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(cause)) => {
                warn!(tool_id = %tool_id, error = %cause, "tool call failed");
                if matches!(cause, McpSessionError::Closed) {
                    self.evict(server, &session).await;
                }
                Err(McpClientError::RemoteError {
                    tool_id: tool_id.to_owned(),
                    cause,
                })
            }
            Err(interruption) => {
                warn!(tool_id = %tool_id, %interruption, "tool call interrupted");
                Err(interrupted(tool_id, interruption))
            }
        }
    }

    /// Disconnects `server` if `stale` is still its live session.
    ///
    /// The identity check is repeated under the transition lock so a
    /// reconnect that lands first is left alone.
    async fn evict(&self, server: &str, stale: &Arc<C::Session>) {
        let Some(slot) = self.existing_slot(server) else {
            return;
        };
        let _transition = slot.transition.lock().await;
        let still_current = slot
            .session()
            .is_some_and(|current| Arc::ptr_eq(&current, stale));
        if still_current {
            let evicted = self.close_locked(server, &slot).await;
            warn!(server = %server, evicted, "evicted closed MCP session");
        } else {
            debug!(server = %server, "closed session already replaced");
        }
    }
}

fn interrupted(target: &str, interruption: Interrupted) -> McpClientError {
    match interruption {
        Interrupted::TimedOut(after) => McpClientError::Timeout {
            target: target.to_owned(),
            after,
        },
        Interrupted::Cancelled => McpClientError::Cancelled {
            target: target.to_owned(),
        },
    }
}
