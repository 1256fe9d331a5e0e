//! CDP WebSocket connection
//!
//! Commands are written to the socket's sink; a spawned reader task routes
//! each reply to the waiter registered under its id.

use super::traits::CdpConnection;
use super::types::{CdpMessage, CdpRequest};
use crate::Error;
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Waiters = Arc<Mutex<HashMap<u64, oneshot::Sender<CdpMessage>>>>;

/// Upper bound on any reply
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Navigation replies arrive once the response headers do
const NAVIGATION_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

fn command_timeout(method: &str) -> Duration {
    match method {
        "Page.navigate" | "Page.reload" => NAVIGATION_COMMAND_TIMEOUT,
        _ => COMMAND_TIMEOUT,
    }
}

/// WebSocket connection to a page target
pub struct CdpWebSocketConnection {
    url: String,
    sink: Mutex<Option<SplitSink<WsStream, Message>>>,
    next_id: AtomicU64,
    waiters: Waiters,
    is_active: Arc<AtomicBool>,
}

impl std::fmt::Debug for CdpWebSocketConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpWebSocketConnection")
            .field("url", &self.url)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl CdpWebSocketConnection {
    /// Connect to a page target's `webSocketDebuggerUrl`
    pub async fn new<S: Into<String>>(url: S) -> Result<Arc<Self>, Error> {
        let url = url.into();
        info!("Connecting to {}", url);

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::websocket(format!("Failed to connect to {}: {}", url, e)))?;
        let (sink, stream) = ws_stream.split();

        let connection = Arc::new(Self {
            url,
            sink: Mutex::new(Some(sink)),
            next_id: AtomicU64::new(1),
            waiters: Arc::new(Mutex::new(HashMap::new())),
            is_active: Arc::new(AtomicBool::new(true)),
        });

        tokio::spawn(Self::read_loop(
            stream,
            Arc::clone(&connection.waiters),
            Arc::clone(&connection.is_active),
        ));

        Ok(connection)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Route replies until the socket closes, then fail every waiter
    async fn read_loop(mut stream: SplitStream<WsStream>, waiters: Waiters, is_active: Arc<AtomicBool>) {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<CdpMessage>(&text) {
                    Ok(message) => Self::dispatch(message, &waiters).await,
                    Err(e) => warn!("Unparseable CDP frame ({}): {}", e, text),
                },
                Ok(Message::Close(_)) => {
                    debug!("Close frame received");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
            }
        }

        is_active.store(false, Ordering::SeqCst);

        // Dropping the senders wakes each waiter with a closed channel
        let mut waiters = waiters.lock().await;
        if !waiters.is_empty() {
            warn!("Connection closed with {} command(s) in flight", waiters.len());
        }
        waiters.clear();
    }

    async fn dispatch(message: CdpMessage, waiters: &Waiters) {
        let Some(id) = message.id else {
            if let Some(method) = &message.method {
                debug!("Ignoring event {}", method);
            }
            return;
        };

        match waiters.lock().await.remove(&id) {
            Some(waiter) => {
                let _ = waiter.send(message);
            }
            None => warn!("Reply for unknown command {}", id),
        }
    }

    async fn write(&self, text: String) -> Result<(), Error> {
        let mut sink = self.sink.lock().await;
        let sink = sink
            .as_mut()
            .ok_or_else(|| Error::websocket("Connection is closed"))?;

        sink.send(Message::Text(text))
            .await
            .map_err(|e| Error::websocket(format!("Failed to send message: {}", e)))
    }
}

#[async_trait]
impl CdpConnection for CdpWebSocketConnection {
    async fn send_command(&self, method: &str, params: Value) -> Result<Value, Error> {
        if !self.is_active.load(Ordering::SeqCst) {
            return Err(Error::websocket("Connection is not active"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = serde_json::to_string(&CdpRequest { id, method, params })?;

        let (sender, receiver) = oneshot::channel();
        self.waiters.lock().await.insert(id, sender);

        debug!("-> {} {}", id, method);
        if let Err(e) = self.write(request).await {
            self.waiters.lock().await.remove(&id);
            return Err(e);
        }

        match tokio::time::timeout(command_timeout(method), receiver).await {
            Ok(Ok(reply)) => reply.into_result(method),
            Ok(Err(_)) => Err(Error::websocket(format!(
                "Connection closed before {} ({}) completed",
                method, id
            ))),
            Err(_) => {
                self.waiters.lock().await.remove(&id);
                Err(Error::timeout(format!("{} ({}) got no reply", method, id)))
            }
        }
    }

    async fn close(&self) -> Result<(), Error> {
        self.is_active.store(false, Ordering::SeqCst);

        if let Some(mut sink) = self.sink.lock().await.take() {
            debug!("Closing {}", self.url);
            sink.close()
                .await
                .map_err(|e| Error::websocket(format!("Failed to close WebSocket: {}", e)))?;
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }
}
