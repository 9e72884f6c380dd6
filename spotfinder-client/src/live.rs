use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt as _, StreamExt as _};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest as _, http::HeaderValue, Message},
    MaybeTlsStream, WebSocketStream,
};

use crate::{
    credentials::{authorization_header, CredentialProvider},
    json::{LiveCommand, LiveEvent},
    Error, Result,
};

/// Opens push channels to the server.
#[async_trait]
pub trait LiveConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn LiveChannel>>;
}

/// A single open push channel.
#[async_trait]
pub trait LiveChannel: Send {
    async fn send(&mut self, command: &LiveCommand) -> Result<()>;

    /// The next event from the server or `None` after the channel
    /// has been closed.
    ///
    /// Must be cancel safe.
    async fn next_event(&mut self) -> Option<Result<LiveEvent>>;

    async fn close(&mut self);
}

/// Connects to the websocket endpoint of the server.
pub struct WsConnector {
    url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl WsConnector {
    /// `url` of the live endpoint, e.g. `wss://example.com/api/live`.
    pub fn new(url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            url: url.into(),
            credentials,
        }
    }
}

#[async_trait]
impl LiveConnector for WsConnector {
    async fn connect(&self) -> Result<Box<dyn LiveChannel>> {
        let mut request = self.url.as_str().into_client_request()?;
        if let Some(value) = authorization_header(&*self.credentials).await {
            let value =
                HeaderValue::from_str(&value).map_err(|err| Error::InvalidInput(err.to_string()))?;
            request.headers_mut().insert("Authorization", value);
        }
        let (stream, _) = connect_async(request).await?;
        log::debug!("Connected to {}", self.url);
        Ok(Box::new(WsChannel { stream }))
    }
}

struct WsChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl LiveChannel for WsChannel {
    async fn send(&mut self, command: &LiveCommand) -> Result<()> {
        let text = serde_json::to_string(command)?;
        self.stream.send(Message::text(text)).await?;
        Ok(())
    }

    async fn next_event(&mut self) -> Option<Result<LiveEvent>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(err) => return Some(Err(err.into())),
            };
            match message {
                Message::Text(text) => {
                    return Some(serde_json::from_str(text.as_str()).map_err(Into::into));
                }
                Message::Close(frame) => {
                    log::debug!("Live channel closed by server: {frame:?}");
                    return None;
                }
                // Pings are answered by the protocol implementation
                _ => continue,
            }
        }
    }

    async fn close(&mut self) {
        if let Err(err) = self.stream.close(None).await {
            log::debug!("Failed to close live channel: {err}");
        }
    }
}
