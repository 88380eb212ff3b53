//! Listen-key lifecycle manager (§3, §4.5): ties the REST pipeline's
//! acquire/renew calls to the WebSocket connection they authenticate.

use crate::client::RestClient;
use crate::error::Result;
use crate::ws::{FuturesWsStream, PendingSubscriptions};

/// A user-data WebSocket stream bound to a listen key, with renewal handled
/// automatically by the owning [`RestClient`]'s background task.
pub struct UserDataStream {
    client: RestClient,
    listen_key: String,
}

impl UserDataStream {
    /// Acquire a listen key, install its 59-minute renewal timer, and open
    /// the bound WebSocket connection (§3 "Listen-key lifecycle",
    /// §8 "Listen-key renewal").
    pub async fn connect(client: RestClient) -> Result<(Self, FuturesWsStream)> {
        let listen_key = client.create_listen_key().await?;
        client.spawn_listen_key_renewal().await;
        let ws = FuturesWsStream::connect_with_listen_key(&listen_key, PendingSubscriptions::new()).await?;
        Ok((
            Self {
                client,
                listen_key,
            },
            ws,
        ))
    }

    pub fn listen_key(&self) -> &str {
        &self.listen_key
    }

    /// The REST pipeline renewing this listen key's TTL.
    pub fn client(&self) -> &RestClient {
        &self.client
    }
}
