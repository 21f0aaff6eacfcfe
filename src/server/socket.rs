//! Per-connection gateway task

use async_trait::async_trait;
use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use super::AppState;
use crate::error::Result;
use crate::gateway::{FrameSink, GatewayFrame};

#[async_trait]
impl FrameSink for SplitSink<WebSocket, Message> {
    async fn send_frame(&mut self, frame: GatewayFrame) -> Result<()> {
        let message = match frame {
            GatewayFrame::Text(text) => Message::Text(text.into()),
            GatewayFrame::Binary(bytes) => Message::Binary(bytes.into()),
            GatewayFrame::Close(reason) => Message::Close(Some(CloseFrame {
                code: close_code::ERROR,
                reason: reason.into(),
            })),
        };

        self.send(message).await?;
        Ok(())
    }
}

/// Play the sequence while logging whatever the client sends.
///
/// The server never closes the socket after `done`; the task ends when the
/// client goes away.
pub async fn handle_connection(socket: WebSocket, state: AppState) {
    info!("A client connected");

    let (mut sender, mut receiver) = socket.split();

    let playback = async {
        match state.sequence.play(&mut sender, state.clock.as_ref()).await {
            Ok(playback) => debug!(state = ?playback.state, frames = playback.frames_sent, "gateway playback finished"),
            Err(e) if e.is_disconnect() => debug!("gateway client left during playback: {}", e),
            Err(e) => warn!("gateway playback failed: {}", e),
        }
    };

    let inbound = drain_inbound(&mut receiver);

    tokio::pin!(playback);
    tokio::pin!(inbound);

    tokio::select! {
        () = &mut playback => inbound.await,
        () = &mut inbound => debug!("gateway client left before playback finished"),
    }

    info!("A client disconnected");
}

async fn drain_inbound(receiver: &mut SplitStream<WebSocket>) {
    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => info!("{}", text.as_str()),
            Ok(Message::Binary(bytes)) => debug!(bytes = bytes.len(), "ignoring binary frame from client"),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("gateway read failed: {}", e);
                break;
            }
        }
    }
}
