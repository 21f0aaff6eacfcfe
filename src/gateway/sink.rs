//! Destination for gateway frames

use async_trait::async_trait;

use super::message::GatewayFrame;
use crate::error::Result;

/// Anything playback can write frames to
#[async_trait]
pub trait FrameSink: Send {
    async fn send_frame(&mut self, frame: GatewayFrame) -> Result<()>;
}

/// Collects frames in memory
#[async_trait]
impl FrameSink for Vec<GatewayFrame> {
    async fn send_frame(&mut self, frame: GatewayFrame) -> Result<()> {
        self.push(frame);
        Ok(())
    }
}
