//! Scripted gateway playback
//!
//! A connection walks a fixed list of [`Step`]s. Each step waits its delay on
//! the injected [`Clock`], produces one frame, and moves the connection to the
//! next [`ConnectionState`]. Nothing the client sends changes the order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use super::clock::Clock;
use super::message::{GatewayFrame, GatewayMessage};
use super::sink::FrameSink;
use crate::config::{GatewayConfig, MissingArtifact};
use crate::error::{Error, Result};

/// Warning text the status client expects to render
pub const WARNING_TEXT: &str = "some warning idk";

/// Where a connection is in its playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    AwaitingOpen,
    Greeted,
    WarningSent,
    FileSent,
    /// Sequence finished; inbound frames are logged and ignored
    Done,
    /// Artifact unreadable under the `abort` policy
    Aborted,
}

/// What a step puts on the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Greeting,
    Warning(String),
    Artifact(PathBuf),
    Done,
}

impl Payload {
    /// State reached once this payload is out
    pub fn reaches(&self) -> ConnectionState {
        match self {
            Payload::Greeting => ConnectionState::Greeted,
            Payload::Warning(_) => ConnectionState::WarningSent,
            Payload::Artifact(_) => ConnectionState::FileSent,
            Payload::Done => ConnectionState::Done,
        }
    }
}

/// A delay followed by a payload
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub delay: Duration,
    pub payload: Payload,
}

impl Step {
    pub fn new(delay: Duration, payload: Payload) -> Self {
        Step { delay, payload }
    }
}

/// Outcome of one playback run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    pub state: ConnectionState,
    pub frames_sent: usize,
}

enum Rendered {
    Frame(GatewayFrame),
    Skip,
    Abort(GatewayFrame),
}

/// The ordered step list plus the artifact failure policy
#[derive(Debug, Clone)]
pub struct GatewaySequence {
    steps: Vec<Step>,
    missing_artifact: MissingArtifact,
}

impl GatewaySequence {
    pub fn new(steps: Vec<Step>, missing_artifact: MissingArtifact) -> Self {
        GatewaySequence {
            steps,
            missing_artifact,
        }
    }

    /// Greeting, warning, artifact, done
    pub fn from_config(config: &GatewayConfig) -> Self {
        let steps = vec![
            Step::new(Duration::ZERO, Payload::Greeting),
            Step::new(config.warning_delay, Payload::Warning(WARNING_TEXT.to_string())),
            Step::new(config.artifact_delay, Payload::Artifact(config.artifact.clone())),
            Step::new(Duration::ZERO, Payload::Done),
        ];

        Self::new(steps, config.missing_artifact)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Total scripted delay
    pub fn duration(&self) -> Duration {
        self.steps.iter().map(|s| s.delay).sum()
    }

    /// Run every step against `sink`.
    ///
    /// A send failure ends playback with the error; the caller decides how
    /// loudly to report a vanished client.
    pub async fn play<S, C>(&self, sink: &mut S, clock: &C) -> Result<Playback>
    where
        S: FrameSink + ?Sized,
        C: Clock + ?Sized,
    {
        let mut playback = Playback {
            state: ConnectionState::AwaitingOpen,
            frames_sent: 0,
        };

        for step in &self.steps {
            if !step.delay.is_zero() {
                clock.sleep(step.delay).await;
            }

            match self.render(&step.payload, clock).await? {
                Rendered::Frame(frame) => {
                    sink.send_frame(frame).await?;
                    playback.frames_sent += 1;
                }
                Rendered::Skip => {}
                Rendered::Abort(frame) => {
                    sink.send_frame(frame).await?;
                    sink.send_frame(GatewayFrame::Close("artifact unavailable".to_string()))
                        .await?;
                    playback.frames_sent += 2;
                    playback.state = ConnectionState::Aborted;
                    return Ok(playback);
                }
            }

            playback.state = step.payload.reaches();
            debug!(state = ?playback.state, "gateway step sent");
        }

        Ok(playback)
    }

    async fn render<C>(&self, payload: &Payload, clock: &C) -> Result<Rendered>
    where
        C: Clock + ?Sized,
    {
        let message = match payload {
            Payload::Greeting => GatewayMessage::connected(clock.now()),
            Payload::Warning(text) => GatewayMessage::warning(clock.now(), text),
            Payload::Done => GatewayMessage::done(clock.now()),
            Payload::Artifact(path) => return self.render_artifact(path, clock).await,
        };

        Ok(Rendered::Frame(GatewayFrame::message(&message)?))
    }

    async fn render_artifact<C>(&self, path: &Path, clock: &C) -> Result<Rendered>
    where
        C: Clock + ?Sized,
    {
        let err = match tokio::fs::read(path).await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), path = %path.display(), "sending artifact");
                return Ok(Rendered::Frame(GatewayFrame::Binary(bytes)));
            }
            Err(source) => Error::Artifact {
                path: path.to_path_buf(),
                source,
            },
        };

        warn!(policy = %self.missing_artifact, "{}", err);

        Ok(match self.missing_artifact {
            MissingArtifact::Abort => {
                let text = format!("artifact unavailable: {}", path.display());
                Rendered::Abort(GatewayFrame::message(&GatewayMessage::error(clock.now(), &text))?)
            }
            MissingArtifact::Skip => Rendered::Skip,
            MissingArtifact::Empty => Rendered::Frame(GatewayFrame::Binary(Vec::new())),
        })
    }
}
