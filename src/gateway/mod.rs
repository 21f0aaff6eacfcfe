//! Gateway module - scripted WebSocket feed
//!
//! Every client that connects to `/ws/gateway` gets the same playback:
//!
//! ```text
//!   t=0        success  {connected: true}
//!   +1000ms    warning  {message: "some warning idk"}
//!   +2500ms    <binary artifact bytes>
//!   +0         success  {done: true}
//! ```
//!
//! after which the socket stays open and inbound text is only logged.

pub mod clock;
pub mod message;
pub mod sequence;
pub mod sink;

pub use clock::{Clock, ManualClock, SystemClock};
pub use message::{GatewayFrame, GatewayMessage, Level};
pub use sequence::{ConnectionState, GatewaySequence, Payload, Playback, Step, WARNING_TEXT};
pub use sink::FrameSink;
