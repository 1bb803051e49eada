//! Transport-agnostic command protocol.
//!
//! JSON text frames in, JSON snapshots and error frames out.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      RPC Stack                             │
//! │                                                            │
//! │  ┌──────────┐   ┌──────────┐   ┌───────────────────────┐  │
//! │  │ Channels │──▶│  Codec   │──▶│  Engine (dispatcher)  │  │
//! │  │ (inbox)  │   │  (JSON)  │   │  → AppService         │  │
//! │  └──────────┘   └──────────┘   └───────────────────────┘  │
//! │                                            │               │
//! │                      ┌─────────────────────┘               │
//! │                      ▼                                     │
//! │  ┌──────────┐   ┌──────────┐                               │
//! │  │ Transport│◀──│  Stream  │   (snapshots + heartbeat)     │
//! │  │ (trait)  │   │  (push)  │                               │
//! │  └──────────┘   └──────────┘                               │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod channels;
pub mod codec;
pub mod engine;
pub mod stream;
pub mod transport;
