//! sorokit-core: types shared by the SoroKit codec, poller and RPC client.
//!
//! # Overview
//!
//! - [`EventRecord`] / [`RawEvent`]: contract events as delivered by `getEvents`
//! - [`GetEventsRequest`] / [`GetEventsResponse`]: the event query surface
//! - [`EventSource`]: the async seam every event query backend implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`]: JSON-RPC 2.0 wire types
//! - [`error`]: the error taxonomy used across the workspace

pub mod error;
pub mod event;
pub mod request;
pub mod source;

pub use error::{EncodeError, InvokeError, PollerError, TransportError, WireFormatError};
pub use event::{
    EventFilter, EventRecord, GetEventsRequest, GetEventsResponse, RawEvent, EVENT_TYPE_CONTRACT,
};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use source::EventSource;
