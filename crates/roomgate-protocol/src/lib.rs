//! Wire protocol for Roomgate.
//!
//! - **Types** ([`Command`], [`Response`], [`RoomSnapshot`]): the JSON
//!   objects exchanged between workers and the server.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those objects are
//!   converted to and from bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! The field names and enum values on the wire are Portuguese
//! (`acao`, `entrar`, `sucesso`, ...); the Rust names are not.
//!
//! ```text
//! Transport (bytes) → Protocol (Command / Response) → Room
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Action, Command, HistoryEntry, MSG_ENTRY_DENIED, MSG_ENTRY_GRANTED,
    MSG_EXIT_DENIED, MSG_EXIT_RECORDED, MSG_INVALID_COMMAND, MSG_INVALID_FORMAT,
    Response, ResponseStatus, RoomSnapshot, now_timestamp,
};
