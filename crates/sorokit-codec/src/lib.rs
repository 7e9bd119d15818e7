//! # sorokit-codec
//!
//! Lossless conversion between application values and the typed wire values
//! that Soroban contracts take as arguments and return as results.
//!
//! ```text
//! NativeValue ──encode(hint?)──▶ WireValue ──decode──▶ TypedValue
//!                                  │  ▲
//!                         to_xdr   ▼  │ from_xdr
//!                               XDR bytes ⇄ base64 text
//! ```
//!
//! ## Format conventions
//! - 64-bit values are carried whole; 128-bit values are split into `hi`/`lo`
//!   halves (see [`int128`]).
//! - A wire vec whose first element is a symbol decodes as an enum. A genuine
//!   vec that happens to start with a symbol is indistinguishable; use
//!   [`DecodeMode::RawSequence`] when that matters.

pub mod address;
pub mod decoder;
pub mod encoder;
pub mod event_ext;
pub mod hint;
pub mod int128;
pub mod native;
pub mod value;
pub mod wire;
pub mod xdr;

pub use address::ScAddress;
pub use decoder::{decode, decode_with, DecodeMode};
pub use encoder::{encode, encode_args};
pub use event_ext::DecodeEventExt;
pub use hint::TypeHint;
pub use native::{NativeValue, TypedArg};
pub use value::TypedValue;
pub use wire::{Int128Parts, Int256Parts, UInt128Parts, UInt256Parts, WireValue};
