//! Typed async Rust client for the Megafon OMS SMS gateway SOAP API.
//!
//! The crate follows a layered design: a domain layer of validated strong
//! types, a transport layer for the SOAP/XML wire format (including the
//! flat-XML response decoder and message chunking), and a small client layer
//! orchestrating requests. Responses come back as [`FlatResponse`] mappings
//! keyed by dotted element paths, mirroring the gateway's free-form XML.
//!
//! ```rust,no_run
//! use omsgate::{Credentials, OmsGateClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), omsgate::OmsGateError> {
//!     let credentials = Credentials::new("79251234567", "secret")?;
//!     let mut client = OmsGateClient::new(credentials);
//!     client.init().await?;
//!
//!     let receipt = client
//!         .deliver_xms("+7 (925) 123-45-67", "Hello from omsgate.")
//!         .await?;
//!     println!("{receipt:?}");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{OmsGateClient, OmsGateClientBuilder, OmsGateError};
pub use domain::{
    Credentials, FlatResponse, FlatValue, Password, PhoneNumber, Recipient, UserId,
    ValidationError,
};
pub use transport::{MessageChunk, decode_flat_xml, message_hash, split_message};
