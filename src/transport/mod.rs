//! Transport layer: SOAP envelopes and wire-format details (XML encode/decode).

mod deliver;
mod envelope;
mod flat;
mod user_info;
mod xml;

pub use deliver::{
    CHUNK_CONTENT_TYPE, MessageChunk, REQUIRED_SERVICE, encode_xms_data, message_hash,
    split_message,
};
pub use envelope::{SoapFault, build_envelope, extract_fault, extract_result, soap_action};
pub use flat::decode_flat_xml;
pub use user_info::encode_xms_user;
