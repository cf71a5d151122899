use chrono::{DateTime, SecondsFormat, Utc};
use md5::{Digest, Md5};

use crate::domain::{Password, Recipient, UserId};
use crate::transport::user_info::user_element;
use crate::transport::xml::{push_attribute, text_element};

/// Service the gateway must route deliveries through.
pub const REQUIRED_SERVICE: &str = "SMS_SENDER";

/// Content type attached to every chunk.
pub const CHUNK_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One bounded-length segment of an outbound message.
///
/// `text` carries the `(i/total)` prefix when the message was split; the
/// prefix is not counted against the chunk-size limit, so a prefixed chunk
/// may exceed the nominal maximum.
pub struct MessageChunk {
    pub text: String,
    pub content_id: String,
    pub content_location: String,
}

/// Hex digest of the full message text, uppercased.
///
/// Chunk content identifiers embed this digest, which makes them
/// deterministic for identical message text.
pub fn message_hash(message: &str) -> String {
    hex::encode_upper(Md5::digest(message.as_bytes()))
}

/// Split `message` into chunks of at most `limit` characters.
///
/// `limit` must be positive. Content identifiers carry the running 0-based
/// chunk index and the message digest split into two fixed-width parts:
/// `Att<i>.txt@<digest[..16]>.<digest[16..]>`.
pub fn split_message(message: &str, limit: usize) -> Vec<MessageChunk> {
    debug_assert!(limit > 0);

    let hash = message_hash(message);
    let chars: Vec<char> = message.chars().collect();
    let total = chars.len().div_ceil(limit).max(1);

    let mut chunks = Vec::with_capacity(total);
    for index in 0..total {
        let start = index * limit;
        let end = (start + limit).min(chars.len());
        let piece: String = chars[start..end].iter().collect();
        let text = if total > 1 {
            format!("({}/{total}){piece}", index + 1)
        } else {
            piece
        };

        chunks.push(MessageChunk {
            text,
            content_id: format!("Att{index}.txt@{}.{}", &hash[..16], &hash[16..]),
            content_location: format!("{index}.txt"),
        });
    }

    chunks
}

/// Build the `xmsData` request document for `DeliverXms`.
pub fn encode_xms_data(
    user: &UserId,
    password: &Password,
    recipient: &Recipient,
    scheduled: DateTime<Utc>,
    chunks: &[MessageChunk],
) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str("<xmsData>");

    user_element(&mut xml, "user", user, password);

    xml.push_str("<xmsHead>");
    text_element(
        &mut xml,
        "scheduled",
        &scheduled.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    text_element(&mut xml, "requiredService", REQUIRED_SERVICE);
    xml.push_str("<to>");
    text_element(&mut xml, Recipient::FIELD, recipient.as_str());
    xml.push_str("</to></xmsHead>");

    xml.push_str("<xmsBody");
    push_attribute(&mut xml, "format", "SMS");
    xml.push('>');
    for chunk in chunks {
        xml.push_str("<content");
        push_attribute(&mut xml, "contentType", CHUNK_CONTENT_TYPE);
        push_attribute(&mut xml, "contentId", &chunk.content_id);
        push_attribute(&mut xml, "contentLocation", &chunk.content_location);
        xml.push('>');
        xml.push_str(&quick_xml::escape::escape(&chunk.text));
        xml.push_str("</content>");
    }
    xml.push_str("</xmsBody></xmsData>");

    xml
}
