//! Best-effort extraction of domain identifiers from receipt events.

use super::{EventRecord, Receipt, TokenId};

/// Argument key expected to carry the minted token identifier.
const TOKEN_ID_ARG: &str = "tokenId";

/// Scans a receipt's events for a minted token identifier.
///
/// Events are visited in emission order; the first event whose name is in
/// `event_names` and whose arguments contain a decodable `tokenId` wins.
/// Ties between several matching events are broken by earliest emission
/// order, never by name priority. Events that fail to decode (for
/// example, entries belonging to an unrelated contract) are skipped.
///
/// Returns `None` when no matching event is found; the caller decides
/// whether a missing identifier is fatal.
#[must_use]
pub fn decode_token_id(receipt: &Receipt, event_names: &[&str]) -> Option<TokenId> {
    receipt
        .events()
        .iter()
        .filter(|event| event_names.contains(&event.name()))
        .find_map(event_token_id)
}

/// Attempts a typed decode of one event's token identifier argument.
fn event_token_id(event: &EventRecord) -> Option<TokenId> {
    match event.arg(TOKEN_ID_ARG)? {
        serde_json::Value::Number(number) => number.as_u64().map(TokenId::new),
        serde_json::Value::String(text) => text.trim().parse().ok().map(TokenId::new),
        _ => None,
    }
}
