//! Domain types for ledger writes, confirmations, and event decoding.

mod decode;
mod error;
mod ids;
mod intent;
mod price;
mod receipt;

pub use decode::decode_token_id;
pub use error::LedgerDomainError;
pub use ids::{CallerIdentity, TokenId, TransactionHandle};
pub use intent::{AgentMetadata, ContractEndpoint, TransactionCall, TransactionIntent};
pub use price::PricePerCall;
pub use receipt::{EventRecord, Receipt, ReceiptStatus, extract_revert_reason};
