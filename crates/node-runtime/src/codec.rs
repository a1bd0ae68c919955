//! Byte encodings owned by the runtime.
//!
//! State signatures travel as system transaction payloads; the ordering
//! layer lifts them back out of the events it orders.

use shared_types::{ConsensusRound, StateSignatureTransaction, Transaction};
use tracing::debug;

use crate::errors::NodeResult;

pub fn encode_state_signature(signature: &StateSignatureTransaction) -> NodeResult<Vec<u8>> {
    Ok(serde_json::to_vec(signature)?)
}

/// `None` for application transactions and foreign system payloads.
pub fn decode_state_signature(transaction: &Transaction) -> Option<StateSignatureTransaction> {
    if !transaction.is_system {
        return None;
    }
    match serde_json::from_slice(&transaction.payload) {
        Ok(signature) => Some(signature),
        Err(err) => {
            debug!(%err, "System transaction is not a state signature");
            None
        }
    }
}

/// Leaves of the state produced by `round`: a header leaf, then one leaf per
/// event in consensus order.
pub fn state_leaves(round: &ConsensusRound) -> Vec<Vec<u8>> {
    let mut header = Vec::with_capacity(16);
    header.extend_from_slice(&round.round_number.to_le_bytes());
    header.extend_from_slice(&round.consensus_timestamp.to_le_bytes());

    std::iter::once(header)
        .chain(round.events.iter().map(|event| event.hash.to_vec()))
        .collect()
}
