//! Market extrinsic construction.
//!
//! Both constructors are pure: they lay out call arguments in chain
//! argument order and nothing else. Encoding to extrinsic bytes happens at
//! the transport seam, after the connection is confirmed ready.

use serde_json::json;

use crate::ledger::types::{CallData, CallKind};

/// Memo marker the chain uses to distinguish directory orders from files.
const FOLDER_MEMO: &str = "folder";

/// Lay out a `market.placeStorageOrder` call.
///
/// `size` is 0 when the caller only knows the cid (externally-signed
/// flow); `tips` is 0 unless the order should outbid the default queue.
/// The memo is the only argument that differs between files and
/// directories.
pub fn place_storage_order(cid: &str, size: u64, tips: u128, is_directory: bool) -> CallData {
    let memo = if is_directory { FOLDER_MEMO } else { "" };
    CallData::new(
        CallKind::PlaceStorageOrder.method(),
        vec![
            json!(cid),
            json!(size),
            // Balances exceed u64, so they travel as decimal strings.
            json!(tips.to_string()),
            json!(memo),
        ],
    )
}

/// Lay out a `market.addPrepaid` call.
pub fn add_prepaid(cid: &str, amount: u128) -> CallData {
    CallData::new(
        CallKind::AddPrepaid.method(),
        vec![json!(cid), json!(amount.to_string())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_order_call_layout() {
        let call = place_storage_order("QmFile", 1024, 50, false);
        assert_eq!(call.method, "market.placeStorageOrder");
        assert_eq!(call.args[0], "QmFile");
        assert_eq!(call.args[1], 1024);
        assert_eq!(call.args[2], "50");
        assert_eq!(call.args[3], "");
    }

    #[test]
    fn test_directory_memo() {
        let dir = place_storage_order("QmDir", 0, 0, true);
        assert_eq!(dir.args[3], "folder");

        let file = place_storage_order("QmDir", 0, 0, false);
        assert_eq!(file.args[3], "");
    }

    #[test]
    fn test_add_prepaid_call_layout() {
        let call = add_prepaid("QmFile", 1_000_000_000_000);
        assert_eq!(call.method, "market.addPrepaid");
        assert_eq!(call.args[0], "QmFile");
        assert_eq!(call.args[1], "1000000000000");
    }
}
