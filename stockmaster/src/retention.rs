//! Snapshot retention.

use crate::remote::SnapshotRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct RetentionDecision {
    pub keep: Vec<SnapshotRecord>,
    pub delete: Vec<SnapshotRecord>,
}

pub struct RetentionPolicy;

impl RetentionPolicy {
    /// Keep the newest `keep_count` snapshots and mark the rest for deletion.
    ///
    /// Records are ordered by `created_at` descending with a stable sort, so
    /// snapshots sharing a timestamp stay in the order the store returned them.
    pub fn decide(records: &[SnapshotRecord], keep_count: usize) -> RetentionDecision {
        let mut sorted = records.to_vec();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if sorted.len() <= keep_count {
            return RetentionDecision {
                keep: sorted,
                delete: Vec::new(),
            };
        }

        let delete = sorted.split_off(keep_count);
        RetentionDecision {
            keep: sorted,
            delete,
        }
    }
}
