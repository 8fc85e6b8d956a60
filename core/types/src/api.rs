//! HTTP paths of the distributor API.

pub const HTTP_GET_LOGS: &str = "/distributor/v0/logs";
pub const HTTP_GET_WITNESSES: &str = "/distributor/v0/witnesses";

/// Prefix of the final path segment of a `checkpoint.N` request.
pub const CHECKPOINT_N_PREFIX: &str = "checkpoint.";

/// Path of the merged checkpoint with `n` witness signatures. Path segments must already be
/// percent-encoded.
pub fn checkpoint_n_path(log_id: &str, n: u32) -> String {
    format!("{HTTP_GET_LOGS}/{log_id}/{CHECKPOINT_N_PREFIX}{n}")
}

/// Path used both to fetch and to submit a witness's checkpoint for a log. Path segments must
/// already be percent-encoded.
pub fn checkpoint_by_witness_path(log_id: &str, witness_id: &str) -> String {
    format!("{HTTP_GET_LOGS}/{log_id}/byWitness/{witness_id}/checkpoint")
}

/// Parse the `N` out of a `checkpoint.N` path segment.
pub fn parse_checkpoint_n_segment(segment: &str) -> Option<u32> {
    let n = segment.strip_prefix(CHECKPOINT_N_PREFIX)?;
    if n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    n.parse().ok()
}
