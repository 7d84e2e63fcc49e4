//! Metrics collection.
//!
//! Emitted through the `metrics` facade; nothing is recorded unless the
//! embedding application installs a recorder.
//!
//! # Metrics
//! - `reward_rpc_health` (gauge): 1=reachable, 0=unreachable
//! - `reward_contract_calls_total` (counter): contract calls by method, result
//! - `reward_claims_total` (counter): claim attempts by terminal outcome
//! - `reward_gas_estimate` (histogram): raw gas estimates

use metrics::{counter, gauge, histogram};

/// Record RPC endpoint reachability.
pub fn record_rpc_health(endpoint: &str, healthy: bool) {
    gauge!("reward_rpc_health", "endpoint" => endpoint.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

/// Record the result of a single contract call.
pub fn record_contract_call(method: &'static str, ok: bool) {
    counter!(
        "reward_contract_calls_total",
        "method" => method,
        "result" => if ok { "ok" } else { "error" }
    )
    .increment(1);
}

/// Record how a claim attempt ended.
pub fn record_claim_outcome(outcome: &'static str) {
    counter!("reward_claims_total", "outcome" => outcome).increment(1);
}

/// Record a raw gas estimate.
pub fn record_gas_estimate(estimate: u64) {
    histogram!("reward_gas_estimate").record(estimate as f64);
}
