use metrics::counter;

pub const OP_READ: &str = "read";
pub const OP_LIST: &str = "list";
pub const OP_CREATE: &str = "create";
pub const OP_UPDATE: &str = "update";
pub const OP_DELETE: &str = "delete";

/// Count one card operation by outcome (`ok`, `not_found`, `error`).
pub fn record_card_operation(operation: &'static str, outcome: &'static str) {
    counter!(
        "card_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
