use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

pub(crate) static UPDATE_CHECKPOINT_REQUEST: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "distributor_update_checkpoint_request",
        "Total number of update checkpoint requests",
        &["witness_id"]
    )
    .unwrap()
});

pub(crate) static UPDATE_CHECKPOINT_SUCCESS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "distributor_update_checkpoint_success",
        "Total number of successful update checkpoint requests",
        &["witness_id"]
    )
    .unwrap()
});

pub(crate) static GET_CHECKPOINT_N_REQUEST: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "distributor_get_checkpoint_n_request",
        "Total number of get checkpoint.N requests"
    )
    .unwrap()
});

pub(crate) static GET_CHECKPOINT_N_SUCCESS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "distributor_get_checkpoint_n_success",
        "Total number of successful get checkpoint.N requests"
    )
    .unwrap()
});

pub(crate) static GET_CHECKPOINT_WITNESS_REQUEST: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "distributor_get_checkpoint_wit_request",
        "Total number of get checkpoint by witness requests"
    )
    .unwrap()
});

pub(crate) static GET_CHECKPOINT_WITNESS_SUCCESS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "distributor_get_checkpoint_wit_success",
        "Total number of successful get checkpoint by witness requests"
    )
    .unwrap()
});
