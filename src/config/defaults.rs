pub(super) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub(super) const MIN_RESPONSE_BYTES: usize = 1024;
pub(super) const MAX_RESPONSE_BYTES: usize = 256 * 1024 * 1024;

pub(super) fn clamp_max_response_bytes(value: usize) -> usize {
    value.clamp(MIN_RESPONSE_BYTES, MAX_RESPONSE_BYTES)
}

pub(super) fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(super) fn default_connect_timeout_secs() -> u64 {
    10
}

pub(super) fn default_read_timeout_secs() -> u64 {
    120
}

pub(super) fn default_write_timeout_secs() -> u64 {
    60
}

pub(super) fn default_max_response_bytes() -> usize {
    16 * 1024 * 1024
}

pub(super) fn default_acquisition_cost() -> f64 {
    2.0
}

pub(super) fn default_revenue_per_user() -> f64 {
    97.0
}

pub(super) fn default_retention_rate() -> f64 {
    3.0
}

pub(super) fn default_number_of_customers() -> f64 {
    3.0
}
