pub mod api;
pub mod config;
pub mod healthz;
pub mod monitor;
pub mod thermostat;

#[cfg(test)]
pub(crate) mod test_support;
