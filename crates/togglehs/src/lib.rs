pub mod app;
pub mod domain;
pub mod infra;
pub mod ui;

/// Install logging; `verbosity` is the number of `-v` flags given.
pub fn init(verbosity: u8) {
    infra::logging::init(verbosity);
}
