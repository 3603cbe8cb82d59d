pub mod history;
pub mod service;
pub mod snapshot;
