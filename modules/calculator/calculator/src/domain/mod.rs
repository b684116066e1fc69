pub mod format;
pub mod input;
pub mod repo;
pub mod service;
pub mod session;

#[cfg(test)]
mod service_test;
