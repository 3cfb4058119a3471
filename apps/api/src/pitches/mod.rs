// Persistence gateway: storage seam, authorized operations and read-side aggregates.

pub mod export;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repository;
pub mod service;
pub mod stats;
