pub mod contribution;
pub mod engine;
pub mod index;
pub mod overrides;
pub mod types;
