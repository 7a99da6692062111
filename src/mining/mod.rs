pub mod engine;

pub use engine::MiningEngine;
