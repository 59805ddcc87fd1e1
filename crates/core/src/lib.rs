//! Core types, traits, and configuration for J-Quants paper trading.
//!
//! This crate provides:
//! - Instrument codes and daily OHLCV price bars
//! - The `PriceSource` trait that supplies bars to the simulation engine
//! - Simulation configuration with TOML/environment layering
//! - The market-data error taxonomy

pub mod config;
pub mod config_loader;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{MarketFillPrice, SimConfig};
pub use config_loader::ConfigLoader;
pub use error::MarketDataError;
pub use traits::PriceSource;
pub use types::{InvalidStockCode, PriceBar, StockCode};
