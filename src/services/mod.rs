pub mod alert;
pub mod analyzer;
pub mod api_football;
pub mod lookback;
pub mod notifier;
pub mod scheduler;
pub mod selector;
pub mod stats;

#[cfg(test)]
pub mod fakes;

pub use analyzer::{Analyzer, ScanSettings};
pub use api_football::ApiFootball;
pub use notifier::TelegramNotifier;
