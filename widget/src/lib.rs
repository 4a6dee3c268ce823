//! RupeeConv Widget
//!
//! The INR to USD converter widget: state container, controller that
//! acquires the rate once at mount, text view and configuration.

pub mod config;
pub mod converter;
pub mod state;
pub mod view;
pub mod command;

pub use config::{ConfigError, WidgetConfig};
pub use converter::Converter;
pub use state::{reduce, Action, RatePhase, WidgetState};
