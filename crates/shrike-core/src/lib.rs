pub mod config;
pub mod error;
pub mod report;
pub mod selectors;

pub use config::{LoadWaitPolicy, SmokeConfig, Viewport};
pub use error::{Error, Result};
pub use report::{ConsoleLevel, ConsoleMessage, ElementSummary, LinkSample, SmokeReport};
pub use selectors::{SelectorGroup, selector_groups};
