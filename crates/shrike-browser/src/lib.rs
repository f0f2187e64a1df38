mod chrome_finder;
mod console;
mod error;
mod profile;
mod session;
mod tester;

pub use chrome_finder::ChromeFinder;
pub use console::ConsoleObserver;
pub use error::{Error, Result};
pub use profile::TempProfile;
pub use session::BrowserSession;
pub use tester::{SmokeTester, screenshot_file_names};
