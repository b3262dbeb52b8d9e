//! brrr-scrub: neutralize foreign scripting-API statements in JavaScript.
//!
//! Scripts migrated from another API client reference that client's globals
//! (`pm`, `postman`). [`transform`] comments out every statement that depends
//! on them, directly or through aliases, and leaves everything else
//! byte-for-byte untouched so the rest of the script can still run.
//!
//! ```
//! let script = "const data = pm.response.json();\nconsole.log('done');";
//! assert_eq!(
//!     brrr_scrub::transform(script),
//!     "/* const data = pm.response.json(); */\nconsole.log('done');"
//! );
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod scrub;
pub mod source;

pub use cli::{validate_cli_semantics, Cli, Commands};
pub use config::{
    discover_and_load_config, discover_config, ConfigError, ScrubFileConfig, CONFIG_FILE_NAME,
};
pub use error::{exit_code, Result, ScrubError};
pub use report::ReportFormat;
pub use scrub::{
    transform, LineRange, ParseTier, RootBindings, ScrubConfig, ScrubReport, Scrubber,
};
