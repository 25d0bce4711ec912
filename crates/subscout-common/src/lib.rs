//! Subscout-Common: Shared types and errors.
//!
//! - **Typed IDs**: wrappers for Plex part, stream, and account ids
//! - **Core Types**: videos, media parts, subtitle tracks, playback sessions
//! - **Path Utilities**: subtitle format detection by extension
//! - **Error Handling**: common error type and result alias
//!
//! # Examples
//!
//! ```
//! use subscout_common::{Error, LanguageCode, Result};
//!
//! let eng = LanguageCode::new("ENG");
//! assert_eq!(eng.as_str(), "eng");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("video"))
//! }
//! assert!(example().unwrap_err().is_not_found());
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
