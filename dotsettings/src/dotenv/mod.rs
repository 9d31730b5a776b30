//! Parsing of `.env` files into ordered raw mappings.
//!
//! The accepted syntax is the common dotenv dialect:
//!
//! ```text
//! # comment
//! export APP_NAME=demo        # trailing comment
//! GREETING='literal #not-a-comment'
//! MOTD="line one\nline two"
//! CERT="-----BEGIN-----
//! abc
//! -----END-----"
//! ```
//!
//! Parsing fails fast on the first malformed entry so a corrupt file never
//! yields partial configuration.

mod encoding;
mod parser;

pub use encoding::FileEncoding;
pub use parser::{ParseError, parse_env_text};

/// Ordered mapping from env-var name to raw string value.
pub type RawMapping = indexmap::IndexMap<String, String>;
