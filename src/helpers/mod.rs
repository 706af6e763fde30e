//! Helper functions for templates
//!
//! Date formatting and route building shared by the generator and the
//! preview server.

mod date;
mod url;

pub use self::date::*;
pub use self::url::*;
