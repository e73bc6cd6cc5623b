pub mod error;

pub use error::{GazetteError, Result};
