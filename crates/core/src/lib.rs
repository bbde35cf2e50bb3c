#[doc(hidden)]
pub use regex as __regex;

/// Declares a lazily compiled, process-wide regex accessor.
#[macro_export]
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static $crate::__regex::Regex {
            static R: ::std::sync::OnceLock<$crate::__regex::Regex> = ::std::sync::OnceLock::new();
            R.get_or_init(|| $crate::__regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub mod amount;
pub mod config;
pub mod date;
pub mod invoice;
pub mod report;
pub mod text;
pub mod transaction;

pub use amount::{decimal_from_f64, format_amount, parse_amount};
pub use config::{AssignmentMode, ConfigError, EnrichmentConfig, MatchingConfig, Settings};
pub use date::parse_date;
pub use invoice::{InvoiceFields, InvoiceRecord, DEFAULT_CURRENCY};
pub use report::MatchResult;
pub use text::{fold_accents, normalize_label};
pub use transaction::Transaction;
