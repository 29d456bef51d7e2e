//! Macro for implementing Display and FromStr for simple domain enums
//!
//! # Example
//!
//! ```rust
//! use daytrace_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Freshness {
//!     Fresh,
//!     Stale,
//! }
//!
//! impl_domain_status_conversions!(Freshness {
//!     Fresh => "fresh",
//!     Stale => "stale",
//! });
//!
//! assert_eq!(Freshness::Stale.to_string(), "stale");
//! assert_eq!("FRESH".parse::<Freshness>(), Ok(Freshness::Fresh));
//! ```

/// Implements Display and FromStr traits for unit-variant enums
///
/// - Display writes the mapped lowercase string
/// - FromStr parses case-insensitively and names the enum in its error
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
