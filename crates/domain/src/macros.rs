//! Text form of enum-valued configuration options
//!
//! Options such as the duplicate enrichment policy appear as strings in
//! config files and `FRAPLIN_*` variables. [`impl_config_option!`] gives an
//! enum its canonical spelling, a `FromStr` that reports
//! `FraplinError::Config`, and the list of accepted spellings.
//!
//! ```rust
//! use fraplin_domain::impl_config_option;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum OutputFormat {
//!     Text,
//!     Json,
//! }
//!
//! impl_config_option!(OutputFormat {
//!     Text => "text",
//!     Json => "json",
//! });
//!
//! assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
//! assert_eq!(OutputFormat::ACCEPTED, &["text", "json"]);
//! ```

/// Implements `Display`, `FromStr` and an `ACCEPTED` list for an option enum.
///
/// Parsing trims surrounding whitespace, ignores case and treats `-` as
/// `_`, so `First-Wins` matches `first_wins`.
#[macro_export]
macro_rules! impl_config_option {
    ($enum_name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical spellings, in declaration order.
            pub const ACCEPTED: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::errors::FraplinError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
                match normalized.as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err($crate::errors::FraplinError::Config(format!(
                        "invalid {} '{}', expected one of: {}",
                        stringify!($enum_name),
                        s,
                        Self::ACCEPTED.join(", ")
                    ))),
                }
            }
        }
    };
}
