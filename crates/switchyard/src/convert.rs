//! Conversion of bound argument strings into typed values.
//!
//! [`FromArg`] is the single capability behind every typed accessor on
//! [`Context`](crate::Context) and behind typed prompts. Implement it for
//! your own types to read them straight from arguments:
//!
//! ```
//! use switchyard::FromArg;
//!
//! #[derive(Debug, PartialEq)]
//! enum Level { Low, High }
//!
//! impl FromArg for Level {
//!     const TYPE_NAME: &'static str = "level";
//!
//!     fn from_arg(value: &str) -> Option<Self> {
//!         match value {
//!             "low" => Some(Level::Low),
//!             "high" => Some(Level::High),
//!             _ => None,
//!         }
//!     }
//!
//!     fn examples() -> &'static [&'static str] {
//!         &["low", "high"]
//!     }
//! }
//!
//! assert_eq!(Level::convert("high"), Ok(Level::High));
//! assert!(Level::convert("medium").is_err());
//! ```

use std::path::PathBuf;

use crate::error::ConversionError;

/// Parse a value out of a single argument string.
pub trait FromArg: Sized {
    /// Human readable name of the type, used in error messages.
    const TYPE_NAME: &'static str;

    /// Converts `value`, returning `None` when it is not valid for this type.
    ///
    /// `value` is the argument exactly as given. The built-in impls do not
    /// strip whitespace, so typed and raw access see the same text.
    fn from_arg(value: &str) -> Option<Self>;

    /// Inputs that convert successfully, shown when conversion fails.
    fn examples() -> &'static [&'static str] {
        &[]
    }

    /// Converts `value`, reporting a [`ConversionError`] on failure.
    fn convert(value: &str) -> Result<Self, ConversionError> {
        Self::from_arg(value)
            .ok_or_else(|| ConversionError::new(value, Self::TYPE_NAME, Self::examples()))
    }
}

impl FromArg for String {
    const TYPE_NAME: &'static str = "string";

    fn from_arg(value: &str) -> Option<Self> {
        Some(value.to_string())
    }
}

macro_rules! from_arg_via_from_str {
    ($($ty:ty => $name:literal, [$($example:literal),*]);* $(;)?) => {
        $(
            impl FromArg for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_arg(value: &str) -> Option<Self> {
                    value.parse().ok()
                }

                fn examples() -> &'static [&'static str] {
                    &[$($example),*]
                }
            }
        )*
    };
}

from_arg_via_from_str! {
    i8 => "integer", ["-1", "0", "42"];
    i16 => "integer", ["-1", "0", "42"];
    i32 => "integer", ["-1", "0", "42"];
    i64 => "integer", ["-1", "0", "42"];
    isize => "integer", ["-1", "0", "42"];
    u8 => "unsigned integer", ["0", "1", "42"];
    u16 => "unsigned integer", ["0", "1", "42"];
    u32 => "unsigned integer", ["0", "1", "42"];
    u64 => "unsigned integer", ["0", "1", "42"];
    usize => "unsigned integer", ["0", "1", "42"];
    f32 => "number", ["1", "1.1", "1035.3999"];
    f64 => "number", ["1", "1.1", "1035.3999"];
}

impl FromArg for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_arg(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "yes" | "true" | "1" => Some(true),
            "no" | "false" | "0" => Some(false),
            _ => None,
        }
    }

    fn examples() -> &'static [&'static str] {
        &["yes", "true", "1", "no", "false", "0"]
    }
}

impl FromArg for PathBuf {
    const TYPE_NAME: &'static str = "path";

    fn from_arg(value: &str) -> Option<Self> {
        if value.is_empty() {
            None
        } else {
            Some(PathBuf::from(value))
        }
    }

    fn examples() -> &'static [&'static str] {
        &["~/Desktop", "/usr/local/bin", "directory"]
    }
}

impl FromArg for url::Url {
    const TYPE_NAME: &'static str = "URL";

    fn from_arg(value: &str) -> Option<Self> {
        url::Url::parse(value).ok()
    }

    fn examples() -> &'static [&'static str] {
        &["https://www.github.com", "file:///usr/local/bin"]
    }
}
