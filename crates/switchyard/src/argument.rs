//! Static argument declarations: flags, options and positional parameters.
//!
//! Declarations are built once, usually as `static`-like values shared by the
//! command tree, and never change afterwards. Flags and options are
//! identified by their [`ArgumentName`]; parameters by their name.
//!
//! # Reserved names
//!
//! Every command answers `-h` and `--help` on its own, so declaring a flag or
//! option named `help` or `h` is a configuration mistake. The constructors
//! panic immediately instead of letting the declaration fail at parse time.
//!
//! ```
//! use switchyard::{Flag, Opt, Parameter};
//!
//! let verbose = Flag::both("verbose", 'v', "Print verbose output");
//! let count = Opt::both("count", 'n', "Repeat n times").placeholder("n");
//! let message = Parameter::new("message", "Message to print");
//!
//! assert_eq!(verbose.to_string(), "-v, --verbose");
//! assert_eq!(count.placeholder_text(), "n");
//! assert_eq!(message.name(), "message");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

/// Long name every command reserves for its usage text.
pub const HELP_LONG: &str = "help";

/// Short name every command reserves for its usage text.
pub const HELP_SHORT: char = 'h';

/// Name of a flag or an option: a short character, a long string, or both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentName {
    /// Single character name, passed as `-c`.
    Short(char),
    /// Long name, passed as `--name`.
    Long(String),
    /// Both a long and a short name.
    Both(String, char),
}

impl ArgumentName {
    /// The long name, if any.
    pub fn long(&self) -> Option<&str> {
        match self {
            ArgumentName::Long(long) | ArgumentName::Both(long, _) => Some(long),
            ArgumentName::Short(_) => None,
        }
    }

    /// The short name, if any.
    pub fn short(&self) -> Option<char> {
        match self {
            ArgumentName::Short(short) | ArgumentName::Both(_, short) => Some(*short),
            ArgumentName::Long(_) => None,
        }
    }

    /// Returns `true` if either name collides with the implicit help switch.
    pub fn is_reserved(&self) -> bool {
        self.long() == Some(HELP_LONG) || self.short() == Some(HELP_SHORT)
    }

    fn assert_not_reserved(&self) {
        assert!(
            !self.is_reserved(),
            "argument name `{}` is reserved for the implicit -h/--help switch",
            self
        );
    }
}

impl fmt::Display for ArgumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentName::Short(short) => write!(f, "-{}", short),
            ArgumentName::Long(long) => write!(f, "--{}", long),
            ArgumentName::Both(long, short) => write!(f, "-{}, --{}", short, long),
        }
    }
}

/// Anything declared by an [`ArgumentName`].
pub(crate) trait Named {
    fn argument_name(&self) -> &ArgumentName;
}

/// Finds the declaration whose long name is exactly `name`.
pub(crate) fn find_long<'a, A: Named>(items: &'a [A], name: &str) -> Option<&'a A> {
    items
        .iter()
        .find(|item| item.argument_name().long() == Some(name))
}

/// Finds the declaration whose short name is exactly `short`.
pub(crate) fn find_short<A: Named>(items: &[A], short: char) -> Option<&A> {
    items
        .iter()
        .find(|item| item.argument_name().short() == Some(short))
}

/// Presence-only switch, e.g. `--verbose` or `-v`.
///
/// Flags can also be bundled behind a single dash (`-abc`).
#[derive(Debug, Clone)]
pub struct Flag {
    name: ArgumentName,
    summary: String,
}

impl Flag {
    /// Creates a flag from an explicit name.
    ///
    /// # Panics
    ///
    /// Panics if the name uses `help` or `h`.
    pub fn new(name: ArgumentName, summary: impl Into<String>) -> Self {
        name.assert_not_reserved();
        Self {
            name,
            summary: summary.into(),
        }
    }

    /// Creates a flag with a long name only.
    pub fn long(long: impl Into<String>, summary: impl Into<String>) -> Self {
        Self::new(ArgumentName::Long(long.into()), summary)
    }

    /// Creates a flag with a short name only.
    pub fn short(short: char, summary: impl Into<String>) -> Self {
        Self::new(ArgumentName::Short(short), summary)
    }

    /// Creates a flag with both a long and a short name.
    pub fn both(long: impl Into<String>, short: char, summary: impl Into<String>) -> Self {
        Self::new(ArgumentName::Both(long.into(), short), summary)
    }

    pub fn name(&self) -> &ArgumentName {
        &self.name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// Key/value argument bound to exactly one value, e.g. `--output file.txt`.
///
/// When an option's short name is the last character of a bundled set, the
/// value is taken from the next argument: `-vo file.txt`.
#[derive(Debug, Clone)]
pub struct Opt {
    name: ArgumentName,
    summary: String,
    placeholder: String,
}

impl Opt {
    /// Creates an option from an explicit name. The placeholder shown in
    /// usage defaults to `value`.
    ///
    /// # Panics
    ///
    /// Panics if the name uses `help` or `h`.
    pub fn new(name: ArgumentName, summary: impl Into<String>) -> Self {
        name.assert_not_reserved();
        Self {
            name,
            summary: summary.into(),
            placeholder: "value".to_string(),
        }
    }

    /// Creates an option with a long name only.
    pub fn long(long: impl Into<String>, summary: impl Into<String>) -> Self {
        Self::new(ArgumentName::Long(long.into()), summary)
    }

    /// Creates an option with a short name only.
    pub fn short(short: char, summary: impl Into<String>) -> Self {
        Self::new(ArgumentName::Short(short), summary)
    }

    /// Creates an option with both a long and a short name.
    pub fn both(long: impl Into<String>, short: char, summary: impl Into<String>) -> Self {
        Self::new(ArgumentName::Both(long.into(), short), summary)
    }

    /// Sets the value placeholder shown in usage (`--output <path>`).
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn name(&self) -> &ArgumentName {
        &self.name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn placeholder_text(&self) -> &str {
        &self.placeholder
    }
}

/// Positional argument, bound by position in declaration order.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    summary: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}

macro_rules! identity_by_name {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.name == other.name
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.name.hash(state);
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.name, f)
            }
        }
    };
}

identity_by_name!(Flag);
identity_by_name!(Opt);
identity_by_name!(Parameter);

impl Named for Flag {
    fn argument_name(&self) -> &ArgumentName {
        &self.name
    }
}

impl Named for Opt {
    fn argument_name(&self) -> &ArgumentName {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn name_accessors() {
        let both = ArgumentName::Both("verbose".into(), 'v');
        assert_eq!(both.long(), Some("verbose"));
        assert_eq!(both.short(), Some('v'));

        assert_eq!(ArgumentName::Short('q').long(), None);
        assert_eq!(ArgumentName::Long("quiet".into()).short(), None);
    }

    #[test]
    fn name_display() {
        assert_eq!(ArgumentName::Short('v').to_string(), "-v");
        assert_eq!(ArgumentName::Long("verbose".into()).to_string(), "--verbose");
        assert_eq!(
            ArgumentName::Both("verbose".into(), 'v').to_string(),
            "-v, --verbose"
        );
    }

    #[test]
    fn identity_ignores_summary() {
        let a = Flag::both("verbose", 'v', "one");
        let b = Flag::both("verbose", 'v', "two");
        assert_eq!(a, b);

        let set: HashSet<Flag> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn short_and_both_are_distinct_identities() {
        assert_ne!(Flag::short('v', ""), Flag::both("verbose", 'v', ""));
    }

    #[test]
    fn lookup_by_either_name_finds_same_declaration() {
        let options = vec![
            Opt::both("output", 'o', "Output file"),
            Opt::long("format", "Format"),
        ];

        let by_long = find_long(&options, "output").unwrap();
        let by_short = find_short(&options, 'o').unwrap();
        assert_eq!(by_long, by_short);
        assert!(find_short(&options, 'f').is_none());
        assert!(find_long(&options, "out").is_none());
    }

    #[test]
    fn option_placeholder_defaults_to_value() {
        assert_eq!(Opt::long("file", "").placeholder_text(), "value");
        assert_eq!(
            Opt::long("file", "").placeholder("path").placeholder_text(),
            "path"
        );
    }

    #[test]
    #[should_panic(expected = "reserved")]
    fn long_help_is_reserved() {
        Flag::long("help", "nope");
    }

    #[test]
    #[should_panic(expected = "reserved")]
    fn short_h_is_reserved() {
        Opt::both("host", 'h', "nope");
    }
}
