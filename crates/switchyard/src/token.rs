//! Lexical classification of raw arguments.
//!
//! Every raw argument becomes exactly one [`Token`] carrying its position in
//! the raw argument vector. The resolver uses that index to look one token ahead
//! (an option's value) or one token behind (was this value already consumed
//! by an option?).
//!
//! | Raw argument | Token |
//! |--------------|-------|
//! | `--name` | [`TokenKind::LongOption`] |
//! | `-c` | [`TokenKind::ShortOption`] |
//! | `-abc` | [`TokenKind::OptionSet`] |
//! | `-`, `--`, anything else | [`TokenKind::Parameter`] |
//!
//! The literal `==` ends argument processing. Tokens from the terminator on
//! are never resolved; the raw strings after it are available through
//! [`Tokens::passthrough`].

/// Argument that stops resolution; everything after it is passed through.
pub const TERMINATOR: &str = "==";

/// What a single raw argument looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `-c`
    ShortOption(char),
    /// `--name`
    LongOption(String),
    /// `-abc`, several short names behind one dash.
    OptionSet(Vec<char>),
    /// A plain value.
    Parameter(String),
}

/// A classified argument and its index in the raw argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    index: usize,
    kind: TokenKind,
}

impl Token {
    /// Classifies `raw`, found at `index` in the argument vector.
    pub fn classify(index: usize, raw: &str) -> Self {
        let length = raw.chars().count();

        let kind = if let Some(long) = raw.strip_prefix("--").filter(|_| length > 2) {
            TokenKind::LongOption(long.to_string())
        } else if let Some(short) = raw.strip_prefix('-').filter(|_| length > 1) {
            let mut chars: Vec<char> = short.chars().collect();
            if chars.len() == 1 {
                TokenKind::ShortOption(chars.remove(0))
            } else {
                TokenKind::OptionSet(chars)
            }
        } else {
            TokenKind::Parameter(raw.to_string())
        };

        Self { index, kind }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// The value of a [`TokenKind::Parameter`] token.
    pub fn parameter(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Parameter(value) => Some(value),
            _ => None,
        }
    }
}

/// The tokenized argument vector of one invocation.
#[derive(Debug, Clone)]
pub struct Tokens {
    raw: Vec<String>,
    tokens: Vec<Token>,
    end: usize,
}

/// Tokenizes a raw argument vector whose first element is the executable.
///
/// Fails only when `args` is empty.
///
/// ```
/// use switchyard::token::{tokenize, TokenKind};
///
/// let tokens = tokenize(["app", "-vo", "out.txt", "--dry-run"]).unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind().clone()).collect();
/// assert_eq!(kinds[1], TokenKind::OptionSet(vec!['v', 'o']));
/// assert_eq!(kinds[3], TokenKind::LongOption("dry-run".into()));
/// ```
pub fn tokenize<I, S>(args: I) -> Result<Tokens, crate::CommandError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let raw: Vec<String> = args.into_iter().map(Into::into).collect();
    if raw.is_empty() {
        return Err(crate::CommandError::EmptyInput);
    }

    let tokens: Vec<Token> = raw
        .iter()
        .enumerate()
        .map(|(index, argument)| Token::classify(index, argument))
        .collect();

    let end = raw
        .iter()
        .skip(1)
        .position(|argument| argument == TERMINATOR)
        .map(|position| position + 1)
        .unwrap_or(raw.len());

    Ok(Tokens { raw, tokens, end })
}

impl Tokens {
    /// The executable as given in the first argument.
    pub fn executable(&self) -> &str {
        &self.raw[0]
    }

    /// The executable's file name, without any leading directories.
    pub fn executable_name(&self) -> &str {
        let executable = self.executable();
        executable.rsplit('/').next().unwrap_or(executable)
    }

    /// The argument vector as given.
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    /// Every token, including those at and after the terminator.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Tokens the resolver may look at: everything before the terminator.
    pub fn active(&self) -> &[Token] {
        &self.tokens[..self.end]
    }

    /// Raw arguments that follow the `==` terminator.
    pub fn passthrough(&self) -> &[String] {
        self.raw.get(self.end + 1..).unwrap_or(&[])
    }

    /// Whether the argument vector contained the terminator.
    pub fn is_terminated(&self) -> bool {
        self.end < self.raw.len()
    }

    /// The active token directly after `index`, if there is one.
    pub fn after(&self, index: usize) -> Option<&Token> {
        self.active().get(index + 1)
    }

    /// The active token directly before `index`, if there is one.
    pub fn before(&self, index: usize) -> Option<&Token> {
        index
            .checked_sub(1)
            .and_then(|previous| self.active().get(previous))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always `false`: a token list holds at least the executable.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
