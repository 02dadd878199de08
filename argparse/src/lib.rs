//! Hierarchical command-line argument parsing.
//!
//! A [`Parser`] owns a tree of [`Scope`]s: the root and any number of nested subcommands, each
//! with its own named options, positional arguments and an optional finalizer callback.
//! - `scope.get::<T>("name")` for typed value retrieval
//! - `ArgType` selects how a token is parsed (`Int`, `String`, or `Flag` without a value)
//! - Finalizers are closures invoked once a scope has consumed all of its positional arguments
//!
//! ```
//! use argparse::{ArgType, Parser};
//!
//! let mut parser = Parser::new("archive tool");
//! parser.add_option("verbose", Some('v'), ArgType::Flag, "Chatty output", false).unwrap();
//! let add = parser.add_subcommand("add", "Add a file").unwrap();
//! add.add_positional("path", ArgType::String, "File to add").unwrap();
//!
//! parser.parse(["add", "notes.txt"]).unwrap();
//! assert!(!parser.get::<bool>("verbose").unwrap());
//! let add = parser.subcommand("add").unwrap();
//! assert_eq!(add.get_positional::<String>(0).unwrap(), "notes.txt");
//! ```

use std::convert::Infallible;
use std::fmt;
use std::io::{self, Write};
use std::ops::{ControlFlow, Deref, DerefMut};
use std::sync::Arc;

use libutils::list::{List, ListError};
use libutils::log::{LevelFilter, Logger};
use libutils::{log_debug, log_err};

/// Environment variable holding the threshold of the parser's default logger.
pub const LOG_ENV: &str = "LIBUTILS_LOG";

const HELP_INDENT: &str = "  ";

// ============================================================================
// Result and Error types
// ============================================================================

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a finalizer hands back; an error aborts the parse.
pub type CallbackResult = std::result::Result<(), BoxError>;

pub type Finalizer = Box<dyn FnMut(&Scope) -> CallbackResult>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Alloc(#[from] ListError),

    #[error("option '{0}' has no value")]
    NotPresent(String),

    #[error("no positional argument at index {0}")]
    NoPositional(usize),

    #[error("type mismatch: expected {0}")]
    TypeMismatch(&'static str),

    #[error("buffer of {0} bytes cannot hold a terminated string")]
    BufferTooSmall(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("callback for {scope} failed: {source}")]
    Callback { scope: String, source: BoxError },
}

impl Error {
    /// True for every failure caused by the command line itself.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid option {0}")]
    EmptyOption(String),

    #[error("invalid option {0}")]
    UnknownOption(String),

    #[error("expected value for {0}")]
    MissingValue(String),

    #[error("invalid type of {value} for argument {name} (int)")]
    InvalidInt { value: String, name: String },

    #[error("invalid command {0}")]
    UnknownSubcommand(String),

    #[error("extra positional argument {0}")]
    ExtraArgument(String),

    #[error("missing argument {name} for {scope}")]
    MissingArgument { scope: String, name: String },

    #[error("missing required argument {option} for {scope}")]
    MissingRequired { scope: String, option: String },
}

// ============================================================================
// ArgType and Value
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgType {
    /// Takes no value; parsed as `true` when given and `false` otherwise.
    #[default]
    Flag,
    Int,
    String,
}

impl ArgType {
    fn parse(self, text: &str, name: &str) -> std::result::Result<Value, ParseError> {
        match self {
            ArgType::Flag => Ok(Value::Flag(true)),
            ArgType::String => Ok(Value::Str(text.to_string())),
            ArgType::Int => parse_int(text)
                .map(Value::Int)
                .ok_or_else(|| ParseError::InvalidInt {
                    value: text.to_string(),
                    name: name.to_string(),
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Str(String),
    Flag(bool),
}

impl Default for Value {
    fn default() -> Self {
        Value::Flag(false)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
            Value::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// Base-10 integer in the manner of `strtol`: leading whitespace and a sign are accepted, parsing
/// stops at the first non-digit, and out-of-range values saturate. `None` when no digit is found.
fn parse_int(text: &str) -> Option<i64> {
    let s = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for d in digits[..end].bytes() {
        let d = i64::from(d - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(d)
        } else {
            value.saturating_add(d)
        };
    }
    Some(value)
}

// ============================================================================
// Trait for typed retrieval from a Scope
// ============================================================================

pub trait FromValue: Sized {
    fn from_value(v: &Value) -> Result<Self>;
}

impl FromValue for i64 {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Int(n) => Ok(*n),
            _ => Err(Error::TypeMismatch("i64")),
        }
    }
}

impl FromValue for i32 {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Int(n) => i32::try_from(*n).map_err(|_| Error::TypeMismatch("i32")),
            _ => Err(Error::TypeMismatch("i32")),
        }
    }
}

impl FromValue for bool {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Flag(b) => Ok(*b),
            _ => Err(Error::TypeMismatch("bool")),
        }
    }
}

impl FromValue for String {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Str(s) => Ok(s.clone()),
            _ => Err(Error::TypeMismatch("String")),
        }
    }
}

// ============================================================================
// Declarations and parsed items
// ============================================================================

#[derive(Debug, Clone, Default)]
struct OptionDef {
    long: String,
    short: Option<char>,
    kind: ArgType,
    help: String,
    required: bool,
}

impl OptionDef {
    fn matches_long(&self, long: &str) -> bool {
        !self.long.is_empty() && self.long == long
    }

    fn matches_name(&self, name: &str) -> bool {
        if self.matches_long(name) {
            return true;
        }
        let mut chars = name.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if self.short == Some(c))
    }

    /// The option as it would be spelled on the command line.
    fn display_name(&self) -> String {
        match self.short {
            Some(c) if self.long.is_empty() => format!("-{}", c),
            _ => format!("--{}", self.long),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PositionalDef {
    name: String,
    kind: ArgType,
    help: String,
}

#[derive(Debug, Clone, Default)]
struct ParsedItem {
    /// Position of the descriptor in the scope's option or positional list.
    slot: usize,
    value: Value,
}

// ============================================================================
// Scope: one level of the command tree
// ============================================================================

/// The root parser or one of its subcommands.
#[derive(Default)]
pub struct Scope {
    /// `None` for the root.
    name: Option<String>,
    help: String,
    /// Program name shown in the root's usage line.
    bin_name: String,
    children: List<Scope>,
    options: List<OptionDef>,
    positionals: List<PositionalDef>,
    /// Most recent first.
    named: List<ParsedItem>,
    parsed_positionals: List<ParsedItem>,
    finalizer: Option<Finalizer>,
}

impl Scope {
    fn new(name: Option<&str>, help: &str, finalizer: Option<Finalizer>) -> Self {
        Scope {
            name: name.map(str::to_string),
            help: help.to_string(),
            finalizer,
            ..Scope::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Name used in diagnostics.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("root")
    }

    /// Declares a named option. `long` may be empty when `short` is given.
    pub fn add_option(
        &mut self,
        long: &str,
        short: Option<char>,
        kind: ArgType,
        help: &str,
        required: bool,
    ) -> Result<()> {
        if long.is_empty() && short.is_none() {
            return Err(Error::InvalidConfiguration(format!(
                "option in {} has neither a long nor a short name",
                self.label()
            )));
        }
        self.options.append(OptionDef {
            long: long.to_string(),
            short,
            kind,
            help: help.to_string(),
            required,
        })?;
        Ok(())
    }

    /// Declares the next positional argument. Positionals are always required and are consumed
    /// in declaration order.
    pub fn add_positional(&mut self, name: &str, kind: ArgType, help: &str) -> Result<()> {
        if kind == ArgType::Flag {
            return Err(Error::InvalidConfiguration(format!(
                "positional argument {} cannot be a flag",
                name
            )));
        }
        self.positionals.append(PositionalDef {
            name: name.to_string(),
            kind,
            help: help.to_string(),
        })?;
        Ok(())
    }

    pub fn add_subcommand(&mut self, name: &str, help: &str) -> Result<&mut Scope> {
        self.push_child(Scope::new(Some(name), help, None))
    }

    /// Like [`add_subcommand`](Self::add_subcommand), with `f` invoked once the subcommand has
    /// consumed its arguments.
    pub fn add_subcommand_with<F>(&mut self, name: &str, help: &str, f: F) -> Result<&mut Scope>
    where
        F: FnMut(&Scope) -> CallbackResult + 'static,
    {
        self.push_child(Scope::new(Some(name), help, Some(Box::new(f))))
    }

    fn push_child(&mut self, child: Scope) -> Result<&mut Scope> {
        let name = child.name.as_deref().unwrap_or_default();
        if name.is_empty() || name.starts_with('-') {
            return Err(Error::InvalidConfiguration(format!(
                "invalid subcommand name '{}'",
                name
            )));
        }
        self.children.append(child)?;
        let last = self.children.len() - 1;
        Ok(self
            .children
            .get_mut(last)
            .ok_or(ListError::NotFound(last))?)
    }

    pub fn set_finalizer<F>(&mut self, f: F)
    where
        F: FnMut(&Scope) -> CallbackResult + 'static,
    {
        self.finalizer = Some(Box::new(f));
    }

    pub fn subcommand(&self, name: &str) -> Option<&Scope> {
        self.children.iter().find(|c| c.name() == Some(name))
    }

    pub fn subcommand_mut(&mut self, name: &str) -> Option<&mut Scope> {
        let position = self.children.position(|c| c.name() == Some(name))?;
        self.children.get_mut(position)
    }

    /// Follows `path` down the subcommand tree.
    pub fn find(&self, path: &[&str]) -> Option<&Scope> {
        path.iter().try_fold(self, |scope, name| scope.subcommand(name))
    }

    pub fn subcommands(&self) -> impl Iterator<Item = &Scope> {
        self.children.iter()
    }

    // ------------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------------

    /// Value of the option called `name` (long name, or the short character as a one-letter
    /// string). The most recent occurrence wins.
    pub fn option_value(&self, name: &str) -> Result<&Value> {
        self.named
            .iter()
            .find(|item| {
                self.options
                    .get(item.slot)
                    .is_some_and(|def| def.matches_name(name))
            })
            .map(|item| &item.value)
            .ok_or_else(|| Error::NotPresent(name.to_string()))
    }

    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.option_value(name)?)
    }

    pub fn positional_value(&self, index: usize) -> Result<&Value> {
        self.parsed_positionals
            .get(index)
            .map(|item| &item.value)
            .ok_or(Error::NoPositional(index))
    }

    pub fn get_positional<T: FromValue>(&self, index: usize) -> Result<T> {
        T::from_value(self.positional_value(index)?)
    }

    pub fn positional_count(&self) -> usize {
        self.parsed_positionals.len()
    }

    /// Copies a string option into `buf`, truncating as needed. The copy is always followed by a
    /// NUL inside `buf`; returns the number of bytes copied before it.
    pub fn copy_option_str(&self, name: &str, buf: &mut [u8]) -> Result<usize> {
        copy_str(self.option_value(name)?, buf)
    }

    /// Positional counterpart of [`copy_option_str`](Self::copy_option_str).
    pub fn copy_positional_str(&self, index: usize, buf: &mut [u8]) -> Result<usize> {
        copy_str(self.positional_value(index)?, buf)
    }

    /// Drops parsed results in this scope and below; declarations are kept.
    pub fn reset(&mut self) {
        self.named.clear();
        self.parsed_positionals.clear();
        let _ = self.children.walk_mut::<Infallible, _>(|child| {
            child.reset();
            Ok(ControlFlow::Continue(()))
        });
    }

    // ------------------------------------------------------------------------
    // Parsing steps
    // ------------------------------------------------------------------------

    /// Parses the named option `token`, taking its value from `next`. Returns whether `next` was
    /// consumed.
    fn parse_named(&mut self, token: &str, next: Option<&str>) -> Result<bool> {
        let rest = &token[1..];
        let found = match rest.strip_prefix('-') {
            Some(long) => {
                if long.is_empty() {
                    return Err(ParseError::EmptyOption(token.to_string()).into());
                }
                self.options
                    .iter()
                    .enumerate()
                    .find(|(_, def)| def.matches_long(long))
            }
            None => {
                let Some(c) = rest.chars().next() else {
                    return Err(ParseError::EmptyOption(token.to_string()).into());
                };
                self.options
                    .iter()
                    .enumerate()
                    .find(|(_, def)| def.short == Some(c))
            }
        };
        let (slot, def) = found.ok_or_else(|| ParseError::UnknownOption(token.to_string()))?;

        let (value, consumed) = match def.kind {
            ArgType::Flag => (Value::Flag(true), false),
            kind => {
                let text = next.ok_or_else(|| ParseError::MissingValue(def.display_name()))?;
                (kind.parse(text, &def.long)?, true)
            }
        };
        self.named.push(ParsedItem { slot, value })?;
        Ok(consumed)
    }

    fn parse_positional(&mut self, token: &str) -> Result<()> {
        let slot = self.parsed_positionals.len();
        let def = self
            .positionals
            .get(slot)
            .ok_or_else(|| ParseError::ExtraArgument(token.to_string()))?;
        let value = def.kind.parse(token, &def.name)?;
        self.parsed_positionals.append(ParsedItem { slot, value })?;
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.parsed_positionals.len() == self.positionals.len()
    }

    fn has_value(&self, slot: usize) -> bool {
        self.named.iter().any(|item| item.slot == slot)
    }

    /// Records `false` for every flag that was not given.
    fn fixup_flags(&mut self) -> Result<()> {
        for (slot, def) in self.options.iter().enumerate() {
            if def.kind == ArgType::Flag && !self.named.iter().any(|item| item.slot == slot) {
                self.named.append(ParsedItem {
                    slot,
                    value: Value::Flag(false),
                })?;
            }
        }
        Ok(())
    }

    fn check_required(&self) -> Result<()> {
        if let Some(def) = self.positionals.get(self.parsed_positionals.len()) {
            return Err(ParseError::MissingArgument {
                scope: self.label().to_string(),
                name: def.name.clone(),
            }
            .into());
        }
        for (slot, def) in self.options.iter().enumerate() {
            if def.required && !self.has_value(slot) {
                return Err(ParseError::MissingRequired {
                    scope: self.label().to_string(),
                    option: def.display_name(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Completes the scope: unset flags, required checks, then the finalizer.
    fn finalize(&mut self) -> Result<()> {
        self.fixup_flags()?;
        self.check_required()?;

        if let Some(mut f) = self.finalizer.take() {
            let outcome = f(&*self);
            self.finalizer = Some(f);
            outcome.map_err(|source| Error::Callback {
                scope: self.label().to_string(),
                source,
            })?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Help
    // ------------------------------------------------------------------------

    /// Writes the usage of this scope followed by that of every scope below it, each level
    /// indented one step further.
    pub fn write_help(&self, w: &mut dyn Write) -> io::Result<()> {
        self.write_help_at(w, 0)
    }

    pub fn print_help(&self) {
        let stderr = io::stderr();
        let mut out = stderr.lock();
        let _ = self.write_help(&mut out);
    }

    fn write_help_at(&self, w: &mut dyn Write, depth: usize) -> io::Result<()> {
        self.write_usage(w, &HELP_INDENT.repeat(depth))?;
        for child in &self.children {
            child.write_help_at(w, depth + 1)?;
        }
        Ok(())
    }

    fn write_usage(&self, w: &mut dyn Write, pad: &str) -> io::Result<()> {
        match &self.name {
            None => write!(
                w,
                "{}Usage: {} [options] [subcommands] [arguments]\n",
                pad, self.bin_name
            )?,
            Some(name) => write!(
                w,
                "{}Command: {} [options] [subcommands] [arguments]\n{}{}\n",
                pad, name, pad, self.help
            )?,
        }

        write!(w, "{}Subcommands:\n", pad)?;
        for child in &self.children {
            write!(w, "{}\t{}\t\t{}\n", pad, child.label(), child.help)?;
        }

        write!(w, "{}Options:\n", pad)?;
        for opt in &self.options {
            match opt.short {
                Some(c) => write!(w, "{}\t-{},--{}\t\t{}\n", pad, c, opt.long, opt.help)?,
                None => write!(w, "{}\t--{}\t\t{}\n", pad, opt.long, opt.help)?,
            }
        }

        write!(w, "\n{}Arguments:\n", pad)?;
        for pos in &self.positionals {
            write!(w, "{}\t{}\t\t\t{}\n", pad, pos.name, pos.help)?;
        }

        write!(w, "\n\n")
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("positionals", &self.positionals)
            .field("named", &self.named)
            .field("parsed_positionals", &self.parsed_positionals)
            .field("children", &self.children)
            .field("finalizer", &self.finalizer.is_some())
            .finish()
    }
}

fn copy_str(value: &Value, buf: &mut [u8]) -> Result<usize> {
    let Value::Str(text) = value else {
        return Err(Error::TypeMismatch("string"));
    };
    let room = buf
        .len()
        .checked_sub(1)
        .ok_or(Error::BufferTooSmall(buf.len()))?;
    let n = text.len().min(room);
    buf[..n].copy_from_slice(&text.as_bytes()[..n]);
    buf[n..].fill(0);
    Ok(n)
}

// ============================================================================
// Parser: the root scope plus the parse state machine
// ============================================================================

pub struct Parser {
    root: Scope,
    logger: Arc<Logger>,
}

impl Parser {
    pub fn new(help: &str) -> Self {
        let mut root = Scope::new(None, help, None);
        root.bin_name = std::env::args().next().unwrap_or_default();
        Parser {
            root,
            logger: default_logger(),
        }
    }

    /// A parser whose root calls `f` once the whole command line has been consumed.
    pub fn with_finalizer<F>(help: &str, f: F) -> Self
    where
        F: FnMut(&Scope) -> CallbackResult + 'static,
    {
        let mut parser = Parser::new(help);
        parser.root.set_finalizer(f);
        parser
    }

    pub fn program(&self) -> &str {
        &self.root.bin_name
    }

    /// Program name shown in the usage line.
    pub fn set_program(&mut self, name: &str) {
        self.root.bin_name = name.to_string();
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn set_logger(&mut self, logger: Arc<Logger>) {
        self.logger = logger;
    }

    pub fn root(&self) -> &Scope {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Scope {
        &mut self.root
    }

    /// Parses the process arguments; the first one names the program.
    pub fn parse_env(&mut self) -> Result<()> {
        let mut args = std::env::args();
        if let Some(program) = args.next() {
            self.set_program(&program);
        }
        self.parse(args)
    }

    /// Parses `tokens` (without the program name).
    ///
    /// The whole tree is [`reset`](Scope::reset) first, so results always describe the latest
    /// call and no explicit reset is needed between parses. Any failure aborts the whole parse.
    /// Command-line errors are logged and followed by the full usage on stderr. Results gathered
    /// before the failure stay readable until the next reset or parse.
    pub fn parse<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .collect();
        self.root.reset();

        let result = self.run(&tokens);
        if let Err(err) = &result {
            log_err!(self.logger, "{}", err);
            if err.is_parse_error() {
                self.root.print_help();
            }
        }
        result
    }

    fn run(&mut self, tokens: &[String]) -> Result<()> {
        // child positions leading from the root to the active scope
        let mut path: List<usize> = List::new();
        let mut last_subcommand = false;
        let mut index = 0;

        while let Some(token) = tokens.get(index) {
            index += 1;
            log_debug!(self.logger, "pick {}", token);
            let scope = scope_at(&mut self.root, &path)?;

            if token.starts_with('-') {
                log_debug!(self.logger, "named arg {} for {}", token, scope.label());
                let next = tokens.get(index).map(String::as_str);
                if scope.parse_named(token, next)? {
                    index += 1;
                }
            } else if !last_subcommand && !scope.children.is_empty() {
                let position = scope
                    .children
                    .position(|child| child.name() == Some(token.as_str()))
                    .ok_or_else(|| ParseError::UnknownSubcommand(token.clone()))?;
                log_debug!(self.logger, "subcommand switch {} -> {}", scope.label(), token);
                path.append(position)?;
            } else {
                if scope.children.is_empty() {
                    last_subcommand = true;
                }
                log_debug!(self.logger, "posarg {} for {}", token, scope.label());
                scope.parse_positional(token)?;
                if scope.is_complete() {
                    self.finalize(&path)?;
                    // the root stays active
                    if !path.is_empty() {
                        path.pop_back()?;
                    }
                }
            }
        }

        while !path.is_empty() {
            self.finalize(&path)?;
            path.pop_back()?;
        }
        // the root is finalized here even if its last positional already did so
        self.finalize(&path)
    }

    fn finalize(&mut self, path: &List<usize>) -> Result<()> {
        let scope = scope_at(&mut self.root, path)?;
        log_debug!(self.logger, "finalize {}", scope.label());
        scope.finalize()
    }
}

impl Deref for Parser {
    type Target = Scope;

    fn deref(&self) -> &Scope {
        &self.root
    }
}

impl DerefMut for Parser {
    fn deref_mut(&mut self) -> &mut Scope {
        &mut self.root
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("root", &self.root)
            .field("logger", &self.logger)
            .finish()
    }
}

fn default_logger() -> Arc<Logger> {
    let logger = Logger::new("argparse");
    if let Some(level) = LevelFilter::from_env(LOG_ENV) {
        logger.set_level(level);
    }
    Arc::new(logger)
}

fn scope_at<'a>(root: &'a mut Scope, path: &List<usize>) -> Result<&'a mut Scope> {
    let mut scope = root;
    for &position in path {
        scope = scope
            .children
            .get_mut(position)
            .ok_or(ListError::NotFound(position))?;
    }
    Ok(scope)
}
