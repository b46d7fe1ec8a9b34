//! Dispatch: one input line in, user-facing output lines out.

use hark_types::PermissionLevel;

use crate::binder::{BindFailure, bind};
use crate::registry::ParseFailure;
use crate::resolver::{Resolution, ResolvedPath, resolve};
use crate::tokenizer::tokenize;
use crate::tree::{Action, CommandTree, NodeKind};

/// Printed for a blank input line.
pub const EMPTY_INPUT: &str = "Please enter a command.";

/// The acting user, as far as dispatch is concerned.
pub trait Caller {
    fn permission_level(&self) -> PermissionLevel;
}

/// Destination for output lines (console, buffer, socket).
pub trait Output {
    fn line(&mut self, text: &str);
}

impl Output for Vec<String> {
    fn line(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Advisory stop raised by a handler.
///
/// The message is shown to the user as-is. Nothing the handler did before
/// returning it is undone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Abort {
    message: String,
}

impl Abort {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// How a dispatch call ended. The user-facing text has already been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Blank line.
    Empty,
    /// No accessible command at the given path.
    NotFound,
    /// A group was named; its subcommands were listed.
    Listed,
    /// Wrong number of arguments.
    UsageError,
    /// An argument was malformed.
    SyntaxError,
    /// An argument named nothing valid.
    Rejected,
    /// The handler stopped with an [`Abort`].
    Aborted,
    Completed,
}

impl Outcome {
    /// Whether the command ran to completion.
    pub fn is_success(self) -> bool {
        self == Outcome::Completed
    }
}

/// `Command "<path>" does not exist.`
pub fn not_found_message(attempted: &str) -> String {
    format!("Command \"{attempted}\" does not exist.")
}

impl<C: Caller> CommandTree<C> {
    /// Tokenize, resolve, bind, and run one input line for `context`.
    ///
    /// Every failure is reported through `out`; nothing here panics or
    /// returns an error to the host.
    pub fn dispatch(&self, context: &mut C, line: &str, out: &mut dyn Output) -> Outcome {
        let tokens = tokenize(line);
        log::debug!("dispatch: tokens {tokens:?}");
        let level = context.permission_level();

        let path = match resolve(self, &tokens, level) {
            Resolution::Empty => {
                out.line(EMPTY_INPUT);
                return Outcome::Empty;
            },
            Resolution::NotFound { deepest, attempted } => {
                log::debug!("dispatch: \"{attempted}\" not found at level {level}");
                out.line(&not_found_message(&attempted));
                if let Some(group) = deepest {
                    self.write_listing(&group, level, out);
                }
                return Outcome::NotFound;
            },
            Resolution::Found(path) => path,
        };

        let NodeKind::Leaf { params, action } = &path.node.kind else {
            self.write_listing(&path, level, out);
            return Outcome::Listed;
        };

        let display = path.display();
        let args = match bind(params, path.remaining, &self.types, &*context) {
            Ok(args) => args,
            Err(failure) => {
                log::debug!("dispatch: \"{display}\" binding failed: {failure:?}");
                let usage = self.usage(path.node, &display, level);
                return match failure {
                    BindFailure::Count => {
                        out.line(&format!("Incorrect number of arguments! Proper syntax: {usage}"));
                        Outcome::UsageError
                    },
                    BindFailure::Parse(ParseFailure::Syntax(message)) => {
                        out.line(&format!("Invalid syntax! {message}"));
                        out.line(&format!("Proper syntax: {usage}"));
                        Outcome::SyntaxError
                    },
                    BindFailure::Parse(ParseFailure::Rejected(message)) => {
                        out.line(&message);
                        Outcome::Rejected
                    },
                };
            },
        };

        log::debug!("dispatch: running \"{display}\" with {} argument(s)", args.len());
        match action {
            Action::Run(handler) => match handler(context, &args, &mut *out) {
                Ok(()) => Outcome::Completed,
                Err(abort) => {
                    log::debug!("dispatch: \"{display}\" aborted: {abort}");
                    out.line(abort.message());
                    Outcome::Aborted
                },
            },
            Action::Help => {
                for text in self.help_for_args(&args, level) {
                    out.line(&text);
                }
                Outcome::Completed
            },
        }
    }

    fn write_listing(&self, group: &ResolvedPath<'_, '_, C>, level: PermissionLevel, out: &mut dyn Output) {
        for text in self.listing_lines(group, level) {
            out.line(&text);
        }
    }
}
