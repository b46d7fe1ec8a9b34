//! Command dispatch engine.
//!
//! Commands are registered once into a [`CommandTree`] through a
//! [`TreeBuilder`]. Each input line is tokenized, resolved against the tree
//! at the caller's permission level, bound to the command's parameters, and
//! handed to the command's handler. Every failure produces fixed,
//! user-facing text on the caller's [`Output`].

mod binder;
mod dispatcher;
mod help;
mod param;
mod registry;
mod resolver;
mod tokenizer;
mod tree;

/// Typed arguments passed to handlers.
pub use binder::{BindFailure, BoundArguments, arity, bind};
/// Acting user, output sink, handler abort, and dispatch result.
pub use dispatcher::{Abort, Caller, EMPTY_INPUT, Outcome, Output, not_found_message};
/// Help overview header and visibility filter.
pub use help::{OVERVIEW_HEADER, accessible};
/// Parameter declarations and parsed values.
pub use param::{ParamType, ParameterSpec, Value};
/// Parameter type registry.
pub use registry::{ClosedSet, EntityResolver, PERMISSION_LEVEL, ParseFailure, TypeRegistry};
/// Tree walking.
pub use resolver::{Resolution, ResolvedPath, resolve};
/// Line tokenizer.
pub use tokenizer::tokenize;
/// Command tree, its nodes, and registration.
pub use tree::{CommandDef, CommandNode, CommandTree, GroupDef, Handler, TreeBuilder};

pub use hark_types::PermissionLevel;
