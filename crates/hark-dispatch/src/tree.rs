//! Command tree and its builder.
//!
//! The tree is assembled once at startup through [`TreeBuilder`] and is
//! read-only afterwards. Every registration problem (name collisions, bad
//! parameter ordering, unknown parameter types) is reported by the builder,
//! so a tree that exists is always well formed.

use std::borrow::Cow;
use std::collections::HashMap;

use hark_types::{HarkError, PermissionLevel, Result};

use crate::binder::BoundArguments;
use crate::dispatcher::{Abort, Output};
use crate::param::{ParamType, ParameterSpec};
use crate::registry::TypeRegistry;

/// A stored command implementation.
///
/// Receives the acting user's context, the bound arguments, and the output
/// sink. Returning `Err(Abort)` stops the command with a message for the
/// user; output already written stays written.
pub type Handler<C> =
    Box<dyn Fn(&mut C, &BoundArguments, &mut dyn Output) -> std::result::Result<(), Abort> + Send + Sync>;

pub(crate) enum Action<C> {
    Run(Handler<C>),
    /// Built-in help, which needs the tree itself.
    Help,
}

pub(crate) enum NodeKind<C> {
    Leaf {
        params: Vec<ParameterSpec>,
        action: Action<C>,
    },
    Group(Group<C>),
}

/// A command (leaf) or a group of subcommands.
pub struct CommandNode<C> {
    name: String,
    aliases: Vec<String>,
    level: PermissionLevel,
    doc: String,
    pub(crate) kind: NodeKind<C>,
}

impl<C> CommandNode<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn required_level(&self) -> PermissionLevel {
        self.level
    }

    pub fn documentation(&self) -> &str {
        &self.doc
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    /// Declared parameters, or `None` for a group.
    pub fn params(&self) -> Option<&[ParameterSpec]> {
        match &self.kind {
            NodeKind::Leaf { params, .. } => Some(params),
            NodeKind::Group(_) => None,
        }
    }

    /// Children in registration order. Empty for a leaf.
    pub fn children(&self) -> &[CommandNode<C>] {
        match &self.kind {
            NodeKind::Group(group) => &group.children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Children of a group, with a name/alias index.
pub(crate) struct Group<C> {
    pub(crate) children: Vec<CommandNode<C>>,
    index: HashMap<String, usize>,
    /// Set once documentation/level/aliases have been given explicitly.
    described: bool,
}

impl<C> Group<C> {
    fn new(described: bool) -> Self {
        Self {
            children: Vec::new(),
            index: HashMap::new(),
            described,
        }
    }

    pub(crate) fn lookup(&self, key: &str) -> Option<&CommandNode<C>> {
        self.index.get(key).map(|&i| &self.children[i])
    }

    fn check_free<'k>(&self, keys: impl IntoIterator<Item = &'k str>, parent: &str) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        for key in keys {
            if self.index.contains_key(key) || seen.contains(&key) {
                return Err(HarkError::Registration(format!(
                    "\"{key}\" is already registered in {parent}"
                )));
            }
            seen.push(key);
        }
        Ok(())
    }

    fn insert(&mut self, node: CommandNode<C>) -> usize {
        let idx = self.children.len();
        for key in node.keys() {
            self.index.insert(key.to_string(), idx);
        }
        self.children.push(node);
        idx
    }
}

/// The immutable command tree.
pub struct CommandTree<C> {
    pub(crate) root: Group<C>,
    pub(crate) types: TypeRegistry<C>,
    case_insensitive: bool,
}

impl<C> CommandTree<C> {
    /// Top-level nodes in registration order.
    pub fn commands(&self) -> &[CommandNode<C>] {
        &self.root.children
    }

    pub fn types(&self) -> &TypeRegistry<C> {
        &self.types
    }

    /// The child of `group` reachable through `token` at `level`.
    ///
    /// Nodes above `level` are treated as absent.
    pub(crate) fn child<'t>(
        &'t self,
        group: &'t Group<C>,
        token: &str,
        level: PermissionLevel,
    ) -> Option<&'t CommandNode<C>> {
        group
            .lookup(&normalize(token, self.case_insensitive))
            .filter(|node| level.satisfies(node.level))
    }
}

fn normalize(name: &str, case_insensitive: bool) -> Cow<'_, str> {
    if case_insensitive {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Declaration of an executable command.
pub struct CommandDef<C> {
    aliases: Vec<String>,
    level: PermissionLevel,
    doc: String,
    params: Vec<ParameterSpec>,
    action: Action<C>,
}

impl<C> CommandDef<C> {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut C, &BoundArguments, &mut dyn Output) -> std::result::Result<(), Abort>
            + Send
            + Sync
            + 'static,
    {
        Self::with_action(Action::Run(Box::new(handler)))
    }

    fn with_action(action: Action<C>) -> Self {
        Self {
            aliases: Vec::new(),
            level: PermissionLevel::Guest,
            doc: String::new(),
            params: Vec::new(),
            action,
        }
    }

    pub fn doc(mut self, doc: &str) -> Self {
        self.doc = doc.to_string();
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn level(mut self, level: PermissionLevel) -> Self {
        self.level = level;
        self
    }

    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.params.push(spec);
        self
    }
}

/// Declaration of a group's own metadata.
#[derive(Debug, Clone, Default)]
pub struct GroupDef {
    aliases: Vec<String>,
    level: PermissionLevel,
    doc: String,
}

impl GroupDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc(mut self, doc: &str) -> Self {
        self.doc = doc.to_string();
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn level(mut self, level: PermissionLevel) -> Self {
        self.level = level;
        self
    }
}

/// Assembles a [`CommandTree`].
///
/// Paths are sequences of names from the top level down. Groups along a path
/// are created on demand with level `Guest` and no documentation; use
/// [`TreeBuilder::group`] to describe them.
pub struct TreeBuilder<C> {
    root: Group<C>,
    types: TypeRegistry<C>,
    case_insensitive: bool,
}

impl<C> TreeBuilder<C> {
    /// A builder whose names match case-sensitively.
    pub fn new(types: TypeRegistry<C>) -> Self {
        Self::with_case_rule(types, false)
    }

    /// A builder whose names match without regard to ASCII case when
    /// `case_insensitive` is set. Names and aliases are then stored
    /// lower-cased. The rule is fixed for the builder's lifetime.
    pub fn with_case_rule(types: TypeRegistry<C>, case_insensitive: bool) -> Self {
        Self {
            root: Group::new(true),
            types,
            case_insensitive,
        }
    }

    /// Register an executable command at `path`.
    pub fn command(&mut self, path: &[&str], def: CommandDef<C>) -> Result<()> {
        let display = path.join(" ");
        check_params(&display, &def.params, &self.types)?;
        let (name, parents) = split_path(path)?;
        let case_insensitive = self.case_insensitive;
        let aliases = normalize_names(&def.aliases, case_insensitive)?;
        let name = normalize_name(name, case_insensitive)?;
        let group = descend(&mut self.root, parents, case_insensitive)?;
        group.check_free(
            std::iter::once(name.as_str()).chain(aliases.iter().map(String::as_str)),
            &scope(parents),
        )?;
        group.insert(CommandNode {
            name,
            aliases,
            level: def.level,
            doc: def.doc,
            kind: NodeKind::Leaf {
                params: def.params,
                action: def.action,
            },
        });
        log::debug!("Registered command \"{display}\"");
        Ok(())
    }

    /// Declare a group at `path`, or describe one created implicitly.
    pub fn group(&mut self, path: &[&str], def: GroupDef) -> Result<()> {
        let display = path.join(" ");
        let (name, parents) = split_path(path)?;
        let case_insensitive = self.case_insensitive;
        let aliases = normalize_names(&def.aliases, case_insensitive)?;
        let name = normalize_name(name, case_insensitive)?;
        let parent = descend(&mut self.root, parents, case_insensitive)?;
        let where_ = scope(parents);

        let existing = parent.index.get(&name).copied();
        let Some(idx) = existing else {
            parent.check_free(
                std::iter::once(name.as_str()).chain(aliases.iter().map(String::as_str)),
                &where_,
            )?;
            parent.insert(CommandNode {
                name,
                aliases,
                level: def.level,
                doc: def.doc,
                kind: NodeKind::Group(Group::new(true)),
            });
            log::debug!("Registered group \"{display}\"");
            return Ok(());
        };

        let undescribed = matches!(
            &parent.children[idx].kind,
            NodeKind::Group(group) if !group.described
        );
        if !undescribed || parent.children[idx].name != name {
            return Err(HarkError::Registration(format!(
                "\"{name}\" is already registered in {where_}"
            )));
        }
        parent.check_free(aliases.iter().map(String::as_str), &where_)?;
        for alias in &aliases {
            parent.index.insert(alias.clone(), idx);
        }
        let node = &mut parent.children[idx];
        node.aliases = aliases;
        node.level = def.level;
        node.doc = def.doc;
        if let NodeKind::Group(group) = &mut node.kind {
            group.described = true;
        }
        log::debug!("Described group \"{display}\"");
        Ok(())
    }

    /// Register the built-in help command at `path`.
    ///
    /// It takes `[command] [subcommand]` and renders the same help text as
    /// [`CommandTree::help_lines`].
    pub fn help(&mut self, path: &[&str], level: PermissionLevel) -> Result<()> {
        let def = CommandDef::with_action(Action::Help)
            .doc("Shows the available commands, or help for one command.")
            .level(level)
            .param(ParameterSpec::optional("command", ParamType::Text))
            .param(ParameterSpec::optional("subcommand", ParamType::Text));
        self.command(path, def)
    }

    pub fn build(self) -> CommandTree<C> {
        log::debug!("Command tree built with {} top-level entries", self.root.children.len());
        CommandTree {
            root: self.root,
            types: self.types,
            case_insensitive: self.case_insensitive,
        }
    }
}

fn split_path<'p>(path: &'p [&'p str]) -> Result<(&'p str, &'p [&'p str])> {
    match path.split_last() {
        Some((name, parents)) => Ok((name, parents)),
        None => Err(HarkError::Registration("empty command path".to_string())),
    }
}

fn scope(parents: &[&str]) -> String {
    if parents.is_empty() {
        "the top level".to_string()
    } else {
        format!("\"{}\"", parents.join(" "))
    }
}

fn normalize_name(name: &str, case_insensitive: bool) -> Result<String> {
    if name.is_empty() || name.contains(char::is_whitespace) || name.contains('"') {
        return Err(HarkError::Registration(format!("invalid command name \"{name}\"")));
    }
    Ok(normalize(name, case_insensitive).into_owned())
}

fn normalize_names(names: &[String], case_insensitive: bool) -> Result<Vec<String>> {
    names
        .iter()
        .map(|name| normalize_name(name, case_insensitive))
        .collect()
}

/// Walk to the group at `parents`, creating missing groups.
fn descend<'g, C>(
    root: &'g mut Group<C>,
    parents: &[&str],
    case_insensitive: bool,
) -> Result<&'g mut Group<C>> {
    let mut group = root;
    for (depth, segment) in parents.iter().enumerate() {
        let key = normalize_name(segment, case_insensitive)?;
        let idx = match group.index.get(&key).copied() {
            Some(idx) => idx,
            None => group.insert(CommandNode {
                name: key,
                aliases: Vec::new(),
                level: PermissionLevel::Guest,
                doc: String::new(),
                kind: NodeKind::Group(Group::new(false)),
            }),
        };
        group = match &mut group.children[idx].kind {
            NodeKind::Group(child) => child,
            NodeKind::Leaf { .. } => {
                return Err(HarkError::Registration(format!(
                    "\"{}\" is a command and cannot have subcommands",
                    parents[..=depth].join(" ")
                )));
            },
        };
    }
    Ok(group)
}

fn check_params<C>(command: &str, params: &[ParameterSpec], types: &TypeRegistry<C>) -> Result<()> {
    let mut seen_optional = false;
    for (i, spec) in params.iter().enumerate() {
        if spec.is_optional() {
            seen_optional = true;
        } else if seen_optional {
            return Err(HarkError::Registration(format!(
                "\"{command}\": required parameter \"{}\" follows an optional one",
                spec.name()
            )));
        }
        if spec.is_greedy() && i + 1 != params.len() {
            return Err(HarkError::Registration(format!(
                "\"{command}\": only the last parameter may be greedy (\"{}\" is not last)",
                spec.name()
            )));
        }
        if !types.knows(spec.param_type()) {
            return Err(HarkError::Registration(format!(
                "\"{command}\": parameter \"{}\" has unregistered type {:?}",
                spec.name(),
                spec.param_type()
            )));
        }
        if params[..i].iter().any(|p| p.name() == spec.name()) {
            return Err(HarkError::Registration(format!(
                "\"{command}\": duplicate parameter \"{}\"",
                spec.name()
            )));
        }
    }
    Ok(())
}
