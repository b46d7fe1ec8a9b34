//! Usage strings and help text.
//!
//! Everything here is filtered by the caller's permission level, using the
//! same rules as dispatch, so help never reveals a command the caller could
//! not run.

use hark_types::PermissionLevel;

use crate::binder::BoundArguments;
use crate::dispatcher::not_found_message;
use crate::param::ParameterSpec;
use crate::resolver::{Resolution, ResolvedPath, resolve};
use crate::tree::{CommandNode, CommandTree, NodeKind};

/// Header of the overview printed by a bare `help`.
pub const OVERVIEW_HEADER: &str = "Available commands:";

/// Nodes in `nodes` visible at `level`, in registration order.
pub fn accessible<C>(
    nodes: &[CommandNode<C>],
    level: PermissionLevel,
) -> impl Iterator<Item = &CommandNode<C>> {
    nodes
        .iter()
        .filter(move |node| level.satisfies(node.required_level()))
}

/// `"<doc> <rest>"`, or just `rest` when there is no documentation.
fn sentence(doc: &str, rest: &str) -> String {
    if doc.is_empty() {
        rest.to_string()
    } else {
        format!("{doc} {rest}")
    }
}

impl<C> CommandTree<C> {
    /// Usage signature of `node` displayed under `path`.
    ///
    /// Commands render as `path <required> [optional]`, groups as
    /// `path <child1|child2>`. The space after `path` is always present.
    pub fn usage(&self, node: &CommandNode<C>, path: &str, level: PermissionLevel) -> String {
        match &node.kind {
            NodeKind::Leaf { params, .. } => {
                let params: Vec<String> = params.iter().map(ParameterSpec::usage).collect();
                format!("{path} {}", params.join(" "))
            },
            NodeKind::Group(group) => {
                let names: Vec<&str> = accessible(&group.children, level)
                    .map(CommandNode::name)
                    .collect();
                if names.is_empty() {
                    format!("{path} ")
                } else {
                    format!("{path} <{}>", names.join("|"))
                }
            },
        }
    }

    /// One usage line per accessible child of the group `node` at `path`.
    pub fn subcommand_lines(
        &self,
        node: &CommandNode<C>,
        path: &str,
        level: PermissionLevel,
    ) -> Vec<String> {
        accessible(node.children(), level)
            .map(|child| self.usage(child, &format!("{path} {}", child.name()), level))
            .collect()
    }

    /// Help text for `path` (the words after `help`).
    ///
    /// An empty path lists every accessible top-level command. Otherwise the
    /// path is resolved like a command line: a command shows its
    /// documentation, syntax, and aliases; a group shows its documentation
    /// and subcommands. Anything else is reported under the full path that
    /// was asked for, with a listing of the deepest group that matched.
    pub fn help_lines(&self, path: &[String], level: PermissionLevel) -> Vec<String> {
        match resolve(self, path, level) {
            Resolution::Empty => {
                let mut lines = vec![OVERVIEW_HEADER.to_string()];
                lines.extend(
                    accessible(self.commands(), level).map(|node| self.usage(node, node.name(), level)),
                );
                lines
            },
            Resolution::Found(found) if found.remaining.is_empty() => {
                let display = found.display();
                let node = found.node;
                if node.is_group() {
                    let mut lines = vec![sentence(node.documentation(), "Subcommands:")];
                    lines.extend(self.subcommand_lines(node, &display, level));
                    lines
                } else {
                    let mut text = format!("Syntax: {}", self.usage(node, &display, level));
                    if !node.aliases().is_empty() {
                        text.push_str(&format!(". Aliases: {}", node.aliases().join(", ")));
                    }
                    vec![sentence(node.documentation(), &text)]
                }
            },
            // Words after a command are not part of any path.
            Resolution::Found(_) => vec![not_found_message(&path.join(" "))],
            Resolution::NotFound { deepest, .. } => {
                let mut lines = vec![not_found_message(&path.join(" "))];
                if let Some(group) = deepest {
                    lines.extend(self.listing_lines(&group, level));
                }
                lines
            },
        }
    }

    /// `"<group> contains these subcommands:"` followed by the group's
    /// accessible children.
    pub(crate) fn listing_lines(&self, group: &ResolvedPath<'_, '_, C>, level: PermissionLevel) -> Vec<String> {
        let display = group.display();
        let mut lines = vec![format!("{display} contains these subcommands:")];
        lines.extend(self.subcommand_lines(group.node, &display, level));
        lines
    }

    /// Help text for the built-in help command's bound arguments.
    pub(crate) fn help_for_args(&self, args: &BoundArguments, level: PermissionLevel) -> Vec<String> {
        let path: Vec<String> = (0..args.len())
            .filter_map(|i| args.text(i))
            .map(str::to_string)
            .collect();
        self.help_lines(&path, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Output;
    use crate::param::ParamType;
    use crate::registry::TypeRegistry;
    use crate::tree::{CommandDef, GroupDef, TreeBuilder};

    struct Ctx;

    fn noop() -> CommandDef<Ctx> {
        CommandDef::new(|_: &mut Ctx, _: &BoundArguments, _: &mut dyn Output| Ok(()))
    }

    fn int(name: &str) -> ParameterSpec {
        ParameterSpec::required(name, ParamType::Integer)
    }

    fn tree() -> CommandTree<Ctx> {
        let mut b = TreeBuilder::new(TypeRegistry::new());
        b.command(
            &["add"],
            noop().doc("Adds two integers together.").param(int("num1")).param(int("num2")),
        )
        .unwrap();
        b.command(
            &["divide"],
            noop()
                .doc("Divides num1 by num2.")
                .alias("div")
                .param(int("num1"))
                .param(int("num2")),
        )
        .unwrap();
        b.command(&["myname"], noop().doc("Returns your name.")).unwrap();
        b.command(
            &["favorite-food"],
            noop()
                .param(ParameterSpec::required("querying", ParamType::Text))
                .param(ParameterSpec::optional("food", ParamType::Text)),
        )
        .unwrap();
        b.group(&["window"], GroupDef::new().doc("Manipulates the console window."))
            .unwrap();
        b.command(
            &["window", "resize"],
            noop().doc("Resizes the window.").param(int("width")).param(int("height")),
        )
        .unwrap();
        b.command(
            &["window", "move"],
            noop()
                .doc("Moves the window to a certain position.")
                .param(int("left"))
                .param(int("top")),
        )
        .unwrap();
        b.command(
            &["delete-production"],
            noop()
                .doc("Why would you want to do this!?")
                .level(PermissionLevel::Superadmin),
        )
        .unwrap();
        b.group(
            &["supersecret"],
            GroupDef::new().doc("A or B.").level(PermissionLevel::Superadmin),
        )
        .unwrap();
        b.command(&["supersecret", "a"], noop().doc("A.")).unwrap();
        b.command(&["supersecret", "b"], noop().doc("B.")).unwrap();
        b.help(&["help"], PermissionLevel::Guest).unwrap();
        b.build()
    }

    fn path(words: &str) -> Vec<String> {
        words.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn usage_shapes() {
        let t = tree();
        let level = PermissionLevel::Admin;
        let find = |name: &str| t.commands().iter().find(|n| n.name() == name).unwrap();
        assert_eq!(t.usage(find("add"), "add", level), "add <num1> <num2>");
        assert_eq!(t.usage(find("myname"), "myname", level), "myname ");
        assert_eq!(
            t.usage(find("favorite-food"), "favorite-food", level),
            "favorite-food <querying> [food]"
        );
        assert_eq!(t.usage(find("window"), "window", level), "window <resize|move>");
        assert_eq!(t.usage(find("help"), "help", level), "help [command] [subcommand]");
    }

    #[test]
    fn overview_hides_inaccessible_commands() {
        let t = tree();
        let lines = t.help_lines(&[], PermissionLevel::Admin);
        assert_eq!(lines[0], OVERVIEW_HEADER);
        assert!(lines.contains(&"add <num1> <num2>".to_string()));
        assert!(lines.contains(&"window <resize|move>".to_string()));
        assert!(lines.contains(&"myname ".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("delete-production")));
        assert!(!lines.iter().any(|l| l.starts_with("supersecret")));

        let lines = t.help_lines(&[], PermissionLevel::Superadmin);
        assert!(lines.contains(&"delete-production ".to_string()));
        assert!(lines.contains(&"supersecret <a|b>".to_string()));
    }

    #[test]
    fn overview_keeps_registration_order() {
        let t = tree();
        let lines = t.help_lines(&[], PermissionLevel::Guest);
        let names: Vec<&str> = lines[1..]
            .iter()
            .map(|l| l.split(' ').next().unwrap_or(""))
            .collect();
        assert_eq!(names, ["add", "divide", "myname", "favorite-food", "window", "help"]);
    }

    #[test]
    fn command_help() {
        let t = tree();
        assert_eq!(
            t.help_lines(&path("add"), PermissionLevel::Guest),
            ["Adds two integers together. Syntax: add <num1> <num2>"]
        );
    }

    #[test]
    fn command_help_lists_aliases() {
        let t = tree();
        assert_eq!(
            t.help_lines(&path("divide"), PermissionLevel::Guest),
            ["Divides num1 by num2. Syntax: divide <num1> <num2>. Aliases: div"]
        );
        // Asking through the alias shows the same text.
        assert_eq!(
            t.help_lines(&path("div"), PermissionLevel::Guest),
            t.help_lines(&path("divide"), PermissionLevel::Guest)
        );
    }

    #[test]
    fn undocumented_command_help() {
        let t = tree();
        assert_eq!(
            t.help_lines(&path("favorite-food"), PermissionLevel::Guest),
            ["Syntax: favorite-food <querying> [food]"]
        );
    }

    #[test]
    fn group_help() {
        let t = tree();
        assert_eq!(
            t.help_lines(&path("window"), PermissionLevel::Guest),
            [
                "Manipulates the console window. Subcommands:",
                "window resize <width> <height>",
                "window move <left> <top>",
            ]
        );
    }

    #[test]
    fn subcommand_help() {
        let t = tree();
        assert_eq!(
            t.help_lines(&path("window move"), PermissionLevel::Guest),
            ["Moves the window to a certain position. Syntax: window move <left> <top>"]
        );
    }

    #[test]
    fn missing_paths() {
        let t = tree();
        assert_eq!(
            t.help_lines(&path("asdf"), PermissionLevel::Guest),
            ["Command \"asdf\" does not exist."]
        );
        assert_eq!(
            t.help_lines(&path("window asdf"), PermissionLevel::Guest),
            [
                "Command \"window asdf\" does not exist.",
                "window contains these subcommands:",
                "window resize <width> <height>",
                "window move <left> <top>",
            ]
        );
        assert_eq!(
            t.help_lines(&path("add extra"), PermissionLevel::Guest),
            ["Command \"add extra\" does not exist."]
        );
    }

    #[test]
    fn privileged_paths_do_not_leak() {
        let t = tree();
        for (words, attempted) in [
            ("delete-production", "delete-production"),
            ("supersecret", "supersecret"),
            ("supersecret a", "supersecret a"),
            ("delete-production now", "delete-production now"),
        ] {
            assert_eq!(
                t.help_lines(&path(words), PermissionLevel::Admin),
                [format!("Command \"{attempted}\" does not exist.")]
            );
        }
        assert_eq!(
            t.help_lines(&path("supersecret a"), PermissionLevel::Superadmin),
            ["A. Syntax: supersecret a "]
        );
        assert_eq!(
            t.help_lines(&path("delete-production"), PermissionLevel::Superadmin),
            ["Why would you want to do this!? Syntax: delete-production "]
        );
        assert_eq!(
            t.help_lines(&path("supersecret"), PermissionLevel::Superadmin),
            ["A or B. Subcommands:", "supersecret a ", "supersecret b "]
        );
    }

    #[test]
    fn group_usage_with_no_visible_children() {
        let mut b = TreeBuilder::new(TypeRegistry::new());
        b.command(&["ops", "reboot"], noop().level(PermissionLevel::Admin)).unwrap();
        let t = b.build();
        assert_eq!(t.usage(&t.commands()[0], "ops", PermissionLevel::Guest), "ops ");
        assert_eq!(t.usage(&t.commands()[0], "ops", PermissionLevel::Admin), "ops <reboot>");
    }
}
