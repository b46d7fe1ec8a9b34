//! Demo command set registered by the console.

use hark_dispatch::{
    Abort, BoundArguments, CommandDef, CommandTree, GroupDef, Output, PERMISSION_LEVEL, ParamType,
    ParameterSpec, PermissionLevel, TreeBuilder, TypeRegistry, Value,
};
use hark_types::Result;

use crate::session::Session;
use crate::users::UserId;

/// Entity type key for users in the session's database.
pub const USER: &str = "user";

const SUPERADMIN_PASSWORD: &str = "hunter2";

type HandlerResult = std::result::Result<(), Abort>;

/// Parameter types the demo commands use: integers and text are built in,
/// permission levels are a closed set, users resolve against the session.
pub fn types() -> TypeRegistry<Session> {
    TypeRegistry::new()
        .with_permission_levels()
        .entity(USER, |session: &Session, token: &str| {
            session
                .users
                .find(token)
                .map(Value::entity)
                .ok_or_else(|| format!("User {token} not found."))
        })
}

/// Build the demo command tree.
pub fn build_tree(case_insensitive: bool) -> Result<CommandTree<Session>> {
    let mut b = TreeBuilder::with_case_rule(types(), case_insensitive);
    register(&mut b)?;
    let tree = b.build();
    log::debug!("demo tree: {} top-level commands", tree.commands().len());
    Ok(tree)
}

/// Register every demo command on `b`, in listing order.
pub fn register(b: &mut TreeBuilder<Session>) -> Result<()> {
    let int = |name: &str| ParameterSpec::required(name, ParamType::Integer);

    // Arithmetic.
    b.command(
        &["add"],
        CommandDef::new(add)
            .doc("Adds two integers together.")
            .param(int("num1"))
            .param(int("num2")),
    )?;
    b.command(
        &["subtract"],
        CommandDef::new(subtract)
            .doc("Subtracts num2 from num1.")
            .param(int("num1"))
            .param(int("num2")),
    )?;
    b.command(
        &["divide"],
        CommandDef::new(divide)
            .doc("Divides num1 by num2.")
            .alias("div")
            .param(int("num1"))
            .param(int("num2")),
    )?;
    b.command(
        &["add3or4"],
        CommandDef::new(add3or4)
            .doc("Adds three or four integers together.")
            .param(int("num1"))
            .param(int("num2"))
            .param(int("num3"))
            .param(ParameterSpec::optional("num4", ParamType::Integer)),
    )?;

    // Users.
    b.command(&["myname"], CommandDef::new(my_name).doc("Returns your name."))?;
    b.command(
        &["favorite-food"],
        CommandDef::new(favorite_food)
            .doc("Gets or sets the favorite food of a user.")
            .param(ParameterSpec::required("querying", ParamType::entity(USER)))
            .param(ParameterSpec::optional("food", ParamType::Text)),
    )?;
    b.command(
        &["add-user"],
        CommandDef::new(add_user)
            .doc("Creates a new user.")
            .level(PermissionLevel::Admin)
            .param(ParameterSpec::required("name", ParamType::Text))
            .param(ParameterSpec::required(
                "permissionLevel",
                ParamType::choice(PERMISSION_LEVEL),
            ))
            .param(ParameterSpec::required("favoriteFood", ParamType::Text).greedy()),
    )?;
    b.command(
        &["permission-level"],
        CommandDef::new(permission_level)
            .doc("Gets the permission level of a user.")
            .param(ParameterSpec::required("user", ParamType::entity(USER))),
    )?;

    // Window.
    b.group(&["window"], GroupDef::new().doc("Manipulates the console window."))?;
    b.command(
        &["window", "resize"],
        CommandDef::new(window_resize)
            .doc("Resizes the window.")
            .param(int("width"))
            .param(int("height")),
    )?;
    b.command(
        &["window", "move"],
        CommandDef::new(window_move)
            .doc("Moves the window to a certain position.")
            .param(int("left"))
            .param(int("top")),
    )?;

    // Privileged.
    b.command(
        &["superadmin-me"],
        CommandDef::new(superadmin_me)
            .doc("Makes you a superadmin, given the password.")
            .level(PermissionLevel::Admin)
            .param(ParameterSpec::required("superSecretPassword", ParamType::Text)),
    )?;
    b.command(
        &["delete-production"],
        CommandDef::new(delete_production)
            .doc("Why would you want to do this!?")
            .level(PermissionLevel::Superadmin),
    )?;
    b.group(
        &["supersecret"],
        GroupDef::new().doc("A or B.").level(PermissionLevel::Superadmin),
    )?;
    b.command(
        &["supersecret", "a"],
        CommandDef::new(|_: &mut Session, _: &BoundArguments, out: &mut dyn Output| {
            out.line("A");
            Ok(())
        })
        .doc("A."),
    )?;
    b.command(
        &["supersecret", "b"],
        CommandDef::new(|_: &mut Session, _: &BoundArguments, out: &mut dyn Output| {
            out.line("B");
            Ok(())
        })
        .doc("B."),
    )?;

    b.help(&["help"], PermissionLevel::Guest)
}

fn int_arg(args: &BoundArguments, index: usize) -> std::result::Result<i64, Abort> {
    args.integer(index)
        .ok_or_else(|| Abort::new(format!("Argument {} is missing.", index + 1)))
}

fn text_arg(args: &BoundArguments, index: usize) -> std::result::Result<&str, Abort> {
    args.text(index)
        .ok_or_else(|| Abort::new(format!("Argument {} is missing.", index + 1)))
}

fn user_arg(args: &BoundArguments, index: usize) -> std::result::Result<UserId, Abort> {
    args.entity::<UserId>(index)
        .copied()
        .ok_or_else(|| Abort::new(format!("Argument {} is missing.", index + 1)))
}

fn too_large() -> Abort {
    Abort::new("The result is too large.")
}

fn add(_: &mut Session, args: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    let (a, b) = (int_arg(args, 0)?, int_arg(args, 1)?);
    let sum = a.checked_add(b).ok_or_else(too_large)?;
    out.line(&format!("{a} + {b} = {sum}"));
    Ok(())
}

fn subtract(_: &mut Session, args: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    let (a, b) = (int_arg(args, 0)?, int_arg(args, 1)?);
    let difference = a.checked_sub(b).ok_or_else(too_large)?;
    out.line(&format!("{a} - {b} = {difference}"));
    Ok(())
}

fn divide(_: &mut Session, args: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    let (a, b) = (int_arg(args, 0)?, int_arg(args, 1)?);
    if b == 0 {
        return Err(Abort::new("Cannot divide by zero."));
    }
    let quotient = a as f64 / b as f64;
    out.line(&format!("{a} / {b} = {quotient}"));
    Ok(())
}

fn add3or4(_: &mut Session, args: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    let mut sum: i64 = 0;
    for index in 0..args.len() {
        if let Some(n) = args.integer(index) {
            sum = sum.checked_add(n).ok_or_else(too_large)?;
        }
    }
    out.line(&format!("sum = {sum}"));
    Ok(())
}

fn my_name(session: &mut Session, _: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    let user = session
        .current_user()
        .ok_or_else(|| Abort::new("You are not logged in."))?;
    out.line(&format!("Your name is {}.", user.name));
    Ok(())
}

fn favorite_food(session: &mut Session, args: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    let id = user_arg(args, 0)?;
    let user = session
        .users
        .get_mut(id)
        .ok_or_else(|| Abort::new("That user no longer exists."))?;
    match args.text(1) {
        None => out.line(&format!("{}'s favorite food is {}.", user.name, user.favorite_food)),
        Some(food) => {
            user.favorite_food = food.to_string();
            out.line(&format!("{}'s favorite food was set to {food}.", user.name));
        },
    }
    Ok(())
}

fn add_user(session: &mut Session, args: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    let name = text_arg(args, 0)?;
    let level = args
        .choice(1)
        .and_then(|index| PermissionLevel::ALL.get(index).copied())
        .ok_or_else(|| Abort::new("Argument 2 is missing."))?;
    let food = text_arg(args, 2)?;
    if session.users.find(name).is_some() {
        return Err(Abort::new(format!("User {name} already exists!")));
    }
    session.users.add(name, food, level);
    log::info!("added user {name} ({level})");
    out.line(&format!("Added user {name} with favorite food {food}."));
    Ok(())
}

fn permission_level(session: &mut Session, args: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    let id = user_arg(args, 0)?;
    let user = session
        .users
        .get(id)
        .ok_or_else(|| Abort::new("That user no longer exists."))?;
    out.line(&format!("{} has the permission level of {}.", user.name, user.level));
    Ok(())
}

fn window_resize(session: &mut Session, args: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    let window = &mut session.window;
    window.width = int_arg(args, 0)?;
    window.height = int_arg(args, 1)?;
    out.line(&format!("Window dimensions set to {} x {}.", window.width, window.height));
    Ok(())
}

fn window_move(session: &mut Session, args: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    let window = &mut session.window;
    window.left = int_arg(args, 0)?;
    window.top = int_arg(args, 1)?;
    out.line(&format!("Window position set to ({}, {}).", window.left, window.top));
    Ok(())
}

fn superadmin_me(session: &mut Session, args: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    if text_arg(args, 0)? != SUPERADMIN_PASSWORD {
        return Err(Abort::new("Incorrect password."));
    }
    let current = session.current;
    let user = session
        .users
        .get_mut(current)
        .ok_or_else(|| Abort::new("You are not logged in."))?;
    user.level = PermissionLevel::Superadmin;
    log::info!("{} is now a superadmin", user.name);
    out.line("You are now a superadmin.");
    Ok(())
}

fn delete_production(_: &mut Session, _: &BoundArguments, out: &mut dyn Output) -> HandlerResult {
    out.line("Congratulations! You deleted production!");
    Ok(())
}
