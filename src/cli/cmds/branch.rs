use super::{open_repo, operand, App};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("branch")
        .about("Create a branch at the current head")
        .arg(Arg::with_name("name").help("The new branch's name"))
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> twig::Result<()> {
    let name = operand(args, "name")?;
    open_repo(app)?.branch(name)
}
