use super::{open_repo, operand, App};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("rm-branch")
        .about("Delete a branch pointer")
        .arg(Arg::with_name("name").help("The branch to delete"))
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> twig::Result<()> {
    let name = operand(args, "name")?;
    open_repo(app)?.rm_branch(name)
}
