use super::{open_repo, operand, App};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("reset")
        .about("Move the current branch to a commit and check out its files")
        .arg(Arg::with_name("commit").help("Full or abbreviated commit ID"))
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> twig::Result<()> {
    let commit = operand(args, "commit")?;
    open_repo(app)?.reset(commit)?;
    Ok(())
}
