use std::io::Write;

use super::{open_repo, operand, App};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("merge")
        .about("Merge another branch into the current branch")
        .arg(Arg::with_name("branch").help("The branch to merge in"))
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> twig::Result<()> {
    let branch = operand(args, "branch")?;
    let outcome = open_repo(app)?.merge(branch)?;

    if let Some(message) = outcome.message() {
        writeln!(app, "{}", message)?;
    }
    Ok(())
}
