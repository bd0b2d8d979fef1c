use super::{open_repo, App};

use clap::{Arg, ArgMatches, SubCommand};
use twig::Error;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("checkout")
        .about("Switch branches, or restore a file from a commit")
        .arg(
            Arg::with_name("target")
                .value_name("branch|commit")
                .help("The branch to switch to, or the commit to restore the file from"),
        )
        .arg(
            Arg::with_name("file")
                .last(true)
                .help("The file to restore (defaults to the head commit's version)"),
        )
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> twig::Result<()> {
    let mut repo = open_repo(app)?;

    match (args.value_of("target"), args.value_of("file")) {
        (commit, Some(file)) => repo.checkout_file(commit, file),
        (Some(branch), None) => repo.checkout_branch(branch),
        (None, None) => Err(Error::IncorrectOperands),
    }
}
