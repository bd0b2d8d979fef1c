use super::{open_repo, App};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("commit")
        .about("Record the staged changes")
        .arg(Arg::with_name("message").help("The commit message"))
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> twig::Result<()> {
    // A missing message is reported the same way as an empty one.
    let message = args.value_of("message").unwrap_or("");
    open_repo(app)?.commit(message)?;
    Ok(())
}
