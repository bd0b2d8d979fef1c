use std::io::Write;

use super::{open_repo, App};

use clap::{ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("status").about("Show branches, staged changes, and working tree state")
}

pub(crate) fn run(app: &mut App, _args: &ArgMatches) -> twig::Result<()> {
    let status = open_repo(app)?.status()?;
    write!(app, "{}", status)?;
    Ok(())
}
