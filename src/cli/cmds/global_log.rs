use std::io::Write;

use super::{open_repo, App};

use clap::{ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("global-log").about("Show every commit ever made")
}

pub(crate) fn run(app: &mut App, _args: &ArgMatches) -> twig::Result<()> {
    for entry in open_repo(app)?.global_log()? {
        writeln!(app, "{}", entry)?;
    }
    Ok(())
}
