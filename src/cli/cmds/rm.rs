use super::{open_repo, operand, App};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("rm")
        .about("Unstage a file, or stop tracking it and delete it")
        .arg(Arg::with_name("file").help("The file to remove"))
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> twig::Result<()> {
    let path = operand(args, "file")?;
    open_repo(app)?.rm(path)
}
