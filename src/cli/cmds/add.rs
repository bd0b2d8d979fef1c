use super::{open_repo, operand, App};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("add")
        .about("Stage a file for the next commit")
        .arg(Arg::with_name("file").help("The file to stage"))
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> twig::Result<()> {
    let path = operand(args, "file")?;
    open_repo(app)?.add(path)?;
    Ok(())
}
