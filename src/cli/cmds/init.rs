use super::App;

use clap::{ArgMatches, SubCommand};
use tracing::info;
use twig::{store::OnDisk, Repository};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("init").about("Create an empty repository in the working directory")
}

pub(crate) fn run(app: &mut App, _args: &ArgMatches) -> twig::Result<()> {
    let work_dir = app.work_dir()?;
    let repo = Repository::init(OnDisk::new(&work_dir))?;

    info!(path = %work_dir.display(), head = %repo.head(), "initialized repository");
    Ok(())
}
