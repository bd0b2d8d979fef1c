use std::io::Write;

use clap::ArgMatches;
use tracing::debug;
use twig::{store::OnDisk, Error, Repository};

use crate::{App, Result};

mod add;
mod branch;
mod checkout;
mod commit;
mod find;
mod global_log;
mod init;
mod log;
mod merge;
mod reset;
mod rm;
mod rm_branch;
mod status;

pub(crate) fn add_subcommands<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
    app.subcommand(add::subcommand())
        .subcommand(branch::subcommand())
        .subcommand(checkout::subcommand())
        .subcommand(commit::subcommand())
        .subcommand(find::subcommand())
        .subcommand(global_log::subcommand())
        .subcommand(init::subcommand())
        .subcommand(log::subcommand())
        .subcommand(merge::subcommand())
        .subcommand(reset::subcommand())
        .subcommand(rm::subcommand())
        .subcommand(rm_branch::subcommand())
        .subcommand(status::subcommand())
}

pub(crate) fn dispatch(app: &mut App) -> Result<()> {
    let matches = app.arg_matches.clone();
    // ^^ Need an independent copy of matches so we can still pass
    // the App struct through to subcommand imps.

    let r = match matches.subcommand() {
        ("add", Some(m)) => add::run(app, &m),
        ("branch", Some(m)) => branch::run(app, &m),
        ("checkout", Some(m)) => checkout::run(app, &m),
        ("commit", Some(m)) => commit::run(app, &m),
        ("find", Some(m)) => find::run(app, &m),
        ("global-log", Some(m)) => global_log::run(app, &m),
        ("init", Some(m)) => init::run(app, &m),
        ("log", Some(m)) => log::run(app, &m),
        ("merge", Some(m)) => merge::run(app, &m),
        ("reset", Some(m)) => reset::run(app, &m),
        ("rm", Some(m)) => rm::run(app, &m),
        ("rm-branch", Some(m)) => rm_branch::run(app, &m),
        ("status", Some(m)) => status::run(app, &m),
        ("", None) => Err(Error::NoCommand),
        // Anything else arrives as an external subcommand.
        _ => Err(Error::UnknownCommand),
    };

    report(app, r)
}

/// Prints problems the user can fix to stdout and treats them as success.
/// Anything else aborts the command.
fn report(app: &mut App, r: twig::Result<()>) -> Result<()> {
    match r {
        Err(err) if err.is_user_error() => {
            debug!(kind = ?err.kind(), "command refused");
            writeln!(app, "{}", err)?;
            Ok(())
        }
        r => Ok(r?),
    }
}

fn open_repo(app: &App) -> twig::Result<Repository<OnDisk>> {
    Repository::open(OnDisk::new(app.work_dir()?))
}

fn operand<'m>(args: &'m ArgMatches, name: &str) -> twig::Result<&'m str> {
    args.value_of(name).ok_or(Error::IncorrectOperands)
}
