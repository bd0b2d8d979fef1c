use std::io::Write;

use super::{open_repo, operand, App};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("find")
        .about("Print the IDs of all commits with the given message")
        .arg(Arg::with_name("message").help("The exact commit message"))
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> twig::Result<()> {
    let message = operand(args, "message")?;
    for id in open_repo(app)?.find(message)? {
        writeln!(app, "{}", id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cmds::test_support::*;

    #[test]
    fn finds_matching_commits() {
        let temp = init_dir();
        commit_file(temp.path(), "a.txt", "1", "same");
        commit_file(temp.path(), "a.txt", "2", "same");
        commit_file(temp.path(), "a.txt", "3", "different");

        let found = run_in(temp.path(), &["find", "same"]);
        let ids: Vec<&str> = found.lines().collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.iter().all(|id| id.len() == 40));
    }

    #[test]
    fn nothing_found() {
        let temp = init_dir();
        assert_eq!(
            run_in(temp.path(), &["find", "no such thing"]),
            "Found no commit with that message.\n"
        );
    }
}
