use std::{ffi::OsString, path::PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command};

#[derive(Default, Debug, Clone)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub listen: Option<String>,
    pub peer: Option<String>,
    pub grace_ms: Option<u64>,
    pub dump_config: bool,
}

fn cli(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new("config")
                .long("config")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .help("A TOML file overriding the built-in configuration"),
        )
        .arg(
            Arg::new("listen")
                .long("listen")
                .action(ArgAction::Set)
                .help("The address to accept calls on"),
        )
        .arg(
            Arg::new("peer")
                .long("peer")
                .action(ArgAction::Set)
                .help("The host:port of the peer's listener"),
        )
        .arg(
            Arg::new("grace-ms")
                .long("grace-ms")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u64))
                .help("Milliseconds to wait before calling the peer"),
        )
        .arg(
            Arg::new("dump-config")
                .long("dump-config")
                .action(ArgAction::SetTrue)
                .help("Print the effective configuration and exit"),
        )
}

impl From<ArgMatches> for Args {
    fn from(m: ArgMatches) -> Self {
        Args {
            config: m.get_one::<PathBuf>("config").cloned(),
            listen: m.get_one::<String>("listen").cloned(),
            peer: m.get_one::<String>("peer").cloned(),
            grace_ms: m.get_one::<u64>("grace-ms").copied(),
            dump_config: m.get_flag("dump-config"),
        }
    }
}

/// Parse the process arguments, exiting with usage on error.
pub fn parse_args(name: &'static str, about: &'static str) -> Args {
    cli(name, about).get_matches().into()
}

pub fn try_parse_from<I, T>(name: &'static str, about: &'static str, argv: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    cli(name, about).try_get_matches_from(argv).map(Args::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_means_no_overrides() {
        let args = try_parse_from("service-a", "", ["service-a"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.listen.is_none());
        assert!(args.peer.is_none());
        assert!(args.grace_ms.is_none());
        assert!(!args.dump_config);
    }

    #[test]
    fn flags_are_parsed() {
        let args = try_parse_from(
            "service-b",
            "",
            [
                "service-b",
                "--peer",
                "10.1.1.1:8081",
                "--grace-ms",
                "250",
                "--dump-config",
            ],
        )
        .unwrap();
        assert_eq!(args.peer.as_deref(), Some("10.1.1.1:8081"));
        assert_eq!(args.grace_ms, Some(250));
        assert!(args.dump_config);
    }

    #[test]
    fn grace_must_be_a_number() {
        assert!(try_parse_from("service-b", "", ["service-b", "--grace-ms", "soon"]).is_err());
    }
}
