use clap::{ArgGroup, arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

/// Probe tuning shared by `analyze` and `serve`
fn with_probe_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(-c --"concurrency" <NUM>)
            .required(false)
            .help("Maximum number of links probed at the same time")
            .value_parser(clap::value_parser!(usize))
            .default_value("10"),
    )
    .arg(
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Timeout for each HTTP request in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("10"),
    )
    .arg(
        arg!(--"deadline" <SECONDS>)
            .required(false)
            .help("Overall deadline for probing all links in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("30"),
    )
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("pagelens")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pagelens")
        .about("Structural metadata and link health for a single web page")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner, spinner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Enable debug logging")
                .required(false)
                .global(true)
                .conflicts_with("quiet"),
        )
        .subcommand_required(false)
        .subcommand(with_probe_args(
            command!("analyze")
                .about(
                    "Analyze a page: HTML version, title, headings, link counts, inaccessible \
                links and login forms.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The URL of the page to fetch and analyze"),
                )
                .arg(
                    arg!(--"file" <PATH>)
                        .required(false)
                        .help("Analyze a local HTML file instead of fetching a URL")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .requires("base-url"),
                )
                .arg(
                    arg!(--"base-url" <URL>)
                        .required(false)
                        .help("Base URL the local file is resolved against")
                        .requires("file"),
                )
                .group(
                    ArgGroup::new("source")
                        .args(["url", "file"])
                        .required(true)
                        .multiple(false),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown", "md"])
                        .default_value("text"),
                ),
        ))
        .subcommand(with_probe_args(
            command!("serve")
                .about("Serve the analysis HTTP API (GET /api/v1/info?url=...)")
                .arg(
                    arg!(-l --"listen" <ADDR>)
                        .required(false)
                        .help("Address to listen on")
                        .default_value(DEFAULT_LISTEN_ADDR),
                ),
        ))
}
