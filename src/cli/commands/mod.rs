pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";
pub const ARG_DSN: &str = "dsn";
pub const ARG_MAX_CONNECTIONS: &str = "max-connections";
pub const CMD_CHECK_DB: &str = "check-db";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("bakery")
        .about("Bakery and baked goods HTTP API")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("5555")
                .env("BAKERY_PORT")
                .global(true)
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long("dsn")
                .help("Database connection string, example: sqlite://app.db")
                .default_value("sqlite://app.db")
                .env("BAKERY_DSN")
                .global(true),
        )
        .arg(
            Arg::new(ARG_MAX_CONNECTIONS)
                .long("max-connections")
                .help("Maximum number of pooled database connections")
                .default_value("5")
                .env("BAKERY_MAX_CONNECTIONS")
                .global(true)
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .subcommand(
            Command::new(CMD_CHECK_DB)
                .about("Apply migrations, print tables and row counts, then exit"),
        );

    logging::with_args(command)
}
