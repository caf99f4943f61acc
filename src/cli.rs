// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    ]
}

fn year_arg() -> Arg {
    Arg::new("year")
        .long("year")
        .value_parser(value_parser!(i32).range(1..=9999))
}

/// `--year`, `--month` and `--offset` select the viewing month; the
/// defaults are today's.
fn scope_args() -> [Arg; 3] {
    [
        year_arg().help("Year of the month to show (default: current)"),
        Arg::new("month")
            .long("month")
            .value_parser(value_parser!(u32).range(1..=12))
            .help("Month 1-12 (default: current)"),
        Arg::new("offset")
            .long("offset")
            .value_parser(value_parser!(i32))
            .allow_negative_numbers(true)
            .help("Move the selected month by N months, e.g. -1 for the previous one"),
    ]
}

fn all_arg() -> Arg {
    Arg::new("all")
        .long("all")
        .action(ArgAction::SetTrue)
        .conflicts_with_all(["year", "month", "offset"])
        .help("Fetch every transaction instead of one month")
}

fn history_args() -> [Arg; 4] {
    [
        Arg::new("search")
            .long("search")
            .help("Only entries whose category or memo contains this text"),
        Arg::new("type")
            .long("type")
            .default_value("all")
            .value_parser(["all", "income", "expense"]),
        Arg::new("sort")
            .long("sort")
            .default_value("date")
            .value_parser(["date", "amount"]),
        Arg::new("asc")
            .long("asc")
            .action(ArgAction::SetTrue)
            .help("Ascending order (default: descending)"),
    ]
}

fn tx_fields(required: bool) -> [Arg; 5] {
    [
        Arg::new("amount").long("amount").required(required),
        Arg::new("category").long("category").required(required),
        Arg::new("date")
            .long("date")
            .required(required)
            .help("YYYY-MM-DD"),
        Arg::new("type")
            .long("type")
            .required(required)
            .value_parser(["income", "expense", "収入", "支出"]),
        Arg::new("memo").long("memo"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("future")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track monthly income and expenses against a Future backend")
        .arg(
            Arg::new("api_url")
                .long("api-url")
                .global(true)
                .help("Backend base URL (env FUTURE_API_BASE_URL)"),
        )
        .arg(
            Arg::new("fallback")
                .long("offline-fallback")
                .global(true)
                .value_parser(["true", "false"])
                .help("Show fallback data when the backend is unreachable (env FUTURE_FALLBACK_TO_MOCKS)"),
        )
        .arg(
            Arg::new("insert_policy")
                .long("insert-policy")
                .global(true)
                .value_parser(["scoped", "always"])
                .help("Whether new transactions outside the month stay visible (env FUTURE_INSERT_POLICY)"),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("list")
                        .args(scope_args())
                        .arg(all_arg())
                        .args(history_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("add")
                        .args(tx_fields(true))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("update")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .args(tx_fields(true))
                        .args(scope_args()),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .args(scope_args()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries and chart series")
                .subcommand(
                    Command::new("summary")
                        .args(scope_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("monthly")
                        .arg(year_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("categories")
                        .args(scope_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("weekdays")
                        .args(scope_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("stats")
                        .about("Transaction count, average amount and largest expenses")
                        .args(scope_args())
                        .arg(
                            Arg::new("top")
                                .long("top")
                                .default_value("5")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("trend")
                        .args(scope_args())
                        .arg(
                            Arg::new("saved")
                                .long("saved")
                                .default_value("0")
                                .help("Total savings today; the trend starts at this minus the month's balance"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("goals")
                .about("Savings goals")
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("current").long("current").default_value("0"))
                        .arg(Arg::new("date").long("date").help("Target date YYYY-MM-DD")),
                )
                .subcommand(
                    Command::new("update")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("current").long("current").required(true))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("project")
                        .about("Months until the profile savings target at this month's pace")
                        .args(scope_args())
                        .arg(Arg::new("saved").long("saved").required(true))
                        .arg(
                            Arg::new("goal")
                                .long("goal")
                                .help("Target amount (default: profile savings goal)"),
                        ),
                ),
        )
        .subcommand(
            Command::new("profile")
                .about("User profile")
                .subcommand(Command::new("show").args(json_args()))
                .subcommand(
                    Command::new("set-goal").arg(Arg::new("amount").long("amount").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export transactions")
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("out").long("out").help("Output path (default: future_<today>.<ext>)"))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .args(scope_args())
                        .arg(all_arg()),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import transactions")
                .subcommand(
                    Command::new("transactions").arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(Command::new("categories").about("Suggested categories"))
}
