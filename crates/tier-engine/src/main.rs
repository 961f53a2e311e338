use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tier_engine::{calculate_progress, split_commission, EngineSettings, TierProgress};
use tier_model::{AgentTier, PerformanceMetrics};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn cli() -> Command {
    Command::new("tierctl")
        .version(tier_engine::VERSION)
        .about("Inspect the agent commission tier ladder")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Engine settings file (TOML)"),
        )
        .subcommand(
            Command::new("ladder")
                .about("Print the resolved tier ladder")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("progress")
                .about("Progress toward the next tier")
                .arg(
                    Arg::new("tier")
                        .long("tier")
                        .required(true)
                        .help("Current tier, e.g. sales_leader"),
                )
                .arg(
                    Arg::new("sales")
                        .long("sales")
                        .default_value("0")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("Monthly sales count"),
                )
                .arg(
                    Arg::new("team")
                        .long("team")
                        .default_value("0")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("Team member count"),
                ),
        )
        .subcommand(
            Command::new("split")
                .about("Split a gross commission at a tier's default split")
                .arg(
                    Arg::new("tier")
                        .long("tier")
                        .required(true)
                        .help("Agent tier"),
                )
                .arg(
                    Arg::new("gross")
                        .long("gross")
                        .required(true)
                        .help("Gross commission amount"),
                ),
        )
        .subcommand(
            Command::new("check-config")
                .about("Validate a settings file")
                .arg(
                    Arg::new("path")
                        .long("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Settings file to check"),
                ),
        )
}

fn load_settings(matches: &ArgMatches) -> anyhow::Result<EngineSettings> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => EngineSettings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(EngineSettings::default()),
    }
}

fn tier_arg(args: &ArgMatches) -> anyhow::Result<AgentTier> {
    let Some(raw) = args.get_one::<String>("tier") else {
        bail!("--tier is required");
    };
    Ok(raw.parse()?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tierctl=info,tier_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("ladder", args)) => {
            let ladder = load_settings(&matches)?.seed_ladder();
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&ladder.to_vec())?);
            } else {
                println!(
                    "{:<16} {:>6} {:>6} {:>6} {:>6}",
                    "tier", "split", "bonus", "sales", "team"
                );
                for row in ladder.iter() {
                    println!(
                        "{:<16} {:>5}% {:>5}% {:>6} {:>6}",
                        row.tier,
                        row.commission_split,
                        row.leadership_bonus_rate,
                        row.requirements.monthly_sales,
                        row.requirements.team_members,
                    );
                }
            }
        }
        Some(("progress", args)) => {
            let ladder = load_settings(&matches)?.seed_ladder();
            let tier = tier_arg(args)?;
            let sales = args.get_one::<i64>("sales").copied().unwrap_or_default();
            let team = args.get_one::<i64>("team").copied().unwrap_or_default();

            match calculate_progress(&ladder, tier, PerformanceMetrics::new(sales, team)) {
                TierProgress::MaxTierReached { current } => {
                    println!("{current} is the top tier");
                }
                TierProgress::InProgress(p) => {
                    println!("{} -> {}", p.current, p.next);
                    println!(
                        "  sales:   {}/{} ({:.1}%)",
                        p.sales.actual, p.sales.required, p.sales.percent
                    );
                    println!(
                        "  team:    {}/{} ({:.1}%)",
                        p.team.actual, p.team.required, p.team.percent
                    );
                    println!("  overall: {:.1}%", p.overall);
                    println!("  eligible: {}", if p.eligible { "yes" } else { "no" });
                }
            }
        }
        Some(("split", args)) => {
            let ladder = load_settings(&matches)?.seed_ladder();
            let tier = tier_arg(args)?;
            let Some(raw) = args.get_one::<String>("gross") else {
                bail!("--gross is required");
            };
            let gross = Decimal::from_str(raw)
                .with_context(|| format!("'{raw}' is not a decimal amount"))?;

            let breakdown = split_commission(gross, ladder.config(tier).commission_split)?;
            println!("gross:   {}", breakdown.gross);
            println!("split:   {}%", breakdown.split_percent);
            println!("agent:   {}", breakdown.agent_share);
            println!("company: {}", breakdown.company_share);
        }
        Some(("check-config", args)) => {
            let Some(path) = args.get_one::<PathBuf>("path") else {
                bail!("--path is required");
            };
            let settings = EngineSettings::from_file(path)
                .with_context(|| format!("checking {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                seeded_tiers = settings.tiers.len(),
                "settings valid"
            );
            println!("{}: OK", path.display());
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["tierctl", "ladder", "--config", "tiers.toml"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("tiers.toml"))
        );
    }

    #[test]
    fn negative_sales_are_accepted() {
        let matches = cli()
            .try_get_matches_from(["tierctl", "progress", "--tier", "advisor", "--sales", "-3"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<i64>("sales"), Some(&-3));
    }
}
