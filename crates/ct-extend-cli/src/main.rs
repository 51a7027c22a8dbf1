use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ct_extend::{ExtendConfig, SeriesExtender};
use ct_series::order_slices;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod io;

fn cli() -> Command {
    let input = Arg::new("input")
        .long("input")
        .short('i')
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON array of slices");

    Command::new("ct-extend")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extend CT series with extrapolated slices")
        .subcommand_required(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("extend")
                .about("Add slices at the head and/or tail of a series")
                .arg(input.clone())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the extended series (stdout if omitted)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("slices")
                        .long("slices")
                        .value_parser(value_parser!(usize))
                        .help("Slices to add at both ends"),
                )
                .arg(
                    Arg::new("head")
                        .long("head")
                        .value_parser(value_parser!(usize))
                        .help("Slices to add below the first slice"),
                )
                .arg(
                    Arg::new("tail")
                        .long("tail")
                        .value_parser(value_parser!(usize))
                        .help("Slices to add above the last slice"),
                )
                .arg(
                    Arg::new("uids")
                        .long("uids")
                        .value_parser(value_parser!(PathBuf))
                        .help("File with one UID per new slice, lowest location first"),
                )
                .arg(
                    Arg::new("uid-root")
                        .long("uid-root")
                        .help("Root for generated UIDs"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Order a series and report its extent, spacing and consistency")
                .arg(input),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    if let Err(err) = run(&matches) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("extend", args)) => run_extend(args),
        Some(("inspect", args)) => run_inspect(args),
        _ => Ok(()),
    }
}

/// Config file first, then flags on top
fn load_config(args: &ArgMatches) -> Result<ExtendConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ExtendConfig::from_toml_str(&text)
                .with_context(|| format!("loading {}", path.display()))?
        }
        None => ExtendConfig::default(),
    };

    if let Some(&count) = args.get_one::<usize>("slices") {
        config = config.with_slices(count);
    }
    if let Some(&count) = args.get_one::<usize>("head") {
        config = config.with_head_slices(count);
    }
    if let Some(&count) = args.get_one::<usize>("tail") {
        config = config.with_tail_slices(count);
    }
    if let Some(root) = args.get_one::<String>("uid-root") {
        config = config.with_uid_root(root.as_str());
    }

    Ok(config)
}

fn run_extend(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let input = args.get_one::<PathBuf>("input").context("--input is required")?;
    let slices = io::read_slices(input)?;
    let request = config.request();

    tracing::info!(
        "Extending {} slices from {} ({} head, {} tail)",
        slices.len(),
        input.display(),
        request.head,
        request.tail
    );

    let mut extender = SeriesExtender::new(config)?;
    let series = match args.get_one::<PathBuf>("uids") {
        Some(path) => {
            let uids = io::read_uids(path)?;
            extender.extend_with_uids(&slices, request, uids)?
        }
        None => extender.extend(&slices, request)?,
    };

    tracing::debug!("Extended series: {:?}", series.summary());
    let output = args.get_one::<PathBuf>("output");
    io::write_slices(output.map(PathBuf::as_path), &series.into_vec())
}

fn run_inspect(args: &ArgMatches) -> Result<()> {
    let input = args.get_one::<PathBuf>("input").context("--input is required")?;
    let series = order_slices(io::read_slices(input)?)?;
    let violation = series.verify().err().map(|e| e.to_string());

    let report = serde_json::json!({
        "summary": series.summary(),
        "consistent": violation.is_none(),
        "violation": violation,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
