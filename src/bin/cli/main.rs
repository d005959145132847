mod run;
mod show;

use clap::{value_t, App, AppSettings, Arg, ArgMatches, SubCommand};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use sweeper_solver::config::{MineCount, SweeperConfig};
use sweeper_solver::solver::Algorithm;
use tracing_subscriber::EnvFilter;

fn board_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name("height")
            .help("Number of rows")
            .long("height")
            .default_value("17")
            .takes_value(true),
        Arg::with_name("width")
            .help("Number of columns")
            .long("width")
            .default_value("17")
            .takes_value(true),
        Arg::with_name("mines")
            .help("Exact number of mines, overrides --density")
            .short("m")
            .long("mines")
            .takes_value(true),
        Arg::with_name("density")
            .help("Fraction of cells that are mines")
            .short("d")
            .long("density")
            .default_value("0.25")
            .takes_value(true),
    ]
}

fn config_from(matches: &ArgMatches) -> SweeperConfig {
    let mut config = SweeperConfig::default();

    config.height = value_t!(matches, "height", usize).unwrap_or_else(|e| e.exit());
    config.width = value_t!(matches, "width", usize).unwrap_or_else(|e| e.exit());
    config.mines = if matches.is_present("mines") {
        MineCount::Exact(value_t!(matches, "mines", usize).unwrap_or_else(|e| e.exit()))
    } else {
        MineCount::Density(value_t!(matches, "density", f32).unwrap_or_else(|e| e.exit()))
    };

    config
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = App::new("Sweeper Solver")
        .subcommand(
            SubCommand::with_name("run")
                .about("Play rounds headlessly and report how the solver did")
                .args(&board_args())
                .arg(
                    Arg::with_name("algorithm")
                        .help("The solver to run")
                        .short("a")
                        .long("algorithm")
                        .possible_values(&["linear-scan", "heuristic-sweep", "learned-policy"])
                        .default_value("heuristic-sweep")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("rounds")
                        .help("Stop after this many rounds")
                        .short("n")
                        .long("rounds")
                        .default_value("100")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("time-limit")
                        .help("Stop after this many seconds")
                        .long("time-limit")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("model")
                        .help("Where the learned policy saves its model")
                        .long("model")
                        .default_value("models/linear.bin")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("load-model")
                        .help("Start the learned policy from a saved model")
                        .long("load-model")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("train-every")
                        .help("Retrain the learned policy after this many samples")
                        .long("train-every")
                        .default_value("5000")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("examples-out")
                        .help("Append every training sample to this file")
                        .long("examples-out")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("show")
                .about("Generate a board and print it")
                .args(&board_args())
                .arg(
                    Arg::with_name("seed")
                        .help("Seed for mine placement")
                        .long("seed")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("reveal")
                        .help("Reveal the safe origin before printing")
                        .long("reveal"),
                ),
        )
        .setting(AppSettings::ArgRequiredElseHelp)
        .get_matches();

    match matches.subcommand() {
        ("run", Some(matches)) => {
            let mut config = config_from(matches);

            config.algorithm = value_t!(matches, "algorithm", Algorithm).unwrap_or_else(|e| e.exit());
            config.learned_policy.model_path = PathBuf::from(matches.value_of("model").unwrap_or_default());
            config.learned_policy.train_every =
                value_t!(matches, "train-every", usize).unwrap_or_else(|e| e.exit());
            if matches.is_present("time-limit") {
                let seconds = value_t!(matches, "time-limit", f64).unwrap_or_else(|e| e.exit());
                config.time_limit = Some(Duration::from_secs_f64(seconds.max(0.0)));
            }

            run::run(run::RunOptions {
                config,
                rounds: value_t!(matches, "rounds", u32).unwrap_or_else(|e| e.exit()),
                load_model: matches.value_of("load-model").map(PathBuf::from),
                examples_out: matches.value_of("examples-out").map(PathBuf::from),
            })
        }
        ("show", Some(matches)) => {
            let config = config_from(matches);
            let seed = if matches.is_present("seed") {
                Some(value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit()))
            } else {
                None
            };

            show::run(&config, seed, matches.is_present("reveal"))
        }
        _ => Ok(()),
    }
}
