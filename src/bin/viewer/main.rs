mod board_view;

use board_view::BoardView;
use clap::{value_t, App, Arg};
use cursive::event::{Event, Key};
use cursive::Cursive;
use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use sweeper_solver::config::{MineCount, SweeperConfig};
use sweeper_solver::scheduler::{launch, SharedSession};
use sweeper_solver::solver::learned_policy::LinearModel;
use sweeper_solver::solver::{standard_solvers, Algorithm, LearnedPolicy};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn load_config() -> (SweeperConfig, Option<String>, Option<String>) {
    let matches = App::new("Sweeper Solver Viewer")
        .arg(
            Arg::with_name("height")
                .long("height")
                .default_value("17")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .default_value("17")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("density")
                .short("d")
                .long("density")
                .default_value("0.25")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("algorithm")
                .short("a")
                .long("algorithm")
                .possible_values(&["linear-scan", "heuristic-sweep", "learned-policy"])
                .default_value("heuristic-sweep")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("step-ms")
                .help("Pause between solver steps in milliseconds")
                .long("step-ms")
                .default_value("1")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("load-model")
                .long("load-model")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("log")
                .help("Write logs to this file")
                .long("log")
                .takes_value(true),
        )
        .get_matches();

    let mut config = SweeperConfig::default();
    config.height = value_t!(matches, "height", usize).unwrap_or_else(|e| e.exit());
    config.width = value_t!(matches, "width", usize).unwrap_or_else(|e| e.exit());
    config.mines = MineCount::Density(value_t!(matches, "density", f32).unwrap_or_else(|e| e.exit()));
    config.algorithm = value_t!(matches, "algorithm", Algorithm).unwrap_or_else(|e| e.exit());
    config.step_interval =
        Duration::from_millis(value_t!(matches, "step-ms", u64).unwrap_or_else(|e| e.exit()));

    (
        config,
        matches.value_of("load-model").map(String::from),
        matches.value_of("log").map(String::from),
    )
}

fn cycle_algorithm(session: &SharedSession, forward: bool) {
    let count = Algorithm::all().len();
    let current = session.selected_algorithm() % count;
    let next = if forward {
        (current + 1) % count
    } else {
        (current + count - 1) % count
    };

    session.select_algorithm(next);
    info!(algorithm = Algorithm::from_index(next).name(), "selected algorithm");
}

fn main() -> Result<(), Box<dyn Error>> {
    let (config, load_model, log) = load_config();

    // The terminal belongs to the UI, so logs only go to a file.
    if let Some(path) = log {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .init();
    }

    let mut policy = LearnedPolicy::new(config.learned_policy.clone());
    if let Some(path) = load_model {
        policy = policy.with_model(LinearModel::load(Path::new(&path))?);
    }

    let (session, handle) = launch(&config, standard_solvers(policy))?;

    let mut siv = Cursive::default();

    siv.add_global_callback('q', |s| s.quit());
    siv.add_global_callback(Event::Key(Key::Left), {
        let session = session.clone();
        move |_| cycle_algorithm(&session, false)
    });
    siv.add_global_callback(Event::Key(Key::Right), {
        let session = session.clone();
        move |_| cycle_algorithm(&session, true)
    });
    siv.add_global_callback('r', {
        let session = session.clone();
        move |_| session.request_restart()
    });
    siv.add_global_callback('t', {
        let session = session.clone();
        move |_| {
            let trail = session.trail();
            trail.set_enabled(!trail.is_enabled());
            trail.clear();
        }
    });

    siv.add_fullscreen_layer(BoardView::new(session.clone()));

    siv.refresh();
    while siv.is_running() {
        session.tick();
        siv.step();
        siv.refresh();
    }

    handle.stop();

    info!(stats = %session.stats(), "viewer closed");

    Ok(())
}
