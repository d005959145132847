use std::error::Error;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use sweeper_solver::config::SweeperConfig;
use sweeper_solver::scheduler::launch;
use sweeper_solver::solver::learned_policy::{FileExampleCollector, LinearModel};
use sweeper_solver::solver::{standard_solvers, LearnedPolicy};
use tracing::info;

pub struct RunOptions {
    pub config: SweeperConfig,
    pub rounds: u32,
    pub load_model: Option<PathBuf>,
    pub examples_out: Option<PathBuf>,
}

pub fn run(options: RunOptions) -> Result<(), Box<dyn Error>> {
    let RunOptions {
        config,
        rounds,
        load_model,
        examples_out,
    } = options;

    let mut policy = LearnedPolicy::new(config.learned_policy.clone());

    if let Some(path) = load_model {
        let model = LinearModel::load(&path)?;
        info!(path = %path.display(), "loaded model");
        policy = policy.with_model(model);
    }

    if let Some(path) = examples_out {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        policy = policy.with_collector(Box::new(FileExampleCollector::new(BufWriter::new(file), 1)));
    }

    let (session, handle) = launch(&config, standard_solvers(policy))?;
    let started = Instant::now();
    let mut reported = 0;

    loop {
        session.tick();

        let stats = session.stats();
        if stats.rounds != reported {
            reported = stats.rounds;
            if reported % 10 == 0 {
                info!(%stats, "progress");
            }
        }

        if stats.rounds >= rounds {
            break;
        }

        if let Some(limit) = config.time_limit {
            if started.elapsed() >= limit {
                info!("time limit reached");
                break;
            }
        }

        thread::sleep(Duration::from_millis(1));
    }

    handle.stop();

    println!("{} ({})", session.stats(), config.algorithm);

    Ok(())
}
