use std::error::Error;
use sweeper_solver::config::SweeperConfig;

pub fn run(config: &SweeperConfig, seed: Option<u64>, reveal: bool) -> Result<(), Box<dyn Error>> {
    let mut board = config.board()?;
    let (x, y) = config.safe_origin();

    if let Some(seed) = seed {
        board.generate_with_seed(x, y, seed);
    }

    if reveal {
        board.reveal(x, y);
    }

    let metadata = board.metadata();
    println!(
        "{}x{}, {} mines, seed {:x}, safe origin ({}, {})",
        metadata.height, metadata.width, metadata.mine_count, metadata.seed, x, y
    );
    print!("{}", board);

    Ok(())
}
