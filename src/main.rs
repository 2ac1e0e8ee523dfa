//! Tiny demo binary: solves one hard-coded board and prints the before and
//! after. No CLI parsing or persisted layouts; it drives the same `solve`
//! entry point a UI or test harness would call.

use akari_solver::ascii;
use akari_solver::solver::{self, SolutionStatus};

fn main() {
    env_logger::init();

    let level = ["0.0", ".4.", "0.0"];
    let board = ascii::parse(&level).expect("built-in demo level is well-formed");

    log::info!("solving:\n{}", ascii::format(&board));

    let solution = solver::solve(&board).expect("board dimensions are valid");

    match solution.status {
        SolutionStatus::Solved => {
            println!("solved in {} step(s):", solution.step_count);
            println!("{}", ascii::format(solution.position.board()));
        }
        other => {
            println!("did not solve: {:?} ({:?})", other, solution.decision_type);
            println!("{}", ascii::format(solution.position.board()));
        }
    }
}
