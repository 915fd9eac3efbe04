use crate::cli::run;

pub mod art;
pub mod cli;
mod config;
pub mod domain;
pub mod http;
mod mock;
pub mod storage;

fn main() -> anyhow::Result<()> {
    run()
}
