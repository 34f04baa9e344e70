use clap::Parser;
use studyquest::cli::Cli;
use studyquest::{Config, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config =
        tracing::subscriber::with_default(studyquest::bootstrap_subscriber(), Config::load)?;
    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(cli, config))
}
