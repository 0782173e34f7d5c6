mod args;
mod repl;

use anyhow::{Context, Result};
use args::CommandLineArgs;
use leomaine::profile::Profile;
use leomaine::render::render_page;
use leomaine::{RequestConfig, RequestExecutor, Session};
use repl::Repl;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd_args = CommandLineArgs::parse()?;
    init_tracing(cmd_args.verbose());

    let profile = Profile::load(cmd_args.config(), cmd_args.profile())
        .with_context(|| format!("failed to load profile {}", cmd_args.profile()))?
        .unwrap_or_default();
    let profile = cmd_args.merge_into(profile);

    let mut config = RequestConfig::default();
    profile.apply(&mut config)?;
    let mut session = Session::new(config);
    if let Some(page_size) = profile.page_size {
        session.set_page_size(page_size);
    }

    let executor = RequestExecutor::new(profile.executor_options())?;

    if cmd_args.once() {
        let results = session.send(&executor).await?;
        print!("{}", render_page(results));
        return Ok(());
    }

    let mut repl = Repl::new(session, executor, cmd_args.verbose())?;
    repl.run().await
}
