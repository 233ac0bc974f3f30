use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use chunky_format::ReplayFileReader;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "chunky",
    about = "Extract map and mod metadata from Company of Heroes replays."
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output")]
    verbose: bool,

    #[structopt(
        long,
        parse(from_os_str),
        help = "Write log output to a file instead of stderr"
    )]
    log_file: Option<PathBuf>,

    #[structopt(
        name = "replay",
        parse(from_os_str),
        help = "Path to the .rec replay file"
    )]
    path: PathBuf,
}

fn init_logging(opts: &CliOpts) -> anyhow::Result<()> {
    let default = if opts.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &opts.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file `{}`", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = CliOpts::from_args();
    init_logging(&opts)?;

    let reader = ReplayFileReader::open(&opts.path)
        .with_context(|| format!("cannot read replay `{}`", opts.path.display()))?;
    print!("{}", reader.metadata());
    Ok(())
}
