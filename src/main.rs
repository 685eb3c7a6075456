use std::{
    fs,
    io::{self, BufRead, Write},
    process::ExitCode,
};

use clap::Parser;
use prometheus::{Config, Context, DEFAULT_MAX_CALL_DEPTH, run_source};
use tracing::{debug, error};

/// prometheus is a small, dynamically typed, class-based scripting language.
///
/// Without a script or `--file` it starts an interactive session.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source code to run.
    contents: Option<String>,

    /// Read the program from this file instead.
    #[arg(short, long, conflicts_with = "contents")]
    file: Option<String>,

    /// Pipe mode automatically prints the value of the last expression
    /// statement of a run.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Calls nested deeper than this fail with a recursion-limit error.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = Config { max_call_depth: args.max_depth,
                          pipe_mode:      args.pipe_mode, };
    let mut context = Context::new(config);

    let script = match (args.file, args.contents) {
        (Some(path), _) => match fs::read_to_string(&path) {
            Ok(script) => script,
            Err(e) => {
                eprintln!("Failed to read the input file '{path}': {e}");
                return ExitCode::FAILURE;
            },
        },
        (None, Some(contents)) => contents,
        (None, None) => return repl(&mut context),
    };

    match run_source(&mut context, &script) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}

/// Reads one line at a time and runs it in the same context, so
/// declarations carry over between lines. Errors are reported and the
/// session continues; `quit` or end of input ends it.
fn repl(context: &mut Context) -> ExitCode {
    println!("[Prometheus]");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                error!("failed to read input: {e}");
                return ExitCode::FAILURE;
            },
            None => break,
        };

        match line.trim() {
            "" => {},
            "quit" => break,
            source => {
                if let Err(e) = run_source(context, source) {
                    debug!(line = e.line(), "run failed");
                    eprintln!("{e}");
                }
            },
        }
    }

    println!("Bye.");
    ExitCode::SUCCESS
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// verbosity flag. Logs go to stderr so they never mix with program output.
fn setup_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                      EnvFilter::new(match verbose {
                                                          0 => "warn",
                                                          1 => "info",
                                                          2 => "debug",
                                                          _ => "trace",
                                                      })
                                                  });

    let formatter = tracing_subscriber::fmt::layer().with_target(false)
                                                    .with_writer(io::stderr)
                                                    .with_level(true);

    tracing_subscriber::registry().with(formatter).with(filter).init();
}
