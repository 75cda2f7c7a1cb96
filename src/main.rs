use std::process;

use arrayop::cli::{parse_args, ParseArgsResult};
use arrayop::diagnostics::render_error;

/// 64 MB stack so deeply nested list operands recurse safely up to the
/// configured depth limit.
const STACK_SIZE: usize = 64 * 1024 * 1024;

fn main() {
    let builder = std::thread::Builder::new().stack_size(STACK_SIZE);
    let handler = match builder.spawn(run) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: failed to spawn main thread with enlarged stack: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = handler.join() {
        eprintln!("error: {:?}", e);
        process::exit(1);
    }
}

fn run() {
    let args: Vec<String> = std::env::args().collect();

    match parse_args(&args) {
        Ok(ParseArgsResult::Help) => {
            print!("{}", arrayop::cli::help_text());
            process::exit(0);
        }
        Ok(ParseArgsResult::Version) => {
            print!("{}", arrayop::cli::version_text());
            process::exit(0);
        }
        Ok(ParseArgsResult::Args(cli)) => match arrayop::execute(&cli) {
            Ok(output) => print!("{}", output),
            Err(e) => {
                let source = arrayop::invocation_source(&cli);
                eprint!("{}", render_error(&source, &e));
                process::exit(1);
            }
        },
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", arrayop::cli::help_text());
            process::exit(1);
        }
    }
}
