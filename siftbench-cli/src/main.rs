//! siftbench binary entry point.

fn main() {
    if let Err(err) = siftbench_cli::run() {
        eprintln!("siftbench: {err:#}");
        std::process::exit(1);
    }
}
