use std::io;

fn main() {
    let _ = taixiu_cli::logging::init_logging();
    let code = taixiu_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
