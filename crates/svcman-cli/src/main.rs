//! The `svcman` binary.

use std::ffi::OsString;

use svcman_cli::{App, EXIT_FAILURE, cli};

fn main() {
    let argv: Vec<OsString> = std::env::args_os().collect();
    let globals = cli::parse_globals(argv.clone());

    let code = match App::from_globals("svcman", &globals)
        .and_then(|app| app.run(&globals, argv))
    {
        Ok(code) => code,
        Err(err) => {
            eprintln!("svcman: {err}");
            EXIT_FAILURE
        }
    };

    std::process::exit(code);
}
