use std::{io::stdout, process};

use account_records::{AppError, app};

fn main() {
    env_logger::init();

    let stdout = stdout();
    let mut out = stdout.lock();
    match app::run(std::env::args_os(), &mut out) {
        Ok(()) => {}
        Err(AppError::Usage(usage)) => usage.exit(),
        Err(err) => {
            log::error!("{err}");
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}
