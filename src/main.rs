use compspec::cli::BIN_NAME;
use std::process;

fn main() {
    if let Err(e) = compspec::cli::run(std::env::args_os()) {
        match e.downcast_ref::<clap::Error>() {
            // clap renders its own usage hint
            Some(usage) => {
                let _ = usage.print();
            }
            None => eprintln!("{}: {:#}", BIN_NAME, e),
        }
        process::exit(1);
    }
}
