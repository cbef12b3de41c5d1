//! mailbox_chess UCI Chess Engine

use mailbox_chess::uci::{UCI, logger};

fn main() {
    if let Err(err) = logger::init() {
        eprintln!("failed to install logger: {}", err);
    }

    println!("mailbox_chess v{} - UCI Chess Engine", env!("CARGO_PKG_VERSION"));
    println!("Type 'uci' to start UCI mode, 'd' to display board, 'quit' to exit");

    let mut uci = UCI::new();
    if let Err(err) = uci.run() {
        eprintln!("i/o error: {}", err);
        std::process::exit(1);
    }
}
