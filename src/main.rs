fn main() {
    if let Err(e) = atelier::cli::main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
