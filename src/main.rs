fn main() {
    if let Err(err) = tagcloud::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
