fn main() {
    if let Err(err) = retail_ingest::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
