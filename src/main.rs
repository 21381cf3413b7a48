fn main() {
    if let Err(err) = csv_import_options::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
