fn main() {
    if let Err(err) = coretable::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
