fn main() {
    if let Err(err) = nutrak_lib::run() {
        log::error!("nutrak failed: {err:?}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
