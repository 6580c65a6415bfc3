mod platform;

fn main() {
    if let Err(err) = platform::run_app() {
        harvest_logging::harvest_error!("{:#}", err);
        std::process::exit(1);
    }
}
