//! Command-line entry point.

fn main() {
    env_logger::init();
    log::info!("Starting InkPage");

    if let Err(error) = inkpage_app::run(std::env::args_os()) {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
