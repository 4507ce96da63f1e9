fn main() {
    if let Err(err) = wgstar_cli::cli::run_cli() {
        wgstar_cli::cli::report_error(&err);
        std::process::exit(1);
    }
}
