use jsonlogic_sql::core::CliApp;

fn main() {
    if let Err(e) = CliApp::run() {
        eprintln!("\nError: {}\n", e);
        std::process::exit(1);
    }
}
