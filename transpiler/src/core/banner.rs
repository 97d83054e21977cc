//! REPL startup banner

use std::path::Path;

use super::constants::APP_NAME;
use crate::sql::Dialect;

/// Print the REPL banner with the active settings
pub fn print_banner(dialect: Dialect, schema: Option<&Path>, condition_only: bool) {
    const W: usize = 10;

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();

    if dialect.is_valid() {
        println!(
            "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
            "Dialect:", dialect
        );
    } else {
        println!(
            "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m none \x1b[90m(use :dialect <name> or --dialect)\x1b[0m",
            "Dialect:"
        );
    }

    match schema {
        Some(path) => println!(
            "  \x1b[35m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
            "Schema:",
            path.display()
        ),
        None => println!("  \x1b[90m➜  {:<W$} none\x1b[0m", "Schema:"),
    }

    let output = if condition_only { "condition" } else { "WHERE clause" };
    println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Output:", output);
    println!("  \x1b[90m➜  {:<W$} :help for commands\x1b[0m", "Help:");

    println!();
}
