//! Command-line application

use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{ENV_DIALECT, ENV_LOG, REPL_PROMPT, STDIN_ARG};
use crate::domain::schema::Schema;
use crate::domain::transpiler::{RESERVED_OPERATORS, Transpiler};
use crate::sql::Dialect;
use crate::utils::file::expand_home;

pub struct CliApp {
    pub config: AppConfig,
    pub transpiler: Transpiler,
}

impl CliApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Operators) => {
                Self::print_operators(&mut io::stdout().lock())?;
                Ok(())
            }
            Some(Commands::Compile {
                expression,
                condition,
            }) => {
                let app = Self::init(&cli_config)?;
                let sql = app.compile_once(&expression, condition)?;
                println!("{}", sql);
                Ok(())
            }
            Some(Commands::Repl) | None => {
                let mut app = Self::init(&cli_config)?;
                app.repl()
            }
        }
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let mut builder = Transpiler::builder(config.dialect).max_depth(config.max_depth);
        if let Some(path) = &config.schema {
            builder = builder.schema(load_schema(path)?);
        }

        Ok(Self {
            config,
            transpiler: builder.build(),
        })
    }

    /// Initialize logging with tracing-subscriber
    ///
    /// Logs go to stderr so generated SQL on stdout stays pipeable.
    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());

        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    fn compile_once(&self, expression: &str, condition: bool) -> Result<String> {
        if !self.transpiler.dialect().is_valid() {
            anyhow::bail!(
                "No SQL dialect selected. Pass --dialect or set {}",
                ENV_DIALECT
            );
        }

        let input = if expression == STDIN_ARG {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read expression from stdin")?;
            buf
        } else {
            expression.to_string()
        };

        self.compile(&input, condition || self.config.condition_only)
    }

    fn compile(&self, input: &str, condition: bool) -> Result<String> {
        let sql = if condition {
            self.transpiler.compile_condition(input)?
        } else {
            self.transpiler.compile(input)?
        };
        Ok(sql)
    }

    fn print_operators(out: &mut impl Write) -> Result<()> {
        for name in RESERVED_OPERATORS {
            writeln!(out, "{}", name)?;
        }
        Ok(())
    }

    // =========================================================================
    // REPL
    // =========================================================================

    fn repl(&mut self) -> Result<()> {
        banner::print_banner(
            self.transpiler.dialect(),
            self.config.schema.as_deref(),
            self.config.condition_only,
        );

        let stdin = io::stdin();
        let mut lines = stdin.lock();
        let mut stdout = io::stdout();
        let mut line = String::new();

        loop {
            write!(stdout, "{}", REPL_PROMPT)?;
            stdout.flush()?;

            line.clear();
            if lines.read_line(&mut line)? == 0 {
                writeln!(stdout)?;
                break;
            }

            match self.execute(ReplCommand::parse(&line), &mut stdout) {
                Ok(ReplOutcome::Continue) => {}
                Ok(ReplOutcome::Quit) => break,
                Err(e) => print_error(&e, &mut io::stderr())?,
            }
        }

        tracing::debug!("REPL exited");
        Ok(())
    }

    fn execute(&mut self, command: ReplCommand, out: &mut impl Write) -> Result<ReplOutcome> {
        match command {
            ReplCommand::Empty => {}
            ReplCommand::Quit => return Ok(ReplOutcome::Quit),
            ReplCommand::Help => print_help(out)?,
            ReplCommand::Dialect(None) => {
                writeln!(out, "dialect: {}", self.transpiler.dialect())?;
            }
            ReplCommand::Dialect(Some(name)) => {
                let dialect: Dialect = name.parse()?;
                self.transpiler = self.transpiler.with_dialect(dialect);
                self.config.dialect = dialect;
                writeln!(out, "dialect: {}", dialect)?;
            }
            ReplCommand::Schema(None) => match &self.config.schema {
                Some(path) => writeln!(out, "schema: {}", path.display())?,
                None => writeln!(out, "schema: none")?,
            },
            ReplCommand::Schema(Some(path)) => {
                let path = expand_home(&path);
                let schema = load_schema(&path)?;
                let fields = schema.len();
                self.transpiler.set_schema(Arc::new(schema));
                writeln!(out, "schema: {} ({} fields)", path.display(), fields)?;
                self.config.schema = Some(path);
            }
            ReplCommand::Condition => {
                self.config.condition_only = !self.config.condition_only;
                let mode = if self.config.condition_only {
                    "condition"
                } else {
                    "WHERE clause"
                };
                writeln!(out, "output: {}", mode)?;
            }
            ReplCommand::Unknown(name) => {
                anyhow::bail!("Unknown command ':{}'. Type :help for commands", name);
            }
            ReplCommand::Expression(expression) => {
                let sql = self.compile(&expression, self.config.condition_only)?;
                writeln!(out, "{}", sql)?;
            }
        }
        Ok(ReplOutcome::Continue)
    }
}

fn load_schema(path: &Path) -> Result<Schema> {
    let schema = Schema::from_file(path)
        .with_context(|| format!("Failed to load schema: {}", path.display()))?;
    tracing::debug!(path = %path.display(), fields = schema.len(), "Schema loaded");
    Ok(schema)
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Enter a JSON-Logic expression to compile it, or a command:")?;
    writeln!(out, "  :help            show this message")?;
    writeln!(out, "  :dialect [name]  show or switch the SQL dialect")?;
    writeln!(out, "  :schema [path]   show or load the field schema")?;
    writeln!(out, "  :condition       toggle the WHERE prefix")?;
    writeln!(out, "  :quit, :exit     leave the shell")
}

/// Print an error with its cause chain
fn print_error(error: &anyhow::Error, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\x1b[31merror:\x1b[0m {}", error)?;
    for cause in error.chain().skip(1) {
        writeln!(out, "  caused by: {}", cause)?;
    }
    Ok(())
}

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Empty,
    Help,
    Quit,
    Dialect(Option<String>),
    Schema(Option<String>),
    Condition,
    Unknown(String),
    Expression(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix(':') else {
            return Self::Expression(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim().to_string())),
            None => (command, None),
        };
        let arg = arg.filter(|a| !a.is_empty());

        match name {
            "help" | "h" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "dialect" => Self::Dialect(arg),
            "schema" => Self::Schema(arg),
            "condition" => Self::Condition,
            other => Self::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplOutcome {
    Continue,
    Quit,
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;

    fn test_app(dialect: Dialect) -> CliApp {
        CliApp {
            config: AppConfig {
                dialect,
                ..Default::default()
            },
            transpiler: Transpiler::new(dialect),
        }
    }

    fn run(app: &mut CliApp, line: &str) -> Result<(ReplOutcome, String)> {
        let mut out = Vec::new();
        let outcome = app.execute(ReplCommand::parse(line), &mut out)?;
        Ok((outcome, String::from_utf8(out).unwrap()))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("   \n"), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse(":help"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse(":exit\n"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse(":dialect"), ReplCommand::Dialect(None));
        assert_eq!(
            ReplCommand::parse(":dialect  clickhouse "),
            ReplCommand::Dialect(Some("clickhouse".to_string()))
        );
        assert_eq!(
            ReplCommand::parse(":schema ~/schema.json"),
            ReplCommand::Schema(Some("~/schema.json".to_string()))
        );
        assert_eq!(
            ReplCommand::parse(":frob"),
            ReplCommand::Unknown("frob".to_string())
        );
        assert_eq!(
            ReplCommand::parse(r#"{"var": "a"}"#),
            ReplCommand::Expression(r#"{"var": "a"}"#.to_string())
        );
    }

    #[test]
    fn test_execute_expression() {
        let mut app = test_app(Dialect::PostgreSQL);
        let (outcome, out) = run(&mut app, r#"{"==": [{"var": "a"}, 1]}"#).unwrap();
        assert_eq!(outcome, ReplOutcome::Continue);
        assert_eq!(out, "WHERE a = 1\n");

        run(&mut app, ":condition").unwrap();
        let (_, out) = run(&mut app, r#"{"==": [{"var": "a"}, 1]}"#).unwrap();
        assert_eq!(out, "a = 1\n");
    }

    #[test]
    fn test_execute_switch_dialect() {
        let mut app = test_app(Dialect::PostgreSQL);
        let (_, out) = run(&mut app, ":dialect clickhouse").unwrap();
        assert_eq!(out, "dialect: clickhouse\n");
        assert_eq!(app.transpiler.dialect(), Dialect::ClickHouse);

        let (_, out) = run(&mut app, r#"{"in": ["x", {"var": "tags"}]}"#).unwrap();
        assert_eq!(out, "WHERE 'x' IN tags\n");

        assert!(run(&mut app, ":dialect oracle").is_err());
        assert_eq!(app.transpiler.dialect(), Dialect::ClickHouse);
    }

    #[test]
    fn test_execute_load_schema() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"fields": [{"name": "age", "type": "integer"}]}"#)
            .unwrap();

        let mut app = test_app(Dialect::DuckDB);
        let line = format!(":schema {}", file.path().display());
        let (_, out) = run(&mut app, &line).unwrap();
        assert!(out.contains("(1 fields)"));
        assert_eq!(app.config.schema.as_deref(), Some(file.path()));

        let err = run(&mut app, r#"{"==": [{"var": "name"}, "x"]}"#).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_execute_errors_keep_state() {
        let mut app = test_app(Dialect::BigQuery);
        let err = run(&mut app, r#"{"and": []}"#).unwrap_err();
        assert!(err.to_string().contains("$.and"));
        assert!(run(&mut app, ":nope").is_err());
        let (outcome, _) = run(&mut app, ":quit").unwrap();
        assert_eq!(outcome, ReplOutcome::Quit);
    }

    #[test]
    fn test_compile_once_requires_dialect() {
        let app = test_app(Dialect::Unspecified);
        let err = app.compile_once(r#"{"var": "a"}"#, false).unwrap_err();
        assert!(err.to_string().contains(ENV_DIALECT));
    }

    #[test]
    fn test_print_error_chain() {
        let app = test_app(Dialect::DuckDB);
        let err = app.compile("{not json", false).unwrap_err();
        let mut out = Vec::new();
        print_error(&err, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("invalid expression at $"));
        assert!(text.contains("caused by:"));
    }

    #[test]
    fn test_print_operators() {
        let mut out = Vec::new();
        CliApp::print_operators(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), RESERVED_OPERATORS.len());
        assert!(text.lines().any(|l| l == "missing_some"));
    }
}
