use std::io::{self, BufRead, IsTerminal, Write};
use std::thread;

use anyhow::{bail, Context, Result};
use colored::*;
use rustyline::{error::ReadlineError, DefaultEditor};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use leomaine::render::{render_config, render_list, render_page, render_record};
use leomaine::{BodyEncoding, EntryId, ListKind, Method, PageSize, RequestExecutor, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    Show,
    Add,
    Key(EntryId, String),
    Value(EntryId, String),
    Remove(EntryId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Method(Method),
    Url(String),
    Encoding(BodyEncoding),
    List(ListKind, ListCommand),
    Send,
    Next,
    Previous,
    Size(PageSize),
    Page,
    Row(usize), // 1-based
    Show,
    Verbose,
    Help,
    Exit,
    Empty,
}

fn parse_list_kind(word: &str) -> Option<ListKind> {
    match word {
        "header" | "headers" => Some(ListKind::Headers),
        "body" => Some(ListKind::Body),
        "cookie" | "cookies" => Some(ListKind::Cookies),
        "param" | "params" => Some(ListKind::Params),
        _ => None,
    }
}

fn parse_id(word: Option<&str>, usage: &str) -> Result<EntryId> {
    match word {
        Some(w) => w.parse::<EntryId>().with_context(|| format!("invalid entry id: {w}")),
        None => bail!("Usage: {usage}"),
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "method" | "m" => Command::Method(rest.parse()?),
            "url" | "u" => {
                if rest.is_empty() {
                    bail!("Usage: url <url>");
                }
                Command::Url(rest.to_string())
            }
            "encoding" | "enc" => Command::Encoding(rest.parse()?),
            "send" | "s" => Command::Send,
            "next" | "n" => Command::Next,
            "prev" | "previous" | "p" => Command::Previous,
            "size" => Command::Size(rest.parse()?),
            "page" => Command::Page,
            "row" => {
                let n = rest
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .with_context(|| format!("invalid row number: {rest}"))?;
                Command::Row(n)
            }
            "show" => Command::Show,
            "verbose" | "v" => Command::Verbose,
            "help" | "h" | "?" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            other => match parse_list_kind(other) {
                Some(kind) => Command::List(kind, Self::parse_list_command(other, rest)?),
                None => bail!("Unknown command: {other}"),
            },
        };
        Ok(command)
    }

    fn parse_list_command(list: &str, rest: &str) -> Result<ListCommand> {
        let mut parts = rest.splitn(3, char::is_whitespace);
        let action = parts.next().unwrap_or("");
        let id = parts.next();
        let text = parts.next().unwrap_or("").trim().to_string();

        let command = match action {
            "" => ListCommand::Show,
            "add" => ListCommand::Add,
            "key" => ListCommand::Key(parse_id(id, &format!("{list} key <id> <text>"))?, text),
            "value" => {
                ListCommand::Value(parse_id(id, &format!("{list} value <id> <text>"))?, text)
            }
            "rm" | "remove" | "del" => {
                ListCommand::Remove(parse_id(id, &format!("{list} rm <id>"))?)
            }
            other => bail!("Unknown {list} action: {other}"),
        };
        Ok(command)
    }
}

// Blocking reads stay on their own thread, which is not joined on exit.
fn spawn_stdin_reader() -> UnboundedReceiver<io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub struct Repl {
    editor: DefaultEditor,
    piped: Option<UnboundedReceiver<io::Result<String>>>,
    session: Session,
    executor: RequestExecutor,
    verbose: bool,
}

impl Repl {
    pub fn new(session: Session, executor: RequestExecutor, verbose: bool) -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to create line editor")?;
        Ok(Self {
            editor,
            piped: None,
            session,
            executor,
            verbose,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let interactive = io::stdin().is_terminal();
        if interactive {
            self.print_welcome();
        }

        loop {
            let line = match self.read_line(interactive).await? {
                Some(line) => line,
                None => break,
            };

            match Command::parse(&line) {
                Ok(Command::Exit) => break,
                Ok(Command::Empty) => continue,
                Ok(cmd) => self.dispatch(cmd).await,
                Err(e) => eprintln!("{}: {}", "Error".red().bold(), e),
            }
        }

        if interactive {
            println!("{}", "Goodbye!".green());
        }
        Ok(())
    }

    async fn read_line(&mut self, interactive: bool) -> Result<Option<String>> {
        if interactive {
            let prompt = format!("{} ", "leomaine>".green().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let _ = self.editor.add_history_entry(line.as_str());
                    Ok(Some(line))
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
                Err(e) => bail!("Failed to read input: {}", e),
            }
        } else {
            // once a send has listened for Ctrl+C the signal no longer ends
            // the process, so piped input has to watch for it as well
            let lines = self.piped.get_or_insert_with(spawn_stdin_reader);
            tokio::select! {
                line = lines.recv() => line.transpose().context("Failed to read input"),
                _ = tokio::signal::ctrl_c() => Ok(None),
            }
        }
    }

    async fn dispatch(&mut self, cmd: Command) {
        match cmd {
            Command::Method(method) => {
                self.session.config_mut().set_method(method);
                println!(
                    "{} {} (body encoding {})",
                    "Method".cyan(),
                    method.to_string().yellow(),
                    self.session.config().body_encoding()
                );
            }
            Command::Url(url) => {
                self.session.config_mut().set_url(url);
            }
            Command::Encoding(encoding) => {
                if let Err(e) = self.session.config_mut().set_body_encoding(encoding) {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                }
            }
            Command::List(kind, action) => self.handle_list(kind, action),
            Command::Send => self.send().await,
            Command::Next => {
                self.session.next_page();
                self.print_page();
            }
            Command::Previous => {
                self.session.previous_page();
                self.print_page();
            }
            Command::Size(size) => {
                self.session.set_page_size(size);
                self.print_page();
            }
            Command::Page => self.print_page(),
            Command::Row(n) => match self.session.select_row(n - 1) {
                Some(record) => print!("{}", render_record(record)),
                None => println!("{}: no row {} on this page", "Info".yellow(), n),
            },
            Command::Show => print!("{}", render_config(self.session.config())),
            Command::Verbose => {
                self.verbose = !self.verbose;
                let status = if self.verbose { "enabled" } else { "disabled" };
                println!("{}: Timing and info lines {}", "Info".cyan(), status.yellow());
            }
            Command::Help => self.print_help(),
            Command::Exit | Command::Empty => {}
        }
        let _ = io::stdout().flush();
    }

    fn handle_list(&mut self, kind: ListKind, action: ListCommand) {
        let list = self.session.config_mut().list_mut(kind);
        let touched = match action {
            ListCommand::Show => {
                print!("{}", render_list(self.session.config(), kind));
                return;
            }
            ListCommand::Add => {
                let id = list.add();
                println!("{} {} [{}]", "Added".green(), kind.label(), id);
                return;
            }
            ListCommand::Key(id, text) => list.update_key(id, text),
            ListCommand::Value(id, text) => list.update_value(id, text),
            ListCommand::Remove(id) => list.remove(id),
        };
        if !touched && self.verbose {
            println!("{}: no such entry in {}", "Info".yellow(), kind.label());
        }
    }

    async fn send(&mut self) {
        let start_time = std::time::Instant::now();
        let outcome = tokio::select! {
            res = self.session.send(&self.executor) => Some(res),
            _ = tokio::signal::ctrl_c() => None,
        };

        match outcome {
            Some(Ok(results)) => {
                if self.verbose {
                    println!(
                        "{} {} rows in {}ms",
                        "Fetched".cyan().bold(),
                        results.len(),
                        start_time.elapsed().as_millis()
                    );
                }
                print!("{}", render_page(results));
            }
            Some(Err(e)) => eprintln!("{}: {}", "Error".red().bold(), e),
            None => println!("{}: request cancelled", "Info".yellow()),
        }
    }

    fn print_page(&self) {
        match self.session.results() {
            Some(results) => print!("{}", render_page(results)),
            None => println!("{}", "Nothing fetched yet. Type send.".yellow()),
        }
    }

    fn print_welcome(&self) {
        println!("{}", "Welcome to leomaine!".green().bold());
        println!(
            "Type {} for help, {} to send, {} to exit.",
            "help".cyan(),
            "send".cyan(),
            "exit".cyan()
        );
        print!("{}", render_config(self.session.config()));
        println!();
    }

    fn print_help(&self) {
        println!("{}", "Request:".cyan().bold());
        println!("  {} {}            - GET, POST, PUT or DELETE", "method".yellow(), "M".blue());
        println!("  {} {}               - set the URL", "url".yellow(), "U".blue());
        println!("  {} {}          - body encoding for the method", "encoding".yellow(), "E".blue());
        println!("  {}                  - show the whole request", "show".yellow());
        println!("  {}                  - send it", "send".yellow());
        println!();
        println!("{}", "Lists (header, body, cookie, param):".cyan().bold());
        println!("  {} {}            - add an empty row", "header".yellow(), "add".blue());
        println!("  {} {}   - set a row's key", "header".yellow(), "key ID TEXT".blue());
        println!("  {} {} - set a row's value", "header".yellow(), "value ID TEXT".blue());
        println!("  {} {}          - remove a row", "header".yellow(), "rm ID".blue());
        println!();
        println!("{}", "Results:".cyan().bold());
        println!("  {} / {}           - next or previous page", "next".yellow(), "prev".yellow());
        println!("  {} {}                - 5, 10, 25 or 50 rows per page", "size".yellow(), "N".blue());
        println!("  {}                  - show the current page", "page".yellow());
        println!("  {} {}                 - show row N of the page", "row".yellow(), "N".blue());
        println!();
        println!("  {}               - toggle request timing and info lines", "verbose".yellow());
        println!("  {}                  - leave", "exit".yellow());
        println!("  Ctrl+C while sending cancels the request.");
    }
}
