//! `rbook` - CLI for rosterbook
//!
//! This binary provides the command-line interface for managing the student
//! roster, either through one-shot subcommands or the interactive menu.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use rosterbook::cli::{
    AddCommand, Cli, Command, ConfigCommand, ListCommand, MarksCommand, RemoveCommand,
    StatusCommand, TopCommand,
};
use rosterbook::{init_logging, menu, Config, Student, Store};

fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Command::Menu);

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match command {
        Command::Menu => handle_menu(&cli, &config),
        Command::Add(cmd) => handle_add(&mut open_store(&cli, &config)?, &cmd),
        Command::Marks(cmd) => handle_marks(&mut open_store(&cli, &config)?, &cmd),
        Command::Remove(cmd) => handle_remove(&mut open_store(&cli, &config)?, &cmd),
        Command::Top(cmd) => handle_top(&open_store(&cli, &config)?, &config, &cmd),
        Command::List(cmd) => handle_list(&open_store(&cli, &config)?, &config, &cmd),
        Command::Status(cmd) => handle_status(&open_store(&cli, &config)?, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Resolve the roster file path: `--data-file` wins over configuration.
fn roster_path(cli: &Cli, config: &Config) -> PathBuf {
    cli.data_file.clone().unwrap_or_else(|| config.roster_path())
}

fn open_store(cli: &Cli, config: &Config) -> anyhow::Result<Store> {
    let path = roster_path(cli, config);
    Store::open(&path).with_context(|| format!("opening roster at {}", path.display()))
}

fn handle_menu(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let mut store = open_store(cli, config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    menu::run(
        &mut store,
        &config.display,
        &mut stdin.lock(),
        &mut stdout.lock(),
    )?;
    Ok(())
}

fn handle_add(store: &mut Store, cmd: &AddCommand) -> anyhow::Result<()> {
    let marks: BTreeMap<String, u32> = cmd.marks.iter().cloned().collect();
    let student = Student::new(
        cmd.id.as_str(),
        cmd.name.as_str(),
        cmd.age,
        cmd.department.as_str(),
        marks,
    );

    store.add(student)?;
    println!("Student {} added.", cmd.name);
    Ok(())
}

fn handle_marks(store: &mut Store, cmd: &MarksCommand) -> anyhow::Result<()> {
    let student = store.update_marks(&cmd.id, &cmd.subject, cmd.score)?;
    println!("Marks updated for {}.", student.name);
    Ok(())
}

fn handle_remove(store: &mut Store, cmd: &RemoveCommand) -> anyhow::Result<()> {
    let removed = store.delete(&cmd.id)?;
    println!("Student {} deleted.", removed.name);
    Ok(())
}

fn handle_top(store: &Store, config: &Config, cmd: &TopCommand) -> anyhow::Result<()> {
    let Some(student) = store.top_by_average() else {
        println!("No students recorded.");
        return Ok(());
    };

    if cmd.json {
        let top = serde_json::json!({
            "student": student,
            "average_marks": student.average(),
        });
        println!("{}", serde_json::to_string_pretty(&top)?);
    } else {
        println!(
            "Top student: {} (ID: {}), average marks: {:.precision$}",
            student.name,
            student.id,
            student.average(),
            precision = config.display.precision,
        );
    }
    Ok(())
}

fn handle_list(store: &Store, config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let listed = store.list_sorted();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    if listed.is_empty() {
        println!("No students recorded.");
        return Ok(());
    }

    for student in listed {
        println!(
            "ID: {}, Name: {}, Age: {}, Dept: {}, Average: {:.precision$}",
            student.id,
            student.name,
            student.age,
            student.department,
            student.average(),
            precision = config.display.precision,
        );
    }
    Ok(())
}

fn handle_status(store: &Store, cmd: &StatusCommand) -> anyhow::Result<()> {
    let stats = store.stats();

    if cmd.json {
        let status = serde_json::json!({
            "roster_path": store.path(),
            "total_students": stats.total_students,
            "departments": stats.departments,
            "file_size_bytes": stats.file_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("rbook status");
        println!("------------");
        println!("Roster file:   {}", store.path().display());
        println!("Students:      {}", stats.total_students);
        println!("Departments:   {}", stats.departments);
        println!("File size:     {} bytes", stats.file_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Roster path:    {}", config.roster_path().display());
                println!();
                println!("[Display]");
                println!("  Precision:      {}", config.display.precision);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
