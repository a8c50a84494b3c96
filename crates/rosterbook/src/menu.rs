//! Interactive menu surface for rosterbook.
//!
//! A synchronous prompt-driven loop over a [`Store`]. All input parsing
//! happens here at the boundary: integer fields are validated with plain
//! parsing functions and re-prompted until valid, so the store only ever
//! sees well-formed values. The loop is generic over its reader and writer
//! so sessions can be scripted in tests.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use crate::config::DisplayConfig;
use crate::error::{Error, Result};
use crate::record::Student;
use crate::store::Store;

/// Input that ends the subject/score entry loop when adding a student.
const SUBJECT_SENTINEL: &str = "done";

/// Run the interactive menu loop until the user exits or input ends.
///
/// Duplicate-ID and not-found rejections are reported as status lines and
/// the loop continues; storage failures propagate and abort the session.
///
/// # Errors
///
/// Returns an error if reading input, writing output, or persisting the
/// roster fails.
pub fn run<R: BufRead, W: Write>(
    store: &mut Store,
    display: &DisplayConfig,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        write_menu(out)?;
        let Some(choice) = prompt(out, input, "Enter your choice: ")? else {
            break;
        };

        match choice.as_str() {
            "1" => add_student(store, input, out)?,
            "2" => update_marks(store, input, out)?,
            "3" => delete_student(store, input, out)?,
            "4" => show_top(store, display, out)?,
            "5" => list_students(store, out)?,
            "6" => {
                writeln!(out, "Goodbye.")?;
                break;
            }
            _ => writeln!(out, "Invalid choice, enter a number from 1 to 6.")?,
        }
    }
    Ok(())
}

fn write_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "===== Student Record Management =====")?;
    writeln!(out, "1. Add student")?;
    writeln!(out, "2. Update marks")?;
    writeln!(out, "3. Delete student")?;
    writeln!(out, "4. Top student by average")?;
    writeln!(out, "5. List students")?;
    writeln!(out, "6. Exit")?;
    Ok(())
}

/// Print a label and read one trimmed line. `None` means end of input,
/// which ends the session like an explicit exit.
fn prompt<R: BufRead, W: Write>(out: &mut W, input: &mut R, label: &str) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt until a non-empty value is entered.
fn prompt_nonempty<R: BufRead, W: Write>(
    out: &mut W,
    input: &mut R,
    label: &str,
) -> Result<Option<String>> {
    loop {
        let Some(value) = prompt(out, input, label)? else {
            return Ok(None);
        };
        if value.is_empty() {
            writeln!(out, "A value is required, try again.")?;
            continue;
        }
        return Ok(Some(value));
    }
}

/// Prompt until the entered value passes the given validator.
fn prompt_parsed<R, W, T>(
    out: &mut W,
    input: &mut R,
    label: &str,
    parse: impl Fn(&str) -> std::result::Result<T, String>,
) -> Result<Option<T>>
where
    R: BufRead,
    W: Write,
{
    loop {
        let Some(raw) = prompt(out, input, label)? else {
            return Ok(None);
        };
        match parse(&raw) {
            Ok(value) => return Ok(Some(value)),
            Err(reason) => writeln!(out, "{reason}, try again.")?,
        }
    }
}

/// Validate a mark value: a whole number.
fn parse_score(raw: &str) -> std::result::Result<u32, String> {
    raw.parse::<u32>()
        .map_err(|_| format!("'{raw}' is not a valid whole number"))
}

/// Validate an age value: a whole number greater than zero.
fn parse_age(raw: &str) -> std::result::Result<u32, String> {
    let age = parse_score(raw)?;
    if age == 0 {
        return Err("age must be a positive number".to_string());
    }
    Ok(age)
}

fn add_student<R: BufRead, W: Write>(store: &mut Store, input: &mut R, out: &mut W) -> Result<()> {
    let Some(id) = prompt_nonempty(out, input, "Enter ID: ")? else {
        return Ok(());
    };
    let Some(name) = prompt_nonempty(out, input, "Enter name: ")? else {
        return Ok(());
    };
    let Some(age) = prompt_parsed(out, input, "Enter age: ", parse_age)? else {
        return Ok(());
    };
    let Some(department) = prompt_nonempty(out, input, "Enter department: ")? else {
        return Ok(());
    };

    let mut marks = BTreeMap::new();
    loop {
        let Some(subject) = prompt(out, input, "Enter subject (or 'done' to finish): ")? else {
            break;
        };
        if subject.eq_ignore_ascii_case(SUBJECT_SENTINEL) {
            break;
        }
        if subject.is_empty() {
            writeln!(out, "A subject name is required, try again.")?;
            continue;
        }
        let label = format!("Enter marks for {subject}: ");
        let Some(score) = prompt_parsed(out, input, &label, parse_score)? else {
            break;
        };
        marks.insert(subject, score);
    }

    let student = Student::new(id, name, age, department, marks);
    let name = student.name.clone();
    match store.add(student) {
        Ok(()) => writeln!(out, "Student {name} added.")?,
        Err(Error::DuplicateId { id }) => {
            writeln!(out, "A student with ID {id} already exists.")?;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

fn update_marks<R: BufRead, W: Write>(store: &mut Store, input: &mut R, out: &mut W) -> Result<()> {
    let Some(id) = prompt_nonempty(out, input, "Enter student ID: ")? else {
        return Ok(());
    };
    let Some(subject) = prompt_nonempty(out, input, "Enter subject: ")? else {
        return Ok(());
    };
    let Some(score) = prompt_parsed(out, input, "Enter new marks: ", parse_score)? else {
        return Ok(());
    };

    match store.update_marks(&id, &subject, score) {
        Ok(student) => writeln!(out, "Marks updated for {}.", student.name)?,
        Err(Error::StudentNotFound { id }) => writeln!(out, "No student with ID {id}.")?,
        Err(e) => return Err(e),
    }
    Ok(())
}

fn delete_student<R: BufRead, W: Write>(
    store: &mut Store,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let Some(id) = prompt_nonempty(out, input, "Enter student ID: ")? else {
        return Ok(());
    };

    match store.delete(&id) {
        Ok(removed) => writeln!(out, "Student {} deleted.", removed.name)?,
        Err(Error::StudentNotFound { id }) => writeln!(out, "No student with ID {id}.")?,
        Err(e) => return Err(e),
    }
    Ok(())
}

fn show_top<W: Write>(store: &Store, display: &DisplayConfig, out: &mut W) -> Result<()> {
    match store.top_by_average() {
        Some(student) => writeln!(
            out,
            "Top student: {} (ID: {}), average marks: {:.precision$}",
            student.name,
            student.id,
            student.average(),
            precision = display.precision,
        )?,
        None => writeln!(out, "No students recorded.")?,
    }
    Ok(())
}

fn list_students<W: Write>(store: &Store, out: &mut W) -> Result<()> {
    let listed = store.list_sorted();
    if listed.is_empty() {
        writeln!(out, "No students recorded.")?;
        return Ok(());
    }

    writeln!(out, "Student records:")?;
    for student in listed {
        writeln!(
            out,
            "ID: {}, Name: {}, Age: {}, Dept: {}, Marks: {}",
            student.id,
            student.name,
            student.age,
            student.department,
            format_marks(student),
        )?;
    }
    Ok(())
}

/// Render a student's marks as `subject: score` pairs, or `none`.
fn format_marks(student: &Student) -> String {
    if student.marks().is_empty() {
        return "none".to_string();
    }
    student
        .marks()
        .iter()
        .map(|(subject, score)| format!("{subject}: {score}"))
        .collect::<Vec<_>>()
        .join(", ")
}
