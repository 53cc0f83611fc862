//! Rendering of command results as text or JSON on stdout.

use serde::Serialize;

use circulation_core::{Book, BookState, Patron, Status};

#[derive(Debug, Serialize)]
struct StatusReport {
    status: &'static str,
    code: i32,
}

#[derive(Debug, Serialize)]
struct EnrolledReport<'a> {
    patron_id: i32,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct LoansReport {
    patron_id: i32,
    number_books_checked_out: u32,
}

#[derive(Debug, Serialize)]
struct NameReport<'a> {
    patron_id: i32,
    name: &'a str,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn success(json: bool) -> anyhow::Result<()> {
    let status = Status::Success;
    if json {
        return print_json(&StatusReport {
            status: status.as_str(),
            code: status.code(),
        });
    }
    println!("{status}");
    Ok(())
}

pub fn enrolled(patron_id: i32, name: &str, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&EnrolledReport { patron_id, name });
    }
    println!("{patron_id}");
    Ok(())
}

pub fn books(books: &[Book], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&books);
    }
    println!("{} books", books.len());
    for book in books {
        match (book.state, book.borrower()) {
            (BookState::Out, Some(patron_id)) => println!(
                "{:>5}  {} by {} (out to {})",
                book.book_id, book.title, book.author, patron_id
            ),
            _ => println!(
                "{:>5}  {} by {} ({})",
                book.book_id,
                book.title,
                book.author,
                book.state.as_str()
            ),
        }
    }
    Ok(())
}

pub fn patrons(patrons: &[Patron], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&patrons);
    }
    println!("{} patrons", patrons.len());
    for patron in patrons {
        println!(
            "{:>5}  {} ({} out)",
            patron.patron_id, patron.name, patron.number_books_checked_out
        );
    }
    Ok(())
}

pub fn loans(patron_id: i32, count: u32, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&LoansReport {
            patron_id,
            number_books_checked_out: count,
        });
    }
    println!("{count}");
    Ok(())
}

pub fn name(patron_id: i32, name: &str, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&NameReport { patron_id, name });
    }
    println!("{name}");
    Ok(())
}
