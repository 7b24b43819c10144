//! Interactive command shell for the order book.
//!
//! A REPL reading one command per line from stdin, prompting for each
//! argument in turn — mirroring the original interactive tool's multi-`cin>>`
//! flow rather than parsing a single whitespace-delimited line.

use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use limit_book_engine::{Id, OrderBook, Price, Qty, Side, Status};

/// Interactive limit order book shell.
#[derive(Parser)]
#[command(name = "order-book-shell")]
#[command(version, about = "A REPL for the single-symbol limit order book")]
struct Cli {
    /// Verbosity of the tracing subscriber.
    #[arg(long, default_value = "warn")]
    log_level: Level,
}

const HELP: &str = "\
Available commands: place_limit, place_market, cancel_order, modify_order,
bestBid, bestAsk, volume, spread, size, num_orders, get_book, get_trades,
clear, help, exit";

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let subscriber = FmtSubscriber::builder().with_max_level(cli.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to install tracing subscriber");

    let mut book = OrderBook::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Welcome to the Order Book Interface!");
    println!("{HELP}");

    loop {
        print!("\nEnter command: ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let command = line?.trim().to_string();
        if command.is_empty() {
            continue;
        }

        match command.as_str() {
            "place_limit" => place_limit(&mut book, &mut lines)?,
            "place_market" => place_market(&mut book, &mut lines)?,
            "cancel_order" => cancel_order(&mut book, &mut lines)?,
            "modify_order" => modify_order(&mut book, &mut lines)?,
            "bestBid" | "best_bid" => print_optional_price("Best Bid", book.best_bid()),
            "bestAsk" | "best_ask" => print_optional_price("Best Ask", book.best_ask()),
            "volume" => volume(&book, &mut lines)?,
            "spread" => print_optional_price("Spread", book.spread()),
            "size" => {
                let (buy, sell) = book.size();
                println!("Buy Size: {buy}, Sell Size: {sell}");
            }
            "num_orders" => {
                let (buy, sell) = book.num_orders();
                println!("Number of Buy Orders: {buy}, Number of Sell Orders: {sell}");
            }
            "get_book" => {
                for order in book.snapshot() {
                    println!("{} {} {} {}", order.id, order.price, order.quantity, order.timestamp);
                }
            }
            "get_trades" => {
                for trade in book.trades() {
                    println!(
                        "Buyer ID: {}, Seller ID: {}, Price: {}, Quantity: {}, Timestamp: {}",
                        trade.buyer_id, trade.seller_id, trade.price, trade.quantity, trade.timestamp
                    );
                }
            }
            "clear" => {
                book.clear();
                println!("Book cleared.");
            }
            "help" => println!("{HELP}"),
            "exit" => {
                println!("Exiting Order Book Interface. Goodbye!");
                break;
            }
            _ => println!("Invalid command. Please try again."),
        }
    }

    Ok(())
}

fn prompt_line(prompt: &str, lines: &mut io::Lines<io::StdinLock<'_>>) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => Ok(String::new()),
    }
}

fn prompt_parse<T: std::str::FromStr>(
    prompt: &str,
    lines: &mut io::Lines<io::StdinLock<'_>>,
) -> io::Result<Option<T>> {
    let raw = prompt_line(prompt, lines)?;
    Ok(raw.parse().ok())
}

fn prompt_side(lines: &mut io::Lines<io::StdinLock<'_>>) -> io::Result<Option<Side>> {
    loop {
        let raw = prompt_line("Enter order type (0 for sell, 1 for buy): ", lines)?;
        match raw.as_str() {
            "0" => return Ok(Some(Side::Sell)),
            "1" => return Ok(Some(Side::Buy)),
            "" => return Ok(None),
            _ => println!("Invalid order type. Please enter 0 for sell or 1 for buy."),
        }
    }
}

fn describe_status(status: Status) -> &'static str {
    match status {
        Status::Ok => "",
        Status::InvalidQty => "Invalid quantity.",
        Status::InvalidPrice => "Invalid price.",
        Status::BookEmpty => "Book is empty on the opposite side.",
        Status::PartialFill => "Order partially filled.",
        Status::OrderNotFound => "Order not found.",
        Status::OrderInactive => "Order is already inactive.",
    }
}

fn place_limit(book: &mut OrderBook, lines: &mut io::Lines<io::StdinLock<'_>>) -> io::Result<()> {
    let Some(quantity) = prompt_parse::<Qty>("Enter quantity: ", lines)? else {
        return Ok(());
    };
    let Some(price) = prompt_parse::<Price>("Enter price: ", lines)? else {
        return Ok(());
    };
    let Some(side) = prompt_side(lines)? else {
        return Ok(());
    };

    let (id, status) = book.place_limit(quantity, price, side);
    match status {
        Status::Ok | Status::PartialFill => {
            println!("Limit order placed successfully (id {id}). {}", describe_status(status))
        }
        other => println!("Error placing limit order: {}", describe_status(other)),
    }
    Ok(())
}

fn place_market(book: &mut OrderBook, lines: &mut io::Lines<io::StdinLock<'_>>) -> io::Result<()> {
    let Some(quantity) = prompt_parse::<Qty>("Enter quantity: ", lines)? else {
        return Ok(());
    };
    let Some(side) = prompt_side(lines)? else {
        return Ok(());
    };

    let (id, status) = book.place_market(quantity, side);
    match status {
        Status::Ok | Status::PartialFill => {
            println!("Market order placed successfully (id {id}). {}", describe_status(status))
        }
        other => println!("Error placing market order: {}", describe_status(other)),
    }
    Ok(())
}

fn cancel_order(book: &mut OrderBook, lines: &mut io::Lines<io::StdinLock<'_>>) -> io::Result<()> {
    let Some(order_id) = prompt_parse::<Id>("Enter order ID to cancel: ", lines)? else {
        return Ok(());
    };
    match book.cancel_order(order_id) {
        Status::Ok => println!("Order cancelled successfully."),
        other => println!("Error cancelling order: {}", describe_status(other)),
    }
    Ok(())
}

fn modify_order(book: &mut OrderBook, lines: &mut io::Lines<io::StdinLock<'_>>) -> io::Result<()> {
    let Some(order_id) = prompt_parse::<Id>("Enter order ID to modify: ", lines)? else {
        return Ok(());
    };
    let Some(new_quantity) = prompt_parse::<Qty>("Enter new quantity: ", lines)? else {
        return Ok(());
    };
    let Some(new_price) = prompt_parse::<Price>("Enter new price: ", lines)? else {
        return Ok(());
    };

    let (id, status) = book.modify_order(order_id, new_quantity, new_price);
    match status {
        Status::Ok => println!("Order modified successfully (new id {id})."),
        other => println!("Error modifying order: {}", describe_status(other)),
    }
    Ok(())
}

fn volume(book: &OrderBook, lines: &mut io::Lines<io::StdinLock<'_>>) -> io::Result<()> {
    let Some(price) = prompt_parse::<Price>("Enter price point: ", lines)? else {
        return Ok(());
    };
    println!("Volume at price {price}: {}", book.volume(price));
    Ok(())
}

fn print_optional_price(label: &str, value: Option<Price>) {
    match value {
        Some(p) => println!("{label}: {p}"),
        None => println!("{label}: N/A"),
    }
}
