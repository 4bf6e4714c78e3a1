use crate::catalog::{payment_method_for, PAYMENT_METHODS};
use crate::console::Console;
use crate::db;
use crate::models::{Payment, PaymentMethod};
use anyhow::Result;
use rusqlite::Connection;
use std::io::{BufRead, Write};

/// Collects a payment method and its details for `amount` and records it.
///
/// Runs on whatever connection it is handed, so callers that opened a
/// transaction get the payment row inside it.
pub fn process_payment<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
    amount: i64,
) -> Result<Payment> {
    console.heading("Payment Processing")?;
    console.say(format!("Amount to pay: {amount}"))?;

    console.say("Select payment method:")?;
    console.options(&PAYMENT_METHODS)?;
    let method = payment_method_for(console.read_int("Enter choice: ", 1, PAYMENT_METHODS.len() as i64)?);

    let details = match method {
        PaymentMethod::Card => format!(
            "Card ending with {}",
            console.read_last_four("Enter last 4 digits: ")?
        ),
        PaymentMethod::Cash => "Paid at counter".to_string(),
        PaymentMethod::Upi => console.read_non_empty("Enter UPI ID: ")?,
        PaymentMethod::NetBanking => format!(
            "Account ending with {}",
            console.read_last_four("Enter last 4 digits: ")?
        ),
    };

    let payment = Payment {
        method,
        details,
        amount,
    };
    db::create_payment(conn, &payment)?;

    tracing::info!(method = %payment.method, amount, "payment recorded");
    console.success("Payment successful!")?;
    Ok(payment)
}
