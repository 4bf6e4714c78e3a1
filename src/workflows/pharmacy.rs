use crate::console::Console;
use crate::db;
use crate::models::Medicine;
use crate::workflows::payment::process_payment;
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::io::{BufRead, Write};

/// Largest price or stock figure accepted from the admin.
const MAX_QUANTITY: i64 = 1_000_000;

/// Result of a medicine purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// No medicine with the requested name; nothing was written.
    NotFound,
    /// Stock updated and payment recorded.
    Paid { amount: i64 },
}

/// Prints the pharmacy stock.
pub fn view_medicines<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<()> {
    let medicines = db::get_all_medicines(conn)?;

    console.heading("Medicine List")?;
    if medicines.is_empty() {
        console.notice("No medicines available.")?;
    }
    for medicine in &medicines {
        console.say(format!(
            "ID: {} | Name: {} | Price: {} | Count: {}",
            medicine.id, medicine.name, medicine.price, medicine.count
        ))?;
    }
    Ok(())
}

/// Sells one unit of a medicine.
///
/// The stock update, price lookup and payment run in one transaction, so an
/// abandoned payment leaves the stock counter untouched.
pub fn get_medicines<R: BufRead, W: Write>(
    conn: &mut Connection,
    console: &mut Console<R, W>,
) -> Result<PurchaseOutcome> {
    console.heading("Medicine Purchase")?;
    view_medicines(conn, console)?;

    let name = console.read_non_empty("Enter medicine name: ")?;

    let tx = conn.transaction()?;
    if db::increment_medicine_stock(&tx, &name)? == 0 {
        tracing::warn!(medicine = %name, "purchase of unknown medicine");
        console.failure("Medicine not found!")?;
        return Ok(PurchaseOutcome::NotFound);
    }

    let amount = db::get_medicine_price(&tx, &name)?
        .ok_or_else(|| anyhow!("Medicine '{name}' vanished during purchase"))?;
    console.say(format!("Price: {amount}"))?;

    process_payment(&tx, console, amount)?;
    tx.commit()?;

    tracing::info!(medicine = %name, amount, "medicine purchased");
    Ok(PurchaseOutcome::Paid { amount })
}

/// Adds a medicine to the pharmacy.
pub fn add_medicine<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<Medicine> {
    console.heading("Add New Medicine")?;

    let name = console.read_non_empty("Enter medicine name: ")?;
    let price = console.read_int("Enter medicine price: ", 1, MAX_QUANTITY)?;
    let count = console.read_int("Enter initial count: ", 0, MAX_QUANTITY)?;

    let mut medicine = Medicine {
        id: 0,
        name,
        price,
        count,
    };
    medicine.id = db::create_medicine(conn, &medicine)?;

    tracing::info!(medicine_id = medicine.id, "medicine added");
    console.success("Medicine added successfully!")?;
    Ok(medicine)
}

/// Replaces a medicine's name, price and stock. Returns `None` when the ID
/// is unknown.
pub fn update_medicine<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<Option<Medicine>> {
    console.heading("Update Medicine")?;

    let id = console.read_int("Enter medicine ID: ", 1, i64::MAX)?;
    let Some(current) = db::get_medicine(conn, id)? else {
        console.failure("Medicine ID not found!")?;
        return Ok(None);
    };
    console.say(format!(
        "Current: {} | Price: {} | Count: {}",
        current.name, current.price, current.count
    ))?;

    let medicine = Medicine {
        id,
        name: console.read_non_empty("Enter new name: ")?,
        price: console.read_int("Enter new price: ", 1, MAX_QUANTITY)?,
        count: console.read_int("Enter new count: ", 0, MAX_QUANTITY)?,
    };
    if db::update_medicine(conn, &medicine)? == 0 {
        console.failure("Failed to update medicine")?;
        return Ok(None);
    }

    tracing::info!(medicine_id = id, "medicine updated");
    console.success("Medicine updated successfully!")?;
    Ok(Some(medicine))
}

/// Removes a medicine by ID. Returns whether a row was deleted.
pub fn delete_medicine<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<bool> {
    console.heading("Delete Medicine")?;

    let id = console.read_int("Enter medicine ID: ", 1, i64::MAX)?;
    if db::delete_medicine(conn, id)? == 0 {
        console.failure("Medicine ID not found!")?;
        return Ok(false);
    }

    tracing::info!(medicine_id = id, "medicine deleted");
    console.success("Medicine deleted successfully!")?;
    Ok(true)
}
