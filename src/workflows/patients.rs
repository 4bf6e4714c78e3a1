use crate::console::Console;
use crate::db;
use anyhow::Result;
use rusqlite::Connection;
use std::io::{BufRead, Write};

/// Prints every patient with the ID that Book a Room and Discharge ask for.
pub fn view_patients<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<()> {
    let patients = db::get_all_patients(conn)?;

    console.heading("Patient List")?;
    if patients.is_empty() {
        console.notice("No patients found!")?;
    }
    for patient in &patients {
        console.say(format!(
            "ID: {} | Name: {} {} | Age: {} | Doctor: {} | Appointment: {}",
            patient.id,
            patient.first_name,
            patient.last_name,
            patient.age,
            patient.doctor,
            patient.appointment_date
        ))?;
    }
    Ok(())
}
