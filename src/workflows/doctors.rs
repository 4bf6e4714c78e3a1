use crate::console::Console;
use crate::db;
use crate::models::Doctor;
use anyhow::Result;
use rusqlite::Connection;
use std::io::{BufRead, Write};

const MAX_EXPERIENCE: i64 = 50;

pub fn view_doctors<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<()> {
    let doctors = db::get_all_doctors(conn)?;

    console.heading("Doctor List")?;
    if doctors.is_empty() {
        console.notice("No doctors found.")?;
    }
    for doctor in &doctors {
        console.say(format!("ID: {}", doctor.id))?;
        console.say(format!("Name: {}", doctor.name))?;
        console.say(format!("Experience: {} years", doctor.experience))?;
        console.say(format!("Speciality: {}", doctor.speciality))?;
        console.say("-------------------")?;
    }
    Ok(())
}

/// Reads the editable doctor fields.
fn read_doctor_fields<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    id: i64,
) -> Result<Doctor> {
    let name = console.read_non_empty("Enter doctor name: ")?;
    let experience = console.read_int("Enter experience (years): ", 0, MAX_EXPERIENCE)?;
    let speciality = console.read_non_empty("Enter speciality: ")?;
    Ok(Doctor {
        id,
        name,
        experience,
        speciality,
    })
}

pub fn add_doctor<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<Doctor> {
    console.heading("Add New Doctor")?;

    let mut doctor = read_doctor_fields(console, 0)?;
    doctor.id = db::create_doctor(conn, &doctor)?;

    tracing::info!(doctor_id = doctor.id, "doctor added");
    console.success("Doctor added successfully!")?;
    Ok(doctor)
}

/// Replaces a doctor's details. Returns `None` when the ID is unknown.
pub fn update_doctor<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<Option<Doctor>> {
    console.heading("Update Doctor")?;

    let id = console.read_int("Enter doctor ID: ", 1, i64::MAX)?;
    let Some(current) = db::get_doctor(conn, id)? else {
        console.failure("Doctor not found!")?;
        return Ok(None);
    };
    console.say(format!(
        "Current: {} | {} years | {}",
        current.name, current.experience, current.speciality
    ))?;

    let doctor = read_doctor_fields(console, id)?;
    if db::update_doctor(conn, &doctor)? == 0 {
        console.failure("Failed to update doctor")?;
        return Ok(None);
    }

    tracing::info!(doctor_id = id, "doctor updated");
    console.success("Doctor updated successfully!")?;
    Ok(Some(doctor))
}

/// Removes a doctor by ID. Returns whether a doctor was deleted.
pub fn delete_doctor<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<bool> {
    console.heading("Delete Doctor")?;

    let id = console.read_int("Enter doctor ID: ", 1, i64::MAX)?;
    if db::delete_doctor(conn, id)? == 0 {
        console.failure("Doctor ID not found!")?;
        return Ok(false);
    }

    tracing::info!(doctor_id = id, "doctor deleted");
    console.success("Doctor deleted successfully!")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::{scripted, transcript};

    #[test]
    fn added_doctor_is_listed() {
        let conn = db::open_in_memory(false).unwrap();
        let mut console = scripted(&["Dr. Mehta", "51", "22", "Cardiologist"]);

        let doctor = add_doctor(&conn, &mut console).unwrap();
        assert_eq!(doctor.experience, 22);

        view_doctors(&conn, &mut console).unwrap();
        let out = transcript(&console);
        assert!(out.contains("Doctor added successfully!"));
        assert!(out.contains("Name: Dr. Mehta"));
        assert!(out.contains("Experience: 22 years"));
        assert!(out.contains("Speciality: Cardiologist"));
    }

    #[test]
    fn update_replaces_fields() {
        let conn = db::open_in_memory(false).unwrap();
        let mut console = scripted(&["Dr. Iyer", "5", "Dermatologist"]);
        let added = add_doctor(&conn, &mut console).unwrap();

        let id_answer = added.id.to_string();
        let mut console = scripted(&[id_answer.as_str(), "Dr. Iyer", "6", "Dermatologist"]);
        let updated = update_doctor(&conn, &mut console).unwrap().unwrap();

        assert_eq!(updated.experience, 6);
        assert_eq!(db::get_doctor(&conn, added.id).unwrap(), Some(updated));
        assert!(transcript(&console).contains("Current: Dr. Iyer | 5 years | Dermatologist"));
    }

    #[test]
    fn unknown_doctor_is_reported() {
        let conn = db::open_in_memory(false).unwrap();
        let mut console = scripted(&["3"]);
        assert_eq!(update_doctor(&conn, &mut console).unwrap(), None);
        assert!(transcript(&console).contains("Doctor not found!"));
    }

    #[test]
    fn delete_removes_the_doctor_once() {
        let conn = db::open_in_memory(false).unwrap();
        let mut console = scripted(&["Dr. Rao", "12", "Neurologist"]);
        let added = add_doctor(&conn, &mut console).unwrap();

        let id_answer = added.id.to_string();
        let mut console = scripted(&[id_answer.as_str(), id_answer.as_str()]);
        assert!(delete_doctor(&conn, &mut console).unwrap());
        assert!(!delete_doctor(&conn, &mut console).unwrap());

        let out = transcript(&console);
        assert!(out.contains("Doctor deleted successfully!"));
        assert!(out.contains("Doctor ID not found!"));
        assert!(db::get_all_doctors(&conn).unwrap().is_empty());
    }

    #[test]
    fn empty_roster_is_reported() {
        let conn = db::open_in_memory(false).unwrap();
        let mut console = scripted(&[]);
        view_doctors(&conn, &mut console).unwrap();
        assert!(transcript(&console).contains("No doctors found."));
    }
}
