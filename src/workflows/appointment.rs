use crate::catalog::{specialization_for, PROBLEM_TYPES};
use crate::console::Console;
use crate::db;
use crate::models::Patient;
use crate::utils::format_date;
use anyhow::Result;
use rusqlite::Connection;
use std::io::{BufRead, Write};
use time::Date;

/// Books an appointment: collects the patient's details, maps the reported
/// problem to a specialization and stores the patient row.
///
/// Returns the stored patient. `today` bounds the appointment date, which must
/// fall strictly after it.
pub fn fix_appointment<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
    today: Date,
) -> Result<Patient> {
    console.heading("Fix Appointment")?;

    let first_name = console.read_non_empty("Enter first name: ")?;
    let last_name = console.read_non_empty("Enter last name: ")?;
    let age = console.read_int("Enter age: ", 1, 120)?;

    console.say("Select problem type:")?;
    console.options(&PROBLEM_TYPES)?;
    let problem_type = console.read_int("Enter choice: ", 1, PROBLEM_TYPES.len() as i64)?;
    let doctor = specialization_for(problem_type);

    let date = console.read_future_date("Enter appointment date", today)?;

    let mut patient = Patient {
        id: 0,
        first_name,
        last_name,
        age,
        doctor: doctor.to_string(),
        appointment_date: format_date(date)?,
    };
    patient.id = db::create_patient(conn, &patient)?;

    tracing::info!(patient_id = patient.id, doctor, "appointment fixed");
    console.success(format!(
        "Appointment fixed successfully with {} on {} (patient ID {})",
        patient.doctor, patient.appointment_date, patient.id
    ))?;
    Ok(patient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::{scripted, transcript};
    use crate::db::tests::count_rows;
    use time::macros::date;

    const TODAY: Date = date!(2030 - 03 - 10);

    #[test]
    fn heart_problem_books_a_cardiologist() {
        let conn = db::open_in_memory(false).unwrap();
        let mut console = scripted(&["Jane", "Doe", "40", "4", "2030-03-11"]);

        let patient = fix_appointment(&conn, &mut console, TODAY).unwrap();

        assert_eq!(count_rows(&conn, "patient"), 1);
        let stored = db::get_patient(&conn, patient.id).unwrap().unwrap();
        assert_eq!(stored.first_name, "Jane");
        assert_eq!(stored.last_name, "Doe");
        assert_eq!(stored.age, 40);
        assert_eq!(stored.doctor, "Cardiologist");
        assert_eq!(stored.appointment_date, "2030-03-11");
        assert!(transcript(&console).contains("Appointment fixed successfully with Cardiologist"));
    }

    #[test]
    fn invalid_answers_are_reprompted() {
        let conn = db::open_in_memory(false).unwrap();
        let mut console = scripted(&[
            "  ",
            "Ravi",
            "Kumar",
            "130",
            "55",
            "9",
            "8",
            "2030-03-10",
            "2030-3-20",
            "2030-03-20",
        ]);

        let patient = fix_appointment(&conn, &mut console, TODAY).unwrap();
        assert_eq!(patient.age, 55);
        assert_eq!(patient.doctor, "Neurologist");
        assert_eq!(patient.appointment_date, "2030-03-20");

        let out = transcript(&console);
        assert!(out.contains("Input cannot be empty!"));
        assert!(out.contains("Date must be in the future!"));
        assert!(out.contains("Invalid date format"));
    }

    #[test]
    fn abandoned_prompt_stores_nothing() {
        let conn = db::open_in_memory(false).unwrap();
        let mut console = scripted(&["Jane", "Doe", "40", "2", "2020-01-01", "2020-01-01", "2020-01-01"]);

        assert!(fix_appointment(&conn, &mut console, TODAY).is_err());
        assert_eq!(count_rows(&conn, "patient"), 0);
    }
}
