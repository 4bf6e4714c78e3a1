//! Database module for the hospital desk.
//!
//! This module owns every SQL statement the application issues. Each function
//! takes an explicit connection handle; because a `rusqlite::Transaction`
//! dereferences to a `Connection`, the same functions run unchanged inside the
//! transactional workflows. All statements are parameterized.

use crate::catalog::ROOM_TYPES;
use crate::models::{Admission, Doctor, Medicine, Patient, Payment, Room, RoomStatus, StaffMember};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// Rooms created per room type when seeding an empty `rooms` table.
const ROOMS_PER_TYPE: i64 = 4;

/// Opens (or creates) the database file and prepares the schema.
///
/// Foreign keys are switched on for the connection, the schema in
/// `schema.sql` is applied, and when `seed` is set an empty `rooms` table is
/// populated.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the schema cannot be
/// executed.
pub fn open(path: &Path, seed: bool) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    init_db(&conn, seed)?;
    Ok(conn)
}

/// Opens a private in-memory database with the schema applied.
#[cfg(test)]
pub fn open_in_memory(seed: bool) -> Result<Connection> {
    let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
    init_db(&conn, seed)?;
    Ok(conn)
}

/// Applies the schema to an open connection.
///
/// # Side Effects
///
/// Creates missing tables. Seeds rooms when `seed` is set and the `rooms`
/// table is empty.
pub fn init_db(conn: &Connection, seed: bool) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)
        .context("Failed to enable foreign keys")?;

    let schema = include_str!("schema.sql");
    conn.execute_batch(schema)
        .context("Failed to execute schema")?;

    if seed {
        let created = seed_rooms(conn)?;
        if created > 0 {
            tracing::info!(created, "seeded rooms table");
        }
    }
    Ok(())
}

/// Fills an empty `rooms` table with a block of rooms per room type.
///
/// Room numbers encode the floor: General rooms are `101..`, Semi Special
/// `201..`, and so on. Returns the number of rooms created, which is zero
/// when any room already exists.
pub fn seed_rooms(conn: &Connection) -> Result<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM rooms", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    let mut stmt = conn.prepare("INSERT INTO rooms (room_number, room_type, status) VALUES (?, ?, 'Available')")?;
    let mut created = 0;
    for (floor, room_type) in (1..).zip(ROOM_TYPES) {
        for slot in 1..=ROOMS_PER_TYPE {
            created += stmt.execute(params![floor * 100 + slot, room_type])?;
        }
    }
    Ok(created)
}

/// Creates a new patient (appointment) row and returns its ID.
///
/// # Arguments
///
/// * `conn` - The connection to write through.
/// * `patient` - The patient to store. Its `id` is ignored.
///
/// # Errors
///
/// Returns an error if the insert fails, e.g. on a constraint violation.
pub fn create_patient(conn: &Connection, patient: &Patient) -> Result<i64> {
    conn.execute(
        "INSERT INTO patient (p_fname, p_lname, p_age, doctor, appointment_date) VALUES (?, ?, ?, ?, ?)",
        params![
            patient.first_name,
            patient.last_name,
            patient.age,
            patient.doctor,
            patient.appointment_date,
        ],
    )
    .context("Failed to create patient")?;
    Ok(conn.last_insert_rowid())
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        age: row.get(3)?,
        doctor: row.get(4)?,
        appointment_date: row.get(5)?,
    })
}

/// Retrieves a single patient by ID.
///
/// # Arguments
///
/// * `conn` - The connection to read through.
/// * `patient_id` - The ID of the patient to retrieve.
///
/// # Returns
///
/// `Ok(None)` when no patient has that ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_patient(conn: &Connection, patient_id: i64) -> Result<Option<Patient>> {
    let mut stmt = conn.prepare(
        "SELECT p_id, p_fname, p_lname, p_age, doctor, appointment_date FROM patient WHERE p_id = ?",
    )?;
    let patient = stmt.query_row(params![patient_id], patient_from_row).optional()?;
    Ok(patient)
}

/// Retrieves every patient, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be mapped to a
/// `Patient`.
pub fn get_all_patients(conn: &Connection) -> Result<Vec<Patient>> {
    let mut stmt = conn.prepare(
        "SELECT p_id, p_fname, p_lname, p_age, doctor, appointment_date FROM patient ORDER BY p_id",
    )?;
    let patients = stmt
        .query_map([], patient_from_row)?
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to load patients")?;
    Ok(patients)
}

/// Bumps the stock counter of the named medicine by one.
///
/// Returns the number of rows affected; zero means no medicine has that name.
pub fn increment_medicine_stock(conn: &Connection, name: &str) -> Result<usize> {
    let updated = conn
        .execute("UPDATE pharmacy SET count = count + 1 WHERE mname = ?", params![name])
        .context("Failed to update medicine stock")?;
    Ok(updated)
}

/// Looks up the price of the named medicine.
///
/// # Arguments
///
/// * `conn` - The connection to read through.
/// * `name` - The exact medicine name.
///
/// # Errors
///
/// Returns an error if the query fails. An unknown name is `Ok(None)`.
pub fn get_medicine_price(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let price = conn
        .query_row("SELECT mprize FROM pharmacy WHERE mname = ?", params![name], |row| row.get(0))
        .optional()?;
    Ok(price)
}

/// Adds a medicine to the pharmacy and returns its ID.
///
/// # Arguments
///
/// * `conn` - The connection to write through.
/// * `medicine` - The medicine to store. Its `id` is ignored.
///
/// # Errors
///
/// Returns an error if the name is already taken or the price is not
/// positive.
pub fn create_medicine(conn: &Connection, medicine: &Medicine) -> Result<i64> {
    conn.execute(
        "INSERT INTO pharmacy (mname, mprize, count) VALUES (?, ?, ?)",
        params![medicine.name, medicine.price, medicine.count],
    )
    .with_context(|| format!("Failed to add medicine '{}'", medicine.name))?;
    Ok(conn.last_insert_rowid())
}

fn medicine_from_row(row: &Row<'_>) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        count: row.get(3)?,
    })
}

/// Retrieves every medicine, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_all_medicines(conn: &Connection) -> Result<Vec<Medicine>> {
    let mut stmt = conn.prepare("SELECT mid, mname, mprize, count FROM pharmacy ORDER BY mid")?;
    let medicines = stmt
        .query_map([], medicine_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(medicines)
}

/// Retrieves a single medicine by ID, or `Ok(None)` when it does not exist.
pub fn get_medicine(conn: &Connection, medicine_id: i64) -> Result<Option<Medicine>> {
    let mut stmt = conn.prepare("SELECT mid, mname, mprize, count FROM pharmacy WHERE mid = ?")?;
    let medicine = stmt.query_row(params![medicine_id], medicine_from_row).optional()?;
    Ok(medicine)
}

/// Updates the name, price and stock of an existing medicine.
///
/// # Arguments
///
/// * `conn` - The connection to write through.
/// * `medicine` - The new values, matched to a row by `id`.
///
/// # Returns
///
/// The number of rows changed; zero means no medicine has that ID.
///
/// # Errors
///
/// Returns an error if the new name collides with another medicine.
pub fn update_medicine(conn: &Connection, medicine: &Medicine) -> Result<usize> {
    let updated = conn
        .execute(
            "UPDATE pharmacy SET mname = ?, mprize = ?, count = ? WHERE mid = ?",
            params![medicine.name, medicine.price, medicine.count, medicine.id],
        )
        .with_context(|| format!("Failed to update medicine '{}'", medicine.name))?;
    Ok(updated)
}

/// Removes a medicine. Returns the number of rows deleted.
pub fn delete_medicine(conn: &Connection, medicine_id: i64) -> Result<usize> {
    let deleted = conn
        .execute("DELETE FROM pharmacy WHERE mid = ?", params![medicine_id])
        .context("Failed to delete medicine")?;
    Ok(deleted)
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        number: row.get(1)?,
        room_type: row.get(2)?,
        status: match row.get::<_, String>(3)?.as_str() {
            "Available" => RoomStatus::Available,
            "Occupied" => RoomStatus::Occupied,
            _ => {
                return Err(rusqlite::Error::InvalidColumnType(
                    3,
                    String::from("Invalid room status"),
                    rusqlite::types::Type::Text,
                ))
            }
        },
    })
}

/// Finds one available room of the given type.
///
/// When several rooms qualify the one with the lowest ID is returned.
/// Returns `Ok(None)` when every room of that type is occupied.
pub fn find_available_room(conn: &Connection, room_type: &str) -> Result<Option<Room>> {
    let mut stmt = conn.prepare(
        "SELECT room_id, room_number, room_type, status FROM rooms \
         WHERE room_type = ? AND status = 'Available' ORDER BY room_id LIMIT 1",
    )?;
    let room = stmt.query_row(params![room_type], room_from_row).optional()?;
    Ok(room)
}

/// Retrieves a single room by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the stored status is not a known
/// `RoomStatus`.
pub fn get_room(conn: &Connection, room_id: i64) -> Result<Option<Room>> {
    let mut stmt =
        conn.prepare("SELECT room_id, room_number, room_type, status FROM rooms WHERE room_id = ?")?;
    let room = stmt.query_row(params![room_id], room_from_row).optional()?;
    Ok(room)
}

/// Retrieves every room, ordered by room number.
pub fn get_all_rooms(conn: &Connection) -> Result<Vec<Room>> {
    let mut stmt =
        conn.prepare("SELECT room_id, room_number, room_type, status FROM rooms ORDER BY room_number")?;
    let rooms = stmt
        .query_map([], room_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rooms)
}

fn set_room_status(conn: &Connection, room_id: i64, from: RoomStatus, to: RoomStatus) -> Result<usize> {
    let updated = conn
        .execute(
            "UPDATE rooms SET status = ? WHERE room_id = ? AND status = ?",
            params![to.as_str(), room_id, from.as_str()],
        )
        .with_context(|| format!("Failed to mark room {room_id} {to}"))?;
    Ok(updated)
}

/// Marks an available room as occupied. Returns the number of rows changed.
pub fn occupy_room(conn: &Connection, room_id: i64) -> Result<usize> {
    set_room_status(conn, room_id, RoomStatus::Available, RoomStatus::Occupied)
}

/// Marks an occupied room as available again. Returns the number of rows changed.
pub fn release_room(conn: &Connection, room_id: i64) -> Result<usize> {
    set_room_status(conn, room_id, RoomStatus::Occupied, RoomStatus::Available)
}

/// Records that a patient occupies a room and returns the admission ID.
///
/// # Errors
///
/// Fails when the patient or room does not exist (foreign key violation).
pub fn create_admission(conn: &Connection, patient_id: i64, room_id: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO admit_p (p_id, room_id) VALUES (?, ?)",
        params![patient_id, room_id],
    )
    .with_context(|| format!("Failed to admit patient {patient_id}"))?;
    Ok(conn.last_insert_rowid())
}

/// Returns the most recent admission of a patient, if any.
pub fn find_admission_for_patient(conn: &Connection, patient_id: i64) -> Result<Option<Admission>> {
    let admission = conn
        .query_row(
            "SELECT admit_id, p_id, room_id FROM admit_p WHERE p_id = ? ORDER BY admit_id DESC LIMIT 1",
            params![patient_id],
            |row| {
                Ok(Admission {
                    id: row.get(0)?,
                    patient_id: row.get(1)?,
                    room_id: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(admission)
}

/// Deletes an admission record.
///
/// # Arguments
///
/// * `conn` - The connection to write through.
/// * `admission_id` - The admission to remove.
///
/// # Returns
///
/// The number of rows deleted.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_admission(conn: &Connection, admission_id: i64) -> Result<usize> {
    let deleted = conn
        .execute("DELETE FROM admit_p WHERE admit_id = ?", params![admission_id])
        .with_context(|| format!("Failed to delete admission {admission_id}"))?;
    Ok(deleted)
}

/// Records a payment and returns its ID. `paid_at` is filled in by SQLite.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_payment(conn: &Connection, payment: &Payment) -> Result<i64> {
    conn.execute(
        "INSERT INTO payment (method, details, amount) VALUES (?, ?, ?)",
        params![payment.method.as_str(), payment.details, payment.amount],
    )
    .context("Failed to record payment")?;
    Ok(conn.last_insert_rowid())
}

/// Creates a new doctor and returns its ID.
pub fn create_doctor(conn: &Connection, doctor: &Doctor) -> Result<i64> {
    conn.execute(
        "INSERT INTO doctor (dname, dexp, dspeciality) VALUES (?, ?, ?)",
        params![doctor.name, doctor.experience, doctor.speciality],
    )
    .context("Failed to add doctor")?;
    Ok(conn.last_insert_rowid())
}

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        experience: row.get(2)?,
        speciality: row.get(3)?,
    })
}

/// Retrieves every doctor, ordered by ID.
pub fn get_all_doctors(conn: &Connection) -> Result<Vec<Doctor>> {
    let mut stmt = conn.prepare("SELECT did, dname, dexp, dspeciality FROM doctor ORDER BY did")?;
    let doctors = stmt
        .query_map([], doctor_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(doctors)
}

/// Retrieves a single doctor by ID, or `Ok(None)` when it does not exist.
pub fn get_doctor(conn: &Connection, doctor_id: i64) -> Result<Option<Doctor>> {
    let mut stmt = conn.prepare("SELECT did, dname, dexp, dspeciality FROM doctor WHERE did = ?")?;
    let doctor = stmt.query_row(params![doctor_id], doctor_from_row).optional()?;
    Ok(doctor)
}

/// Updates an existing doctor by ID. Returns the number of rows changed.
pub fn update_doctor(conn: &Connection, doctor: &Doctor) -> Result<usize> {
    let updated = conn
        .execute(
            "UPDATE doctor SET dname = ?, dexp = ?, dspeciality = ? WHERE did = ?",
            params![doctor.name, doctor.experience, doctor.speciality, doctor.id],
        )
        .context("Failed to update doctor")?;
    Ok(updated)
}

/// Removes a doctor. Returns the number of rows deleted.
///
/// Patients keep the specialization text they were booked with.
pub fn delete_doctor(conn: &Connection, doctor_id: i64) -> Result<usize> {
    let deleted = conn
        .execute("DELETE FROM doctor WHERE did = ?", params![doctor_id])
        .context("Failed to delete doctor")?;
    Ok(deleted)
}

/// Creates a new staff member and returns its ID.
///
/// # Arguments
///
/// * `conn` - The connection to write through.
/// * `staff_member` - The staff member to store. Its `id` is ignored.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_staff_member(conn: &Connection, staff_member: &StaffMember) -> Result<i64> {
    conn.execute(
        "INSERT INTO staff (sname, srole, contact) VALUES (?, ?, ?)",
        params![staff_member.name, staff_member.role, staff_member.contact],
    )
    .context("Failed to add staff member")?;
    Ok(conn.last_insert_rowid())
}

fn staff_from_row(row: &Row<'_>) -> rusqlite::Result<StaffMember> {
    Ok(StaffMember {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        contact: row.get(3)?,
    })
}

/// Retrieves every staff member, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_all_staff(conn: &Connection) -> Result<Vec<StaffMember>> {
    let mut stmt = conn.prepare("SELECT sid, sname, srole, contact FROM staff ORDER BY sid")?;
    let staff = stmt
        .query_map([], staff_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(staff)
}

/// Retrieves a single staff member by ID.
///
/// # Arguments
///
/// * `conn` - The connection to read through.
/// * `staff_id` - The ID of the staff member.
///
/// # Errors
///
/// Returns an error if the query fails. An unknown ID is `Ok(None)`.
pub fn get_staff_member(conn: &Connection, staff_id: i64) -> Result<Option<StaffMember>> {
    let mut stmt = conn.prepare("SELECT sid, sname, srole, contact FROM staff WHERE sid = ?")?;
    let staff_member = stmt.query_row(params![staff_id], staff_from_row).optional()?;
    Ok(staff_member)
}

/// Updates an existing staff member by ID. Returns the number of rows changed.
pub fn update_staff_member(conn: &Connection, staff_member: &StaffMember) -> Result<usize> {
    let updated = conn
        .execute(
            "UPDATE staff SET sname = ?, srole = ?, contact = ? WHERE sid = ?",
            params![staff_member.name, staff_member.role, staff_member.contact, staff_member.id],
        )
        .context("Failed to update staff member")?;
    Ok(updated)
}

/// Removes a staff member. Returns the number of rows deleted.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_staff_member(conn: &Connection, staff_id: i64) -> Result<usize> {
    let deleted = conn
        .execute("DELETE FROM staff WHERE sid = ?", params![staff_id])
        .context("Failed to delete staff member")?;
    Ok(deleted)
}
