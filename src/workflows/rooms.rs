use crate::catalog::{room_type_for, ROOM_TYPES};
use crate::console::Console;
use crate::db;
use crate::models::RoomStatus;
use anyhow::{bail, Result};
use rusqlite::Connection;
use std::io::{BufRead, Write};

/// Result of a room booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Every room of the requested type is occupied; nothing was written.
    NoRoomAvailable,
    /// The room was marked occupied and the patient admitted to it.
    Admitted {
        room_number: i64,
        patient_id: i64,
    },
}

/// Result of a discharge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DischargeOutcome {
    /// The patient holds no admission.
    NotAdmitted,
    /// The admission was closed and its room freed.
    Discharged { room_number: i64 },
}

/// Books a room of the chosen type and admits a patient to it.
///
/// Finding the room, occupying it and writing the admission happen in one
/// transaction. If the patient ID is abandoned or refers to no patient the
/// room stays available.
pub fn book_room<R: BufRead, W: Write>(
    conn: &mut Connection,
    console: &mut Console<R, W>,
) -> Result<BookingOutcome> {
    console.heading("Room Booking")?;
    console.say("Available room types:")?;
    console.options(&ROOM_TYPES)?;
    let room_type = room_type_for(console.read_int("Select room type: ", 1, ROOM_TYPES.len() as i64)?);

    let tx = conn.transaction()?;
    let Some(room) = db::find_available_room(&tx, room_type)? else {
        tracing::warn!(room_type, "no room available");
        console.notice("No available rooms of this type")?;
        return Ok(BookingOutcome::NoRoomAvailable);
    };

    if db::occupy_room(&tx, room.id)? != 1 {
        bail!("Room {} could not be booked", room.number);
    }
    console.say(format!("Room {} ({}) reserved.", room.number, room.room_type))?;

    let patient_id = console.read_int("Enter patient ID: ", 1, i64::MAX)?;
    db::create_admission(&tx, patient_id, room.id)?;
    tx.commit()?;

    tracing::info!(room = room.number, patient_id, "patient admitted");
    console.success(format!(
        "Room {} booked successfully! Patient admitted.",
        room.number
    ))?;
    Ok(BookingOutcome::Admitted {
        room_number: room.number,
        patient_id,
    })
}

/// Discharges a patient: closes their admission and frees the room.
pub fn discharge_patient<R: BufRead, W: Write>(
    conn: &mut Connection,
    console: &mut Console<R, W>,
) -> Result<DischargeOutcome> {
    console.heading("Discharge")?;
    let patient_id = console.read_int("Enter patient ID: ", 1, i64::MAX)?;

    let tx = conn.transaction()?;
    let Some(admission) = db::find_admission_for_patient(&tx, patient_id)? else {
        console.notice(format!("No admission found for patient {patient_id}"))?;
        return Ok(DischargeOutcome::NotAdmitted);
    };

    let patient = match db::get_patient(&tx, admission.patient_id)? {
        Some(p) => format!("{} {}", p.first_name, p.last_name),
        None => format!("Patient {}", admission.patient_id),
    };

    db::delete_admission(&tx, admission.id)?;
    if db::release_room(&tx, admission.room_id)? != 1 {
        bail!("Room {} of admission {} is not occupied", admission.room_id, admission.id);
    }
    let room_number = match db::get_room(&tx, admission.room_id)? {
        Some(room) => room.number,
        None => bail!("Room {} of admission {} no longer exists", admission.room_id, admission.id),
    };
    tx.commit()?;

    tracing::info!(patient_id = admission.patient_id, room = room_number, "patient discharged");
    console.success(format!(
        "{patient} discharged, room {room_number} is now available."
    ))?;
    Ok(DischargeOutcome::Discharged { room_number })
}

/// Prints every room with its occupancy.
pub fn view_rooms<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<()> {
    let rooms = db::get_all_rooms(conn)?;

    console.heading("Room Status")?;
    if rooms.is_empty() {
        console.notice("No rooms found!")?;
    }
    for room in &rooms {
        let line = format!("Room {} | Type: {} | Status: {}", room.number, room.room_type, room.status);
        match room.status {
            RoomStatus::Available => console.say(line)?,
            RoomStatus::Occupied => console.notice(line)?,
        }
    }
    Ok(())
}
