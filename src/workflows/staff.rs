use crate::console::Console;
use crate::db;
use crate::models::StaffMember;
use anyhow::Result;
use rusqlite::Connection;
use std::io::{BufRead, Write};

fn read_staff_fields<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    id: i64,
) -> Result<StaffMember> {
    let name = console.read_non_empty("Enter staff name: ")?;
    let role = console.read_non_empty("Enter staff role (e.g. Nurse, Technician, Receptionist): ")?;
    let contact = console.read_phone("Enter contact number: ")?;
    Ok(StaffMember {
        id,
        name,
        role,
        contact,
    })
}

pub fn add_staff<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<StaffMember> {
    console.heading("Add Staff Member")?;

    let mut member = read_staff_fields(console, 0)?;
    member.id = db::create_staff_member(conn, &member)?;

    tracing::info!(staff_id = member.id, "staff member added");
    console.success("Staff member added successfully!")?;
    Ok(member)
}

/// Replaces a staff member's details. Returns `None` when the ID is unknown.
pub fn update_staff<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<Option<StaffMember>> {
    console.heading("Update Staff Member")?;

    let id = console.read_int("Enter staff ID: ", 1, i64::MAX)?;
    let Some(current) = db::get_staff_member(conn, id)? else {
        console.failure("Staff ID not found!")?;
        return Ok(None);
    };
    console.say(format!("Current: {} | {} | {}", current.name, current.role, current.contact))?;

    let member = read_staff_fields(console, id)?;
    if db::update_staff_member(conn, &member)? == 0 {
        console.failure("Failed to update staff member")?;
        return Ok(None);
    }

    tracing::info!(staff_id = id, "staff member updated");
    console.success("Staff member updated successfully!")?;
    Ok(Some(member))
}

/// Removes a staff member by ID. Returns whether a row was deleted.
pub fn delete_staff<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<bool> {
    console.heading("Delete Staff Member")?;

    let id = console.read_int("Enter staff ID: ", 1, i64::MAX)?;
    if db::delete_staff_member(conn, id)? == 0 {
        console.failure("Staff ID not found!")?;
        return Ok(false);
    }

    tracing::info!(staff_id = id, "staff member deleted");
    console.success("Staff member deleted successfully!")?;
    Ok(true)
}

pub fn view_staff<R: BufRead, W: Write>(
    conn: &Connection,
    console: &mut Console<R, W>,
) -> Result<()> {
    let staff = db::get_all_staff(conn)?;

    console.heading("Staff Members")?;
    if staff.is_empty() {
        console.notice("No staff members found!")?;
    }
    for member in &staff {
        console.say(format!(
            "ID: {} | Name: {} | Role: {} | Contact: {}",
            member.id, member.name, member.role, member.contact
        ))?;
    }
    Ok(())
}
