//! The menu loop for the hospital desk.
//!
//! The main menu hands control to the user menu or, after the admin password
//! is verified, the admin menu. Each menu loops until "Back" is chosen or the
//! input closes. A failing workflow is reported and control returns to the
//! menu that started it.

use crate::auth::CredentialVerifier;
use crate::console::{Console, PromptError};
use crate::utils::today;
use crate::workflows::{appointment, doctors, patients, pharmacy, rooms, staff};
use anyhow::Result;
use rusqlite::Connection;
use std::io::{BufRead, Write};

/// A fixed set of numbered menu entries.
trait MenuItem: Copy + 'static {
    const ALL: &'static [Self];
    fn label(self) -> &'static str;
}

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainAction {
    UserLogin,
    AdminLogin,
    Exit,
}

impl MenuItem for MainAction {
    const ALL: &'static [Self] = &[Self::UserLogin, Self::AdminLogin, Self::Exit];

    fn label(self) -> &'static str {
        match self {
            Self::UserLogin => "User Login",
            Self::AdminLogin => "Admin Login",
            Self::Exit => "Exit",
        }
    }
}

/// Entries of the user menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    FixAppointment,
    GetMedicines,
    ViewDoctors,
    BookRoom,
    Discharge,
    Back,
}

impl MenuItem for UserAction {
    const ALL: &'static [Self] = &[
        Self::FixAppointment,
        Self::GetMedicines,
        Self::ViewDoctors,
        Self::BookRoom,
        Self::Discharge,
        Self::Back,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::FixAppointment => "Fix Appointment",
            Self::GetMedicines => "Get Medicines",
            Self::ViewDoctors => "View Doctors",
            Self::BookRoom => "Book a Room",
            Self::Discharge => "Discharge",
            Self::Back => "Back to Main Menu",
        }
    }
}

/// Entries of the admin menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    AddDoctor,
    AddMedicine,
    ViewDoctors,
    ViewMedicines,
    UpdateDoctor,
    AddStaff,
    UpdateStaff,
    ViewStaff,
    ViewRooms,
    ViewPatients,
    UpdateMedicine,
    DeleteDoctor,
    DeleteMedicine,
    DeleteStaff,
    Back,
}

impl MenuItem for AdminAction {
    const ALL: &'static [Self] = &[
        Self::AddDoctor,
        Self::AddMedicine,
        Self::ViewDoctors,
        Self::ViewMedicines,
        Self::UpdateDoctor,
        Self::AddStaff,
        Self::UpdateStaff,
        Self::ViewStaff,
        Self::ViewRooms,
        Self::ViewPatients,
        Self::UpdateMedicine,
        Self::DeleteDoctor,
        Self::DeleteMedicine,
        Self::DeleteStaff,
        Self::Back,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::AddDoctor => "Add Doctor",
            Self::AddMedicine => "Add Medicine",
            Self::ViewDoctors => "View Doctors",
            Self::ViewMedicines => "View Medicines",
            Self::UpdateDoctor => "Update Doctor",
            Self::AddStaff => "Add Staff",
            Self::UpdateStaff => "Update Staff",
            Self::ViewStaff => "View Staff",
            Self::ViewRooms => "View Rooms",
            Self::ViewPatients => "View Patients",
            Self::UpdateMedicine => "Update Medicine",
            Self::DeleteDoctor => "Delete Doctor",
            Self::DeleteMedicine => "Delete Medicine",
            Self::DeleteStaff => "Delete Staff",
            Self::Back => "Back to Main Menu",
        }
    }
}

/// What a menu does after an entry finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Main application struct: the database handle, the console and the admin
/// credential check, owned for the lifetime of the process.
pub struct App<R, W, V> {
    conn: Connection,
    console: Console<R, W>,
    verifier: V,
}

impl<R: BufRead, W: Write, V: CredentialVerifier> App<R, W, V> {
    pub fn new(conn: Connection, console: Console<R, W>, verifier: V) -> Self {
        Self {
            conn,
            console,
            verifier,
        }
    }

    #[cfg(test)]
    fn console(&self) -> &Console<R, W> {
        &self.console
    }

    /// Runs the main menu until Exit is chosen or the input closes.
    ///
    /// # Errors
    ///
    /// Returns an error only when the console itself fails. Workflow failures
    /// are reported on the console and the loop carries on.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let action = match self.choose::<MainAction>("Hospital Management System") {
                Ok(action) => action,
                Err(PromptError::TooManyAttempts(_)) => continue,
                Err(PromptError::EndOfInput) => break,
                Err(e) => return Err(e.into()),
            };

            let flow = match action {
                MainAction::UserLogin => self.user_menu()?,
                MainAction::AdminLogin => self.admin_login()?,
                MainAction::Exit => Flow::Quit,
            };
            if flow == Flow::Quit {
                break;
            }
        }

        self.console.say("Thank you for using the system. Goodbye!")?;
        Ok(())
    }

    fn choose<M: MenuItem>(&mut self, title: &str) -> Result<M, PromptError> {
        self.console.heading(title)?;
        let labels: Vec<&str> = M::ALL.iter().map(|item| item.label()).collect();
        self.console.options(labels.as_slice())?;
        let choice = self.console.read_int("Select option: ", 1, M::ALL.len() as i64)?;
        Ok(M::ALL[(choice - 1) as usize])
    }

    fn user_menu(&mut self) -> Result<Flow> {
        loop {
            let action = match self.choose::<UserAction>("User Menu") {
                Ok(action) => action,
                Err(PromptError::TooManyAttempts(_)) => continue,
                Err(PromptError::EndOfInput) => return Ok(Flow::Quit),
                Err(e) => return Err(e.into()),
            };

            let conn = &mut self.conn;
            let console = &mut self.console;
            let result = match action {
                UserAction::FixAppointment => appointment::fix_appointment(conn, console, today()).map(drop),
                UserAction::GetMedicines => pharmacy::get_medicines(conn, console).map(drop),
                UserAction::ViewDoctors => doctors::view_doctors(conn, console),
                UserAction::BookRoom => rooms::book_room(conn, console).map(drop),
                UserAction::Discharge => rooms::discharge_patient(conn, console).map(drop),
                UserAction::Back => return Ok(Flow::Continue),
            };

            if self.settle(action.label(), result)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn admin_login(&mut self) -> Result<Flow> {
        let password = match self.console.read_password("Enter admin password: ") {
            Ok(password) => password,
            Err(PromptError::EndOfInput) => return Ok(Flow::Quit),
            Err(e) => return Err(e.into()),
        };

        if self.verifier.verify(&password) {
            tracing::info!("admin logged in");
            self.admin_menu()
        } else {
            tracing::warn!("admin login rejected");
            self.console.failure("Incorrect password! Access denied.")?;
            Ok(Flow::Continue)
        }
    }

    fn admin_menu(&mut self) -> Result<Flow> {
        loop {
            let action = match self.choose::<AdminAction>("Admin Menu") {
                Ok(action) => action,
                Err(PromptError::TooManyAttempts(_)) => continue,
                Err(PromptError::EndOfInput) => return Ok(Flow::Quit),
                Err(e) => return Err(e.into()),
            };

            let conn = &self.conn;
            let console = &mut self.console;
            let result = match action {
                AdminAction::AddDoctor => doctors::add_doctor(conn, console).map(drop),
                AdminAction::AddMedicine => pharmacy::add_medicine(conn, console).map(drop),
                AdminAction::ViewDoctors => doctors::view_doctors(conn, console),
                AdminAction::ViewMedicines => pharmacy::view_medicines(conn, console),
                AdminAction::UpdateDoctor => doctors::update_doctor(conn, console).map(drop),
                AdminAction::AddStaff => staff::add_staff(conn, console).map(drop),
                AdminAction::UpdateStaff => staff::update_staff(conn, console).map(drop),
                AdminAction::ViewStaff => staff::view_staff(conn, console),
                AdminAction::ViewRooms => rooms::view_rooms(conn, console),
                AdminAction::ViewPatients => patients::view_patients(conn, console),
                AdminAction::UpdateMedicine => pharmacy::update_medicine(conn, console).map(drop),
                AdminAction::DeleteDoctor => doctors::delete_doctor(conn, console).map(drop),
                AdminAction::DeleteMedicine => pharmacy::delete_medicine(conn, console).map(drop),
                AdminAction::DeleteStaff => staff::delete_staff(conn, console).map(drop),
                AdminAction::Back => return Ok(Flow::Continue),
            };

            if self.settle(action.label(), result)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    /// Reports how a workflow ended and decides whether the menu keeps running.
    fn settle(&mut self, label: &str, result: Result<()>) -> Result<Flow> {
        let Err(err) = result else {
            return Ok(Flow::Continue);
        };

        match err.downcast_ref::<PromptError>() {
            Some(PromptError::EndOfInput) => Ok(Flow::Quit),
            Some(PromptError::TooManyAttempts(n)) => {
                self.console
                    .notice(format!("Too many invalid answers ({n}), {label} cancelled."))?;
                Ok(Flow::Continue)
            }
            _ => {
                tracing::error!("{label} failed: {err:#}");
                self.console.failure(format!("{label} failed: {err:#}"))?;
                Ok(Flow::Continue)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::{scripted, transcript, ScriptedConsole};
    use crate::db;
    use crate::db::tests::count_rows;
    use std::io::Cursor;

    struct FixedPassword(&'static str);

    impl CredentialVerifier for FixedPassword {
        fn verify(&self, password: &str) -> bool {
            password == self.0
        }
    }

    fn app(conn: Connection, lines: &[&str]) -> App<Cursor<Vec<u8>>, Vec<u8>, FixedPassword> {
        App::new(conn, scripted(lines), FixedPassword("open-sesame"))
    }

    fn output(app: &App<Cursor<Vec<u8>>, Vec<u8>, FixedPassword>) -> String {
        let console: &ScriptedConsole = app.console();
        transcript(console)
    }

    #[test]
    fn exit_says_goodbye() {
        let mut app = app(db::open_in_memory(true).unwrap(), &["3"]);
        app.run().unwrap();
        let out = output(&app);
        assert!(out.contains("1. User Login"));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn closed_input_ends_the_loop() {
        let mut app = app(db::open_in_memory(true).unwrap(), &["1"]);
        app.run().unwrap();
        assert!(output(&app).contains("Goodbye!"));
    }

    #[test]
    fn wrong_admin_password_is_denied() {
        let mut app = app(db::open_in_memory(true).unwrap(), &["2", "12345", "3"]);
        app.run().unwrap();
        let out = output(&app);
        assert!(out.contains("Incorrect password! Access denied."));
        assert!(!out.contains("Admin Menu"));
        assert!(!out.contains("12345"));
    }

    #[test]
    fn admin_adds_a_doctor_the_user_can_see() {
        let conn = db::open_in_memory(true).unwrap();
        let mut app = app(
            conn,
            &[
                "2", "open-sesame", "1", "Dr. Sen", "15", "Orthopedic", "15", "1", "3", "6", "3",
            ],
        );
        app.run().unwrap();

        assert_eq!(count_rows(&app.conn, "doctor"), 1);
        let out = output(&app);
        assert!(out.contains("Doctor added successfully!"));
        assert!(out.contains("Name: Dr. Sen"));
    }

    #[test]
    fn user_books_an_appointment() {
        let mut app = app(
            db::open_in_memory(true).unwrap(),
            &["1", "1", "Jane", "Doe", "40", "4", "2999-01-01", "6", "3"],
        );
        app.run().unwrap();

        let patient = db::get_patient(&app.conn, 1).unwrap().unwrap();
        assert_eq!(patient.doctor, "Cardiologist");
        assert_eq!(patient.appointment_date, "2999-01-01");
    }

    #[test]
    fn abandoned_workflow_returns_to_the_menu() {
        let mut app = app(
            db::open_in_memory(true).unwrap(),
            &["1", "1", "Jane", "Doe", "0", "0", "0", "6", "3"],
        );
        app.run().unwrap();

        let out = output(&app);
        assert!(out.contains("Fix Appointment cancelled"));
        assert_eq!(out.matches("=== User Menu ===").count(), 2);
        assert_eq!(count_rows(&app.conn, "patient"), 0);
    }

    #[test]
    fn admin_sees_patient_ids_for_booking() {
        let mut app = app(
            db::open_in_memory(true).unwrap(),
            &[
                "1", "1", "Jane", "Doe", "40", "4", "2999-01-01", "6",
                "2", "open-sesame", "10", "15", "3",
            ],
        );
        app.run().unwrap();

        let out = output(&app);
        assert!(out.contains("10. View Patients"));
        assert!(out.contains("15. Back to Main Menu"));
        assert!(out.contains("ID: 1 | Name: Jane Doe | Age: 40"));
    }

    #[test]
    fn database_failure_is_reported_and_menu_continues() {
        let conn = db::open_in_memory(true).unwrap();
        conn.execute_batch("DROP TABLE doctor").unwrap();
        let mut app = app(conn, &["1", "3", "6", "3"]);
        app.run().unwrap();

        let out = output(&app);
        assert!(out.contains("View Doctors failed"));
        assert!(out.contains("Goodbye!"));
    }
}
