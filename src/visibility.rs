//! Role-scoped reads.
//!
//! Listing any record kind goes through the same cascade:
//! 1. Parse the caller's role → unknown role is `Forbidden`
//! 2. Ask the record kind whether that role may see it at all → `Forbidden`
//! 3. Resolve the caller's own staff/doctor/patient row → `NotFound`
//! 4. Run the kind's query narrowed to the resolved `Scope`
//!
//! A role that may see a kind but owns none of its records gets an
//! empty list, never an error.

use rusqlite::{params, Connection, Row};

use crate::db::{self, DatabaseError};
use crate::error::ServiceError;
use crate::identity::{self, DoctorIdentity, IdentityContext, PatientIdentity, StaffIdentity};
use crate::models::enums::{RecordKind, Role};
use crate::models::*;

// ═══════════════════════════════════════════════════════════
// Scope
// ═══════════════════════════════════════════════════════════

/// The resolved viewer a query is narrowed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Doctor(DoctorIdentity),
    Patient(PatientIdentity),
    /// Any staff member, for records kept about staff rather than doctors.
    Staff(StaffIdentity),
}

impl Scope {
    /// Map a role onto the caller's own records.
    pub fn resolve(conn: &Connection, role: Role, email: &str) -> Result<Scope, ServiceError> {
        let scope = match role {
            Role::Admin => Scope::All,
            Role::Doctor => Scope::Doctor(identity::resolve_doctor(conn, email)?),
            Role::Patient => Scope::Patient(identity::resolve_patient(conn, email)?),
        };
        Ok(scope)
    }
}

// ═══════════════════════════════════════════════════════════
// Visible record kinds
// ═══════════════════════════════════════════════════════════

/// A record kind that can be listed under a `Scope`.
pub trait Visible: Sized {
    const KIND: RecordKind;

    /// Whether `role` may list this kind at all.
    fn permits(role: Role) -> bool;

    /// Resolve the caller's own row for this kind.
    fn scope(conn: &Connection, role: Role, email: &str) -> Result<Scope, ServiceError> {
        Scope::resolve(conn, role, email)
    }

    /// Records visible under `scope`, optionally narrowed to one id.
    fn query(conn: &Connection, scope: &Scope, id: Option<i64>) -> Result<Vec<Self>, DatabaseError>;
}

/// Every record of kind `T` the caller may see.
pub fn list_visible<T: Visible>(
    conn: &Connection,
    caller: &IdentityContext,
) -> Result<Vec<T>, ServiceError> {
    let scope = scope_for::<T>(conn, caller)?;
    let records = T::query(conn, &scope, None)?;
    tracing::debug!(
        kind = T::KIND.as_str(),
        role = %caller.role,
        count = records.len(),
        "Resolved visible records"
    );
    Ok(records)
}

/// One record by id. A record outside the caller's scope is reported as
/// missing, the same as one that does not exist.
pub fn get_visible<T: Visible>(
    conn: &Connection,
    caller: &IdentityContext,
    id: i64,
) -> Result<T, ServiceError> {
    let scope = scope_for::<T>(conn, caller)?;
    T::query(conn, &scope, Some(id))?
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::NotFound(format!("{} not found", kind_label(T::KIND))))
}

fn scope_for<T: Visible>(conn: &Connection, caller: &IdentityContext) -> Result<Scope, ServiceError> {
    let role = caller.role()?;
    if !T::permits(role) {
        tracing::debug!(kind = T::KIND.as_str(), %role, "Role may not view record kind");
        return Err(ServiceError::Forbidden);
    }
    T::scope(conn, role, &caller.email)
}

fn kind_label(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Appointment => "Appointment",
        RecordKind::Bill => "Bill",
        RecordKind::Department => "Department",
        RecordKind::Rating => "Rating",
    }
}

fn name_or(name: Option<String>, fallback: &str) -> String {
    name.unwrap_or_else(|| fallback.to_string())
}

// ── Appointments ─────────────────────────────────────────

impl Visible for AppointmentView {
    const KIND: RecordKind = RecordKind::Appointment;

    fn permits(_role: Role) -> bool {
        true
    }

    fn query(conn: &Connection, scope: &Scope, id: Option<i64>) -> Result<Vec<Self>, DatabaseError> {
        let (doctor_id, patient_id) = match scope {
            Scope::All => (None, None),
            Scope::Doctor(d) => (Some(d.doctor_id), None),
            Scope::Patient(p) => (None, Some(p.patient_id)),
            Scope::Staff(_) => return Ok(Vec::new()),
        };

        let mut stmt = conn.prepare(
            "SELECT a.appoint_id, a.patient_id, a.doctor_id, a.date, a.time, a.scheduled_on,
                    p.patient_fname || ' ' || p.patient_lname,
                    s.emp_fname || ' ' || s.emp_lname
             FROM appointments a
             LEFT JOIN patients p ON p.patient_id = a.patient_id
             LEFT JOIN doctors d ON d.doctor_id = a.doctor_id
             LEFT JOIN staff s ON s.emp_id = d.emp_id
             WHERE (?1 IS NULL OR a.doctor_id = ?1)
               AND (?2 IS NULL OR a.patient_id = ?2)
               AND (?3 IS NULL OR a.appoint_id = ?3)
             ORDER BY a.scheduled_on, a.time, a.appoint_id",
        )?;

        let rows = stmt.query_map(params![doctor_id, patient_id, id], |row: &Row<'_>| {
            Ok(AppointmentView {
                appointment: db::appointment_from_row(row)?,
                patient_name: name_or(row.get(6)?, "Unknown Patient"),
                doctor_name: name_or(row.get(7)?, "Unknown Doctor"),
            })
        })?;

        rows.map(|r| r.map_err(DatabaseError::from)).collect()
    }
}

// ── Bills ────────────────────────────────────────────────

impl Visible for BillView {
    const KIND: RecordKind = RecordKind::Bill;

    fn permits(_role: Role) -> bool {
        true
    }

    /// Doctors see bills of the patients they have visited at least once.
    fn query(conn: &Connection, scope: &Scope, id: Option<i64>) -> Result<Vec<Self>, DatabaseError> {
        let (visiting_doctor, patient_id) = match scope {
            Scope::All => (None, None),
            Scope::Doctor(d) => (Some(d.doctor_id), None),
            Scope::Patient(p) => (None, Some(p.patient_id)),
            Scope::Staff(_) => return Ok(Vec::new()),
        };

        let mut stmt = conn.prepare(
            "SELECT b.bill_id, b.patient_id, b.date_issued, b.description, b.amount,
                    b.payment_status,
                    p.patient_fname || ' ' || p.patient_lname
             FROM bills b
             LEFT JOIN patients p ON p.patient_id = b.patient_id
             WHERE (?1 IS NULL OR b.patient_id IN
                        (SELECT v.patient_id FROM visits v WHERE v.doctor_id = ?1))
               AND (?2 IS NULL OR b.patient_id = ?2)
               AND (?3 IS NULL OR b.bill_id = ?3)
             ORDER BY b.bill_id",
        )?;

        let rows = stmt.query_map(params![visiting_doctor, patient_id, id], |row: &Row<'_>| {
            Ok(BillView {
                bill: db::bill_from_row(row)?,
                patient_name: name_or(row.get(6)?, "Unknown Patient"),
            })
        })?;

        rows.map(|r| r.map_err(DatabaseError::from)).collect()
    }
}

// ── Ratings ──────────────────────────────────────────────

impl Visible for RatingView {
    const KIND: RecordKind = RecordKind::Rating;

    fn permits(role: Role) -> bool {
        matches!(role, Role::Admin | Role::Doctor)
    }

    /// A doctor-role caller only needs a staff row to see their ratings.
    fn scope(conn: &Connection, role: Role, email: &str) -> Result<Scope, ServiceError> {
        match role {
            Role::Doctor => Ok(Scope::Staff(identity::resolve_staff(conn, email)?)),
            _ => Scope::resolve(conn, role, email),
        }
    }

    /// Doctors see only the ratings given to themselves.
    fn query(conn: &Connection, scope: &Scope, id: Option<i64>) -> Result<Vec<Self>, DatabaseError> {
        let emp_id = match scope {
            Scope::All => None,
            Scope::Doctor(d) => Some(d.emp_id),
            Scope::Staff(st) => Some(st.emp_id),
            Scope::Patient(_) => return Ok(Vec::new()),
        };

        let mut stmt = conn.prepare(
            "SELECT r.rating_id, r.emp_id, r.rating, r.comments, r.date,
                    s.emp_fname || ' ' || s.emp_lname
             FROM ratings r
             LEFT JOIN staff s ON s.emp_id = r.emp_id
             WHERE (?1 IS NULL OR r.emp_id = ?1)
               AND (?2 IS NULL OR r.rating_id = ?2)
             ORDER BY r.rating_id",
        )?;

        let rows = stmt.query_map(params![emp_id, id], |row: &Row<'_>| {
            Ok(RatingView {
                rating: db::rating_from_row(row)?,
                staff_name: name_or(row.get(5)?, "Unknown Staff"),
            })
        })?;

        rows.map(|r| r.map_err(DatabaseError::from)).collect()
    }
}

// ── Departments ──────────────────────────────────────────

impl Visible for Department {
    const KIND: RecordKind = RecordKind::Department;

    fn permits(role: Role) -> bool {
        matches!(role, Role::Admin | Role::Doctor)
    }

    fn query(conn: &Connection, scope: &Scope, id: Option<i64>) -> Result<Vec<Self>, DatabaseError> {
        if let Scope::Patient(_) = scope {
            return Ok(Vec::new());
        }
        match id {
            Some(id) => Ok(db::get_department(conn, id)?.into_iter().collect()),
            None => db::list_departments(conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures::{day, seed, Seed};
    use crate::db::sqlite::open_memory_database;

    struct World {
        conn: Connection,
        s: Seed,
        bill_x: i64,
        bill_y: i64,
        bill_z: i64,
    }

    fn world() -> World {
        let conn = open_memory_database().unwrap();
        let s = seed(&conn);

        for (patient, doctor, slot) in [
            (s.patient_x, s.doctor_a, "09:00"),
            (s.patient_y, s.doctor_a, "09:30"),
            (s.patient_z, s.doctor_b, "09:00"),
            (s.patient_x, s.doctor_b, "11:00"),
        ] {
            db::insert_appointment(
                &conn,
                &NewAppointment {
                    patient_id: patient,
                    doctor_id: doctor,
                    date: day(2026, 3, 1),
                    time: slot.parse().unwrap(),
                    scheduled_on: day(2026, 3, 2),
                },
            )
            .unwrap();
        }

        let bill = |patient_id| {
            db::insert_bill(
                &conn,
                &NewBill {
                    patient_id,
                    date_issued: day(2026, 3, 2),
                    description: None,
                    amount: 100.0,
                    payment_status: "Pending".into(),
                },
            )
            .unwrap()
            .bill_id
        };
        let bill_x = bill(s.patient_x);
        let bill_y = bill(s.patient_y);
        let bill_z = bill(s.patient_z);

        db::insert_rating(
            &conn,
            &NewRating { emp_id: s.doctor_a_emp, rating: 5, comments: "Thorough".into(), date: day(2026, 3, 3) },
        )
        .unwrap();
        db::insert_rating(
            &conn,
            &NewRating { emp_id: s.nurse_emp, rating: 4, comments: "Patient".into(), date: day(2026, 3, 3) },
        )
        .unwrap();

        World { conn, s, bill_x, bill_y, bill_z }
    }

    fn admin(w: &World) -> IdentityContext {
        IdentityContext::new(w.s.admin_email, "admin")
    }

    fn doctor_a() -> IdentityContext {
        IdentityContext::new("sam.reyes@hms.test", "doctor")
    }

    fn doctor_b() -> IdentityContext {
        IdentityContext::new("lena.okafor@hms.test", "doctor")
    }

    fn patient_x() -> IdentityContext {
        IdentityContext::new("ada@patients.test", "patient")
    }

    #[test]
    fn admin_sees_every_appointment_with_names() {
        let w = world();
        let appts: Vec<AppointmentView> = list_visible(&w.conn, &admin(&w)).unwrap();
        assert_eq!(appts.len(), 4);
        assert!(appts.iter().any(|a| a.patient_name == "Cleo Diaz" && a.doctor_name == "Lena Okafor"));
    }

    #[test]
    fn doctor_sees_only_own_appointments() {
        let w = world();
        let appts: Vec<AppointmentView> = list_visible(&w.conn, &doctor_a()).unwrap();
        assert_eq!(appts.len(), 2);
        assert!(appts.iter().all(|a| a.appointment.doctor_id == w.s.doctor_a));
    }

    #[test]
    fn patient_sees_only_own_appointments() {
        let w = world();
        let appts: Vec<AppointmentView> = list_visible(&w.conn, &patient_x()).unwrap();
        assert_eq!(appts.len(), 2);
        assert!(appts.iter().all(|a| a.appointment.patient_id == w.s.patient_x));
    }

    #[test]
    fn unknown_role_is_forbidden_not_empty() {
        let w = world();
        let caller = IdentityContext::new("sam.reyes@hms.test", "receptionist");
        let result: Result<Vec<AppointmentView>, _> = list_visible(&w.conn, &caller);
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn unresolvable_identity_is_not_found() {
        let w = world();
        let caller = IdentityContext::new("stranger@patients.test", "patient");
        let result: Result<Vec<AppointmentView>, _> = list_visible(&w.conn, &caller);
        assert!(matches!(result, Err(ServiceError::NotFound(m)) if m == "Patient not found"));

        let nurse_as_doctor = IdentityContext::new("tom.baker@hms.test", "doctor");
        let result: Result<Vec<BillView>, _> = list_visible(&w.conn, &nurse_as_doctor);
        assert!(matches!(result, Err(ServiceError::NotFound(m)) if m == "Doctor not found"));
    }

    #[test]
    fn doctor_role_without_doctor_row_still_sees_own_ratings() {
        let w = world();
        let nurse_as_doctor = IdentityContext::new("tom.baker@hms.test", "doctor");
        let ratings: Vec<RatingView> = list_visible(&w.conn, &nurse_as_doctor).unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].rating.emp_id, w.s.nurse_emp);
        assert_eq!(ratings[0].rating.comments, "Patient");
        assert_eq!(ratings[0].staff_name, "Tom Baker");

        let stranger = IdentityContext::new("stranger@hms.test", "doctor");
        let result: Result<Vec<RatingView>, _> = list_visible(&w.conn, &stranger);
        assert!(matches!(result, Err(ServiceError::NotFound(m)) if m == "Staff member not found"));
    }

    #[test]
    fn doctor_sees_bills_of_visited_patients_only() {
        let w = world();
        let bills: Vec<BillView> = list_visible(&w.conn, &doctor_a()).unwrap();
        let mut ids: Vec<i64> = bills.iter().map(|b| b.bill.bill_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![w.bill_x, w.bill_y]);

        let bills: Vec<BillView> = list_visible(&w.conn, &doctor_b()).unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].bill.bill_id, w.bill_z);
        assert_eq!(bills[0].patient_name, "Cleo Diaz");
    }

    #[test]
    fn doctor_without_visits_sees_no_bills() {
        let w = world();
        let emp = db::insert_staff(&w.conn, "New", "Hire", "new.hire@hms.test", "doctor", None).unwrap();
        db::insert_doctor(&w.conn, emp, None).unwrap();
        let caller = IdentityContext::new("new.hire@hms.test", "doctor");
        let bills: Vec<BillView> = list_visible(&w.conn, &caller).unwrap();
        assert!(bills.is_empty());
    }

    #[test]
    fn patient_sees_own_bill() {
        let w = world();
        let bills: Vec<BillView> = list_visible(&w.conn, &patient_x()).unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].bill.patient_id, w.s.patient_x);
    }

    #[test]
    fn get_outside_scope_is_not_found() {
        let w = world();
        let own: BillView = get_visible(&w.conn, &patient_x(), w.bill_x).unwrap();
        assert_eq!(own.bill.bill_id, w.bill_x);

        let other: Result<BillView, _> = get_visible(&w.conn, &patient_x(), w.bill_z);
        assert!(matches!(other, Err(ServiceError::NotFound(m)) if m == "Bill not found"));

        let admin_view: BillView = get_visible(&w.conn, &admin(&w), w.bill_z).unwrap();
        assert_eq!(admin_view.bill.patient_id, w.s.patient_z);
    }

    #[test]
    fn ratings_are_scoped_to_the_rated_doctor() {
        let w = world();
        let all: Vec<RatingView> = list_visible(&w.conn, &admin(&w)).unwrap();
        assert_eq!(all.len(), 2);

        let own: Vec<RatingView> = list_visible(&w.conn, &doctor_a()).unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].rating.emp_id, w.s.doctor_a_emp);
        assert_eq!(own[0].staff_name, "Sam Reyes");

        let none: Vec<RatingView> = list_visible(&w.conn, &doctor_b()).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn patients_may_not_list_ratings_or_departments() {
        let w = world();
        let ratings: Result<Vec<RatingView>, _> = list_visible(&w.conn, &patient_x());
        assert!(matches!(ratings, Err(ServiceError::Forbidden)));
        let depts: Result<Vec<Department>, _> = list_visible(&w.conn, &patient_x());
        assert!(matches!(depts, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn forbidden_is_decided_before_identity_lookup() {
        let w = world();
        // Unknown patient email, but patients cannot see ratings anyway
        let caller = IdentityContext::new("stranger@patients.test", "patient");
        let result: Result<Vec<RatingView>, _> = list_visible(&w.conn, &caller);
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn doctors_and_admins_see_all_departments() {
        let w = world();
        db::insert_department(
            &w.conn,
            &NewDepartment { dept_head: "Dr. Ng".into(), dept_name: "Radiology".into(), emp_count: 3 },
        )
        .unwrap();
        let by_admin: Vec<Department> = list_visible(&w.conn, &admin(&w)).unwrap();
        let by_doctor: Vec<Department> = list_visible(&w.conn, &doctor_b()).unwrap();
        assert_eq!(by_admin, by_doctor);
        assert_eq!(by_admin.len(), 1);
    }
}
