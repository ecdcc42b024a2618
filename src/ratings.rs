//! Staff ratings. Each staff member is rated at most once.

use rusqlite::Connection;

use crate::db::{self, write_transaction};
use crate::error::ServiceError;
use crate::identity::IdentityContext;
use crate::models::*;
use crate::validation::{self, RatingRequest};
use crate::visibility;

fn already_rated(emp_id: i64) -> String {
    format!("Employee {emp_id} has already been rated")
}

pub fn list_ratings(conn: &Connection, caller: &IdentityContext) -> Result<Vec<RatingView>, ServiceError> {
    visibility::list_visible(conn, caller)
}

pub fn get_rating(conn: &Connection, caller: &IdentityContext, id: i64) -> Result<RatingView, ServiceError> {
    visibility::get_visible(conn, caller, id)
}

pub fn create_rating(
    conn: &mut Connection,
    caller: &IdentityContext,
    req: &RatingRequest,
) -> Result<Rating, ServiceError> {
    caller.role()?;
    let rating = validation::validate_rating(req)?;

    let created = write_transaction(conn, |tx| {
        require_staff(tx, rating.emp_id)?;
        if db::find_rating_for_staff(tx, rating.emp_id, None)?.is_some() {
            return Err(ServiceError::Conflict(already_rated(rating.emp_id)));
        }
        db::insert_rating(tx, &rating)
            .map_err(|e| ServiceError::conflict_or(e, &already_rated(rating.emp_id)))
    })?;

    tracing::info!(rating_id = created.rating_id, emp_id = created.emp_id, "Rating recorded");
    Ok(created)
}

pub fn update_rating(
    conn: &mut Connection,
    caller: &IdentityContext,
    id: i64,
    req: &RatingRequest,
) -> Result<(), ServiceError> {
    caller.role()?;
    let rating = validation::validate_rating(req)?;

    write_transaction(conn, |tx| {
        if db::get_rating(tx, id)?.is_none() {
            return Err(ServiceError::NotFound("Rating not found".into()));
        }
        require_staff(tx, rating.emp_id)?;
        if db::find_rating_for_staff(tx, rating.emp_id, Some(id))?.is_some() {
            return Err(ServiceError::Conflict(already_rated(rating.emp_id)));
        }
        db::update_rating(tx, id, &rating)
            .map_err(|e| ServiceError::conflict_or(e, &already_rated(rating.emp_id)))
    })?;

    tracing::info!(rating_id = id, "Rating updated");
    Ok(())
}

pub fn delete_rating(
    conn: &mut Connection,
    caller: &IdentityContext,
    id: i64,
) -> Result<(), ServiceError> {
    caller.role()?;
    write_transaction(conn, |tx| db::delete_rating(tx, id).map_err(ServiceError::from))?;
    tracing::info!(rating_id = id, "Rating deleted");
    Ok(())
}

fn require_staff(conn: &Connection, emp_id: i64) -> Result<(), ServiceError> {
    if !db::staff_exists(conn, emp_id)? {
        return Err(ServiceError::NotFound("Staff member not found".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures::{seed, Seed};
    use crate::db::sqlite::open_memory_database;
    use serde_json::json;

    fn setup() -> (Connection, Seed) {
        let conn = open_memory_database().unwrap();
        let s = seed(&conn);
        (conn, s)
    }

    fn admin() -> IdentityContext {
        IdentityContext::new("admin@hms.test", "admin")
    }

    fn req(emp_id: i64, comments: &str) -> RatingRequest {
        serde_json::from_value(json!({
            "Emp_ID": emp_id, "Rating": 4, "Comments": comments, "Date": "2026-05-02"
        }))
        .unwrap()
    }

    #[test]
    fn second_rating_for_staff_is_a_conflict() {
        let (mut conn, s) = setup();
        create_rating(&mut conn, &admin(), &req(s.nurse_emp, "Kind")).unwrap();
        let err = create_rating(&mut conn, &admin(), &req(s.nurse_emp, "Again")).unwrap_err();
        let expected = format!("Employee {} has already been rated", s.nurse_emp);
        assert!(matches!(err, ServiceError::Conflict(m) if m == expected));
    }

    #[test]
    fn rating_unknown_staff_is_not_found() {
        let (mut conn, _) = setup();
        let err = create_rating(&mut conn, &admin(), &req(900, "Who?")).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(m) if m == "Staff member not found"));
    }

    #[test]
    fn thirty_char_comment_is_stored_and_thirty_one_is_not() {
        let (mut conn, s) = setup();
        let ok = create_rating(&mut conn, &admin(), &req(s.doctor_a_emp, &"b".repeat(30))).unwrap();
        assert_eq!(ok.comments.len(), 30);

        let err = create_rating(&mut conn, &admin(), &req(s.doctor_b_emp, &"b".repeat(31))).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn update_moves_rating_only_to_unrated_staff() {
        let (mut conn, s) = setup();
        let a = create_rating(&mut conn, &admin(), &req(s.doctor_a_emp, "Sharp")).unwrap();
        create_rating(&mut conn, &admin(), &req(s.doctor_b_emp, "Calm")).unwrap();

        update_rating(&mut conn, &admin(), a.rating_id, &req(s.doctor_a_emp, "Very sharp")).unwrap();
        let err = update_rating(&mut conn, &admin(), a.rating_id, &req(s.doctor_b_emp, "Sharp")).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        update_rating(&mut conn, &admin(), a.rating_id, &req(s.nurse_emp, "Moved")).unwrap();
        let view = get_rating(&conn, &admin(), a.rating_id).unwrap();
        assert_eq!(view.staff_name, "Tom Baker");
    }

    #[test]
    fn doctor_lists_only_own_rating() {
        let (mut conn, s) = setup();
        create_rating(&mut conn, &admin(), &req(s.doctor_a_emp, "Sharp")).unwrap();
        create_rating(&mut conn, &admin(), &req(s.nurse_emp, "Kind")).unwrap();

        let caller = IdentityContext::new("sam.reyes@hms.test", "doctor");
        let ratings = list_ratings(&conn, &caller).unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].rating.comments, "Sharp");
    }

    #[test]
    fn delete_missing_rating_is_not_found() {
        let (mut conn, _) = setup();
        let err = delete_rating(&mut conn, &admin(), 8).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(m) if m == "Rating not found"));
    }
}
