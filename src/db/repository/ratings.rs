use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{classify_write_error, DatabaseError};
use crate::models::*;

pub(crate) fn rating_from_row(row: &Row<'_>) -> rusqlite::Result<Rating> {
    Ok(Rating {
        rating_id: row.get(0)?,
        emp_id: row.get(1)?,
        rating: row.get(2)?,
        comments: row.get(3)?,
        date: row.get(4)?,
    })
}

pub fn insert_rating(conn: &Connection, rating: &NewRating) -> Result<Rating, DatabaseError> {
    conn.execute(
        "INSERT INTO ratings (emp_id, rating, comments, date) VALUES (?1, ?2, ?3, ?4)",
        params![rating.emp_id, rating.rating, rating.comments, rating.date],
    )
    .map_err(classify_write_error)?;

    Ok(Rating {
        rating_id: conn.last_insert_rowid(),
        emp_id: rating.emp_id,
        rating: rating.rating,
        comments: rating.comments.clone(),
        date: rating.date,
    })
}

pub fn get_rating(conn: &Connection, id: i64) -> Result<Option<Rating>, DatabaseError> {
    let rating = conn
        .query_row(
            "SELECT rating_id, emp_id, rating, comments, date FROM ratings WHERE rating_id = ?1",
            params![id],
            rating_from_row,
        )
        .optional()?;
    Ok(rating)
}

pub fn update_rating(conn: &Connection, id: i64, rating: &NewRating) -> Result<(), DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE ratings SET emp_id = ?1, rating = ?2, comments = ?3, date = ?4
             WHERE rating_id = ?5",
            params![rating.emp_id, rating.rating, rating.comments, rating.date, id],
        )
        .map_err(classify_write_error)?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Rating", id));
    }
    Ok(())
}

pub fn delete_rating(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM ratings WHERE rating_id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Rating", id));
    }
    Ok(())
}

/// The rating already recorded for a staff member, other than `exclude`.
pub fn find_rating_for_staff(
    conn: &Connection,
    emp_id: i64,
    exclude: Option<i64>,
) -> Result<Option<i64>, DatabaseError> {
    let id = conn
        .query_row(
            "SELECT rating_id FROM ratings
             WHERE emp_id = ?1 AND (?2 IS NULL OR rating_id != ?2)
             LIMIT 1",
            params![emp_id, exclude],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}
