// Film rating
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Database abstraction in terms of the operations needed by the service.
//!
//! Every function in this module takes an `Executor`, which can be backed by a transaction or by
//! a direct connection.  The caller decides which one is appropriate.

use crate::model::*;
use filmrating_core::db::sqlite::{build_timestamp, map_sqlx_error, run_schema, unpack_timestamp};
use filmrating_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    run_schema(ex, include_str!("sqlite.sql")).await
}

/// Converts a count as returned by SQLite into an unsigned value.
fn count_from_i64(column: &str, count: i64) -> DbResult<u64> {
    u64::try_from(count)
        .map_err(|_| DbError::DataIntegrityError(format!("Negative {}: {}", column, count)))
}

impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let login: String = row.try_get("login").map_err(map_sqlx_error)?;
        let password_hash: Vec<u8> = row.try_get("password_hash").map_err(map_sqlx_error)?;

        Ok(User::new(UserId::new(id), Login::new(login)?, HashedPassword::new(password_hash)))
    }
}

impl TryFrom<SqliteRow> for Film {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(map_sqlx_error)?;
        let year: i64 = row.try_get("year").map_err(map_sqlx_error)?;
        let average_rating: Option<f64> = row.try_get("average_rating").map_err(map_sqlx_error)?;
        let rating_count: i64 = row.try_get("rating_count").map_err(map_sqlx_error)?;
        let review_count: i64 = row.try_get("review_count").map_err(map_sqlx_error)?;

        Ok(Film::new(
            FilmId::new(id),
            FilmName::new(name)?,
            Year::new(year)?,
            average_rating,
            count_from_i64("rating_count", rating_count)?,
            count_from_i64("review_count", review_count)?,
        ))
    }
}

impl TryFrom<SqliteRow> for Review {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let film_id: i64 = row.try_get("film_id").map_err(map_sqlx_error)?;
        let user_id: i64 = row.try_get("user_id").map_err(map_sqlx_error)?;
        let rating: i64 = row.try_get("rating").map_err(map_sqlx_error)?;
        let text: Option<String> = row.try_get("text").map_err(map_sqlx_error)?;
        let timestamp_secs: i64 = row.try_get("timestamp_secs").map_err(map_sqlx_error)?;
        let timestamp_nsecs: i64 = row.try_get("timestamp_nsecs").map_err(map_sqlx_error)?;

        Ok(Review::new(
            ReviewId::new(id),
            FilmId::new(film_id),
            UserId::new(user_id),
            Rating::new(rating)?,
            text,
            build_timestamp(timestamp_secs, timestamp_nsecs)?,
        ))
    }
}

impl TryFrom<SqliteRow> for UserReview {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let review_id: i64 = row.try_get("review_id").map_err(map_sqlx_error)?;
        let film_name: String = row.try_get("film_name").map_err(map_sqlx_error)?;
        let film_year: i64 = row.try_get("film_year").map_err(map_sqlx_error)?;
        let text: Option<String> = row.try_get("text").map_err(map_sqlx_error)?;
        let rating: i64 = row.try_get("rating").map_err(map_sqlx_error)?;

        Ok(UserReview::new(
            ReviewId::new(review_id),
            FilmName::new(film_name)?,
            Year::new(film_year)?,
            text,
            Rating::new(rating)?,
        ))
    }
}

/// Creates a new user with `login` and a hashed `password`.
///
/// Fails with `AlreadyExists` if the login is already taken.
pub async fn create_user(
    ex: &mut Executor,
    login: &Login,
    password: &HashedPassword,
) -> DbResult<UserId> {
    let query_str = "INSERT INTO users (login, password_hash) VALUES (?, ?)";
    let done = sqlx::query(query_str)
        .bind(login.as_str())
        .bind(password.as_slice())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Ok(UserId::new(done.last_insert_rowid()))
}

/// Gets the user identified by `login`.
pub async fn get_user_by_login(ex: &mut Executor, login: &Login) -> DbResult<User> {
    let query_str = "SELECT id, login, password_hash FROM users WHERE login = ?";
    let raw_user = sqlx::query(query_str)
        .bind(login.as_str())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    User::try_from(raw_user)
}

/// Gets the user identified by `id`.
pub async fn get_user(ex: &mut Executor, id: UserId) -> DbResult<User> {
    let query_str = "SELECT id, login, password_hash FROM users WHERE id = ?";
    let raw_user = sqlx::query(query_str)
        .bind(id.as_i64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    User::try_from(raw_user)
}

/// Gets all users, sorted by identifier.
pub async fn list_users(ex: &mut Executor) -> DbResult<Vec<User>> {
    let query_str = "SELECT id, login, password_hash FROM users ORDER BY id";
    let rows = sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(map_sqlx_error)?;
    rows.into_iter().map(User::try_from).collect()
}

/// Creates a new film and returns its identifier.
pub async fn create_film(ex: &mut Executor, name: &FilmName, year: Year) -> DbResult<FilmId> {
    let query_str = "INSERT INTO films (name, year) VALUES (?, ?)";
    let done = sqlx::query(query_str)
        .bind(name.as_str())
        .bind(year.as_i32())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Ok(FilmId::new(done.last_insert_rowid()))
}

/// Overwrites the `name` and `year` of the film identified by `id`.
pub async fn update_film(
    ex: &mut Executor,
    id: FilmId,
    name: &FilmName,
    year: Year,
) -> DbResult<()> {
    let query_str = "UPDATE films SET name = ?, year = ? WHERE id = ?";
    let done = sqlx::query(query_str)
        .bind(name.as_str())
        .bind(year.as_i32())
        .bind(id.as_i64())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    if done.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Gets the film identified by `id` together with its derived statistics.
pub async fn get_film(ex: &mut Executor, id: FilmId) -> DbResult<Film> {
    let query_str = "SELECT * FROM films_with_stats WHERE id = ?";
    let raw_film = sqlx::query(query_str)
        .bind(id.as_i64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Film::try_from(raw_film)
}

/// Gets all films together with their derived statistics, sorted by identifier.
pub async fn list_films(ex: &mut Executor) -> DbResult<Vec<Film>> {
    let query_str = "SELECT * FROM films_with_stats ORDER BY id";
    let rows = sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(map_sqlx_error)?;
    rows.into_iter().map(Film::try_from).collect()
}

/// Finds films whose identifier is within `[min_id, max_id]`, optionally restricted to those
/// released in `year` and to those whose name contains `name_contains`.
///
/// The name match is case-sensitive.  Results are sorted by identifier.
pub async fn search_films(
    ex: &mut Executor,
    name_contains: Option<&str>,
    year: Option<Year>,
    min_id: i64,
    max_id: i64,
) -> DbResult<Vec<Film>> {
    let query_str = "
        SELECT * FROM films_with_stats
        WHERE
            (?1 IS NULL OR year = ?1)
            AND (?2 IS NULL OR instr(name, ?2) > 0)
            AND id BETWEEN ?3 AND ?4
        ORDER BY id";
    let rows = sqlx::query(query_str)
        .bind(year.map(Year::as_i32))
        .bind(name_contains)
        .bind(min_id)
        .bind(max_id)
        .fetch_all(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    rows.into_iter().map(Film::try_from).collect()
}

/// Finds the rated films whose average rating is within `[min_rating, max_rating]`.
///
/// Results are sorted by descending average rating, with ties sorted by identifier.
pub async fn top_films(
    ex: &mut Executor,
    min_rating: i64,
    max_rating: i64,
) -> DbResult<Vec<Film>> {
    let query_str = "
        SELECT * FROM films_with_stats
        WHERE average_rating IS NOT NULL AND average_rating BETWEEN ? AND ?
        ORDER BY average_rating DESC, id ASC";
    let rows = sqlx::query(query_str)
        .bind(min_rating)
        .bind(max_rating)
        .fetch_all(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    rows.into_iter().map(Film::try_from).collect()
}

/// Counts the number of films and reviews in the database, in that order.
pub async fn count_films_and_reviews(ex: &mut Executor) -> DbResult<(u64, u64)> {
    let query_str = "
        SELECT
            (SELECT COUNT(*) FROM films) AS films,
            (SELECT COUNT(*) FROM reviews) AS reviews";
    let row = sqlx::query(query_str).fetch_one(ex.conn()).await.map_err(map_sqlx_error)?;
    let films: i64 = row.try_get("films").map_err(map_sqlx_error)?;
    let reviews: i64 = row.try_get("reviews").map_err(map_sqlx_error)?;
    Ok((count_from_i64("films", films)?, count_from_i64("reviews", reviews)?))
}

/// Records a review by `user_id` on `film_id`.
///
/// Fails with `AlreadyExists` if the user already reviewed the film and with `NotFound` if the
/// film or the user do not exist.
pub async fn create_review(
    ex: &mut Executor,
    film_id: FilmId,
    user_id: UserId,
    rating: Rating,
    text: Option<&str>,
    timestamp: OffsetDateTime,
) -> DbResult<ReviewId> {
    let (timestamp_secs, timestamp_nsecs) = unpack_timestamp(timestamp);

    let query_str = "
        INSERT INTO reviews (film_id, user_id, rating, text, timestamp_secs, timestamp_nsecs)
        VALUES (?, ?, ?, ?, ?, ?)";
    let done = sqlx::query(query_str)
        .bind(film_id.as_i64())
        .bind(user_id.as_i64())
        .bind(i64::from(rating.as_u8()))
        .bind(text)
        .bind(timestamp_secs)
        .bind(timestamp_nsecs)
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Ok(ReviewId::new(done.last_insert_rowid()))
}

/// Gets the review identified by `id`.
pub async fn get_review(ex: &mut Executor, id: ReviewId) -> DbResult<Review> {
    let query_str = "SELECT * FROM reviews WHERE id = ?";
    let raw_review = sqlx::query(query_str)
        .bind(id.as_i64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Review::try_from(raw_review)
}

/// Gets the review that `user_id` left on `film_id`.
pub async fn get_review_by_film_and_user(
    ex: &mut Executor,
    film_id: FilmId,
    user_id: UserId,
) -> DbResult<Review> {
    let query_str = "SELECT * FROM reviews WHERE film_id = ? AND user_id = ?";
    let raw_review = sqlx::query(query_str)
        .bind(film_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Review::try_from(raw_review)
}

/// Overwrites the text of the review identified by `id`, leaving all other fields intact.
pub async fn set_review_text(
    ex: &mut Executor,
    id: ReviewId,
    text: Option<&str>,
) -> DbResult<()> {
    let query_str = "UPDATE reviews SET text = ? WHERE id = ?";
    let done = sqlx::query(query_str)
        .bind(text)
        .bind(id.as_i64())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    if done.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Gets all reviews written by `user_id` joined with the films they refer to, sorted by review
/// identifier.
pub async fn list_user_reviews(ex: &mut Executor, user_id: UserId) -> DbResult<Vec<UserReview>> {
    let query_str = "
        SELECT
            reviews.id AS review_id,
            films.name AS film_name,
            films.year AS film_year,
            reviews.text AS text,
            reviews.rating AS rating
        FROM reviews JOIN films ON films.id = reviews.film_id
        WHERE reviews.user_id = ?
        ORDER BY reviews.id";
    let rows = sqlx::query(query_str)
        .bind(user_id.as_i64())
        .fetch_all(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    rows.into_iter().map(UserReview::try_from).collect()
}

/// Populates an empty database with the initial data set, stamping reviews with `now`.
pub async fn insert_seed_data(ex: &mut Executor, now: OffsetDateTime) -> DbResult<()> {
    let dummy_login = Login::new("review_dummy")?;
    let dummy = create_user(ex, &dummy_login, &HashedPassword::new(b"blank".to_vec())).await?;

    let films = [
        ("Wing or Thigh", 1976),
        ("La Grande Vadrouille", 1966),
        ("Departures", 2008),
        ("Seven", 1995),
        ("Toy Story", 1995),
        ("Forest Gump", 1994),
    ];
    let mut ids = Vec::with_capacity(films.len());
    for (name, year) in films {
        ids.push(create_film(ex, &FilmName::new(name)?, Year::new(year)?).await?);
    }

    let reviews = [
        (0, 8, Some("very funny")),
        (1, 2, Some("didnt laugh")),
        (2, 5, Some("good for one time")),
        (3, 9, None),
    ];
    for (index, rating, text) in reviews {
        create_review(ex, ids[index], dummy, Rating::new(rating)?, text, now).await?;
    }

    Ok(())
}
