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

//! Tests for the database layer.

use crate::db::*;
use filmrating_core::db::Db;
use std::sync::Arc;
use time::macros::datetime;

/// Timestamp to use for reviews created by the tests.
const NOW: OffsetDateTime = datetime!(2023-06-10 18:30:15.123456789 UTC);

/// Syntactic sugar to create a user given only its `login`.
async fn create_simple_user(ex: &mut Executor, login: &'static str) -> UserId {
    create_user(ex, &Login::from(login), &HashedPassword::new(login.as_bytes().to_vec()))
        .await
        .unwrap()
}

/// Syntactic sugar to create a film given only its `name` and `year`.
async fn create_simple_film(ex: &mut Executor, name: &'static str, year: i64) -> FilmId {
    create_film(ex, &FilmName::from(name), Year::new(year).unwrap()).await.unwrap()
}

/// Syntactic sugar to create a review with an integer `rating`.
async fn create_simple_review(
    ex: &mut Executor,
    film_id: FilmId,
    user_id: UserId,
    rating: i64,
    text: Option<&str>,
) -> ReviewId {
    create_review(ex, film_id, user_id, Rating::new(rating).unwrap(), text, NOW).await.unwrap()
}

/// Extracts the names of a list of films for easier comparisons.
fn names(films: &[Film]) -> Vec<&str> {
    films.iter().map(|f| f.name().as_str()).collect()
}

async fn test_users_create_and_get(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let hash = HashedPassword::new(vec![1, 2, 3]);
    let id = create_user(&mut ex, &Login::from("some-login"), &hash).await.unwrap();

    let user = get_user_by_login(&mut ex, &Login::from("some-login")).await.unwrap();
    assert_eq!(User::new(id, Login::from("some-login"), hash), user);

    assert_eq!(user, get_user(&mut ex, id).await.unwrap());
}

async fn test_users_login_taken(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    create_simple_user(&mut ex, "some-login").await;
    assert_eq!(
        DbError::AlreadyExists,
        create_user(&mut ex, &Login::from("some-login"), &HashedPassword::new(vec![4]))
            .await
            .unwrap_err()
    );

    create_simple_user(&mut ex, "Some-Login").await;
}

async fn test_users_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    create_simple_user(&mut ex, "some-login").await;
    assert_eq!(
        DbError::NotFound,
        get_user_by_login(&mut ex, &Login::from("other-login")).await.unwrap_err()
    );
    assert_eq!(DbError::NotFound, get_user(&mut ex, UserId::new(1234)).await.unwrap_err());
}

async fn test_users_abort_creation(db: Arc<dyn Db + Send + Sync>) {
    {
        let mut tx = db.begin().await.unwrap();
        create_simple_user(tx.ex(), "some-login").await;
    }

    let mut ex = db.ex().await.unwrap();
    assert_eq!(
        DbError::NotFound,
        get_user_by_login(&mut ex, &Login::from("some-login")).await.unwrap_err()
    );
}

async fn test_users_list(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert!(list_users(&mut ex).await.unwrap().is_empty());

    let id1 = create_simple_user(&mut ex, "first").await;
    let id2 = create_simple_user(&mut ex, "second").await;

    let users = list_users(&mut ex).await.unwrap();
    assert_eq!(
        vec![(id1, "first"), (id2, "second")],
        users.iter().map(|u| (*u.id(), u.login().as_str())).collect::<Vec<_>>()
    );
}

async fn test_films_create_get_update(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let id = create_simple_film(&mut ex, "Seven", 1994).await;
    let film = get_film(&mut ex, id).await.unwrap();
    assert_eq!(
        Film::new(id, FilmName::from("Seven"), Year::new(1994).unwrap(), None, 0, 0),
        film
    );

    update_film(&mut ex, id, &FilmName::from("Se7en"), Year::new(1995).unwrap()).await.unwrap();
    let film = get_film(&mut ex, id).await.unwrap();
    assert_eq!(
        Film::new(id, FilmName::from("Se7en"), Year::new(1995).unwrap(), None, 0, 0),
        film
    );
}

async fn test_films_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    create_simple_film(&mut ex, "Seven", 1995).await;
    assert_eq!(DbError::NotFound, get_film(&mut ex, FilmId::new(1234)).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        update_film(&mut ex, FilmId::new(1234), &FilmName::from("x"), Year::new(1).unwrap())
            .await
            .unwrap_err()
    );
}

async fn test_films_derived_stats(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user1 = create_simple_user(&mut ex, "user1").await;
    let user2 = create_simple_user(&mut ex, "user2").await;
    let user3 = create_simple_user(&mut ex, "user3").await;
    let film1 = create_simple_film(&mut ex, "First", 2000).await;
    let film2 = create_simple_film(&mut ex, "Second", 2001).await;

    create_simple_review(&mut ex, film1, user1, 4, Some("meh")).await;
    create_simple_review(&mut ex, film1, user2, 7, None).await;
    create_simple_review(&mut ex, film1, user3, 10, Some("great")).await;

    let film = get_film(&mut ex, film1).await.unwrap();
    assert_eq!(&Some(7.0), film.average_rating());
    assert_eq!(&3, film.rating_count());
    assert_eq!(&2, film.review_count());

    let film = get_film(&mut ex, film2).await.unwrap();
    assert_eq!(&None, film.average_rating());
    assert_eq!(&0, film.rating_count());
    assert_eq!(&0, film.review_count());

    let films = list_films(&mut ex).await.unwrap();
    assert_eq!(vec!["First", "Second"], names(&films));
    assert_eq!(&Some(7.0), films[0].average_rating());
}

async fn test_search_films(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();
    insert_seed_data(&mut ex, NOW).await.unwrap();

    let films = search_films(&mut ex, None, None, 0, 5).await.unwrap();
    assert_eq!(
        vec!["Wing or Thigh", "La Grande Vadrouille", "Departures", "Seven", "Toy Story"],
        names(&films)
    );

    let films = search_films(&mut ex, Some("Toy"), None, 0, 5).await.unwrap();
    assert_eq!(vec!["Toy Story"], names(&films));
    assert_eq!(&None, films[0].average_rating());

    let films = search_films(&mut ex, None, Some(Year::new(1995).unwrap()), 0, 5).await.unwrap();
    assert_eq!(vec!["Seven", "Toy Story"], names(&films));
    assert_eq!(&Some(9.0), films[0].average_rating());

    let films = search_films(&mut ex, Some("e"), Some(Year::new(1995).unwrap()), 0, 10)
        .await
        .unwrap();
    assert_eq!(vec!["Seven"], names(&films));

    let films = search_films(&mut ex, None, None, 2, 3).await.unwrap();
    assert_eq!(vec!["La Grande Vadrouille", "Departures"], names(&films));

    let films = search_films(&mut ex, None, None, 6, 100).await.unwrap();
    assert_eq!(vec!["Forest Gump"], names(&films));

    let films = search_films(&mut ex, None, None, 5, 4).await.unwrap();
    assert!(films.is_empty());
}

async fn test_search_films_case_sensitive(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();
    insert_seed_data(&mut ex, NOW).await.unwrap();

    assert!(search_films(&mut ex, Some("toy"), None, 0, 10).await.unwrap().is_empty());
    let films = search_films(&mut ex, Some("Story"), None, 0, 10).await.unwrap();
    assert_eq!(vec!["Toy Story"], names(&films));
}

async fn test_top_films(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();
    insert_seed_data(&mut ex, NOW).await.unwrap();

    let films = top_films(&mut ex, 1, 10).await.unwrap();
    assert_eq!(
        vec!["Seven", "Wing or Thigh", "Departures", "La Grande Vadrouille"],
        names(&films)
    );

    let films = top_films(&mut ex, 8, 9).await.unwrap();
    assert_eq!(vec!["Seven", "Wing or Thigh"], names(&films));

    let films = top_films(&mut ex, 3, 4).await.unwrap();
    assert!(films.is_empty());
}

async fn test_top_films_ties_by_id(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = create_simple_user(&mut ex, "user").await;
    let film1 = create_simple_film(&mut ex, "First", 2000).await;
    let film2 = create_simple_film(&mut ex, "Second", 2000).await;
    let film3 = create_simple_film(&mut ex, "Third", 2000).await;
    create_simple_review(&mut ex, film3, user, 6, None).await;
    create_simple_review(&mut ex, film2, user, 6, None).await;
    create_simple_review(&mut ex, film1, user, 2, None).await;

    let films = top_films(&mut ex, 0, 10).await.unwrap();
    assert_eq!(vec!["Second", "Third", "First"], names(&films));
}

async fn test_reviews_create_and_get(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = create_simple_user(&mut ex, "user").await;
    let film = create_simple_film(&mut ex, "Film", 2000).await;
    let id = create_simple_review(&mut ex, film, user, 6, Some("the text")).await;

    let exp_review = Review::new(
        id,
        film,
        user,
        Rating::new(6).unwrap(),
        Some("the text".to_owned()),
        NOW,
    );
    assert_eq!(exp_review, get_review(&mut ex, id).await.unwrap());
    assert_eq!(exp_review, get_review_by_film_and_user(&mut ex, film, user).await.unwrap());
}

async fn test_reviews_duplicate_keeps_first(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = create_simple_user(&mut ex, "user").await;
    let film = create_simple_film(&mut ex, "Film", 2000).await;
    create_simple_review(&mut ex, film, user, 6, Some("first")).await;

    assert_eq!(
        DbError::AlreadyExists,
        create_review(&mut ex, film, user, Rating::new(1).unwrap(), Some("second"), NOW)
            .await
            .unwrap_err()
    );

    let review = get_review_by_film_and_user(&mut ex, film, user).await.unwrap();
    assert_eq!(&Rating::new(6).unwrap(), review.rating());
    assert_eq!(&Some("first".to_owned()), review.text());
}

async fn test_reviews_unknown_references(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = create_simple_user(&mut ex, "user").await;
    let film = create_simple_film(&mut ex, "Film", 2000).await;

    assert_eq!(
        DbError::NotFound,
        create_review(&mut ex, FilmId::new(1234), user, Rating::new(1).unwrap(), None, NOW)
            .await
            .unwrap_err()
    );
    assert_eq!(
        DbError::NotFound,
        create_review(&mut ex, film, UserId::new(1234), Rating::new(1).unwrap(), None, NOW)
            .await
            .unwrap_err()
    );
}

async fn test_reviews_rating_out_of_range_rejected_by_schema(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = create_simple_user(&mut ex, "user").await;
    let film = create_simple_film(&mut ex, "Film", 2000).await;

    let query_str = "
        INSERT INTO reviews (film_id, user_id, rating, timestamp_secs, timestamp_nsecs)
        VALUES (?, ?, 11, 0, 0)";
    let e = sqlx::query(query_str)
        .bind(film.as_i64())
        .bind(user.as_i64())
        .execute(ex.conn())
        .await
        .unwrap_err();
    match map_sqlx_error(e) {
        DbError::BackendError(msg) if msg.contains("CHECK constraint failed") => (),
        e => panic!("Unexpected error: {:?}", e),
    }
}

async fn test_reviews_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(DbError::NotFound, get_review(&mut ex, ReviewId::new(1234)).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        set_review_text(&mut ex, ReviewId::new(1234), Some("x")).await.unwrap_err()
    );
}

async fn test_reviews_set_text(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = create_simple_user(&mut ex, "user").await;
    let film1 = create_simple_film(&mut ex, "First", 2000).await;
    let film2 = create_simple_film(&mut ex, "Second", 2000).await;
    let id1 = create_simple_review(&mut ex, film1, user, 3, Some("original")).await;
    let id2 = create_simple_review(&mut ex, film2, user, 4, Some("untouched")).await;

    set_review_text(&mut ex, id1, Some("edited")).await.unwrap();
    assert_eq!(
        Review::new(id1, film1, user, Rating::new(3).unwrap(), Some("edited".to_owned()), NOW),
        get_review(&mut ex, id1).await.unwrap()
    );
    assert_eq!(
        Review::new(id2, film2, user, Rating::new(4).unwrap(), Some("untouched".to_owned()), NOW),
        get_review(&mut ex, id2).await.unwrap()
    );

    set_review_text(&mut ex, id1, None).await.unwrap();
    assert_eq!(&None, get_review(&mut ex, id1).await.unwrap().text());
    assert_eq!(&0, get_film(&mut ex, film1).await.unwrap().review_count());
}

async fn test_list_user_reviews(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user1 = create_simple_user(&mut ex, "user1").await;
    let user2 = create_simple_user(&mut ex, "user2").await;
    let film1 = create_simple_film(&mut ex, "First", 2000).await;
    let film2 = create_simple_film(&mut ex, "Second", 2001).await;
    let id1 = create_simple_review(&mut ex, film2, user1, 3, None).await;
    create_simple_review(&mut ex, film1, user2, 4, Some("other user")).await;
    let id3 = create_simple_review(&mut ex, film1, user1, 5, Some("mine")).await;

    let reviews = list_user_reviews(&mut ex, user1).await.unwrap();
    assert_eq!(
        vec![
            UserReview::new(
                id1,
                FilmName::from("Second"),
                Year::new(2001).unwrap(),
                None,
                Rating::new(3).unwrap()
            ),
            UserReview::new(
                id3,
                FilmName::from("First"),
                Year::new(2000).unwrap(),
                Some("mine".to_owned()),
                Rating::new(5).unwrap()
            ),
        ],
        reviews
    );

    assert!(list_user_reviews(&mut ex, UserId::new(1234)).await.unwrap().is_empty());
}

async fn test_count_films_and_reviews(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!((0, 0), count_films_and_reviews(&mut ex).await.unwrap());
    insert_seed_data(&mut ex, NOW).await.unwrap();
    assert_eq!((6, 4), count_films_and_reviews(&mut ex).await.unwrap());
}

async fn test_seed_data(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();
    insert_seed_data(&mut ex, NOW).await.unwrap();

    let users = list_users(&mut ex).await.unwrap();
    assert_eq!(1, users.len());
    assert_eq!("review_dummy", users[0].login().as_str());
    assert_eq!(b"blank", users[0].password().as_slice());

    let films = list_films(&mut ex).await.unwrap();
    assert_eq!(
        vec![
            "Wing or Thigh",
            "La Grande Vadrouille",
            "Departures",
            "Seven",
            "Toy Story",
            "Forest Gump"
        ],
        names(&films)
    );
    assert_eq!(
        vec![Some(8.0), Some(2.0), Some(5.0), Some(9.0), None, None],
        films.iter().map(|f| *f.average_rating()).collect::<Vec<_>>()
    );
    assert_eq!(
        vec![1, 1, 1, 0, 0, 0],
        films.iter().map(|f| *f.review_count()).collect::<Vec<_>>()
    );
}

/// Instantiates all database tests for the backend provided by `setup`.
macro_rules! generate_db_tests [
    ( $setup:expr ) => {
        filmrating_core::db::testutils::generate_tests!(
            $setup,
            crate::db::tests,
            test_users_create_and_get,
            test_users_login_taken,
            test_users_not_found,
            test_users_abort_creation,
            test_users_list,
            test_films_create_get_update,
            test_films_not_found,
            test_films_derived_stats,
            test_search_films,
            test_search_films_case_sensitive,
            test_top_films,
            test_top_films_ties_by_id,
            test_reviews_create_and_get,
            test_reviews_duplicate_keeps_first,
            test_reviews_unknown_references,
            test_reviews_rating_out_of_range_rejected_by_schema,
            test_reviews_not_found,
            test_reviews_set_text,
            test_list_user_reviews,
            test_count_films_and_reviews,
            test_seed_data
        );
    }
];

mod sqlite {
    use super::*;

    /// Connects to a fresh in-memory database and initializes its schema.
    async fn setup() -> Arc<dyn Db + Send + Sync> {
        let db = filmrating_core::db::sqlite::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Arc::new(db)
    }

    generate_db_tests!(setup().await);
}
