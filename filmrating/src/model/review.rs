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

//! The `Review` data type.

use crate::model::{FilmId, FilmName, UserId, Year};
use derive_getters::Getters;
use filmrating_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Identifier of a review.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ReviewId(i64);

impl ReviewId {
    /// Creates a review identifier from its raw database value.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw database value of the identifier.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A rating given to a film, in the `[0, 10]` range.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Lowest valid rating.
    pub const MIN: u8 = 0;

    /// Highest valid rating.
    pub const MAX: u8 = 10;

    /// Creates a new rating from an untrusted value, making sure it is in range.
    pub fn new(rating: i64) -> ModelResult<Self> {
        match u8::try_from(rating) {
            Ok(rating) if rating <= Self::MAX => Ok(Self(rating)),
            _ => Err(ModelError(format!(
                "Rating must be between {} and {} but got {}",
                Self::MIN,
                Self::MAX,
                rating
            ))),
        }
    }

    /// Returns the rating as a number.
    pub fn as_u8(self) -> u8 {
        self.0
    }
}

/// A review left by a user on a film.
#[derive(Clone, Debug, Getters, PartialEq)]
pub struct Review {
    /// Identifier of the review.
    id: ReviewId,

    /// Film being reviewed.
    film_id: FilmId,

    /// Author of the review.
    user_id: UserId,

    /// Rating given to the film.
    rating: Rating,

    /// Optional free-form text accompanying the rating.
    text: Option<String>,

    /// Time when the review was submitted.
    timestamp: OffsetDateTime,
}

impl Review {
    /// Creates a new review with the given fields.
    pub(crate) fn new(
        id: ReviewId,
        film_id: FilmId,
        user_id: UserId,
        rating: Rating,
        text: Option<String>,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self { id, film_id, user_id, rating, text, timestamp }
    }
}

/// A review as listed in the page of its author, joined with the reviewed film.
#[derive(Clone, Debug, Getters, PartialEq)]
pub struct UserReview {
    /// Identifier of the review.
    review_id: ReviewId,

    /// Name of the reviewed film.
    film_name: FilmName,

    /// Release year of the reviewed film.
    film_year: Year,

    /// Optional free-form text accompanying the rating.
    text: Option<String>,

    /// Rating given to the film.
    rating: Rating,
}

impl UserReview {
    /// Creates a new user review with the given fields.
    pub(crate) fn new(
        review_id: ReviewId,
        film_name: FilmName,
        film_year: Year,
        text: Option<String>,
        rating: Rating,
    ) -> Self {
        Self { review_id, film_name, film_year, text, rating }
    }
}
