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

//! The `Film` data type and its derived views.

use derive_getters::Getters;
use filmrating_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a film.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FilmId(i64);

impl FilmId {
    /// Creates a film identifier from its raw database value.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw database value of the identifier.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FilmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The name of a film.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilmName(String);

impl FilmName {
    /// Creates a new film name from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(ModelError("Film name cannot be empty".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl From<&'static str> for FilmName {
    /// Creates a new film name from a hardcoded string, which must be valid.
    fn from(name: &'static str) -> Self {
        FilmName::new(name).expect("Hardcoded film names must be valid")
    }
}

/// The release year of a film.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Year(i32);

impl Year {
    /// Creates a new year from an untrusted value, making sure it is valid.
    pub fn new(year: i64) -> ModelResult<Self> {
        match i32::try_from(year) {
            Ok(year) if (0..=9999).contains(&year) => Ok(Self(year)),
            _ => Err(ModelError(format!("Year {} is out of range", year))),
        }
    }

    /// Returns the year as a number.
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A film together with the statistics derived from its reviews.
#[derive(Clone, Debug, Getters, PartialEq)]
pub struct Film {
    /// Identifier of the film.
    id: FilmId,

    /// Name of the film.
    name: FilmName,

    /// Release year of the film.
    year: Year,

    /// Mean of all ratings given to the film, or `None` if nobody rated it.
    average_rating: Option<f64>,

    /// Number of ratings given to the film.
    rating_count: u64,

    /// Number of ratings given to the film that came with a written review.
    review_count: u64,
}

impl Film {
    /// Creates a new film with the given fields.
    pub(crate) fn new(
        id: FilmId,
        name: FilmName,
        year: Year,
        average_rating: Option<f64>,
        rating_count: u64,
        review_count: u64,
    ) -> Self {
        Self { id, name, year, average_rating, rating_count, review_count }
    }

    /// Reduces the film to the fields returned by searches and rankings.
    pub fn into_summary(self) -> FilmSummary {
        FilmSummary { name: self.name, average_rating: self.average_rating, id: self.id }
    }

    /// Reduces the film to its statistics, which only exist if the film has been rated.
    pub fn into_stats(self) -> Option<FilmStats> {
        let average_rating = self.average_rating?;
        Some(FilmStats {
            name: self.name,
            average_rating,
            ratings_count: self.rating_count,
            reviews_count: self.review_count,
        })
    }
}

/// Search and ranking view of a film.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
pub struct FilmSummary {
    /// Name of the film.
    name: FilmName,

    /// Mean of all ratings given to the film, or `None` if nobody rated it.
    average_rating: Option<f64>,

    /// Identifier of the film.
    id: FilmId,
}

/// Statistics view of a film that has been rated at least once.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
pub struct FilmStats {
    /// Name of the film.
    name: FilmName,

    /// Mean of all ratings given to the film.
    average_rating: f64,

    /// Number of ratings given to the film.
    ratings_count: u64,

    /// Number of ratings given to the film that came with a written review.
    reviews_count: u64,
}
