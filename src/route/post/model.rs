pub use crate::model::Post;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Error;
use crate::{route::model::Paginate, store::CreatedRange};

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct SlugInput {
	/// The slug of the post.
	pub slug: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PageInput {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1))]
	pub page: i64,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct YearPageInput {
	#[validate(range(min = 1, max = 9999))]
	pub year: i32,
	/// The page number to return (1-indexed).
	#[validate(range(min = 1))]
	pub page: i64,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct MonthPageInput {
	#[validate(range(min = 1, max = 9999))]
	pub year: i32,
	#[validate(range(min = 1, max = 12))]
	pub month: u32,
	/// The page number to return (1-indexed).
	#[validate(range(min = 1))]
	pub page: i64,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct DayPageInput {
	#[validate(range(min = 1, max = 9999))]
	pub year: i32,
	#[validate(range(min = 1, max = 12))]
	pub month: u32,
	#[validate(range(min = 1, max = 31))]
	pub day: u32,
	/// The page number to return (1-indexed).
	#[validate(range(min = 1))]
	pub page: i64,
}

impl PageInput {
	pub fn paginate(&self) -> Paginate {
		Paginate::new(self.page)
	}
}

impl YearPageInput {
	pub fn paginate(&self) -> Paginate {
		Paginate::new(self.page)
	}

	pub fn period(&self) -> Period {
		Period::Year(self.year)
	}
}

impl MonthPageInput {
	pub fn paginate(&self) -> Paginate {
		Paginate::new(self.page)
	}

	pub fn period(&self) -> Period {
		Period::Month(self.year, self.month)
	}
}

impl DayPageInput {
	pub fn paginate(&self) -> Paginate {
		Paginate::new(self.page)
	}

	pub fn period(&self) -> Period {
		Period::Day(self.year, self.month, self.day)
	}
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreatePostInput {
	/// The title of the post.
	#[validate(length(min = 1, max = 256))]
	pub title: String,
	/// The free-text body of the post.
	pub body: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct UpdatePostInput {
	/// The new title of the post, if it should change.
	#[validate(length(min = 1, max = 256))]
	pub title: Option<String>,
	/// The new body of the post, if it should change.
	pub body: Option<String>,
}

/// A single page of posts.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
	/// The total number of pages for the same filter.
	pub number_of_pages: i64,
	/// The posts on this page, newest first.
	pub posts: Vec<Post>,
}

/// The posts directly around another post.
#[derive(Debug, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Neighbors {
	/// The next older post.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub previous_post: Option<Post>,
	/// The next newer post.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub next_post: Option<Post>,
}

/// A post along with its neighbors, for navigating between posts.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PostWithNeighbors {
	#[serde(flatten)]
	pub post: Post,
	#[serde(flatten)]
	pub neighbors: Neighbors,
}

/// A calendar unit used to filter posts by creation time, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
	Year(i32),
	Month(i32, u32),
	Day(i32, u32, u32),
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
	date.and_hms_opt(0, 0, 0)
		.map(|naive| Utc.from_utc_datetime(&naive))
}

impl Period {
	/// Returns the closed range covering the whole period, ending on the last
	/// microsecond before the next period starts.
	pub fn range(self) -> Result<CreatedRange, Error> {
		let (start, next) = match self {
			Self::Year(year) => (
				NaiveDate::from_ymd_opt(year, 1, 1).ok_or(Error::InvalidParameter("year"))?,
				NaiveDate::from_ymd_opt(year + 1, 1, 1),
			),
			Self::Month(year, month) => {
				let start = NaiveDate::from_ymd_opt(year, month, 1)
					.ok_or(Error::InvalidParameter("month"))?;
				let next = if month == 12 {
					NaiveDate::from_ymd_opt(year + 1, 1, 1)
				} else {
					NaiveDate::from_ymd_opt(year, month + 1, 1)
				};

				(start, next)
			}
			Self::Day(year, month, day) => {
				let start = NaiveDate::from_ymd_opt(year, month, day)
					.ok_or(Error::InvalidParameter("day"))?;

				(start, start.succ_opt())
			}
		};

		let start = midnight(start).ok_or(Error::InvalidParameter("year"))?;
		let end = next
			.and_then(midnight)
			.ok_or(Error::InvalidParameter("year"))?
			- Duration::microseconds(1);

		Ok(CreatedRange::new(start, end))
	}
}
