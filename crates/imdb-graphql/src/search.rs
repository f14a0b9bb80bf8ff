//! Advanced title search.
//!
//! Loosely-typed user input is validated and rendered into the constraint
//! fragments of a single `advancedTitleSearch` query. Validation happens before
//! any request: an invalid date rejects the whole search, and a search with no
//! constraint at all returns an empty result without touching the transport.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{QueryError, QueryResult, ValidationError};
use crate::id::{EntityId, EntityKind};
use crate::navigate::Nav;
use crate::normalize::strip_extension;
use crate::operation::GraphqlRequest;
use crate::query::{SortOrder, compact_lines, quote};
use crate::transport::Transport;

const OPERATION: &str = "AdvancedSearch";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sort key for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    /// Current popularity.
    #[default]
    Popularity,
    /// Localized title.
    TitleRegional,
    /// Aggregate user rating.
    UserRating,
    /// Number of user ratings.
    UserRatingCount,
    /// Domestic box office gross.
    BoxOfficeGrossDomestic,
    /// Metacritic score.
    MetacriticScore,
    /// Runtime.
    Runtime,
    /// Release year.
    Year,
    /// Release date.
    ReleaseDate,
}

impl SortBy {
    /// Enum literal used by the schema.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popularity => "POPULARITY",
            Self::TitleRegional => "TITLE_REGIONAL",
            Self::UserRating => "USER_RATING",
            Self::UserRatingCount => "USER_RATING_COUNT",
            Self::BoxOfficeGrossDomestic => "BOX_OFFICE_GROSS_DOMESTIC",
            Self::MetacriticScore => "METACRITIC_SCORE",
            Self::Runtime => "RUNTIME",
            Self::Year => "YEAR",
            Self::ReleaseDate => "RELEASE_DATE",
        }
    }
}

/// Result size, ordering and thumbnail height for searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Maximum number of results (`first:`).
    pub amount: u32,
    /// Sort key.
    pub sort_by: SortBy,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Height of the result thumbnails in pixels.
    pub thumbnail_height: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            amount: 500,
            sort_by: SortBy::Popularity,
            sort_order: SortOrder::Asc,
            thumbnail_height: 207,
        }
    }
}

/// Raw search input. Every field may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchInput {
    /// Free-text title term.
    pub term: String,
    /// Comma separated genre ids, all of which must match (`Horror,Action`).
    pub genres: String,
    /// Comma separated title types, any of which may match (`movie,tvSeries`).
    pub types: String,
    /// Comma separated person ids credited on the title.
    pub credit_ids: String,
    /// Earliest release date, `YYYY-MM-DD`.
    pub start_date: String,
    /// Latest release date, `YYYY-MM-DD`.
    pub end_date: String,
}

/// Render a comma separated list as quoted, comma joined literals.
///
/// `"Horror, Action,Comedy"` becomes `"Horror","Action","Comedy"`. Blank
/// input renders as an empty fragment; blank elements of a non-blank list are
/// kept as `""`.
#[must_use]
pub fn render_list(items: &str) -> String {
    if items.trim().is_empty() {
        return String::new();
    }
    items
        .split(',')
        .map(str::trim)
        .map(quote)
        .collect::<Vec<_>>()
        .join(",")
}

/// Render the free-text term: `null` when blank, otherwise a quoted literal.
#[must_use]
pub fn render_term(term: &str) -> String {
    let term = term.trim();
    if term.is_empty() {
        "null".to_string()
    } else {
        quote(term)
    }
}

/// Render both release-date bounds.
///
/// Blank bounds render as `null`. A present bound must be a real calendar date
/// written exactly as `YYYY-MM-DD`.
pub fn render_date_range(start: &str, end: &str) -> Result<(String, String), ValidationError> {
    Ok((
        render_date("start_date", start)?,
        render_date("end_date", end)?,
    ))
}

fn render_date(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    if raw.trim().is_empty() {
        return Ok("null".to_string());
    }
    let round_trips = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .is_ok_and(|date| date.format(DATE_FORMAT).to_string() == raw);
    if !round_trips {
        return Err(ValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        });
    }
    Ok(quote(raw))
}

/// Render credited-person ids, each validated and prefixed.
pub fn render_credit_ids(raw: &str) -> Result<String, ValidationError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| EntityId::name(item).map(|id| quote(&id.prefixed())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids.join(","))
}

/// Rendered constraint fragments of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConstraints {
    term: String,
    genres: String,
    types: String,
    credit_ids: String,
    start_date: String,
    end_date: String,
}

impl SearchConstraints {
    /// Validate and render `input`.
    ///
    /// Returns `Ok(None)` when no constraint is present.
    pub fn from_input(input: &SearchInput) -> Result<Option<Self>, ValidationError> {
        let (start_date, end_date) = render_date_range(&input.start_date, &input.end_date)?;
        let constraints = Self {
            term: render_term(&input.term),
            genres: render_list(&input.genres),
            types: render_list(&input.types),
            credit_ids: render_credit_ids(&input.credit_ids)?,
            start_date,
            end_date,
        };
        Ok((!constraints.is_empty()).then_some(constraints))
    }

    fn is_empty(&self) -> bool {
        self.term == "null"
            && self.genres.is_empty()
            && self.types.is_empty()
            && self.credit_ids.is_empty()
            && self.start_date == "null"
            && self.end_date == "null"
    }

    /// Query text for these constraints.
    #[must_use]
    pub fn to_query(&self, settings: &SearchSettings) -> String {
        let query = format!(
            "query {OPERATION} {{
  advancedTitleSearch(
    first: {amount}, sort: {{sortBy: {sort_by} sortOrder: {sort_order}}}
    constraints: {{
      titleTextConstraint: {{searchTerm: {term}}}
      genreConstraint: {{allGenreIds: [{genres}]}}
      titleTypeConstraint: {{anyTitleTypeIds: [{types}]}}
      releaseDateConstraint: {{releaseDateRange: {{start: {start} end: {end}}}}}
      creditedNameConstraint: {{anyNameIds: [{credits}]}}
      explicitContentConstraint: {{explicitContentFilter: INCLUDE_ADULT}}
    }}
  ) {{
    edges {{
      node {{
        title {{
          id
          originalTitleText {{
            text
          }}
          titleText {{
            text
          }}
          titleType {{
            text
          }}
          releaseYear {{
            year
            endYear
          }}
          meterRanking {{
            currentRank
          }}
          ratingsSummary {{
            aggregateRating
          }}
          plot {{
            plotText {{
              plainText
            }}
          }}
          primaryImage {{
            url
          }}
        }}
      }}
    }}
  }}
}}",
            amount = settings.amount,
            sort_by = settings.sort_by.as_str(),
            sort_order = settings.sort_order.as_str(),
            term = self.term,
            genres = self.genres,
            types = self.types,
            start = self.start_date,
            end = self.end_date,
            credits = self.credit_ids,
        );
        compact_lines(&query)
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSummary {
    /// Title id (bare suffix).
    pub id: Option<EntityId>,
    /// Original-language title.
    pub original_title: Option<String>,
    /// Localized title.
    pub title: Option<String>,
    /// Title type, e.g. `Movie` or `TV Series`.
    pub title_type: Option<String>,
    /// `YYYY` or `YYYY-YYYY` for series with an end year.
    pub year: Option<String>,
    /// Popularity rank.
    pub rank: Option<u64>,
    /// Aggregate rating.
    pub rating: Option<f64>,
    /// Plot outline.
    pub plot: Option<String>,
    /// Height-fitted thumbnail URL.
    pub thumb_url: Option<String>,
}

impl TitleSummary {
    /// Normalize one `advancedTitleSearch` node.
    #[must_use]
    pub fn from_node(node: Nav<'_>, thumbnail_height: u32) -> Self {
        let title = node.get("title");
        let year = title.path(&["releaseYear", "year"]).i64().map(|start| {
            match title.path(&["releaseYear", "endYear"]).i64() {
                Some(end) => format!("{start}-{end}"),
                None => start.to_string(),
            }
        });
        Self {
            id: title.get("id").entity_id(EntityKind::Title),
            original_title: title.path(&["originalTitleText", "text"]).string(),
            title: title.path(&["titleText", "text"]).string(),
            title_type: title.path(&["titleType", "text"]).string(),
            year,
            rank: title.path(&["meterRanking", "currentRank"]).u64(),
            rating: title.path(&["ratingsSummary", "aggregateRating"]).f64(),
            plot: title.path(&["plot", "plotText", "plainText"]).string(),
            thumb_url: title
                .path(&["primaryImage", "url"])
                .str()
                .filter(|url| !url.is_empty())
                .map(|url| format!("{}QL75_SY{thumbnail_height}_.jpg", strip_extension(url))),
        }
    }
}

/// Run an advanced title search.
///
/// Issues at most one request. Invalid input fails with
/// [`QueryError::Validation`] before any request; input without constraints
/// yields an empty list without a request.
#[instrument(skip_all)]
pub async fn advanced_search(
    transport: &dyn Transport,
    input: &SearchInput,
    settings: &SearchSettings,
) -> QueryResult<Vec<TitleSummary>> {
    let Some(constraints) = SearchConstraints::from_input(input)? else {
        debug!("search has no constraints; skipping request");
        return Ok(Vec::new());
    };

    let request = GraphqlRequest::new(constraints.to_query(settings), OPERATION);
    let data = transport.execute(&request).await?;
    let edges = Nav::new(&data).path(&["advancedTitleSearch", "edges"]);
    if !edges.value().is_some_and(serde_json::Value::is_array) {
        return Err(QueryError::schema(OPERATION, "advancedTitleSearch.edges"));
    }

    let results: Vec<TitleSummary> = edges
        .items()
        .map(|edge| TitleSummary::from_node(edge.get("node"), settings.thumbnail_height))
        .collect();
    debug!(results = results.len(), "advanced search complete");
    Ok(results)
}
